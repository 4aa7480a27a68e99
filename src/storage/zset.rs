// Sorted set data structure

use bytes::Bytes;
use ordered_float::OrderedFloat;
use std::collections::{BTreeSet, HashMap};

/// Conditions that gate a single ZADD element update
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ZAddFlags {
    /// Only add new members
    pub nx: bool,
    /// Only update existing members
    pub xx: bool,
    /// Only update when the new score is greater
    pub gt: bool,
    /// Only update when the new score is lower
    pub lt: bool,
}

/// What a flagged add did to one member
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZAddOutcome {
    Added,
    Updated,
    /// Member exists with the same score
    Unchanged,
    /// A flag prevented the write
    Skipped,
}

/// Score interval used by ZCOUNT-style queries
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreRange {
    pub min: f64,
    pub max: f64,
    pub min_exclusive: bool,
    pub max_exclusive: bool,
}

impl ScoreRange {
    pub fn inclusive(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            min_exclusive: false,
            max_exclusive: false,
        }
    }

    fn above_min(&self, score: f64) -> bool {
        if self.min_exclusive {
            score > self.min
        } else {
            score >= self.min
        }
    }

    fn below_max(&self, score: f64) -> bool {
        if self.max_exclusive {
            score < self.max
        } else {
            score <= self.max
        }
    }

    pub fn contains(&self, score: f64) -> bool {
        self.above_min(score) && self.below_max(score)
    }
}

/// Sorted set keeping two indexes over the same members:
/// a hash index for member -> score lookups and an ordered
/// (score, member) index for rank and range access.
#[derive(Debug, Clone, Default)]
pub struct ZSet {
    members: HashMap<Bytes, f64>,
    scores: BTreeSet<(OrderedFloat<f64>, Bytes)>,
}

impl ZSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn score(&self, member: &[u8]) -> Option<f64> {
        self.members.get(member).copied()
    }

    /// Insert `member` or move it to `score`. Returns true if it was new.
    pub fn add(&mut self, member: Bytes, score: f64) -> bool {
        matches!(
            self.add_with_flags(member, score, ZAddFlags::default()),
            ZAddOutcome::Added
        )
    }

    pub fn add_with_flags(&mut self, member: Bytes, score: f64, flags: ZAddFlags) -> ZAddOutcome {
        match self.members.get(&member).copied() {
            Some(old) => {
                if flags.nx || (flags.gt && score <= old) || (flags.lt && score >= old) {
                    return ZAddOutcome::Skipped;
                }
                if OrderedFloat(old) == OrderedFloat(score) {
                    return ZAddOutcome::Unchanged;
                }
                self.scores.remove(&(OrderedFloat(old), member.clone()));
                self.scores.insert((OrderedFloat(score), member.clone()));
                self.members.insert(member, score);
                ZAddOutcome::Updated
            }
            None => {
                if flags.xx {
                    return ZAddOutcome::Skipped;
                }
                self.scores.insert((OrderedFloat(score), member.clone()));
                self.members.insert(member, score);
                ZAddOutcome::Added
            }
        }
    }

    /// Add `delta` to the member's score (absent members start at 0).
    /// Returns `None` and leaves the set untouched if the result is NaN.
    pub fn incr(&mut self, member: Bytes, delta: f64) -> Option<f64> {
        let next = self.score(&member).unwrap_or(0.0) + delta;
        if next.is_nan() {
            return None;
        }
        self.add(member, next);
        Some(next)
    }

    pub fn remove(&mut self, member: &[u8]) -> bool {
        match self.members.remove_entry(member) {
            Some((member, score)) => {
                self.scores.remove(&(OrderedFloat(score), member));
                true
            }
            None => false,
        }
    }

    /// 0-based position in ascending (score, member) order
    pub fn rank(&self, member: &[u8]) -> Option<usize> {
        let score = self.score(member)?;
        let bound = (OrderedFloat(score), Bytes::copy_from_slice(member));
        Some(self.scores.range(..bound).count())
    }

    /// 0-based position in descending order
    pub fn rev_rank(&self, member: &[u8]) -> Option<usize> {
        self.rank(member).map(|rank| self.len() - 1 - rank)
    }

    /// Members in ascending (score, member) order
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&Bytes, f64)> + '_ {
        self.scores.iter().map(|(score, member)| (member, score.0))
    }

    /// Members whose rank lies in `start..=stop`. Negative indexes count
    /// from the end, as in ZRANGE. `reverse` ranks from the highest score.
    pub fn range_by_rank(&self, start: i64, stop: i64, reverse: bool) -> Vec<(Bytes, f64)> {
        let len = self.len() as i64;
        let start = if start < 0 { (len + start).max(0) } else { start };
        let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };
        if len == 0 || start > stop || start >= len {
            return Vec::new();
        }

        let skip = start as usize;
        let take = (stop - start + 1) as usize;
        let collect = |(member, score): (&Bytes, f64)| (member.clone(), score);
        if reverse {
            self.iter().rev().skip(skip).take(take).map(collect).collect()
        } else {
            self.iter().skip(skip).take(take).map(collect).collect()
        }
    }

    /// Members whose score lies within `range`, in ascending order
    pub fn range_by_score(&self, range: ScoreRange) -> impl Iterator<Item = (&Bytes, f64)> + '_ {
        let start = (OrderedFloat(range.min), Bytes::new());
        self.scores
            .range(start..)
            .skip_while(move |(score, _)| !range.above_min(score.0))
            .take_while(move |(score, _)| range.below_max(score.0))
            .map(|(score, member)| (member, score.0))
    }

    pub fn count_in_range(&self, range: ScoreRange) -> usize {
        self.range_by_score(range).count()
    }
}

impl PartialEq for ZSet {
    fn eq(&self, other: &Self) -> bool {
        self.scores == other.scores
    }
}
