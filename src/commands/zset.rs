// Sorted Set (ZSet) command handlers

use super::args::{format_score, is_keyword, parse_float, parse_int, parse_score_bound};
use super::table::{Access, Arity, CommandSpec, CommandTable};
use super::CommandError;
use crate::protocol::RespValue;
use crate::storage::{Keyspace, ScoreRange, ZAddFlags, ZAddOutcome};
use bytes::Bytes;

pub(crate) fn register(table: &mut CommandTable) {
    table.register(CommandSpec::new("zadd", Arity::AtLeast(4), Access::Write, zadd));
    table.register(CommandSpec::new("zrem", Arity::AtLeast(3), Access::Write, zrem));
    table.register(CommandSpec::new("zcard", Arity::Exact(2), Access::Read, zcard));
    table.register(CommandSpec::new("zscore", Arity::Exact(3), Access::Read, zscore));
    table.register(CommandSpec::new("zincrby", Arity::Exact(4), Access::Write, zincrby));
    table.register(CommandSpec::new("zrank", Arity::Exact(3), Access::Read, zrank));
    table.register(CommandSpec::new("zrevrank", Arity::Exact(3), Access::Read, zrevrank));
    table.register(CommandSpec::new("zcount", Arity::Exact(4), Access::Read, zcount));
    table.register(CommandSpec::new("zrange", Arity::Between(4, 5), Access::Read, zrange));
    table.register(CommandSpec::new("zrevrange", Arity::Between(4, 5), Access::Read, zrevrange));
}

fn nan_score() -> CommandError {
    CommandError::InvalidArgument("resulting score is not a number (NaN)".to_string())
}

#[derive(Debug, Default)]
struct ZAddOptions {
    flags: ZAddFlags,
    ch: bool,
    incr: bool,
}

impl ZAddOptions {
    /// Consume leading option words; returns the options and the index of
    /// the first score.
    fn parse(args: &[Bytes]) -> (Self, usize) {
        let mut opts = Self::default();
        let mut idx = 1;
        while let Some(arg) = args.get(idx) {
            if is_keyword(arg, "NX") {
                opts.flags.nx = true;
            } else if is_keyword(arg, "XX") {
                opts.flags.xx = true;
            } else if is_keyword(arg, "GT") {
                opts.flags.gt = true;
            } else if is_keyword(arg, "LT") {
                opts.flags.lt = true;
            } else if is_keyword(arg, "CH") {
                opts.ch = true;
            } else if is_keyword(arg, "INCR") {
                opts.incr = true;
            } else {
                break;
            }
            idx += 1;
        }
        (opts, idx)
    }

    fn check_conflicts(&self) -> Result<(), CommandError> {
        let flags = self.flags;
        if flags.nx && flags.xx {
            return Err(CommandError::InvalidArgument(
                "XX and NX options at the same time are not compatible".to_string(),
            ));
        }
        if (flags.gt && flags.lt) || (flags.nx && (flags.gt || flags.lt)) {
            return Err(CommandError::InvalidArgument(
                "GT, LT, and/or NX options at the same time are not compatible".to_string(),
            ));
        }
        Ok(())
    }
}

/// ZADD key [NX|XX] [GT|LT] [CH] [INCR] score member [score member ...]
pub fn zadd(ks: &Keyspace, args: &[Bytes]) -> Result<RespValue, CommandError> {
    let key = &args[0];
    let (opts, first) = ZAddOptions::parse(args);

    let pairs = &args[first..];
    if pairs.is_empty() || pairs.len() % 2 != 0 {
        return Err(if first == 1 {
            CommandError::wrong_arity("zadd")
        } else {
            CommandError::Syntax
        });
    }
    if opts.incr && pairs.len() > 2 {
        return Err(CommandError::InvalidArgument(
            "INCR option supports a single increment-element pair".to_string(),
        ));
    }
    opts.check_conflicts()?;

    // Every score is validated before the set is touched
    let elements = pairs
        .chunks_exact(2)
        .map(|pair| Ok((parse_float(&pair[0])?, pair[1].clone())))
        .collect::<Result<Vec<_>, CommandError>>()?;

    if opts.incr {
        let (delta, member) = elements.into_iter().next().ok_or(CommandError::Syntax)?;
        let score = ks
            .update_zset(key, true, |zset| {
                let next = zset.score(&member).unwrap_or(0.0) + delta;
                if next.is_nan() {
                    return Err(nan_score());
                }
                match zset.add_with_flags(member, next, opts.flags) {
                    ZAddOutcome::Skipped => Ok(None),
                    _ => Ok(Some(next)),
                }
            })?
            .transpose()?
            .flatten();
        return Ok(score.map_or_else(RespValue::null, |s| RespValue::bulk(format_score(s))));
    }

    let counted = ks
        .update_zset(key, true, |zset| {
            elements
                .into_iter()
                .map(|(score, member)| zset.add_with_flags(member, score, opts.flags))
                .filter(|outcome| match outcome {
                    ZAddOutcome::Added => true,
                    ZAddOutcome::Updated => opts.ch,
                    _ => false,
                })
                .count()
        })?
        .unwrap_or(0);
    Ok(RespValue::Integer(counted as i64))
}

/// ZREM key member [member ...]
pub fn zrem(ks: &Keyspace, args: &[Bytes]) -> Result<RespValue, CommandError> {
    let removed = ks
        .update_zset(&args[0], false, |zset| {
            args[1..].iter().filter(|member| zset.remove(member)).count()
        })?
        .unwrap_or(0);
    Ok(RespValue::Integer(removed as i64))
}

/// ZCARD key
pub fn zcard(ks: &Keyspace, args: &[Bytes]) -> Result<RespValue, CommandError> {
    let len = ks.read_zset(&args[0], |zset| zset.len())?.unwrap_or(0);
    Ok(RespValue::Integer(len as i64))
}

/// ZSCORE key member
pub fn zscore(ks: &Keyspace, args: &[Bytes]) -> Result<RespValue, CommandError> {
    let score = ks.read_zset(&args[0], |zset| zset.score(&args[1]))?.flatten();
    Ok(score.map_or_else(RespValue::null, |s| RespValue::bulk(format_score(s))))
}

/// ZINCRBY key increment member
pub fn zincrby(ks: &Keyspace, args: &[Bytes]) -> Result<RespValue, CommandError> {
    let delta = parse_float(&args[1])?;
    let member = args[2].clone();
    let score = ks
        .update_zset(&args[0], true, |zset| zset.incr(member, delta))?
        .flatten()
        .ok_or_else(nan_score)?;
    Ok(RespValue::bulk(format_score(score)))
}

fn rank_reply(rank: Option<usize>) -> RespValue {
    rank.map_or_else(RespValue::null, |r| RespValue::Integer(r as i64))
}

/// ZRANK key member
pub fn zrank(ks: &Keyspace, args: &[Bytes]) -> Result<RespValue, CommandError> {
    let rank = ks.read_zset(&args[0], |zset| zset.rank(&args[1]))?.flatten();
    Ok(rank_reply(rank))
}

/// ZREVRANK key member
pub fn zrevrank(ks: &Keyspace, args: &[Bytes]) -> Result<RespValue, CommandError> {
    let rank = ks.read_zset(&args[0], |zset| zset.rev_rank(&args[1]))?.flatten();
    Ok(rank_reply(rank))
}

/// ZCOUNT key min max
pub fn zcount(ks: &Keyspace, args: &[Bytes]) -> Result<RespValue, CommandError> {
    let (min, min_exclusive) = parse_score_bound(&args[1])?;
    let (max, max_exclusive) = parse_score_bound(&args[2])?;
    let range = ScoreRange {
        min_exclusive,
        max_exclusive,
        ..ScoreRange::inclusive(min, max)
    };
    let count = ks.read_zset(&args[0], |zset| zset.count_in_range(range))?.unwrap_or(0);
    Ok(RespValue::Integer(count as i64))
}

/// ZRANGE key start stop [WITHSCORES]
pub fn zrange(ks: &Keyspace, args: &[Bytes]) -> Result<RespValue, CommandError> {
    range_by_rank(ks, args, false)
}

/// ZREVRANGE key start stop [WITHSCORES]
pub fn zrevrange(ks: &Keyspace, args: &[Bytes]) -> Result<RespValue, CommandError> {
    range_by_rank(ks, args, true)
}

fn range_by_rank(ks: &Keyspace, args: &[Bytes], reverse: bool) -> Result<RespValue, CommandError> {
    let start = parse_int(&args[1])?;
    let stop = parse_int(&args[2])?;
    let with_scores = match args.get(3) {
        Some(opt) if is_keyword(opt, "WITHSCORES") => true,
        Some(_) => return Err(CommandError::Syntax),
        None => false,
    };

    let entries = ks
        .read_zset(&args[0], |zset| zset.range_by_rank(start, stop, reverse))?
        .unwrap_or_default();

    let mut reply = Vec::with_capacity(entries.len() * if with_scores { 2 } else { 1 });
    for (member, score) in entries {
        reply.push(RespValue::bulk(member));
        if with_scores {
            reply.push(RespValue::bulk(format_score(score)));
        }
    }
    Ok(RespValue::array(reply))
}
