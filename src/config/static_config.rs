// Static configuration loaded from configuration file
// Similar to Redis's redis.conf

use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Directives read from a config file, in `name arg [arg ...]` form.
/// Names are case-insensitive; a directive given twice keeps the last value.
#[derive(Debug, Clone, Default)]
pub struct StaticConfig {
    values: HashMap<String, Vec<String>>,
}

impl StaticConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let mut values = HashMap::new();
        for (lineno, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut words = split_words(line)
                .with_context(|| format!("line {}: {}", lineno + 1, line))?
                .into_iter();
            if let Some(name) = words.next() {
                values.insert(name.to_ascii_lowercase(), words.collect());
            }
        }
        Ok(Self { values })
    }

    pub fn directives(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.values.get(name).map(Vec::as_slice)
    }

    pub fn get_string(&self, name: &str) -> Option<String> {
        self.get(name).map(|args| args.join(" "))
    }

    pub fn get_int(&self, name: &str) -> Result<Option<i64>> {
        self.get_string(name)
            .map(|v| {
                v.parse::<i64>()
                    .with_context(|| format!("'{}' expects an integer, got '{}'", name, v))
            })
            .transpose()
    }
}

/// Split a line into words, honouring "double" and 'single' quotes
fn split_words(line: &str) -> Result<Vec<String>> {
    let mut words = Vec::new();
    let mut chars = line.chars().peekable();

    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        let Some(&first) = chars.peek() else {
            return Ok(words);
        };

        let mut word = String::new();
        if first == '"' || first == '\'' {
            chars.next();
            loop {
                match chars.next() {
                    Some('\\') if first == '"' => match chars.next() {
                        Some('n') => word.push('\n'),
                        Some('t') => word.push('\t'),
                        Some(c) => word.push(c),
                        None => bail!("unbalanced quotes"),
                    },
                    Some(c) if c == first => break,
                    Some(c) => word.push(c),
                    None => bail!("unbalanced quotes"),
                }
            }
            if chars.peek().is_some_and(|c| !c.is_whitespace()) {
                bail!("closing quote must be followed by a space");
            }
        } else {
            while let Some(c) = chars.next_if(|c| !c.is_whitespace()) {
                word.push(c);
            }
        }
        words.push(word);
    }
}
