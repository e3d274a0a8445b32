#![allow(dead_code)]

//! Tokenizer: turns raw text into a normalized, order-preserving keyword set.
//!
//! A keyword is a maximal run of ASCII word characters (`[A-Za-z0-9_]`),
//! lower-cased, strictly longer than `MIN_KEYWORD_LEN` characters.

use std::collections::HashSet;
use std::sync::OnceLock;

use serde::{Serialize, Serializer};

/// Tokens of this length or shorter are discarded.
pub const MIN_KEYWORD_LEN: usize = 3;

/// Unique keywords in first-seen order. Dedup is by value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordSet {
    ordered: Vec<String>,
    seen: HashSet<String>,
}

impl KeywordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a keyword, returning `false` if it was already present.
    pub fn insert(&mut self, keyword: String) -> bool {
        if self.seen.contains(&keyword) {
            return false;
        }
        self.seen.insert(keyword.clone());
        self.ordered.push(keyword);
        true
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.seen.contains(keyword)
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ordered.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.ordered
    }

    pub fn into_vec(self) -> Vec<String> {
        self.ordered
    }
}

impl Serialize for KeywordSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.ordered)
    }
}

/// Extracts the keyword set of `text`. Total: empty input yields an empty set.
pub fn tokenize(text: &str) -> KeywordSet {
    let mut keywords = KeywordSet::new();

    for token in text
        .split(|c: char| !is_keyword_char(c))
        .filter(|t| t.len() > MIN_KEYWORD_LEN)
    {
        keywords.insert(token.to_ascii_lowercase());
    }

    keywords
}

fn is_keyword_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Immutable caller-owned text with a keyword set computed on first use.
#[derive(Debug)]
pub struct Document {
    text: String,
    keywords: OnceLock<KeywordSet>,
}

impl Document {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keywords: OnceLock::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn keywords(&self) -> &KeywordSet {
        self.keywords.get_or_init(|| tokenize(&self.text))
    }
}
