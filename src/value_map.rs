//! Immutable key→value mapping on top of a perfect-hash dictionary.

use crate::builder::Builder;
use crate::dictionary::PerfectHashDictionary;
use crate::error::{BuilderError, QueryError};
use crate::state::StateArena;

/// Pairs a [`PerfectHashDictionary`] with a values array: `get(k)` looks
/// up `k`'s rank and indexes into `values` with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueMap {
    dictionary: PerfectHashDictionary,
    values: Vec<i64>,
}

impl ValueMap {
    pub fn get(&self, key: &str) -> Option<i64> {
        let rank = self.dictionary.number(key);
        if rank < 0 {
            None
        } else {
            self.values.get(rank as usize - 1).copied()
        }
    }

    pub fn get_or_else(&self, key: &str, default: i64) -> i64 {
        self.get(key).unwrap_or(default)
    }

    pub fn len(&self) -> usize {
        self.dictionary.size()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn keys(&self) -> impl Iterator<Item = String> + '_ {
        self.dictionary.iter()
    }

    pub fn values(&self) -> impl Iterator<Item = i64> + '_ {
        self.values.iter().copied()
    }

    pub fn entries(&self) -> impl Iterator<Item = (String, i64)> + '_ {
        self.keys().zip(self.values())
    }

    /// A [`ValueMap`] is a frozen, read-only pairing of a perfect-hash
    /// dictionary with a values array; it has no way to admit or update an
    /// entry after the fact.
    pub fn insert(&self, _key: &str, _value: i64) -> Result<(), QueryError> {
        Err(QueryError::Unsupported)
    }
}

/// Builds a [`ValueMap`] from pairs that already arrive in key order,
/// appending to a parallel value buffer while feeding the dictionary
/// builder.
pub struct SortedValueMapBuilder<'a> {
    dictionary: Builder<'a>,
    values: Vec<i64>,
}

impl<'a> SortedValueMapBuilder<'a> {
    pub fn new(arena: &'a StateArena<'a>) -> Self {
        SortedValueMapBuilder {
            dictionary: Builder::new(arena),
            values: Vec::new(),
        }
    }

    pub fn add(&mut self, key: &str, value: i64) -> Result<(), BuilderError> {
        self.dictionary.add(key)?;
        self.values.push(value);
        Ok(())
    }

    pub fn build(mut self) -> ValueMap {
        let dictionary = self.dictionary.build_perfect_hash();
        ValueMap {
            dictionary,
            values: self.values,
        }
    }
}

/// Builds a [`ValueMap`] from pairs in arbitrary order: collects them into
/// a map keyed by last-write-wins, sorts by UTF-16 code unit (the order
/// [`Builder`](crate::builder::Builder) requires, which disagrees with
/// `String`'s own codepoint order once supplementary-plane characters are
/// involved), then streams the result into a [`SortedValueMapBuilder`].
pub struct ValueMapBuilder {
    pairs: std::collections::HashMap<String, i64>,
}

impl ValueMapBuilder {
    pub fn new() -> Self {
        ValueMapBuilder {
            pairs: std::collections::HashMap::new(),
        }
    }

    pub fn add(&mut self, key: impl Into<String>, value: i64) {
        self.pairs.insert(key.into(), value);
    }

    pub fn build<'a>(self, arena: &'a StateArena<'a>) -> ValueMap {
        let mut entries: Vec<(String, i64)> = self.pairs.into_iter().collect();
        entries.sort_by_key(|(key, _)| key.encode_utf16().collect::<Vec<u16>>());

        let mut sorted = SortedValueMapBuilder::new(arena);
        for (key, value) in entries {
            sorted
                .add(&key, value)
                .expect("sorted by UTF-16 code unit, so insertion order always agrees with Builder::add");
        }
        sorted.build()
    }
}

impl Default for ValueMapBuilder {
    fn default() -> Self {
        Self::new()
    }
}
