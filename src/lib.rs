//! A minimal acyclic deterministic finite-state automaton (MA-DFA) over a
//! static, lexicographically ordered set of sequences, built incrementally
//! with the algorithm of Daciuk, Mihov, Watson & Watson (2000).
//!
//! Build a dictionary with [`Builder`], then query it through
//! [`Dictionary`]/[`PerfectHashDictionary`]. [`ValueMap`] pairs a
//! perfect-hash dictionary with a parallel values array.

mod builder;
mod dictionary;
mod dot;
mod error;
mod pack;
mod register;
mod serialization;
mod state;
mod value_map;

pub use builder::{Builder, SortedContainerAdapter};
pub use dictionary::{Dictionary, Iter, PerfectHashDictionary};
pub use error::{BuilderError, QueryError};
pub use state::StateArena;
pub use value_map::{SortedValueMapBuilder, ValueMap, ValueMapBuilder};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_to_end_perfect_hash_scenario() {
        let arena = StateArena::new();
        let mut builder = Builder::new(&arena);
        builder.add_all(["cat", "cats", "dog"]).unwrap();
        let dict = builder.build_perfect_hash();

        assert_eq!(dict.number("cat"), 1);
        assert_eq!(dict.number("cats"), 2);
        assert_eq!(dict.number("dog"), 3);
        assert!(!dict.contains("do"));
        assert!(dict.contains("dog"));
    }

    #[test]
    fn end_to_end_value_map_scenario() {
        let arena = StateArena::new();
        let mut builder = SortedValueMapBuilder::new(&arena);
        builder.add("apple", 10).unwrap();
        builder.add("banana", 20).unwrap();
        builder.add("cherry", 30).unwrap();
        let map = builder.build();

        assert_eq!(map.get("banana"), Some(20));
        assert_eq!(map.get("date"), None);
        assert_eq!(map.get_or_else("date", -1), -1);
    }
}
