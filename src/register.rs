//! The content-addressed set of already-minimized states.

use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use crate::state::StateCell;

/// Wraps a `&'a StateCell<'a>` so that `Hash`/`Eq` implement structural
/// identity: `final` flags match, transition key sets match, and
/// corresponding destinations are the *same object*. Hashing
/// delegates to [`StateCell::structural_hash`], which already mixes
/// `final` with identity-hashed destinations.
struct RegisterKey<'a>(&'a StateCell<'a>);

impl<'a> PartialEq for RegisterKey<'a> {
    fn eq(&self, other: &Self) -> bool {
        let a = self.0;
        let b = other.0;
        if a.is_final() != b.is_final() {
            return false;
        }
        let a_arcs = a.arcs();
        let b_arcs = b.arcs();
        if a_arcs.len() != b_arcs.len() {
            return false;
        }
        a_arcs
            .iter()
            .zip(b_arcs.iter())
            .all(|(x, y)| x.unit == y.unit && std::ptr::eq(x.target, y.target))
    }
}

impl<'a> Eq for RegisterKey<'a> {}

impl<'a> Hash for RegisterKey<'a> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.0.structural_hash());
    }
}

/// A set of canonical, frozen `StateCell`s. Once a state has been inserted
/// here it must never be mutated again.
#[derive(Default)]
pub struct Register<'a> {
    canonical: HashMap<RegisterKey<'a>, ()>,
}

impl<'a> Register<'a> {
    pub fn new() -> Self {
        Register {
            canonical: HashMap::new(),
        }
    }

    /// If a structurally equal state is already registered, returns it
    /// (`child` becomes garbage the caller should drop its reference to).
    /// Otherwise registers `child` and returns it.
    pub fn register_or_replace(&mut self, child: &'a StateCell<'a>) -> &'a StateCell<'a> {
        let key = RegisterKey(child);
        if let Some((existing, _)) = self.canonical.get_key_value(&key) {
            return existing.0;
        }
        self.canonical.insert(RegisterKey(child), ());
        child
    }

    pub fn len(&self) -> usize {
        self.canonical.len()
    }

    pub fn is_empty(&self) -> bool {
        self.canonical.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{StateArena, StateCell, Unit};

    #[test]
    fn distinct_leaves_both_final_are_merged() {
        let arena = StateArena::new();
        let mut register = Register::new();

        let leaf_a = StateCell::alloc(&arena);
        leaf_a.set_final(true);
        let leaf_b = StateCell::alloc(&arena);
        leaf_b.set_final(true);

        let canonical_a = register.register_or_replace(leaf_a);
        let canonical_b = register.register_or_replace(leaf_b);

        assert!(std::ptr::eq(canonical_a, canonical_b));
        assert_eq!(register.len(), 1);
    }

    #[test]
    fn states_with_different_arcs_are_distinct() {
        let arena = StateArena::new();
        let mut register = Register::new();

        let leaf = StateCell::alloc(&arena);
        leaf.set_final(true);
        let canonical_leaf = register.register_or_replace(leaf);

        let p = StateCell::alloc(&arena);
        p.push_arc(b'x' as Unit, canonical_leaf);
        let q = StateCell::alloc(&arena);
        q.push_arc(b'y' as Unit, canonical_leaf);

        let canonical_p = register.register_or_replace(p);
        let canonical_q = register.register_or_replace(q);

        assert!(!std::ptr::eq(canonical_p, canonical_q));
        assert_eq!(register.len(), 3);
    }

    #[test]
    fn sharing_a_canonical_child_merges_confluent_parents() {
        let arena = StateArena::new();
        let mut register = Register::new();

        let leaf = StateCell::alloc(&arena);
        leaf.set_final(true);
        let canonical_leaf = register.register_or_replace(leaf);

        let p = StateCell::alloc(&arena);
        p.push_arc(b'z' as Unit, canonical_leaf);
        let q = StateCell::alloc(&arena);
        q.push_arc(b'z' as Unit, canonical_leaf);

        let canonical_p = register.register_or_replace(p);
        let canonical_q = register.register_or_replace(q);

        assert!(std::ptr::eq(canonical_p, canonical_q));
        assert_eq!(register.len(), 2);
    }
}
