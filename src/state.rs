//! The in-construction automaton node.
//!
//! A [`StateCell`] is a node of the automaton while it is still being built:
//! its outgoing transitions and `final` flag may still change. Once a state
//! is handed to the [`Register`](crate::register::Register) it must never be
//! mutated again — its identity (this module's `ptr::eq`-based `Eq`/`Hash`)
//! is what the register's structural comparison relies on.

use std::cell::Cell;
use std::fmt;
use std::hash::{Hash, Hasher};

use typed_arena::Arena;

/// A 16-bit code unit; sequences are ordered lexicographically by their
/// UTF-16 code units.
pub type Unit = u16;

/// Arena that owns every [`StateCell`] allocated during a single build.
pub type StateArena<'a> = Arena<StateCell<'a>>;

/// A single outgoing transition of a [`StateCell`]: the code unit it is
/// keyed on and the (possibly still-mutable) destination.
#[derive(Clone, Copy)]
pub struct Arc<'a> {
    pub unit: Unit,
    pub target: &'a StateCell<'a>,
}

/// A node of the in-construction automaton.
///
/// Transitions are kept in ascending `unit` order at all times: because
/// input sequences arrive sorted, a state can only ever gain a transition
/// whose unit is greater than all the ones it already has, so `add_arc`
/// never needs to search for an insertion point.
pub struct StateCell<'a> {
    arcs: std::cell::RefCell<Vec<Arc<'a>>>,
    is_final: Cell<bool>,
    hash: Cell<Option<u64>>,
}

impl<'a> StateCell<'a> {
    fn new() -> Self {
        StateCell {
            arcs: std::cell::RefCell::new(Vec::new()),
            is_final: Cell::new(false),
            hash: Cell::new(None),
        }
    }

    /// Allocates a fresh, non-final state with no transitions in `arena`.
    pub fn alloc(arena: &'a StateArena<'a>) -> &'a StateCell<'a> {
        arena.alloc(StateCell::new())
    }

    pub fn is_final(&self) -> bool {
        self.is_final.get()
    }

    pub fn set_final(&self, value: bool) {
        self.is_final.set(value);
        self.hash.set(None);
    }

    pub fn has_arcs(&self) -> bool {
        !self.arcs.borrow().is_empty()
    }

    pub fn arcs(&self) -> std::cell::Ref<'_, Vec<Arc<'a>>> {
        self.arcs.borrow()
    }

    /// The destination of the transition with the greatest `unit`, i.e. the
    /// transition most recently appended — the only one the active path
    /// may still legally rewrite.
    pub fn last_arc(&self) -> Option<Arc<'a>> {
        self.arcs.borrow().last().copied()
    }

    /// Follows the transition on `unit`, if any.
    pub fn step(&self, unit: Unit) -> Option<&'a StateCell<'a>> {
        self.arcs
            .borrow()
            .iter()
            .find(|arc| arc.unit == unit)
            .map(|arc| arc.target)
    }

    /// Appends a brand new transition. Callers must maintain ascending
    /// `unit` order themselves (true by construction on the active path).
    pub fn push_arc(&self, unit: Unit, target: &'a StateCell<'a>) {
        self.arcs.borrow_mut().push(Arc { unit, target });
        self.hash.set(None);
    }

    /// Rewrites the destination of the last transition, e.g. when
    /// `replaceOrRegister` finds a canonical equivalent for it.
    pub fn replace_last_target(&self, target: &'a StateCell<'a>) {
        let mut arcs = self.arcs.borrow_mut();
        let last = arcs.last_mut().expect("replace_last_target on a leaf state");
        last.target = target;
        drop(arcs);
        self.hash.set(None);
    }

    /// The cached structural hash: `final` mixed with a set-semantics sum
    /// of `unit_hash ⊕ identity_hash(destination)` over
    /// every transition. Recomputed lazily after any mutation invalidates
    /// the cache.
    pub fn structural_hash(&self) -> u64 {
        if let Some(h) = self.hash.get() {
            return h;
        }
        let mut acc: u64 = if self.is_final.get() { 0x9E37_79B9_7F4A_7C15 } else { 0 };
        for arc in self.arcs.borrow().iter() {
            let mut hasher = std::collections::hash_map::DefaultHasher::new();
            arc.unit.hash(&mut hasher);
            let unit_hash = hasher.finish();
            let identity_hash = arc.target as *const StateCell<'a> as usize as u64;
            acc ^= unit_hash.wrapping_add(identity_hash.wrapping_mul(0x9E37_79B1));
        }
        self.hash.set(Some(acc));
        acc
    }
}

impl<'a> fmt::Debug for StateCell<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "StateCell({:p}, final: {}, arcs: {})",
            self,
            self.is_final.get(),
            self.arcs.borrow().len()
        )
    }
}

/// A borrowed handle to a [`StateCell`] whose `Eq`/`Hash` are identity-based
/// (pointer equality). Used wherever the algorithm needs "the same object",
/// e.g. the active-path stack and BFS visited-sets.
#[derive(Clone, Copy, Debug)]
pub struct StateRef<'a>(pub &'a StateCell<'a>);

impl<'a> PartialEq for StateRef<'a> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.0, other.0)
    }
}
impl<'a> Eq for StateRef<'a> {}

impl<'a> Hash for StateRef<'a> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.0 as *const StateCell<'a> as usize);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_is_not_final_and_has_no_arcs() {
        let arena = StateArena::new();
        let s = StateCell::alloc(&arena);
        assert!(!s.is_final());
        assert!(!s.has_arcs());
        assert!(s.step(b'a' as Unit).is_none());
    }

    #[test]
    fn push_and_step_arc() {
        let arena = StateArena::new();
        let a = StateCell::alloc(&arena);
        let b = StateCell::alloc(&arena);
        a.push_arc(b'x' as Unit, b);
        assert!(std::ptr::eq(a.step(b'x' as Unit).unwrap(), b));
        assert!(a.step(b'y' as Unit).is_none());
    }

    #[test]
    fn hash_is_cached_until_mutated() {
        let arena = StateArena::new();
        let a = StateCell::alloc(&arena);
        let b = StateCell::alloc(&arena);
        a.push_arc(b'x' as Unit, b);
        let h1 = a.structural_hash();
        let h2 = a.structural_hash();
        assert_eq!(h1, h2);
        a.set_final(true);
        let h3 = a.structural_hash();
        assert_ne!(h1, h3);
    }

    #[test]
    fn state_ref_identity_equality() {
        let arena = StateArena::new();
        let a = StateCell::alloc(&arena);
        let b = StateCell::alloc(&arena);
        assert_eq!(StateRef(a), StateRef(a));
        assert_ne!(StateRef(a), StateRef(b));
    }
}
