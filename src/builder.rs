//! Incremental construction of a minimal acyclic DFA, following
//! Daciuk, Mihov, Watson & Watson (2000).

use crate::dictionary::{Dictionary, PerfectHashDictionary};
use crate::error::BuilderError;
use crate::pack;
use crate::register::Register;
use crate::state::{StateArena, StateCell, Unit};

fn units_of(seq: &str) -> Vec<Unit> {
    seq.encode_utf16().collect()
}

fn string_of(units: &[Unit]) -> String {
    String::from_utf16_lossy(units)
}

fn common_prefix_len(a: &[Unit], b: &[Unit]) -> usize {
    a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count()
}

/// Wraps a container the caller asserts is already sorted — e.g. the keys
/// of a `BTreeSet<String>`, whose natural order is Unicode codepoint order
/// rather than the UTF-16 code-unit order [`Builder::add`] requires — and
/// checks that assertion eagerly, before a single sequence reaches the
/// builder, instead of discovering a violation mid-stream as `OutOfOrder`.
#[derive(Debug)]
pub struct SortedContainerAdapter<S> {
    items: Vec<S>,
}

impl<S: AsRef<str>> SortedContainerAdapter<S> {
    /// Fails with [`BuilderError::UnsortedInput`] if `items` is not in
    /// strict UTF-16 code-unit order; otherwise wraps them for
    /// [`Builder::add_sorted_container`].
    pub fn new(items: Vec<S>) -> Result<Self, BuilderError> {
        for window in items.windows(2) {
            if units_of(window[0].as_ref()) >= units_of(window[1].as_ref()) {
                return Err(BuilderError::UnsortedInput);
            }
        }
        Ok(SortedContainerAdapter { items })
    }
}

/// Drives incremental construction of an MA-DFA by streaming sequences in
/// strict lexicographic order.
///
/// The arena is owned by the caller rather than by the builder itself, so
/// that the canonical states handed out by
/// [`build`](Builder::build)/[`build_perfect_hash`](Builder::build_perfect_hash)
/// can keep borrowing from it without the builder becoming
/// self-referential.
pub struct Builder<'a> {
    arena: &'a StateArena<'a>,
    register: Register<'a>,
    active_path: Vec<&'a StateCell<'a>>,
    previous: Vec<Unit>,
    started: bool,
    finalized: bool,
    canonical_start: Option<&'a StateCell<'a>>,
}

impl<'a> Builder<'a> {
    /// Creates a builder that will allocate every `MutableState` in `arena`.
    pub fn new(arena: &'a StateArena<'a>) -> Self {
        let start = StateCell::alloc(arena);
        Builder {
            arena,
            register: Register::new(),
            active_path: vec![start],
            previous: Vec::new(),
            started: false,
            finalized: false,
            canonical_start: None,
        }
    }

    /// Inserts `seq`. Sequences must be fed in strict lexicographic order
    /// of UTF-16 code units.
    pub fn add(&mut self, seq: &str) -> Result<(), BuilderError> {
        if self.finalized {
            return Err(BuilderError::AlreadyFinalized);
        }

        let units = units_of(seq);
        if self.started && units <= self.previous {
            return Err(BuilderError::OutOfOrder {
                previous: string_of(&self.previous),
                next: seq.to_string(),
            });
        }
        self.started = true;

        // 1) Common-prefix walk: how much of `seq` is already on the
        //    active path (i.e. shared with `previous`).
        let common = common_prefix_len(&self.previous, &units);

        // 2) Minimize the dangling branch beyond the shared prefix.
        self.collapse_suffix(common);

        // 3) Append the new suffix, marking the tip final.
        let mut tail = *self.active_path.last().expect("active path is never empty");
        for &unit in &units[common..] {
            let fresh = StateCell::alloc(self.arena);
            tail.push_arc(unit, fresh);
            self.active_path.push(fresh);
            tail = fresh;
        }
        tail.set_final(true);

        log::debug!(
            "builder: inserted {:?} (shared prefix {} units, active path depth {})",
            seq,
            common,
            self.active_path.len()
        );

        self.previous = units;
        Ok(())
    }

    /// Convenience wrapper over [`add`](Builder::add) for a whole sorted
    /// iterable.
    pub fn add_all<I, S>(&mut self, seqs: I) -> Result<(), BuilderError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for seq in seqs {
            self.add(seq.as_ref())?;
        }
        Ok(())
    }

    /// Streams an already order-checked [`SortedContainerAdapter`] in.
    /// Since the adapter only ever gets built by a successful
    /// [`SortedContainerAdapter::new`], the order violation this would
    /// otherwise surface as `OutOfOrder` was already ruled out at ingest
    /// time.
    pub fn add_sorted_container<S: AsRef<str>>(
        &mut self,
        adapter: SortedContainerAdapter<S>,
    ) -> Result<(), BuilderError> {
        self.add_all(adapter.items)
    }

    /// `replaceOrRegister` applied to every active-path state strictly
    /// beyond `keep_len`, deepest first (post-order), rewriting each
    /// parent's last transition to whatever canonical state the register
    /// hands back. Afterwards `active_path.len() == keep_len + 1`.
    fn collapse_suffix(&mut self, keep_len: usize) {
        while self.active_path.len() > keep_len + 1 {
            let child = self.active_path.pop().expect("checked non-empty above");
            let canonical = self.register.register_or_replace(child);
            let parent = *self.active_path.last().expect("root is never popped here");
            parent.replace_last_target(canonical);
        }
    }

    /// Collapses the remaining active path (including the start state) and
    /// marks the builder finalized. Idempotent: calling it more than once
    /// is a no-op after the first call.
    fn finalize(&mut self) {
        if self.finalized {
            return;
        }
        self.collapse_suffix(0);
        let root = self.active_path[0];
        let canonical_root = self.register.register_or_replace(root);
        self.canonical_start = Some(canonical_root);
        self.finalized = true;
        log::info!(
            "builder: finalized with {} canonical states",
            self.register.len()
        );
    }

    fn start(&mut self) -> &'a StateCell<'a> {
        self.finalize();
        self.canonical_start.expect("finalize always sets canonical_start")
    }

    /// Finalizes the builder and returns a plain membership dictionary.
    pub fn build(&mut self) -> Dictionary {
        let start = self.start();
        let (ids, order) = pack::number_states(start);
        let core = pack::pack(&ids, &order);
        Dictionary { core }
    }

    /// Finalizes the builder and returns a perfect-hash dictionary.
    pub fn build_perfect_hash(&mut self) -> PerfectHashDictionary {
        let start = self.start();
        let (ids, order) = pack::number_states(start);
        let core = pack::pack(&ids, &order);
        let trans_numbers = pack::transition_numbers(&core, &ids, &order);
        let start_is_final = core.is_final(0);
        let root_range = core.state_offsets[0] as usize..core.state_offsets[1] as usize;
        let total: u64 = (if start_is_final { 1 } else { 0 })
            + root_range.map(|t| trans_numbers[t]).sum::<u64>();
        PerfectHashDictionary {
            core,
            trans_numbers,
            start_is_final,
            total,
        }
    }

    /// Finalizes the builder and renders the automaton as Graphviz `dot`.
    pub fn to_dot(&mut self) -> String {
        let start = self.start();
        let (ids, order) = pack::number_states(start);
        let core = pack::pack(&ids, &order);
        crate::dot::to_dot(&core)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_order_is_rejected() {
        let arena = StateArena::new();
        let mut builder = Builder::new(&arena);
        builder.add("b").unwrap();
        let err = builder.add("a").unwrap_err();
        assert_eq!(
            err,
            BuilderError::OutOfOrder {
                previous: "b".to_string(),
                next: "a".to_string(),
            }
        );
    }

    #[test]
    fn duplicate_is_rejected_as_out_of_order() {
        let arena = StateArena::new();
        let mut builder = Builder::new(&arena);
        builder.add("cat").unwrap();
        assert!(builder.add("cat").is_err());
    }

    #[test]
    fn add_after_build_is_rejected() {
        let arena = StateArena::new();
        let mut builder = Builder::new(&arena);
        builder.add("cat").unwrap();
        let _dict = builder.build();
        let err = builder.add("dog").unwrap_err();
        assert_eq!(err, BuilderError::AlreadyFinalized);
    }

    #[test]
    fn empty_builder_accepts_nothing() {
        let arena = StateArena::new();
        let mut builder = Builder::new(&arena);
        let dict = builder.build();
        assert!(!dict.contains(""));
        assert_eq!(dict.size(), 0);
    }

    #[test]
    fn minimization_shares_common_suffixes() {
        // {ab, ac, bb, bc} minimizes to 4 states, against 7 for the naive
        // trie.
        let arena = StateArena::new();
        let mut builder = Builder::new(&arena);
        builder.add_all(["ab", "ac", "bb", "bc"]).unwrap();
        let dict = builder.build();
        assert_eq!(dict.state_count(), 4);
        assert!(dict.contains("ab"));
        assert!(dict.contains("bc"));
        assert!(!dict.contains("a"));
        assert!(!dict.contains("bbb"));
    }

    #[test]
    fn prefix_chain_shares_structure() {
        // {a, ab, abc} -> 4 states.
        let arena = StateArena::new();
        let mut builder = Builder::new(&arena);
        builder.add_all(["a", "ab", "abc"]).unwrap();
        let dict = builder.build();
        assert_eq!(dict.state_count(), 4);
        let words: Vec<String> = dict.iter().collect();
        assert_eq!(words, vec!["a".to_string(), "ab".to_string(), "abc".to_string()]);
    }

    #[test]
    fn sorted_container_adapter_accepts_properly_sorted_input() {
        let adapter = SortedContainerAdapter::new(vec!["cat", "cats", "dog"]).unwrap();
        let arena = StateArena::new();
        let mut builder = Builder::new(&arena);
        builder.add_sorted_container(adapter).unwrap();
        let dict = builder.build();
        assert!(dict.contains("cats"));
    }

    #[test]
    fn sorted_container_adapter_rejects_natural_order_that_disagrees_with_utf16_order() {
        // '\u{E000}' sorts before '\u{10000}' in Rust's codepoint order, but
        // '\u{10000}' encodes as the UTF-16 surrogate pair [0xD800, 0xDC00],
        // which sorts before the single unit 0xE000.
        let claimed_sorted = vec!["\u{E000}", "\u{10000}"];
        let err = SortedContainerAdapter::new(claimed_sorted).unwrap_err();
        assert_eq!(err, BuilderError::UnsortedInput);
    }
}
