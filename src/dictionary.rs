//! The read-only query surface over a packed automaton.

use crate::error::QueryError;
use crate::pack::{PackedAutomaton, StateId};
use crate::state::Unit;

fn units_of(seq: &str) -> Vec<Unit> {
    seq.encode_utf16().collect()
}

fn string_of(units: &[Unit]) -> String {
    String::from_utf16_lossy(units)
}

/// Depth-first, lexicographic-order iterator over the sequences accepted
/// by a packed automaton.
///
/// Not restartable: each call to `Dictionary::iter`/`PerfectHashDictionary::iter`
/// creates a fresh one.
pub struct Iter<'d> {
    core: &'d PackedAutomaton,
    stack: Vec<(StateId, Vec<Unit>)>,
}

impl<'d> Iter<'d> {
    fn new(core: &'d PackedAutomaton) -> Self {
        Iter {
            core,
            stack: vec![(0, Vec::new())],
        }
    }
}

impl<'d> Iterator for Iter<'d> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        while let Some((state, prefix)) = self.stack.pop() {
            let lo = self.core.state_offsets[state as usize] as usize;
            let hi = self.core.state_offsets[state as usize + 1] as usize;
            for t in (lo..hi).rev() {
                let mut child_prefix = prefix.clone();
                child_prefix.push(self.core.trans_chars[t]);
                self.stack.push((self.core.trans_to[t], child_prefix));
            }
            if self.core.is_final(state) {
                return Some(string_of(&prefix));
            }
        }
        None
    }
}

/// A plain membership dictionary over a static, lexicographically ordered
/// set of sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dictionary {
    pub(crate) core: PackedAutomaton,
}

impl Dictionary {
    pub fn contains(&self, seq: &str) -> bool {
        self.core.contains(&units_of(seq))
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter::new(&self.core)
    }

    /// O(N): walks the whole automaton, since a plain dictionary carries
    /// no precomputed word counts.
    pub fn size(&self) -> usize {
        self.iter().count()
    }

    pub fn state_count(&self) -> usize {
        self.core.num_states()
    }

    /// A [`Dictionary`] is a frozen, read-only view over a
    /// [`Builder`](crate::builder::Builder)'s output; it has no way to
    /// admit a new sequence after the fact.
    pub fn insert(&self, _seq: &str) -> Result<(), QueryError> {
        Err(QueryError::Unsupported)
    }
}

/// A perfect-hash dictionary: in addition to membership, assigns every
/// accepted sequence its lexicographic rank in `[1, N]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerfectHashDictionary {
    pub(crate) core: PackedAutomaton,
    pub(crate) trans_numbers: Vec<u64>,
    pub(crate) start_is_final: bool,
    pub(crate) total: u64,
}

impl PerfectHashDictionary {
    pub fn contains(&self, seq: &str) -> bool {
        self.core.contains(&units_of(seq))
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter::new(&self.core)
    }

    /// O(1): the root's word count, precomputed at pack time.
    pub fn size(&self) -> usize {
        self.total as usize
    }

    pub fn state_count(&self) -> usize {
        self.core.num_states()
    }

    /// Returns the 1-based lexicographic rank of `seq`, or `-1` if `seq`
    /// is not accepted.
    pub fn number(&self, seq: &str) -> i64 {
        // The general per-character algorithm double counts the empty
        // accepted sequence against the `startIsFinal` initializer, since
        // there is no "first character" iteration to exempt in that case;
        // special-casing it keeps the rest of the loop exactly as
        // specified.
        if seq.is_empty() {
            return if self.start_is_final { 1 } else { -1 };
        }

        let units = units_of(seq);
        let mut rank: i64 = if self.start_is_final { 1 } else { 0 };
        let mut state: StateId = 0;

        for (i, &unit) in units.iter().enumerate() {
            let idx = match self.core.find_transition(state, unit) {
                Some(idx) => idx,
                None => return -1,
            };
            let lo = self.core.state_offsets[state as usize] as usize;
            for t in lo..idx {
                rank += self.trans_numbers[t] as i64;
            }
            if i != 0 && self.core.is_final(state) {
                rank += 1;
            }
            state = self.core.trans_to[idx];
        }

        if self.core.is_final(state) {
            rank
        } else {
            -1
        }
    }

    /// Inverts [`number`](Self::number): returns the accepted sequence
    /// whose rank is `rank`, or `NotFound` if `rank` is outside `[1, N]`.
    pub fn sequence(&self, rank: i64) -> Result<String, QueryError> {
        if rank < 1 || rank as u64 > self.total {
            return Err(QueryError::NotFound {
                rank,
                max: self.total as usize,
            });
        }

        let mut residual = rank as u64;
        let mut state: StateId = 0;
        let mut out: Vec<Unit> = Vec::new();

        loop {
            if self.core.is_final(state) {
                if residual == 1 {
                    return Ok(string_of(&out));
                }
                residual -= 1;
            }

            let lo = self.core.state_offsets[state as usize] as usize;
            let hi = self.core.state_offsets[state as usize + 1] as usize;
            let mut step = None;
            for t in lo..hi {
                let count = self.trans_numbers[t];
                if residual <= count {
                    step = Some(t);
                    break;
                }
                residual -= count;
            }

            match step {
                Some(t) => {
                    out.push(self.core.trans_chars[t]);
                    state = self.core.trans_to[t];
                }
                None => {
                    return Err(QueryError::NotFound {
                        rank,
                        max: self.total as usize,
                    })
                }
            }
        }
    }

    /// A [`PerfectHashDictionary`] is a frozen, read-only view over a
    /// [`Builder`](crate::builder::Builder)'s output; it has no way to
    /// admit a new sequence after the fact.
    pub fn insert(&self, _seq: &str) -> Result<(), QueryError> {
        Err(QueryError::Unsupported)
    }
}
