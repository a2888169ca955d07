//! JSON persistence of the packed form.

use serde::{Deserialize, Serialize};

use crate::dictionary::{Dictionary, PerfectHashDictionary};
use crate::pack::PackedAutomaton;

#[derive(Serialize, Deserialize)]
struct SerializedDictionary {
    core: PackedAutomaton,
}

#[derive(Serialize, Deserialize)]
struct SerializedPerfectHashDictionary {
    core: PackedAutomaton,
    trans_numbers: Vec<u64>,
    start_is_final: bool,
    total: u64,
}

/// Checks the packed-form invariants that a JSON blob cannot be trusted to
/// satisfy just because it parsed.
fn validate(core: &PackedAutomaton) -> Result<(), String> {
    if core.state_offsets.is_empty() {
        return Err("stateOffsets must contain at least one entry".to_string());
    }
    let num_states = core.num_states();
    for state in 0..num_states {
        let lo = core.state_offsets[state] as usize;
        let hi = core.state_offsets[state + 1] as usize;
        if lo > hi || hi > core.trans_chars.len() {
            return Err(format!("state {state} has an out-of-range offset range"));
        }
        for window in core.trans_chars[lo..hi].windows(2) {
            if window[0] >= window[1] {
                return Err(format!(
                    "transChars for state {state} are not strictly increasing"
                ));
            }
        }
        for &to in &core.trans_to[lo..hi] {
            if to as usize >= num_states {
                return Err(format!("transition from state {state} targets invalid state {to}"));
            }
        }
    }
    for &final_state in &core.final_states {
        if final_state as usize >= num_states {
            return Err(format!("finalStates contains invalid state {final_state}"));
        }
    }
    Ok(())
}

impl Dictionary {
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&SerializedDictionary {
            core: self.core.clone(),
        })
        .expect("serializing a packed dictionary never fails")
    }

    /// Parses a JSON blob produced by [`to_json`](Self::to_json). Panics
    /// if the JSON is malformed or violates the packed-form invariants.
    pub fn from_json(input: &str) -> Dictionary {
        let serialized: SerializedDictionary =
            serde_json::from_str(input).expect("failed to deserialize dictionary from JSON");
        validate(&serialized.core).expect("deserialized dictionary violates packed-form invariants");
        Dictionary {
            core: serialized.core,
        }
    }
}

impl PerfectHashDictionary {
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&SerializedPerfectHashDictionary {
            core: self.core.clone(),
            trans_numbers: self.trans_numbers.clone(),
            start_is_final: self.start_is_final,
            total: self.total,
        })
        .expect("serializing a packed dictionary never fails")
    }

    pub fn from_json(input: &str) -> PerfectHashDictionary {
        let serialized: SerializedPerfectHashDictionary = serde_json::from_str(input)
            .expect("failed to deserialize perfect-hash dictionary from JSON");
        validate(&serialized.core).expect("deserialized dictionary violates packed-form invariants");
        PerfectHashDictionary {
            core: serialized.core,
            trans_numbers: serialized.trans_numbers,
            start_is_final: serialized.start_is_final,
            total: serialized.total,
        }
    }
}
