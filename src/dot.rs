//! Graphviz rendering.

use std::fmt::Write;

use crate::pack::PackedAutomaton;

/// Renders `core` as a `digraph` suitable for Graphviz. Final states are
/// drawn with `peripheries=2`; each transition is labeled with its code
/// unit.
pub fn to_dot(core: &PackedAutomaton) -> String {
    let mut dot = String::new();
    dot.push_str("digraph G {\n");
    dot.push_str("  rankdir=LR;\n");
    dot.push_str("  node [shape=circle];\n");

    for state in 0..core.num_states() as u32 {
        let peripheries = if core.is_final(state) { 2 } else { 1 };
        writeln!(
            dot,
            "  {state} [label=\"{state}\", peripheries={peripheries}];"
        )
        .expect("writing to a String never fails");
    }

    for state in 0..core.num_states() as u32 {
        let lo = core.state_offsets[state as usize] as usize;
        let hi = core.state_offsets[state as usize + 1] as usize;
        for t in lo..hi {
            let label = char::from_u32(core.trans_chars[t] as u32)
                .map(|c| c.to_string())
                .unwrap_or_else(|| format!("U+{:04X}", core.trans_chars[t]));
            writeln!(
                dot,
                "  {state} -> {to} [label=\"{label}\"];",
                to = core.trans_to[t]
            )
            .expect("writing to a String never fails");
        }
    }

    dot.push_str("}\n");
    dot
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Builder;
    use crate::state::StateArena;

    #[test]
    fn final_states_get_double_peripheries() {
        let arena = StateArena::new();
        let mut builder = Builder::new(&arena);
        builder.add("cat").unwrap();
        let dot = builder.to_dot();
        assert!(dot.starts_with("digraph G {\n"));
        assert!(dot.contains("peripheries=2"));
        assert!(dot.contains("label=\"c\""));
    }
}
