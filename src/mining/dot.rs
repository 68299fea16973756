//! Graphviz rendering of the discovered directly-follows graph.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::mining::dfg::DfgModel;

/// Render the DFG as a Graphviz digraph. Start and end activities hang off
/// dedicated pseudo-nodes so the process boundaries are visible.
pub fn render_dfg(model: &DfgModel) -> String {
    let mut out = String::from("digraph dfg {\n  rankdir=LR;\n  node [shape=box];\n");
    out.push_str("  __start [shape=circle, label=\"\", style=filled, fillcolor=green];\n");
    out.push_str("  __end [shape=doublecircle, label=\"\", style=filled, fillcolor=orange];\n");
    for (activity, count) in &model.start_activities {
        let _ = writeln!(out, "  __start -> {} [label=\"{count}\"];", quote(activity));
    }
    for ((from, to), count) in &model.edges {
        let _ = writeln!(out, "  {} -> {} [label=\"{count}\"];", quote(from), quote(to));
    }
    for (activity, count) in &model.end_activities {
        let _ = writeln!(out, "  {} -> __end [label=\"{count}\"];", quote(activity));
    }
    out.push_str("}\n");
    out
}

pub fn write_dfg(model: &DfgModel, path: impl AsRef<Path>) -> std::io::Result<()> {
    fs::write(path, render_dfg(model))
}

fn quote(label: &str) -> String {
    format!("\"{}\"", label.replace('\\', "\\\\").replace('"', "\\\""))
}
