//! Human-readable rendering for `--format text`

use colored::Colorize;
use lineage_core::{Lineage, NeighborRef};

pub fn render_text(lineage: &Lineage) -> String {
    let mut out = String::new();

    out.push_str(&format!("{} {}\n", "Model:".bold(), describe(&lineage.current).green()));
    push_section(&mut out, "Upstream", &lineage.upstream);
    push_section(&mut out, "Downstream", &lineage.downstream);

    out.trim_end().to_string()
}

fn push_section(out: &mut String, title: &str, neighbors: &[NeighborRef]) {
    out.push('\n');
    out.push_str(&format!("{}\n", format!("{} ({}):", title, neighbors.len()).bold()));

    if neighbors.is_empty() {
        out.push_str(&format!("  {}\n", "(none)".dimmed()));
        return;
    }

    for neighbor in neighbors {
        out.push_str(&format!("  - {}\n", describe(neighbor).yellow()));
    }
}

fn describe(neighbor: &NeighborRef) -> String {
    match &neighbor.path {
        Some(path) => format!("{} ({})", neighbor.name, path),
        None => neighbor.name.clone(),
    }
}
