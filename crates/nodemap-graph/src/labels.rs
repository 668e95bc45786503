//! Display labels for map nodes.
//!
//! Labels are computed in two passes: count how often each base label
//! occurs, then number the repeats. A base label seen once is used as-is;
//! one seen `k` times becomes `"<base> (1)"` .. `"<base> (k)"` in node order.

use nodemap_core::Node;
use std::collections::HashMap;

/// Label used for nodes with no visible role.
const NO_ROLE: &str = "norole";

/// The roles of `role` that may be shown, in order.
pub fn display_roles<'a>(role: &'a [String], exclude_prefix: &str) -> Vec<&'a str> {
    role.iter()
        .map(String::as_str)
        .filter(|name| !name.starts_with(exclude_prefix))
        .collect()
}

/// Computes one label per node, in the same order as `nodes`.
///
/// With `show_hostnames` the node name heads the label, which already makes
/// every label unique. Without it labels are built from roles alone and
/// repeats are numbered.
pub fn assign_labels(nodes: &[Node], exclude_prefix: &str, show_hostnames: bool) -> Vec<String> {
    let bases: Vec<String> = nodes
        .iter()
        .map(|node| display_roles(&node.role, exclude_prefix).join("\n"))
        .collect();

    if show_hostnames {
        return nodes
            .iter()
            .zip(bases)
            .map(|(node, base)| format!("{}\n{}", node.name, base))
            .collect();
    }

    let bases: Vec<String> = bases
        .into_iter()
        .map(|base| if base.is_empty() { NO_ROLE.to_string() } else { base })
        .collect();

    let mut totals: HashMap<&str, usize> = HashMap::new();
    for base in &bases {
        *totals.entry(base.as_str()).or_default() += 1;
    }

    let mut seen: HashMap<&str, usize> = HashMap::new();
    bases
        .iter()
        .map(|base| {
            if totals[base.as_str()] == 1 {
                return base.clone();
            }
            let count = seen.entry(base.as_str()).or_default();
            *count += 1;
            format!("{} ({})", base, count)
        })
        .collect()
}
