//! Text snapshots of routing state.
//!
//! Plain-text renderings of the active view chain and the route table,
//! stable enough for `insta` inline snapshots and string assertions.

use crate::router::{ParameterKind, ParameterSegment, RouteConfiguration};
use crate::ui::Ui;

/// Strip the module path from a type name: `app::views::Shell` → `Shell`.
///
/// Generic arguments are left alone.
pub fn short_type_name(name: &str) -> &str {
    let base = name.split('<').next().unwrap_or(name);
    match base.rfind("::") {
        Some(index) => &name[index + 2..],
        None => name,
    }
}

/// The active chain, outermost parent first: `"Shell > Section > Page"`.
///
/// Empty when nothing is displayed.
pub fn chain_to_string(ui: &Ui) -> String {
    ui.active_chain()
        .iter()
        .rev()
        .filter_map(|&id| ui.view_type_name(id))
        .map(short_type_name)
        .collect::<Vec<_>>()
        .join(" > ")
}

/// One parameter segment in route pattern notation.
///
/// Required `:id`, optional `:id?`, wildcard `*rest`.
pub fn parameter_to_string(parameter: &ParameterSegment) -> String {
    match parameter.kind() {
        ParameterKind::Required => format!(":{}", parameter.name()),
        ParameterKind::Optional => format!(":{}?", parameter.name()),
        ParameterKind::Wildcard => format!("*{}", parameter.name()),
    }
}

/// The route table, one route per line in path order.
///
/// ```text
/// /          -> Home
/// /users/:id -> UserPage in Shell
/// ```
pub fn routes_to_string(config: &RouteConfiguration) -> String {
    let rows: Vec<(String, String)> = config
        .entries()
        .map(|entry| {
            let mut pattern = format!("/{}", entry.path());
            for parameter in entry.parameters() {
                if !pattern.ends_with('/') {
                    pattern.push('/');
                }
                pattern.push_str(&parameter_to_string(parameter));
            }

            let mut target = short_type_name(entry.target().name()).to_owned();
            if !entry.parents().is_empty() {
                let parents: Vec<_> = entry
                    .parents()
                    .iter()
                    .map(|parent| short_type_name(parent.name()))
                    .collect();
                target.push_str(" in ");
                target.push_str(&parents.join(" < "));
            }
            (pattern, target)
        })
        .collect();

    let width = rows.iter().map(|(pattern, _)| pattern.len()).max().unwrap_or(0);
    rows.iter()
        .map(|(pattern, target)| format!("{pattern:<width$} -> {target}"))
        .collect::<Vec<_>>()
        .join("\n")
}

// ===========================================================================
// Tests
// ===========================================================================
