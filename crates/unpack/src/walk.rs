//! Reference discovery in decrypted model graphs.

use lpk_archive::{find_content_hash, is_content_hash};
use serde_json::Value;

const SUB_GRAPH_COMMAND: &str = "change_cos";

/// An archive member a model graph points at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Reference {
    /// Another full model graph sharing the referencing graph's directory.
    SubGraph(String),
    /// A plain resource, with the structural path it was found under.
    Resource { name: String, hint: String },
}

/// Calls `visit` with the `_`-joined structural path of every string leaf.
pub(crate) fn visit_strings<'v>(value: &'v Value, visit: &mut impl FnMut(&str, &'v str)) {
    fn walk<'v>(value: &'v Value, path: &mut Vec<String>, visit: &mut impl FnMut(&str, &'v str)) {
        match value {
            Value::Object(map) => {
                for (key, child) in map {
                    path.push(key.clone());
                    walk(child, path, visit);
                    path.pop();
                }
            },
            Value::Array(items) => {
                for (index, child) in items.iter().enumerate() {
                    path.push(index.to_string());
                    walk(child, path, visit);
                    path.pop();
                }
            },
            Value::String(s) => visit(&path.join("_"), s),
            Value::Null | Value::Bool(_) | Value::Number(_) => {},
        }
    }
    walk(value, &mut Vec::new(), visit);
}

fn is_command_path(path: &str) -> bool {
    let path = path.to_ascii_lowercase();
    path.ends_with("_command") || path.ends_with("_postcommand")
}

/// Collects every reference in `graph`, in document order.
///
/// Command fields hold `;`-separated sub-commands. A sub-command starting
/// with `change_cos` names a sub-graph; any other embedded member name is a
/// resource tagged `<path>#<n>` after its sub-command index.
pub(crate) fn references(graph: &Value) -> Vec<Reference> {
    let mut found = Vec::new();
    visit_strings(graph, &mut |path, value| {
        if is_command_path(path) && !value.is_empty() {
            for (index, command) in value.split(';').enumerate() {
                let Some(name) = find_content_hash(command) else {
                    continue;
                };
                found.push(match command.trim_start().starts_with(SUB_GRAPH_COMMAND) {
                    true => Reference::SubGraph(name.to_string()),
                    false => Reference::Resource { name: name.to_string(), hint: format!("{path}#{index}") },
                });
            }
        } else if is_content_hash(value) {
            found.push(Reference::Resource { name: value.to_string(), hint: path.to_string() });
        }
    });
    found
}
