//! Deterministic structural hashing for cache keys.
//!
//! Structurally-equal inputs must produce identical strings regardless of
//! object key insertion order; structurally-different inputs must (with
//! overwhelming probability) produce different ones. The rendering is the
//! canonical compact JSON form with object entries sorted by key.

use serde::Serialize;
use serde_json::Value;

/// Maximum nesting depth rendered before truncation.
///
/// Subtrees nested deeper than this render as [`DEPTH_MARKER`] so that
/// pathological shapes can never overflow the stack. Hashing stays total.
pub const MAX_DEPTH: usize = 64;

/// Marker substituted for any subtree beyond [`MAX_DEPTH`].
pub const DEPTH_MARKER: &str = "<depth-limit>";

/// Renders the canonical string form of `value`.
///
/// Scalars render via their JSON literal form, arrays element-wise in
/// order, and objects with entries sorted lexicographically by key.
pub fn stable_hash(value: &Value) -> String {
	let mut out = String::new();
	render(value, 0, &mut out);
	out
}

/// Canonicalizes any serializable input through [`serde_json::to_value`].
pub fn stable_hash_of<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
	Ok(stable_hash(&serde_json::to_value(value)?))
}

fn render(value: &Value, depth: usize, out: &mut String) {
	if depth > MAX_DEPTH {
		out.push_str(DEPTH_MARKER);
		return;
	}
	match value {
		Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {
			// Display for scalar Values is the compact JSON literal.
			out.push_str(&value.to_string());
		}
		Value::Array(items) => {
			out.push('[');
			for (i, item) in items.iter().enumerate() {
				if i > 0 {
					out.push(',');
				}
				render(item, depth + 1, out);
			}
			out.push(']');
		}
		Value::Object(map) => {
			let mut entries: Vec<(&String, &Value)> = map.iter().collect();
			entries.sort_by(|a, b| a.0.cmp(b.0));
			out.push('{');
			for (i, (key, item)) in entries.iter().enumerate() {
				if i > 0 {
					out.push(',');
				}
				out.push_str(&Value::String((*key).clone()).to_string());
				out.push(':');
				render(item, depth + 1, out);
			}
			out.push('}');
		}
	}
}
