//! stable JSON form of a subtree
//!
//! Children are visited in label order, so equal trees always render to
//! the same string and tests can compare shapes textually.

use serde::ser::{
	Serialize,
	SerializeMap,
	Serializer,
};

use super::Node;

// nested label to subtree objects; an empty subtree is `{}`
struct Plain<'r>(&'r Node);

// `{"end": bool, "children": {...}}` on every vertex, the root included
struct Flagged<'r>(&'r Node);

impl Serialize for Plain<'_> {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut map = serializer.serialize_map(Some(self.0.child_count()))?;
		for (label, child) in self.0.children() {
			map.serialize_entry(&String::from_utf8_lossy(label), &Plain(child))?;
		}
		map.end()
	}
}

impl Serialize for Flagged<'_> {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		struct Children<'r>(&'r Node);

		impl Serialize for Children<'_> {
			fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
				let mut map = serializer.serialize_map(Some(self.0.child_count()))?;
				for (label, child) in self.0.children() {
					map.serialize_entry(&String::from_utf8_lossy(label), &Flagged(child))?;
				}
				map.end()
			}
		}

		let mut map = serializer.serialize_map(Some(2))?;
		map.serialize_entry("end", &self.0.is_end())?;
		map.serialize_entry("children", &Children(self.0))?;
		map.end()
	}
}

pub(super) fn to_string(node: &Node, include_ends: bool) -> String {
	let rendered = if include_ends {
		serde_json::to_string(&Flagged(node))
	} else {
		serde_json::to_string(&Plain(node))
	};
	rendered.expect("in-memory serialization")
}
