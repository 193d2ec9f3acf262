//! the three matching procedures over the tree
//!
//! Each search consumes the matched part of its query in place, so the
//! caller can observe how far matching proceeded. All three descend
//! deterministically: sibling labels never share a first byte, so at
//! every vertex at most one child can extend the remaining query.

use super::Node;

/// Descend while some child label is a prefix of the remaining query.
///
/// Returns the deepest vertex reached; the residual query holds the
/// suffix that could not be consumed, empty exactly when the query is
/// representable on the descended path. Never fails, the start vertex
/// trivially matches the empty prefix.
pub fn approximate_match<'r>(start: &'r Node, key: &mut &[u8]) -> &'r Node {
	let mut node = start;
	while !key.is_empty() {
		match node.child_by_first_byte(key[0]) {
			Some((label, child)) if key.starts_with(label) => {
				*key = &key[label.len()..];
				node = child;
			},
			_ => break,
		}
	}
	node
}

/// Find the vertex whose subtree holds exactly the keys with the given
/// prefix.
///
/// Either [`approximate_match`] consumes the prefix entirely, or the
/// residual must itself be a prefix of a single child label; the query
/// is consumed entirely on success.
pub fn prefix_match<'r>(start: &'r Node, prefix: &mut &[u8]) -> Option<&'r Node> {
	let node = approximate_match(start, prefix);
	if prefix.is_empty() {
		return Some(node);
	}
	let (label, child) = node.child_by_first_byte(prefix[0])?;
	if label.starts_with(prefix) {
		*prefix = &[];
		return Some(child);
	}
	None
}

/// Find the vertex storing exactly `word`.
///
/// The vertex comes back only when the query is fully consumed *and* the
/// vertex is end-marked; callers never have to re-check the end mark.
pub fn exact_match<'r>(start: &'r Node, word: &mut &[u8]) -> Option<&'r Node> {
	let node = approximate_match(start, word);
	if word.is_empty() && node.is_end() {
		Some(node)
	} else {
		None
	}
}

// longest shared prefix of two byte strings
pub(crate) fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
	a.iter().zip(b).take_while(|(x, y)| x == y).count()
}
