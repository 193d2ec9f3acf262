//! cursor and iterator over the stored keys

use std::{
	fmt,
	ptr::NonNull,
};

use crate::tree::{
	prefix_match,
	Node,
};

use super::Set;

/// Bidirectional cursor over the stored keys of a [`Set`].
///
/// Either references a vertex or sits on the end position past the last
/// key. Stepping back from the end position lands on the last key, which
/// is why the cursor keeps a handle to the set.
#[derive(Clone, Copy)]
pub struct Cursor<'s> {
	set: &'s Set,
	node: Option<NonNull<Node>>,
}

impl<'s> Cursor<'s> {
	pub(super) fn at(set: &'s Set, node: &Node) -> Self {
		Self {
			set,
			node: Some(NonNull::from(node)),
		}
	}

	fn node(&self) -> Option<&'s Node> {
		// safety: the pointer was derived from a vertex borrowed out of
		// the set for 's, and the set cannot be mutated while that
		// borrow lives
		self.node.map(|node| unsafe { &*node.as_ptr() })
	}

	/// Whether the cursor sits on the end position.
	pub fn at_end(&self) -> bool {
		self.node.is_none()
	}

	/// The key the cursor references, `None` on the end position.
	pub fn key(&self) -> Option<Vec<u8>> {
		Some(self.node()?.key())
	}

	/// Step to the next key in order; past the last key the cursor moves
	/// to the end position and stays there.
	pub fn move_next(&mut self) {
		if let Some(node) = self.node() {
			let next = node.first_below().or_else(|| node.next_node());
			self.node = next.map(NonNull::from);
		}
	}

	/// Step to the previous key in order. From the end position this
	/// lands on the last key of the set; before the first key the cursor
	/// moves to the end position.
	pub fn move_prev(&mut self) {
		let previous = match self.node() {
			Some(node) => node.prev_node(),
			None => {
				let last = self.set.root().last_key();
				last.is_end().then_some(last)
			},
		};
		self.node = previous.map(NonNull::from);
	}

	/// Serialize the subtree below the cursor; the end position comes
	/// out as `{}`.
	pub fn to_json(&self, include_ends: bool) -> String {
		match self.node() {
			Some(node) => node.to_json(include_ends),
			None => String::from("{}"),
		}
	}
}

impl PartialEq for Cursor<'_> {
	// vertex identity, not key equality
	fn eq(&self, other: &Self) -> bool {
		self.node == other.node
	}
}

impl Eq for Cursor<'_> {}

impl fmt::Debug for Cursor<'_> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self.key() {
			Some(key) => write!(f, "Cursor({:?})", String::from_utf8_lossy(&key)),
			None => f.write_str("Cursor(end)"),
		}
	}
}

/// Double-ended iterator over stored keys in ascending order.
///
/// Yields reconstructed keys; the range is delimited by the next vertex
/// to visit and an exclusive upper bound, both advanced with the vertex
/// navigation primitives.
pub struct Iter<'s> {
	set: &'s Set,
	// next key to yield from the front; None is the range's end
	front: Option<NonNull<Node>>,
	// exclusive upper bound; None is the end of the whole tree
	back: Option<NonNull<Node>>,
	finished: bool,
}

impl<'s> Iter<'s> {
	pub(super) fn all(set: &'s Set) -> Self {
		Self {
			set,
			front: set.root().first_key().map(NonNull::from),
			back: None,
			finished: false,
		}
	}

	pub(super) fn below_prefix(set: &'s Set, prefix: &[u8]) -> Self {
		let mut rest = prefix;
		let bounds = prefix_match(set.root(), &mut rest).and_then(|node| {
			let first = node.first_key()?;
			Some((first, node.last_key().next_node()))
		});
		match bounds {
			Some((first, past)) => Self {
				set,
				front: Some(NonNull::from(first)),
				back: past.map(NonNull::from),
				finished: false,
			},
			None => Self {
				set,
				front: None,
				back: None,
				finished: true,
			},
		}
	}
}

impl Iterator for Iter<'_> {
	type Item = Vec<u8>;

	fn next(&mut self) -> Option<Vec<u8>> {
		if self.finished || self.front == self.back {
			self.finished = true;
			return None;
		}
		let front = self.front.expect("cursor ran past range end");
		// safety: see Cursor::node
		let node = unsafe { &*front.as_ptr() };
		self.front = node
			.first_below()
			.or_else(|| node.next_node())
			.map(NonNull::from);
		Some(node.key())
	}
}

impl DoubleEndedIterator for Iter<'_> {
	fn next_back(&mut self) -> Option<Vec<u8>> {
		if self.finished || self.front == self.back {
			self.finished = true;
			return None;
		}
		let node = match self.back {
			// safety: see Cursor::node
			Some(past) => unsafe { &*past.as_ptr() }
				.prev_node()
				.expect("non-empty range without predecessor"),
			None => {
				let last = self.set.root().last_key();
				debug_assert!(last.is_end());
				last
			},
		};
		self.back = Some(NonNull::from(node));
		Some(node.key())
	}
}
