//! radix tree vertices and the navigation primitives built on them
//!
//! Edges carry non-empty byte-string labels; every non-branching path is
//! compressed into a single edge. The path from the root to a vertex
//! spells the byte string the vertex represents.

use std::{
	collections::BTreeMap,
	fmt,
	ops::Bound,
	ptr::{
		self,
		NonNull,
	},
};

pub use self::lookup::{
	approximate_match,
	exact_match,
	prefix_match,
};

mod json;
mod lookup;

// What the owner of an edge has to do with the vertex below it after a
// removal, so paths stay compressed. Only the parent can execute a detach
// or merge, it owns the edge.
pub(crate) enum Shrink {
	Keep,
	Detach,
	Merge,
}

/// Vertex of a radix tree over byte strings.
///
/// `is_end` marks the represented string as stored. Children are owned
/// through an ordered map from edge label to boxed vertex; boxing keeps
/// vertex addresses stable, which is what makes the raw parent pointer
/// of a child valid for as long as its owner lives. Sibling labels never
/// share a first byte, so a query byte selects at most one child.
pub struct Node {
	is_end: bool,
	parent: Option<NonNull<Node>>,
	children: BTreeMap<Vec<u8>, Box<Node>>,
}

impl Node {
	pub(crate) fn new() -> Self {
		Self {
			is_end: false,
			parent: None,
			children: BTreeMap::new(),
		}
	}

	fn leaf(parent: NonNull<Node>) -> Box<Node> {
		Box::new(Self {
			is_end: true,
			parent: Some(parent),
			children: BTreeMap::new(),
		})
	}

	/// Whether the byte string this vertex represents is stored.
	#[inline]
	pub fn is_end(&self) -> bool {
		self.is_end
	}

	/// Parent vertex, `None` at the root.
	#[inline]
	pub fn parent(&self) -> Option<&Node> {
		// safety: a vertex's parent owns it through the children map and
		// therefore outlives it; shared access only
		self.parent.map(|parent| unsafe { &*parent.as_ptr() })
	}

	/// Child edges in ascending label order.
	pub fn children<'r>(&'r self) -> impl Iterator<Item = (&'r [u8], &'r Node)> {
		self.children
			.iter()
			.map(|(label, child)| (label.as_slice(), child.as_ref()))
	}

	/// Number of child edges.
	#[inline]
	pub fn child_count(&self) -> usize {
		self.children.len()
	}

	// the only child whose label could extend a query starting with `byte`
	pub(crate) fn child_by_first_byte<'r>(&'r self, byte: u8) -> Option<(&'r [u8], &'r Node)> {
		let (label, child) = self
			.children
			.range::<[u8], _>((Bound::Included(&[byte][..]), Bound::Unbounded))
			.next()?;
		if label[0] == byte {
			Some((label.as_slice(), child.as_ref()))
		} else {
			None
		}
	}

	/// Locate a child by identity, returning its edge label.
	///
	/// Fan-out is bounded by the byte alphabet, a linear scan is fine.
	pub fn find_child<'r>(&'r self, target: &Node) -> Option<(&'r [u8], &'r Node)> {
		self.children().find(|&(_, child)| ptr::eq(child, target))
	}

	fn first_child(&self) -> Option<&Node> {
		self.children.values().next().map(Box::as_ref)
	}

	fn last_child(&self) -> Option<&Node> {
		self.children.values().next_back().map(Box::as_ref)
	}

	// immediate right sibling of `target`, by identity
	fn child_after(&self, target: &Node) -> Option<&Node> {
		let mut found = false;
		for child in self.children.values() {
			if found {
				return Some(child.as_ref());
			}
			found = ptr::eq(child.as_ref(), target);
		}
		None
	}

	// immediate left sibling of `target`, by identity
	fn child_before(&self, target: &Node) -> Option<&Node> {
		let mut previous: Option<&Node> = None;
		for child in self.children.values() {
			if ptr::eq(child.as_ref(), target) {
				return previous;
			}
			previous = Some(child.as_ref());
		}
		None
	}

	/// Smallest stored key in this subtree, the vertex itself included;
	/// `None` only on the root of an empty tree.
	pub fn first_key(&self) -> Option<&Node> {
		if self.is_end {
			return Some(self);
		}
		self.first_below()
	}

	/// Smallest stored key strictly below this vertex.
	pub fn first_below(&self) -> Option<&Node> {
		let mut node = self.first_child()?;
		loop {
			if node.is_end {
				return Some(node);
			}
			// leftmost descent ends at a leaf, and leaves are end-marked
			node = node.first_child().expect("leaf without end mark");
		}
	}

	/// Largest stored key in this subtree.
	///
	/// The rightmost descent always ends at a leaf; only on the root of
	/// an empty tree does the result come back without an end mark.
	pub fn last_key(&self) -> &Node {
		let mut node = self;
		while let Some(child) = node.last_child() {
			node = child;
		}
		node
	}

	/// Next stored key in order that is not part of this subtree.
	///
	/// Walks up while this vertex is the rightmost child, then descends
	/// to the first key of the right sibling; `None` past the last key.
	pub fn next_node(&self) -> Option<&Node> {
		let mut node = self;
		loop {
			let parent = node.parent()?;
			if let Some(sibling) = parent.child_after(node) {
				return sibling.first_key();
			}
			node = parent;
		}
	}

	/// Previous stored key in order; `None` before the first key.
	///
	/// An end-marked ancestor immediately precedes everything in its
	/// subtree, so the upward walk stops at the first one it crosses.
	pub fn prev_node(&self) -> Option<&Node> {
		let mut node = self;
		loop {
			let parent = node.parent()?;
			if let Some(sibling) = parent.child_before(node) {
				return Some(sibling.last_key());
			}
			if parent.is_end {
				return Some(parent);
			}
			node = parent;
		}
	}

	/// Reconstruct the byte string this vertex represents.
	///
	/// Walks up to the root collecting edge labels and concatenates them
	/// in reverse.
	pub fn key(&self) -> Vec<u8> {
		let mut labels: Vec<&[u8]> = Vec::new();
		let mut node = self;
		while let Some(parent) = node.parent() {
			let (label, _) = parent
				.find_child(node)
				.expect("parent link without owning edge");
			labels.push(label);
			node = parent;
		}
		let mut key = Vec::with_capacity(labels.iter().map(|label| label.len()).sum());
		for label in labels.iter().rev() {
			key.extend_from_slice(label);
		}
		key
	}

	/// Number of stored keys in this subtree, the vertex itself included.
	pub fn key_count(&self) -> usize {
		let mut count = usize::from(self.is_end);
		for child in self.children.values() {
			count += child.key_count();
		}
		count
	}

	/// Serialize the subtree below this vertex to JSON.
	///
	/// Labels appear in ascending order, so the output is stable. Without
	/// end markers the subtree is written purely as nested label maps and
	/// an empty subtree comes out as `{}`; with end markers every vertex
	/// becomes `{"end": .., "children": ..}`, the root included, so a
	/// stored empty key stays visible.
	pub fn to_json(&self, include_ends: bool) -> String {
		json::to_string(self, include_ends)
	}

	pub(crate) fn reset(&mut self) {
		self.is_end = false;
		self.children.clear();
	}

	// insert the remaining `key` below this vertex; true when newly added
	pub(crate) fn insert_rec(&mut self, key: &[u8]) -> bool {
		if key.is_empty() {
			let inserted = !self.is_end;
			self.is_end = true;
			return inserted;
		}
		let matched = self
			.child_by_first_byte(key[0])
			.map(|(label, _)| (label.to_vec(), key.starts_with(label)));
		match matched {
			None => {
				// no child shares a first byte with the rest, attach a leaf
				let leaf = Node::leaf(NonNull::from(&mut *self));
				self.children.insert(key.to_vec(), leaf);
				true
			},
			Some((label, true)) => {
				let rest = &key[label.len()..];
				self.children
					.get_mut(label.as_slice())
					.expect("edge without child")
					.insert_rec(rest)
			},
			Some((label, false)) => {
				self.split_child(key, label);
				true
			},
		}
	}

	// split the edge to the child labelled `label` where it diverges from
	// `key`, interposing a junction that carries the shared part
	fn split_child(&mut self, key: &[u8], label: Vec<u8>) {
		let common = lookup::common_prefix_len(key, &label);
		debug_assert!(common > 0 && common < label.len());

		let mut child = self.children.remove(&label).expect("edge without child");
		let mut junction = Box::new(Node {
			is_end: key.len() == common,
			parent: Some(NonNull::from(&mut *self)),
			children: BTreeMap::new(),
		});
		child.parent = Some(NonNull::from(&mut *junction));
		junction.children.insert(label[common..].to_vec(), child);
		if key.len() > common {
			let leaf = Node::leaf(NonNull::from(&mut *junction));
			junction.children.insert(key[common..].to_vec(), leaf);
		}
		self.children.insert(label[..common].to_vec(), junction);
	}

	// how the owner of the edge to this vertex has to compress it after a
	// removal below; the root is never detached or merged away
	fn shrink_request(&self, is_root: bool) -> Shrink {
		if is_root || self.is_end {
			return Shrink::Keep;
		}
		match self.children.len() {
			0 => Shrink::Detach,
			1 => Shrink::Merge,
			_ => Shrink::Keep,
		}
	}

	// replace the child labelled `label` by its only child, concatenating
	// the two edge labels
	fn merge_child(&mut self, label: &[u8]) {
		let child = self.children.remove(label).expect("edge without child");
		debug_assert!(!child.is_end);
		debug_assert_eq!(child.children.len(), 1);
		let (sub_label, mut grandchild) = child
			.children
			.into_iter()
			.next()
			.expect("merge of childless vertex");
		let mut merged = label.to_vec();
		merged.extend_from_slice(&sub_label);
		grandchild.parent = Some(NonNull::from(&mut *self));
		self.children.insert(merged, grandchild);
	}

	// remove the remaining `key` from this subtree; None when absent
	pub(crate) fn remove_rec(&mut self, key: &[u8], is_root: bool) -> Option<Shrink> {
		if key.is_empty() {
			if !self.is_end {
				return None;
			}
			self.is_end = false;
			return Some(self.shrink_request(is_root));
		}
		let label = match self.child_by_first_byte(key[0]) {
			Some((label, _)) if key.starts_with(label) => label.to_vec(),
			_ => return None,
		};
		let request = self
			.children
			.get_mut(label.as_slice())
			.expect("edge without child")
			.remove_rec(&key[label.len()..], false)?;
		match request {
			Shrink::Keep => Some(Shrink::Keep),
			Shrink::Merge => {
				self.merge_child(&label);
				Some(Shrink::Keep)
			},
			Shrink::Detach => {
				self.children.remove(&label);
				Some(self.shrink_request(is_root))
			},
		}
	}

	// detach the subtree holding every key with the remaining non-empty
	// `prefix`; returns the number of keys dropped, None when no key has
	// the prefix
	pub(crate) fn remove_prefix_rec(
		&mut self,
		prefix: &[u8],
		is_root: bool,
	) -> Option<(usize, Shrink)> {
		debug_assert!(!prefix.is_empty());
		let (label, roots_prefix) = match self.child_by_first_byte(prefix[0]) {
			Some((label, _)) if label.starts_with(prefix) => (label.to_vec(), true),
			Some((label, _)) if prefix.starts_with(label) => (label.to_vec(), false),
			_ => return None,
		};
		if roots_prefix {
			let child = self.children.remove(&label).expect("edge without child");
			return Some((child.key_count(), self.shrink_request(is_root)));
		}
		let (dropped, request) = self
			.children
			.get_mut(label.as_slice())
			.expect("edge without child")
			.remove_prefix_rec(&prefix[label.len()..], false)?;
		let own = match request {
			Shrink::Keep => Shrink::Keep,
			Shrink::Merge => {
				self.merge_child(&label);
				Shrink::Keep
			},
			Shrink::Detach => {
				self.children.remove(&label);
				self.shrink_request(is_root)
			},
		};
		Some((dropped, own))
	}

	// deep copy with every parent pointer cleared; the copy gets wired up
	// once its vertices have their final addresses
	pub(crate) fn clone_subtree(&self) -> Node {
		Node {
			is_end: self.is_end,
			parent: None,
			children: self
				.children
				.iter()
				.map(|(label, child)| (label.clone(), Box::new(child.clone_subtree())))
				.collect(),
		}
	}

	pub(crate) fn rewire_children(&mut self) {
		let parent = NonNull::from(&mut *self);
		for child in self.children.values_mut() {
			child.parent = Some(parent);
			child.rewire_children();
		}
	}

	/// Verify the structural invariants of this subtree (debug builds
	/// only). Panics on violation; the test suites call this after
	/// mutations.
	#[cfg(debug_assertions)]
	pub fn check_invariants(&self) {
		self.check_subtree(self.parent.is_none());
	}

	#[cfg(debug_assertions)]
	fn check_subtree(&self, is_root: bool) {
		if !is_root && !self.is_end {
			assert!(self.children.len() >= 2, "degenerate interior vertex");
		}
		let mut last_first_byte: Option<u8> = None;
		for (label, child) in &self.children {
			assert!(!label.is_empty(), "empty edge label");
			if let Some(previous) = last_first_byte {
				assert!(previous < label[0], "siblings share a first byte");
			}
			last_first_byte = Some(label[0]);
			let up = child.parent.expect("missing parent link");
			assert!(ptr::eq(up.as_ptr(), self), "broken parent link");
			child.check_subtree(false);
		}
	}
}

impl PartialEq for Node {
	// deep structural equality; both children maps are ordered by label,
	// so the map comparison is one parallel scan
	fn eq(&self, other: &Self) -> bool {
		self.is_end == other.is_end && self.children == other.children
	}
}

impl Eq for Node {}

impl fmt::Debug for Node {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str(&self.to_json(true))
	}
}
