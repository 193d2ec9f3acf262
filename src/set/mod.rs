//! [`Set`] of byte strings with prefix-scoped queries

use std::{
	cmp::Ordering,
	fmt,
	ops::{
		Add,
		AddAssign,
		Sub,
		SubAssign,
	},
};

use crate::tree::{
	exact_match,
	prefix_match,
	Node,
};

pub use self::iter::{
	Cursor,
	Iter,
};

mod iter;

/// Ordered set of byte strings backed by a radix tree.
///
/// Keys are finite byte sequences compared lexicographically; the empty
/// key is admissible and is represented by an end mark on the root.
/// Emptiness, cardinality, search, deletion and ranged iteration all
/// come in a prefix-scoped variant answered from the vertex rooting the
/// prefix.
///
/// Byte-keyed entry points accept anything viewable as bytes, so `&str`
/// works directly:
///
/// ```
/// use radix_set::set::Set;
///
/// let mut set = Set::new();
/// set.insert("corn");
/// set.insert("corner");
/// assert_eq!(set.prefix_len("cor"), 2);
/// ```
pub struct Set {
	root: Box<Node>,
}

// parent links inside the tree are raw pointers, which suppresses the
// auto impls; the tree is owned exclusively through `root` and has no
// interior mutability
unsafe impl Send for Set {}
unsafe impl Sync for Set {}

impl Set {
	/// New (empty) set.
	pub fn new() -> Self {
		Self {
			root: Box::new(Node::new()),
		}
	}

	/// Read-only access to the root of the tree.
	pub fn root(&self) -> &Node {
		&self.root
	}

	/// Number of stored keys.
	pub fn len(&self) -> usize {
		self.root.key_count()
	}

	/// Whether no key is stored.
	pub fn is_empty(&self) -> bool {
		!self.root.is_end() && self.root.child_count() == 0
	}

	/// Number of stored keys starting with `prefix`.
	pub fn prefix_len(&self, prefix: impl AsRef<[u8]>) -> usize {
		let mut rest = prefix.as_ref();
		match prefix_match(&self.root, &mut rest) {
			Some(node) => node.key_count(),
			None => 0,
		}
	}

	/// Whether no stored key starts with `prefix`.
	pub fn prefix_is_empty(&self, prefix: impl AsRef<[u8]>) -> bool {
		let mut rest = prefix.as_ref();
		match prefix_match(&self.root, &mut rest) {
			// only the root of an empty tree can lack both an end mark
			// and children
			Some(node) => !node.is_end() && node.child_count() == 0,
			None => true,
		}
	}

	/// Whether `key` is stored.
	pub fn contains(&self, key: impl AsRef<[u8]>) -> bool {
		let mut rest = key.as_ref();
		exact_match(&self.root, &mut rest).is_some()
	}

	/// Cursor at `key`, or `None` when it is not stored.
	pub fn find(&self, key: impl AsRef<[u8]>) -> Option<Cursor<'_>> {
		let mut rest = key.as_ref();
		let node = exact_match(&self.root, &mut rest)?;
		Some(Cursor::at(self, node))
	}

	/// Cursor at the smallest stored key starting with `prefix`, or
	/// `None` when there is none.
	pub fn find_prefix(&self, prefix: impl AsRef<[u8]>) -> Option<Cursor<'_>> {
		let mut rest = prefix.as_ref();
		let node = prefix_match(&self.root, &mut rest)?;
		Some(Cursor::at(self, node.first_key()?))
	}

	/// Insert `key`; returns whether it was newly inserted.
	///
	/// When the key diverges in the middle of an edge label the edge is
	/// split at the longest common prefix and a junction vertex carries
	/// the shared part.
	pub fn insert(&mut self, key: impl AsRef<[u8]>) -> bool {
		self.root.insert_rec(key.as_ref())
	}

	/// Remove `key`; returns whether it was present.
	///
	/// A vertex left childless is detached, and a vertex left with a
	/// single child and no end mark is merged with its neighbour edge,
	/// so paths stay compressed.
	pub fn remove(&mut self, key: impl AsRef<[u8]>) -> bool {
		self.root.remove_rec(key.as_ref(), true).is_some()
	}

	/// Remove every key starting with `prefix`; returns how many keys
	/// were dropped.
	pub fn remove_prefix(&mut self, prefix: impl AsRef<[u8]>) -> usize {
		let prefix = prefix.as_ref();
		if prefix.is_empty() {
			let dropped = self.len();
			self.clear();
			return dropped;
		}
		match self.root.remove_prefix_rec(prefix, true) {
			Some((dropped, _)) => dropped,
			None => 0,
		}
	}

	/// Drop all keys.
	pub fn clear(&mut self) {
		self.root.reset();
	}

	/// Smallest stored key.
	pub fn first(&self) -> Option<Vec<u8>> {
		Some(self.root.first_key()?.key())
	}

	/// Largest stored key.
	pub fn last(&self) -> Option<Vec<u8>> {
		let last = self.root.last_key();
		last.is_end().then(|| last.key())
	}

	/// Iterate over all keys in ascending order.
	pub fn iter(&self) -> Iter<'_> {
		Iter::all(self)
	}

	/// Iterate in ascending order over the keys starting with `prefix`.
	pub fn iter_prefix(&self, prefix: impl AsRef<[u8]>) -> Iter<'_> {
		Iter::below_prefix(self, prefix.as_ref())
	}

	/// Insert every key of `other`.
	pub fn union_with(&mut self, other: &Set) {
		for key in other {
			self.insert(key);
		}
	}

	/// Remove every key of `other`.
	pub fn difference_with(&mut self, other: &Set) {
		for key in other {
			self.remove(key);
		}
	}

	/// Whether every key of `self` is stored in `other`.
	pub fn is_subset(&self, other: &Set) -> bool {
		if self.len() > other.len() {
			return false;
		}
		// both streams are ordered, one merge-style scan suffices
		let mut theirs = other.iter();
		let mut candidate = theirs.next();
		for key in self {
			loop {
				match &candidate {
					None => return false,
					Some(other_key) => match other_key.cmp(&key) {
						Ordering::Less => candidate = theirs.next(),
						Ordering::Equal => break,
						Ordering::Greater => return false,
					},
				}
			}
		}
		true
	}

	/// Whether every key of `other` is stored in `self`.
	pub fn is_superset(&self, other: &Set) -> bool {
		other.is_subset(self)
	}

	/// Serialize the tree to JSON; see [`Node::to_json`].
	pub fn to_json(&self, include_ends: bool) -> String {
		self.root.to_json(include_ends)
	}

	/// Verify all structural invariants, panicking on violation; a no-op
	/// in release builds.
	pub fn check_invariants(&self) {
		#[cfg(debug_assertions)]
		self.root.check_invariants();
	}
}

impl Default for Set {
	fn default() -> Self {
		Self::new()
	}
}

impl Clone for Set {
	fn clone(&self) -> Self {
		let mut root = Box::new(self.root.clone_subtree());
		root.rewire_children();
		Self { root }
	}
}

impl PartialEq for Set {
	fn eq(&self, other: &Self) -> bool {
		self.root == other.root
	}
}

impl Eq for Set {}

impl PartialOrd for Set {
	// ordered by inclusion: `a < b` means `a` is a proper subset of `b`;
	// sets that each hold a key the other lacks are incomparable
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		match self.len().cmp(&other.len()) {
			Ordering::Less => self.is_subset(other).then_some(Ordering::Less),
			Ordering::Greater => other.is_subset(self).then_some(Ordering::Greater),
			Ordering::Equal => (self == other).then_some(Ordering::Equal),
		}
	}
}

impl fmt::Debug for Set {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.debug_set()
			.entries(self.iter().map(|key| String::from_utf8_lossy(&key).into_owned()))
			.finish()
	}
}

impl<K: AsRef<[u8]>> FromIterator<K> for Set {
	fn from_iter<I: IntoIterator<Item = K>>(keys: I) -> Self {
		let mut set = Set::new();
		set.extend(keys);
		set
	}
}

impl<K: AsRef<[u8]>> Extend<K> for Set {
	fn extend<I: IntoIterator<Item = K>>(&mut self, keys: I) {
		for key in keys {
			self.insert(key);
		}
	}
}

impl<'s> IntoIterator for &'s Set {
	type IntoIter = Iter<'s>;
	type Item = Vec<u8>;

	fn into_iter(self) -> Iter<'s> {
		self.iter()
	}
}

impl AddAssign<&Set> for Set {
	fn add_assign(&mut self, other: &Set) {
		self.union_with(other);
	}
}

impl SubAssign<&Set> for Set {
	fn sub_assign(&mut self, other: &Set) {
		self.difference_with(other);
	}
}

impl Add<&Set> for &Set {
	type Output = Set;

	fn add(self, other: &Set) -> Set {
		let mut union = self.clone();
		union.union_with(other);
		union
	}
}

impl Add<&Set> for Set {
	type Output = Set;

	fn add(mut self, other: &Set) -> Set {
		self.union_with(other);
		self
	}
}

impl Sub<&Set> for &Set {
	type Output = Set;

	fn sub(self, other: &Set) -> Set {
		let mut difference = self.clone();
		difference.difference_with(other);
		difference
	}
}

impl Sub<&Set> for Set {
	type Output = Set;

	fn sub(mut self, other: &Set) -> Set {
		self.difference_with(other);
		self
	}
}
