//! ordered set of byte strings backed by a radix tree
//!
//! Every query of the [`set::Set`] container comes in a prefix-scoped
//! variant answered from the vertex rooting the prefix, not by scanning
//! stored keys.
#![warn(missing_docs)]
#![doc(html_root_url = "https://docs.rs/radix-set/0.1.0")]

pub mod set;
pub mod tree;
