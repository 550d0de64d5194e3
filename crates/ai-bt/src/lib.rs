//! Behaviour tree runtime built on `ai-core`.
//!
//! Every tick is a full, synchronous re-traversal from the root. Multi-frame
//! behaviour comes from leaves returning [`NodeState::Running`] and keeping their
//! own counters between ticks; composites hold no resume cursor.
//!
//! Each node owns one segment of the tree's [`ai_core::Blackboard`]. Leaves that
//! publish facts for sibling branches declare *where* with a [`ScopeSelector`],
//! which [`Tree::new`] resolves once, at construction.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod composite;
pub mod error;
pub mod leaf;
pub mod node;
pub mod scope;
pub mod tree;

pub use ai_core::NodeState;
pub use composite::{selector, sequence, Selector, Sequence};
pub use error::TreeError;
pub use leaf::Condition;
pub use node::Node;
pub use scope::{LeafScope, ScopeSelector};
pub use tree::Tree;
