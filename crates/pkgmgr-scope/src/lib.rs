//! Package Manager Scopes
//!
//! A forest of named configuration scopes. Each scope carries a small
//! registry of typed aspects; the variable-set aspect gives innermost-first
//! variable lookup across the parent chain.
//!
//! # Core Concepts
//!
//! - [`ScopeTree`]: Arena holding scopes; children owned by parents, parents
//!   referenced by [`ScopeId`]
//! - [`Aspect`]: Per-scope data module (clone / record changes / remove all)
//! - [`VariableSet`]: Variables declared at one scope
//! - [`build_hierarchy`]: Scopes from dotted package identifiers
//! - [`correlate`]: Pair current entries with prior ones, find orphans
//! - [`ChangeSet`]: Ordered persist/delete operations for the store
//!
//! # Example
//!
//! ```rust
//! use pkgmgr_scope::ScopeTree;
//! use pkgmgr_vars::{Variable, VariableRef};
//!
//! let mut tree = ScopeTree::new();
//! let top = tree.create_scope("Pkg", None);
//! let inner = tree.create_scope("Pkg.inner", Some(top));
//!
//! tree.store_variable(top, Variable::new("Pkg", "x").with_value("1"));
//!
//! // Lookup falls back to the parent scope
//! let found = tree.try_find_ref(inner, &VariableRef::new("Pkg", "x"));
//! assert!(found.is_some());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod aspect;
mod changes;
mod correlate;
mod error;
mod hierarchy;
mod tree;
mod variable_set;

pub use aspect::{Aspect, AspectRegistry};
pub use changes::{ChangeOp, ChangeSet};
pub use correlate::{correlate, Correlated, Correlation, PriorState};
pub use error::ScopeError;
pub use hierarchy::{build_hierarchy, split_dotted, ScopeIndex};
pub use tree::{Ancestors, Flatten, ScopeId, ScopeTree};
pub use variable_set::VariableSet;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
