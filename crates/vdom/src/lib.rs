//! Virtual UI trees and the differ that turns two of them into a patch
//! sequence.
//!
//! This crate is pure data plus one algorithm: it knows nothing about native
//! toolkits. The `reconciler` crate consumes the patches it produces.

pub mod diff;
pub mod node;
pub mod patch;
pub mod value;

pub use crate::diff::{diff, diff_from_empty, diff_into};
pub use crate::node::{
    ChangeListener, EventHandler, EventType, HandlerError, NodeType, PropertyName, VNode,
    VProperty,
};
pub use crate::patch::{Patch, PatchKind, PatchType};
pub use crate::value::Value;
