//! Patch protocol between the differ and the patcher.
//!
//! Invariants:
//! - Patches are applied in order.
//! - `path` is the child-index path from the root to the affected node; the
//!   empty path addresses the root itself, and the last element is the node's
//!   index within its parent's child sequence.
//! - Paths are computed against the pre-edit arrangement. Inserts and removals
//!   only ever touch trailing positions of a child list, so an applier only has
//!   to track removed positions per parent to keep later indices valid.
//! - Within one node: property patches, then handler patches, then child
//!   patches in ascending index, each child's nested patches complete before
//!   the next index. Trailing `Removed` patches come last, ascending.
//! - `Replaced` and `Inserted` carry the complete subtree to build.

use crate::node::{EventHandler, EventType, PropertyName, VNode, VProperty};
use std::fmt;

/// Discriminant of a [`PatchKind`], convenient for assertions and logging.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PatchType {
    Replaced,
    Inserted,
    Removed,
    PropertyUpdated,
    PropertyRemoved,
    HandlerUpdated,
    HandlerRemoved,
}

impl fmt::Display for PatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PatchType::Replaced => "REPLACED",
            PatchType::Inserted => "INSERTED",
            PatchType::Removed => "REMOVED",
            PatchType::PropertyUpdated => "PROPERTY_UPDATED",
            PatchType::PropertyRemoved => "PROPERTY_REMOVED",
            PatchType::HandlerUpdated => "HANDLER_UPDATED",
            PatchType::HandlerRemoved => "HANDLER_REMOVED",
        };
        f.write_str(name)
    }
}

pub enum PatchKind<A> {
    /// Rebuild the node at `path` from scratch.
    Replaced { node: VNode<A> },
    /// Build `node` and insert it at `path`, shifting later siblings up.
    Inserted { node: VNode<A> },
    /// Detach the node at `path`, shifting later siblings down.
    Removed,
    PropertyUpdated {
        name: PropertyName,
        property: VProperty<A>,
    },
    /// Revert the property to the native default.
    PropertyRemoved { name: PropertyName },
    HandlerUpdated {
        event: EventType,
        handler: EventHandler<A>,
    },
    HandlerRemoved { event: EventType },
}

impl<A> PatchKind<A> {
    pub fn patch_type(&self) -> PatchType {
        match self {
            PatchKind::Replaced { .. } => PatchType::Replaced,
            PatchKind::Inserted { .. } => PatchType::Inserted,
            PatchKind::Removed => PatchType::Removed,
            PatchKind::PropertyUpdated { .. } => PatchType::PropertyUpdated,
            PatchKind::PropertyRemoved { .. } => PatchType::PropertyRemoved,
            PatchKind::HandlerUpdated { .. } => PatchType::HandlerUpdated,
            PatchKind::HandlerRemoved { .. } => PatchType::HandlerRemoved,
        }
    }
}

impl<A> Clone for PatchKind<A> {
    fn clone(&self) -> Self {
        match self {
            PatchKind::Replaced { node } => PatchKind::Replaced { node: node.clone() },
            PatchKind::Inserted { node } => PatchKind::Inserted { node: node.clone() },
            PatchKind::Removed => PatchKind::Removed,
            PatchKind::PropertyUpdated { name, property } => PatchKind::PropertyUpdated {
                name: name.clone(),
                property: property.clone(),
            },
            PatchKind::PropertyRemoved { name } => PatchKind::PropertyRemoved { name: name.clone() },
            PatchKind::HandlerUpdated { event, handler } => PatchKind::HandlerUpdated {
                event: event.clone(),
                handler: handler.clone(),
            },
            PatchKind::HandlerRemoved { event } => PatchKind::HandlerRemoved {
                event: event.clone(),
            },
        }
    }
}

impl<A> PartialEq for PatchKind<A> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (PatchKind::Replaced { node: a }, PatchKind::Replaced { node: b })
            | (PatchKind::Inserted { node: a }, PatchKind::Inserted { node: b }) => a == b,
            (PatchKind::Removed, PatchKind::Removed) => true,
            (
                PatchKind::PropertyUpdated { name: a, property: pa },
                PatchKind::PropertyUpdated { name: b, property: pb },
            ) => a == b && pa == pb,
            (PatchKind::PropertyRemoved { name: a }, PatchKind::PropertyRemoved { name: b }) => a == b,
            (
                PatchKind::HandlerUpdated { event: a, handler: ha },
                PatchKind::HandlerUpdated { event: b, handler: hb },
            ) => a == b && ha == hb,
            (PatchKind::HandlerRemoved { event: a }, PatchKind::HandlerRemoved { event: b }) => a == b,
            _ => false,
        }
    }
}

impl<A> fmt::Debug for PatchKind<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchKind::Replaced { node } | PatchKind::Inserted { node } => {
                write!(f, "{} {:?}", self.patch_type(), node)
            }
            PatchKind::Removed => write!(f, "{}", self.patch_type()),
            PatchKind::PropertyUpdated { name, property } => {
                write!(f, "{} {name}={property:?}", self.patch_type())
            }
            PatchKind::PropertyRemoved { name } => write!(f, "{} {name}", self.patch_type()),
            PatchKind::HandlerUpdated { event, handler } => {
                write!(f, "{} {event} {handler:?}", self.patch_type())
            }
            PatchKind::HandlerRemoved { event } => write!(f, "{} {event}", self.patch_type()),
        }
    }
}

/// One edit instruction produced by the differ.
pub struct Patch<A> {
    pub path: Vec<usize>,
    pub kind: PatchKind<A>,
}

impl<A> Patch<A> {
    pub fn new(path: Vec<usize>, kind: PatchKind<A>) -> Self {
        Self { path, kind }
    }

    /// Position of the affected node within its parent; the root reports 0.
    pub fn index(&self) -> usize {
        self.path.last().copied().unwrap_or(0)
    }

    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }

    /// Path of the parent whose child list this patch addresses, if any.
    pub fn parent_path(&self) -> Option<&[usize]> {
        self.path.split_last().map(|(_, parent)| parent)
    }

    pub fn patch_type(&self) -> PatchType {
        self.kind.patch_type()
    }
}

impl<A> Clone for Patch<A> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            kind: self.kind.clone(),
        }
    }
}

impl<A> PartialEq for Patch<A> {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path && self.kind == other.kind
    }
}

impl<A> fmt::Debug for Patch<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} {:?}", self.path, self.kind)
    }
}
