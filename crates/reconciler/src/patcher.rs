//! Applies differ output to a live native tree.
//!
//! Patch paths are expressed against the tree as it was before the batch.
//! While applying, the patcher records per parent which of those pre-edit
//! positions no longer hold a live node (removed children, and slots whose
//! replacement or insertion failed to build). Every later path is mapped
//! through that record level by level, so index `i` at a parent becomes
//! `i - holes_below(i)` in the live child list.
//!
//! Structural faults (a path that leaves the live tree, a child-slot patch on
//! a node without a child list, an index past the end) are the only errors
//! this module returns, and only under [`StructuralPolicy::FailFast`].

use crate::builder::NodeBuilder;
use crate::config::StructuralPolicy;
use crate::diagnostics::Diagnostic;
use crate::native::{ChildList, NativeNode, node_at_mut};
use std::collections::HashMap;
use std::fmt;
use vdom::{Patch, PatchKind, VNode};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PatchError {
    /// A non-root patch arrived while there is no live root.
    MissingRoot,
    MissingNode { path: Vec<usize> },
    NoChildList { path: Vec<usize> },
    IndexOutOfBounds { path: Vec<usize>, len: usize },
}

impl PatchError {
    pub fn path(&self) -> &[usize] {
        match self {
            PatchError::MissingRoot => &[],
            PatchError::MissingNode { path }
            | PatchError::NoChildList { path }
            | PatchError::IndexOutOfBounds { path, .. } => path,
        }
    }
}

impl fmt::Display for PatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchError::MissingRoot => f.write_str("no live root to patch"),
            PatchError::MissingNode { path } => write!(f, "no live node at {path:?}"),
            PatchError::NoChildList { path } => {
                write!(f, "parent of {path:?} has no child list")
            }
            PatchError::IndexOutOfBounds { path, len } => {
                write!(f, "index of {path:?} out of bounds for {len} children")
            }
        }
    }
}

impl std::error::Error for PatchError {}

/// Pre-edit positions per parent that no longer hold a live node.
#[derive(Default)]
struct Holes {
    by_parent: HashMap<Vec<usize>, Vec<usize>>,
}

impl Holes {
    fn record(&mut self, path: &[usize]) {
        let Some((&index, parent)) = path.split_last() else {
            return;
        };
        let holes = self.by_parent.entry(parent.to_vec()).or_default();
        if let Err(at) = holes.binary_search(&index) {
            holes.insert(at, index);
        }
    }

    /// Maps a pre-edit path to the live tree; `None` if it runs through a
    /// slot that holds no node.
    fn map(&self, path: &[usize]) -> Option<Vec<usize>> {
        let mut mapped = Vec::with_capacity(path.len());
        for (depth, &index) in path.iter().enumerate() {
            let shift = match self.by_parent.get(&path[..depth]) {
                Some(holes) => match holes.binary_search(&index) {
                    Ok(_) => return None,
                    Err(below) => below,
                },
                None => 0,
            };
            mapped.push(index - shift);
        }
        Some(mapped)
    }
}

/// Borrows a builder for the duration of one or more batches.
pub struct Patcher<'b, 'r, A> {
    builder: &'b NodeBuilder<'r, A>,
    policy: StructuralPolicy,
}

impl<'b, 'r, A: 'static> Patcher<'b, 'r, A> {
    pub fn new(builder: &'b NodeBuilder<'r, A>, policy: StructuralPolicy) -> Self {
        Self { builder, policy }
    }

    /// Applies `patches` in order to the tree rooted at `root`.
    pub fn apply(
        &self,
        root: &mut Option<Box<dyn NativeNode>>,
        patches: &[Patch<A>],
    ) -> Result<(), PatchError> {
        let mut holes = Holes::default();
        for patch in patches {
            log::trace!(target: "reconciler.patch", "apply {patch:?}");
            if let Err(error) = self.apply_one(root, patch, &mut holes) {
                self.fault(error)?;
            }
        }
        Ok(())
    }

    fn fault(&self, error: PatchError) -> Result<(), PatchError> {
        match self.policy {
            StructuralPolicy::FailFast => Err(error),
            StructuralPolicy::Skip => {
                self.builder
                    .diagnostics()
                    .report(Diagnostic::StructuralInconsistency {
                        path: error.path().to_vec(),
                        detail: error.to_string(),
                    });
                Ok(())
            }
        }
    }

    fn apply_one(
        &self,
        root: &mut Option<Box<dyn NativeNode>>,
        patch: &Patch<A>,
        holes: &mut Holes,
    ) -> Result<(), PatchError> {
        if patch.is_root() {
            return self.apply_root(root, patch);
        }
        let Some(path) = holes.map(&patch.path) else {
            log::debug!(
                target: "reconciler.patch",
                "skipping {patch:?}: slot was never built"
            );
            return Ok(());
        };
        let root = root.as_deref_mut().ok_or(PatchError::MissingRoot)?;
        match &patch.kind {
            PatchKind::Replaced { node } => {
                let (list, index) = child_slot(root, &patch.path, &path)?;
                check_bounds(&patch.path, index, list.len(), false)?;
                list.remove(index);
                match self.builder.build(node) {
                    Some(built) => list.insert(index, built),
                    None => holes.record(&patch.path),
                }
            }
            PatchKind::Inserted { node } => {
                let (list, index) = child_slot(root, &patch.path, &path)?;
                check_bounds(&patch.path, index, list.len(), true)?;
                match self.builder.build(node) {
                    Some(built) => list.insert(index, built),
                    None => holes.record(&patch.path),
                }
            }
            PatchKind::Removed => {
                let (list, index) = child_slot(root, &patch.path, &path)?;
                check_bounds(&patch.path, index, list.len(), false)?;
                list.remove(index);
                holes.record(&patch.path);
            }
            kind => {
                let node = node_at_mut(root, &path).ok_or_else(|| PatchError::MissingNode {
                    path: patch.path.clone(),
                })?;
                self.apply_attribute(node, kind);
            }
        }
        Ok(())
    }

    fn apply_root(&self, root: &mut Option<Box<dyn NativeNode>>, patch: &Patch<A>) -> Result<(), PatchError> {
        match &patch.kind {
            PatchKind::Replaced { node } | PatchKind::Inserted { node } => {
                self.install_root(root, node);
            }
            PatchKind::Removed => {
                *root = None;
            }
            kind => {
                let node = root.as_deref_mut().ok_or(PatchError::MissingRoot)?;
                self.apply_attribute(node, kind);
            }
        }
        Ok(())
    }

    fn install_root(&self, root: &mut Option<Box<dyn NativeNode>>, node: &VNode<A>) {
        if root.is_some() {
            log::debug!(target: "reconciler.patch", "replacing live root with {}", node.node_type());
        }
        *root = self.builder.build(node);
    }

    fn apply_attribute(&self, node: &mut dyn NativeNode, kind: &PatchKind<A>) {
        match kind {
            PatchKind::PropertyUpdated { name, property } => {
                self.builder.apply_property(node, name, property);
            }
            PatchKind::PropertyRemoved { name } => {
                self.builder.clear_property(node, name);
            }
            PatchKind::HandlerUpdated { event, handler } => {
                self.builder.attach_handler(node, event, handler);
            }
            PatchKind::HandlerRemoved { event } => {
                self.builder.detach_handler(node, event);
            }
            PatchKind::Replaced { .. } | PatchKind::Inserted { .. } | PatchKind::Removed => {
                debug_assert!(false, "child-slot patch routed to attribute handling");
            }
        }
    }
}

/// Resolves the child list holding the slot `mapped` addresses.
fn child_slot<'a>(
    root: &'a mut dyn NativeNode,
    original: &[usize],
    mapped: &[usize],
) -> Result<(&'a mut dyn ChildList, usize), PatchError> {
    let Some((&index, parent_path)) = mapped.split_last() else {
        return Err(PatchError::MissingNode {
            path: original.to_vec(),
        });
    };
    let parent = node_at_mut(root, parent_path).ok_or_else(|| PatchError::MissingNode {
        path: original.to_vec(),
    })?;
    let list = parent.children_mut().ok_or_else(|| PatchError::NoChildList {
        path: original.to_vec(),
    })?;
    Ok((list, index))
}

/// `at_end` admits `index == len`, the append position.
fn check_bounds(path: &[usize], index: usize, len: usize, at_end: bool) -> Result<(), PatchError> {
    if index < len || (at_end && index == len) {
        Ok(())
    } else {
        Err(PatchError::IndexOutOfBounds {
            path: path.to_vec(),
            len,
        })
    }
}
