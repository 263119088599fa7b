//! Deterministic virtual-tree diffing to patch sequences.
//!
//! Contract:
//! - Nodes are matched by position only; there is no keyed matching and no
//!   move detection. A move is expressed as updates at the affected indices.
//! - A type change at a position emits a single `Replaced` for the whole
//!   subtree and does not recurse.
//! - Child lists are aligned on `min(prev.len(), next.len())`; extra trailing
//!   children become `Inserted` (next longer) or `Removed` (prev longer), both
//!   in ascending index order.
//! - Interior inserts or deletions degrade to per-index updates from the first
//!   differing position plus a trailing insert/remove tail. This is a known
//!   precision limit, not a defect; patch sequences depend on it.
//! - Handler descriptors compare by identity, so a descriptor rebuilt by the
//!   view function is always re-attached.
//! - Output ordering is deterministic (pre-order, properties and handlers in
//!   key order).
//!
//! Complexity: O(n) in the number of nodes of the smaller aligned tree.

use crate::node::VNode;
use crate::patch::{Patch, PatchKind};

/// Diffs `prev` (or nothing, for a first render) against `next`.
pub fn diff<A>(prev: Option<&VNode<A>>, next: &VNode<A>) -> Vec<Patch<A>> {
    let mut patches = Vec::new();
    diff_into(prev, next, &mut patches);
    patches
}

/// First-render diff: a single root `Inserted` carrying `next`.
pub fn diff_from_empty<A>(next: &VNode<A>) -> Vec<Patch<A>> {
    diff(None, next)
}

/// Like [`diff`], appending to a caller-owned buffer.
pub fn diff_into<A>(prev: Option<&VNode<A>>, next: &VNode<A>, patches: &mut Vec<Patch<A>>) {
    let start = patches.len();
    let mut path = Vec::new();
    match prev {
        None => patches.push(Patch::new(
            path,
            PatchKind::Inserted { node: next.clone() },
        )),
        Some(prev) => diff_node(prev, next, &mut path, patches),
    }
    log::trace!(
        target: "vdom.diff",
        "diff produced {} patches for {} nodes",
        patches.len() - start,
        next.subtree_len()
    );
}

fn diff_node<A>(prev: &VNode<A>, next: &VNode<A>, path: &mut Vec<usize>, patches: &mut Vec<Patch<A>>) {
    if std::ptr::eq(prev, next) {
        return;
    }
    if prev.node_type() != next.node_type() {
        log::trace!(
            target: "vdom.diff",
            "type change at {path:?}: {} -> {}",
            prev.node_type(),
            next.node_type()
        );
        patches.push(Patch::new(
            path.clone(),
            PatchKind::Replaced { node: next.clone() },
        ));
        return;
    }
    emit_properties(prev, next, path, patches);
    emit_handlers(prev, next, path, patches);
    emit_children(prev, next, path, patches);
}

fn emit_properties<A>(prev: &VNode<A>, next: &VNode<A>, path: &[usize], patches: &mut Vec<Patch<A>>) {
    for (name, property) in next.properties() {
        if prev.get_property(name) != Some(property) {
            patches.push(Patch::new(
                path.to_vec(),
                PatchKind::PropertyUpdated {
                    name: name.clone(),
                    property: property.clone(),
                },
            ));
        }
    }
    for name in prev.properties().keys() {
        if next.get_property(name).is_none() {
            patches.push(Patch::new(
                path.to_vec(),
                PatchKind::PropertyRemoved { name: name.clone() },
            ));
        }
    }
}

fn emit_handlers<A>(prev: &VNode<A>, next: &VNode<A>, path: &[usize], patches: &mut Vec<Patch<A>>) {
    for (event, handler) in next.handlers() {
        let unchanged = prev
            .get_handler(event.as_str())
            .is_some_and(|old| old.same(handler));
        if !unchanged {
            patches.push(Patch::new(
                path.to_vec(),
                PatchKind::HandlerUpdated {
                    event: event.clone(),
                    handler: handler.clone(),
                },
            ));
        }
    }
    for event in prev.handlers().keys() {
        if next.get_handler(event.as_str()).is_none() {
            patches.push(Patch::new(
                path.to_vec(),
                PatchKind::HandlerRemoved {
                    event: event.clone(),
                },
            ));
        }
    }
}

fn emit_children<A>(prev: &VNode<A>, next: &VNode<A>, path: &mut Vec<usize>, patches: &mut Vec<Patch<A>>) {
    let prev_children = prev.children();
    let next_children = next.children();
    let common = prev_children.len().min(next_children.len());

    for (index, (old, new)) in prev_children.iter().zip(next_children).enumerate() {
        path.push(index);
        diff_node(old, new, path, patches);
        path.pop();
    }
    for (index, child) in next_children.iter().enumerate().skip(common) {
        path.push(index);
        patches.push(Patch::new(
            path.clone(),
            PatchKind::Inserted {
                node: child.clone(),
            },
        ));
        path.pop();
    }
    for index in common..prev_children.len() {
        path.push(index);
        patches.push(Patch::new(path.clone(), PatchKind::Removed));
        path.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::EventHandler;
    use crate::patch::PatchType;
    use crate::value::Value;

    #[derive(Clone, Debug, PartialEq)]
    enum Action {
        Increment,
    }

    fn label(text: &str) -> VNode<Action> {
        VNode::new("Label").property("text", text)
    }

    fn types(patches: &[Patch<Action>]) -> Vec<(Vec<usize>, PatchType)> {
        patches
            .iter()
            .map(|p| (p.path.clone(), p.patch_type()))
            .collect()
    }

    #[test]
    fn diff_of_equal_trees_is_empty() {
        let tree = VNode::new("Box")
            .property("width", 100)
            .on("action", EventHandler::emit(Action::Increment))
            .child(label("A"))
            .child(VNode::new("Box").child(label("B")));
        assert!(diff(Some(&tree), &tree).is_empty());
        assert!(diff(Some(&tree), &tree.clone()).is_empty());
    }

    #[test]
    fn first_render_inserts_the_whole_tree() {
        let tree = VNode::new("Box").child(label("A"));
        let patches = diff_from_empty(&tree);
        assert_eq!(patches.len(), 1);
        assert!(patches[0].is_root());
        assert_eq!(
            patches[0].kind,
            PatchKind::Inserted { node: tree.clone() }
        );
    }

    #[test]
    fn type_change_replaces_without_recursing() {
        let prev = VNode::new("Box").child(label("A"));
        let next = VNode::new("Stack").child(label("B"));
        let patches = diff(Some(&prev), &next);
        assert_eq!(types(&patches), vec![(vec![], PatchType::Replaced)]);
    }

    #[test]
    fn single_property_change_emits_one_patch() {
        let prev = VNode::<Action>::new("Box")
            .property("width", 100)
            .property("height", 50)
            .property("title", "t");
        let next = VNode::new("Box")
            .property("width", 100)
            .property("height", 60)
            .property("title", "t");
        let patches = diff(Some(&prev), &next);
        assert_eq!(patches.len(), 1);
        match &patches[0].kind {
            PatchKind::PropertyUpdated { name, property } => {
                assert_eq!(&**name, "height");
                assert_eq!(property.value(), &Value::Int(60));
            }
            other => panic!("unexpected patch {other:?}"),
        }
    }

    #[test]
    fn removed_property_emits_property_removed() {
        let prev = VNode::<Action>::new("Label").property("text", "a").property("wrapText", true);
        let next = VNode::new("Label").property("text", "a");
        let patches = diff(Some(&prev), &next);
        assert_eq!(types(&patches), vec![(vec![], PatchType::PropertyRemoved)]);
    }

    #[test]
    fn box_label_scenario() {
        let prev = VNode::<Action>::new("Box").property("width", 100).child(label("A"));
        let next = VNode::new("Box")
            .property("width", 120)
            .child(label("A"))
            .child(label("B"));
        let patches = diff(Some(&prev), &next);
        assert_eq!(
            patches,
            vec![
                Patch::new(
                    vec![],
                    PatchKind::PropertyUpdated {
                        name: "width".into(),
                        property: crate::VProperty::new(120),
                    },
                ),
                Patch::new(vec![1], PatchKind::Inserted { node: label("B") }),
            ]
        );
    }

    #[test]
    fn rebuilt_handler_is_reattached() {
        let prev = VNode::new("Button").on("action", EventHandler::emit(Action::Increment));
        let next = VNode::new("Button").on("action", EventHandler::emit(Action::Increment));
        let patches = diff(Some(&prev), &next);
        assert_eq!(types(&patches), vec![(vec![], PatchType::HandlerUpdated)]);
    }

    #[test]
    fn dropped_handler_emits_handler_removed() {
        let prev = VNode::new("Button").on("action", EventHandler::emit(Action::Increment));
        let next = VNode::new("Button");
        let patches = diff(Some(&prev), &next);
        assert_eq!(types(&patches), vec![(vec![], PatchType::HandlerRemoved)]);
    }

    #[test]
    fn trailing_removals_are_ascending_and_last() {
        let prev = VNode::new("Box")
            .child(label("A"))
            .child(label("B"))
            .child(label("C"))
            .child(label("D"));
        let next = VNode::new("Box").property("width", 1).child(label("a")).child(label("B"));
        let patches = diff(Some(&prev), &next);
        assert_eq!(
            types(&patches),
            vec![
                (vec![], PatchType::PropertyUpdated),
                (vec![0], PatchType::PropertyUpdated),
                (vec![2], PatchType::Removed),
                (vec![3], PatchType::Removed),
            ]
        );
    }

    #[test]
    fn interior_insert_cascades_to_a_trailing_insert() {
        let prev = VNode::new("Box").child(label("A")).child(label("C"));
        let next = VNode::new("Box")
            .child(label("A"))
            .child(label("B"))
            .child(label("C"));
        let patches = diff(Some(&prev), &next);
        assert_eq!(
            types(&patches),
            vec![
                (vec![1], PatchType::PropertyUpdated),
                (vec![2], PatchType::Inserted),
            ]
        );
    }

    #[test]
    fn nested_patches_follow_their_parent_index() {
        let prev = VNode::new("Box")
            .child(VNode::new("Box").child(label("x")))
            .child(label("y"));
        let next = VNode::new("Box")
            .child(VNode::new("Box").child(label("x2")).child(label("z")))
            .child(VNode::new("Button"));
        let patches = diff(Some(&prev), &next);
        assert_eq!(
            types(&patches),
            vec![
                (vec![0, 0], PatchType::PropertyUpdated),
                (vec![0, 1], PatchType::Inserted),
                (vec![1], PatchType::Replaced),
            ]
        );
    }

    #[test]
    fn diff_is_deterministic() {
        let prev = VNode::<Action>::new("Box")
            .property("b", 1)
            .property("a", 1)
            .child(label("x"));
        let next = VNode::new("Box")
            .property("c", 2)
            .property("a", 2)
            .child(label("y"))
            .child(label("z"));
        let a = diff(Some(&prev), &next);
        let b = diff(Some(&prev), &next);
        assert_eq!(a, b, "expected deterministic patch output");
        let names: Vec<String> = a
            .iter()
            .filter_map(|p| match &p.kind {
                PatchKind::PropertyUpdated { name, .. } | PatchKind::PropertyRemoved { name } => {
                    Some(name.to_string())
                }
                _ => None,
            })
            .collect();
        assert_eq!(names, vec!["a", "c", "b", "text"]);
    }

    #[test]
    fn diff_into_appends() {
        let prev = label("a");
        let next = label("b");
        let mut patches = diff_from_empty(&prev);
        diff_into(Some(&prev), &next, &mut patches);
        assert_eq!(patches.len(), 2);
    }
}
