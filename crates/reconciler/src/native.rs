//! Surface a native toolkit exposes to the reconciler.
//!
//! Live nodes are `Box<dyn NativeNode>` owned by their parent's child list.
//! The reconciler never holds on to a node between calls; it walks child-index
//! paths from the root each time it needs one.

use std::any::{Any, TypeId, type_name};
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;
use std::sync::Arc;
use vdom::Value;

/// Callback installed into a native event slot.
pub type NativeHandler = Rc<dyn Fn(&dyn Any)>;

/// Callback installed into a native property's change-listener slot.
pub type ValueListener = Rc<dyn Fn(&Value)>;

/// Free-form key/value bag some native nodes carry alongside typed fields.
pub type Attributes = BTreeMap<Arc<str>, Value>;

/// Identity of a concrete native node type.
#[derive(Clone, Copy)]
pub struct NativeType {
    id: TypeId,
    name: &'static str,
}

impl NativeType {
    pub fn of<N: Any>() -> Self {
        let full = type_name::<N>();
        Self {
            id: TypeId::of::<N>(),
            name: full.rsplit("::").next().unwrap_or(full),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Unqualified type name, for diagnostics only.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for NativeType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for NativeType {}

impl Hash for NativeType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for NativeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeType({})", self.name)
    }
}

impl fmt::Display for NativeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A live, mutable toolkit node.
///
/// Capabilities are optional: a leaf returns `None` from [`children`], a node
/// without an attribute bag returns `None` from [`attributes`].
///
/// [`children`]: NativeNode::children
/// [`attributes`]: NativeNode::attributes
pub trait NativeNode: Any {
    fn native_type(&self) -> NativeType;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn children(&self) -> Option<&dyn ChildList> {
        None
    }

    fn children_mut(&mut self) -> Option<&mut dyn ChildList> {
        None
    }

    fn attributes(&self) -> Option<&Attributes> {
        None
    }

    fn attributes_mut(&mut self) -> Option<&mut Attributes> {
        None
    }
}

/// Ordered, index-addressed child sequence of a container node.
pub trait ChildList {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, index: usize) -> Option<&dyn NativeNode>;
    fn get_mut(&mut self, index: usize) -> Option<&mut dyn NativeNode>;

    /// Inserts at `index`, shifting later children up. `index == len` appends.
    fn insert(&mut self, index: usize, node: Box<dyn NativeNode>);

    /// Detaches the child at `index`, shifting later children down.
    fn remove(&mut self, index: usize) -> Option<Box<dyn NativeNode>>;

    fn push(&mut self, node: Box<dyn NativeNode>) {
        let end = self.len();
        self.insert(end, node);
    }
}

impl ChildList for Vec<Box<dyn NativeNode>> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn get(&self, index: usize) -> Option<&dyn NativeNode> {
        self.as_slice()
            .get(index)
            .map(|node| &**node as &dyn NativeNode)
    }

    fn get_mut(&mut self, index: usize) -> Option<&mut dyn NativeNode> {
        self.as_mut_slice()
            .get_mut(index)
            .map(|node| &mut **node as &mut dyn NativeNode)
    }

    fn insert(&mut self, index: usize, node: Box<dyn NativeNode>) {
        let index = index.min(Vec::len(self));
        Vec::insert(self, index, node);
    }

    fn remove(&mut self, index: usize) -> Option<Box<dyn NativeNode>> {
        if index < Vec::len(self) {
            Some(Vec::remove(self, index))
        } else {
            None
        }
    }

    fn push(&mut self, node: Box<dyn NativeNode>) {
        Vec::push(self, node);
    }
}

pub fn downcast_ref<N: NativeNode>(node: &dyn NativeNode) -> Option<&N> {
    node.as_any().downcast_ref::<N>()
}

pub fn downcast_mut<N: NativeNode>(node: &mut dyn NativeNode) -> Option<&mut N> {
    node.as_any_mut().downcast_mut::<N>()
}

/// Walks a child-index path from `node`. The empty path is `node` itself.
pub fn node_at<'a>(node: &'a dyn NativeNode, path: &[usize]) -> Option<&'a dyn NativeNode> {
    let Some((&first, rest)) = path.split_first() else {
        return Some(node);
    };
    let child = node.children()?.get(first)?;
    node_at(child, rest)
}

pub fn node_at_mut<'a>(
    node: &'a mut dyn NativeNode,
    path: &[usize],
) -> Option<&'a mut dyn NativeNode> {
    let Some((&first, rest)) = path.split_first() else {
        return Some(node);
    };
    let child = node.children_mut()?.get_mut(first)?;
    node_at_mut(child, rest)
}

/// Number of live nodes in the subtree rooted at `node`.
pub fn subtree_len(node: &dyn NativeNode) -> usize {
    let children = match node.children() {
        Some(list) => (0..list.len())
            .filter_map(|i| list.get(i))
            .map(subtree_len)
            .sum(),
        None => 0,
    };
    1 + children
}


#[cfg(test)]
mod tests {
    use super::test_nodes::{Frame, Text, text};
    use super::*;

    fn sample() -> Box<dyn NativeNode> {
        let mut inner = Frame::default();
        inner.children.push(text("b"));
        let mut root = Frame::default();
        root.children.push(text("a"));
        root.children.push(Box::new(inner));
        Box::new(root)
    }

    #[test]
    fn native_type_uses_short_name_and_type_identity() {
        let t = NativeType::of::<Text>();
        assert_eq!(t.name(), "Text");
        assert_eq!(t, NativeType::of::<Text>());
        assert_ne!(t, NativeType::of::<Frame>());
    }

    #[test]
    fn paths_walk_child_lists() {
        let root = sample();
        let b = node_at(root.as_ref(), &[1, 0]).and_then(downcast_ref::<Text>);
        assert_eq!(b.map(|t| t.text.as_str()), Some("b"));
        assert!(node_at(root.as_ref(), &[0, 0]).is_none());
        assert!(node_at(root.as_ref(), &[2]).is_none());
        assert_eq!(subtree_len(root.as_ref()), 4);
    }

    #[test]
    fn path_mut_reaches_nested_leaf() {
        let mut root = sample();
        if let Some(t) = node_at_mut(root.as_mut(), &[1, 0]).and_then(downcast_mut::<Text>) {
            t.text.push('!');
        }
        let b = node_at(root.as_ref(), &[1, 0]).and_then(downcast_ref::<Text>);
        assert_eq!(b.map(|t| t.text.as_str()), Some("b!"));
    }

    #[test]
    fn vec_child_list_clamps_insert_and_rejects_bad_remove() {
        let mut list: Vec<Box<dyn NativeNode>> = Vec::new();
        ChildList::insert(&mut list, 5, text("x"));
        ChildList::push(&mut list, text("y"));
        assert_eq!(ChildList::len(&list), 2);
        assert!(ChildList::remove(&mut list, 2).is_none());
        assert!(ChildList::remove(&mut list, 0).is_some());
        assert_eq!(ChildList::len(&list), 1);
    }
}
