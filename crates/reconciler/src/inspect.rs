//! Observable snapshots of live trees.
//!
//! A snapshot records every explicitly registered property of each node, read
//! back through its accessor, plus the attribute bag and children. Two live
//! trees are interchangeable for an application iff their snapshots are equal.

use crate::native::NativeNode;
use crate::registry::AccessorRegistry;
use std::collections::BTreeMap;
use vdom::Value;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct NodeSnapshot {
    pub native: &'static str,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "BTreeMap::is_empty"))]
    pub properties: BTreeMap<String, Value>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "BTreeMap::is_empty"))]
    pub attributes: BTreeMap<String, Value>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    pub children: Vec<NodeSnapshot>,
}

impl NodeSnapshot {
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(NodeSnapshot::node_count).sum::<usize>()
    }
}

pub fn snapshot(registry: &AccessorRegistry, node: &dyn NativeNode) -> NodeSnapshot {
    let native = node.native_type();
    let mut properties = BTreeMap::new();
    for name in registry.registered_properties(native) {
        let Some(accessor) = registry.resolve_property(native, &name) else {
            continue;
        };
        match accessor.get(node) {
            Ok(value) => {
                properties.insert(name.to_string(), value);
            }
            Err(error) => {
                log::debug!(target: "reconciler.accessor", "snapshot of {native}.{name}: {error}");
            }
        }
    }
    let attributes = node
        .attributes()
        .map(|bag| bag.iter().map(|(k, v)| (k.to_string(), v.clone())).collect())
        .unwrap_or_default();
    let children = match node.children() {
        Some(list) => (0..list.len())
            .filter_map(|i| list.get(i))
            .map(|child| snapshot(registry, child))
            .collect(),
        None => Vec::new(),
    };
    NodeSnapshot {
        native: native.name(),
        properties,
        attributes,
        children,
    }
}

pub fn snapshot_root(registry: &AccessorRegistry, root: Option<&dyn NativeNode>) -> Option<NodeSnapshot> {
    root.map(|node| snapshot(registry, node))
}
