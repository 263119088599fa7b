//! Accessor registry: node factories plus (native type, key) → accessor
//! resolution.
//!
//! Resolution order for a key:
//! 1. an explicit registration for the native type,
//! 2. the registered providers, in registration order.
//!
//! Every answer is memoized per (native type, key), misses included, so a
//! provider is asked at most once per pair. Explicit registration always
//! overwrites whatever is cached.

use crate::accessor::{AttributeAccessor, EventAccessor, PropertyAccessor};
use crate::native::{NativeNode, NativeType};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;
use vdom::NodeType;

pub type NodeFactory = Box<dyn Fn() -> Result<Box<dyn NativeNode>, String>>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BuildError {
    UnknownType(NodeType),
    Failed { node_type: NodeType, reason: String },
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::UnknownType(node_type) => write!(f, "no factory registered for {node_type}"),
            BuildError::Failed { node_type, reason } => {
                write!(f, "factory for {node_type} failed: {reason}")
            }
        }
    }
}

impl std::error::Error for BuildError {}

/// Fallback source of accessors for keys with no explicit registration.
pub trait AccessorProvider {
    fn property(&self, native: NativeType, name: &str) -> Option<Rc<dyn PropertyAccessor>>;

    fn event(&self, _native: NativeType, _event: &str) -> Option<Rc<dyn EventAccessor>> {
        None
    }
}

/// Resolves prefixed keys (`data-*` by default) to the node's attribute bag.
#[derive(Clone, Debug)]
pub struct AttributeProvider {
    prefix: Arc<str>,
}

impl AttributeProvider {
    pub fn new(prefix: impl Into<Arc<str>>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for AttributeProvider {
    fn default() -> Self {
        Self::new("data-")
    }
}

impl AccessorProvider for AttributeProvider {
    fn property(&self, _native: NativeType, name: &str) -> Option<Rc<dyn PropertyAccessor>> {
        if name.len() > self.prefix.len() && name.starts_with(&*self.prefix) {
            Some(Rc::new(AttributeAccessor::new(name)))
        } else {
            None
        }
    }
}

struct Entry<T: ?Sized> {
    accessor: Option<Rc<T>>,
    explicit: bool,
}

impl<T: ?Sized> Clone for Entry<T> {
    fn clone(&self) -> Self {
        Self {
            accessor: self.accessor.clone(),
            explicit: self.explicit,
        }
    }
}

struct Table<T: ?Sized> {
    entries: RefCell<HashMap<NativeType, HashMap<Arc<str>, Entry<T>>>>,
}

impl<T: ?Sized> Table<T> {
    fn new() -> Self {
        Self {
            entries: RefCell::new(HashMap::new()),
        }
    }

    fn register(&mut self, native: NativeType, key: &str, accessor: Rc<T>) {
        self.entries.get_mut().entry(native).or_default().insert(
            Arc::from(key),
            Entry {
                accessor: Some(accessor),
                explicit: true,
            },
        );
    }

    fn resolve(
        &self,
        native: NativeType,
        key: &str,
        fallback: impl FnOnce() -> Option<Rc<T>>,
    ) -> Option<Rc<T>> {
        if let Some(entry) = self.entries.borrow().get(&native).and_then(|m| m.get(key)) {
            return entry.accessor.clone();
        }
        // The borrow is released before consulting providers; they may in turn
        // resolve through this registry.
        let found = fallback();
        let mut entries = self.entries.borrow_mut();
        let entry = entries
            .entry(native)
            .or_default()
            .entry(Arc::from(key))
            .or_insert(Entry {
                accessor: found,
                explicit: false,
            });
        entry.accessor.clone()
    }

    fn explicit_keys(&self, native: NativeType) -> Vec<Arc<str>> {
        let entries = self.entries.borrow();
        let mut keys: Vec<Arc<str>> = entries
            .get(&native)
            .map(|m| {
                m.iter()
                    .filter(|(_, e)| e.explicit)
                    .map(|(k, _)| Arc::clone(k))
                    .collect()
            })
            .unwrap_or_default();
        keys.sort();
        keys
    }

    fn len(&self) -> usize {
        self.entries.borrow().values().map(HashMap::len).sum()
    }
}

pub struct AccessorRegistry {
    factories: HashMap<NodeType, NodeFactory>,
    placeholder: Option<NodeFactory>,
    properties: Table<dyn PropertyAccessor>,
    events: Table<dyn EventAccessor>,
    providers: Vec<Box<dyn AccessorProvider>>,
}

impl AccessorRegistry {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
            placeholder: None,
            properties: Table::new(),
            events: Table::new(),
            providers: Vec::new(),
        }
    }

    pub fn register_factory(
        &mut self,
        node_type: impl Into<NodeType>,
        factory: impl Fn() -> Result<Box<dyn NativeNode>, String> + 'static,
    ) -> &mut Self {
        self.factories.insert(node_type.into(), Box::new(factory));
        self
    }

    /// Registers `N::default()` as the factory for `node_type`.
    pub fn register_type<N: NativeNode + Default>(&mut self, node_type: impl Into<NodeType>) -> &mut Self {
        self.register_factory(node_type, || Ok(Box::new(N::default()) as Box<dyn NativeNode>))
    }

    /// Factory used to fill a slot whose own construction failed.
    pub fn set_placeholder(&mut self, factory: impl Fn() -> Box<dyn NativeNode> + 'static) -> &mut Self {
        self.placeholder = Some(Box::new(move || Ok::<_, String>(factory())));
        self
    }

    pub fn register_property<N: NativeNode>(
        &mut self,
        name: &str,
        accessor: impl PropertyAccessor + 'static,
    ) -> &mut Self {
        self.properties
            .register(NativeType::of::<N>(), name, Rc::new(accessor));
        self
    }

    pub fn register_event<N: NativeNode>(
        &mut self,
        event: &str,
        accessor: impl EventAccessor + 'static,
    ) -> &mut Self {
        self.events
            .register(NativeType::of::<N>(), event, Rc::new(accessor));
        self
    }

    pub fn add_provider(&mut self, provider: impl AccessorProvider + 'static) -> &mut Self {
        self.providers.push(Box::new(provider));
        self
    }

    pub fn knows(&self, node_type: &NodeType) -> bool {
        self.factories.contains_key(node_type)
    }

    pub fn create(&self, node_type: &NodeType) -> Result<Box<dyn NativeNode>, BuildError> {
        let factory = self
            .factories
            .get(node_type)
            .ok_or_else(|| BuildError::UnknownType(node_type.clone()))?;
        factory().map_err(|reason| BuildError::Failed {
            node_type: node_type.clone(),
            reason,
        })
    }

    pub fn placeholder(&self) -> Option<Box<dyn NativeNode>> {
        self.placeholder.as_ref().and_then(|factory| factory().ok())
    }

    pub fn resolve_property(&self, native: NativeType, name: &str) -> Option<Rc<dyn PropertyAccessor>> {
        self.properties.resolve(native, name, || {
            let found = self
                .providers
                .iter()
                .find_map(|provider| provider.property(native, name));
            log::trace!(
                target: "reconciler.accessor",
                "resolved property {native}.{name} via providers: {}",
                if found.is_some() { "found" } else { "miss" }
            );
            found
        })
    }

    pub fn resolve_event(&self, native: NativeType, event: &str) -> Option<Rc<dyn EventAccessor>> {
        self.events.resolve(native, event, || {
            let found = self
                .providers
                .iter()
                .find_map(|provider| provider.event(native, event));
            log::trace!(
                target: "reconciler.accessor",
                "resolved event {native}.{event} via providers: {}",
                if found.is_some() { "found" } else { "miss" }
            );
            found
        })
    }

    /// Explicitly registered property names for `native`, sorted.
    pub fn registered_properties(&self, native: NativeType) -> Vec<Arc<str>> {
        self.properties.explicit_keys(native)
    }

    pub fn registered_events(&self, native: NativeType) -> Vec<Arc<str>> {
        self.events.explicit_keys(native)
    }

    /// Number of (native type, key) pairs known, registered or memoized.
    pub fn resolved_len(&self) -> usize {
        self.properties.len() + self.events.len()
    }
}

impl Default for AccessorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
