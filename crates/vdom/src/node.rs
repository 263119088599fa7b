//! Immutable virtual nodes.
//!
//! Invariants:
//! - A `VNode` is never mutated after construction; builder methods consume
//!   `self` and return a new value.
//! - Property and handler keys are unique; iteration is sorted by key so that
//!   every consumer sees a deterministic order.
//! - Handler descriptors and change listeners compare by identity. A
//!   descriptor cloned from the same tree is equal to itself, a freshly
//!   constructed one never is.

use crate::value::Value;
use std::any::{Any, type_name};
use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

pub type PropertyName = Arc<str>;

/// Symbolic type tag selecting the native node type to instantiate.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeType(Arc<str>);

impl NodeType {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        NodeType(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeType {
    fn from(name: &str) -> Self {
        NodeType(Arc::from(name))
    }
}

impl Borrow<str> for NodeType {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a native event kind, e.g. `"action"` or `"mouseClicked"`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventType(Arc<str>);

impl EventType {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        EventType(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EventType {
    fn from(name: &str) -> Self {
        EventType(Arc::from(name))
    }
}

impl Borrow<str> for EventType {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Why a handler descriptor could not turn a native event into an action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HandlerError {
    /// The native event payload was not of the type the handler was built for.
    UnexpectedEvent {
        expected: &'static str,
    },
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerError::UnexpectedEvent { expected } => {
                write!(f, "event payload is not a {expected}")
            }
        }
    }
}

impl std::error::Error for HandlerError {}

type HandlerFn<A> = dyn Fn(&dyn Any) -> Result<Option<A>, HandlerError>;

/// Descriptor wrapping a pure `(native event) -> Option<action>` function.
pub struct EventHandler<A> {
    expects: &'static str,
    f: Rc<HandlerFn<A>>,
}

impl<A: 'static> EventHandler<A> {
    /// Handler for native events of payload type `E`.
    pub fn new<E, F>(f: F) -> Self
    where
        E: Any,
        F: Fn(&E) -> Option<A> + 'static,
    {
        Self {
            expects: type_name::<E>(),
            f: Rc::new(move |event: &dyn Any| match event.downcast_ref::<E>() {
                Some(event) => Ok(f(event)),
                None => Err(HandlerError::UnexpectedEvent {
                    expected: type_name::<E>(),
                }),
            }),
        }
    }

    /// Handler accepting any payload type.
    pub fn any<F>(f: F) -> Self
    where
        F: Fn(&dyn Any) -> Option<A> + 'static,
    {
        Self {
            expects: "any",
            f: Rc::new(move |event: &dyn Any| Ok(f(event))),
        }
    }

    /// Handler that ignores the payload and always yields `action`.
    pub fn emit(action: A) -> Self
    where
        A: Clone,
    {
        Self::any(move |_| Some(action.clone()))
    }
}

impl<A> EventHandler<A> {
    pub fn handle(&self, event: &dyn Any) -> Result<Option<A>, HandlerError> {
        (self.f)(event)
    }

    /// Type name of the payload this handler expects.
    pub fn expects(&self) -> &'static str {
        self.expects
    }

    pub fn same(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.f, &other.f)
    }
}

impl<A> Clone for EventHandler<A> {
    fn clone(&self) -> Self {
        Self {
            expects: self.expects,
            f: Rc::clone(&self.f),
        }
    }
}

impl<A> PartialEq for EventHandler<A> {
    fn eq(&self, other: &Self) -> bool {
        self.same(other)
    }
}

impl<A> fmt::Debug for EventHandler<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventHandler<{}>", self.expects)
    }
}

/// Maps a new native property value to an optional action.
pub struct ChangeListener<A> {
    f: Rc<dyn Fn(&Value) -> Option<A>>,
}

impl<A> ChangeListener<A> {
    pub fn new(f: impl Fn(&Value) -> Option<A> + 'static) -> Self {
        Self { f: Rc::new(f) }
    }

    pub fn on_change(&self, value: &Value) -> Option<A> {
        (self.f)(value)
    }

    pub fn same(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.f, &other.f)
    }
}

impl<A> Clone for ChangeListener<A> {
    fn clone(&self) -> Self {
        Self {
            f: Rc::clone(&self.f),
        }
    }
}

impl<A> PartialEq for ChangeListener<A> {
    fn eq(&self, other: &Self) -> bool {
        self.same(other)
    }
}

impl<A> fmt::Debug for ChangeListener<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ChangeListener")
    }
}

/// A property value plus an optional listener for native-side changes.
pub struct VProperty<A> {
    value: Value,
    listener: Option<ChangeListener<A>>,
}

impl<A> VProperty<A> {
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            listener: None,
        }
    }

    pub fn with_listener(value: impl Into<Value>, listener: ChangeListener<A>) -> Self {
        Self {
            value: value.into(),
            listener: Some(listener),
        }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn listener(&self) -> Option<&ChangeListener<A>> {
        self.listener.as_ref()
    }
}

impl<A> Clone for VProperty<A> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            listener: self.listener.clone(),
        }
    }
}

impl<A> PartialEq for VProperty<A> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value && self.listener == other.listener
    }
}

impl<A> fmt::Debug for VProperty<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.listener.is_some() {
            write!(f, "{} (listened)", self.value)
        } else {
            write!(f, "{}", self.value)
        }
    }
}

/// Immutable description of one desired UI node.
pub struct VNode<A> {
    node_type: NodeType,
    properties: BTreeMap<PropertyName, VProperty<A>>,
    handlers: BTreeMap<EventType, EventHandler<A>>,
    children: Vec<VNode<A>>,
}

impl<A> VNode<A> {
    pub fn new(node_type: impl Into<NodeType>) -> Self {
        Self {
            node_type: node_type.into(),
            properties: BTreeMap::new(),
            handlers: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn property(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.properties
            .insert(Arc::from(name), VProperty::new(value));
        self
    }

    /// Sets a property and listens for changes made on the native side.
    pub fn bind(
        mut self,
        name: &str,
        value: impl Into<Value>,
        listener: impl Fn(&Value) -> Option<A> + 'static,
    ) -> Self {
        self.properties.insert(
            Arc::from(name),
            VProperty::with_listener(value, ChangeListener::new(listener)),
        );
        self
    }

    pub fn on(mut self, event: impl Into<EventType>, handler: EventHandler<A>) -> Self {
        self.handlers.insert(event.into(), handler);
        self
    }

    pub fn child(mut self, child: VNode<A>) -> Self {
        self.children.push(child);
        self
    }

    pub fn children_from(mut self, children: impl IntoIterator<Item = VNode<A>>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn node_type(&self) -> &NodeType {
        &self.node_type
    }

    pub fn properties(&self) -> &BTreeMap<PropertyName, VProperty<A>> {
        &self.properties
    }

    pub fn get_property(&self, name: &str) -> Option<&VProperty<A>> {
        self.properties.get(name)
    }

    pub fn handlers(&self) -> &BTreeMap<EventType, EventHandler<A>> {
        &self.handlers
    }

    pub fn get_handler(&self, event: &str) -> Option<&EventHandler<A>> {
        self.handlers.get(event)
    }

    pub fn children(&self) -> &[VNode<A>] {
        &self.children
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(VNode::subtree_len).sum::<usize>()
    }
}

impl<A> Clone for VNode<A> {
    fn clone(&self) -> Self {
        Self {
            node_type: self.node_type.clone(),
            properties: self.properties.clone(),
            handlers: self.handlers.clone(),
            children: self.children.clone(),
        }
    }
}

impl<A> PartialEq for VNode<A> {
    fn eq(&self, other: &Self) -> bool {
        self.node_type == other.node_type
            && self.properties == other.properties
            && self.handlers == other.handlers
            && self.children == other.children
    }
}

impl<A> fmt::Debug for VNode<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("VNode");
        s.field("type", &self.node_type.as_str());
        if !self.properties.is_empty() {
            s.field("properties", &self.properties);
        }
        if !self.handlers.is_empty() {
            let events: Vec<&str> = self.handlers.keys().map(EventType::as_str).collect();
            s.field("handlers", &events);
        }
        if !self.children.is_empty() {
            s.field("children", &self.children);
        }
        s.finish()
    }
}
