//! Property and event accessors.
//!
//! An accessor is bound to one (native type, key) pair and knows how to move a
//! `Value` in and out of that native field. Accessors hold no node references;
//! every call receives the live node, downcasts it and fails with
//! [`AccessError::WrongNativeType`] when handed a node of another type.

use crate::native::{NativeHandler, NativeNode, NativeType, ValueListener, downcast_mut, downcast_ref};
use std::fmt;
use std::sync::Arc;
use vdom::Value;

#[derive(Clone, Debug, PartialEq)]
pub enum AccessError {
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    Conversion(String),
    WrongNativeType {
        expected: NativeType,
        found: NativeType,
    },
    /// The property has no native default to revert to.
    NoDefault,
    /// The node lacks a capability the accessor needs (e.g. an attribute bag).
    MissingCapability(&'static str),
}

impl fmt::Display for AccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessError::TypeMismatch { expected, found } => {
                write!(f, "expected a {expected} value, got {found}")
            }
            AccessError::Conversion(msg) => write!(f, "conversion failed: {msg}"),
            AccessError::WrongNativeType { expected, found } => {
                write!(f, "accessor for {expected} applied to {found}")
            }
            AccessError::NoDefault => f.write_str("property has no default value"),
            AccessError::MissingCapability(what) => write!(f, "node has no {what}"),
        }
    }
}

impl std::error::Error for AccessError {}

/// Native scalar types a `Value` maps onto without a converter.
pub trait ValueType: Sized + 'static {
    const KIND: &'static str;

    fn from_value(value: &Value) -> Option<Self>;
    fn to_value(&self) -> Value;

    fn extract(value: &Value) -> Result<Self, AccessError> {
        Self::from_value(value).ok_or(AccessError::TypeMismatch {
            expected: Self::KIND,
            found: value.kind(),
        })
    }
}

impl ValueType for bool {
    const KIND: &'static str = "bool";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_bool()
    }

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl ValueType for i64 {
    const KIND: &'static str = "int";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_int()
    }

    fn to_value(&self) -> Value {
        Value::Int(*self)
    }
}

impl ValueType for i32 {
    const KIND: &'static str = "int";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_int().and_then(|i| i32::try_from(i).ok())
    }

    fn to_value(&self) -> Value {
        Value::Int(i64::from(*self))
    }
}

impl ValueType for f64 {
    const KIND: &'static str = "float";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_float()
    }

    fn to_value(&self) -> Value {
        Value::Float(*self)
    }
}

impl ValueType for String {
    const KIND: &'static str = "string";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_owned)
    }

    fn to_value(&self) -> Value {
        Value::from(self.as_str())
    }
}

impl ValueType for Value {
    const KIND: &'static str = "value";

    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }

    fn to_value(&self) -> Value {
        self.clone()
    }
}

/// Get/set strategy for one property of one native type.
pub trait PropertyAccessor {
    fn get(&self, node: &dyn NativeNode) -> Result<Value, AccessError>;
    fn set(&self, node: &mut dyn NativeNode, value: &Value) -> Result<(), AccessError>;

    /// Reverts the property to its native default.
    fn clear(&self, _node: &mut dyn NativeNode) -> Result<(), AccessError> {
        Err(AccessError::NoDefault)
    }

    /// Installs (or with `None`, removes) a change listener. Returns `false`
    /// when the property cannot be observed.
    fn listen(
        &self,
        _node: &mut dyn NativeNode,
        _listener: Option<ValueListener>,
    ) -> Result<bool, AccessError> {
        Ok(false)
    }

    fn is_read_only(&self) -> bool {
        false
    }
}

/// Attach/detach strategy for one event type of one native type.
pub trait EventAccessor {
    fn attach(&self, node: &mut dyn NativeNode, handler: NativeHandler) -> Result<(), AccessError>;
    fn detach(&self, node: &mut dyn NativeNode) -> Result<(), AccessError>;
}

fn native<N: NativeNode>(node: &dyn NativeNode) -> Result<&N, AccessError> {
    match downcast_ref::<N>(node) {
        Some(n) => Ok(n),
        None => Err(AccessError::WrongNativeType {
            expected: NativeType::of::<N>(),
            found: node.native_type(),
        }),
    }
}

fn native_mut<N: NativeNode>(node: &mut dyn NativeNode) -> Result<&mut N, AccessError> {
    let found = node.native_type();
    downcast_mut::<N>(node).ok_or(AccessError::WrongNativeType {
        expected: NativeType::of::<N>(),
        found,
    })
}

type ListenerSlot<N> = fn(&mut N) -> &mut Option<ValueListener>;

fn install_listener<N: NativeNode>(
    slot: Option<ListenerSlot<N>>,
    node: &mut dyn NativeNode,
    listener: Option<ValueListener>,
) -> Result<bool, AccessError> {
    let Some(slot) = slot else {
        return Ok(false);
    };
    *slot(native_mut::<N>(node)?) = listener;
    Ok(true)
}

/// Read-write accessor for a field that stores a [`ValueType`] directly.
pub struct ReadWriteAccessor<N, T> {
    get: fn(&N) -> T,
    set: fn(&mut N, T),
    default: Option<T>,
    listener: Option<ListenerSlot<N>>,
}

impl<N: NativeNode, T: ValueType + Clone> ReadWriteAccessor<N, T> {
    pub fn new(get: fn(&N) -> T, set: fn(&mut N, T)) -> Self {
        Self {
            get,
            set,
            default: None,
            listener: None,
        }
    }

    pub fn with_default(mut self, default: T) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_listener(mut self, slot: fn(&mut N) -> &mut Option<ValueListener>) -> Self {
        self.listener = Some(slot);
        self
    }
}

impl<N: NativeNode, T: ValueType + Clone> PropertyAccessor for ReadWriteAccessor<N, T> {
    fn get(&self, node: &dyn NativeNode) -> Result<Value, AccessError> {
        Ok((self.get)(native::<N>(node)?).to_value())
    }

    fn set(&self, node: &mut dyn NativeNode, value: &Value) -> Result<(), AccessError> {
        let value = T::extract(value)?;
        (self.set)(native_mut::<N>(node)?, value);
        Ok(())
    }

    fn clear(&self, node: &mut dyn NativeNode) -> Result<(), AccessError> {
        let default = self.default.clone().ok_or(AccessError::NoDefault)?;
        (self.set)(native_mut::<N>(node)?, default);
        Ok(())
    }

    fn listen(
        &self,
        node: &mut dyn NativeNode,
        listener: Option<ValueListener>,
    ) -> Result<bool, AccessError> {
        install_listener(self.listener, node, listener)
    }
}

/// Two-way translation between `Value` and a native representation.
pub struct Converter<T> {
    pub to_native: fn(&Value) -> Result<T, String>,
    pub to_value: fn(&T) -> Value,
}

impl<T> Clone for Converter<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Converter<T> {}

/// Read-write accessor that runs values through a [`Converter`].
pub struct ConvertingAccessor<N, T> {
    get: fn(&N) -> T,
    set: fn(&mut N, T),
    converter: Converter<T>,
    default: Option<T>,
    listener: Option<ListenerSlot<N>>,
}

impl<N: NativeNode, T: Clone + 'static> ConvertingAccessor<N, T> {
    pub fn new(get: fn(&N) -> T, set: fn(&mut N, T), converter: Converter<T>) -> Self {
        Self {
            get,
            set,
            converter,
            default: None,
            listener: None,
        }
    }

    pub fn with_default(mut self, default: T) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_listener(mut self, slot: fn(&mut N) -> &mut Option<ValueListener>) -> Self {
        self.listener = Some(slot);
        self
    }
}

impl<N: NativeNode, T: Clone + 'static> PropertyAccessor for ConvertingAccessor<N, T> {
    fn get(&self, node: &dyn NativeNode) -> Result<Value, AccessError> {
        let native = (self.get)(native::<N>(node)?);
        Ok((self.converter.to_value)(&native))
    }

    fn set(&self, node: &mut dyn NativeNode, value: &Value) -> Result<(), AccessError> {
        let converted = (self.converter.to_native)(value).map_err(AccessError::Conversion)?;
        (self.set)(native_mut::<N>(node)?, converted);
        Ok(())
    }

    fn clear(&self, node: &mut dyn NativeNode) -> Result<(), AccessError> {
        let default = self.default.clone().ok_or(AccessError::NoDefault)?;
        (self.set)(native_mut::<N>(node)?, default);
        Ok(())
    }

    fn listen(
        &self,
        node: &mut dyn NativeNode,
        listener: Option<ValueListener>,
    ) -> Result<bool, AccessError> {
        install_listener(self.listener, node, listener)
    }
}

/// Accessor for a derived, read-only native property. Writes are ignored.
pub struct ReadOnlyAccessor<N, T> {
    get: fn(&N) -> T,
}

impl<N: NativeNode, T: ValueType> ReadOnlyAccessor<N, T> {
    pub fn new(get: fn(&N) -> T) -> Self {
        Self { get }
    }
}

impl<N: NativeNode, T: ValueType> PropertyAccessor for ReadOnlyAccessor<N, T> {
    fn get(&self, node: &dyn NativeNode) -> Result<Value, AccessError> {
        Ok((self.get)(native::<N>(node)?).to_value())
    }

    fn set(&self, node: &mut dyn NativeNode, value: &Value) -> Result<(), AccessError> {
        log::trace!(
            target: "reconciler.accessor",
            "ignoring write of {value} to read-only property of {}",
            node.native_type()
        );
        Ok(())
    }

    fn clear(&self, _node: &mut dyn NativeNode) -> Result<(), AccessError> {
        Ok(())
    }

    fn is_read_only(&self) -> bool {
        true
    }
}

/// Stores a value under `key` in the node's attribute bag.
pub struct AttributeAccessor {
    key: Arc<str>,
}

impl AttributeAccessor {
    pub fn new(key: impl Into<Arc<str>>) -> Self {
        Self { key: key.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl PropertyAccessor for AttributeAccessor {
    fn get(&self, node: &dyn NativeNode) -> Result<Value, AccessError> {
        let attributes = node
            .attributes()
            .ok_or(AccessError::MissingCapability("attribute bag"))?;
        Ok(attributes.get(&*self.key).cloned().unwrap_or_default())
    }

    fn set(&self, node: &mut dyn NativeNode, value: &Value) -> Result<(), AccessError> {
        let attributes = node
            .attributes_mut()
            .ok_or(AccessError::MissingCapability("attribute bag"))?;
        attributes.insert(Arc::clone(&self.key), value.clone());
        Ok(())
    }

    fn clear(&self, node: &mut dyn NativeNode) -> Result<(), AccessError> {
        let attributes = node
            .attributes_mut()
            .ok_or(AccessError::MissingCapability("attribute bag"))?;
        attributes.remove(&*self.key);
        Ok(())
    }
}

/// Event accessor storing the handler in an `Option<NativeHandler>` field.
pub struct SlotEventAccessor<N> {
    slot: fn(&mut N) -> &mut Option<NativeHandler>,
}

impl<N: NativeNode> SlotEventAccessor<N> {
    pub fn new(slot: fn(&mut N) -> &mut Option<NativeHandler>) -> Self {
        Self { slot }
    }
}

impl<N: NativeNode> EventAccessor for SlotEventAccessor<N> {
    fn attach(&self, node: &mut dyn NativeNode, handler: NativeHandler) -> Result<(), AccessError> {
        *(self.slot)(native_mut::<N>(node)?) = Some(handler);
        Ok(())
    }

    fn detach(&self, node: &mut dyn NativeNode) -> Result<(), AccessError> {
        *(self.slot)(native_mut::<N>(node)?) = None;
        Ok(())
    }
}
