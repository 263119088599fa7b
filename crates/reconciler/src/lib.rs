//! Applies virtual-tree patches to a live tree of native toolkit nodes.
//!
//! The pieces, leaves first:
//! - [`native`]: the toolkit surface (`NativeNode`, `ChildList`).
//! - [`accessor`] and [`registry`]: property/event strategies per native type.
//! - [`builder`]: builds native subtrees from virtual nodes.
//! - [`patcher`]: applies a patch batch to a live tree.
//! - [`renderer`]: keeps the previous virtual tree and the live root together.
//!
//! Recoverable faults go to a [`DiagnosticSink`]; only structural faults are
//! returned as errors, subject to [`StructuralPolicy`].

pub mod accessor;
pub mod builder;
pub mod config;
pub mod diagnostics;
pub mod dispatch;
pub mod inspect;
pub mod native;
pub mod patcher;
pub mod registry;
pub mod renderer;

pub use crate::accessor::{
    AccessError, AttributeAccessor, ConvertingAccessor, Converter, EventAccessor,
    PropertyAccessor, ReadOnlyAccessor, ReadWriteAccessor, SlotEventAccessor, ValueType,
};
pub use crate::builder::NodeBuilder;
pub use crate::config::{ReconcilerConfig, StructuralPolicy};
pub use crate::diagnostics::{Diagnostic, DiagnosticSink, LogSink, RecordingSink, Severity};
pub use crate::dispatch::{Dispatcher, event_adapter, listener_adapter};
pub use crate::inspect::{NodeSnapshot, snapshot, snapshot_root};
pub use crate::native::{
    Attributes, ChildList, NativeHandler, NativeNode, NativeType, ValueListener, downcast_mut,
    downcast_ref, node_at, node_at_mut,
};
pub use crate::patcher::{PatchError, Patcher};
pub use crate::registry::{AccessorProvider, AccessorRegistry, AttributeProvider, BuildError};
pub use crate::renderer::{RenderStats, Renderer};

/// Implements the boilerplate [`NativeNode`] methods for a concrete type.
///
/// ```ignore
/// impl_native_node!(Placeholder);
/// impl_native_node!(Label, attributes: attributes);
/// impl_native_node!(Pane, children: children, attributes: attributes);
/// ```
#[macro_export]
macro_rules! impl_native_node {
    (@base) => {
        fn native_type(&self) -> $crate::NativeType {
            $crate::NativeType::of::<Self>()
        }
        fn as_any(&self) -> &dyn ::std::any::Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
            self
        }
    };
    (@children $field:ident) => {
        fn children(&self) -> Option<&dyn $crate::ChildList> {
            Some(&self.$field)
        }
        fn children_mut(&mut self) -> Option<&mut dyn $crate::ChildList> {
            Some(&mut self.$field)
        }
    };
    (@attributes $field:ident) => {
        fn attributes(&self) -> Option<&$crate::Attributes> {
            Some(&self.$field)
        }
        fn attributes_mut(&mut self) -> Option<&mut $crate::Attributes> {
            Some(&mut self.$field)
        }
    };
    ($ty:ty) => {
        impl $crate::NativeNode for $ty {
            $crate::impl_native_node!(@base);
        }
    };
    ($ty:ty, attributes: $attrs:ident) => {
        impl $crate::NativeNode for $ty {
            $crate::impl_native_node!(@base);
            $crate::impl_native_node!(@attributes $attrs);
        }
    };
    ($ty:ty, children: $children:ident, attributes: $attrs:ident) => {
        impl $crate::NativeNode for $ty {
            $crate::impl_native_node!(@base);
            $crate::impl_native_node!(@children $children);
            $crate::impl_native_node!(@attributes $attrs);
        }
    };
}
