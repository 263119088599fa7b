//! Instantiates and initializes live native nodes from virtual nodes.

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::dispatch::{Dispatcher, event_adapter, listener_adapter};
use crate::native::NativeNode;
use crate::registry::AccessorRegistry;
use std::cell::Cell;
use std::rc::Rc;
use vdom::{EventHandler, EventType, PropertyName, VNode, VProperty};

/// Builds native subtrees and applies single property/handler edits.
///
/// Every fault below the structural level is reported to the diagnostics
/// sink and skipped; a build never fails as a whole.
pub struct NodeBuilder<'r, A> {
    registry: &'r AccessorRegistry,
    dispatcher: Dispatcher<A>,
    diagnostics: Rc<dyn DiagnosticSink>,
    /// Slots left empty because construction failed with no placeholder.
    vacated: Cell<usize>,
}

impl<'r, A: 'static> NodeBuilder<'r, A> {
    pub fn new(
        registry: &'r AccessorRegistry,
        dispatcher: Dispatcher<A>,
        diagnostics: Rc<dyn DiagnosticSink>,
    ) -> Self {
        Self {
            registry,
            dispatcher,
            diagnostics,
            vacated: Cell::new(0),
        }
    }

    pub fn registry(&self) -> &'r AccessorRegistry {
        self.registry
    }

    pub fn diagnostics(&self) -> &Rc<dyn DiagnosticSink> {
        &self.diagnostics
    }

    /// How many nodes this builder failed to construct without a placeholder
    /// to stand in. Each one is a virtual child with no live counterpart.
    pub fn vacated(&self) -> usize {
        self.vacated.get()
    }

    /// Builds the whole subtree described by `vnode`.
    ///
    /// Returns `None` when the root of the subtree could not be constructed
    /// and no placeholder is registered.
    pub fn build(&self, vnode: &VNode<A>) -> Option<Box<dyn NativeNode>> {
        let mut node = match self.registry.create(vnode.node_type()) {
            Ok(node) => node,
            Err(error) => {
                self.diagnostics.report(Diagnostic::ConstructionFailed {
                    node_type: vnode.node_type().clone(),
                    error,
                });
                let placeholder = self.registry.placeholder();
                if placeholder.is_none() {
                    self.vacated.set(self.vacated.get() + 1);
                }
                return placeholder;
            }
        };
        self.init(node.as_mut(), vnode);
        Some(node)
    }

    /// Applies properties, handlers and children of `vnode` to a freshly
    /// created `node`.
    pub fn init(&self, node: &mut dyn NativeNode, vnode: &VNode<A>) {
        log::trace!(
            target: "reconciler.build",
            "init {} as {}",
            vnode.node_type(),
            node.native_type()
        );
        for (name, property) in vnode.properties() {
            self.apply_property(node, name, property);
        }
        for (event, handler) in vnode.handlers() {
            self.attach_handler(node, event, handler);
        }
        if vnode.children().is_empty() {
            return;
        }
        let native = node.native_type();
        let Some(children) = node.children_mut() else {
            self.diagnostics.report(Diagnostic::MissingChildList {
                node_type: vnode.node_type().clone(),
                native,
                dropped: vnode.children().len(),
            });
            return;
        };
        for child in vnode.children() {
            if let Some(built) = self.build(child) {
                children.push(built);
            }
        }
    }

    /// Writes one property and (re)installs its change listener.
    pub fn apply_property(&self, node: &mut dyn NativeNode, name: &PropertyName, property: &VProperty<A>) {
        let native = node.native_type();
        let Some(accessor) = self.registry.resolve_property(native, name) else {
            self.diagnostics.report(Diagnostic::PropertyAccessorNotFound {
                native,
                name: name.clone(),
            });
            return;
        };
        if let Err(error) = accessor.set(node, property.value()) {
            self.diagnostics.report(Diagnostic::PropertyRejected {
                native,
                name: name.clone(),
                error,
            });
        }
        // The listener follows the new descriptor even when the value was rejected.
        let listener = property.listener().map(|listener| {
            listener_adapter(
                name.clone(),
                listener.clone(),
                self.dispatcher.clone(),
                Rc::clone(&self.diagnostics),
            )
        });
        let wanted = listener.is_some();
        match accessor.listen(node, listener) {
            Ok(true) => {}
            Ok(false) if wanted => self.diagnostics.report(Diagnostic::ListenerUnsupported {
                native,
                name: name.clone(),
            }),
            Ok(false) => {}
            Err(error) => self.diagnostics.report(Diagnostic::PropertyRejected {
                native,
                name: name.clone(),
                error,
            }),
        }
    }

    /// Reverts one property to its native default and drops its listener.
    pub fn clear_property(&self, node: &mut dyn NativeNode, name: &PropertyName) {
        let native = node.native_type();
        let Some(accessor) = self.registry.resolve_property(native, name) else {
            self.diagnostics.report(Diagnostic::PropertyAccessorNotFound {
                native,
                name: name.clone(),
            });
            return;
        };
        if let Err(error) = accessor.clear(node) {
            self.diagnostics.report(Diagnostic::PropertyRejected {
                native,
                name: name.clone(),
                error,
            });
        }
        if let Err(error) = accessor.listen(node, None) {
            log::debug!(target: "reconciler.accessor", "dropping listener for {name}: {error}");
        }
    }

    /// Replaces whatever handler is attached for `event` with an adapter
    /// around `handler`.
    pub fn attach_handler(&self, node: &mut dyn NativeNode, event: &EventType, handler: &EventHandler<A>) {
        let native = node.native_type();
        let Some(accessor) = self.registry.resolve_event(native, event.as_str()) else {
            self.diagnostics.report(Diagnostic::EventAccessorNotFound {
                native,
                event: event.clone(),
            });
            return;
        };
        let adapter = event_adapter(
            event.clone(),
            handler.clone(),
            self.dispatcher.clone(),
            Rc::clone(&self.diagnostics),
        );
        let attached = accessor
            .detach(node)
            .and_then(|()| accessor.attach(node, adapter));
        if let Err(error) = attached {
            self.diagnostics.report(Diagnostic::EventAttachFailed {
                native,
                event: event.clone(),
                error,
            });
        }
    }

    pub fn detach_handler(&self, node: &mut dyn NativeNode, event: &EventType) {
        let native = node.native_type();
        let Some(accessor) = self.registry.resolve_event(native, event.as_str()) else {
            self.diagnostics.report(Diagnostic::EventAccessorNotFound {
                native,
                event: event.clone(),
            });
            return;
        };
        if let Err(error) = accessor.detach(node) {
            self.diagnostics.report(Diagnostic::EventAttachFailed {
                native,
                event: event.clone(),
                error,
            });
        }
    }
}
