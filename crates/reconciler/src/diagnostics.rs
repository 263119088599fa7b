//! Reporting channel for recoverable reconciliation faults.
//!
//! Nothing reported here aborts a render: the affected property, handler or
//! subtree is skipped and the rest of the batch proceeds.

use crate::accessor::AccessError;
use crate::native::NativeType;
use crate::registry::BuildError;
use std::cell::RefCell;
use std::fmt;
use vdom::{EventType, HandlerError, NodeType, PropertyName};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warn,
    Error,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Diagnostic {
    ConstructionFailed {
        node_type: NodeType,
        error: BuildError,
    },
    PropertyAccessorNotFound {
        native: NativeType,
        name: PropertyName,
    },
    EventAccessorNotFound {
        native: NativeType,
        event: EventType,
    },
    PropertyRejected {
        native: NativeType,
        name: PropertyName,
        error: AccessError,
    },
    ListenerUnsupported {
        native: NativeType,
        name: PropertyName,
    },
    EventAttachFailed {
        native: NativeType,
        event: EventType,
        error: AccessError,
    },
    MissingChildList {
        node_type: NodeType,
        native: NativeType,
        dropped: usize,
    },
    HandlerMismatch {
        event: EventType,
        error: HandlerError,
    },
    HandlerPanicked {
        event: EventType,
        message: String,
    },
    StructuralInconsistency {
        path: Vec<usize>,
        detail: String,
    },
}

impl Diagnostic {
    pub fn severity(&self) -> Severity {
        match self {
            Diagnostic::ConstructionFailed { .. }
            | Diagnostic::HandlerPanicked { .. }
            | Diagnostic::StructuralInconsistency { .. } => Severity::Error,
            _ => Severity::Warn,
        }
    }

    /// `log` target the diagnostic is filed under.
    pub fn target(&self) -> &'static str {
        match self {
            Diagnostic::ConstructionFailed { .. } | Diagnostic::MissingChildList { .. } => {
                "reconciler.build"
            }
            Diagnostic::PropertyAccessorNotFound { .. }
            | Diagnostic::EventAccessorNotFound { .. }
            | Diagnostic::PropertyRejected { .. }
            | Diagnostic::ListenerUnsupported { .. } => "reconciler.accessor",
            Diagnostic::EventAttachFailed { .. }
            | Diagnostic::HandlerMismatch { .. }
            | Diagnostic::HandlerPanicked { .. } => "reconciler.event",
            Diagnostic::StructuralInconsistency { .. } => "reconciler.patch",
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::ConstructionFailed { node_type, error } => {
                write!(f, "could not construct {node_type}: {error}")
            }
            Diagnostic::PropertyAccessorNotFound { native, name } => {
                write!(f, "no accessor for property '{name}' of {native}")
            }
            Diagnostic::EventAccessorNotFound { native, event } => {
                write!(f, "no accessor for event '{event}' of {native}")
            }
            Diagnostic::PropertyRejected { native, name, error } => {
                write!(f, "property '{name}' of {native} rejected: {error}")
            }
            Diagnostic::ListenerUnsupported { native, name } => {
                write!(f, "property '{name}' of {native} cannot be observed")
            }
            Diagnostic::EventAttachFailed { native, event, error } => {
                write!(f, "could not attach '{event}' handler to {native}: {error}")
            }
            Diagnostic::MissingChildList {
                node_type,
                native,
                dropped,
            } => write!(
                f,
                "{node_type} ({native}) has no child list; {dropped} children skipped"
            ),
            Diagnostic::HandlerMismatch { event, error } => {
                write!(f, "'{event}' handler: {error}")
            }
            Diagnostic::HandlerPanicked { event, message } => {
                write!(f, "'{event}' handler panicked: {message}")
            }
            Diagnostic::StructuralInconsistency { path, detail } => {
                write!(f, "structural inconsistency at {path:?}: {detail}")
            }
        }
    }
}

pub trait DiagnosticSink {
    fn report(&self, diagnostic: Diagnostic);
}

/// Forwards diagnostics to the `log` facade.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&self, diagnostic: Diagnostic) {
        let level = match diagnostic.severity() {
            Severity::Warn => log::Level::Warn,
            Severity::Error => log::Level::Error,
        };
        log::log!(target: diagnostic.target(), level, "{diagnostic}");
    }
}

/// Collects diagnostics for later inspection.
#[derive(Debug, Default)]
pub struct RecordingSink {
    entries: RefCell<Vec<Diagnostic>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn entries(&self) -> Vec<Diagnostic> {
        self.entries.borrow().clone()
    }

    /// Drains everything recorded so far.
    pub fn take(&self) -> Vec<Diagnostic> {
        self.entries.take()
    }
}

impl DiagnosticSink for RecordingSink {
    fn report(&self, diagnostic: Diagnostic) {
        log::debug!(target: diagnostic.target(), "recorded: {diagnostic}");
        self.entries.borrow_mut().push(diagnostic);
    }
}
