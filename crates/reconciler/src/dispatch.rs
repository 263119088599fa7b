//! Dispatcher channel and the adapters that connect native callbacks to it.

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::native::{NativeHandler, ValueListener};
use std::any::Any;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::rc::Rc;
use std::sync::mpsc::Sender;
use vdom::{ChangeListener, EventHandler, EventType, PropertyName, Value};

/// Callback receiving every non-null action produced by an event.
pub struct Dispatcher<A> {
    f: Rc<dyn Fn(A)>,
}

impl<A: 'static> Dispatcher<A> {
    pub fn new(f: impl Fn(A) + 'static) -> Self {
        Self { f: Rc::new(f) }
    }

    /// Forwards actions into a channel. A send to a dropped receiver is
    /// logged and the action discarded.
    pub fn from_sender(sender: Sender<A>) -> Self {
        Self::new(move |action| {
            if sender.send(action).is_err() {
                log::warn!(target: "reconciler.event", "action receiver dropped; discarding action");
            }
        })
    }

    /// Dispatcher that drops every action.
    pub fn discard() -> Self {
        Self::new(|_| {})
    }
}

impl<A> Dispatcher<A> {
    pub fn dispatch(&self, action: A) {
        (self.f)(action)
    }
}

impl<A> Clone for Dispatcher<A> {
    fn clone(&self) -> Self {
        Self {
            f: Rc::clone(&self.f),
        }
    }
}

impl<A> fmt::Debug for Dispatcher<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Dispatcher")
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Wraps `handler` into a native callback: run the pure function, dispatch a
/// non-null action. Nothing unwinds out of the returned callback; payload
/// mismatches and panics are reported and the occurrence dropped.
pub fn event_adapter<A: 'static>(
    event: EventType,
    handler: EventHandler<A>,
    dispatcher: Dispatcher<A>,
    diagnostics: Rc<dyn DiagnosticSink>,
) -> NativeHandler {
    Rc::new(move |payload: &dyn Any| {
        let outcome = catch_unwind(AssertUnwindSafe(|| match handler.handle(payload) {
            Ok(Some(action)) => {
                dispatcher.dispatch(action);
                Ok(true)
            }
            Ok(None) => Ok(false),
            Err(error) => Err(error),
        }));
        match outcome {
            Ok(Ok(dispatched)) => {
                log::trace!(target: "reconciler.event", "'{event}' fired, dispatched: {dispatched}");
            }
            Ok(Err(error)) => diagnostics.report(Diagnostic::HandlerMismatch {
                event: event.clone(),
                error,
            }),
            Err(panic) => diagnostics.report(Diagnostic::HandlerPanicked {
                event: event.clone(),
                message: panic_message(panic.as_ref()),
            }),
        }
    })
}

/// Native-side change listener for property `name`, mapping new values to
/// actions the same way [`event_adapter`] does.
pub fn listener_adapter<A: 'static>(
    name: PropertyName,
    listener: ChangeListener<A>,
    dispatcher: Dispatcher<A>,
    diagnostics: Rc<dyn DiagnosticSink>,
) -> ValueListener {
    let event = EventType::new(format!("change:{name}"));
    Rc::new(move |value: &Value| {
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            if let Some(action) = listener.on_change(value) {
                dispatcher.dispatch(action);
            }
        }));
        if let Err(panic) = outcome {
            diagnostics.report(Diagnostic::HandlerPanicked {
                event: event.clone(),
                message: panic_message(panic.as_ref()),
            });
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::RecordingSink;
    use std::cell::RefCell;
    use std::sync::mpsc;

    #[derive(Clone, Debug, PartialEq)]
    enum Action {
        Clicked(u32),
        Typed(String),
    }

    struct Click(u32);

    fn recording() -> (Dispatcher<Action>, Rc<RefCell<Vec<Action>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        (Dispatcher::new(move |a| sink.borrow_mut().push(a)), log)
    }

    #[test]
    fn adapter_dispatches_non_null_actions_only() {
        let (dispatcher, actions) = recording();
        let handler = EventHandler::new(|c: &Click| (c.0 > 0).then_some(Action::Clicked(c.0)));
        let sink = Rc::new(RecordingSink::new());
        let native = event_adapter("action".into(), handler, dispatcher, sink.clone());
        native(&Click(0));
        native(&Click(2));
        assert_eq!(*actions.borrow(), vec![Action::Clicked(2)]);
        assert!(sink.is_empty());
    }

    #[test]
    fn adapter_reports_unexpected_payload() {
        let (dispatcher, actions) = recording();
        let handler = EventHandler::new(|c: &Click| Some(Action::Clicked(c.0)));
        let sink = Rc::new(RecordingSink::new());
        let native = event_adapter("action".into(), handler, dispatcher, sink.clone());
        native(&"not a click");
        assert!(actions.borrow().is_empty());
        assert!(matches!(sink.take()[..], [Diagnostic::HandlerMismatch { .. }]));
    }

    #[test]
    fn adapter_contains_panics() {
        let (dispatcher, actions) = recording();
        let handler = EventHandler::<Action>::any(|_| panic!("view bug"));
        let sink = Rc::new(RecordingSink::new());
        let native = event_adapter("action".into(), handler, dispatcher, sink.clone());
        native(&());
        assert!(actions.borrow().is_empty());
        match &sink.take()[..] {
            [Diagnostic::HandlerPanicked { message, .. }] => assert_eq!(message, "view bug"),
            other => panic!("unexpected diagnostics {other:?}"),
        }
    }

    #[test]
    fn listener_adapter_maps_values_to_actions() {
        let (dispatcher, actions) = recording();
        let listener = ChangeListener::new(|v: &Value| v.as_str().map(|s| Action::Typed(s.to_string())));
        let sink = Rc::new(RecordingSink::new());
        let native = listener_adapter("text".into(), listener, dispatcher, sink);
        native(&Value::from("abc"));
        native(&Value::Int(1));
        assert_eq!(*actions.borrow(), vec![Action::Typed("abc".into())]);
    }

    #[test]
    fn sender_dispatcher_survives_dropped_receiver() {
        let (tx, rx) = mpsc::channel();
        let dispatcher = Dispatcher::from_sender(tx);
        dispatcher.dispatch(Action::Clicked(1));
        assert_eq!(rx.try_recv(), Ok(Action::Clicked(1)));
        drop(rx);
        dispatcher.dispatch(Action::Clicked(2));
    }
}
