//! Native events and simulated user input.
//!
//! Real toolkits raise these from an input loop; here tests and the demo raise
//! them directly against a live node.

use crate::widgets::{Button, CheckBox, Pane, TextField};
use reconciler::{NativeHandler, NativeNode, ValueListener, downcast_mut, downcast_ref};
use std::any::Any;
use vdom::Value;

/// Payload of `"action"` events.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ActionEvent;

/// Payload of `"mouseClicked"` events.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MouseEvent {
    pub x: f64,
    pub y: f64,
    pub click_count: u32,
}

impl MouseEvent {
    pub fn click(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            click_count: 1,
        }
    }
}

fn handler_for(node: &dyn NativeNode, event: &str) -> Option<NativeHandler> {
    let any = node.as_any();
    let slot = if let Some(pane) = any.downcast_ref::<Pane>() {
        match event {
            "mouseClicked" => &pane.on_mouse_clicked,
            _ => return None,
        }
    } else if let Some(button) = any.downcast_ref::<Button>() {
        match event {
            "action" if button.disabled => return None,
            "action" => &button.on_action,
            "mouseClicked" => &button.on_mouse_clicked,
            _ => return None,
        }
    } else if let Some(field) = any.downcast_ref::<TextField>() {
        match event {
            "action" => &field.on_action,
            _ => return None,
        }
    } else if let Some(check) = any.downcast_ref::<CheckBox>() {
        match event {
            "action" => &check.on_action,
            _ => return None,
        }
    } else {
        return None;
    };
    slot.clone()
}

/// Raises `event` on `node` with `payload`. Returns whether a handler ran.
///
/// A disabled button swallows `"action"`.
pub fn fire(node: &dyn NativeNode, event: &str, payload: &dyn Any) -> bool {
    match handler_for(node, event) {
        Some(handler) => {
            log::trace!(target: "toolkit.event", "{} fires {event}", node.native_type());
            handler(payload);
            true
        }
        None => false,
    }
}

fn notify(listener: Option<ValueListener>, value: Value) {
    if let Some(listener) = listener {
        listener(&value);
    }
}

/// Replaces a text field's content as if the user typed it, notifying the
/// `text` listener. Returns `false` if `node` is not a text field.
pub fn type_text(node: &mut dyn NativeNode, text: &str) -> bool {
    let Some(field) = downcast_mut::<TextField>(node) else {
        return false;
    };
    field.text = text.to_string();
    let listener = field.on_text_change.clone();
    notify(listener, Value::from(text));
    true
}

/// Flips a check box as if clicked: notifies the `selected` listener, then
/// raises `"action"`. Returns `false` if `node` is not a check box.
pub fn toggle(node: &mut dyn NativeNode) -> bool {
    let Some(check) = downcast_mut::<CheckBox>(node) else {
        return false;
    };
    check.selected = !check.selected;
    let listener = check.on_selected_change.clone();
    notify(listener, Value::Bool(check.selected));
    fire(node, "action", &ActionEvent);
    true
}

/// Whether `node` is a button that is currently enabled.
pub fn is_enabled_button(node: &dyn NativeNode) -> bool {
    downcast_ref::<Button>(node).is_some_and(|b| !b.disabled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::Label;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder() -> (NativeHandler, Rc<RefCell<Vec<String>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        let handler: NativeHandler = Rc::new(move |payload: &dyn Any| {
            let kind = if payload.is::<ActionEvent>() {
                "action".to_string()
            } else if let Some(m) = payload.downcast_ref::<MouseEvent>() {
                format!("mouse x{}", m.click_count)
            } else {
                "other".to_string()
            };
            log.borrow_mut().push(kind);
        });
        (handler, seen)
    }

    #[test]
    fn fire_routes_to_the_matching_slot() {
        let (handler, seen) = recorder();
        let button = Button {
            on_action: Some(handler.clone()),
            on_mouse_clicked: Some(handler),
            ..Button::default()
        };
        assert!(fire(&button, "action", &ActionEvent));
        assert!(fire(&button, "mouseClicked", &MouseEvent::click(1.0, 2.0)));
        assert!(!fire(&button, "keyTyped", &ActionEvent));
        assert!(!fire(&Label::default(), "action", &ActionEvent));
        assert_eq!(*seen.borrow(), vec!["action", "mouse x1"]);
    }

    #[test]
    fn disabled_button_swallows_action() {
        let (handler, seen) = recorder();
        let button = Button {
            disabled: true,
            on_action: Some(handler),
            ..Button::default()
        };
        assert!(!fire(&button, "action", &ActionEvent));
        assert!(seen.borrow().is_empty());
        assert!(!is_enabled_button(&button));
    }

    #[test]
    fn toggle_notifies_then_fires_action() {
        let (handler, seen) = recorder();
        let values = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&values);
        let mut check = CheckBox {
            on_action: Some(handler),
            on_selected_change: Some(Rc::new(move |v: &Value| sink.borrow_mut().push(v.clone()))),
            ..CheckBox::default()
        };
        assert!(toggle(&mut check));
        assert!(check.selected);
        assert_eq!(*values.borrow(), vec![Value::Bool(true)]);
        assert_eq!(*seen.borrow(), vec!["action"]);
        assert!(!toggle(&mut Label::default()));
    }

    #[test]
    fn type_text_updates_field_and_listener() {
        let values = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&values);
        let mut field = TextField {
            on_text_change: Some(Rc::new(move |v: &Value| sink.borrow_mut().push(v.clone()))),
            ..TextField::default()
        };
        assert!(type_text(&mut field, "milk"));
        assert_eq!(field.text, "milk");
        assert_eq!(*values.borrow(), vec![Value::from("milk")]);
    }
}
