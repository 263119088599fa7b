//! Accessor registrations for every widget.

use crate::widgets::{Button, CheckBox, Color, Label, Orientation, Pane, Placeholder, Stack, TextField};
use reconciler::{
    AccessorRegistry, AttributeProvider, ConvertingAccessor, Converter, ReadOnlyAccessor,
    ReadWriteAccessor, SlotEventAccessor,
};
use vdom::Value;

const COLOR: Converter<Color> = Converter {
    to_native: |value| match value.as_str() {
        Some(raw) => Color::parse(raw),
        None => Err(format!("expected a color string, got {}", value.kind())),
    },
    to_value: |color| Value::from(color.to_string()),
};

const ORIENTATION: Converter<Orientation> = Converter {
    to_native: |value| match value.as_str() {
        Some(raw) => Orientation::parse(raw),
        None => Err(format!("expected an orientation string, got {}", value.kind())),
    },
    to_value: |orientation| Value::from(orientation.as_str()),
};

/// A registry with every widget type, accessor and event of this toolkit, the
/// `data-*` attribute provider and the placeholder.
pub fn registry() -> AccessorRegistry {
    let mut registry = AccessorRegistry::new();
    register_containers(&mut registry);
    register_controls(&mut registry);
    registry
        .register_type::<Placeholder>("Placeholder")
        .add_provider(AttributeProvider::default())
        .set_placeholder(|| Box::new(Placeholder::default()));
    registry
}

fn register_containers(registry: &mut AccessorRegistry) {
    registry
        .register_type::<Pane>("Pane")
        .register_property::<Pane>(
            "width",
            ReadWriteAccessor::<Pane, f64>::new(|p| p.width, |p, v| p.width = v).with_default(0.0),
        )
        .register_property::<Pane>(
            "height",
            ReadWriteAccessor::<Pane, f64>::new(|p| p.height, |p, v| p.height = v).with_default(0.0),
        )
        .register_property::<Pane>(
            "background",
            ConvertingAccessor::<Pane, Color>::new(|p| p.background, |p, v| p.background = v, COLOR)
                .with_default(Color::WHITE),
        )
        .register_property::<Pane>(
            "childCount",
            ReadOnlyAccessor::<Pane, i64>::new(|p| p.children.len() as i64),
        )
        .register_event::<Pane>(
            "mouseClicked",
            SlotEventAccessor::<Pane>::new(|p| &mut p.on_mouse_clicked),
        );

    registry
        .register_type::<Stack>("Stack")
        .register_property::<Stack>(
            "orientation",
            ConvertingAccessor::<Stack, Orientation>::new(
                |s| s.orientation,
                |s, v| s.orientation = v,
                ORIENTATION,
            )
            .with_default(Orientation::Vertical),
        )
        .register_property::<Stack>(
            "spacing",
            ReadWriteAccessor::<Stack, f64>::new(|s| s.spacing, |s, v| s.spacing = v).with_default(0.0),
        );
}

fn register_controls(registry: &mut AccessorRegistry) {
    registry
        .register_type::<Label>("Label")
        .register_property::<Label>(
            "text",
            ReadWriteAccessor::<Label, String>::new(|l| l.text.clone(), |l, v| l.text = v)
                .with_default(String::new()),
        )
        .register_property::<Label>(
            "wrapText",
            ReadWriteAccessor::<Label, bool>::new(|l| l.wrap_text, |l, v| l.wrap_text = v)
                .with_default(false),
        )
        .register_property::<Label>(
            "textLength",
            ReadOnlyAccessor::<Label, i64>::new(|l| l.text.chars().count() as i64),
        );

    registry
        .register_type::<Button>("Button")
        .register_property::<Button>(
            "text",
            ReadWriteAccessor::<Button, String>::new(|b| b.text.clone(), |b, v| b.text = v)
                .with_default(String::new()),
        )
        .register_property::<Button>(
            "disabled",
            ReadWriteAccessor::<Button, bool>::new(|b| b.disabled, |b, v| b.disabled = v)
                .with_default(false),
        )
        .register_event::<Button>("action", SlotEventAccessor::<Button>::new(|b| &mut b.on_action))
        .register_event::<Button>(
            "mouseClicked",
            SlotEventAccessor::<Button>::new(|b| &mut b.on_mouse_clicked),
        );

    registry
        .register_type::<TextField>("TextField")
        .register_property::<TextField>(
            "text",
            ReadWriteAccessor::<TextField, String>::new(|f| f.text.clone(), |f, v| f.text = v)
                .with_default(String::new())
                .with_listener(|f| &mut f.on_text_change),
        )
        .register_property::<TextField>(
            "promptText",
            ReadWriteAccessor::<TextField, String>::new(|f| f.prompt_text.clone(), |f, v| {
                f.prompt_text = v
            })
            .with_default(String::new()),
        )
        .register_event::<TextField>(
            "action",
            SlotEventAccessor::<TextField>::new(|f| &mut f.on_action),
        );

    registry
        .register_type::<CheckBox>("CheckBox")
        .register_property::<CheckBox>(
            "text",
            ReadWriteAccessor::<CheckBox, String>::new(|c| c.text.clone(), |c, v| c.text = v)
                .with_default(String::new()),
        )
        .register_property::<CheckBox>(
            "selected",
            ReadWriteAccessor::<CheckBox, bool>::new(|c| c.selected, |c, v| c.selected = v)
                .with_default(false)
                .with_listener(|c| &mut c.on_selected_change),
        )
        .register_event::<CheckBox>(
            "action",
            SlotEventAccessor::<CheckBox>::new(|c| &mut c.on_action),
        );
}

#[cfg(test)]
mod tests {
    use super::*;
    use reconciler::NativeType;

    #[test]
    fn every_widget_has_a_factory() {
        let registry = registry();
        for name in ["Pane", "Stack", "Label", "Button", "TextField", "CheckBox", "Placeholder"] {
            assert!(registry.knows(&name.into()), "{name} not registered");
        }
        assert!(registry.placeholder().is_some());
    }

    #[test]
    fn registered_properties_are_listed_sorted() {
        let registry = registry();
        let names: Vec<String> = registry
            .registered_properties(NativeType::of::<Label>())
            .iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(names, vec!["text", "textLength", "wrapText"]);
    }

    #[test]
    fn every_registered_event_is_reachable_by_fire() {
        use crate::events::{ActionEvent, MouseEvent, fire};
        use std::any::Any;
        use std::cell::Cell;
        use std::rc::Rc;

        let registry = registry();
        let click = MouseEvent::click(0.0, 0.0);
        let mut checked = 0;
        for name in ["Pane", "Stack", "Label", "Button", "TextField", "CheckBox", "Placeholder"] {
            let mut node = registry.create(&name.into()).unwrap();
            let native = node.native_type();
            for event in registry.registered_events(native) {
                let hits = Rc::new(Cell::new(0));
                let counter = Rc::clone(&hits);
                let accessor = registry.resolve_event(native, &event).unwrap();
                accessor
                    .attach(node.as_mut(), Rc::new(move |_: &dyn Any| counter.set(counter.get() + 1)))
                    .unwrap();
                let payload: &dyn Any = if &*event == "mouseClicked" { &click } else { &ActionEvent };
                assert!(fire(node.as_ref(), &event, payload), "{name}.{event} not fired");
                assert_eq!(hits.get(), 1, "{name}.{event}");
                checked += 1;
            }
        }
        assert_eq!(checked, 5);
    }

    #[test]
    fn color_converter_round_trips_through_the_pane() {
        let registry = registry();
        let accessor = registry
            .resolve_property(NativeType::of::<Pane>(), "background")
            .unwrap();
        let mut pane = Pane::default();
        accessor.set(&mut pane, &Value::from("#102030")).unwrap();
        assert_eq!(accessor.get(&pane).unwrap(), Value::from("#102030"));
        assert!(accessor.set(&mut pane, &Value::Int(1)).is_err());
        accessor.clear(&mut pane).unwrap();
        assert_eq!(pane.background, Color::WHITE);
    }

    #[test]
    fn data_attributes_resolve_for_any_widget() {
        let registry = registry();
        assert!(registry
            .resolve_property(NativeType::of::<Button>(), "data-test-id")
            .is_some());
        assert!(registry
            .resolve_property(NativeType::of::<Button>(), "tooltip")
            .is_none());
    }
}
