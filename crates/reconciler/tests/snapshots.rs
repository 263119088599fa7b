//! JSON snapshots of live trees (requires the `serde` feature).

use reconciler::{Dispatcher, Renderer};
use serde_json::json;
use vdom::VNode;

fn render(view: VNode<()>) -> serde_json::Value {
    let mut renderer = Renderer::new(memory_toolkit::registry(), Dispatcher::discard());
    renderer.render(view).expect("render failed");
    serde_json::to_value(renderer.snapshot()).expect("snapshot serializes")
}

#[test]
fn snapshot_serializes_properties_attributes_and_children() {
    let actual = render(
        VNode::new("Stack")
            .property("orientation", "horizontal")
            .property("data-role", "toolbar")
            .child(VNode::new("Label").property("text", "hi"))
            .child(VNode::new("CheckBox").property("selected", true)),
    );
    let expected = json!({
        "native": "Stack",
        "properties": { "orientation": "horizontal", "spacing": 0.0 },
        "attributes": { "data-role": "toolbar" },
        "children": [
            {
                "native": "Label",
                "properties": { "text": "hi", "textLength": 2, "wrapText": false }
            },
            {
                "native": "CheckBox",
                "properties": { "selected": true, "text": "" }
            }
        ]
    });
    assert_eq!(actual, expected);
}

#[test]
fn patched_and_fresh_trees_serialize_identically() {
    let prev = VNode::new("Pane")
        .property("width", 10)
        .child(VNode::new("Button").property("text", "a").property("disabled", true));
    let next = VNode::new("Pane")
        .property("background", "#102030")
        .child(VNode::new("Button").property("text", "b"))
        .child(VNode::new("TextField").property("promptText", "name"));

    let mut patched = Renderer::new(memory_toolkit::registry(), Dispatcher::discard());
    patched.render(prev).unwrap();
    patched.render(next.clone()).unwrap();
    let patched = serde_json::to_value(patched.snapshot()).unwrap();
    assert_eq!(patched, render(next));
}
