//! Indented text rendering of a live widget tree.

use crate::widgets::{Button, CheckBox, Label, Pane, Stack, TextField};
use reconciler::NativeNode;
use std::fmt::Write;

fn describe(node: &dyn NativeNode) -> String {
    let any = node.as_any();
    let mut line = if let Some(p) = any.downcast_ref::<Pane>() {
        format!("Pane {}x{} {}", p.width, p.height, p.background)
    } else if let Some(s) = any.downcast_ref::<Stack>() {
        format!("Stack {} spacing={}", s.orientation.as_str(), s.spacing)
    } else if let Some(l) = any.downcast_ref::<Label>() {
        format!("Label {:?}", l.text)
    } else if let Some(b) = any.downcast_ref::<Button>() {
        let state = if b.disabled { " [disabled]" } else { "" };
        format!("Button {:?}{state}", b.text)
    } else if let Some(f) = any.downcast_ref::<TextField>() {
        format!("TextField {:?} prompt={:?}", f.text, f.prompt_text)
    } else if let Some(c) = any.downcast_ref::<CheckBox>() {
        let mark = if c.selected { "x" } else { " " };
        format!("CheckBox [{mark}] {:?}", c.text)
    } else {
        node.native_type().name().to_string()
    };
    if let Some(attributes) = node.attributes() {
        for (key, value) in attributes {
            let _ = write!(line, " {key}={value}");
        }
    }
    line
}

fn walk(node: &dyn NativeNode, depth: usize, budget: &mut usize, out: &mut String) {
    if *budget == 0 {
        return;
    }
    *budget -= 1;
    let _ = writeln!(out, "{:indent$}{}", "", describe(node), indent = depth * 2);
    if let Some(children) = node.children() {
        for child in (0..children.len()).filter_map(|i| children.get(i)) {
            walk(child, depth + 1, budget, out);
        }
    }
}

/// Renders at most `cap` nodes, one per line, children indented by two
/// spaces. A trailing line counts the nodes left out.
pub fn outline(node: &dyn NativeNode, cap: usize) -> String {
    let mut out = String::new();
    let mut budget = cap;
    walk(node, 0, &mut budget, &mut out);
    let total = reconciler::native::subtree_len(node);
    if total > cap {
        let _ = writeln!(out, "... ({} more)", total - cap);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::Placeholder;
    use std::sync::Arc;
    use vdom::Value;

    fn sample() -> Pane {
        let mut stack = Stack::default();
        stack.children.push(Box::new(Label {
            text: "Count: 1".into(),
            ..Label::default()
        }));
        stack.children.push(Box::new(Button {
            text: "+".into(),
            disabled: true,
            ..Button::default()
        }));
        let mut placeholder = Placeholder::default();
        placeholder.attributes.insert(Arc::from("data-slot"), Value::Int(2));
        stack.children.push(Box::new(placeholder));
        Pane {
            width: 200.0,
            height: 100.0,
            children: vec![Box::new(stack)],
            ..Pane::default()
        }
    }

    #[test]
    fn outline_indents_children() {
        let text = outline(&sample(), usize::MAX);
        assert_eq!(
            text,
            "Pane 200x100 #ffffff\n  Stack vertical spacing=0\n    Label \"Count: 1\"\n    Button \"+\" [disabled]\n    Placeholder data-slot=2\n"
        );
    }

    #[test]
    fn outline_respects_cap() {
        let text = outline(&sample(), 2);
        assert_eq!(text.lines().count(), 3);
        assert!(text.ends_with("... (3 more)\n"));
    }
}
