//! Retained-mode widgets held entirely in memory.

use reconciler::{Attributes, NativeHandler, NativeNode, ValueListener, impl_native_node};
use std::fmt;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color {
        r: 0xff,
        g: 0xff,
        b: 0xff,
    };

    /// Parses `#rrggbb` (case-insensitive).
    pub fn parse(raw: &str) -> Result<Color, String> {
        let hex = raw
            .strip_prefix('#')
            .filter(|hex| hex.len() == 6 && hex.is_ascii())
            .ok_or_else(|| format!("expected #rrggbb, got {raw:?}"))?;
        let channel = |at: usize| {
            u8::from_str_radix(&hex[at..at + 2], 16).map_err(|_| format!("bad hex digits in {raw:?}"))
        };
        Ok(Color {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

impl Orientation {
    pub fn parse(raw: &str) -> Result<Orientation, String> {
        match raw {
            "vertical" => Ok(Orientation::Vertical),
            "horizontal" => Ok(Orientation::Horizontal),
            other => Err(format!("unknown orientation {other:?}")),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Orientation::Vertical => "vertical",
            Orientation::Horizontal => "horizontal",
        }
    }
}

/// Sized container with a background.
pub struct Pane {
    pub width: f64,
    pub height: f64,
    pub background: Color,
    pub children: Vec<Box<dyn NativeNode>>,
    pub on_mouse_clicked: Option<NativeHandler>,
    pub attributes: Attributes,
}

impl Default for Pane {
    fn default() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            background: Color::WHITE,
            children: Vec::new(),
            on_mouse_clicked: None,
            attributes: Attributes::new(),
        }
    }
}

/// Lays children out in a row or column.
#[derive(Default)]
pub struct Stack {
    pub orientation: Orientation,
    pub spacing: f64,
    pub children: Vec<Box<dyn NativeNode>>,
    pub attributes: Attributes,
}

#[derive(Default)]
pub struct Label {
    pub text: String,
    pub wrap_text: bool,
    pub attributes: Attributes,
}

#[derive(Default)]
pub struct Button {
    pub text: String,
    pub disabled: bool,
    pub on_action: Option<NativeHandler>,
    pub on_mouse_clicked: Option<NativeHandler>,
    pub attributes: Attributes,
}

#[derive(Default)]
pub struct TextField {
    pub text: String,
    pub prompt_text: String,
    pub on_text_change: Option<ValueListener>,
    pub on_action: Option<NativeHandler>,
    pub attributes: Attributes,
}

#[derive(Default)]
pub struct CheckBox {
    pub text: String,
    pub selected: bool,
    pub on_selected_change: Option<ValueListener>,
    pub on_action: Option<NativeHandler>,
    pub attributes: Attributes,
}

/// Empty leaf standing in for a node that could not be built.
#[derive(Default)]
pub struct Placeholder {
    pub attributes: Attributes,
}

impl_native_node!(Pane, children: children, attributes: attributes);
impl_native_node!(Stack, children: children, attributes: attributes);
impl_native_node!(Label, attributes: attributes);
impl_native_node!(Button, attributes: attributes);
impl_native_node!(TextField, attributes: attributes);
impl_native_node!(CheckBox, attributes: attributes);
impl_native_node!(Placeholder, attributes: attributes);
