//! An in-memory widget toolkit for driving the reconciler.
//!
//! Widgets are plain structs implementing [`reconciler::NativeNode`]; nothing
//! is drawn. [`registry`] wires every widget property and event into an
//! [`reconciler::AccessorRegistry`], and [`events`] raises native events the
//! way an input loop would.

pub mod events;
pub mod outline;
pub mod registry;
pub mod widgets;

pub use crate::events::{ActionEvent, MouseEvent, fire, toggle, type_text};
pub use crate::outline::outline;
pub use crate::registry::registry;
pub use crate::widgets::{
    Button, CheckBox, Color, Label, Orientation, Pane, Placeholder, Stack, TextField,
};
