//! Input events, input sources, navigation bindings and the host outbox.

pub mod binding;
pub mod handler;
pub mod input;
pub mod source;

pub use binding::{KeyMap, NavAction};
pub use handler::{Outbox, UiEvent};
pub use input::{Code, Event, Key, Modifiers, PointerButton, Value};
pub use source::{InputSource, Polled, ScriptedInput, TerminalInput};
