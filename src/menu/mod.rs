//! The menu item-string mini-language and the popups built from it.

pub mod lexer;
pub mod parse;
pub mod popup;

pub use parse::{MenuEntry, MenuSpec};
