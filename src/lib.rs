//! # blockui
//!
//! A headless immediate-mode widget and event kernel.
//!
//! Interfaces are built from blocks: flat lists of widgets with pixel
//! rectangles. Base blocks live side by side; popups (menus, icon rows, nested
//! blocks, color pickers) form a modal stack where only the top is serviced.
//! Blocks can be docked in collapsible, draggable panels that align, tab and
//! stow themselves. The kernel never draws; it describes each frame to a
//! [`render::DrawAdapter`].
//!
//! ## Core Systems
//!
//! - **[`block`]** — Widget containers, dispatch, keyboard navigation, motion-towards
//! - **[`widget`]** — Widget record, value bindings, one state machine per kind
//! - **[`menu`]** — Menu-string lexer and parser, popup builders
//! - **[`stack`]** — Slotmap arena of open blocks and the modal popup stack
//! - **[`panel`]** — Dockable panels: alignment, drag/merge, tabs, stowing, layout files
//! - **[`event`]** — Input events, input sources, navigation keymap, host outbox
//! - **[`render`]** — Draw adapter boundary and a recording adapter
//! - **[`app`]** — [`Ui`], the runner that owns everything and pumps events
//! - **[`context`]** — Runtime state shared by dispatch: clipboard, tooltip, after-callback
//! - **[`config`]** — Timing, policy and panel constants
//! - **[`geometry`]** — Offset, Size, Region, Spacing primitives
//! - **[`testing`]** — Headless pilot with a virtual clock, text snapshots

// Foundation
pub mod config;
pub mod error;
pub mod geometry;
pub mod logging;

// Widgets and blocks
pub mod block;
pub mod menu;
pub mod widget;

// Runtime
pub mod context;
pub mod event;
pub mod stack;

// Panels
pub mod panel;

// Rendering
pub mod render;

// Application
pub mod app;

// Testing
pub mod testing;

pub use app::Ui;
pub use block::{Block, BlockFlags, BlockResult};
pub use config::UiConfig;
pub use error::UiError;
pub use panel::{PanelId, PanelSurface};
pub use stack::BlockId;
pub use widget::Widget;
