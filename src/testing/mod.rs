//! Headless testing support: Pilot, snapshot helpers.
//!
//! [`Pilot`] drives a [`Ui`](crate::app::Ui) through a scripted input source
//! with a virtual clock, so timers fire deterministically. The snapshot helpers
//! turn draw passes and panel layouts into compact text for inline snapshots.

pub mod pilot;
pub mod snapshot;

pub use pilot::Pilot;
pub use snapshot::{render_block, render_panels, render_ui};
