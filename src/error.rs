//! Error type shared by the fallible parts of the kernel.
//!
//! Interaction never fails outward: locked widgets and malformed menu strings are
//! handled in-band. `UiError` covers construction mistakes, configuration loading
//! and invariant violations that a caller can observe.

/// Errors produced by blockui.
#[derive(Debug, thiserror::Error)]
pub enum UiError {
    /// The widget is administratively locked. Carries the user-facing message.
    #[error("locked: {message}")]
    Locked { message: String },

    /// A widget kind that reads or writes a value was added without storage.
    #[error("widget {label:?} requires a value binding")]
    MissingBinding { label: String },

    /// A block was freed while its dispatcher was still running.
    #[error("block is busy and cannot be freed")]
    BlockBusy,

    /// A block id that is not (or no longer) in the arena.
    #[error("unknown block")]
    UnknownBlock,

    /// A panel id that is not (or no longer) on the surface.
    #[error("unknown panel")]
    UnknownPanel,

    /// Layout engine failure while aligning panels.
    #[error("panel layout failed: {0}")]
    Layout(String),

    /// Configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Reading input or a configuration file failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A global tracing subscriber was already installed.
    #[error("logging init failed: {0}")]
    Logging(String),
}

impl From<toml::de::Error> for UiError {
    fn from(err: toml::de::Error) -> Self {
        UiError::Config(err.to_string())
    }
}

impl From<taffy::TaffyError> for UiError {
    fn from(err: taffy::TaffyError) -> Self {
        UiError::Layout(err.to_string())
    }
}
