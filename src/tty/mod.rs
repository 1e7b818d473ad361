//! Raw-mode terminal access
//!
//! This module owns the UNIX tty intrinsics: switching standard input
//! into cbreak mode around a query/response exchange, reading raw bytes
//! with a bounded wait, and asking the kernel for the window size.

use std::time::Duration;

use serde::{Deserialize, Serialize};

#[cfg(unix)]
mod unix;

#[cfg(unix)]
pub use unix::{window_size, TtySession};

/// Error type for tty operations
#[derive(Debug, thiserror::Error)]
pub enum TtyError {
    #[error("Input is not a terminal device")]
    UnsupportedDevice,

    #[error("Input stream ended before the response terminator")]
    IncompleteResponse,

    #[error("Terminal did not reply within {0:?}")]
    Timeout(Duration),

    #[error("Failed to get terminal attributes: {0}")]
    GetAttr(#[source] nix::Error),

    #[error("Failed to set terminal attributes: {0}")]
    SetAttr(#[source] nix::Error),

    #[error("Failed to read from terminal: {0}")]
    Read(#[source] nix::Error),

    #[error("Failed to poll terminal: {0}")]
    Poll(#[source] nix::Error),

    #[error("Failed to query window size: {0}")]
    WindowSize(#[source] nix::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for tty operations
pub type TtyResult<T> = Result<T, TtyError>;

/// Terminal window size in character cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSize {
    pub rows: u16,
    pub cols: u16,
}

impl WindowSize {
    pub const fn new(cols: u16, rows: u16) -> Self {
        WindowSize { rows, cols }
    }
}

impl Default for WindowSize {
    fn default() -> Self {
        WindowSize::new(80, 24)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_size_default() {
        let size = WindowSize::default();
        assert_eq!(size.cols, 80);
        assert_eq!(size.rows, 24);
    }

    #[test]
    fn test_error_display() {
        let err = TtyError::Timeout(Duration::from_millis(500));
        assert!(err.to_string().contains("500ms"));
        assert_eq!(
            TtyError::UnsupportedDevice.to_string(),
            "Input is not a terminal device"
        );
    }
}
