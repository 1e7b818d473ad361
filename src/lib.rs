//! vtkit - VT100 Terminal Control Library
//!
//! Small building blocks for driving a VT100/xterm-compatible terminal:
//!
//! - `ansi`: escape sequence builders (cursor, erase, scroll, SGR, OSC)
//!   and parsers for the device reports terminals send back
//! - `tty`: scoped cbreak-mode sessions with guaranteed restoration,
//!   bounded raw reads, window size ioctl
//! - `markup`: inline `<red>...</>` tag expansion to SGR sequences
//! - `terminal`: a facade composing the above for queries and styled
//!   output

pub mod ansi;
pub mod markup;
pub mod terminal;
pub mod tty;

pub use ansi::report::{CursorPosition, RgbColor};
pub use terminal::Terminal;
pub use tty::{TtyError, TtyResult, TtySession, WindowSize};
