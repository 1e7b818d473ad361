//! ANSI/VT100 escape sequence construction
//!
//! Pure string builders for CSI and OSC control sequences: cursor movement,
//! screen/line erasure, scrolling, SGR text styling, and the OSC queries a
//! terminal answers with device reports (see [`report`]).
//!
//! Every builder produces ASCII output except for the embedded ESC and BEL
//! control bytes defined by ECMA-48.

pub mod report;

use std::fmt::Write;

/// ESC control byte (0x1B)
pub const ESC: char = '\x1b';
/// BEL control byte (0x07), terminates OSC sequences
pub const BEL: char = '\x07';
/// Control Sequence Introducer: `ESC [`
pub const CSI: &str = "\x1b[";
/// Operating System Command: `ESC ]`
pub const OSC: &str = "\x1b]";

/// SGR attribute codes (ECMA-48 "Select Graphic Rendition")
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Style {
    Reset = 0,
    Bold = 1,
    Faint = 2,
    Italic = 3,
    Underline = 4,
    SlowBlink = 5,
    RapidBlink = 6,
    Invert = 7,
    Hide = 8,
    Strike = 9,
    DoubleUnderline = 21,
    Normal = 22,
    NotItalic = 23,
    NotUnderline = 24,
    NotBlink = 25,
    NotInvert = 27,
    NotHide = 28,
    NotStrike = 29,
    /// Extended foreground color, followed by `5;n` or `2;r;g;b`
    Foreground = 38,
    ForegroundDefault = 39,
    /// Extended background color, followed by `5;n` or `2;r;g;b`
    Background = 48,
    BackgroundDefault = 49,
}

/// SGR foreground color codes (30-37 standard, 90-97 bright/aixterm)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Foreground {
    Black = 30,
    Red = 31,
    Green = 32,
    Yellow = 33,
    Blue = 34,
    Magenta = 35,
    Cyan = 36,
    White = 37,
    Default = 39,
    BrightBlack = 90,
    BrightRed = 91,
    BrightGreen = 92,
    BrightYellow = 93,
    BrightBlue = 94,
    BrightMagenta = 95,
    BrightCyan = 96,
    BrightWhite = 97,
}

/// SGR background color codes (40-47 standard, 100-107 bright/aixterm)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Background {
    Black = 40,
    Red = 41,
    Green = 42,
    Yellow = 43,
    Blue = 44,
    Magenta = 45,
    Cyan = 46,
    White = 47,
    Default = 49,
    BrightBlack = 100,
    BrightRed = 101,
    BrightGreen = 102,
    BrightYellow = 103,
    BrightBlue = 104,
    BrightMagenta = 105,
    BrightCyan = 106,
    BrightWhite = 107,
}

impl From<Style> for u8 {
    fn from(code: Style) -> u8 {
        code as u8
    }
}

impl From<Foreground> for u8 {
    fn from(code: Foreground) -> u8 {
        code as u8
    }
}

impl From<Background> for u8 {
    fn from(code: Background) -> u8 {
        code as u8
    }
}

/// Erase extent for [`clear_screen`] and [`clear_line`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Clear {
    /// From the cursor to the end (code 0)
    ToEnd,
    /// From the cursor to the beginning (code 1)
    ToStart,
    /// The whole screen or line (code 2)
    #[default]
    Entire,
    /// The whole screen plus the scrollback buffer (code 3, xterm
    /// extension; only meaningful for [`clear_screen`])
    Scrollback,
}

impl Clear {
    fn code(self) -> u8 {
        match self {
            Clear::ToEnd => 0,
            Clear::ToStart => 1,
            Clear::Entire => 2,
            Clear::Scrollback => 3,
        }
    }
}

/// A count parameter of 0 is treated as omitted and defaults to 1,
/// per ECMA-48.
fn count(n: u16) -> u16 {
    if n == 0 {
        1
    } else {
        n
    }
}

fn csi(params: &str, code: char) -> String {
    format!("{CSI}{params}{code}")
}

fn osc(params: &str) -> String {
    format!("{OSC}{params}{BEL}")
}

/// `CSI n A` - move the cursor up `n` rows
pub fn cursor_up(n: u16) -> String {
    csi(&count(n).to_string(), 'A')
}

/// `CSI n B` - move the cursor down `n` rows
pub fn cursor_down(n: u16) -> String {
    csi(&count(n).to_string(), 'B')
}

/// `CSI n C` - move the cursor forward `n` columns
pub fn cursor_forward(n: u16) -> String {
    csi(&count(n).to_string(), 'C')
}

/// `CSI n D` - move the cursor backward `n` columns
pub fn cursor_backward(n: u16) -> String {
    csi(&count(n).to_string(), 'D')
}

/// `CSI n E` - move the cursor to the start of the line `n` rows down
pub fn cursor_next_line(n: u16) -> String {
    csi(&count(n).to_string(), 'E')
}

/// `CSI n F` - move the cursor to the start of the line `n` rows up
pub fn cursor_previous_line(n: u16) -> String {
    csi(&count(n).to_string(), 'F')
}

/// `CSI n G` - move the cursor to column `n` (1-based)
pub fn cursor_column(n: u16) -> String {
    csi(&count(n).to_string(), 'G')
}

/// `CSI row;col H` - move the cursor to an absolute position.
///
/// Both coordinates are 1-based; 0 is treated as omitted and defaults
/// to 1, so `cursor_position(17, 0)` equals `cursor_position(17, 1)` and
/// `cursor_position(0, 0)` addresses the top-left corner.
pub fn cursor_position(row: u16, col: u16) -> String {
    csi(&format!("{};{}", count(row), count(col)), 'H')
}

/// `CSI row;col f` - same motion as [`cursor_position`], but classified
/// by the standard as a format effector rather than an editor function,
/// which some terminal modes handle differently.
pub fn cursor_hv_position(row: u16, col: u16) -> String {
    csi(&format!("{};{}", count(row), count(col)), 'f')
}

/// `CSI n J` - erase part of the screen.
///
/// `Clear::Entire` moves the cursor to the upper left on DOS ANSI.SYS;
/// `Clear::Scrollback` additionally drops the scrollback buffer.
pub fn clear_screen(mode: Clear) -> String {
    csi(&mode.code().to_string(), 'J')
}

/// `CSI n K` - erase part of the current line. The cursor does not move.
///
/// Lines have no scrollback; only codes 0-2 are defined for EL, so
/// `Clear::Scrollback` falls back to erasing the entire line.
pub fn clear_line(mode: Clear) -> String {
    let mode = match mode {
        Clear::Scrollback => Clear::Entire,
        other => other,
    };
    csi(&mode.code().to_string(), 'K')
}

/// `CSI n S` - scroll the page up `n` lines, new lines at the bottom
pub fn scroll_up(n: u16) -> String {
    csi(&count(n).to_string(), 'S')
}

/// `CSI n T` - scroll the page down `n` lines, new lines at the top
pub fn scroll_down(n: u16) -> String {
    csi(&count(n).to_string(), 'T')
}

/// `CSI c1;c2;... m` - Select Graphic Rendition.
///
/// Joins the given codes with `;`. An empty slice emits `CSI m`, which
/// terminals treat as `CSI 0 m` (reset).
pub fn sgr<I>(codes: I) -> String
where
    I: IntoIterator,
    I::Item: Into<u8>,
{
    let mut params = String::new();
    for (i, code) in codes.into_iter().enumerate() {
        let code: u8 = code.into();
        if i > 0 {
            params.push(';');
        }
        // writing to a String cannot fail
        let _ = write!(params, "{code}");
    }
    csi(&params, 'm')
}

/// `ESC[0m` - reset all SGR attributes
pub const SGR_RESET: &str = "\x1b[0m";

/// `CSI 38;2;r;g;b m` - 24-bit foreground color
pub fn foreground_rgb(r: u8, g: u8, b: u8) -> String {
    sgr([Style::Foreground as u8, 2, r, g, b])
}

/// `CSI 48;2;r;g;b m` - 24-bit background color
pub fn background_rgb(r: u8, g: u8, b: u8) -> String {
    sgr([Style::Background as u8, 2, r, g, b])
}

/// `OSC 2;title BEL` - set the window title (not honored by Konsole)
pub fn set_title(title: &str) -> String {
    osc(&format!("2;{title}"))
}

/// `CSI 6 n` - request a cursor position report; the terminal answers
/// `ESC[row;colR`.
pub const REPORT_CURSOR_POSITION: &str = "\x1b[6n";

/// `OSC 10;? BEL` - request the default foreground color; the terminal
/// answers `ESC]10;rgb:rrrr/gggg/bbbb BEL`.
pub const REPORT_FOREGROUND_COLOR: &str = "\x1b]10;?\x07";

/// `OSC 11;? BEL` - request the default background color
pub const REPORT_BACKGROUND_COLOR: &str = "\x1b]11;?\x07";

/// Render a sequence with its control bytes spelled out (`ESC` as `\e`,
/// `BEL` as `\a`) so it can be logged without affecting the terminal.
pub fn escape_controls(sequence: &str) -> String {
    sequence.replace(ESC, "\\e").replace(BEL, "\\a")
}
