//! Parsers for the device reports a terminal sends back
//!
//! Two fixed grammars, matched byte by byte against the start of the
//! buffer:
//!
//! - Cursor position report (CPR): `ESC [ <row> ; <col> R`
//! - OSC color report: `ESC ] <ps> ; rgb: <hhhh> / <hhhh> / <hhhh> BEL`
//!
//! A buffer that does not match produces `None`, never an error: a
//! keystroke arriving in the middle of a report corrupts it, and callers
//! treat that as "unknown" rather than as a failure.

use serde::{Deserialize, Serialize};

/// A 1-based cursor position as reported by CPR
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorPosition {
    pub row: u16,
    pub col: u16,
}

impl CursorPosition {
    pub const fn new(row: u16, col: u16) -> Self {
        CursorPosition { row, col }
    }
}

/// An 8-bit-per-channel RGB color decoded from an OSC color report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        RgbColor { r, g, b }
    }

    /// HLS lightness over the 0-255 channel scale: `(max + min) / 2`.
    pub fn lightness(&self) -> u8 {
        let max = self.r.max(self.g).max(self.b) as u16;
        let min = self.r.min(self.g).min(self.b) as u16;
        ((max + min) / 2) as u8
    }
}

/// Cursor through a report buffer, with primitive matchers shared by
/// both grammars.
struct Scanner<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Scanner { buf, pos: 0 }
    }

    fn expect(&mut self, byte: u8) -> Option<()> {
        if self.buf.get(self.pos) == Some(&byte) {
            self.pos += 1;
            Some(())
        } else {
            None
        }
    }

    fn expect_all(&mut self, bytes: &[u8]) -> Option<()> {
        for &b in bytes {
            self.expect(b)?;
        }
        Some(())
    }

    /// One or more ASCII digits, decoded as a decimal number.
    fn digits(&mut self) -> Option<u16> {
        let start = self.pos;
        let mut value: u32 = 0;
        while let Some(&b) = self.buf.get(self.pos) {
            if !b.is_ascii_digit() {
                break;
            }
            value = value.saturating_mul(10).saturating_add(u32::from(b - b'0'));
            self.pos += 1;
        }
        if self.pos == start || value > u32::from(u16::MAX) {
            None
        } else {
            Some(value as u16)
        }
    }

    /// Exactly four lowercase hex digits, truncated to the leading byte.
    ///
    /// Terminals report 16 bits per channel but callers want 8; the
    /// original toolkit truncates (not rounds) to the high byte.
    fn hex_channel(&mut self) -> Option<u8> {
        let mut high = 0u8;
        for i in 0..4 {
            let b = *self.buf.get(self.pos)?;
            let digit = match b {
                b'0'..=b'9' => b - b'0',
                b'a'..=b'f' => b - b'a' + 10,
                _ => return None,
            };
            if i == 0 {
                high = digit << 4;
            } else if i == 1 {
                high |= digit;
            }
            self.pos += 1;
        }
        Some(high)
    }
}

/// Parse a cursor position report, `ESC [ <row> ; <col> R`.
///
/// The grammar is anchored at the start of the buffer; bytes after the
/// `R` terminator are ignored. Returns `None` on any mismatch.
pub fn parse_cursor_report(buf: &[u8]) -> Option<CursorPosition> {
    let mut scanner = Scanner::new(buf);
    scanner.expect_all(b"\x1b[")?;
    let row = scanner.digits()?;
    scanner.expect(b';')?;
    let col = scanner.digits()?;
    scanner.expect(b'R')?;
    Some(CursorPosition { row, col })
}

/// Parse an OSC color report, `ESC ] <ps> ; rgb: hhhh / hhhh / hhhh`.
///
/// `<ps>` is 10 (foreground) or 11 (background); any digits are
/// accepted so one parser serves both queries. The trailing BEL is
/// optional in the buffer. Returns `None` on any mismatch.
pub fn parse_color_report(buf: &[u8]) -> Option<RgbColor> {
    let mut scanner = Scanner::new(buf);
    scanner.expect_all(b"\x1b]")?;
    scanner.digits()?;
    scanner.expect_all(b";rgb:")?;
    let r = scanner.hex_channel()?;
    scanner.expect(b'/')?;
    let g = scanner.hex_channel()?;
    scanner.expect(b'/')?;
    let b = scanner.hex_channel()?;
    Some(RgbColor { r, g, b })
}
