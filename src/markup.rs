//! Inline tag markup for styled output
//!
//! Expands a tiny tag grammar into SGR sequences: `<red>warning</>`
//! becomes `ESC[31m` + `warning` + `ESC[0m`. Tags may name a foreground
//! color (`red`, `bright_cyan`, ...) or a text style (`bold`, `underline`,
//! ...). A close tag is either self-closing `</>` or named `</red>`; the
//! name is not checked against the open tag.
//!
//! Open tags are kept on a stack. Closing pops one entry and emits a
//! full SGR reset only once the stack is empty; the enclosing style is
//! not re-emitted, so `<red><bold>x</>y</>` leaves `y` bold. That
//! matches the behavior this grammar has always had, but it is a known
//! limitation rather than a design goal.

use crate::ansi::{self, Foreground, Style};

/// Look up the SGR code for a tag name. Unknown names are not tags.
fn tag_code(name: &str) -> Option<u8> {
    let code = match name {
        "black" => Foreground::Black as u8,
        "red" => Foreground::Red as u8,
        "green" => Foreground::Green as u8,
        "yellow" => Foreground::Yellow as u8,
        "blue" => Foreground::Blue as u8,
        "magenta" => Foreground::Magenta as u8,
        "cyan" => Foreground::Cyan as u8,
        "white" => Foreground::White as u8,
        "bright_black" => Foreground::BrightBlack as u8,
        "bright_red" => Foreground::BrightRed as u8,
        "bright_green" => Foreground::BrightGreen as u8,
        "bright_yellow" => Foreground::BrightYellow as u8,
        "bright_blue" => Foreground::BrightBlue as u8,
        "bright_magenta" => Foreground::BrightMagenta as u8,
        "bright_cyan" => Foreground::BrightCyan as u8,
        "bright_white" => Foreground::BrightWhite as u8,
        "bold" => Style::Bold as u8,
        "faint" => Style::Faint as u8,
        "italic" => Style::Italic as u8,
        "underline" => Style::Underline as u8,
        "invert" => Style::Invert as u8,
        "strike" => Style::Strike as u8,
        _ => return None,
    };
    Some(code)
}

/// Expand tag markup into text interleaved with SGR sequences.
///
/// Anything that does not scan as a known tag - unknown names,
/// an unterminated `<`, a bare `>` - passes through unchanged, so
/// arbitrary user text is safe to feed in. A stray close tag with no
/// open tag emits nothing.
pub fn render(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut stack: Vec<u8> = Vec::new();
    let mut rest = input;

    while let Some(open) = rest.find('<') {
        output.push_str(&rest[..open]);
        let tail = &rest[open..];

        let Some(close) = tail.find('>') else {
            // unterminated tag, pass the rest through literally
            output.push_str(tail);
            return output;
        };

        let body = &tail[1..close];
        if let Some(name) = body.strip_prefix('/') {
            // close tag: `</>` or `</name>`, name unchecked
            if name.is_empty() || tag_code(name).is_some() {
                if stack.pop().is_some() && stack.is_empty() {
                    output.push_str(ansi::SGR_RESET);
                }
            } else {
                output.push_str(&tail[..=close]);
            }
        } else if let Some(code) = tag_code(body) {
            stack.push(code);
            output.push_str(&ansi::sgr([code]));
        } else {
            output.push_str(&tail[..=close]);
        }
        rest = &tail[close + 1..];
    }
    output.push_str(rest);
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_single_tag() {
        assert_eq!(render("<red>x</>"), "\x1b[31mx\x1b[0m");
        assert_eq!(render("<bold>x</>"), "\x1b[1mx\x1b[0m");
        assert_eq!(render("<bright_cyan>x</>"), "\x1b[96mx\x1b[0m");
    }

    #[test]
    fn test_named_close() {
        assert_eq!(render("<red>x</red>"), "\x1b[31mx\x1b[0m");
        // the close name is not checked against the open tag
        assert_eq!(render("<red>x</green>"), "\x1b[31mx\x1b[0m");
    }

    #[test]
    fn test_sibling_tags() {
        assert_eq!(
            render("<red>a</> <green>b</>"),
            "\x1b[31ma\x1b[0m \x1b[32mb\x1b[0m"
        );
    }

    #[test]
    fn test_nested_close_does_not_restore_parent() {
        // popping the inner tag emits nothing; only the final pop resets
        assert_eq!(
            render("<red><bold>x</>y</>"),
            "\x1b[31m\x1b[1mxy\x1b[0m"
        );
    }

    #[test]
    fn test_unknown_tag_is_literal() {
        assert_eq!(render("<nope>x</nope>"), "<nope>x</nope>");
        assert_eq!(render("a < b > c"), "a < b > c");
    }

    #[test]
    fn test_unterminated_tag_is_literal() {
        assert_eq!(render("x <red"), "x <red");
    }

    #[test]
    fn test_stray_close_emits_nothing() {
        assert_eq!(render("x</>"), "x");
    }

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(render(""), "");
        assert_eq!(render("no tags here"), "no tags here");
    }

    proptest! {
        #[test]
        fn prop_render_never_panics(input in "\\PC*") {
            let _ = render(&input);
        }

        #[test]
        fn prop_plain_ascii_text_unchanged(input in "[a-zA-Z0-9 .,!?-]*") {
            prop_assert_eq!(render(&input), input);
        }
    }
}
