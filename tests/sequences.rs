//! End-to-end checks of the public API: exact wire bytes for the
//! builders, report parsing, and markup expansion through the facade.

use vtkit::ansi::{self, Clear, Foreground, Style};
use vtkit::{markup, CursorPosition, RgbColor, Terminal};

#[test]
fn clear_entire_screen_emits_code_2() {
    let seq = ansi::clear_screen(Clear::Entire);
    assert_eq!(seq, "\x1b[2J");
    // parse the numeric code back out of the sequence
    let code = seq
        .strip_prefix("\x1b[")
        .and_then(|s| s.strip_suffix('J'))
        .and_then(|s| s.parse::<u8>().ok());
    assert_eq!(code, Some(2));
}

#[test]
fn cursor_position_omitted_column_defaults_to_one() {
    assert_eq!(ansi::cursor_position(17, 0), ansi::cursor_position(17, 1));
    assert_eq!(ansi::cursor_position(0, 0), "\x1b[1;1H");
}

#[test]
fn styled_text_resets_exactly_once_at_the_end() {
    let styled = format!("{}text{}", ansi::sgr([Foreground::Red]), ansi::SGR_RESET);
    assert_eq!(styled.matches("\x1b[0m").count(), 1);
    assert!(styled.ends_with("\x1b[0m"));
}

#[test]
fn color_report_parses_to_truncated_channels() {
    assert_eq!(
        vtkit::ansi::report::parse_color_report(b"\x1b]11;rgb:2323/2626/2727\x07"),
        Some(RgbColor::new(35, 38, 39))
    );
}

#[test]
fn cursor_report_parses_and_malformed_is_none() {
    assert_eq!(
        vtkit::ansi::report::parse_cursor_report(b"\x1b[10;20R"),
        Some(CursorPosition::new(10, 20))
    );
    assert_eq!(vtkit::ansi::report::parse_cursor_report(b"\x1b[10;20"), None);
    assert_eq!(vtkit::ansi::report::parse_cursor_report(b"\x1b[x;yR"), None);
}

#[test]
fn markup_expands_to_sgr_framing() {
    assert_eq!(
        markup::render("<red>x</>"),
        format!("{}x{}", ansi::sgr([Foreground::Red]), ansi::SGR_RESET)
    );
}

#[test]
fn facade_writes_to_injected_stream() {
    let mut terminal = Terminal::new(Vec::new());
    terminal.print("plain").expect("print failed");
    terminal
        .print_styled("loud", [Style::Bold])
        .expect("print failed");
    terminal.print_markup("<green>ok</>").expect("print failed");
    let out = String::from_utf8(terminal.into_output()).expect("output is not UTF-8");
    assert_eq!(
        out,
        "plain\n\x1b[1mloud\x1b[0m\n\x1b[32mok\x1b[0m\n"
    );
}
