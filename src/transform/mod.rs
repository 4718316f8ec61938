//! Line transforms over whole-document text.
//!
//! Every function takes the full text plus one-based line numbers and
//! returns the rewritten text. Line numbers outside the document leave the
//! text unchanged. Every line keeps its own terminator (`\n` or `\r\n`);
//! a line that did not exist before takes the document's first ending.

mod indent;

pub use indent::{IndentRules, calculate_indent};

use crate::editor::{LineBuffer, LineEnding};

/// Target case for [`convert_case`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, clap::ValueEnum)]
pub enum CaseMode {
    Upper,
    Lower,
}

/// Default marker for [`toggle_comment`].
pub const DEFAULT_COMMENT_MARKER: &str = "//";

/// Zero-based index for a one-based line number, if it exists.
fn line_index(buffer: &LineBuffer, line: usize) -> Option<usize> {
    (1..=buffer.line_count()).contains(&line).then(|| line - 1)
}

/// Insert a copy of line `line` directly below it.
pub fn duplicate_line(text: &str, line: usize) -> String {
    let mut buffer = LineBuffer::from_text(text);
    let Some(idx) = line_index(&buffer, line) else {
        return text.to_string();
    };
    buffer.duplicate_line(idx);
    buffer.text()
}

/// Swap line `line` with the one above it. No-op on the first line.
pub fn move_line_up(text: &str, line: usize) -> String {
    let mut buffer = LineBuffer::from_text(text);
    match line_index(&buffer, line) {
        Some(idx) if idx > 0 => {
            buffer.swap_with_next(idx - 1);
            buffer.text()
        }
        _ => text.to_string(),
    }
}

/// Swap line `line` with the one below it. No-op on the last line.
pub fn move_line_down(text: &str, line: usize) -> String {
    let mut buffer = LineBuffer::from_text(text);
    match line_index(&buffer, line) {
        Some(idx) if buffer.swap_with_next(idx) => buffer.text(),
        _ => text.to_string(),
    }
}

/// Comment or uncomment line `line` with `marker`.
pub fn toggle_comment(text: &str, line: usize, marker: &str) -> String {
    let mut buffer = LineBuffer::from_text(text);
    let Some(idx) = line_index(&buffer, line) else {
        return text.to_string();
    };
    if let Some(content) = buffer.line_at(idx) {
        buffer.replace_line(idx, &toggle_comment_line(&content, marker));
    }
    buffer.text()
}

/// Toggle `marker` on a single line's content.
///
/// An uncommented line gets `marker` and one space inserted at its first
/// non-whitespace column. A commented line loses the marker and at most one
/// space after it. Indentation is kept either way.
pub fn toggle_comment_line(line: &str, marker: &str) -> String {
    if marker.is_empty() {
        return line.to_string();
    }
    let indent_len = line.len() - line.trim_start().len();
    let (indent, body) = line.split_at(indent_len);
    match body.strip_prefix(marker) {
        Some(rest) => {
            let rest = rest.strip_prefix(' ').unwrap_or(rest);
            format!("{indent}{rest}")
        }
        None => format!("{indent}{marker} {body}"),
    }
}

/// Spaces and tabs, plus the other Unicode space separators except the
/// no-break space.
const fn is_blank(c: char) -> bool {
    matches!(
        c,
        ' ' | '\t' | '\u{1680}' | '\u{2000}'..='\u{200A}' | '\u{202F}' | '\u{205F}' | '\u{3000}'
    )
}

/// Strip trailing blanks from every line.
///
/// Only horizontal blanks go; form feeds and no-break spaces are content.
pub fn trim_trailing_whitespace(text: &str) -> String {
    let entries = LineBuffer::from_text(text).entries();
    let trimmed: Vec<(&str, Option<LineEnding>)> = entries
        .iter()
        .map(|(line, terminator)| (line.trim_end_matches(is_blank), *terminator))
        .collect();
    LineBuffer::from_entries(&trimmed).text()
}

/// Drop every line that is empty or blank only.
pub fn remove_empty_lines(text: &str) -> String {
    let entries: Vec<(String, Option<LineEnding>)> = LineBuffer::from_text(text)
        .entries()
        .into_iter()
        .filter(|(line, _)| !line.chars().all(is_blank))
        .collect();
    LineBuffer::from_entries(&entries).text()
}

/// Sort all lines by code point order.
///
/// Terminators stay where they were: the line sorted into position `n`
/// takes the terminator the `n`th line had.
pub fn sort_lines(text: &str) -> String {
    let entries = LineBuffer::from_text(text).entries();
    let mut contents: Vec<&str> = entries.iter().map(|(line, _)| line.as_str()).collect();
    contents.sort_unstable();
    let sorted: Vec<(&str, Option<LineEnding>)> = contents
        .into_iter()
        .zip(entries.iter().map(|(_, terminator)| *terminator))
        .collect();
    LineBuffer::from_entries(&sorted).text()
}

/// Upper- or lowercase every line from `start` to `end` inclusive.
///
/// The bounds may come in either order; `end` is clamped to the last line.
pub fn convert_case(text: &str, start: usize, end: usize, mode: CaseMode) -> String {
    let mut buffer = LineBuffer::from_text(text);
    let first = start.min(end).max(1);
    let last = start.max(end).min(buffer.line_count());
    if first > last {
        return text.to_string();
    }
    for idx in first - 1..last {
        if let Some(content) = buffer.line_at(idx) {
            let converted = match mode {
                CaseMode::Upper => content.to_uppercase(),
                CaseMode::Lower => content.to_lowercase(),
            };
            buffer.replace_line(idx, &converted);
        }
    }
    buffer.text()
}

/// Character offset where line `line` starts.
pub fn line_position(text: &str, line: usize) -> Option<usize> {
    let buffer = LineBuffer::from_text(text);
    line_index(&buffer, line).and_then(|idx| buffer.line_start(idx))
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- Duplicate ---

    #[test]
    fn test_duplicate_middle_line() {
        assert_eq!(duplicate_line("a\nb\nc", 2), "a\nb\nb\nc");
    }

    #[test]
    fn test_duplicate_last_line_keeps_trailing_newline() {
        assert_eq!(duplicate_line("a\nb\n", 2), "a\nb\nb\n");
        assert_eq!(duplicate_line("a\nb", 2), "a\nb\nb");
    }

    #[test]
    fn test_duplicate_in_empty_document_adds_a_line() {
        assert_eq!(duplicate_line("", 1), "\n\n");
        assert_eq!(LineBuffer::from_text(&duplicate_line("", 1)).line_count(), 2);
    }

    #[test]
    fn test_duplicate_out_of_range_is_noop() {
        assert_eq!(duplicate_line("a\nb", 0), "a\nb");
        assert_eq!(duplicate_line("a\nb", 3), "a\nb");
    }

    // --- Move ---

    #[test]
    fn test_move_line_up() {
        assert_eq!(move_line_up("one\ntwo\nthree\n", 3), "one\nthree\ntwo\n");
    }

    #[test]
    fn test_move_first_line_up_is_noop() {
        assert_eq!(move_line_up("one\ntwo", 1), "one\ntwo");
    }

    #[test]
    fn test_move_line_down() {
        assert_eq!(move_line_down("one\ntwo\nthree", 1), "two\none\nthree");
    }

    #[test]
    fn test_move_last_line_down_is_noop() {
        assert_eq!(move_line_down("one\ntwo\n", 2), "one\ntwo\n");
        assert_eq!(move_line_down("one\ntwo", 9), "one\ntwo");
    }

    // --- Comment ---

    #[test]
    fn test_comment_keeps_indentation() {
        assert_eq!(
            toggle_comment("fn main() {\n    run();\n}", 2, "//"),
            "fn main() {\n    // run();\n}"
        );
    }

    #[test]
    fn test_uncomment_removes_marker_and_one_space() {
        assert_eq!(toggle_comment_line("  //  x", "//"), "   x");
        assert_eq!(toggle_comment_line("//x", "//"), "x");
    }

    #[test]
    fn test_comment_with_hash_marker() {
        assert_eq!(toggle_comment("x = 1\n", 1, "#"), "# x = 1\n");
        assert_eq!(toggle_comment("# x = 1\n", 1, "#"), "x = 1\n");
    }

    #[test]
    fn test_comment_blank_line() {
        assert_eq!(toggle_comment_line("", "//"), "// ");
        assert_eq!(toggle_comment_line("// ", "//"), "");
    }

    #[test]
    fn test_comment_empty_marker_is_noop() {
        assert_eq!(toggle_comment("code", 1, ""), "code");
    }

    // --- Whitespace ---

    #[test]
    fn test_trim_trailing_whitespace() {
        assert_eq!(
            trim_trailing_whitespace("a  \n\tb\t\n  \nc"),
            "a\n\tb\n\nc"
        );
    }

    #[test]
    fn test_trim_keeps_crlf() {
        assert_eq!(trim_trailing_whitespace("a \r\nb\t\r\n"), "a\r\nb\r\n");
    }

    #[test]
    fn test_trim_keeps_form_feed_and_no_break_space() {
        let text = "a\u{a0}\nb\u{c}\n";
        assert_eq!(trim_trailing_whitespace(text), text);
        assert_eq!(trim_trailing_whitespace("x\u{3000}\u{2003}\t\n"), "x\n");
    }

    #[test]
    fn test_whitespace_transforms_keep_mixed_endings() {
        let clean = "x\r\ny\n";
        assert_eq!(trim_trailing_whitespace(clean), clean);
        assert_eq!(remove_empty_lines(clean), clean);
        assert_eq!(trim_trailing_whitespace("x \r\ny\t\nz"), "x\r\ny\nz");
        assert_eq!(remove_empty_lines("x\r\n\n \r\ny\n"), "x\r\ny\n");
    }

    #[test]
    fn test_remove_empty_lines() {
        assert_eq!(remove_empty_lines("a\n\n  \nb\n\t\n"), "a\nb\n");
    }

    #[test]
    fn test_remove_empty_lines_all_blank() {
        assert_eq!(remove_empty_lines("\n  \n"), "");
    }

    // --- Sort ---

    #[test]
    fn test_sort_lines_code_point_order() {
        assert_eq!(sort_lines("pear\nApple\napple\n"), "Apple\napple\npear\n");
    }

    #[test]
    fn test_sort_without_trailing_newline() {
        assert_eq!(sort_lines("b\nc\na"), "a\nb\nc");
    }

    #[test]
    fn test_sort_keeps_terminators_in_place() {
        assert_eq!(sort_lines("b\r\na\n"), "a\r\nb\n");
        assert_eq!(sort_lines("a\r\nb\n"), "a\r\nb\n");
    }

    // --- Case ---

    #[test]
    fn test_convert_case_range() {
        assert_eq!(
            convert_case("one\ntwo\nthree\nfour", 2, 3, CaseMode::Upper),
            "one\nTWO\nTHREE\nfour"
        );
    }

    #[test]
    fn test_convert_case_reversed_and_clamped() {
        assert_eq!(
            convert_case("ONE\nTWO\n", 9, 2, CaseMode::Lower),
            "ONE\ntwo\n"
        );
    }

    #[test]
    fn test_convert_case_start_past_end_is_noop() {
        assert_eq!(convert_case("abc", 5, 7, CaseMode::Upper), "abc");
    }

    #[test]
    fn test_convert_case_non_ascii() {
        assert_eq!(convert_case("straße", 1, 1, CaseMode::Upper), "STRASSE");
    }

    // --- Position ---

    #[test]
    fn test_line_position() {
        let text = "ab\nçd\nef";
        assert_eq!(line_position(text, 1), Some(0));
        assert_eq!(line_position(text, 2), Some(3));
        assert_eq!(line_position(text, 3), Some(6));
        assert_eq!(line_position(text, 4), None);
        assert_eq!(line_position(text, 0), None);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn document() -> impl Strategy<Value = String> {
            proptest::collection::vec(("[ a-z\t#/]{0,6}", prop_oneof!["\n", "\r\n"]), 1..8)
                .prop_flat_map(|lines| {
                    let joined: String = lines
                        .iter()
                        .map(|(line, ending)| format!("{line}{ending}"))
                        .collect();
                    let unterminated = joined
                        .strip_suffix('\n')
                        .map(|rest| rest.strip_suffix('\r').unwrap_or(rest).to_string())
                        .unwrap_or_default();
                    prop_oneof![Just(joined), Just(unterminated)]
                })
        }

        proptest! {
            #[test]
            fn toggle_comment_twice_restores_line(line in "[ \t]{0,3}[a-z(][a-z /]{0,10}") {
                let once = toggle_comment_line(&line, "//");
                prop_assert_eq!(toggle_comment_line(&once, "//"), line);
            }

            #[test]
            fn sort_preserves_terminators_and_lines(text in document()) {
                let sorted = sort_lines(&text);
                prop_assert_eq!(sorted.matches('\n').count(), text.matches('\n').count());
                let mut before: Vec<&str> = text.lines().collect();
                let mut after: Vec<&str> = sorted.lines().collect();
                before.sort_unstable();
                after.sort_unstable();
                prop_assert_eq!(before, after);
            }

            #[test]
            fn whitespace_transforms_are_identity_on_clean_text(text in document()) {
                let clean = remove_empty_lines(&trim_trailing_whitespace(&text));
                prop_assert_eq!(trim_trailing_whitespace(&clean), clean.clone());
                prop_assert_eq!(remove_empty_lines(&clean), clean);
            }

            #[test]
            fn move_down_then_up_is_identity(text in document(), line in 1..8usize) {
                let count = LineBuffer::from_text(&text).line_count();
                prop_assume!(line < count);
                let moved = move_line_down(&text, line);
                prop_assert_eq!(move_line_up(&moved, line + 1), text);
            }

            #[test]
            fn duplicate_adds_exactly_one_line(text in document(), line in 1..8usize) {
                let count = LineBuffer::from_text(&text).line_count();
                prop_assume!(line <= count);
                let duplicated = duplicate_line(&text, line);
                prop_assert_eq!(LineBuffer::from_text(&duplicated).line_count(), count + 1);
            }
        }
    }
}
