use std::ops::Range;

use ropey::Rope;

/// Line terminator used when a buffer creates new lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    /// Detect the ending from the first terminator in `text`.
    ///
    /// Text without any terminator uses `\n`.
    pub fn detect(text: &str) -> Self {
        match text.find('\n') {
            Some(idx) if text[..idx].ends_with('\r') => Self::CrLf,
            _ => Self::Lf,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
        }
    }
}

/// A text buffer backed by a rope data structure.
///
/// Lines are separated by `\n`, with an optional `\r` before it. A
/// terminator at the very end of the text closes the last line instead of
/// opening an empty one, so `"a\nb\n"` holds two lines. Empty text holds a
/// single empty line.
pub struct LineBuffer {
    rope: Rope,
    ending: LineEnding,
}

impl LineBuffer {
    /// Create a new buffer from a string.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            ending: LineEnding::detect(text),
        }
    }

    /// Create a buffer from line contents paired with their terminators.
    ///
    /// Only the last entry should be unterminated; an unterminated entry
    /// earlier on runs into the next one.
    pub fn from_entries<S: AsRef<str>>(entries: &[(S, Option<LineEnding>)]) -> Self {
        let mut text = String::new();
        for (content, terminator) in entries {
            text.push_str(content.as_ref());
            if let Some(ending) = terminator {
                text.push_str(ending.as_str());
            }
        }
        Self::from_text(&text)
    }

    /// The line ending new lines are written with.
    pub const fn ending(&self) -> LineEnding {
        self.ending
    }

    /// Whether the text ends with a line terminator.
    pub fn has_trailing_newline(&self) -> bool {
        let len = self.rope.len_chars();
        len > 0 && self.rope.char(len - 1) == '\n'
    }

    /// Total number of lines in the buffer.
    pub fn line_count(&self) -> usize {
        let lines = self.rope.len_lines();
        if lines > 1 && self.has_trailing_newline() {
            lines - 1
        } else {
            lines
        }
    }

    /// Get the content of a line (without its terminator).
    pub fn line_at(&self, line_idx: usize) -> Option<String> {
        let range = self.content_range(line_idx)?;
        Some(self.rope.slice(range).to_string())
    }

    /// The content of every line, in order.
    pub fn lines(&self) -> Vec<String> {
        (0..self.line_count())
            .filter_map(|idx| self.line_at(idx))
            .collect()
    }

    /// Every line's content together with its own terminator. Only the last
    /// line can be unterminated.
    pub fn entries(&self) -> Vec<(String, Option<LineEnding>)> {
        (0..self.line_count())
            .filter_map(|idx| {
                let (range, terminator) = self.line_parts(idx)?;
                Some((self.rope.slice(range).to_string(), terminator))
            })
            .collect()
    }

    /// Character offset of the first character of a line.
    pub fn line_start(&self, line_idx: usize) -> Option<usize> {
        (line_idx < self.line_count()).then(|| self.rope.line_to_char(line_idx))
    }

    /// Replace a line's content, keeping its terminator.
    ///
    /// Returns `false` if the line does not exist.
    pub fn replace_line(&mut self, line_idx: usize, content: &str) -> bool {
        let Some(range) = self.content_range(line_idx) else {
            return false;
        };
        let start = range.start;
        self.rope.remove(range);
        self.rope.insert(start, content);
        true
    }

    /// Insert a copy of a line directly below it.
    ///
    /// The copy takes the original's terminator. Copying an unterminated
    /// last line first closes it with the document ending.
    pub fn duplicate_line(&mut self, line_idx: usize) -> bool {
        let Some((range, terminator)) = self.line_parts(line_idx) else {
            return false;
        };
        let content = self.rope.slice(range.clone()).to_string();
        match terminator {
            Some(ending) => {
                let end = range.end + ending.as_str().len();
                self.rope.insert(end, &format!("{content}{}", ending.as_str()));
            }
            None => {
                let ending = self.ending.as_str();
                // An empty document: the copy needs a terminator to be a line.
                let closing = if self.rope.len_chars() == 0 { ending } else { "" };
                self.rope.insert(range.end, &format!("{ending}{content}{closing}"));
            }
        }
        true
    }

    /// Remove a line together with one terminator.
    pub fn remove_line(&mut self, line_idx: usize) -> bool {
        let count = self.line_count();
        if line_idx >= count {
            return false;
        }
        if count == 1 {
            self.rope = Rope::new();
            return true;
        }

        let is_last = line_idx + 1 == count;
        if is_last && !self.has_trailing_newline() {
            // Drop the terminator of the previous line instead.
            let prev_end = self
                .content_range(line_idx - 1)
                .map_or(0, |range| range.end);
            let len = self.rope.len_chars();
            self.rope.remove(prev_end..len);
        } else {
            let start = self.rope.line_to_char(line_idx);
            let len = self.rope.line(line_idx).len_chars();
            self.rope.remove(start..start + len);
        }
        true
    }

    /// Swap a line with the one after it.
    pub fn swap_with_next(&mut self, line_idx: usize) -> bool {
        if line_idx + 1 >= self.line_count() {
            return false;
        }
        let (Some(upper), Some(lower)) = (self.line_at(line_idx), self.line_at(line_idx + 1))
        else {
            return false;
        };
        // Later line first so the earlier range stays valid.
        self.replace_line(line_idx + 1, &upper);
        self.replace_line(line_idx, &lower);
        true
    }

    /// The full text content of the buffer.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    // --- Private helpers ---

    /// Char range of a line's content, excluding `\n` / `\r\n`.
    fn content_range(&self, line_idx: usize) -> Option<Range<usize>> {
        self.line_parts(line_idx).map(|(range, _)| range)
    }

    /// Content range and terminator of a line.
    fn line_parts(&self, line_idx: usize) -> Option<(Range<usize>, Option<LineEnding>)> {
        if line_idx >= self.line_count() {
            return None;
        }
        let start = self.rope.line_to_char(line_idx);
        let line = self.rope.line(line_idx);
        let mut len = line.len_chars();
        let mut terminator = None;
        if len > 0 && line.char(len - 1) == '\n' {
            len -= 1;
            terminator = Some(LineEnding::Lf);
            if len > 0 && line.char(len - 1) == '\r' {
                len -= 1;
                terminator = Some(LineEnding::CrLf);
            }
        }
        Some((start..start + len, terminator))
    }
}

impl std::fmt::Debug for LineBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineBuffer")
            .field("rope", &format_args!("Rope({} lines)", self.line_count()))
            .field("ending", &self.ending)
            .finish()
    }
}
