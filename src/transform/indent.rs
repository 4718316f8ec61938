use crate::editor::LineBuffer;

/// How auto-indent measures and grows indentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndentRules {
    /// Columns added after a block opener.
    pub indent_unit: usize,
    /// Tab stops every this many columns.
    pub tab_width: usize,
    /// A reference line whose trimmed content ends with one of these opens
    /// a block.
    pub triggers: Vec<char>,
}

impl Default for IndentRules {
    fn default() -> Self {
        Self {
            indent_unit: 4,
            tab_width: 4,
            triggers: vec![':', '{', '(', '['],
        }
    }
}

impl IndentRules {
    /// Column width of the leading whitespace of `line`.
    pub fn leading_width(&self, line: &str) -> usize {
        let tab_width = self.tab_width.max(1);
        let mut width = 0;
        for ch in line.chars() {
            match ch {
                '\t' => width = (width / tab_width + 1) * tab_width,
                c if c.is_whitespace() => width += 1,
                _ => break,
            }
        }
        width
    }

    /// Whether `line` ends with a block opener.
    pub fn opens_block(&self, line: &str) -> bool {
        line.trim_end()
            .chars()
            .next_back()
            .is_some_and(|last| self.triggers.contains(&last))
    }
}

/// Indentation, in columns, for a new line inserted as line `line`.
///
/// The reference is the line before it: its leading whitespace width, plus
/// one indent unit when it ends with a block opener. Zero when there is no
/// such line.
pub fn calculate_indent(text: &str, line: usize, rules: &IndentRules) -> usize {
    let Some(reference) = line.checked_sub(2) else {
        return 0;
    };
    let Some(content) = LineBuffer::from_text(text).line_at(reference) else {
        return 0;
    };
    let mut width = rules.leading_width(&content);
    if rules.opens_block(&content) {
        width += rules.indent_unit;
    }
    width
}
