//! Turns declarator decisions back into text edits
//!
//! A statement whose declarators agree only has its keyword replaced. When
//! they disagree the statement is split into one statement per run of equal
//! decisions, reusing the statement's own terminator, line ending and
//! indentation.

use crate::edit::TextEdit;
use crate::parser::ParsedFile;
use crate::semantic::DeclarationStatement;

use super::decision::Decision;

pub struct Emitter<'a> {
    file: &'a ParsedFile,
    newline: &'static str,
}

impl<'a> Emitter<'a> {
    pub fn new(file: &'a ParsedFile) -> Self {
        let newline = if file.source().contains("\r\n") {
            "\r\n"
        } else {
            "\n"
        };
        Self { file, newline }
    }

    /// Edits for one statement; `decisions` holds one entry per declarator.
    pub fn emit(&self, statement: &DeclarationStatement, decisions: &[Decision]) -> Vec<TextEdit> {
        let Some(&first) = decisions.first() else {
            return Vec::new();
        };
        if decisions.len() != statement.declarators.len() {
            return Vec::new();
        }

        let keyword = self.file.byte_range(statement.keyword);
        if self.file.source().get(keyword.clone()) != Some("var") {
            tracing::debug!(
                start = keyword.start,
                "declaration keyword not found at statement start, leaving it"
            );
            return Vec::new();
        }

        let uniform = decisions.iter().all(|&decision| decision == first);
        if uniform || !statement.placement.allows_split() {
            let shared = decisions
                .iter()
                .copied()
                .reduce(Decision::combine)
                .unwrap_or(Decision::Unchanged);
            if !shared.is_narrowed() {
                return Vec::new();
            }
            return vec![TextEdit::new(keyword.start, keyword.end, shared.keyword())];
        }

        let mut edits = Vec::new();
        if first.is_narrowed() {
            edits.push(TextEdit::new(keyword.start, keyword.end, first.keyword()));
        }

        let separator = self.separator(statement);
        let terminator = if separator.contains('\n') {
            self.terminator(statement)
        } else {
            ";"
        };

        for (index, pair) in decisions.windows(2).enumerate() {
            let (previous, next) = (pair[0], pair[1]);
            if previous == next {
                continue;
            }

            let gap_start = self.file.offset(statement.declarators[index].span.hi);
            let next_start = self.file.offset(statement.declarators[index + 1].span.lo);
            let gap = self.file.source().get(gap_start..next_start).unwrap_or_default();

            let Some(comma) = find_separator_comma(gap) else {
                tracing::debug!(at = gap_start, "no comma between declarators, leaving statement");
                return Vec::new();
            };
            let comma_at = gap_start + comma;
            let after_comma = &gap[comma + 1..];
            let keyword = next.keyword();

            if after_comma.trim().is_empty() {
                edits.push(TextEdit::new(
                    comma_at,
                    next_start,
                    format!("{terminator}{separator}{keyword} "),
                ));
            } else {
                // Comments between the declarators stay where they are
                edits.push(TextEdit::new(comma_at, comma_at + 1, terminator));
                if starts_fresh_line(after_comma) {
                    edits.push(TextEdit::insert(next_start, format!("{keyword} ")));
                } else {
                    // The separator replaces the blanks between the comment and the next declarator
                    let blanks = after_comma.len() - after_comma.trim_end_matches([' ', '\t']).len();
                    edits.push(TextEdit::new(
                        next_start - blanks,
                        next_start,
                        format!("{separator}{keyword} "),
                    ));
                }
            }
        }

        edits
    }

    /// A line break plus the statement's indentation, or a single space when
    /// the statement shares its line with other code.
    fn separator(&self, statement: &DeclarationStatement) -> String {
        let source = self.file.source();
        let start = self.file.offset(statement.span.lo);
        let line_start = source[..start].rfind('\n').map(|i| i + 1).unwrap_or(0);
        let indent = &source[line_start..start];

        if indent.chars().all(|c| c == ' ' || c == '\t') {
            format!("{}{indent}", self.newline)
        } else {
            " ".to_string()
        }
    }

    /// `;` when the statement ends with one, nothing when it relies on
    /// automatic semicolon insertion.
    fn terminator(&self, statement: &DeclarationStatement) -> &'static str {
        let Some(last) = statement.declarators.last() else {
            return ";";
        };
        let end = self.file.offset(last.span.hi);
        let rest = self.file.source().get(end..).unwrap_or_default();

        if skip_trivia(rest).starts_with(';') {
            ";"
        } else {
            ""
        }
    }
}

fn skip_trivia(mut text: &str) -> &str {
    loop {
        let trimmed = text.trim_start();
        if let Some(comment) = trimmed.strip_prefix("/*") {
            match comment.find("*/") {
                Some(end) => text = &comment[end + 2..],
                None => return "",
            }
        } else if let Some(comment) = trimmed.strip_prefix("//") {
            match comment.find('\n') {
                Some(end) => text = &comment[end..],
                None => return "",
            }
        } else {
            return trimmed;
        }
    }
}

/// Byte offset of the first comma in `gap` that is not inside a comment.
fn find_separator_comma(gap: &str) -> Option<usize> {
    let mut rest = gap;
    loop {
        let trivia_free = skip_trivia(rest);
        let consumed = gap.len() - trivia_free.len();
        if trivia_free.starts_with(',') {
            return Some(consumed);
        }
        // Skip one unexpected character so stray tokens cannot loop forever
        let mut chars = trivia_free.chars();
        chars.next()?;
        rest = chars.as_str();
    }
}

/// Whether the text ends with a line break followed only by indentation.
fn starts_fresh_line(text: &str) -> bool {
    text.rfind('\n')
        .is_some_and(|i| text[i + 1..].chars().all(|c| c == ' ' || c == '\t'))
}
