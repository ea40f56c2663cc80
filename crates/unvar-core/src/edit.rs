//! Byte-range text edits

use serde::Serialize;

use crate::transforms::TransformError;

/// Replace `start..end` of the source with `replacement`. Offsets are bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextEdit {
    pub start: usize,
    pub end: usize,
    pub replacement: String,
}

impl TextEdit {
    pub fn new(start: usize, end: usize, replacement: impl Into<String>) -> Self {
        Self {
            start,
            end,
            replacement: replacement.into(),
        }
    }

    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self::new(at, at, text)
    }
}

/// Applies `edits` to `source`. Edits may come in any order but must not
/// overlap; two insertions at the same offset keep their given order.
pub fn apply_edits(source: &str, edits: &[TextEdit]) -> Result<String, TransformError> {
    let mut sorted: Vec<&TextEdit> = edits.iter().collect();
    sorted.sort_by_key(|edit| (edit.start, edit.end));

    let mut output = String::with_capacity(source.len());
    let mut cursor = 0;

    for edit in sorted {
        if edit.start < cursor || edit.end < edit.start || edit.end > source.len() {
            return Err(TransformError::OverlappingEdits { at: edit.start });
        }
        let Some(kept) = source.get(cursor..edit.start) else {
            return Err(TransformError::OverlappingEdits { at: edit.start });
        };
        output.push_str(kept);
        output.push_str(&edit.replacement);
        cursor = edit.end;
    }

    output.push_str(source.get(cursor..).unwrap_or_default());
    Ok(output)
}
