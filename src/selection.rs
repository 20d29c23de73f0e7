//! Selection Resolver
//!
//! Turns the editor's selection state into the literal text to look up:
//! - an explicit, non-empty selection is used verbatim
//! - an empty selection (a bare cursor) expands to the word under the cursor
//!
//! Positions follow LSP semantics: zero-based lines, UTF-16 columns, and
//! out-of-range positions are clamped to the line or document end.

use std::sync::LazyLock;

use regex::Regex;
use tower_lsp::lsp_types::{Position, Range};

use crate::error::{LookupError, Result};

/// Default editor word pattern: a decimal number, or a run of characters that
/// are neither whitespace nor punctuation.
static WORD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(-?\d*\.\d\w*)|([^`~!@#$%^&*()\-=+\[{\]}\\|;:'",.<>/?\s]+)"#)
        .expect("word pattern is a valid regex")
});

/// Resolve the text to look up for `selection` in `content`.
///
/// Fails with [`LookupError::InvalidSelection`] when the result is empty or
/// contains a line break.
pub fn resolve_selection(content: &str, selection: Range) -> Result<String> {
    let text = if selection.start == selection.end {
        word_range_at(content, selection.end)
            .map(|range| text_in_range(content, range))
            .unwrap_or_default()
    } else {
        text_in_range(content, selection)
    };

    if text.is_empty() || text.contains(['\n', '\r']) {
        return Err(LookupError::InvalidSelection);
    }
    Ok(text.to_string())
}

/// Find the range of the word touching `position`, if any.
///
/// A cursor sitting directly before or after a word still selects it.
pub fn word_range_at(content: &str, position: Position) -> Option<Range> {
    let line = content.lines().nth(position.line as usize)?;
    let cursor = utf16_to_byte(line, position.character);

    let word = WORD_PATTERN
        .find_iter(line)
        .find(|m| m.start() <= cursor && cursor <= m.end())?;

    Some(Range {
        start: Position::new(position.line, byte_to_utf16(line, word.start())),
        end: Position::new(position.line, byte_to_utf16(line, word.end())),
    })
}

/// Slice the text covered by `range`, swapping reversed ranges.
pub fn text_in_range(content: &str, range: Range) -> &str {
    let start = offset_at(content, range.start);
    let end = offset_at(content, range.end);
    if start <= end {
        &content[start..end]
    } else {
        &content[end..start]
    }
}

/// Byte offset of `position` in `content`.
fn offset_at(content: &str, position: Position) -> usize {
    let mut line_start = 0;
    for _ in 0..position.line {
        match content[line_start..].find('\n') {
            Some(newline) => line_start += newline + 1,
            None => return content.len(),
        }
    }

    let rest = &content[line_start..];
    let line = &rest[..rest.find('\n').unwrap_or(rest.len())];
    let line = line.strip_suffix('\r').unwrap_or(line);
    line_start + utf16_to_byte(line, position.character)
}

fn utf16_to_byte(line: &str, character: u32) -> usize {
    let target = character as usize;
    let mut units = 0;
    for (idx, ch) in line.char_indices() {
        if units >= target {
            return idx;
        }
        units += ch.len_utf16();
    }
    line.len()
}

fn byte_to_utf16(line: &str, byte: usize) -> u32 {
    line[..byte].encode_utf16().count() as u32
}
