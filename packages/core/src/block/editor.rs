//! Marked-block text editing
//!
//! A marked block is the region of a file from a line reading
//! [`BLOCK_START`] through the next line reading [`BLOCK_END`]. tpux owns
//! everything between the markers and never touches the rest of the file.
//! All functions here work on in-memory strings; [`super::BlockFile`] takes
//! care of reading and writing.

use super::error::BlockError;

/// First line of every block tpux writes
pub const BLOCK_START: &str = "# BEGIN tpux configuration";

/// Last line of every block tpux writes
pub const BLOCK_END: &str = "# END tpux configuration";

/// Byte range of a located block
///
/// `start` is the first byte of the start-marker line, `end` is one past
/// the end-marker line (including its newline when it has one).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockSpan {
    pub start: usize,
    pub end: usize,
}

/// Wrap `body` in the start and end markers
pub fn render_block(body: &str) -> String {
    let body = body.trim_end_matches('\n');
    if body.is_empty() {
        format!("{BLOCK_START}\n{BLOCK_END}\n")
    } else {
        format!("{BLOCK_START}\n{body}\n{BLOCK_END}\n")
    }
}

/// Find the marked block in `content`
///
/// Returns `Ok(None)` when there are no markers at all. Markers that do not
/// form exactly one well-ordered block are reported as errors rather than
/// guessed at.
pub fn locate_block(content: &str) -> Result<Option<BlockSpan>, BlockError> {
    let mut open: Option<(usize, usize)> = None;
    let mut found: Option<BlockSpan> = None;
    let mut offset = 0;

    for (index, line) in content.split_inclusive('\n').enumerate() {
        let line_no = index + 1;
        let line_end = offset + line.len();

        match line.trim() {
            BLOCK_START => {
                if open.is_some() || found.is_some() {
                    return Err(BlockError::DuplicateBlock { line: line_no });
                }
                open = Some((offset, line_no));
            }
            BLOCK_END => match open.take() {
                Some((start, _)) => {
                    found = Some(BlockSpan {
                        start,
                        end: line_end,
                    })
                }
                None => return Err(BlockError::UnexpectedEnd { line: line_no }),
            },
            _ => {}
        }

        offset = line_end;
    }

    if let Some((_, line)) = open {
        return Err(BlockError::UnterminatedBlock { line });
    }

    Ok(found)
}

/// Insert or replace the marked block holding `body`
///
/// - no block, blank content: the result is just the block
/// - no block: trailing whitespace is trimmed and the block follows one
///   blank line
/// - existing block: replaced in place, surrounding text untouched
pub fn insert_block(content: &str, body: &str) -> Result<String, BlockError> {
    let block = render_block(body);

    match locate_block(content)? {
        Some(span) => Ok(format!(
            "{}{}{}",
            &content[..span.start],
            block,
            &content[span.end..]
        )),
        None => {
            let existing = content.trim_end();
            if existing.is_empty() {
                Ok(block)
            } else {
                Ok(format!("{existing}\n\n{block}"))
            }
        }
    }
}

/// Remove the marked block and the blank lines around it
///
/// Whitespace-only lines count as blank. Text outside the block keeps its
/// bytes; only line breaks at the very end are normalised to one newline.
/// Content without a block is returned unchanged.
pub fn clear_block(content: &str) -> Result<String, BlockError> {
    let Some(span) = locate_block(content)? else {
        return Ok(content.to_string());
    };

    let before = trim_line_breaks_end(trim_blank_lines_end(&content[..span.start]));
    let after = trim_blank_lines_start(&content[span.end..]);

    let joined = match (before.is_empty(), after.is_empty()) {
        (true, true) => return Ok(String::new()),
        (true, false) => after.to_string(),
        (false, true) => before.to_string(),
        (false, false) => format!("{before}\n\n{after}"),
    };

    Ok(format!("{}\n", trim_line_breaks_end(&joined)))
}

fn trim_line_breaks_end(text: &str) -> &str {
    text.trim_end_matches(['\n', '\r'])
}

/// `text` without the whitespace-only lines at its end
fn trim_blank_lines_end(text: &str) -> &str {
    let mut end = text.len();
    while end > 0 {
        let line_start = trim_line_breaks_end(&text[..end])
            .rfind('\n')
            .map_or(0, |i| i + 1);
        if !text[line_start..end].trim().is_empty() {
            break;
        }
        end = line_start;
    }
    &text[..end]
}

/// `text` without the whitespace-only lines at its start
fn trim_blank_lines_start(text: &str) -> &str {
    let mut start = 0;
    while start < text.len() {
        let line_end = text[start..]
            .find('\n')
            .map_or(text.len(), |i| start + i + 1);
        if !text[start..line_end].trim().is_empty() {
            break;
        }
        start = line_end;
    }
    &text[start..]
}
