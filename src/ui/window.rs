//! Horizontal windowing of highlighted lines.

use crate::highlight::{HighlightedLine, TokenKind};

pub const ELLIPSIS: &str = "…";

/// The part of `line` visible in a viewport `width` columns wide whose left
/// edge is at column `start`.
///
/// A leading `…` replaces the first column when `start > 0`; a trailing `…`
/// replaces the last column when content continues past the right edge.
/// Segment kinds are kept across the cut. The result is never wider than
/// `width`.
pub fn window_line(line: &HighlightedLine, start: usize, width: usize) -> HighlightedLine {
    let mut out = HighlightedLine::default();
    let total = line.len();
    if width == 0 || total == 0 {
        return out;
    }
    let start = start.min(total);

    let mut remaining = width;
    if start > 0 {
        out.push(TokenKind::Plain, ELLIPSIS);
        remaining -= 1;
    }
    let mut content = remaining;
    let continues_right = start + content < total;
    if continues_right && remaining > 0 {
        content -= 1;
    }

    let mut skip = start;
    let mut take_left = content;
    for segment in line.segments() {
        if take_left == 0 {
            break;
        }
        let seg_len = segment.text.chars().count();
        if skip >= seg_len {
            skip -= seg_len;
            continue;
        }
        let take = (seg_len - skip).min(take_left);
        let piece: String = segment.text.chars().skip(skip).take(take).collect();
        out.push(segment.kind, &piece);
        take_left -= take;
        skip = 0;
    }

    if continues_right && remaining > 0 {
        out.push(TokenKind::Plain, ELLIPSIS);
    }
    out
}
