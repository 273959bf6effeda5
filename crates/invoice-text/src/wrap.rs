//! Width-driven word wrapping
//!
//! Text is split on explicit line breaks first, then each segment is filled
//! word by word up to the measured width. A word wider than the column is
//! broken at character boundaries so nothing is ever truncated.

/// Wrap text to `max_width`
///
/// # Arguments
/// * `text` - Text to wrap (may contain `\n` or `\r\n`)
/// * `max_width` - Available width, in the units `measure` returns
/// * `measure` - Width of a string
///
/// # Returns
/// Wrapped lines. Always at least one line; an empty segment produces an
/// empty line.
pub fn wrap_text<F>(text: &str, max_width: f64, measure: F) -> Vec<String>
where
    F: Fn(&str) -> f64,
{
    let mut lines = Vec::new();

    for segment in text.split('\n') {
        let segment = segment.strip_suffix('\r').unwrap_or(segment);
        wrap_segment(segment, max_width, &measure, &mut lines);
    }

    lines
}

fn wrap_segment<F>(segment: &str, max_width: f64, measure: &F, lines: &mut Vec<String>)
where
    F: Fn(&str) -> f64,
{
    let mut current = String::new();

    for word in segment.split_whitespace() {
        if !current.is_empty() {
            let candidate = format!("{current} {word}");
            if measure(&candidate) <= max_width {
                current = candidate;
                continue;
            }
            lines.push(std::mem::take(&mut current));
        }

        if measure(word) <= max_width {
            current = word.to_string();
        } else {
            let mut pieces = break_word(word, max_width, measure);
            // Last piece keeps filling the line
            current = pieces.pop().unwrap_or_default();
            lines.extend(pieces);
        }
    }

    lines.push(current);
}

/// Break a word into pieces no wider than `max_width` (at least one char each)
fn break_word<F>(word: &str, max_width: f64, measure: &F) -> Vec<String>
where
    F: Fn(&str) -> f64,
{
    let mut pieces = Vec::new();
    let mut piece = String::new();

    for c in word.chars() {
        piece.push(c);
        if piece.chars().count() > 1 && measure(&piece) > max_width {
            piece.pop();
            pieces.push(std::mem::take(&mut piece));
            piece.push(c);
        }
    }

    if !piece.is_empty() {
        pieces.push(piece);
    }

    pieces
}
