//! Content stream operators for text and lines
//!
//! Coordinates here are already in PDF space (origin bottom-left). Fill and
//! stroke colours are left at the PDF default of black.

use crate::Align;
use std::fmt::Write;

/// One string shown with a single font
pub struct TextRun<'a> {
    /// Page resource name of the font (e.g., "F1")
    pub resource: &'a str,
    /// Font size in points
    pub size: f32,
    /// WinAnsi hex string including the angle brackets
    pub hex: &'a str,
    /// Advance width of the run in points
    pub width: f64,
}

impl TextRun<'_> {
    /// Left edge of the run for an anchor at `x`
    fn origin_x(&self, x: f64, align: Align) -> f64 {
        match align {
            Align::Left => x,
            Align::Center => x - self.width / 2.0,
            Align::Right => x - self.width,
        }
    }
}

/// Format a coordinate for a content stream
///
/// Rounds to three decimals and trims trailing zeros, so `100.0` is written
/// as `100` and `12.3456` as `12.346`.
pub fn format_coord(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    // -0 prints as "-0"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    let text = format!("{rounded:.3}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// `BT .. ET` block showing `run` with its anchor at (`x`, `y`)
pub fn text_show_operators(run: &TextRun<'_>, x: f64, y: f64, align: Align) -> Vec<u8> {
    let mut ops = String::from("BT\n");
    // Writing into a String cannot fail
    let _ = writeln!(ops, "/{} {} Tf", run.resource, run.size);
    let _ = writeln!(
        ops,
        "{} {} Td",
        format_coord(run.origin_x(x, align)),
        format_coord(y)
    );
    let _ = writeln!(ops, "{} Tj", run.hex);
    ops.push_str("ET\n");
    ops.into_bytes()
}

/// Stroked segment from `from` to `to`, wrapped in `q .. Q`
pub fn stroke_line_operators(from: (f64, f64), to: (f64, f64), width: f64) -> Vec<u8> {
    let mut ops = String::from("q\n");
    let _ = writeln!(ops, "{} w", format_coord(width));
    let _ = writeln!(ops, "{} {} m", format_coord(from.0), format_coord(from.1));
    let _ = writeln!(ops, "{} {} l", format_coord(to.0), format_coord(to.1));
    ops.push_str("S\nQ\n");
    ops.into_bytes()
}
