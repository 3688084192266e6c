use crate::foundation::{
    core::Rgba8,
    error::PosterResult,
};

/// The fixed golden text ramp, top to bottom: `(offset, color)`.
pub const GOLDEN_STOPS: [(f32, Rgba8); 4] = [
    (0.0, Rgba8::rgb(0xff, 0xd7, 0x00)),
    (0.3, Rgba8::rgb(0xff, 0xed, 0x4e)),
    (0.7, Rgba8::rgb(0xd9, 0x77, 0x06)),
    (1.0, Rgba8::rgb(0xb4, 0x53, 0x09)),
];

/// Greedy word wrap.
///
/// Words are whitespace-separated and re-joined with single spaces. A word is moved to the
/// next line only when appending it would push the candidate past `max_width`; the first word
/// of a line is never deferred, so a single over-wide word gets a line of its own.
pub fn wrap_words<F>(text: &str, max_width: f64, mut measure: F) -> PosterResult<Vec<String>>
where
    F: FnMut(&str) -> PosterResult<f64>,
{
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        if line.is_empty() {
            line.push_str(word);
            continue;
        }
        let candidate = format!("{line} {word}");
        if measure(&candidate)? > max_width {
            lines.push(std::mem::replace(&mut line, word.to_string()));
        } else {
            line = candidate;
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    Ok(lines)
}

/// Horizontal anchoring of a flowed block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Anchor {
    /// Each line is centered on `x`.
    Center,
    /// Lines start at `x`.
    Left,
}

/// Where one line of a block goes: its left edge and top edge in canvas pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineSlot {
    pub left: f64,
    pub top: f64,
}

/// Place already-measured lines. Line `i` sits `i * line_height` below `top`.
pub fn place_lines(widths: &[f64], x: f64, top: f64, line_height: f64, anchor: Anchor) -> Vec<LineSlot> {
    widths
        .iter()
        .enumerate()
        .map(|(i, w)| LineSlot {
            left: match anchor {
                Anchor::Center => x - w * 0.5,
                Anchor::Left => x,
            },
            top: top + line_height * i as f64,
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/text/flow.rs"]
mod tests;
