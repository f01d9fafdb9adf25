//! Text measurement for the built-in monospace face.
//!
//! Every glyph advances `0.6 * size`, so widths are exact for both the
//! rasterizer and the layout.

/// Horizontal advance of one character at `size` (three fifths of the size).
pub fn advance(size: f32) -> f32 {
    size * 3.0 / 5.0
}

/// Line height, as a multiple of the font size.
pub const LINE_HEIGHT: f32 = 1.4;

/// Width of `text` at `size`.
pub fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * advance(size)
}

/// How many characters fit in `width` at `size`.
pub fn chars_that_fit(width: f32, size: f32) -> usize {
    if width <= 0.0 || size <= 0.0 {
        return 0;
    }
    // Tolerate float noise so an exact fit is not lost.
    (width / advance(size) + 1e-3).floor() as usize
}

/// Cut `text` to fit `width`, ending with `...` when shortened.
pub fn truncate_to_width(text: &str, width: f32, size: f32) -> String {
    let max = chars_that_fit(width, size);
    let count = text.chars().count();
    if count <= max {
        return text.to_string();
    }
    if max <= 3 {
        return text.chars().take(max).collect();
    }
    let mut out: String = text.chars().take(max - 3).collect();
    out.push_str("...");
    out
}

/// Greedy word wrap into lines no wider than `width`.
///
/// Explicit newlines are kept; words longer than a line are split.
pub fn wrap(text: &str, width: f32, size: f32) -> Vec<String> {
    let max = chars_that_fit(width, size).max(1);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > max {
                if !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                }
                lines.push(word.drain(..max).collect());
            }
            let word: String = word.into_iter().collect();
            if word.is_empty() {
                continue;
            }

            let needed = if line.is_empty() {
                word.chars().count()
            } else {
                line.chars().count() + 1 + word.chars().count()
            };
            if needed > max {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(&word);
        }
        lines.push(line);
    }

    lines
}
