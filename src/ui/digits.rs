//! Block numerals for the countdown.

pub const GLYPH_HEIGHT: u16 = 5;
pub const GLYPH_WIDTH: u16 = 5;

const GLYPHS: [[&str; GLYPH_HEIGHT as usize]; 10] = [
    ["█████", "█   █", "█   █", "█   █", "█████"],
    ["  ██ ", " ███ ", "  ██ ", "  ██ ", "█████"],
    ["█████", "    █", "█████", "█    ", "█████"],
    ["█████", "    █", " ████", "    █", "█████"],
    ["█   █", "█   █", "█████", "    █", "    █"],
    ["█████", "█    ", "█████", "    █", "█████"],
    ["█████", "█    ", "█████", "█   █", "█████"],
    ["█████", "    █", "   █ ", "  █  ", "  █  "],
    ["█████", "█   █", "█████", "█   █", "█████"],
    ["█████", "█   █", "█████", "    █", "█████"],
];

/// Rows of the block glyph for a single decimal digit.
pub fn glyph(digit: u8) -> Option<&'static [&'static str; GLYPH_HEIGHT as usize]> {
    GLYPHS.get(digit as usize)
}
