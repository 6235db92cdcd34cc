//! Readable foreground colors for colored labels.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContrastColor {
    Black,
    White,
}

/// Pick black or white text for a `#rgb` / `#rrggbb` background using YIQ brightness.
///
/// Anything that is not a hex color gets white.
pub fn contrast_color(hex: &str) -> ContrastColor {
    let Some((r, g, b)) = parse_hex(hex) else {
        return ContrastColor::White;
    };
    let yiq = (u32::from(r) * 299 + u32::from(g) * 587 + u32::from(b) * 114) / 1000;
    if yiq >= 128 {
        ContrastColor::Black
    } else {
        ContrastColor::White
    }
}

fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 => digits.to_string(),
        _ => return None,
    };
    let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}
