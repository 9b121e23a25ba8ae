//! Default section colors handed out by the editor.

use super::color::Color;

/// Tailwind 400-weight hues, in wheel order.
pub const PALETTE_HEX: [&str; 17] = [
    "#f87171", // red
    "#fb923c", // orange
    "#fbbf24", // amber
    "#facc15", // yellow
    "#a3e635", // lime
    "#4ade80", // green
    "#34d399", // emerald
    "#2dd4bf", // teal
    "#22d3ee", // cyan
    "#38bdf8", // sky
    "#60a5fa", // blue
    "#818cf8", // indigo
    "#a78bfa", // violet
    "#c084fc", // purple
    "#e879f9", // fuchsia
    "#f472b6", // pink
    "#fb7185", // rose
];

/// Palette entry `index`, wrapping around.
pub fn palette_color(index: usize) -> Color {
    let hex = PALETTE_HEX[index % PALETTE_HEX.len()];
    Color::from_hex(hex).unwrap_or_default()
}

/// A uniformly chosen palette color.
pub fn random_color(rng: &mut fastrand::Rng) -> Color {
    palette_color(rng.usize(..PALETTE_HEX.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_entry_parses() {
        for hex in PALETTE_HEX {
            assert!(Color::from_hex(hex).is_ok(), "{hex} should parse");
        }
    }

    #[test]
    fn wraps_around() {
        assert_eq!(palette_color(0), palette_color(PALETTE_HEX.len()));
    }

    #[test]
    fn random_color_is_from_palette() {
        let mut rng = fastrand::Rng::with_seed(7);
        let all: Vec<Color> = (0..PALETTE_HEX.len()).map(palette_color).collect();
        for _ in 0..50 {
            assert!(all.contains(&random_color(&mut rng)));
        }
    }
}
