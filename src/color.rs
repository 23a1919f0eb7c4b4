use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// University → Color32
// ---------------------------------------------------------------------------

/// One colour per university in the whole dataset, so a line keeps its
/// colour while other universities are toggled on and off.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
}

impl ColorMap {
    pub fn new(universities: &BTreeSet<String>) -> Self {
        let mapping = universities
            .iter()
            .cloned()
            .zip(generate_palette(universities.len()))
            .collect();
        ColorMap { mapping }
    }

    pub fn color_for(&self, university: &str) -> Color32 {
        self.mapping
            .get(university)
            .copied()
            .unwrap_or(Color32::GRAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size() {
        assert!(generate_palette(0).is_empty());
        let p = generate_palette(5);
        assert_eq!(p.len(), 5);
        let distinct: BTreeSet<[u8; 4]> = p.iter().map(|c| c.to_array()).collect();
        assert_eq!(distinct.len(), 5);
    }

    #[test]
    fn colours_are_stable_and_unknown_is_gray() {
        let unis: BTreeSet<String> = ["Dal", "McGill", "UBC"].iter().map(|s| s.to_string()).collect();
        let a = ColorMap::new(&unis);
        let b = ColorMap::new(&unis);
        assert_eq!(a.color_for("McGill"), b.color_for("McGill"));
        assert_ne!(a.color_for("Dal"), a.color_for("UBC"));
        assert_eq!(a.color_for("Queen's"), Color32::GRAY);
    }
}
