use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::FieldValue;
use crate::data::summary::Distribution;

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
            let hsl = Hsl::new(hue, 0.65, 0.55);
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
// Color mapping: chart category → Color32
// ---------------------------------------------------------------------------

/// Maps the categories of a distribution to distinct colours. Colours follow
/// the value order, so a category keeps its colour while counts change.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<FieldValue, Color32>,
    default_color: Color32,
}

impl ColorMap {
    pub fn for_distribution(distribution: &Distribution) -> Self {
        let mut values: Vec<&FieldValue> = distribution.entries.iter().map(|e| &e.value).collect();
        values.sort();
        let palette = generate_palette(values.len());
        let mapping = values
            .into_iter()
            .zip(palette)
            .map(|(v, c)| (v.clone(), c))
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a given category.
    pub fn color_for(&self, value: &FieldValue) -> Color32 {
        self.mapping
            .get(value)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Dimension, MemberRecord};
    use crate::data::summary::summarize;

    #[test]
    fn palette_has_requested_size() {
        assert!(generate_palette(0).is_empty());
        let colours = generate_palette(5);
        assert_eq!(colours.len(), 5);
        assert_ne!(colours[0], colours[1]);
    }

    #[test]
    fn colours_are_stable_across_count_changes() {
        let rows = |genders: &[&str]| -> Vec<MemberRecord> {
            genders
                .iter()
                .map(|g| MemberRecord {
                    gender: Some(g.to_string()),
                    ..Default::default()
                })
                .collect()
        };
        let a = ColorMap::for_distribution(&summarize(&rows(&["Female", "Male", "Male"]), Dimension::Gender));
        let b = ColorMap::for_distribution(&summarize(&rows(&["Female", "Female", "Male"]), Dimension::Gender));
        let female = FieldValue::from("Female");
        assert_eq!(a.color_for(&female), b.color_for(&female));
        assert_eq!(a.color_for(&FieldValue::from("Other")), Color32::GRAY);
    }
}
