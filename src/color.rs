use std::collections::BTreeMap;

use palette::{Hsl, IntoColor, Srgb};
use serde::{Serialize, Serializer};

use crate::data::model::CellValue;

// ---------------------------------------------------------------------------
// Rgb – renderer-neutral colour
// ---------------------------------------------------------------------------

/// An sRGB colour. Serialises as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const GRAY: Rgb = Rgb(160, 160, 160);

    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.hex())
    }
}

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Rgb> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: series key → Rgb
// ---------------------------------------------------------------------------

/// Maps the distinct values of a series column to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<CellValue, Rgb>,
    default_color: Rgb,
}

impl ColorMap {
    /// Build a colour map from the distinct series keys, in sorted order.
    pub fn new<'a>(keys: impl IntoIterator<Item = &'a CellValue>) -> Self {
        let mut unique: Vec<&CellValue> = keys.into_iter().collect();
        unique.sort();
        unique.dedup();

        let palette = generate_palette(unique.len());
        let mapping = unique
            .into_iter()
            .zip(palette)
            .map(|(v, c)| (v.clone(), c))
            .collect();

        ColorMap {
            mapping,
            default_color: Rgb::GRAY,
        }
    }

    /// Look up the colour for a given series key.
    pub fn color_for(&self, value: &CellValue) -> Rgb {
        self.mapping
            .get(value)
            .copied()
            .unwrap_or(self.default_color)
    }

    /// Series keys with their colours, in key order.
    pub fn entries(&self) -> impl Iterator<Item = (&CellValue, Rgb)> {
        self.mapping.iter().map(|(v, c)| (v, *c))
    }

    pub fn len(&self) -> usize {
        self.mapping.len()
    }
}
