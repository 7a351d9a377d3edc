//
// color.rs
// Crop-Health-rs
//
// Pure RGB to HSL conversion and the hue/saturation/lightness bands used for vegetation and disease heuristics.
//
// Thales Matheus Mendonça Santos - November 2025

use serde::{Deserialize, Serialize};

/// A pixel in hue/saturation/lightness form. Hue is in degrees `[0, 360)`,
/// saturation and lightness in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsl {
    pub hue: f32,
    pub saturation: f32,
    pub lightness: f32,
}

/// Convert an 8-bit RGB triple into HSL.
pub fn rgb_to_hsl(r: u8, g: u8, b: u8) -> Hsl {
    let r = r as f32 / 255.0;
    let g = g as f32 / 255.0;
    let b = b as f32 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let lightness = (max + min) / 2.0;
    let delta = max - min;

    // Achromatic: hue and saturation are undefined, report zero.
    if delta <= f32::EPSILON {
        return Hsl {
            hue: 0.0,
            saturation: 0.0,
            lightness,
        };
    }

    let saturation = delta / (1.0 - (2.0 * lightness - 1.0).abs());

    let sector = if max == r {
        ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };
    let hue = (sector * 60.0).rem_euclid(360.0);

    Hsl {
        hue,
        saturation: saturation.clamp(0.0, 1.0),
        lightness,
    }
}

/// Color bands the classifier counts pixels against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorBand {
    /// Healthy foliage.
    Green,
    /// Chlorosis / nutrient stress.
    Yellowing,
    /// Necrotic tissue.
    Browning,
    /// Lesions and near-black spots.
    DarkSpot,
}

pub mod bands {
    pub const GREEN_HUE: (f32, f32) = (75.0, 150.0);
    pub const GREEN_MIN_SATURATION: f32 = 0.15;

    pub const YELLOW_HUE: (f32, f32) = (40.0, 70.0);
    pub const YELLOW_MIN_SATURATION: f32 = 0.25;
    pub const YELLOW_LIGHTNESS: (f32, f32) = (0.40, 0.85);

    pub const BROWN_HUE: (f32, f32) = (20.0, 40.0);
    pub const BROWN_MIN_SATURATION: f32 = 0.20;
    pub const BROWN_LIGHTNESS: (f32, f32) = (0.15, 0.50);

    pub const DARK_MAX_LIGHTNESS: f32 = 0.35;
}

impl ColorBand {
    pub fn contains(self, px: &Hsl) -> bool {
        use bands::*;
        match self {
            ColorBand::Green => {
                (GREEN_HUE.0..=GREEN_HUE.1).contains(&px.hue)
                    && px.saturation > GREEN_MIN_SATURATION
            }
            ColorBand::Yellowing => {
                (YELLOW_HUE.0..YELLOW_HUE.1).contains(&px.hue)
                    && px.saturation >= YELLOW_MIN_SATURATION
                    && (YELLOW_LIGHTNESS.0..=YELLOW_LIGHTNESS.1).contains(&px.lightness)
            }
            ColorBand::Browning => {
                (BROWN_HUE.0..BROWN_HUE.1).contains(&px.hue)
                    && px.saturation >= BROWN_MIN_SATURATION
                    && (BROWN_LIGHTNESS.0..=BROWN_LIGHTNESS.1).contains(&px.lightness)
            }
            ColorBand::DarkSpot => px.lightness < DARK_MAX_LIGHTNESS,
        }
    }
}
