use ndarray::{Array2, Axis};

use crate::color::ColorBand;
use crate::image::PixelSample;
use crate::models::ColorStatistics;

impl ColorStatistics {
    /// Aggregate band ratios and HSL variances over a pixel sample.
    pub fn from_sample(sample: &PixelSample) -> Self {
        let total = sample.len();
        if total == 0 {
            return Self::empty();
        }

        let mut green = 0usize;
        let mut yellow = 0usize;
        let mut brown = 0usize;
        let mut dark = 0usize;
        for px in &sample.pixels {
            green += ColorBand::Green.contains(px) as usize;
            yellow += ColorBand::Yellowing.contains(px) as usize;
            brown += ColorBand::Browning.contains(px) as usize;
            dark += ColorBand::DarkSpot.contains(px) as usize;
        }

        // Columns are normalized hue, saturation, lightness so all three share a [0, 1] scale.
        let matrix = Array2::from_shape_fn((total, 3), |(row, col)| {
            let px = &sample.pixels[row];
            match col {
                0 => px.hue / 360.0,
                1 => px.saturation,
                _ => px.lightness,
            }
        });
        let variance = matrix.var_axis(Axis(0), 0.0);

        let n = total as f32;
        Self {
            sample_count: total,
            green_ratio: green as f32 / n,
            yellowing_ratio: yellow as f32 / n,
            browning_ratio: brown as f32 / n,
            dark_spot_ratio: dark as f32 / n,
            hue_variance: variance[0],
            saturation_variance: variance[1],
            lightness_variance: variance[2],
        }
    }

    fn empty() -> Self {
        Self {
            sample_count: 0,
            green_ratio: 0.0,
            yellowing_ratio: 0.0,
            browning_ratio: 0.0,
            dark_spot_ratio: 0.0,
            hue_variance: 0.0,
            saturation_variance: 0.0,
            lightness_variance: 0.0,
        }
    }

    /// Weighted HSL variance scaled to `[0, 100]`; saturation and lightness outweigh hue.
    pub fn discoloration_variance_score(&self) -> f32 {
        let weighted = 0.2 * self.hue_variance
            + 0.4 * self.saturation_variance
            + 0.4 * self.lightness_variance;
        // 0.25 is the largest variance a [0, 1] value can have.
        (weighted * 400.0).clamp(0.0, 100.0)
    }
}
