//! Dominant color extraction.
//!
//! [`KmeansExtractor`] clusters pixels in CIE Lab and reports the centroid
//! of the most populated cluster. [`MeanExtractor`] is a cheaper
//! alpha-weighted average.

use std::collections::HashMap;
use std::fmt;

use image::RgbaImage;
use kmeans_colors::get_kmeans;
use palette::{IntoColor, Lab, Srgb};

use crate::color::Rgb;

/// Returned when an image has no pixels opaque enough to sample.
pub const FALLBACK_COLOR: Rgb = Rgb::new(128, 128, 128);

/// Picks a single representative color for an image.
///
/// Implementations must be deterministic: the same pixels always give the
/// same color.
pub trait DominantColorExtractor: fmt::Debug + Send + Sync {
    fn extract(&self, img: &RgbaImage) -> Rgb;
}

// ============================================================================
// KmeansExtractor
// ============================================================================

/// k-means quantization with a fixed seed.
#[derive(Debug, Clone, PartialEq)]
pub struct KmeansExtractor {
    /// Number of clusters.
    pub clusters: usize,
    /// Sample every `quality`-th pixel; 1 samples all of them.
    pub quality: usize,
    pub max_iterations: usize,
    pub convergence: f32,
    pub seed: u64,
    /// Pixels with a lower alpha are ignored.
    pub min_alpha: u8,
}

impl Default for KmeansExtractor {
    fn default() -> Self {
        Self {
            clusters: 5,
            quality: 1,
            max_iterations: 20,
            convergence: 1e-4,
            seed: 0,
            min_alpha: 125,
        }
    }
}

impl KmeansExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clusters(mut self, clusters: usize) -> Self {
        self.clusters = clusters.max(1);
        self
    }

    pub fn with_quality(mut self, quality: usize) -> Self {
        self.quality = quality.max(1);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    fn samples(&self, img: &RgbaImage) -> Vec<[u8; 3]> {
        img.pixels()
            .step_by(self.quality.max(1))
            .filter(|p| p[3] >= self.min_alpha)
            .map(|p| [p[0], p[1], p[2]])
            .collect()
    }
}

impl DominantColorExtractor for KmeansExtractor {
    fn extract(&self, img: &RgbaImage) -> Rgb {
        let samples = self.samples(img);
        if samples.is_empty() {
            return FALLBACK_COLOR;
        }

        let mut histogram: HashMap<[u8; 3], usize> = HashMap::new();
        for sample in &samples {
            *histogram.entry(*sample).or_default() += 1;
        }

        // Too few distinct colors to cluster; the most frequent one wins.
        if histogram.len() <= self.clusters {
            return most_frequent(&histogram);
        }

        let lab: Vec<Lab> = samples
            .iter()
            .map(|&[r, g, b]| Srgb::new(r, g, b).into_linear().into_color())
            .collect();

        let result = get_kmeans(
            self.clusters,
            self.max_iterations,
            self.convergence,
            false,
            &lab,
            self.seed,
        );

        let mut population = vec![0usize; result.centroids.len()];
        for &index in &result.indices {
            population[index as usize] += 1;
        }
        let Some(largest) =
            (0..population.len()).max_by_key(|&i| (population[i], std::cmp::Reverse(i)))
        else {
            return FALLBACK_COLOR;
        };

        let rgb: Srgb = Srgb::from_linear(result.centroids[largest].into_color());
        let rgb = rgb.into_format::<u8>();
        Rgb::new(rgb.red, rgb.green, rgb.blue)
    }
}

fn most_frequent(histogram: &HashMap<[u8; 3], usize>) -> Rgb {
    histogram
        .iter()
        .max_by_key(|&(color, count)| (*count, std::cmp::Reverse(*color)))
        .map(|(color, _)| Rgb::from(*color))
        .unwrap_or(FALLBACK_COLOR)
}

// ============================================================================
// MeanExtractor
// ============================================================================

/// Alpha-weighted average of every visible pixel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MeanExtractor;

impl DominantColorExtractor for MeanExtractor {
    fn extract(&self, img: &RgbaImage) -> Rgb {
        let mut total_r: u64 = 0;
        let mut total_g: u64 = 0;
        let mut total_b: u64 = 0;
        let mut total_a: u64 = 0;

        for pixel in img.pixels() {
            let a = pixel[3] as u64;
            total_r += pixel[0] as u64 * a;
            total_g += pixel[1] as u64 * a;
            total_b += pixel[2] as u64 * a;
            total_a += a;
        }

        if total_a == 0 {
            return FALLBACK_COLOR;
        }

        Rgb::new(
            (total_r / total_a) as u8,
            (total_g / total_a) as u8,
            (total_b / total_a) as u8,
        )
    }
}
