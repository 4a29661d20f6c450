//! Height-map sampling.
//!
//! Pixels are addressed bottom-up: row 0 is the bottom row of the picture.
//! The sampler flips rows once more so the top of the picture ends up on the
//! mesh's far (+Z) edge.

use image::{DynamicImage, GenericImageView, GrayImage};

use crate::error::GenerationError;

/// Degenerate grayscale ranges are widened by this much before normalizing.
pub const RANGE_EPSILON: f32 = 1e-4;

/// Any raster that can report a grayscale intensity per pixel.
pub trait GrayscaleSource: Sync {
    /// `(width, height)` in pixels. Both are at least 1.
    fn extent(&self) -> (u32, u32);

    /// Intensity in [0, 1] at column `px`, row `pz` counted from the bottom.
    fn grayscale(&self, px: u32, pz: u32) -> f32;
}

/// Standard luma weighting of channel values as stored.
pub fn luma(r: f32, g: f32, b: f32) -> f32 {
    0.299 * r + 0.587 * g + 0.114 * b
}

/// Row-major in-memory grayscale raster.
#[derive(Clone, Debug, PartialEq)]
pub struct GrayscaleGrid {
    width: u32,
    height: u32,
    values: Vec<f32>,
}

impl GrayscaleGrid {
    /// `values[pz * width + px]`, bottom row first.
    pub fn new(width: u32, height: u32, values: Vec<f32>) -> Result<Self, GenerationError> {
        if width == 0 || height == 0 {
            return Err(GenerationError::InvalidHeightMap(format!(
                "height map must be at least 1x1, got {width}x{height}"
            )));
        }
        if values.len() != width as usize * height as usize {
            return Err(GenerationError::InvalidHeightMap(format!(
                "expected {} samples for a {width}x{height} height map, got {}",
                width as usize * height as usize,
                values.len()
            )));
        }
        Ok(Self {
            width,
            height,
            values,
        })
    }

    pub fn from_fn(
        width: u32,
        height: u32,
        mut f: impl FnMut(u32, u32) -> f32,
    ) -> Result<Self, GenerationError> {
        let mut values = Vec::with_capacity(width as usize * height as usize);
        for pz in 0..height {
            for px in 0..width {
                values.push(f(px, pz));
            }
        }
        Self::new(width, height, values)
    }
}

impl GrayscaleSource for GrayscaleGrid {
    fn extent(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn grayscale(&self, px: u32, pz: u32) -> f32 {
        self.values[pz as usize * self.width as usize + px as usize]
    }
}

// `image` stores rows top-down, so rows are mirrored to keep bottom-up addressing.

fn unit8(v: u8) -> f32 {
    v as f32 / u8::MAX as f32
}

fn unit16(v: u16) -> f32 {
    v as f32 / u16::MAX as f32
}

impl GrayscaleSource for DynamicImage {
    fn extent(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    // Wide formats are read from their own buffers so 16-bit and float maps keep full precision.
    fn grayscale(&self, px: u32, pz: u32) -> f32 {
        let y = self.height() - 1 - pz;
        match self {
            DynamicImage::ImageLuma8(buf) => unit8(buf.get_pixel(px, y).0[0]),
            DynamicImage::ImageLumaA8(buf) => unit8(buf.get_pixel(px, y).0[0]),
            DynamicImage::ImageLuma16(buf) => unit16(buf.get_pixel(px, y).0[0]),
            DynamicImage::ImageLumaA16(buf) => unit16(buf.get_pixel(px, y).0[0]),
            DynamicImage::ImageRgb16(buf) => {
                let [r, g, b] = buf.get_pixel(px, y).0;
                luma(unit16(r), unit16(g), unit16(b))
            }
            DynamicImage::ImageRgba16(buf) => {
                let [r, g, b, _] = buf.get_pixel(px, y).0;
                luma(unit16(r), unit16(g), unit16(b))
            }
            DynamicImage::ImageRgb32F(buf) => {
                let [r, g, b] = buf.get_pixel(px, y).0;
                luma(r, g, b)
            }
            DynamicImage::ImageRgba32F(buf) => {
                let [r, g, b, _] = buf.get_pixel(px, y).0;
                luma(r, g, b)
            }
            _ => {
                let [r, g, b, _] = self.get_pixel(px, y).0;
                luma(unit8(r), unit8(g), unit8(b))
            }
        }
    }
}

impl GrayscaleSource for GrayImage {
    fn extent(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    fn grayscale(&self, px: u32, pz: u32) -> f32 {
        unit8(self.get_pixel(px, self.height() - 1 - pz).0[0])
    }
}

/// Observed grayscale bounds of a whole image.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GrayscaleRange {
    pub min: f32,
    pub max: f32,
}

impl GrayscaleRange {
    /// Visits every pixel once. A flat image gets `max = min + RANGE_EPSILON`.
    pub fn scan(source: &(impl GrayscaleSource + ?Sized)) -> Self {
        let (width, height) = source.extent();
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        for pz in 0..height {
            for px in 0..width {
                let gray = source.grayscale(px, pz);
                min = min.min(gray);
                max = max.max(gray);
            }
        }

        if (max - min).abs() <= f32::EPSILON * max.abs().max(1.0) {
            max = min + RANGE_EPSILON;
        }

        Self { min, max }
    }

    pub fn normalize(&self, gray: f32) -> f32 {
        (gray - self.min) / (self.max - self.min)
    }
}

/// Nearest-neighbour lookup from grid vertices into a height map.
pub struct HeightMapSampler<'a> {
    source: &'a dyn GrayscaleSource,
    resolution: u32,
    width: u32,
    height: u32,
    range: Option<GrayscaleRange>,
}

impl<'a> HeightMapSampler<'a> {
    /// Fails on a source with no pixels.
    pub fn new(
        source: &'a dyn GrayscaleSource,
        resolution: u32,
        normalize: bool,
    ) -> Result<Self, GenerationError> {
        let (width, height) = source.extent();
        if width == 0 || height == 0 {
            return Err(GenerationError::InvalidHeightMap(format!(
                "height map is empty ({width}x{height})"
            )));
        }
        let range = normalize.then(|| GrayscaleRange::scan(source));
        Ok(Self {
            source,
            resolution,
            width,
            height,
            range,
        })
    }

    /// Bounds used for normalizing, if enabled.
    pub fn range(&self) -> Option<GrayscaleRange> {
        self.range
    }

    /// Pixel feeding grid vertex `(x, z)`.
    pub fn pixel_for(&self, x: u32, z: u32) -> (u32, u32) {
        let px = scale_to_pixel(x, self.resolution, self.width);
        let pz = scale_to_pixel(z, self.resolution, self.height);
        (px, self.height - 1 - pz)
    }

    /// Height fraction for grid vertex `(x, z)`; [0, 1] for normalized or in-range data.
    pub fn sample(&self, x: u32, z: u32) -> f32 {
        let (px, pz) = self.pixel_for(x, z);
        let gray = self.source.grayscale(px, pz);
        match &self.range {
            Some(range) => range.normalize(gray),
            None => gray,
        }
    }
}

// Round half to even, then clamp: edge rounding can overshoot by a pixel.
fn scale_to_pixel(i: u32, resolution: u32, extent: u32) -> u32 {
    let last = extent.saturating_sub(1);
    let p = (i as f32 / resolution as f32 * last as f32).round_ties_even();
    (p.max(0.0) as u32).min(last)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Luma, Rgb, Rgba};

    fn ramp(width: u32, height: u32) -> GrayscaleGrid {
        GrayscaleGrid::from_fn(width, height, |px, pz| {
            (pz * width + px) as f32 / (width * height - 1) as f32
        })
        .unwrap()
    }

    #[test]
    fn grid_rejects_mismatched_sample_count() {
        assert!(GrayscaleGrid::new(2, 2, vec![0.0; 3]).is_err());
        assert!(GrayscaleGrid::new(0, 2, vec![]).is_err());
    }

    #[test]
    fn luma_weights_sum_to_one() {
        assert!((luma(1.0, 1.0, 1.0) - 1.0).abs() < 1e-6);
        assert!((luma(0.0, 1.0, 0.0) - 0.587).abs() < 1e-6);
    }

    #[test]
    fn range_scan_finds_extremes() {
        let grid = GrayscaleGrid::new(3, 1, vec![0.4, 0.1, 0.9]).unwrap();
        let range = GrayscaleRange::scan(&grid);
        assert_eq!(range.min, 0.1);
        assert_eq!(range.max, 0.9);
        assert!((range.normalize(0.9) - 1.0).abs() < 1e-6);
        assert_eq!(range.normalize(0.1), 0.0);
    }

    #[test]
    fn flat_range_is_widened() {
        let grid = GrayscaleGrid::new(2, 2, vec![0.5; 4]).unwrap();
        let range = GrayscaleRange::scan(&grid);
        assert_eq!(range.min, 0.5);
        assert!((range.max - (0.5 + RANGE_EPSILON)).abs() < 1e-7);
        assert_eq!(range.normalize(0.5), 0.0);
    }

    #[test]
    fn corners_map_to_flipped_rows() {
        let grid = ramp(5, 5);
        let sampler = HeightMapSampler::new(&grid, 4, false).unwrap();
        // Grid z = 0 reads the top row of the picture.
        assert_eq!(sampler.pixel_for(0, 0), (0, 4));
        assert_eq!(sampler.pixel_for(4, 0), (4, 4));
        assert_eq!(sampler.pixel_for(0, 4), (0, 0));
        assert_eq!(sampler.pixel_for(4, 4), (4, 0));
        assert_eq!(sampler.sample(0, 4), 0.0);
        assert_eq!(sampler.sample(4, 0), 1.0);
    }

    #[test]
    fn scaling_handles_smaller_images() {
        let grid = ramp(3, 2);
        let sampler = HeightMapSampler::new(&grid, 4, false).unwrap();
        // 1/4 * 2 = 0.5 rounds to 0, 3/4 * 2 = 1.5 rounds to 2.
        assert_eq!(sampler.pixel_for(1, 0).0, 0);
        assert_eq!(sampler.pixel_for(2, 0).0, 1);
        assert_eq!(sampler.pixel_for(3, 0).0, 2);
        assert_eq!(sampler.pixel_for(4, 4), (2, 0));
    }

    #[test]
    fn single_pixel_image_is_clamped() {
        let grid = GrayscaleGrid::new(1, 1, vec![0.25]).unwrap();
        let sampler = HeightMapSampler::new(&grid, 7, false).unwrap();
        for z in 0..=7 {
            for x in 0..=7 {
                assert_eq!(sampler.pixel_for(x, z), (0, 0));
            }
        }
        assert_eq!(sampler.sample(3, 3), 0.25);
    }

    #[test]
    fn normalized_sampling_spans_unit_range() {
        let grid = GrayscaleGrid::new(2, 1, vec![0.2, 0.6]).unwrap();
        let sampler = HeightMapSampler::new(&grid, 1, true).unwrap();
        assert_eq!(sampler.sample(0, 0), 0.0);
        assert!((sampler.sample(1, 0) - 1.0).abs() < 1e-6);
        assert_eq!(
            sampler.range(),
            Some(GrayscaleRange { min: 0.2, max: 0.6 })
        );
    }

    #[test]
    fn raw_sampling_has_no_range() {
        let grid = GrayscaleGrid::new(2, 1, vec![0.2, 0.6]).unwrap();
        let sampler = HeightMapSampler::new(&grid, 1, false).unwrap();
        assert_eq!(sampler.range(), None);
        assert_eq!(sampler.sample(1, 0), 0.6);
    }

    #[test]
    fn sampler_rejects_empty_source() {
        let img = GrayImage::new(0, 0);
        assert!(matches!(
            HeightMapSampler::new(&img, 4, true),
            Err(GenerationError::InvalidHeightMap(_))
        ));
        assert_eq!(scale_to_pixel(3, 4, 0), 0);
    }

    #[test]
    fn gray_image_rows_are_bottom_up() {
        let img: GrayImage = ImageBuffer::from_fn(1, 2, |_, y| Luma([if y == 0 { 255 } else { 0 }]));
        // Image row 0 is the top, which is bottom-up row 1.
        assert_eq!(GrayscaleSource::grayscale(&img, 0, 1), 1.0);
        assert_eq!(GrayscaleSource::grayscale(&img, 0, 0), 0.0);
    }

    #[test]
    fn dynamic_image_uses_luma() {
        let rgba = ImageBuffer::from_pixel(1, 1, Rgba([0u8, 255, 0, 255]));
        let img = DynamicImage::ImageRgba8(rgba);
        assert_eq!(img.extent(), (1, 1));
        // DynamicImage has its own inherent `grayscale`.
        assert!((GrayscaleSource::grayscale(&img, 0, 0) - 0.587).abs() < 1e-6);
    }

    #[test]
    fn sixteen_bit_maps_keep_full_precision() {
        let luma16: ImageBuffer<Luma<u16>, Vec<u16>> =
            ImageBuffer::from_fn(2, 1, |x, _| Luma([if x == 0 { 100 } else { 200 }]));
        let img = DynamicImage::ImageLuma16(luma16);
        let low = GrayscaleSource::grayscale(&img, 0, 0);
        let high = GrayscaleSource::grayscale(&img, 1, 0);
        assert!(high > low);
        assert!((low - 100.0 / 65535.0).abs() < 1e-7);
        assert!((high - low - 100.0 / 65535.0).abs() < 1e-7);
    }

    #[test]
    fn float_maps_read_stored_values() {
        let rgb: ImageBuffer<Rgb<f32>, Vec<f32>> = ImageBuffer::from_pixel(1, 1, Rgb([0.25; 3]));
        let img = DynamicImage::ImageRgb32F(rgb);
        assert!((GrayscaleSource::grayscale(&img, 0, 0) - 0.25).abs() < 1e-6);
    }
}
