use image::{GrayImage, Luma, RgbImage};
use imageproc::integral_image::{integral_image, sum_image_pixels};

use super::Binarizer;

/// Per-axis weights of the 3×3 smoothing blur (binomial, sums to 4).
pub const BLUR_KERNEL: [u32; 3] = [1, 2, 1];

/// Side of the square neighbourhood used for the local mean. Must be odd.
pub const THRESHOLD_BLOCK_SIZE: u32 = 15;

/// A pixel is foreground when it is at least this much darker than its local mean.
pub const THRESHOLD_OFFSET: i32 = 8;

/// Parameters for the inverted local-mean threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThresholdParams {
    pub block_size: u32,
    pub offset: i32,
}

impl Default for ThresholdParams {
    fn default() -> Self {
        Self {
            block_size: THRESHOLD_BLOCK_SIZE,
            offset: THRESHOLD_OFFSET,
        }
    }
}

/// Grayscale → blur → inverted adaptive threshold.
#[derive(Clone, Copy, Debug, Default)]
pub struct AdaptiveBinarizer {
    params: ThresholdParams,
}

impl AdaptiveBinarizer {
    pub fn new(params: ThresholdParams) -> Self {
        Self { params }
    }
}

impl Binarizer for AdaptiveBinarizer {
    fn binarize(&self, image: &RgbImage) -> GrayImage {
        let gray = to_grayscale(image);
        let smoothed = blur_3x3(&gray);
        adaptive_threshold_mean_inv(&smoothed, &self.params)
    }
}

/// Converts an RGB image to 8-bit luma.
///
/// Uses BT.601 weights (0.299, 0.587, 0.114) in 14-bit fixed point, rounded.
pub fn to_grayscale(img: &RgbImage) -> GrayImage {
    let (width, height) = img.dimensions();
    let mut output = GrayImage::new(width, height);

    for (x, y, pixel) in img.enumerate_pixels() {
        let r = pixel[0] as u32;
        let g = pixel[1] as u32;
        let b = pixel[2] as u32;
        let luma = (r * 4899 + g * 9617 + b * 1868 + 8192) >> 14;
        output.put_pixel(x, y, Luma([luma as u8]));
    }

    output
}

/// Separable 3×3 Gaussian blur with reflect-101 borders.
pub fn blur_3x3(img: &GrayImage) -> GrayImage {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return img.clone();
    }

    let mut horizontal = vec![0u32; (width * height) as usize];
    for y in 0..height {
        for x in 0..width {
            let mut acc = 0;
            for (k, weight) in BLUR_KERNEL.iter().enumerate() {
                let sx = reflect_101(x as i64 + k as i64 - 1, width);
                acc += weight * img.get_pixel(sx, y)[0] as u32;
            }
            horizontal[(y * width + x) as usize] = acc;
        }
    }

    let norm: u32 = BLUR_KERNEL.iter().sum::<u32>().pow(2);
    let mut output = GrayImage::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let mut acc = 0;
            for (k, weight) in BLUR_KERNEL.iter().enumerate() {
                let sy = reflect_101(y as i64 + k as i64 - 1, height);
                acc += weight * horizontal[(sy * width + x) as usize];
            }
            let value = (acc + norm / 2) / norm;
            output.put_pixel(x, y, Luma([value as u8]));
        }
    }

    output
}

/// Inverted local-mean threshold.
///
/// The mean is taken over a `block_size` square with replicated borders and
/// rounded to 8 bits. Pixels with `pixel <= mean - offset` become 255, all
/// others 0, so dark print on a lighter cap ends up as foreground.
pub fn adaptive_threshold_mean_inv(img: &GrayImage, params: &ThresholdParams) -> GrayImage {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return img.clone();
    }

    let radius = params.block_size / 2;
    let span = 2 * radius;

    let padded = GrayImage::from_fn(width + span, height + span, |px, py| {
        let sx = clamp_index(px as i64 - radius as i64, width);
        let sy = clamp_index(py as i64 - radius as i64, height);
        *img.get_pixel(sx, sy)
    });
    let integral = integral_image::<_, u64>(&padded);

    let area = ((span + 1) * (span + 1)) as u64;
    let mut output = GrayImage::new(width, height);
    for (x, y, pixel) in img.enumerate_pixels() {
        let sum = sum_image_pixels(&integral, x, y, x + span, y + span)[0];
        let mean = ((sum + area / 2) / area) as i32;
        let value = if pixel[0] as i32 - mean <= -params.offset { 255 } else { 0 };
        output.put_pixel(x, y, Luma([value]));
    }

    output
}

fn reflect_101(i: i64, len: u32) -> u32 {
    if len == 1 {
        return 0;
    }
    let last = len as i64 - 1;
    let reflected = if i < 0 {
        -i
    } else if i > last {
        2 * last - i
    } else {
        i
    };
    reflected.clamp(0, last) as u32
}

fn clamp_index(i: i64, len: u32) -> u32 {
    i.clamp(0, len as i64 - 1) as u32
}
