use image::{DynamicImage, GrayImage, imageops};
use imageproc::contrast::{ThresholdType, threshold};
use imageproc::distance_transform::Norm;
use imageproc::morphology::{close, dilate, erode, open};

/// Parameters for page binarization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreprocessConfig {
    /// Half-size of the square structuring element (2 gives a 5x5 kernel)
    pub kernel_radius: u8,
    pub dilate_iterations: u32,
    pub erode_iterations: u32,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            kernel_radius: 2,
            dilate_iterations: 1,
            erode_iterations: 2,
        }
    }
}

/// Convert image to grayscale
pub fn to_grayscale(img: &DynamicImage) -> GrayImage {
    img.to_luma8()
}

/// Pixels that are pure white in the grayscale page.
pub fn white_mask(gray: &GrayImage) -> GrayImage {
    threshold(gray, u8::MAX - 1, ThresholdType::Binary)
}

/// Binary mask of non-background content, white on black.
///
/// Dilating the page wipes out thin dark strokes such as text, eroding twice
/// grows the surviving dark areas back. Anything not pure white afterwards is
/// foreground, which is then closed and opened to fill holes and drop specks.
/// Flat morphology commutes with thresholding, so the grayscale steps are run
/// on the white mask directly.
pub fn foreground_mask(gray: &GrayImage, config: &PreprocessConfig) -> GrayImage {
    let k = config.kernel_radius;
    let mut white = white_mask(gray);

    for _ in 0..config.dilate_iterations {
        white = dilate(&white, Norm::LInf, k);
    }
    for _ in 0..config.erode_iterations {
        white = erode(&white, Norm::LInf, k);
    }

    imageops::invert(&mut white);
    let closed = close(&white, Norm::LInf, k);
    open(&closed, Norm::LInf, k)
}
