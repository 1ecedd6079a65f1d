use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use roicut::{BoxSet, Rectangle};
use std::path::{Path, PathBuf};

pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const INK: Rgb<u8> = Rgb([30, 30, 30]);

/// Shorthand for building a BoxSet from `(x, y, w, h)` tuples.
pub fn boxes(rects: &[(i32, i32, i32, i32)]) -> BoxSet {
    rects
        .iter()
        .map(|&(x, y, w, h)| Rectangle::new(x, y, w, h))
        .collect()
}

/// White page with the given `(x, y, w, h)` blocks filled in dark ink.
pub fn page_with_blocks(width: u32, height: u32, blocks: &[(i32, i32, u32, u32)]) -> DynamicImage {
    let mut img = RgbImage::from_pixel(width, height, WHITE);
    for &(x, y, w, h) in blocks {
        draw_filled_rect_mut(&mut img, Rect::at(x, y).of_size(w, h), INK);
    }
    DynamicImage::ImageRgb8(img)
}

/// A 400x300 page holding:
/// - an L-shaped figure fragment with a separate block sitting in its corner
///   (two contours whose boxes overlap),
/// - a standalone figure on the right,
/// - a small speck and a thin text-like stroke, both expected to vanish.
pub fn sample_page() -> DynamicImage {
    page_with_blocks(
        400,
        300,
        &[
            // L shape: vertical bar and bottom bar
            (40, 40, 40, 160),
            (40, 160, 160, 40),
            // block inside the L's bounding box, well clear of it
            (110, 60, 70, 70),
            // standalone figure
            (260, 40, 100, 80),
            // speck
            (300, 250, 15, 15),
            // text stroke
            (220, 220, 150, 2),
        ],
    )
}

/// Save an image as PNG under `dir` and return its path.
pub fn save_page(dir: &Path, name: &str, img: &DynamicImage) -> PathBuf {
    let path = dir.join(name);
    img.save_with_format(&path, image::ImageFormat::Png)
        .expect("Failed to save test page");
    path
}
