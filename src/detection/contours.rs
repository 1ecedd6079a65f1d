use anyhow::Result;
use image::{GrayImage, imageops};
use imageproc::contours::{BorderType, find_contours};
use imageproc::point::Point;

use crate::models::{BoxSet, Contour};

/// Find the outermost contours of a binary mask (white = foreground) whose
/// enclosed area is strictly greater than `min_area`. Contours nested inside a
/// hole of another blob are skipped. Everything outside the mask counts as
/// background, so blobs touching the page edge are found too.
pub fn find_external_contours(mask: &GrayImage, min_area: f64) -> Vec<Contour> {
    // find_contours ignores blobs touching the image border
    let mut padded = GrayImage::new(mask.width() + 2, mask.height() + 2);
    imageops::replace(&mut padded, mask, 1, 1);

    find_contours::<u32>(&padded)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .filter_map(|c| {
            let first = c.points.first()?;
            let (mut min_x, mut min_y) = (first.x, first.y);
            let (mut max_x, mut max_y) = (first.x, first.y);
            for p in &c.points {
                min_x = min_x.min(p.x);
                min_y = min_y.min(p.y);
                max_x = max_x.max(p.x);
                max_y = max_y.max(p.y);
            }
            Some(Contour {
                min_x: min_x - 1,
                min_y: min_y - 1,
                max_x: max_x - 1,
                max_y: max_y - 1,
                area: polygon_area(&c.points),
            })
        })
        .filter(|c| c.area > min_area)
        .collect()
}

/// Bounding boxes of the qualifying external contours.
pub fn contour_boxes(mask: &GrayImage, min_area: f64) -> BoxSet {
    find_external_contours(mask, min_area)
        .iter()
        .map(Contour::bounding_rect)
        .collect()
}

/// Fail when a page yields more candidate boxes than `max_boxes`.
pub fn ensure_box_limit(count: usize, max_boxes: usize) -> Result<()> {
    anyhow::ensure!(
        count <= max_boxes,
        "page produced {} candidate boxes, more than the limit of {}",
        count,
        max_boxes
    );
    Ok(())
}

/// Shoelace area of a closed polygon.
pub fn polygon_area(points: &[Point<u32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut twice_area = 0.0;
    for (i, a) in points.iter().enumerate() {
        let b = &points[(i + 1) % points.len()];
        twice_area += a.x as f64 * b.y as f64 - b.x as f64 * a.y as f64;
    }
    (twice_area / 2.0).abs()
}
