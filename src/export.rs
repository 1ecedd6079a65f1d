use anyhow::{Context, Result};
use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::models::Rectangle;

const OUTLINE_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const OUTLINE_THICKNESS: u32 = 2;

/// Size policy deciding which merged regions are worth exporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionFilter {
    pub min_width: i32,
    pub min_height: i32,
    /// Reject a region covering exactly the page area
    pub exclude_full_page: bool,
}

impl Default for RegionFilter {
    fn default() -> Self {
        Self {
            min_width: 50,
            min_height: 50,
            exclude_full_page: true,
        }
    }
}

/// Why a region was not exported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("no significant region found (box covers the whole page)")]
    FullPage,
    #[error("width too narrow ({width} < {min})")]
    TooNarrow { width: i32, min: i32 },
    #[error("height too short ({height} < {min})")]
    TooShort { height: i32, min: i32 },
}

impl RegionFilter {
    /// Checks run in order: full page, then width, then height.
    pub fn check(&self, rect: &Rectangle, page_width: u32, page_height: u32) -> Result<(), Rejection> {
        if self.exclude_full_page && rect.area() == page_width as i64 * page_height as i64 {
            return Err(Rejection::FullPage);
        }
        if rect.w < self.min_width {
            return Err(Rejection::TooNarrow {
                width: rect.w,
                min: self.min_width,
            });
        }
        if rect.h < self.min_height {
            return Err(Rejection::TooShort {
                height: rect.h,
                min: self.min_height,
            });
        }
        Ok(())
    }
}

/// Clip a rectangle to the page, returning `(x, y, width, height)` or `None`
/// when nothing of it lies on the page.
pub fn clip_to_page(rect: &Rectangle, page_width: u32, page_height: u32) -> Option<(u32, u32, u32, u32)> {
    let left = rect.x.max(0) as i64;
    let top = rect.y.max(0) as i64;
    let right = (rect.right() as i64).min(page_width as i64);
    let bottom = (rect.bottom() as i64).min(page_height as i64);
    if right <= left || bottom <= top {
        return None;
    }
    Some((
        left as u32,
        top as u32,
        (right - left) as u32,
        (bottom - top) as u32,
    ))
}

/// Crop a region out of the page
pub fn crop_region(page: &DynamicImage, rect: &Rectangle) -> Option<DynamicImage> {
    let (x, y, w, h) = clip_to_page(rect, page.width(), page.height())?;
    Some(page.crop_imm(x, y, w, h))
}

/// Copy of the page with a red outline drawn around every region
pub fn annotate(page: &DynamicImage, regions: &[Rectangle]) -> RgbImage {
    let mut canvas = page.to_rgb8();
    let (page_width, page_height) = canvas.dimensions();

    for rect in regions {
        let Some((x, y, w, h)) = clip_to_page(rect, page_width, page_height) else {
            continue;
        };
        for t in 0..OUTLINE_THICKNESS {
            let inner_w = w.saturating_sub(2 * t);
            let inner_h = h.saturating_sub(2 * t);
            if inner_w > 0 && inner_h > 0 {
                let outline = Rect::at((x + t) as i32, (y + t) as i32).of_size(inner_w, inner_h);
                draw_hollow_rect_mut(&mut canvas, outline, OUTLINE_COLOR);
            }
        }
    }

    canvas
}

/// Output file for the `index`-th (1-based) exported region of a page
pub fn region_file_name(page_name: &str, index: usize) -> String {
    format!("{}_roi-{}.png", page_name, index)
}

/// Summary of one page export
#[derive(Debug, Default)]
pub struct ExportReport {
    pub regions: Vec<PathBuf>,
    pub annotated: Option<PathBuf>,
}

/// Write each region as a cropped image and optionally the annotated page.
pub fn export_regions(
    page: &DynamicImage,
    page_name: &str,
    regions: &[Rectangle],
    output_dir: &Path,
    save_original: bool,
) -> Result<ExportReport> {
    let mut report = ExportReport::default();

    for rect in regions {
        let Some(roi) = crop_region(page, rect) else {
            debug!(?rect, "region lies outside {}, skipped", page_name);
            continue;
        };
        let path = output_dir.join(region_file_name(page_name, report.regions.len() + 1));
        roi.save(&path)
            .with_context(|| format!("Failed to save region {}", path.display()))?;
        debug!(?rect, "saved {}", path.display());
        report.regions.push(path);
    }

    if save_original {
        let path = output_dir.join(format!("{}_annotated.png", page_name));
        annotate(page, regions)
            .save(&path)
            .with_context(|| format!("Failed to save annotated page {}", path.display()))?;
        report.annotated = Some(path);
    }

    info!("{}: exported {} region(s)", page_name, report.regions.len());
    Ok(report)
}
