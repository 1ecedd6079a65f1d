pub mod contours;
pub mod preprocessing;
pub mod steps;

use anyhow::Result;
use image::DynamicImage;
use std::sync::Arc;
use tracing::debug;

use crate::export::RegionFilter;
use crate::merge::{MergeConfig, OverlapMerger};
use crate::models::{BoxSet, Rectangle};
use crate::pipeline::Pipeline;
use preprocessing::PreprocessConfig;

/// Parameters for extracting figure regions from a page
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    pub preprocess: PreprocessConfig,
    /// Contours must enclose strictly more than this many square pixels
    pub min_contour_area: f64,
    /// Upper bound on candidate boxes per page, guarding the cubic merge
    pub max_boxes: usize,
    pub merge: MergeConfig,
    pub filter: RegionFilter,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            preprocess: PreprocessConfig::default(),
            min_contour_area: 1500.0,
            max_boxes: 10_000,
            merge: MergeConfig::default(),
            filter: RegionFilter::default(),
        }
    }
}

/// Direct (non step-based) figure detection
pub struct RegionDetector {
    pub config: ExtractConfig,
}

impl RegionDetector {
    pub fn new(config: ExtractConfig) -> Self {
        Self { config }
    }

    /// Candidate boxes, one per qualifying external contour
    pub fn candidate_boxes(&self, img: &DynamicImage) -> Result<BoxSet> {
        let gray = preprocessing::to_grayscale(img);
        let mask = preprocessing::foreground_mask(&gray, &self.config.preprocess);
        let boxes = contours::contour_boxes(&mask, self.config.min_contour_area);
        contours::ensure_box_limit(boxes.len(), self.config.max_boxes)?;
        Ok(boxes)
    }

    /// Merged regions that pass the size policy
    pub fn detect(&self, img: &DynamicImage) -> Result<Vec<Rectangle>> {
        let candidates = self.candidate_boxes(img)?;
        let merged = OverlapMerger::new(self.config.merge).merge(&candidates)?;
        debug!("{} candidate boxes merged into {}", candidates.len(), merged.len());

        Ok(merged
            .into_iter()
            .filter(|rect| {
                self.config
                    .filter
                    .check(rect, img.width(), img.height())
                    .inspect_err(|reason| debug!(?rect, "region rejected: {}", reason))
                    .is_ok()
            })
            .collect())
    }
}

impl Default for RegionDetector {
    fn default() -> Self {
        Self::new(ExtractConfig::default())
    }
}

/// Build the standard extraction pipeline using the composable pipeline system
pub fn build_extraction_pipeline(config: &ExtractConfig) -> Pipeline {
    use steps::*;

    Pipeline::new()
        .add_step(Arc::new(GrayscaleStep))
        .add_step(Arc::new(ForegroundMaskStep {
            config: config.preprocess,
        }))
        .add_step(Arc::new(ContourDetectionStep {
            min_area: config.min_contour_area,
            max_boxes: config.max_boxes,
        }))
        .add_step(Arc::new(MergeRegionsStep {
            merger: OverlapMerger::new(config.merge),
        }))
        .add_step(Arc::new(RegionFilterStep {
            filter: config.filter,
        }))
}
