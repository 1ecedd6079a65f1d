use anyhow::Result;
use image::DynamicImage;
use std::sync::Arc;
use tracing::debug;

use crate::detection::{contours, preprocessing};
use crate::export::{RegionFilter, crop_region};
use crate::merge::OverlapMerger;
use crate::models::{BoxSet, Rectangle};
use crate::pipeline::{MetadataValue, PipelineContext, PipelineData, PipelineStep};

/// Convert image to grayscale
pub struct GrayscaleStep;

impl PipelineStep for GrayscaleStep {
    fn process(&self, data: Vec<PipelineData>, _context: &PipelineContext) -> Result<Vec<PipelineData>> {
        Ok(data
            .into_iter()
            .map(|item| {
                let gray = preprocessing::to_grayscale(&item.image);
                PipelineData {
                    image: DynamicImage::ImageLuma8(gray),
                    ..item
                }
            })
            .collect())
    }

    fn name(&self) -> &str {
        "Grayscale Conversion"
    }
}

/// Binarize the page into a foreground mask
pub struct ForegroundMaskStep {
    pub config: preprocessing::PreprocessConfig,
}

impl PipelineStep for ForegroundMaskStep {
    fn process(&self, data: Vec<PipelineData>, _context: &PipelineContext) -> Result<Vec<PipelineData>> {
        Ok(data
            .into_iter()
            .map(|item| {
                let gray = item.image.to_luma8();
                let mask = preprocessing::foreground_mask(&gray, &self.config);
                PipelineData {
                    image: DynamicImage::ImageLuma8(mask),
                    ..item
                }
            })
            .collect())
    }

    fn name(&self) -> &str {
        "Foreground Mask"
    }
}

/// Find external contours in the mask - splits one page into many candidate regions
pub struct ContourDetectionStep {
    pub min_area: f64,
    /// Refuse pages producing more candidate boxes than this
    pub max_boxes: usize,
}

impl PipelineStep for ContourDetectionStep {
    fn process(&self, data: Vec<PipelineData>, _context: &PipelineContext) -> Result<Vec<PipelineData>> {
        let mut result = Vec::new();

        for item in data {
            let mask = item.image.to_luma8();
            let found = contours::find_external_contours(&mask, self.min_area);
            debug!("found {} contours above {} px²", found.len(), self.min_area);

            contours::ensure_box_limit(found.len(), self.max_boxes)?;

            for contour in found {
                let bbox = contour.bounding_rect();
                let Some(cropped) = crop_region(&item.original, &bbox) else {
                    continue;
                };
                let region = PipelineData::from_region(cropped, item.original.clone(), bbox)
                    .with_metadata("contour_area", MetadataValue::Float(contour.area));
                result.push(region);
            }
        }

        Ok(result)
    }

    fn name(&self) -> &str {
        "Contour Detection"
    }
}

/// Merge overlapping regions of a page - many fragments become fewer whole regions
pub struct MergeRegionsStep {
    pub merger: OverlapMerger,
}

impl PipelineStep for MergeRegionsStep {
    fn process(&self, data: Vec<PipelineData>, _context: &PipelineContext) -> Result<Vec<PipelineData>> {
        let Some(original) = data.first().map(|item| item.original.clone()) else {
            return Ok(Vec::new());
        };
        if data.iter().any(|item| !Arc::ptr_eq(&item.original, &original)) {
            anyhow::bail!("cannot merge regions from different pages");
        }

        let boxes: BoxSet = data.iter().filter_map(|item| item.bbox).collect();
        let (merged, stats) = self.merger.merge_with_stats(&boxes)?;
        debug!(
            input = stats.input,
            output = stats.output,
            passes = stats.passes,
            merges = stats.merges,
            "merged regions"
        );

        let mut result = Vec::with_capacity(merged.len());
        for rect in merged {
            let Some(cropped) = crop_region(&original, &rect) else {
                continue;
            };
            let members = boxes.iter().filter(|b| rect.contains(b)).count();
            result.push(
                PipelineData::from_region(cropped, original.clone(), rect)
                    .with_metadata("merged_from", MetadataValue::Int(members as i64)),
            );
        }

        Ok(result)
    }

    fn name(&self) -> &str {
        "Merge Regions"
    }
}

/// Drop regions rejected by the size policy
pub struct RegionFilterStep {
    pub filter: RegionFilter,
}

impl PipelineStep for RegionFilterStep {
    fn process(&self, data: Vec<PipelineData>, _context: &PipelineContext) -> Result<Vec<PipelineData>> {
        let mut result = Vec::new();

        for item in data {
            let rect: Rectangle = match item.bbox {
                Some(rect) => rect,
                None => Rectangle::new(0, 0, item.original.width() as i32, item.original.height() as i32),
            };
            match self.filter.check(&rect, item.original.width(), item.original.height()) {
                Ok(()) => result.push(item),
                Err(reason) => debug!(?rect, "region rejected: {}", reason),
            }
        }

        Ok(result)
    }

    fn name(&self) -> &str {
        "Region Filtering"
    }
}
