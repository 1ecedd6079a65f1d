pub mod detection;
pub mod error;
pub mod export;
pub mod input;
pub mod merge;
pub mod models;
pub mod pipeline;

pub use detection::{ExtractConfig, RegionDetector, build_extraction_pipeline};
pub use error::MergeError;
pub use export::{RegionFilter, Rejection, export_regions};
pub use merge::{MergeConfig, MergeStats, OverlapMerger};
pub use models::{BoxSet, Contour, Rectangle};
pub use pipeline::{MetadataValue, Pipeline, PipelineContext, PipelineData, PipelineStep};
