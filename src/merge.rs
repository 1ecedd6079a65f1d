use crate::error::MergeError;
use crate::models::{BoxSet, Rectangle};

/// Configuration for overlap merging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeConfig {
    /// Require a positive-area overlap. When false, boxes that only share an
    /// edge or a corner are merged as well.
    pub strict_overlap: bool,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            strict_overlap: true,
        }
    }
}

/// Counters describing one merge run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub input: usize,
    pub output: usize,
    /// Full passes over the working list, including the final unchanged one
    pub passes: usize,
    pub merges: usize,
}

/// Consolidates boxes into maximal, mutually non-overlapping regions.
///
/// Each output rectangle is the union of one overlap-connected cluster of the
/// input. Overlap is re-evaluated against grown boxes, so a union that newly
/// reaches a third box pulls it into the same cluster. The result does not
/// depend on the input order.
#[derive(Debug, Clone, Default)]
pub struct OverlapMerger {
    config: MergeConfig,
}

impl OverlapMerger {
    pub fn new(config: MergeConfig) -> Self {
        Self { config }
    }

    /// Whether two boxes belong together under the configured policy.
    /// Equal boxes always do, even when degenerate.
    pub fn overlaps(&self, a: &Rectangle, b: &Rectangle) -> bool {
        if a == b {
            return true;
        }
        if self.config.strict_overlap {
            a.intersects(b)
        } else {
            a.touches_or_intersects(b)
        }
    }

    pub fn merge(&self, boxes: &BoxSet) -> Result<BoxSet, MergeError> {
        self.merge_with_stats(boxes).map(|(merged, _)| merged)
    }

    /// Merge to a fixed point and report how much work it took.
    pub fn merge_with_stats(&self, boxes: &BoxSet) -> Result<(BoxSet, MergeStats), MergeError> {
        for (index, rect) in boxes.iter().enumerate() {
            if !rect.is_valid() {
                return Err(MergeError::InvalidRectangle { index, rect: *rect });
            }
        }

        let mut stats = MergeStats {
            input: boxes.len(),
            ..MergeStats::default()
        };
        let mut working: Vec<Rectangle> = boxes.iter().copied().collect();

        loop {
            let (next, merged) = self.pass(working);
            stats.passes += 1;
            stats.merges += merged;
            working = next;
            if merged == 0 {
                break;
            }
        }

        stats.output = working.len();
        Ok((BoxSet::from_rectangles(working), stats))
    }

    /// One pass: every box is folded into the first survivor it overlaps, or
    /// becomes a survivor itself. Returns the survivors and the merge count.
    fn pass(&self, boxes: Vec<Rectangle>) -> (Vec<Rectangle>, usize) {
        let mut survivors: Vec<Rectangle> = Vec::with_capacity(boxes.len());
        let mut merged = 0;

        for rect in boxes {
            match survivors.iter().position(|s| self.overlaps(s, &rect)) {
                Some(i) => {
                    survivors[i] = survivors[i].union(&rect);
                    merged += 1;
                }
                None => survivors.push(rect),
            }
        }

        (survivors, merged)
    }
}
