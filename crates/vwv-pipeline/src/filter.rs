//! Platform suitability filtering.
//!
//! Filtering happens after search and before download, so unsuitable
//! candidates cost nothing but the search that found them.

use tracing::debug;

use vwv_models::{CandidateAsset, MediaKind, Platform};

/// A video wider than `height * STRONGLY_HORIZONTAL_RATIO` is rejected
/// on vertical-preferred platforms. 16:9 (~1.78) is rejected; squarish
/// and portrait footage passes.
const STRONGLY_HORIZONTAL_RATIO: f64 = 1.5;

/// Whether a candidate is suitable for the target platform.
///
/// Only videos are ever rejected. Images crop acceptably to any aspect,
/// and music has no aspect at all. A video with unknown dimensions passes;
/// rejection requires positive evidence.
pub fn is_suitable(candidate: &CandidateAsset, platform: Platform) -> bool {
    if candidate.kind != MediaKind::Video || !platform.prefers_vertical() {
        return true;
    }

    match (candidate.width, candidate.height) {
        (Some(w), Some(h)) if h > 0 => {
            let suitable = (w as f64) <= (h as f64) * STRONGLY_HORIZONTAL_RATIO;
            if !suitable {
                debug!(
                    url = %candidate.source_url,
                    width = w,
                    height = h,
                    platform = %platform,
                    "Rejecting strongly horizontal video"
                );
            }
            suitable
        }
        _ => true,
    }
}
