//! List virtualization.
//!
//! Two pure functions bound how many rows a scrolling list materializes:
//! [`batch_profile`] is a static policy table read once per list mount, and
//! [`compute_window`] maps the current scroll position to the index range
//! that should be rendered. Windows are recomputed on every scroll event and
//! never cached.

use std::ops::RangeInclusive;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Coarse device performance class used to pick a batch profile.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DeviceClass {
    Low,
    #[default]
    Standard,
    High,
}

/// Incremental rendering parameters handed to the list surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProfile {
    /// Maximum rows rendered per incremental batch.
    pub max_to_render_per_batch: usize,
    /// Delay between incremental batches.
    pub update_cells_batching_period: Duration,
    /// Rows rendered on first mount.
    pub initial_num_to_render: usize,
    /// Rendered area, in viewport heights.
    pub window_size: usize,
}

/// Static batch policy for `device`.
pub fn batch_profile(device: DeviceClass) -> BatchProfile {
    match device {
        DeviceClass::Low => BatchProfile {
            max_to_render_per_batch: 5,
            update_cells_batching_period: Duration::from_millis(100),
            initial_num_to_render: 6,
            window_size: 5,
        },
        DeviceClass::Standard => BatchProfile {
            max_to_render_per_batch: 10,
            update_cells_batching_period: Duration::from_millis(50),
            initial_num_to_render: 10,
            window_size: 10,
        },
        DeviceClass::High => BatchProfile {
            max_to_render_per_batch: 20,
            update_cells_batching_period: Duration::from_millis(30),
            initial_num_to_render: 15,
            window_size: 21,
        },
    }
}

/// Inputs to [`compute_window`]. All distances are in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowParams {
    pub scroll_offset: f64,
    pub container_height: f64,
    pub item_height: f64,
    /// Extra rows materialized on each side of the visible range.
    pub overscan: usize,
    pub total_items: usize,
}

/// The contiguous index range a list should materialize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VirtualWindow {
    pub start_index: usize,
    /// Inclusive. Meaningless when `total_items == 0`; use [`indices`](Self::indices).
    pub end_index: usize,
    pub total_height: f64,
    /// Pixel offset of `start_index` from the top of the list.
    pub offset_y: f64,
    total_items: usize,
}

impl VirtualWindow {
    fn empty() -> Self {
        Self {
            start_index: 0,
            end_index: 0,
            total_height: 0.0,
            offset_y: 0.0,
            total_items: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_items == 0
    }

    /// Number of rows to materialize.
    pub fn len(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.end_index - self.start_index + 1
        }
    }

    /// Indices to render; empty for an empty list.
    #[allow(clippy::reversed_empty_ranges)]
    pub fn indices(&self) -> RangeInclusive<usize> {
        if self.is_empty() {
            return 1..=0;
        }
        self.start_index..=self.end_index
    }
}

/// Computes the visible-plus-overscan window for the current scroll position.
///
/// `start = max(0, floor(offset / h) - overscan)`,
/// `end = min(total - 1, ceil((offset + container) / h) + overscan)`.
pub fn compute_window(params: WindowParams) -> VirtualWindow {
    let WindowParams {
        scroll_offset,
        container_height,
        item_height,
        overscan,
        total_items,
    } = params;

    if total_items == 0 || !(item_height > 0.0) {
        return VirtualWindow::empty();
    }

    let scroll_offset = scroll_offset.max(0.0);
    let container_height = container_height.max(0.0);
    let last_index = total_items - 1;

    let first_visible = (scroll_offset / item_height).floor() as usize;
    let last_visible = ((scroll_offset + container_height) / item_height).ceil() as usize;

    let start_index = first_visible.saturating_sub(overscan).min(last_index);
    let end_index = last_visible.saturating_add(overscan).min(last_index);

    VirtualWindow {
        start_index,
        end_index,
        total_height: total_items as f64 * item_height,
        offset_y: start_index as f64 * item_height,
        total_items,
    }
}
