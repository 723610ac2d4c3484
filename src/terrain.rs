//! Platform availability along the world's x axis.
//!
//! The elevated platform is painted into a horizontally repeating background. A fixed band
//! of background columns has no platform; this module maps world positions into background
//! columns and answers whether the platform exists there.

use bevy_ecs::resource::Resource;
use serde::Deserialize;

use crate::constants::world::{GROUND_OFFSET_BASE, PLATFORM_GAP_END, PLATFORM_GAP_START};
use crate::error::LayoutError;

/// Pixel dimensions of the repeating background and the height it is scaled to.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct BackgroundLayout {
    pub width: f32,
    pub height: f32,
    pub reference_height: f32,
}

impl BackgroundLayout {
    pub fn new(width: f32, height: f32, reference_height: f32) -> Result<Self, LayoutError> {
        if !(width > 0.0 && height > 0.0) {
            return Err(LayoutError::NonPositiveDimensions { width, height });
        }
        if !(reference_height > 0.0) {
            return Err(LayoutError::NonPositiveReference(reference_height));
        }
        Ok(Self {
            width,
            height,
            reference_height,
        })
    }

    /// World units per background pixel.
    pub fn scale(&self) -> f32 {
        self.reference_height / self.height
    }

    /// Maps a world x coordinate onto a background column in `[0, width)`.
    ///
    /// Returns `None` when the layout is degenerate (non-positive or non-finite width or scale),
    /// in which case no periodic mapping exists.
    pub fn column_at(&self, world_x: f32) -> Option<f32> {
        let scale = self.scale();
        if !(self.width > 0.0 && self.width.is_finite() && scale > 0.0 && scale.is_finite()) {
            return None;
        }
        Some((world_x / scale).rem_euclid(self.width))
    }
}

/// Inclusive band of background columns without a platform.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PlatformGap {
    pub start: f32,
    pub end: f32,
}

impl PlatformGap {
    pub fn new(start: f32, end: f32) -> Result<Self, LayoutError> {
        if end < start {
            return Err(LayoutError::InvertedGap { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, column: f32) -> bool {
        column >= self.start && column <= self.end
    }
}

impl Default for PlatformGap {
    fn default() -> Self {
        Self {
            start: PLATFORM_GAP_START,
            end: PLATFORM_GAP_END,
        }
    }
}

/// Read-only terrain query shared by the player, enemy and spawner systems.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct Terrain {
    layout: Option<BackgroundLayout>,
    gap: PlatformGap,
}

impl Terrain {
    pub fn new(layout: Option<BackgroundLayout>, gap: PlatformGap) -> Self {
        Self { layout, gap }
    }

    /// Whether the elevated platform exists above `world_x`.
    ///
    /// Without a layout, or with a degenerate one, the platform is always available.
    pub fn platform_available_at(&self, world_x: f32) -> bool {
        match self.layout.as_ref().and_then(|layout| layout.column_at(world_x)) {
            Some(column) => !self.gap.contains(column),
            None => true,
        }
    }

    /// On-screen distance of the ground line from the top of the view.
    pub fn ground_offset(&self) -> f32 {
        let scale = self
            .layout
            .map(|layout| layout.scale())
            .filter(|scale| scale.is_finite() && *scale > 0.0)
            .unwrap_or(1.0);
        GROUND_OFFSET_BASE * scale
    }
}
