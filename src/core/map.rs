// src/core/map.rs
// Map metadata and the world <-> map <-> image coordinate conversions used by
// every overlay drawn on top of the map image.

use serde::{Deserialize, Serialize};

use super::geometry::{Point2D, Pose2D};

/// Map metadata snapshot, replaced wholesale on every map update
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapMetadata {
    /// Metres per cell
    pub resolution: f64,
    /// Width in cells
    pub width: f64,
    /// Height in cells
    pub height: f64,
    /// World pose of cell (0, 0)
    pub origin: Pose2D,
}

/// Pixel dimensions of a drawing surface or image
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    /// Width in pixels
    pub width: f64,
    /// Height in pixels
    pub height: f64,
}

impl Size {
    /// Size of `width` by `height` pixels
    pub fn new(width: f64, height: f64) -> Self {
        Size { width, height }
    }
}

/// Map state as seen by the console: latest metadata plus the canvas/image
/// sizes that determine the display scale.
#[derive(Debug, Default)]
pub struct MapView {
    metadata: Option<MapMetadata>,
    canvas: Size,
    image: Size,
    scale_factor: f64,
}

/// Conversions against a map that has received its metadata.
///
/// Only obtainable through [`MapView::frame`], so holding one proves the map is
/// ready.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapFrame {
    metadata: MapMetadata,
    scale_factor: f64,
}

impl MapView {
    /// View with no map yet
    pub fn new() -> Self {
        Self::default()
    }

    /// True once map metadata has been received
    pub fn is_ready(&self) -> bool {
        self.metadata.is_some()
    }

    /// Replace the metadata snapshot
    pub fn set_metadata(&mut self, metadata: MapMetadata) {
        log::info!(
            "Map metadata received: {}x{} cells at {} m/cell",
            metadata.width,
            metadata.height,
            metadata.resolution
        );
        self.metadata = Some(metadata);
    }

    /// Latest metadata, if any
    pub fn metadata(&self) -> Option<&MapMetadata> {
        self.metadata.as_ref()
    }

    /// Record a new canvas size and recompute the scale
    pub fn resize_canvas(&mut self, canvas: Size) {
        self.canvas = canvas;
        self.compute_scale_factor();
    }

    /// Record the decoded map image size and recompute the scale
    pub fn set_image_size(&mut self, image: Size) {
        self.image = image;
        self.compute_scale_factor();
    }

    /// Pixels of canvas per image pixel; 0 until both sizes are known
    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    /// Uniform scale that fits the whole image inside the canvas
    fn compute_scale_factor(&mut self) {
        if self.image.width <= 0.0 || self.image.height <= 0.0 {
            self.scale_factor = 0.0;
            return;
        }
        self.scale_factor = (self.canvas.width / self.image.width)
            .min(self.canvas.height / self.image.height);
        log::debug!("Map scale factor now {}", self.scale_factor);
    }

    /// Conversion frame, if the map is ready
    pub fn frame(&self) -> Option<MapFrame> {
        self.metadata.map(|metadata| MapFrame {
            metadata,
            scale_factor: self.scale_factor,
        })
    }
}

impl MapFrame {
    /// Build a frame directly from metadata and a display scale
    pub fn new(metadata: MapMetadata, scale_factor: f64) -> Self {
        MapFrame { metadata, scale_factor }
    }

    /// Display scale captured with the frame
    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    /// World (metres) to map (cells)
    pub fn world2map(&self, coord: Point2D) -> Point2D {
        let origin = &self.metadata.origin;
        Point2D {
            x: (coord.x - origin.x) / self.metadata.resolution,
            y: (coord.y - origin.y) / self.metadata.resolution,
        }
    }

    /// Map (cells) to world (metres)
    pub fn map2world(&self, coord: Point2D) -> Point2D {
        let origin = &self.metadata.origin;
        Point2D {
            x: coord.x * self.metadata.resolution + origin.x,
            y: coord.y * self.metadata.resolution + origin.y,
        }
    }

    /// Map (cells) to image pixels; image y grows downwards
    pub fn map2image(&self, coord: Point2D) -> Point2D {
        Point2D {
            x: coord.x * self.scale_factor,
            y: (self.metadata.height - coord.y) * self.scale_factor,
        }
    }

    /// Image pixels to map (cells)
    pub fn image2map(&self, coord: Point2D) -> Point2D {
        Point2D {
            x: coord.x / self.scale_factor,
            y: self.metadata.height - coord.y / self.scale_factor,
        }
    }

    /// World (metres) to image pixels
    pub fn world2image(&self, coord: Point2D) -> Point2D {
        self.map2image(self.world2map(coord))
    }

    /// Image pixels to world (metres)
    pub fn image2world(&self, coord: Point2D) -> Point2D {
        self.map2world(self.image2map(coord))
    }

    /// World pose to image pose, keeping the heading unchanged
    pub fn world_pose2image(&self, pose: &Pose2D) -> Pose2D {
        self.world2image(pose.position()).with_theta(pose.theta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> MapMetadata {
        MapMetadata {
            resolution: 0.05,
            width: 400.0,
            height: 200.0,
            origin: Pose2D::new(-10.0, -5.0, 0.0),
        }
    }

    #[test]
    fn not_ready_without_metadata() {
        let mut view = MapView::new();
        view.resize_canvas(Size::new(800.0, 600.0));
        assert!(!view.is_ready());
        assert!(view.frame().is_none());
    }

    #[test]
    fn scale_preserves_aspect_ratio() {
        let mut view = MapView::new();
        view.set_metadata(metadata());
        view.set_image_size(Size::new(400.0, 200.0));
        view.resize_canvas(Size::new(800.0, 800.0));
        assert_eq!(view.scale_factor(), 2.0);
        view.resize_canvas(Size::new(200.0, 800.0));
        assert_eq!(view.scale_factor(), 0.5);
    }

    #[test]
    fn origin_maps_to_bottom_left_of_image() {
        let frame = MapFrame::new(metadata(), 2.0);
        let image = frame.world2image(Point2D::new(-10.0, -5.0));
        assert_eq!(image, Point2D::new(0.0, 400.0));
    }
}
