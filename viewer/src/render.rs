//! What gets handed to a renderer, and where the pictures live.

use crate::controller::ViewConfig;
use crate::error::ViewerError;
use crate::projection::{Layer, Projection};

use euclid::default::Point2D;
use simulator::bodies::Body;
use std::path::{Path, PathBuf};

pub const TITLE: &str = "Galilean Moons";
/// Width and height of the cloud overlay, in AU
pub const CLOUD_SIZE: f64 = 0.0555;
pub const CLOUD_IMAGE: &str = "clouds.jpeg";
/// Interactive controls a dashboard view has switched off.
pub const DISABLED_CONTROLS: [&str; 9] = [
    "zoom2d",
    "pan",
    "lasso",
    "select",
    "zoomout",
    "zoomin",
    "autoscale",
    "resetScale",
    "displaylogo",
];

/// Image file and displayed size (AU) for each body, in system order.
const SPRITES: [(&str, f64); 5] = [
    ("Jupiter.png", 0.000955 * 2.0),
    ("io.png", 0.000245),
    ("europa.png", 0.00021),
    ("ganymede.png", 0.00035),
    ("callisto.png", 0.00032),
];

/// Anything that can put a frame in front of the user.
pub trait Renderer {
    /// Failures should be `ViewerError::RenderFault`.
    fn render(&mut self, frame: &Frame) -> Result<(), ViewerError>;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Background {
    Black,
    White,
}

impl Background {
    /// 0xRRGGBB
    pub fn rgb(&self) -> u32 {
        match self {
            Background::Black => 0x000000,
            Background::White => 0xffffff,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Background::Black => "black",
            Background::White => "white",
        }
    }
}

/// A plain dot for one body.
#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
    pub label: String,
    pub hover: String,
    pub position: Point2D<f64>,
    pub layer: Layer,
    /// Markers with a higher order go on top
    pub order: u8,
    /// 0xRRGGBB
    pub color: u32,
    /// 0xRRGGBB
    pub outline: u32,
}

/// An image centered on a point, in plot units.
#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    pub image: PathBuf,
    pub anchor: Point2D<f64>,
    pub size: f64,
}

/// Everything needed to draw one state of the system.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub title: &'static str,
    pub time_label: String,
    /// In system order, primary first
    pub markers: Vec<Marker>,
    /// Bottom to top
    pub sprites: Vec<Sprite>,
    /// Drawn over everything
    pub overlay: Option<Sprite>,
    /// Both axes run from -half_range to half_range
    pub half_range: f64,
    pub background: Background,
    /// Something the user should know, like images that couldn't be shown
    pub notice: Option<String>,
    pub show_axes: bool,
    pub disabled_controls: &'static [&'static str],
}

impl Frame {
    /// Lay out a projection. Without `assets` the frame has markers only.
    pub fn compose(
        projection: &Projection,
        bodies: &[Body],
        view: &ViewConfig,
        assets: Option<&AssetStore>,
        show_cloud: bool,
    ) -> Frame {
        let markers = projection
            .bodies()
            .iter()
            .zip(bodies.iter())
            .map(|(projected, body)| Marker {
                label: projected.name.clone(),
                hover: match projected.distance {
                    Some(distance) => {
                        format!("{}, the distance is {} Dj", projected.name, distance)
                    }
                    None => projected.name.clone(),
                },
                position: projected.position,
                layer: projected.layer,
                order: projected.marker_order(),
                color: body.color,
                outline: body.outline,
            })
            .collect();

        let (sprites, overlay) = match assets {
            Some(assets) => (
                projection
                    .draw_order()
                    .into_iter()
                    .filter_map(|projected| {
                        let (image, size) = assets.sprite(projected.index)?;
                        Some(Sprite {
                            image,
                            anchor: projected.position,
                            size,
                        })
                    })
                    .collect(),
                if show_cloud {
                    Some(assets.cloud_sprite(projection.primary().position))
                } else {
                    None
                },
            ),
            None => (Vec::new(), None),
        };

        Frame {
            title: TITLE,
            time_label: view.time_label(),
            markers,
            sprites,
            overlay,
            half_range: view.half_range(),
            background: view.background,
            notice: None,
            show_axes: false,
            disabled_controls: &DISABLED_CONTROLS,
        }
    }

    /// The same frame with every image dropped.
    pub fn markers_only(&self) -> Frame {
        Frame {
            sprites: Vec::new(),
            overlay: None,
            ..self.clone()
        }
    }

    pub fn has_images(&self) -> bool {
        !self.sprites.is_empty() || self.overlay.is_some()
    }

    /// Markers bottom to top.
    pub fn stacked_markers(&self) -> Vec<&Marker> {
        let mut markers: Vec<&Marker> = self.markers.iter().collect();
        markers.sort_by_key(|marker| marker.order);
        markers
    }
}

/// The directory holding the body images and the cloud.
#[derive(Clone, Debug, PartialEq)]
pub struct AssetStore {
    dir: PathBuf,
}

impl AssetStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Image path and size for body `index`.
    pub fn sprite(&self, index: usize) -> Option<(PathBuf, f64)> {
        SPRITES
            .get(index)
            .map(|(file, size)| (self.dir.join(file), *size))
    }

    pub fn cloud(&self) -> PathBuf {
        self.dir.join(CLOUD_IMAGE)
    }

    /// The cloud overlay, centered on `anchor`.
    pub fn cloud_sprite(&self, anchor: Point2D<f64>) -> Sprite {
        Sprite {
            image: self.cloud(),
            anchor,
            size: CLOUD_SIZE,
        }
    }

    /// Every image path, bodies first.
    pub fn all(&self) -> Vec<PathBuf> {
        SPRITES
            .iter()
            .map(|(file, _)| self.dir.join(file))
            .chain(std::iter::once(self.cloud()))
            .collect()
    }

    /// Check that every image is there.
    pub fn verify(&self) -> Result<(), ViewerError> {
        let missing: Vec<String> = self
            .all()
            .into_iter()
            .filter(|path| !path.is_file())
            .map(|path| path.display().to_string())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ViewerError::RenderFault(format!(
                "missing images: {}",
                missing.join(", ")
            )))
        }
    }
}
