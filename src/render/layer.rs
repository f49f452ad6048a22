//! Layer records and the layer table
//!
//! A layer is an independently transformable off-screen surface. The
//! table owns every layer, keyed by a monotonically increasing id, and
//! iterates in ascending id order so later-created layers composite on
//! top of earlier ones.

use std::collections::BTreeMap;

use kurbo::{Size, Vec2};
use tiny_skia::{Pixmap, Transform};

/// Identifier of a layer. Ids start at 1 and are never reused; 0 is
/// reserved as "no layer" and never issued.
pub type LayerId = u32;

/// One off-screen surface with its two nested transforms.
///
/// The layer transform (`scale`, `offset`) maps layer-local pixels to
/// screen coordinates. The view transform (`view_scale`, `view_offset`)
/// maps a sub-region of the layer's own space, nested inside the layer
/// transform, for independent pan/zoom within the layer.
#[derive(Debug)]
pub(crate) struct Layer {
    pub id: LayerId,
    pub enabled: bool,
    pub scale: f64,
    pub offset: Vec2,
    pub view_scale: f64,
    pub view_offset: Vec2,
    pub surface: Pixmap,
}

impl Layer {
    /// Allocates a layer with an identity transform pair. Returns `None`
    /// when the backing surface cannot be allocated.
    fn new(id: LayerId, width: u32, height: u32) -> Option<Self> {
        // A fresh pixmap is zero-filled, which is already transparent.
        let surface = Pixmap::new(width, height)?;
        Some(Self {
            id,
            enabled: true,
            scale: 1.0,
            offset: Vec2::ZERO,
            view_scale: 1.0,
            view_offset: Vec2::ZERO,
            surface,
        })
    }

    /// Surface dimensions in pixels.
    pub fn size(&self) -> Size {
        Size::new(f64::from(self.surface.width()), f64::from(self.surface.height()))
    }

    /// Transform from view-space coordinates to surface pixels, applied
    /// to every shape drawn into this layer.
    pub fn view_transform(&self) -> Transform {
        Transform::from_translate(-self.view_offset.x as f32, -self.view_offset.y as f32)
            .post_scale(self.view_scale as f32, self.view_scale as f32)
    }

    /// Placement of this layer's surface on the window frame.
    ///
    /// Layer-local origin is bottom-left while the window origin is
    /// top-left, so the vertical axis is flipped during compositing.
    pub fn compose_transform(&self) -> Transform {
        let scale = self.scale as f32;
        let height = self.surface.height() as f32;
        Transform::from_row(
            scale,
            0.0,
            0.0,
            -scale,
            self.offset.x as f32,
            self.offset.y as f32 + height * scale,
        )
    }
}

/// Ordered table of all live layers plus the highest id ever issued.
#[derive(Debug, Default)]
pub(crate) struct LayerTable {
    entries: BTreeMap<LayerId, Layer>,
    highest_issued: LayerId,
}

impl LayerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a new layer one id above the highest ever issued. On
    /// allocation failure the table (and the id watermark) is unchanged.
    pub fn insert(&mut self, width: u32, height: u32) -> Option<LayerId> {
        let id = self.highest_issued + 1;
        let layer = Layer::new(id, width, height)?;
        self.entries.insert(id, layer);
        self.highest_issued = id;
        Some(id)
    }

    pub fn contains(&self, id: LayerId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn get(&self, id: LayerId) -> Option<&Layer> {
        self.entries.get(&id)
    }

    pub fn get_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.entries.get_mut(&id)
    }

    /// Layers in ascending id order; compositing order.
    pub fn iter_ascending(&self) -> impl Iterator<Item = &Layer> {
        self.entries.values()
    }
}
