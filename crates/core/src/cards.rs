use serde::{Deserialize, Serialize};
use std::fmt;

/// Crop rectangle, relative to the image's own placement.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_well_formed(&self) -> bool {
        let finite = [self.x, self.y, self.width, self.height]
            .iter()
            .all(|value| value.is_finite());
        finite && self.width >= 0.0 && self.height >= 0.0
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:.0},{:.0} {:.0}x{:.0})",
            self.x, self.y, self.width, self.height
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CardRecord {
    pub unit_group_id: i64,
    pub variant_id: String,
    pub image: ImageRef,
    pub crop: Rect,
}

impl CardRecord {
    pub fn new(
        unit_group_id: i64,
        variant_id: impl Into<String>,
        image: ImageRef,
        crop: Rect,
    ) -> Self {
        Self {
            unit_group_id,
            variant_id: variant_id.into(),
            image,
            crop,
        }
    }

    pub fn is_usable(&self) -> bool {
        !self.variant_id.trim().is_empty() && !self.image.is_empty() && self.crop.is_well_formed()
    }
}
