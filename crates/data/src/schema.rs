use serde::Deserialize;

pub use cropmatch_core::{CardRecord, DescriptionEntry, ImageRef, Rect, RoundConfig};

pub const CATALOG_FIELDS: usize = 7;
pub const DESCRIPTION_FIELDS: usize = 4;

/// One catalog row: `unitId,imagePath,variantId,cropX,cropY,cropWidth,cropHeight`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCardRow {
    pub unit_id: i64,
    pub image_path: String,
    pub variant_id: String,
    pub crop_x: f32,
    pub crop_y: f32,
    pub crop_width: f32,
    pub crop_height: f32,
}

impl RawCardRow {
    pub fn crop(&self) -> Rect {
        Rect::new(self.crop_x, self.crop_y, self.crop_width, self.crop_height)
    }
}

/// One album row: `uniqueId,description,videoUrl,videoTitle`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDescriptionRow {
    pub unique_id: String,
    pub description: String,
    pub video_url: String,
    pub video_title: String,
}

impl From<RawDescriptionRow> for DescriptionEntry {
    fn from(row: RawDescriptionRow) -> Self {
        Self {
            variant_id: row.unique_id,
            description: row.description,
            video_url: row.video_url,
            video_title: row.video_title,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    pub line: u64,
    pub reason: String,
}
