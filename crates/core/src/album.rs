use crate::{Catalog, ImageRef, SessionRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const LOCKED_MESSAGE: &str = "Answer this card correctly in the game to view its details";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DescriptionEntry {
    pub variant_id: String,
    pub description: String,
    pub video_url: String,
    pub video_title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoLink {
    pub url: String,
    pub title: String,
}

impl VideoLink {
    pub fn confirm_prompt(&self) -> String {
        format!("Open \"{}\"?", self.title)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumEntry {
    pub variant_id: String,
    pub image: ImageRef,
    pub unlocked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlbumDetail {
    Locked(&'static str),
    /// Unlocked, but no description row exists for it.
    Missing,
    Unlocked {
        image: ImageRef,
        description: String,
        video: Option<VideoLink>,
    },
}

/// Gallery of every catalog card with its lock state. Read-only view over
/// the persisted unlocked set; it never touches round state.
#[derive(Debug, Clone, Default)]
pub struct Album {
    entries: Vec<AlbumEntry>,
    descriptions: HashMap<String, DescriptionEntry>,
}

impl Album {
    pub fn build(
        catalog: &Catalog,
        descriptions: impl IntoIterator<Item = DescriptionEntry>,
        record: &SessionRecord,
    ) -> Self {
        let entries = catalog
            .iter()
            .map(|card| AlbumEntry {
                variant_id: card.variant_id.clone(),
                image: card.image.clone(),
                unlocked: record.is_unlocked(&card.variant_id),
            })
            .collect();
        let descriptions = descriptions
            .into_iter()
            .map(|entry| (entry.variant_id.clone(), entry))
            .collect();
        Self {
            entries,
            descriptions,
        }
    }

    pub fn entries(&self) -> &[AlbumEntry] {
        &self.entries
    }

    pub fn unlocked_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.unlocked).count()
    }

    pub fn detail(&self, variant_id: &str) -> AlbumDetail {
        let Some(entry) = self
            .entries
            .iter()
            .find(|entry| entry.variant_id == variant_id)
        else {
            return AlbumDetail::Missing;
        };
        if !entry.unlocked {
            return AlbumDetail::Locked(LOCKED_MESSAGE);
        }
        match self.descriptions.get(variant_id) {
            Some(desc) => AlbumDetail::Unlocked {
                image: entry.image.clone(),
                description: desc.description.clone(),
                video: (!desc.video_url.trim().is_empty()).then(|| VideoLink {
                    url: desc.video_url.clone(),
                    title: desc.video_title.clone(),
                }),
            },
            None => AlbumDetail::Missing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CardRecord, Rect};

    fn setup() -> (Catalog, Vec<DescriptionEntry>, SessionRecord) {
        let catalog = Catalog::load(
            ["a", "b", "c"].iter().enumerate().map(|(group, id)| {
                CardRecord::new(
                    group as i64,
                    *id,
                    ImageRef::new(format!("units/{id}")),
                    Rect::default(),
                )
            }),
            None,
        )
        .expect("catalog");
        let descriptions = vec![
            DescriptionEntry {
                variant_id: "a".into(),
                description: "First unit".into(),
                video_url: "https://example.com/a".into(),
                video_title: "Unit A".into(),
            },
            DescriptionEntry {
                variant_id: "b".into(),
                description: "Second unit".into(),
                video_url: String::new(),
                video_title: String::new(),
            },
        ];
        let mut record = SessionRecord::default();
        record.unlocked_variant_ids.insert("a".into());
        record.unlocked_variant_ids.insert("c".into());
        (catalog, descriptions, record)
    }

    #[test]
    fn lock_state_follows_session_record() {
        let (catalog, descriptions, record) = setup();
        let album = Album::build(&catalog, descriptions, &record);
        let unlocked: Vec<_> = album.entries().iter().map(|e| e.unlocked).collect();
        assert_eq!(unlocked, vec![true, false, true]);
        assert_eq!(album.unlocked_count(), 2);
    }

    #[test]
    fn details_respect_locks_and_descriptions() {
        let (catalog, descriptions, record) = setup();
        let album = Album::build(&catalog, descriptions, &record);
        assert_eq!(album.detail("b"), AlbumDetail::Locked(LOCKED_MESSAGE));
        assert_eq!(album.detail("c"), AlbumDetail::Missing);
        match album.detail("a") {
            AlbumDetail::Unlocked {
                description, video, ..
            } => {
                assert_eq!(description, "First unit");
                let video = video.expect("video");
                assert_eq!(video.confirm_prompt(), "Open \"Unit A\"?");
            }
            other => panic!("unexpected detail: {other:?}"),
        }
    }
}
