use crate::CardRecord;
use std::collections::{BTreeSet, HashSet};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("catalog empty: no usable card records")]
    Empty,
    #[error("catalog empty: no usable record for variant {0}")]
    TargetNotFound(String),
}

/// Ordered, read-only set of card records keyed by variant id.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<CardRecord>,
}

impl Catalog {
    /// Builds a catalog from loaded records. With a target variant only the
    /// first usable match is kept.
    pub fn load<I>(records: I, target_variant_id: Option<&str>) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = CardRecord>,
    {
        if let Some(target) = target_variant_id {
            let found = records
                .into_iter()
                .find(|record| record.variant_id == target && record.is_usable());
            return match found {
                Some(record) => {
                    tracing::debug!(variant = target, "catalog filtered to a single record");
                    Ok(Self {
                        records: vec![record],
                    })
                }
                None => Err(CatalogError::TargetNotFound(target.to_string())),
            };
        }

        let mut seen = HashSet::new();
        let mut kept = Vec::new();
        for record in records {
            if !record.is_usable() {
                tracing::warn!(
                    variant = %record.variant_id,
                    image = %record.image,
                    "skipping unusable card record"
                );
                continue;
            }
            if !seen.insert(record.variant_id.clone()) {
                tracing::warn!(variant = %record.variant_id, "skipping duplicate variant id");
                continue;
            }
            kept.push(record);
        }
        if kept.is_empty() {
            return Err(CatalogError::Empty);
        }
        tracing::debug!(records = kept.len(), "catalog loaded");
        Ok(Self { records: kept })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CardRecord> {
        self.records.get(index)
    }

    pub fn find(&self, variant_id: &str) -> Option<&CardRecord> {
        self.records
            .iter()
            .find(|record| record.variant_id == variant_id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CardRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[CardRecord] {
        &self.records
    }

    pub fn records_in_group(&self, group_id: i64) -> impl Iterator<Item = &CardRecord> + '_ {
        self.records
            .iter()
            .filter(move |record| record.unit_group_id == group_id)
    }

    pub fn group_count(&self) -> usize {
        self.records
            .iter()
            .map(|record| record.unit_group_id)
            .collect::<BTreeSet<_>>()
            .len()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a CardRecord;
    type IntoIter = std::slice::Iter<'a, CardRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ImageRef, Rect};

    fn record(group: i64, variant: &str) -> CardRecord {
        CardRecord::new(
            group,
            variant,
            ImageRef::new(format!("units/{variant}")),
            Rect::new(0.0, 0.0, 32.0, 32.0),
        )
    }

    #[test]
    fn keeps_catalog_order_and_groups() {
        let catalog = Catalog::load(
            vec![record(1, "a1"), record(2, "b1"), record(1, "a2")],
            None,
        )
        .expect("catalog");
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.group_count(), 2);
        let group: Vec<_> = catalog
            .records_in_group(1)
            .map(|record| record.variant_id.as_str())
            .collect();
        assert_eq!(group, vec!["a1", "a2"]);
        assert!(catalog.records_in_group(9).next().is_none());
    }

    #[test]
    fn target_keeps_first_match_only() {
        let mut duplicate = record(3, "a1");
        duplicate.crop = Rect::new(5.0, 5.0, 1.0, 1.0);
        let catalog = Catalog::load(
            vec![record(1, "a1"), duplicate, record(2, "b1")],
            Some("a1"),
        )
        .expect("catalog");
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(0).map(|r| r.unit_group_id), Some(1));
    }

    #[test]
    fn missing_target_is_reported() {
        let err = Catalog::load(vec![record(1, "a1")], Some("zz")).unwrap_err();
        assert_eq!(err, CatalogError::TargetNotFound("zz".to_string()));
    }

    #[test]
    fn skips_unusable_and_duplicate_records() {
        let mut broken = record(2, "b1");
        broken.image = ImageRef::new("");
        let catalog = Catalog::load(vec![record(1, "a1"), broken, record(1, "a1")], None)
            .expect("catalog");
        assert_eq!(catalog.len(), 1);
        assert!(catalog.find("b1").is_none());
    }

    #[test]
    fn empty_input_is_an_error() {
        assert_eq!(
            Catalog::load(Vec::new(), None).unwrap_err(),
            CatalogError::Empty
        );
        let mut broken = record(1, "a1");
        broken.crop.width = f32::NAN;
        assert_eq!(
            Catalog::load(vec![broken], None).unwrap_err(),
            CatalogError::Empty
        );
    }
}
