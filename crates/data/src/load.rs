use crate::images::ImageResolver;
use crate::schema::{
    RawCardRow, RawDescriptionRow, SkippedRow, CATALOG_FIELDS, DESCRIPTION_FIELDS,
};
use anyhow::Context;
use cropmatch_core::{CardRecord, Catalog, DescriptionEntry, RoundConfig};
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::de::DeserializeOwned;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

pub const CATALOG_FILE: &str = "unit_data.csv";
pub const DESCRIPTIONS_FILE: &str = "description_data.csv";
pub const ROUND_CONFIG_FILE: &str = "round.json";

#[derive(Debug, Clone, Default)]
pub struct CatalogLoadReport {
    pub records: Vec<CardRecord>,
    pub skipped: Vec<SkippedRow>,
}

/// Parses catalog rows. Bad rows are skipped and reported, never fatal.
pub fn parse_catalog<R: Read>(reader: R, images: &dyn ImageResolver) -> CatalogLoadReport {
    let mut report = CatalogLoadReport::default();
    for_each_row(reader, CATALOG_FIELDS, &mut report.skipped, |row: RawCardRow| {
        let Some(image) = images.resolve(&row.image_path) else {
            return Err(format!("unresolvable image {}", row.image_path.trim()));
        };
        report.records.push(CardRecord::new(
            row.unit_id,
            row.variant_id.trim(),
            image,
            row.crop(),
        ));
        Ok(())
    });
    report
}

pub fn parse_descriptions<R: Read>(reader: R) -> (Vec<DescriptionEntry>, Vec<SkippedRow>) {
    let mut entries = Vec::new();
    let mut skipped = Vec::new();
    for_each_row(reader, DESCRIPTION_FIELDS, &mut skipped, |row: RawDescriptionRow| {
        entries.push(row.into());
        Ok(())
    });
    (entries, skipped)
}

fn for_each_row<R, T, F>(reader: R, fields: usize, skipped: &mut Vec<SkippedRow>, mut accept: F)
where
    R: Read,
    T: DeserializeOwned,
    F: FnMut(T) -> Result<(), String>,
{
    let mut rows = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);
    let mut row = StringRecord::new();
    loop {
        let line = rows.position().line();
        match rows.read_record(&mut row) {
            Ok(false) => break,
            Ok(true) => {}
            Err(err) => {
                let fatal = err.is_io_error();
                skip(skipped, line, err.to_string());
                if fatal {
                    break;
                }
                continue;
            }
        }
        let line = row.position().map(|pos| pos.line()).unwrap_or(line);
        if row.iter().all(|field| field.is_empty()) {
            continue;
        }
        if row.len() < fields {
            skip(
                skipped,
                line,
                format!("expected {fields} fields, found {}", row.len()),
            );
            continue;
        }
        let head: StringRecord = row.iter().take(fields).collect();
        let parsed = match head.deserialize::<T>(None) {
            Ok(parsed) => parsed,
            Err(err) => {
                skip(skipped, line, err.to_string());
                continue;
            }
        };
        if let Err(reason) = accept(parsed) {
            skip(skipped, line, reason);
        }
    }
}

fn skip(skipped: &mut Vec<SkippedRow>, line: u64, reason: String) {
    tracing::warn!(line, %reason, "skipping row");
    skipped.push(SkippedRow { line, reason });
}

pub fn load_catalog(
    path: &Path,
    images: &dyn ImageResolver,
    target_variant_id: Option<&str>,
) -> anyhow::Result<(Catalog, Vec<SkippedRow>)> {
    let file = File::open(path).with_context(|| format!("read {}", path.display()))?;
    let report = parse_catalog(file, images);
    let catalog = Catalog::load(report.records, target_variant_id)
        .with_context(|| format!("load catalog {}", path.display()))?;
    tracing::info!(
        cards = catalog.len(),
        groups = catalog.group_count(),
        skipped = report.skipped.len(),
        "catalog ready"
    );
    Ok((catalog, report.skipped))
}

/// Album descriptions are optional; a missing file yields none.
pub fn load_descriptions(path: &Path) -> anyhow::Result<Vec<DescriptionEntry>> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no description data");
        return Ok(Vec::new());
    }
    let file = File::open(path).with_context(|| format!("read {}", path.display()))?;
    let (entries, _) = parse_descriptions(file);
    Ok(entries)
}

pub fn load_round_config(dir: &Path) -> anyhow::Result<RoundConfig> {
    let path = dir.join(ROUND_CONFIG_FILE);
    let config: RoundConfig = if path.exists() {
        load_json(&path)?
    } else {
        RoundConfig::default()
    };
    config
        .validate()
        .with_context(|| format!("validate {}", path.display()))?;
    Ok(config)
}

fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> anyhow::Result<T> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value = serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::images::KnownImages;
    use cropmatch_core::Rect;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    const CATALOG: &str = "\
unitId,imagePath,variantId,cropX,cropY,cropWidth,cropHeight
1,units/knight,knight_a,0,0,120,80
1,units/knight_alt,knight_b,10.5,4,120,80
2,units/archer,archer_a,0,0,64
3,units/mage,mage_a,x,0,64,64
4,units/missing,ghost_a,0,0,64,64
five,units/mage,mage_b,0,0,64,64
5,units/mage,mage_c,1,2,3,4,extra

";

    fn images() -> KnownImages {
        KnownImages::new([
            "units/knight",
            "units/knight_alt",
            "units/archer",
            "units/mage",
        ])
    }

    fn unique_temp_dir() -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!(
            "cropmatch_data_test_{}_{}",
            std::process::id(),
            nanos
        ));
        fs::create_dir_all(&dir).expect("mkdir");
        dir
    }

    #[test]
    fn skips_bad_rows_and_keeps_good_ones() {
        let report = parse_catalog(CATALOG.as_bytes(), &images());
        let ids: Vec<_> = report
            .records
            .iter()
            .map(|record| record.variant_id.as_str())
            .collect();
        assert_eq!(ids, vec!["knight_a", "knight_b", "mage_c"]);
        assert_eq!(report.records[1].crop, Rect::new(10.5, 4.0, 120.0, 80.0));
        assert_eq!(report.records[2].unit_group_id, 5);

        let lines: Vec<_> = report.skipped.iter().map(|row| row.line).collect();
        assert_eq!(lines, vec![4, 5, 6, 7]);
        assert!(report.skipped[0].reason.contains("expected 7 fields"));
        assert!(report.skipped[2].reason.contains("unresolvable image"));
    }

    #[test]
    fn header_only_yields_nothing() {
        let report = parse_catalog(
            "unitId,imagePath,variantId,cropX,cropY,cropWidth,cropHeight\n".as_bytes(),
            &images(),
        );
        assert!(report.records.is_empty());
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn load_catalog_reports_empty_catalog() {
        let dir = unique_temp_dir();
        let path = dir.join(CATALOG_FILE);
        fs::write(
            &path,
            "unitId,imagePath,variantId,cropX,cropY,cropWidth,cropHeight\n9,nowhere,a,0,0,1,1\n",
        )
        .expect("write");
        let err = load_catalog(&path, &images(), None).unwrap_err();
        assert!(format!("{err:#}").contains("catalog empty"));
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn load_catalog_with_target_keeps_one_record() {
        let dir = unique_temp_dir();
        let path = dir.join(CATALOG_FILE);
        fs::write(&path, CATALOG).expect("write");
        let (catalog, skipped) = load_catalog(&path, &images(), Some("knight_b")).expect("load");
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(0).map(|r| r.variant_id.as_str()), Some("knight_b"));
        assert_eq!(skipped.len(), 4);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn parses_descriptions() {
        let body = "\
uniqueId,description,videoUrl,videoTitle
knight_a,A sturdy knight,https://example.com/k,Knight intro
archer_a,Too short
";
        let (entries, skipped) = parse_descriptions(body.as_bytes());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].variant_id, "knight_a");
        assert_eq!(entries[0].video_title, "Knight intro");
        assert_eq!(skipped.len(), 1);
    }

    #[test]
    fn missing_description_file_is_empty() {
        let dir = unique_temp_dir();
        let entries = load_descriptions(&dir.join(DESCRIPTIONS_FILE)).expect("load");
        assert!(entries.is_empty());
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn round_config_defaults_and_overrides() {
        let dir = unique_temp_dir();
        assert_eq!(load_round_config(&dir).expect("default"), RoundConfig::default());

        fs::write(dir.join(ROUND_CONFIG_FILE), r#"{"hand_size": 3, "time_limit": 30}"#)
            .expect("write");
        let config = load_round_config(&dir).expect("config");
        assert_eq!(config.hand_size, 3);
        assert_eq!(config.time_limit, 30.0);
        assert_eq!(config.session_rounds, 10);

        fs::write(dir.join(ROUND_CONFIG_FILE), r#"{"session_rounds": 0}"#).expect("write");
        assert!(load_round_config(&dir).is_err());
        let _ = fs::remove_dir_all(dir);
    }
}
