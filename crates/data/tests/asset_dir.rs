use cropmatch_core::{Album, AlbumDetail, InputEvent, MemoryStore, Phase, RoundEngine, Session};
use cropmatch_data::{
    load_catalog, load_descriptions, load_round_config, AssetDirResolver, ImageResolver,
    CATALOG_FILE, DESCRIPTIONS_FILE, ROUND_CONFIG_FILE,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

fn unique_temp_dir() -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!(
        "cropmatch_asset_dir_test_{}_{}",
        std::process::id(),
        nanos
    ));
    fs::create_dir_all(dir.join("units")).expect("mkdir");
    dir
}

fn write_assets(dir: &Path) {
    for name in ["knight.png", "knight_alt.png", "archer.jpg", "mage.png", "rogue.png"] {
        fs::write(dir.join("units").join(name), b"").expect("image");
    }
    fs::write(
        dir.join(CATALOG_FILE),
        "\
unitId,imagePath,variantId,cropX,cropY,cropWidth,cropHeight
1,units/knight,knight_a,0,0,120,80
1,units/knight_alt,knight_b,8,8,64,64
2,units/archer,archer_a,0,0,64,64
3,units/mage,mage_a,4,4,32,32
4,units/rogue,rogue_a,0,0,48,48
5,units/dragon,dragon_a,0,0,48,48
",
    )
    .expect("catalog");
    fs::write(
        dir.join(DESCRIPTIONS_FILE),
        "\
uniqueId,description,videoUrl,videoTitle
knight_a,A sturdy knight,https://example.com/knight,Knight intro
",
    )
    .expect("descriptions");
    fs::write(
        dir.join(ROUND_CONFIG_FILE),
        r#"{"hand_size": 4, "session_rounds": 2, "time_limit": 5}"#,
    )
    .expect("round config");
}

#[test]
fn resolver_finds_images_by_stem() {
    let dir = unique_temp_dir();
    write_assets(&dir);
    let images = AssetDirResolver::new(&dir);
    let archer = images.resolve("units/archer").expect("archer");
    assert!(archer.as_str().ends_with("archer.jpg"));
    assert!(images.resolve("units/dragon").is_none());
    assert!(images.resolve("  ").is_none());
    let _ = fs::remove_dir_all(dir);
}

#[test]
fn asset_dir_drives_a_short_session() {
    let dir = unique_temp_dir();
    write_assets(&dir);
    let images = AssetDirResolver::new(&dir);
    let config = load_round_config(&dir).expect("config");
    let (catalog, skipped) = load_catalog(&dir.join(CATALOG_FILE), &images, None).expect("catalog");
    assert_eq!(catalog.len(), 5);
    assert_eq!(catalog.group_count(), 4);
    assert_eq!(skipped.len(), 1);
    assert!(skipped[0].reason.contains("units/dragon"));

    let delay = config.judgment_delay;
    let session = Session::open(MemoryStore::default());
    let mut engine = RoundEngine::new(config, catalog, session, 11);
    engine.start();
    assert_eq!(engine.phase(), Phase::AwaitingInput);

    for _ in 0..2 {
        let correct = engine.hand().expect("hand").correct_index();
        engine.handle(InputEvent::SelectSlot(correct));
        engine.tick(delay + 0.1);
    }
    assert_eq!(engine.phase(), Phase::SessionEnd);
    let unlocked = engine.session().record().unlocked_variant_ids.len();
    assert!((1..=2).contains(&unlocked));

    let descriptions = load_descriptions(&dir.join(DESCRIPTIONS_FILE)).expect("descriptions");
    let album = Album::build(engine.catalog(), descriptions, engine.session().record());
    assert_eq!(album.unlocked_count(), unlocked);
    for entry in album.entries() {
        let locked = matches!(album.detail(&entry.variant_id), AlbumDetail::Locked(_));
        assert_eq!(locked, !entry.unlocked);
    }
    let _ = fs::remove_dir_all(dir);
}
