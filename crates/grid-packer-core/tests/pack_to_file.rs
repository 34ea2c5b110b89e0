use std::fs;

use grid_packer_core::prelude::*;
use image::{Rgba, RgbaImage};

fn gradient_tiles(count: usize, n: u32) -> Vec<SourceImage> {
    (0..count)
        .map(|i| {
            let img = RgbaImage::from_fn(n, n, |x, y| Rgba([x as u8 * 16, y as u8 * 16, i as u8, 255]));
            SourceImage::new(format!("t{i}"), img)
        })
        .collect()
}

#[test]
fn written_atlas_decodes_to_packed_pixels() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("atlas.png");
    let spec = AtlasSpec::new(8, 16, &out);
    let images = gradient_tiles(3, 8);

    let summary = pack_to_file(&images, &spec).expect("pack");
    assert_eq!(summary.output_path, out);
    assert_eq!(summary.layout.slots.len(), 3);

    let decoded = image::open(&out).unwrap().to_rgba8();
    let expected = pack_grid(&images, &spec).unwrap().rgba;
    assert_eq!(decoded.dimensions(), (16, 16));
    assert_eq!(decoded.as_raw(), expected.as_raw());
}

#[test]
fn repeated_packs_are_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.png");
    let b = dir.path().join("b.png");
    let images = gradient_tiles(4, 8);

    pack_to_file(&images, &AtlasSpec::new(8, 32, &a)).unwrap();
    pack_to_file(&images, &AtlasSpec::new(8, 32, &b)).unwrap();
    assert_eq!(fs::read(&a).unwrap(), fs::read(&b).unwrap());
}

#[test]
fn over_capacity_leaves_existing_file_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("atlas.png");
    fs::write(&out, b"previous atlas").unwrap();

    let spec = AtlasSpec::new(8, 16, &out);
    let err = pack_to_file(&gradient_tiles(5, 8), &spec).unwrap_err();
    assert!(matches!(err, GridPackerError::CapacityExceeded { provided: 5, capacity: 4 }));
    assert_eq!(fs::read(&out).unwrap(), b"previous atlas");
}

#[test]
fn over_capacity_creates_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("atlas.png");
    let spec = AtlasSpec::new(8, 8, &out);
    assert!(pack_to_file(&gradient_tiles(2, 8), &spec).is_err());
    assert!(!out.exists());
    // no temp files left behind either
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn missing_output_directory_is_a_write_error() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("missing").join("atlas.png");
    let spec = AtlasSpec::new(8, 16, &out);
    match pack_to_file(&gradient_tiles(1, 8), &spec) {
        Err(GridPackerError::Write { path, .. }) => assert_eq!(path, out),
        other => panic!("expected Write error, got {other:?}"),
    }
}

#[test]
fn pack_folder_uses_sorted_files_and_skips_its_own_output() {
    let dir = tempfile::tempdir().unwrap();
    for (i, name) in ["c.png", "a.png", "b.png"].iter().enumerate() {
        let img = RgbaImage::from_pixel(4, 4, Rgba([i as u8 + 1, 0, 0, 255]));
        img.save(dir.path().join(name)).unwrap();
    }
    let out = dir.path().join("pack.png");
    let spec = AtlasSpec::new(4, 8, &out);

    let first = pack_folder(dir.path(), &spec, SortOrder::NameAsc).expect("pack");
    let keys: Vec<&str> = first
        .layout
        .slots
        .iter()
        .map(|s| s.key.rsplit('/').next().unwrap())
        .collect();
    assert_eq!(keys, vec!["a.png", "b.png", "c.png"]);

    // second run must not pick up pack.png as a fourth tile
    let second = pack_folder(dir.path(), &spec, SortOrder::NameAsc).expect("repack");
    assert_eq!(second.layout.slots.len(), 3);
    let atlas = image::open(&out).unwrap().to_rgba8();
    assert_eq!(atlas.get_pixel(0, 0), &Rgba([2, 0, 0, 255])); // a.png
    assert_eq!(atlas.get_pixel(4, 0), &Rgba([3, 0, 0, 255])); // b.png
    assert_eq!(atlas.get_pixel(0, 4), &Rgba([1, 0, 0, 255])); // c.png
}

#[test]
fn pack_folder_skips_its_output_under_another_spelling() {
    let root = tempfile::tempdir().unwrap();
    let tiles = root.path().join("tiles");
    fs::create_dir(&tiles).unwrap();
    for (i, name) in ["a.png", "b.png"].iter().enumerate() {
        RgbaImage::from_pixel(4, 4, Rgba([i as u8 + 1, 0, 0, 255]))
            .save(tiles.join(name))
            .unwrap();
    }
    // folder given one way, output path spelled through `..`
    let spec = AtlasSpec::new(4, 8, tiles.join("..").join("tiles").join("pack.png"));

    let first = pack_folder(&tiles, &spec, SortOrder::NameAsc).expect("pack");
    assert_eq!(first.layout.slots.len(), 2);
    assert!(tiles.join("pack.png").is_file());

    let second = pack_folder(&tiles, &spec, SortOrder::NameAsc).expect("repack");
    assert_eq!(second.layout.slots.len(), 2);
    assert!(
        second
            .layout
            .slots
            .iter()
            .all(|s| !s.key.ends_with("pack.png"))
    );
}

#[test]
fn pack_folder_missing_folder_is_path_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let spec = AtlasSpec::new(4, 8, dir.path().join("out.png"));
    let err = pack_folder(&dir.path().join("nope"), &spec, SortOrder::None).unwrap_err();
    assert!(matches!(err, GridPackerError::PathNotFound { .. }));
}
