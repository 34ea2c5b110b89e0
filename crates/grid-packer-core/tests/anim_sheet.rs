use std::fs;
use std::path::Path;

use grid_packer_core::prelude::*;
use image::{Rgba, RgbaImage};

/// Frame `i` carries its index in the red channel and its coordinates in green/blue.
fn frame(i: usize, w: u32, h: u32) -> RgbaImage {
    RgbaImage::from_fn(w, h, |x, y| Rgba([i as u8, x as u8, y as u8, 255]))
}

fn write_frames(dir: &Path, count: usize, w: u32, h: u32) {
    for i in 0..count {
        frame(i, w, h)
            .save(dir.join(format!("frame_{i:02}.png")))
            .unwrap();
    }
}

#[test]
fn sixteen_frames_make_a_four_by_four_sheet() {
    let dir = tempfile::tempdir().unwrap();
    write_frames(dir.path(), 16, 64, 64);
    let spec = AnimSpec::new(16, dir.path(), "sheet.png").with_sort_order(SortOrder::NameAsc);

    let summary = assemble_sheet(&spec).expect("assemble");
    assert_eq!(summary.output_path, dir.path().join("sheet.png"));
    assert_eq!(summary.layout.slots_per_side, 4);
    assert!(summary.layout.slots.iter().all(|s| !s.rotated));

    let sheet = image::open(dir.path().join("sheet.png")).unwrap().to_rgba8();
    assert_eq!(sheet.dimensions(), (256, 256));
    for r in 0..4u32 {
        for c in 0..4u32 {
            let i = (r * 4 + c) as usize;
            for (x, y) in [(0, 0), (63, 0), (0, 63), (17, 42), (63, 63)] {
                assert_eq!(
                    sheet.get_pixel(c * 64 + x, r * 64 + y),
                    &Rgba([i as u8, x as u8, y as u8, 255]),
                    "slot ({r},{c}) at ({x},{y})"
                );
            }
        }
    }
}

#[test]
fn non_square_frames_keep_their_aspect() {
    let frames: Vec<SourceImage> = (0..4)
        .map(|i| SourceImage::new(format!("f{i}"), frame(i, 6, 3)))
        .collect();
    let spec = AnimSpec::new(4, "unused", "sheet.png");
    let packed = assemble_frames(&frames, &spec).expect("assemble");
    assert_eq!(packed.rgba.dimensions(), (12, 6));
    assert_eq!(packed.rgba.get_pixel(6 + 5, 3 + 2), &Rgba([3, 5, 2, 255]));
}

#[test]
fn frame_count_not_divisible_by_four_is_rejected_before_io() {
    // the folder does not exist: validation must fail first
    let spec = AnimSpec::new(17, "/definitely/not/a/folder", "sheet.png");
    match assemble_sheet(&spec) {
        Err(GridPackerError::InvalidFrameCount { frame_count }) => assert_eq!(frame_count, 17),
        other => panic!("expected InvalidFrameCount, got {other:?}"),
    }
}

#[test]
fn non_square_frame_count_is_rejected_before_io() {
    let spec = AnimSpec::new(12, "/definitely/not/a/folder", "sheet.png");
    assert!(matches!(
        assemble_sheet(&spec),
        Err(GridPackerError::CapacityExceeded {
            provided: 12,
            capacity: 9
        })
    ));
}

#[test]
fn too_few_frames_fail_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    write_frames(dir.path(), 10, 8, 8);
    let spec = AnimSpec::new(16, dir.path(), "sheet.png");
    match assemble_sheet(&spec) {
        Err(GridPackerError::InsufficientFrames { found, required }) => {
            assert_eq!(found, 10);
            assert_eq!(required, 16);
        }
        other => panic!("expected InsufficientFrames, got {other:?}"),
    }
    assert!(!dir.path().join("sheet.png").exists());
}

#[test]
fn extra_files_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    write_frames(dir.path(), 6, 8, 8);
    let spec = AnimSpec::new(4, dir.path(), "sheet.png").with_sort_order(SortOrder::NameAsc);
    let summary = assemble_sheet(&spec).expect("assemble");
    assert_eq!(summary.layout.slots.len(), 4);
    let sheet = image::open(dir.path().join("sheet.png")).unwrap().to_rgba8();
    assert_eq!(sheet.dimensions(), (16, 16));
    assert_eq!(sheet.get_pixel(8, 8)[0], 3);
}

#[test]
fn previous_sheet_is_not_read_as_a_frame() {
    let dir = tempfile::tempdir().unwrap();
    write_frames(dir.path(), 4, 8, 8);
    let spec = AnimSpec::new(4, dir.path(), "sheet.png").with_sort_order(SortOrder::NameAsc);
    assemble_sheet(&spec).expect("first run");
    let first = fs::read(dir.path().join("sheet.png")).unwrap();
    // the 16x16 sheet would be a mismatching frame if it were picked up
    assemble_sheet(&spec).expect("second run");
    assert_eq!(fs::read(dir.path().join("sheet.png")).unwrap(), first);
}

#[test]
fn mismatched_frame_size_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_frames(dir.path(), 3, 8, 8);
    frame(3, 8, 9).save(dir.path().join("frame_03.png")).unwrap();
    let spec = AnimSpec::new(4, dir.path(), "sheet.png").with_sort_order(SortOrder::NameAsc);
    match assemble_sheet(&spec) {
        Err(GridPackerError::DimensionMismatch {
            index,
            expected,
            actual,
        }) => {
            assert_eq!(index, 3);
            assert_eq!(expected, (8, 8));
            assert_eq!(actual, (8, 9));
        }
        other => panic!("expected DimensionMismatch, got {other:?}"),
    }
    assert!(!dir.path().join("sheet.png").exists());
}

#[test]
fn undecodable_frame_aborts() {
    let dir = tempfile::tempdir().unwrap();
    write_frames(dir.path(), 3, 8, 8);
    fs::write(dir.path().join("frame_03.png"), b"not a png").unwrap();
    let spec = AnimSpec::new(4, dir.path(), "sheet.png");
    match assemble_sheet(&spec) {
        Err(GridPackerError::ImageDecode { path, .. }) => {
            assert_eq!(path, dir.path().join("frame_03.png"))
        }
        other => panic!("expected ImageDecode, got {other:?}"),
    }
}
