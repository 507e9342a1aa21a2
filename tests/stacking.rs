//! End-to-end stack assembly against real directories of synthetic frames

use ndarray::{Array2, Axis};
use stackbuilder::io::cli::{Cli, StackProcessor};
use stackbuilder::io::image::{read_stack, write_stack};
use stackbuilder::stack::frames::FrameStack;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Write `count` single-page 16-bit frames whose pixels encode their
/// sequence position, named so lexicographic order equals sequence order.
fn synthetic_sequence(dir: &Path, count: usize) -> Vec<Array2<u16>> {
    let mut planes = Vec::with_capacity(count);
    for index in 0..count {
        let plane = Array2::from_shape_fn((4, 6), |(r, c)| (index * 100 + r * 10 + c) as u16);
        let path = dir.join(format!("frame_{:03}.tif", index + 1));
        write_stack(&path, &FrameStack::Gray16(plane.clone().insert_axis(Axis(0)))).unwrap();
        planes.push(plane);
    }
    planes
}

fn run(input: &Path, ranges: &str) -> stackbuilder::Result<()> {
    let cli = Cli {
        input_image_directory: input.to_path_buf(),
        image_ranges: ranges.to_string(),
        quiet: true,
    };
    StackProcessor::new(cli).process()
}

fn stack_path(input: &Path, name: &str) -> PathBuf {
    input.join("stacks").join(format!("{name}.tif"))
}

#[test]
fn test_full_range_round_trips_pixel_for_pixel() {
    let dir = TempDir::new().unwrap();
    let planes = synthetic_sequence(dir.path(), 5);

    run(dir.path(), "all 1:5").unwrap();

    let FrameStack::Gray16(stacked) = read_stack(&stack_path(dir.path(), "all")).unwrap() else {
        unreachable!("16-bit inputs must produce a 16-bit stack");
    };
    assert_eq!(stacked.dim(), (5, 4, 6));
    for (index, plane) in planes.iter().enumerate() {
        assert_eq!(stacked.index_axis(Axis(0), index), *plane);
    }
}

#[test]
fn test_subrange_selects_one_based_inclusive_start() {
    let dir = TempDir::new().unwrap();
    let planes = synthetic_sequence(dir.path(), 5);

    // "2:4" covers files 2, 3 and 4 in 1-based terms
    run(dir.path(), "X 2:4").unwrap();

    let FrameStack::Gray16(stacked) = read_stack(&stack_path(dir.path(), "X")).unwrap() else {
        unreachable!("16-bit inputs must produce a 16-bit stack");
    };
    assert_eq!(stacked.dim().0, 3);
    for (page, source_index) in (0..3).zip(1..4) {
        assert_eq!(
            stacked.index_axis(Axis(0), page),
            *planes.get(source_index).unwrap()
        );
    }
}

#[test]
fn test_multiple_trials_write_one_stack_each() {
    let dir = TempDir::new().unwrap();
    synthetic_sequence(dir.path(), 6);

    run(dir.path(), "A 1:3 B 4:6").unwrap();

    let a = read_stack(&stack_path(dir.path(), "A")).unwrap();
    let b = read_stack(&stack_path(dir.path(), "B")).unwrap();
    assert_eq!(a.frame_count(), 3);
    assert_eq!(b.frame_count(), 3);
}

#[test]
fn test_rerun_overwrites_stack_of_same_name() {
    let dir = TempDir::new().unwrap();
    let planes = synthetic_sequence(dir.path(), 5);

    run(dir.path(), "T 1:5").unwrap();
    run(dir.path(), "T 2:2").unwrap();

    let FrameStack::Gray16(stacked) = read_stack(&stack_path(dir.path(), "T")).unwrap() else {
        unreachable!("16-bit inputs must produce a 16-bit stack");
    };
    // Only the second run's selection (file 2 alone) remains
    assert_eq!(stacked.dim().0, 1);
    assert_eq!(stacked.index_axis(Axis(0), 0), *planes.get(1).unwrap());
}

#[test]
fn test_empty_range_description_writes_nothing() {
    let dir = TempDir::new().unwrap();
    synthetic_sequence(dir.path(), 2);

    run(dir.path(), "").unwrap();

    let stacks = dir.path().join("stacks");
    assert!(stacks.is_dir());
    assert_eq!(std::fs::read_dir(&stacks).unwrap().count(), 0);
}

#[test]
fn test_empty_selection_aborts_the_run() {
    let dir = TempDir::new().unwrap();
    synthetic_sequence(dir.path(), 2);

    // Span lies entirely past the end of the sequence
    let err = run(dir.path(), "ghost 10:20").unwrap_err();
    assert!(matches!(
        err,
        stackbuilder::StackError::InvalidFrameData { .. }
    ));
    assert!(!stack_path(dir.path(), "ghost").exists());
}

#[test]
fn test_bad_range_string_produces_no_output() {
    let dir = TempDir::new().unwrap();
    synthetic_sequence(dir.path(), 3);

    assert!(run(dir.path(), "A 1:3 B").is_err());
    assert!(run(dir.path(), "A 1-3").is_err());
    assert!(!stack_path(dir.path(), "A").exists());
}

#[test]
fn test_undecodable_frame_aborts_remaining_trials() {
    let dir = TempDir::new().unwrap();
    synthetic_sequence(dir.path(), 3);
    // Sorts after the synthetic frames, so trial B reaches it first
    std::fs::write(dir.path().join("frame_999.tif"), b"not a tiff").unwrap();

    let err = run(dir.path(), "A 1:2 B 3:4 C 1:1").unwrap_err();
    assert!(matches!(err, stackbuilder::StackError::FrameDecode { .. }));

    // Trial A completed before the failure; trial C was never processed
    assert!(stack_path(dir.path(), "A").exists());
    assert!(!stack_path(dir.path(), "C").exists());
}

#[test]
fn test_mixed_bit_depths_in_one_trial_are_rejected() {
    let dir = TempDir::new().unwrap();
    synthetic_sequence(dir.path(), 2);
    let odd_one = Array2::from_elem((4, 6), 9u8);
    write_stack(
        &dir.path().join("frame_900.tif"),
        &FrameStack::Gray8(odd_one.insert_axis(Axis(0))),
    )
    .unwrap();

    let err = run(dir.path(), "M 1:3").unwrap_err();
    assert!(matches!(
        err,
        stackbuilder::StackError::InvalidFrameData { .. }
    ));
}
