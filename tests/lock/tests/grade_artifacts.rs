//! Report and raster artifact persistence.
//!
//! Proves:
//! 1. Grading is deterministic in-process (identical report bytes)
//! 2. Report directories are byte-identical across writes
//! 3. A precomputed reference loaded from disk grades identically
//! 4. Tampered artifacts fail closed

use std::path::Path;

use lock_tests::fixtures::{all_programs, lock_policy, square, star};
use turtle_harness::artifact::{read_raster_file, write_raster_file, ArtifactError};
use turtle_harness::report::{
    verify_report_dir, write_report_dir, CANDIDATE_FILENAME, OVERLAY_FILENAME, REPORT_FILENAME,
};
use turtle_harness::runner::{grade_log, render_reference};
use turtle_kernel::proof::hash::raster_digest;

fn read(dir: &Path, name: &str) -> Vec<u8> {
    std::fs::read(dir.join(name)).unwrap()
}

// ---------------------------------------------------------------------------
// 1-2. Determinism
// ---------------------------------------------------------------------------

#[test]
fn grading_is_deterministic_in_process() {
    let policy = lock_policy();
    let reference = render_reference(&square(50.0), &policy).unwrap();
    for (name, log) in all_programs() {
        let first = grade_log(&log, &reference, &policy).unwrap();
        for _ in 0..3 {
            let again = grade_log(&log, &reference, &policy).unwrap();
            assert_eq!(
                again.canonical_bytes().unwrap(),
                first.canonical_bytes().unwrap(),
                "{name}"
            );
            assert_eq!(again, first, "{name}");
        }
    }
}

#[test]
fn report_dirs_are_byte_identical() {
    let policy = lock_policy();
    let reference = render_reference(&square(50.0), &policy).unwrap();
    let report = grade_log(&star(100.0), &reference, &policy).unwrap();

    let a = tempfile::tempdir().unwrap();
    let b = tempfile::tempdir().unwrap();
    write_report_dir(&report, a.path()).unwrap();
    write_report_dir(&report, b.path()).unwrap();

    for name in [REPORT_FILENAME, CANDIDATE_FILENAME, OVERLAY_FILENAME] {
        assert_eq!(read(a.path(), name), read(b.path(), name), "{name} differs");
    }

    let doc = verify_report_dir(a.path()).unwrap();
    assert_eq!(doc["outcome"], "mismatch");
    assert_eq!(
        doc["reference_digest"].as_str().unwrap(),
        raster_digest(&reference).as_str()
    );
}

// ---------------------------------------------------------------------------
// 3. Precomputed reference
// ---------------------------------------------------------------------------

#[test]
fn stored_reference_grades_like_fresh_reference() {
    let policy = lock_policy();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("exercise").join("reference.raster.json");

    let fresh = render_reference(&square(50.0), &policy).unwrap();
    write_raster_file(&fresh, &path).unwrap();
    let stored = read_raster_file(&path).unwrap();
    assert_eq!(stored, fresh);

    for (name, log) in all_programs() {
        let with_fresh = grade_log(&log, &fresh, &policy).unwrap();
        let with_stored = grade_log(&log, &stored, &policy).unwrap();
        assert_eq!(with_fresh.verdict, with_stored.verdict, "{name}");
    }
}

// ---------------------------------------------------------------------------
// 4. Fail-closed
// ---------------------------------------------------------------------------

#[test]
fn tampered_candidate_raster_fails_verification() {
    let policy = lock_policy();
    let reference = render_reference(&square(50.0), &policy).unwrap();
    let report = grade_log(&square(50.0), &reference, &policy).unwrap();

    let dir = tempfile::tempdir().unwrap();
    write_report_dir(&report, dir.path()).unwrap();

    // Flip one hex digit inside the candidate's alpha payload.
    let path = dir.path().join(CANDIDATE_FILENAME);
    let text = String::from_utf8(read(dir.path(), CANDIDATE_FILENAME)).unwrap();
    let start = text.find("\"alpha_hex\":\"").unwrap() + "\"alpha_hex\":\"".len();
    let mut bytes = text.into_bytes();
    bytes[start] = if bytes[start] == b'0' { b'1' } else { b'0' };
    std::fs::write(&path, bytes).unwrap();

    match verify_report_dir(dir.path()).unwrap_err() {
        ArtifactError::DigestMismatch { .. } => {}
        other => panic!("expected DigestMismatch, got {other:?}"),
    }
}

#[test]
fn report_with_wrong_schema_is_rejected() {
    let policy = lock_policy();
    let reference = render_reference(&square(50.0), &policy).unwrap();
    let report = grade_log(&square(50.0), &reference, &policy).unwrap();

    let dir = tempfile::tempdir().unwrap();
    write_report_dir(&report, dir.path()).unwrap();
    let text = String::from_utf8(read(dir.path(), REPORT_FILENAME)).unwrap();
    std::fs::write(
        dir.path().join(REPORT_FILENAME),
        text.replace("grade_report.v1", "grade_report.v0"),
    )
    .unwrap();

    assert_eq!(
        verify_report_dir(dir.path()).unwrap_err(),
        ArtifactError::SchemaMismatch {
            found: "grade_report.v0".into()
        }
    );
}
