//! Wire-format lock for the command log text.
//!
//! The graded program and the grader may be built at different times; these
//! golden strings pin the byte-level format both sides agree on. If one of
//! these fails, the format changed and every stored log is affected.

use std::f64::consts::FRAC_PI_2;

use turtle_kernel::carrier::log_reader::{parse_lines, LogParseError};
use turtle_kernel::carrier::log_writer::{log_to_text, LOG_SENTINEL};
use turtle_kernel::proof::hash::log_digest;
use turtle_kernel::turtle::{CoordinateMode, VirtualTurtle};

// ---------------------------------------------------------------------------
// Golden encodings
// ---------------------------------------------------------------------------

#[test]
fn sentinel_is_fixed() {
    assert_eq!(LOG_SENTINEL, "#KSI_META_OUTPUT_0a859a#");
}

#[test]
fn forward_turn_forward_golden() {
    let mut t = VirtualTurtle::new();
    t.radians();
    t.fd(100.0).unwrap();
    t.rt(FRAC_PI_2).unwrap();
    t.fd(100.0).unwrap();

    assert_eq!(
        log_to_text(t.log()).unwrap(),
        "\n#KSI_META_OUTPUT_0a859a#\n\
         0 0 0 d fd 100\n\
         100 0 0 d rt 1.5707963267948966\n\
         100 0 -1.5707963267948966 d fd 100\n"
    );
}

#[test]
fn pen_goto_home_golden() {
    let mut t = VirtualTurtle::new();
    t.pu();
    t.goto(10.0, -5.0).unwrap();
    t.pd();
    t.home();

    assert_eq!(
        log_to_text(t.log()).unwrap(),
        "\n#KSI_META_OUTPUT_0a859a#\n\
         0 0 0 d penup\n\
         0 0 0 u goto 10 -5\n\
         10 -5 0 u pendown\n\
         10 -5 0 d home 0\n"
    );
}

#[test]
fn logo_mode_records_canonical_heading() {
    let mut t = VirtualTurtle::with_mode(CoordinateMode::Logo);
    t.fd(10.0).unwrap();
    assert_eq!(
        log_to_text(t.log()).unwrap(),
        "\n#KSI_META_OUTPUT_0a859a#\n0 0 1.5707963267948966 d fd 10\n"
    );
}

#[test]
fn fractional_values_use_shortest_decimal() {
    let mut t = VirtualTurtle::new();
    t.goto(0.1, -0.30000000000000004).unwrap();
    t.fd(1e-7).unwrap();
    let text = log_to_text(t.log()).unwrap();
    assert!(text.contains("goto 0.1 -0.30000000000000004\n"), "{text}");
    assert!(text.contains("fd 0.0000001\n"), "{text}");
    assert!(!text.contains('e'), "exponent notation leaked: {text}");
}

// ---------------------------------------------------------------------------
// Reader strictness
// ---------------------------------------------------------------------------

#[test]
fn reader_rejects_each_malformation_with_line_number() {
    let cases: &[(&[&str], LogParseError)] = &[
        (
            &["0 0 0 d fd"],
            LogParseError::FieldCount {
                line: 1,
                expected: 6,
                actual: 5,
            },
        ),
        (
            &["0 0 0 d fd 1", "0 0 0 x fd 1"],
            LogParseError::InvalidPenFlag {
                line: 2,
                raw: "x".into(),
            },
        ),
        (
            &["0 0 nan d fd 1"],
            LogParseError::InvalidNumber {
                line: 1,
                field: "heading".into(),
                raw: "nan".into(),
            },
        ),
        (
            &["", "0 0 0 d stamp"],
            LogParseError::UnsupportedOperation {
                line: 2,
                tag: "stamp".into(),
            },
        ),
    ];

    for (lines, expected) in cases {
        assert_eq!(
            &parse_lines(lines.iter()).unwrap_err(),
            expected,
            "{lines:?}"
        );
    }
}

// ---------------------------------------------------------------------------
// Digest
// ---------------------------------------------------------------------------

#[test]
fn log_digest_changes_with_any_entry() {
    let mut a = VirtualTurtle::new();
    a.fd(10.0).unwrap();
    let mut b = a.clone();
    b.fd(0.5).unwrap();
    assert_ne!(log_digest(a.log()).unwrap(), log_digest(b.log()).unwrap());
    b.undo();
    assert_eq!(log_digest(a.log()).unwrap(), log_digest(b.log()).unwrap());
}
