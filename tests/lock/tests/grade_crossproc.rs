//! Cross-process determinism of grading.
//!
//! Spawns the `grade_fixture` binary under several environment variants
//! and asserts identical stdout. This proves that log encoding, replay,
//! rasterization, diffing, and report hashing are not influenced by
//! process-level state (cwd, locale, env vars, log level).

use std::path::Path;
use std::process::Command;

/// Resolve the path to the compiled `grade_fixture` binary.
fn binary_path() -> String {
    let mut path = std::env::current_exe()
        .expect("can resolve test binary path")
        .parent()
        .expect("binary dir exists")
        .parent()
        .expect("deps parent exists")
        .to_path_buf();
    path.push("grade_fixture");
    path.to_string_lossy().to_string()
}

fn workspace_root() -> String {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("tests/ exists")
        .parent()
        .expect("workspace root exists")
        .to_string_lossy()
        .to_string()
}

/// Run the binary with the given cwd and environment overrides.
/// Returns stdout as a string.
fn run_variant(work_dir: &str, env_overrides: &[(&str, &str)]) -> String {
    let bin = binary_path();

    let mut command = Command::new(&bin);
    command.current_dir(work_dir);
    command
        .env_remove("LC_ALL")
        .env_remove("LC_NUMERIC")
        .env_remove("LANG")
        .env_remove("RUST_LOG");

    for &(key, val) in env_overrides {
        command.env(key, val);
    }

    let output = command.output().unwrap_or_else(|e| {
        panic!("failed to spawn {bin} (work_dir={work_dir}, overrides={env_overrides:?}): {e}")
    });

    assert!(
        output.status.success(),
        "grade_fixture exited with {}: stderr={}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );

    String::from_utf8(output.stdout).expect("stdout is valid UTF-8")
}

// ---------------------------------------------------------------------------
// Output shape
// ---------------------------------------------------------------------------

#[test]
fn fixture_output_has_expected_lines() {
    let out = run_variant(&workspace_root(), &[]);

    for name in ["square", "star", "broken_spiral", "logo_triangle"] {
        assert!(
            out.contains(&format!("{name}.log_digest=sha256:")),
            "missing {name}.log_digest"
        );
        assert!(
            out.contains(&format!("{name}.self_outcome=match")),
            "{name} does not match its own reference"
        );
    }
    assert!(out.contains("square.square_outcome=match"));
    assert!(out.contains("square.square_mismatch_count=0"));
    assert!(out.contains("star.square_outcome=mismatch"));
}

// ---------------------------------------------------------------------------
// Cross-process determinism
// ---------------------------------------------------------------------------

#[test]
fn crossproc_determinism_env_variants() {
    let root = workspace_root();
    let baseline = run_variant(&root, &[]);

    let alt_cwd = std::env::temp_dir();
    let variant_cwd = run_variant(&alt_cwd.to_string_lossy(), &[]);
    assert_eq!(baseline, variant_cwd, "output differs when cwd changes");

    let variant_locale = run_variant(&root, &[("LC_ALL", "de_DE.UTF-8"), ("LANG", "de_DE.UTF-8")]);
    assert_eq!(
        baseline, variant_locale,
        "output differs under a comma-decimal locale"
    );

    let variant_trace = run_variant(&root, &[("RUST_LOG", "trace")]);
    assert_eq!(
        baseline, variant_trace,
        "stdout differs when RUST_LOG=trace"
    );

    let variant_noise = run_variant(&root, &[("TURTLE_NOISE", "1"), ("TZ", "Pacific/Chatham")]);
    assert_eq!(
        baseline, variant_noise,
        "output differs with spurious env vars"
    );
}
