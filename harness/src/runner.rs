//! Grading runner: orchestrates kernel APIs to grade one submission.
//!
//! The runner does not implement replay or diff logic itself. It wires the
//! kernel's log reader, replay interpreter, and image differ to the
//! [`RasterRenderer`] and packages the result as a [`GradeReport`].
//!
//! # Pipeline
//!
//! ```text
//! SubmissionOutcome / program output
//!   → extract_log() → replay(RasterRenderer) → snapshot(canvas)
//!   → compare(candidate, reference) → composite() → GradeReport
//! ```
//!
//! Every failure is fatal: the caller gets either a report or exactly one
//! [`GradeError`].

use tracing::{debug, info, warn};

use turtle_kernel::carrier::command_log::CommandLog;
use turtle_kernel::carrier::log_reader::{extract_log, LogParseError};
use turtle_kernel::carrier::log_writer::LogWriteError;
use turtle_kernel::proof::canon::CanonError;
use turtle_kernel::proof::hash::{log_digest, raster_digest};
use turtle_kernel::proof::replay::{replay, RenderError, Renderer, ReplayError, ReplaySummary};
use turtle_kernel::raster::diff::compare;
use turtle_kernel::raster::sample::{composite, DimensionMismatch, RasterSample};

use crate::artifact::ArtifactError;
use crate::canvas::RasterRenderer;
use crate::config::GradingPolicy;
use crate::report::GradeReport;

/// What the sandbox collaborator reports after running a submission.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    /// The program ran to completion and produced this log.
    Completed(CommandLog),
    /// The program crashed, timed out, or was killed.
    Failed { detail: String },
}

/// Error grading a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GradeError {
    /// The sandbox reported a failed run.
    SubmissionFailed { detail: String },
    /// The log text could not be parsed.
    Parse(LogParseError),
    /// The log could not be encoded for hashing.
    LogWrite(LogWriteError),
    /// Replay failed inside the renderer.
    Replay(ReplayError),
    /// Snapshotting the renderer failed.
    Render(RenderError),
    /// Candidate and reference rasters differ in size.
    DimensionMismatch(DimensionMismatch),
    /// Persisting or loading an artifact failed.
    Artifact(ArtifactError),
    /// Canonical JSON serialization failed.
    Canon(CanonError),
}

impl std::fmt::Display for GradeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SubmissionFailed { detail } => write!(f, "submission failed: {detail}"),
            Self::Parse(e) => write!(f, "log parse failed: {e}"),
            Self::LogWrite(e) => write!(f, "log encoding failed: {e}"),
            Self::Replay(e) => write!(f, "replay failed: {e}"),
            Self::Render(e) => write!(f, "render failed: {e}"),
            Self::DimensionMismatch(e) => write!(f, "{e}"),
            Self::Artifact(e) => write!(f, "artifact error: {e}"),
            Self::Canon(e) => write!(f, "canonical JSON error: {e}"),
        }
    }
}

impl std::error::Error for GradeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::SubmissionFailed { .. } => None,
            Self::Parse(e) => Some(e),
            Self::LogWrite(e) => Some(e),
            Self::Replay(e) => Some(e),
            Self::Render(e) => Some(e),
            Self::DimensionMismatch(e) => Some(e),
            Self::Artifact(e) => Some(e),
            Self::Canon(e) => Some(e),
        }
    }
}

impl From<LogParseError> for GradeError {
    fn from(e: LogParseError) -> Self {
        Self::Parse(e)
    }
}

impl From<LogWriteError> for GradeError {
    fn from(e: LogWriteError) -> Self {
        Self::LogWrite(e)
    }
}

impl From<ReplayError> for GradeError {
    fn from(e: ReplayError) -> Self {
        Self::Replay(e)
    }
}

impl From<RenderError> for GradeError {
    fn from(e: RenderError) -> Self {
        Self::Render(e)
    }
}

impl From<DimensionMismatch> for GradeError {
    fn from(e: DimensionMismatch) -> Self {
        Self::DimensionMismatch(e)
    }
}

impl From<ArtifactError> for GradeError {
    fn from(e: ArtifactError) -> Self {
        Self::Artifact(e)
    }
}

impl From<CanonError> for GradeError {
    fn from(e: CanonError) -> Self {
        Self::Canon(e)
    }
}

/// Replay `log` into a fresh [`RasterRenderer`] and snapshot the canvas.
///
/// # Errors
///
/// Returns [`GradeError::Replay`] or [`GradeError::Render`].
pub fn render_log(
    log: &CommandLog,
    policy: &GradingPolicy,
) -> Result<(RasterSample, ReplaySummary), GradeError> {
    let mut renderer = RasterRenderer::new(policy.pen_width);
    let summary = replay(log, &mut renderer)?;
    debug!(
        entries = summary.entries_replayed,
        segments = renderer.segments().len(),
        "replay complete"
    );
    let raster = renderer.snapshot(policy.canvas_width, policy.canvas_height)?;
    Ok((raster, summary))
}

/// Render a reference solution's log once, for reuse across submissions.
///
/// # Errors
///
/// Same as [`render_log`].
pub fn render_reference(
    log: &CommandLog,
    policy: &GradingPolicy,
) -> Result<RasterSample, GradeError> {
    let (raster, _) = render_log(log, policy)?;
    info!(
        digest = %raster_digest(&raster),
        coverage = raster.coverage(),
        "reference rendered"
    );
    Ok(raster)
}

/// Grade a parsed log against a reference raster.
///
/// # Errors
///
/// Returns [`GradeError`] if replay or rendering fails, or if the canvas
/// size differs from the reference.
pub fn grade_log(
    log: &CommandLog,
    reference: &RasterSample,
    policy: &GradingPolicy,
) -> Result<GradeReport, GradeError> {
    let span = tracing::info_span!("grade", entries = log.len());
    let _guard = span.enter();

    let log_digest = log_digest(log)?;
    let (candidate, summary) = render_log(log, policy)?;
    let verdict = compare(&candidate, reference, &policy.thresholds)?;
    let overlay = composite(&candidate, reference)?;

    info!(
        outcome = %verdict.outcome,
        mismatch_count = verdict.mismatch_count,
        tolerance = policy.thresholds.tolerance,
        "verdict"
    );

    Ok(GradeReport {
        verdict,
        entries_replayed: summary.entries_replayed,
        log_digest,
        policy: *policy,
        reference_digest: raster_digest(reference),
        candidate,
        overlay,
    })
}

/// Grade whatever the sandbox reported.
///
/// # Errors
///
/// Returns [`GradeError::SubmissionFailed`] for a failed run, otherwise
/// anything [`grade_log`] returns.
pub fn grade(
    outcome: &SubmissionOutcome,
    reference: &RasterSample,
    policy: &GradingPolicy,
) -> Result<GradeReport, GradeError> {
    match outcome {
        SubmissionOutcome::Completed(log) => grade_log(log, reference, policy),
        SubmissionOutcome::Failed { detail } => {
            warn!(%detail, "submission failed before producing a log");
            Err(GradeError::SubmissionFailed {
                detail: detail.clone(),
            })
        }
    }
}

/// Grade raw captured program output containing a sentinel-framed log.
///
/// # Errors
///
/// Returns [`GradeError::Parse`] if the log cannot be extracted, otherwise
/// anything [`grade_log`] returns.
pub fn grade_output(
    output: &str,
    reference: &RasterSample,
    policy: &GradingPolicy,
) -> Result<GradeReport, GradeError> {
    let log = extract_log(output).map_err(|e| {
        warn!(error = %e, "rejected submission output");
        GradeError::from(e)
    })?;
    debug!(entries = log.len(), "log extracted");
    grade_log(&log, reference, policy)
}
