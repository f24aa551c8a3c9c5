//! `RasterRenderer`: the [`Renderer`] the grading pipeline replays into.
//!
//! Pen-down movement is recorded as line segments in turtle coordinates.
//! Nothing is rasterized until [`Renderer::snapshot`], which renders the
//! `width × height` window centred on the origin with the y axis pointing
//! up, the way the exported drawing canvas is framed.
//!
//! # Stroke model
//!
//! A pixel's alpha is driven by the distance `d` from its centre to the
//! nearest recorded segment:
//!
//! ```text
//! alpha = 255 * clamp(pen_width / 2 + 0.5 - d, 0, 1)
//! ```
//!
//! which is a solid stroke with round ends and a one-pixel linear falloff
//! at the edge. Overlapping strokes take the maximum, never a sum, so the
//! result does not depend on segment order.

use turtle_kernel::carrier::command_log::PenState;
use turtle_kernel::geometry::vector::Vec2;
use turtle_kernel::proof::replay::{RenderError, Renderer};
use turtle_kernel::raster::sample::RasterSample;

/// Stroke width used when none is configured.
pub const DEFAULT_PEN_WIDTH: f64 = 3.0;

/// Largest snapshot accepted, in pixels.
pub const MAX_SNAPSHOT_PIXELS: usize = 1 << 24;

/// A straight pen-down stroke.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Vec2,
    pub end: Vec2,
}

/// Segment-recording renderer with deterministic rasterization.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterRenderer {
    position: Vec2,
    heading: f64,
    pen: PenState,
    pen_width: f64,
    segments: Vec<Segment>,
}

impl Default for RasterRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_PEN_WIDTH)
    }
}

impl RasterRenderer {
    /// A renderer at the origin, heading 0, pen down.
    #[must_use]
    pub fn new(pen_width: f64) -> Self {
        Self {
            position: Vec2::ZERO,
            heading: 0.0,
            pen: PenState::Down,
            pen_width,
            segments: Vec::new(),
        }
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    #[must_use]
    pub const fn heading(&self) -> f64 {
        self.heading
    }

    #[must_use]
    pub const fn pen(&self) -> PenState {
        self.pen
    }

    #[must_use]
    pub const fn pen_width(&self) -> f64 {
        self.pen_width
    }

    /// Move to `target`, drawing if the pen is down.
    fn stroke_to(&mut self, target: Vec2, what: &str) -> Result<(), RenderError> {
        if !target.is_finite() {
            return Err(RenderError::NonFiniteGeometry {
                detail: format!("{what} target {target}"),
            });
        }
        // A zero-length stroke leaves no mark.
        if self.pen.is_down() && target != self.position {
            self.segments.push(Segment {
                start: self.position,
                end: target,
            });
        }
        self.position = target;
        Ok(())
    }
}

impl Renderer for RasterRenderer {
    fn set_position(&mut self, position: Vec2) -> Result<(), RenderError> {
        if !position.is_finite() {
            return Err(RenderError::NonFiniteGeometry {
                detail: format!("position {position}"),
            });
        }
        self.position = position;
        Ok(())
    }

    fn set_heading(&mut self, heading: f64) -> Result<(), RenderError> {
        if !heading.is_finite() {
            return Err(RenderError::NonFiniteGeometry {
                detail: format!("heading {heading}"),
            });
        }
        self.heading = heading;
        Ok(())
    }

    fn set_pen(&mut self, pen: PenState) -> Result<(), RenderError> {
        self.pen = pen;
        Ok(())
    }

    fn forward(&mut self, distance: f64) -> Result<(), RenderError> {
        let target = self.position + Vec2::from_angle(self.heading) * distance;
        self.stroke_to(target, "forward")
    }

    fn goto(&mut self, target: Vec2) -> Result<(), RenderError> {
        self.stroke_to(target, "goto")
    }

    fn snapshot(&self, width: usize, height: usize) -> Result<RasterSample, RenderError> {
        let invalid = RenderError::InvalidDimensions { width, height };
        match width.checked_mul(height) {
            Some(count) if count > 0 && count <= MAX_SNAPSHOT_PIXELS => {}
            _ => return Err(invalid),
        }
        if !(self.pen_width.is_finite() && self.pen_width > 0.0) {
            return Err(RenderError::Backend {
                detail: format!("pen width {} is not positive", self.pen_width),
            });
        }

        let mut alpha = vec![0u8; width * height];
        for segment in &self.segments {
            rasterize_segment(segment, self.pen_width, width, height, &mut alpha);
        }
        RasterSample::new(width, height, alpha).map_err(|e| RenderError::Backend {
            detail: e.to_string(),
        })
    }
}

/// Stamp one segment into `alpha`, keeping the per-pixel maximum.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
fn rasterize_segment(
    segment: &Segment,
    pen_width: f64,
    width: usize,
    height: usize,
    alpha: &mut [u8],
) {
    let reach = pen_width / 2.0 + 0.5;
    let half_w = width as f64 / 2.0;
    let half_h = height as f64 / 2.0;

    // Pixel-space bounding box: px = x + w/2 - 0.5, py = h/2 - y - 0.5.
    let (a, b) = (segment.start, segment.end);
    let Some((px_lo, px_hi)) = pixel_range(
        a.x.min(b.x) - reach + half_w - 0.5,
        a.x.max(b.x) + reach + half_w - 0.5,
        width,
    ) else {
        return;
    };
    let Some((py_lo, py_hi)) = pixel_range(
        half_h - a.y.max(b.y) - reach - 0.5,
        half_h - a.y.min(b.y) + reach - 0.5,
        height,
    ) else {
        return;
    };

    for py in py_lo..=py_hi {
        let y = half_h - (py as f64 + 0.5);
        for px in px_lo..=px_hi {
            let x = px as f64 + 0.5 - half_w;
            let d = distance_to_segment(Vec2::new(x, y), a, b);
            let coverage = (reach - d).clamp(0.0, 1.0);
            let value = (coverage * 255.0).round() as u8;
            let slot = &mut alpha[py * width + px];
            *slot = (*slot).max(value);
        }
    }
}

/// Clamp a continuous pixel interval to `0..limit`. `None` if disjoint.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
fn pixel_range(lo: f64, hi: f64, limit: usize) -> Option<(usize, usize)> {
    let max = (limit - 1) as f64;
    if hi < 0.0 || lo > max {
        return None;
    }
    Some((lo.max(0.0).floor() as usize, hi.min(max).ceil() as usize))
}

fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f64 {
    let ab = b - a;
    let len_sq = ab.dot(ab);
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}
