//! `RasterSample`: immutable `width × height` grid of alpha intensities.
//!
//! # Layout
//!
//! Row-major, origin at the top-left pixel, one `u8` per pixel:
//! `alpha[y * width + x]`. The constructor enforces
//! `alpha.len() == width * height`, so every accessor is in bounds.

/// Error constructing a raster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RasterError {
    /// `width * height` overflows `usize`.
    DimensionOverflow { width: usize, height: usize },
    /// The pixel buffer length does not match the dimensions.
    LengthMismatch { expected: usize, actual: usize },
}

impl std::fmt::Display for RasterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DimensionOverflow { width, height } => {
                write!(f, "raster dimensions {width}x{height} overflow")
            }
            Self::LengthMismatch { expected, actual } => {
                write!(f, "raster buffer has {actual} pixels, expected {expected}")
            }
        }
    }
}

impl std::error::Error for RasterError {}

/// Two rasters that must be compared pixel-for-pixel have different sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimensionMismatch {
    /// `(width, height)` of the candidate / foreground raster.
    pub candidate: (usize, usize),
    /// `(width, height)` of the reference / background raster.
    pub reference: (usize, usize),
}

impl std::fmt::Display for DimensionMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "raster dimensions differ: {}x{} vs {}x{}",
            self.candidate.0, self.candidate.1, self.reference.0, self.reference.1
        )
    }
}

impl std::error::Error for DimensionMismatch {}

/// An alpha-channel raster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterSample {
    width: usize,
    height: usize,
    alpha: Vec<u8>,
}

impl RasterSample {
    /// Build a raster from a row-major alpha buffer.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError`] if the dimensions overflow or the buffer
    /// length is not `width * height`.
    pub fn new(width: usize, height: usize, alpha: Vec<u8>) -> Result<Self, RasterError> {
        let expected = pixel_count(width, height)?;
        if alpha.len() != expected {
            return Err(RasterError::LengthMismatch {
                expected,
                actual: alpha.len(),
            });
        }
        Ok(Self {
            width,
            height,
            alpha,
        })
    }

    /// A fully transparent raster.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::DimensionOverflow`] if `width * height` overflows.
    pub fn blank(width: usize, height: usize) -> Result<Self, RasterError> {
        let count = pixel_count(width, height)?;
        Ok(Self {
            width,
            height,
            alpha: vec![0; count],
        })
    }

    /// Build a raster by evaluating `f(x, y)` for every pixel.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::DimensionOverflow`] if `width * height` overflows.
    pub fn from_fn(
        width: usize,
        height: usize,
        mut f: impl FnMut(usize, usize) -> u8,
    ) -> Result<Self, RasterError> {
        let count = pixel_count(width, height)?;
        let mut alpha = Vec::with_capacity(count);
        for y in 0..height {
            for x in 0..width {
                alpha.push(f(x, y));
            }
        }
        Ok(Self {
            width,
            height,
            alpha,
        })
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub const fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Alpha at `(x, y)`, or `None` outside the raster.
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        if x < self.width && y < self.height {
            Some(self.alpha[y * self.width + x])
        } else {
            None
        }
    }

    /// Row-major alpha bytes.
    #[must_use]
    pub fn alpha(&self) -> &[u8] {
        &self.alpha
    }

    /// Number of pixels with non-zero alpha.
    #[must_use]
    pub fn coverage(&self) -> usize {
        self.alpha.iter().filter(|&&a| a != 0).count()
    }

    /// Check that `other` has the same dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`DimensionMismatch`] (with `self` as the candidate side) if
    /// width or height differ.
    pub fn ensure_same_dimensions(&self, other: &Self) -> Result<(), DimensionMismatch> {
        if self.dimensions() == other.dimensions() {
            Ok(())
        } else {
            Err(DimensionMismatch {
                candidate: self.dimensions(),
                reference: other.dimensions(),
            })
        }
    }
}

/// Paste `foreground` onto `background` using the foreground's inverted alpha
/// as the paste mask.
///
/// Per pixel, with `m = 255 - fg`:
/// `out = (fg * m + bg * (255 - m) + 127) / 255`.
///
/// Used for diagnostic overlays only; it plays no part in verdicts.
///
/// # Errors
///
/// Returns [`DimensionMismatch`] if the rasters differ in size.
pub fn composite(
    foreground: &RasterSample,
    background: &RasterSample,
) -> Result<RasterSample, DimensionMismatch> {
    foreground.ensure_same_dimensions(background)?;
    let alpha = foreground
        .alpha
        .iter()
        .zip(&background.alpha)
        .map(|(&fg, &bg)| {
            let fg = u32::from(fg);
            let bg = u32::from(bg);
            let mask = 255 - fg;
            let blended = (fg * mask + bg * (255 - mask) + 127) / 255;
            // blended <= 255: a convex combination of two bytes.
            u8::try_from(blended).unwrap_or(u8::MAX)
        })
        .collect();
    Ok(RasterSample {
        width: foreground.width,
        height: foreground.height,
        alpha,
    })
}

fn pixel_count(width: usize, height: usize) -> Result<usize, RasterError> {
    width
        .checked_mul(height)
        .ok_or(RasterError::DimensionOverflow { width, height })
}
