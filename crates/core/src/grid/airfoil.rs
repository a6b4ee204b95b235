//! NACA 4-digit airfoil generation and rasterization
//!
//! Converts a four-digit code plus a pose into solid cells of an [`ObstacleGrid`].
//!
//! # Geometry
//!
//! Stations along the chord use cosine spacing, `x = (1 - cos β) / 2` for
//! `β ∈ [0, π]`, which clusters points at the leading and trailing edges. Thickness
//! follows the standard NACA polynomial
//!
//! ```text
//! y_t = 5t (0.2969 √x − 0.1260 x − 0.3516 x² + 0.2843 x³ − 0.1015 x⁴)
//! ```
//!
//! and the surfaces are the camber line offset by `±y_t` along its local normal.
//!
//! # Example
//!
//! ```
//! use airflow_sim_core::grid::{airfoil, ObstacleGrid};
//! use airflow_sim_core::Vec2;
//!
//! let mut grid = ObstacleGrid::empty(200, 100);
//! let filled = airfoil::stamp(&mut grid, "2412", Vec2::new(100.0, 50.0), 60.0, 4.0);
//! assert!(filled > 0);
//! assert_eq!(grid.solid_count(), filled);
//! ```

use super::obstacle::ObstacleGrid;
use crate::core_types::Vec2;
use std::f32::consts::PI;
use tracing::{info, warn};

/// Code used when the requested one cannot be parsed
pub const DEFAULT_CODE: &str = "0012";

/// Stations sampled along the chord when no count is given
pub const DEFAULT_SAMPLES: usize = 100;

/// Fraction of the chord, from the leading edge, about which the profile is rotated
pub const PIVOT_CHORD_FRACTION: f32 = 0.25;

/// Parsed NACA 4-digit parameters, all as fractions of the chord
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Naca4 {
    /// Maximum camber (first digit / 100)
    pub max_camber: f32,
    /// Chordwise position of maximum camber (second digit / 10)
    pub camber_position: f32,
    /// Maximum thickness (last two digits / 100)
    pub thickness: f32,
}

impl Naca4 {
    /// Parse a code of exactly four ASCII digits (surrounding whitespace ignored)
    #[must_use]
    pub fn parse(code: &str) -> Option<Self> {
        let code = code.trim();
        let bytes = code.as_bytes();
        if bytes.len() != 4 || !bytes.iter().all(u8::is_ascii_digit) {
            return None;
        }
        let digit = |i: usize| f32::from(bytes[i] - b'0');
        Some(Self {
            max_camber: digit(0) / 100.0,
            camber_position: digit(1) / 10.0,
            thickness: (digit(2) * 10.0 + digit(3)) / 100.0,
        })
    }

    /// Parse `code`, falling back to [`DEFAULT_CODE`] when it is malformed
    #[must_use]
    pub fn parse_or_default(code: &str) -> Self {
        Self::parse(code).unwrap_or_else(|| {
            warn!(
                "Airfoil code '{}' is not a NACA 4-digit code, using {}",
                code, DEFAULT_CODE
            );
            Self::symmetric(0.12)
        })
    }

    /// Uncambered profile of the given thickness fraction
    #[must_use]
    pub fn symmetric(thickness: f32) -> Self {
        Self {
            max_camber: 0.0,
            camber_position: 0.0,
            thickness,
        }
    }

    /// Half-thickness at chord fraction `x`
    #[must_use]
    pub fn half_thickness(&self, x: f32) -> f32 {
        5.0 * self.thickness
            * (0.2969 * x.sqrt() - 0.1260 * x - 0.3516 * x.powi(2) + 0.2843 * x.powi(3)
                - 0.1015 * x.powi(4))
    }

    /// Camber line height and slope at chord fraction `x`
    ///
    /// Each branch contributes zero camber when its denominator vanishes.
    #[must_use]
    pub fn camber(&self, x: f32) -> (f32, f32) {
        let m = self.max_camber;
        let p = self.camber_position;
        if x < p {
            if p > 0.0 {
                let p2 = p * p;
                (m / p2 * (2.0 * p * x - x * x), 2.0 * m / p2 * (p - x))
            } else {
                (0.0, 0.0)
            }
        } else {
            let q2 = (1.0 - p) * (1.0 - p);
            if q2 > 0.0 {
                (
                    m / q2 * ((1.0 - 2.0 * p) + 2.0 * p * x - x * x),
                    2.0 * m / q2 * (p - x),
                )
            } else {
                (0.0, 0.0)
            }
        }
    }

    /// Sample the upper and lower surfaces at `samples` cosine-spaced stations
    ///
    /// Coordinates are scaled by `chord`, with the leading edge at the origin and the
    /// chord along +x. Fewer than two samples are raised to two.
    #[must_use]
    pub fn profile(&self, chord: f32, samples: usize) -> AirfoilProfile {
        let samples = samples.max(2);
        let mut upper = Vec::with_capacity(samples);
        let mut lower = Vec::with_capacity(samples);

        for i in 0..samples {
            let beta = PI * i as f32 / (samples - 1) as f32;
            let x = (1.0 - beta.cos()) / 2.0;
            let yt = self.half_thickness(x);
            let (yc, slope) = self.camber(x);
            let theta = slope.atan();
            let (sin_t, cos_t) = theta.sin_cos();

            upper.push(Vec2::new(x - yt * sin_t, yc + yt * cos_t) * chord);
            lower.push(Vec2::new(x + yt * sin_t, yc - yt * cos_t) * chord);
        }

        AirfoilProfile { upper, lower }
    }
}

/// Sampled airfoil surfaces, leading edge first on both
#[derive(Debug, Clone, PartialEq)]
pub struct AirfoilProfile {
    /// Upper surface points
    pub upper: Vec<Vec2>,
    /// Lower surface points
    pub lower: Vec<Vec2>,
}

impl AirfoilProfile {
    /// Closed outline: the upper surface followed by the reversed lower surface
    #[must_use]
    pub fn polygon(&self) -> Vec<Vec2> {
        self.upper
            .iter()
            .chain(self.lower.iter().rev())
            .copied()
            .collect()
    }
}

/// Generate the profile for `code`, falling back to the default profile when the code
/// is malformed
#[must_use]
pub fn generate_profile(code: &str, chord: f32, samples: usize) -> AirfoilProfile {
    Naca4::parse_or_default(code).profile(chord, samples)
}

/// Stamp an airfoil into `grid`
///
/// The quarter-chord point is placed at `center` and the profile is rotated about it
/// by `angle_degrees`. Cells inside the outline are set solid; others are left as they
/// were.
///
/// # Returns
///
/// Number of cells covered by the outline
pub fn stamp(
    grid: &mut ObstacleGrid,
    code: &str,
    center: Vec2,
    chord: f32,
    angle_degrees: f32,
) -> usize {
    let profile = generate_profile(code, chord, DEFAULT_SAMPLES);
    let (sin_a, cos_a) = angle_degrees.to_radians().sin_cos();
    let pivot = Vec2::new(PIVOT_CHORD_FRACTION * chord, 0.0);

    let outline: Vec<Vec2> = profile
        .polygon()
        .into_iter()
        .map(|p| {
            let t = p - pivot;
            Vec2::new(t.x * cos_a - t.y * sin_a, t.x * sin_a + t.y * cos_a) + center
        })
        .collect();

    let filled = fill_polygon(grid, &outline);
    info!(
        "Stamped airfoil {} at {:.1}° with {} cells",
        code.trim(),
        angle_degrees,
        filled
    );
    filled
}

/// Fill a polygon into `grid` with the even-odd rule, sampling cell centres
///
/// # Returns
///
/// Number of cells inside the polygon
pub fn fill_polygon(grid: &mut ObstacleGrid, outline: &[Vec2]) -> usize {
    if outline.len() < 3 {
        return 0;
    }
    let (width, height) = grid.dimensions();

    let (min_y, max_y) = outline
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.y), hi.max(p.y))
        });
    if !min_y.is_finite() || !max_y.is_finite() {
        return 0;
    }
    let row_start = (min_y - 0.5).ceil().max(0.0) as usize;
    let row_end = ((max_y - 0.5).floor() + 1.0).clamp(0.0, height as f32) as usize;

    let mut crossings = Vec::new();
    let mut filled = 0;

    for y in row_start..row_end {
        let sy = y as f32 + 0.5;
        crossings.clear();

        for (i, a) in outline.iter().enumerate() {
            let b = outline[(i + 1) % outline.len()];
            // Half-open rule so shared vertices are counted once
            if (a.y <= sy) != (b.y <= sy) {
                crossings.push(a.x + (sy - a.y) * (b.x - a.x) / (b.y - a.y));
            }
        }
        crossings.sort_by(f32::total_cmp);

        for span in crossings.chunks_exact(2) {
            let x_start = (span[0] - 0.5).ceil().clamp(0.0, width as f32) as usize;
            let x_end = (span[1] - 0.5).ceil().clamp(0.0, width as f32) as usize;
            for x in x_start..x_end {
                grid.set(x, y, true);
                filled += 1;
            }
        }
    }

    filled
}
