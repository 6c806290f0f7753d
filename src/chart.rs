//! Mapping model output onto a top-left-origin drawing surface.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A point on the drawing surface, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub x: f64,
    pub y: f64,
}

impl ChartPoint {
    pub fn new(x: f64, y: f64) -> Self {
        ChartPoint { x, y }
    }
}

/// Affine map of a (domain, computed) pair to the surface.
///
/// The vertical axis is inverted: larger computed values sit higher.
pub fn to_point(
    domain_value: f64,
    computed_value: f64,
    origin: ChartPoint,
    scale_x: f64,
    scale_y: f64,
) -> ChartPoint {
    ChartPoint {
        x: origin.x + domain_value * scale_x,
        y: origin.y - computed_value * scale_y,
    }
}

/// Drawing surface and axis scaling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    pub width: f64,
    pub height: f64,
    pub origin: ChartPoint,
    /// Pixels per unit of the domain axis.
    pub scale_x: f64,
    /// Pixels per unit of the computed axis.
    pub scale_y: f64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        ChartConfig {
            width: 600.0,
            height: 400.0,
            origin: ChartPoint::new(300.0, 200.0),
            scale_x: 40.0,
            scale_y: 4.0,
        }
    }
}

impl ChartConfig {
    pub fn map(&self, domain_value: f64, computed_value: f64) -> ChartPoint {
        to_point(
            domain_value,
            computed_value,
            self.origin,
            self.scale_x,
            self.scale_y,
        )
    }

    pub fn map_all<I>(&self, pairs: I) -> Vec<ChartPoint>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        pairs
            .into_iter()
            .map(|(domain, computed)| self.map(domain, computed))
            .collect()
    }

    /// Whether a point falls on the visible surface.
    pub fn contains(&self, point: &ChartPoint) -> bool {
        (0.0..=self.width).contains(&point.x) && (0.0..=self.height).contains(&point.y)
    }
}

/// Render points as the `points` attribute of an SVG `<polyline>`.
pub fn polyline(points: &[ChartPoint]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Slack on the last grid point so that e.g. `-8..=1.5` step `0.1` keeps
/// its endpoint despite rounding in the division.
const GRID_EPSILON: f64 = 1e-9;

/// Upper bound on the number of points a single sweep may produce.
pub const MAX_SWEEP_POINTS: usize = 1_000_000;

/// Lazy evaluation of a model over an evenly spaced domain.
///
/// Each value is computed as `start + i * step`, clamped to `end`. Cloning
/// or calling [`Sweep::restart`] yields the same sequence again.
#[derive(Debug, Clone)]
pub struct Sweep<F> {
    start: f64,
    end: f64,
    step: f64,
    len: usize,
    index: usize,
    model: F,
}

/// Sweep `model` from `start` to `end` (inclusive when on the grid).
///
/// An `end` below `start` gives an empty sweep. A non-positive or
/// non-finite step, non-finite bounds, or a grid of more than
/// [`MAX_SWEEP_POINTS`] points is rejected.
pub fn produce_sweep<F>(model: F, start: f64, end: f64, step: f64) -> Result<Sweep<F>>
where
    F: Fn(f64) -> f64,
{
    let invalid = |reason| Error::InvalidSweep {
        start,
        end,
        step,
        reason,
    };

    if !start.is_finite() || !end.is_finite() {
        return Err(invalid("bounds must be finite"));
    }
    if !step.is_finite() || step <= 0.0 {
        return Err(invalid("step must be positive"));
    }

    let len = if end < start {
        0
    } else {
        let intervals = ((end - start) / step + GRID_EPSILON).floor();
        if !intervals.is_finite() || intervals >= MAX_SWEEP_POINTS as f64 {
            return Err(invalid("too many points"));
        }
        (intervals as usize)
            .checked_add(1)
            .ok_or_else(|| invalid("too many points"))?
    };

    Ok(Sweep {
        start,
        end,
        step,
        len,
        index: 0,
        model,
    })
}

impl<F> Sweep<F>
where
    F: Fn(f64) -> f64,
{
    pub fn domain_at(&self, index: usize) -> f64 {
        (self.start + index as f64 * self.step).min(self.end)
    }

    /// A fresh copy positioned at the first point.
    pub fn restart(&self) -> Self
    where
        F: Clone,
    {
        Sweep {
            index: 0,
            model: self.model.clone(),
            ..*self
        }
    }
}

impl<F> Iterator for Sweep<F>
where
    F: Fn(f64) -> f64,
{
    type Item = (f64, f64);

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.len {
            return None;
        }
        let domain = self.domain_at(self.index);
        self.index += 1;
        Some((domain, (self.model)(domain)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.index;
        (remaining, Some(remaining))
    }
}

impl<F> ExactSizeIterator for Sweep<F> where F: Fn(f64) -> f64 {}
