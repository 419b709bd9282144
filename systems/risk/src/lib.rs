#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Hazard-proximity risk model.
//!
//! Every step of a route contributes risk according to the Manhattan distance
//! `d` to its nearest hazard: `(radius - d + 1) / (radius + 1)` while
//! `d <= radius`, and nothing beyond. A step sitting on a hazard therefore
//! contributes exactly `1.0`, and the contribution decays linearly to zero
//! just past the radius.

use saferoute_core::Cell;
use saferoute_grid::HazardSet;

/// Scores routes against a fixed set of hazards and decay radius.
#[derive(Clone, Copy, Debug)]
pub struct RiskScorer<'a> {
    hazards: &'a HazardSet,
    radius: i64,
}

impl<'a> RiskScorer<'a> {
    /// Creates a scorer for the provided hazards and decay radius.
    #[must_use]
    pub fn new(hazards: &'a HazardSet, radius: i64) -> Self {
        Self { hazards, radius }
    }

    /// Reports whether every route scores exactly zero.
    #[must_use]
    pub fn is_inert(&self) -> bool {
        self.radius <= 0 || self.hazards.is_empty()
    }

    /// Sums the per-step risk contributions of a route.
    ///
    /// A non-positive radius or an empty hazard set scores `0.0` without
    /// visiting the route.
    #[must_use]
    pub fn score(&self, cells: &[Cell]) -> f64 {
        if self.is_inert() {
            return 0.0;
        }

        cells.iter().map(|cell| self.contribution(*cell)).sum()
    }

    /// Risk contributed by a single step.
    #[must_use]
    pub fn contribution(&self, cell: Cell) -> f64 {
        let Ok(radius) = u64::try_from(self.radius) else {
            return 0.0;
        };
        if radius == 0 {
            return 0.0;
        }

        match self.nearest_distance(cell) {
            Some(distance) if distance <= radius => {
                (radius - distance + 1) as f64 / (radius as f64 + 1.0)
            }
            _ => 0.0,
        }
    }

    /// Manhattan distance from the cell to its nearest hazard.
    ///
    /// The scan stops at the first hazard the cell sits on, since no distance
    /// can beat zero.
    #[must_use]
    pub fn nearest_distance(&self, cell: Cell) -> Option<u64> {
        let mut best: Option<u64> = None;
        for hazard in self.hazards.cells() {
            let distance = cell.manhattan_distance(*hazard);
            if best.map_or(true, |current| distance < current) {
                best = Some(distance);
                if distance == 0 {
                    break;
                }
            }
        }
        best
    }
}
