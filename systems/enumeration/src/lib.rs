#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Bounded depth-first enumeration of simple routes.
//!
//! The search walks the walkability mask with classic backtracking, but keeps
//! its recursion on an explicit heap-allocated frame stack. Two independent
//! bounds keep the otherwise exponential search finite: a depth bound on the
//! number of moves a route may take, and a collection cap after which the
//! whole search stops at once. Neighbours are explored North, East, South,
//! West, so the discovered routes and their order are a pure function of the
//! input.

use log::{debug, trace};
use saferoute_core::{Cell, Direction, Path};
use saferoute_grid::WalkabilityMask;

/// Limits applied to a single enumeration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchBounds {
    /// Number of completed routes after which the search stops.
    pub cap: usize,
    /// Largest number of moves a route may take from the start cell.
    pub max_depth: usize,
}

/// Routes discovered by one enumeration, in discovery order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Enumeration {
    paths: Vec<Path>,
    reached_cap: bool,
}

impl Enumeration {
    /// Routes in the order the search completed them.
    #[must_use]
    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    /// Number of routes found.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Reports whether no route was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Reports whether the search stopped because the cap was reached.
    #[must_use]
    pub fn reached_cap(&self) -> bool {
        self.reached_cap
    }

    /// Consumes the enumeration, yielding the routes.
    #[must_use]
    pub fn into_paths(self) -> Vec<Path> {
        self.paths
    }
}

/// Depth-first enumerator of simple routes between two cells.
#[derive(Clone, Copy, Debug)]
pub struct PathEnumerator {
    bounds: SearchBounds,
}

impl PathEnumerator {
    /// Creates an enumerator applying the provided bounds.
    #[must_use]
    pub fn new(bounds: SearchBounds) -> Self {
        Self { bounds }
    }

    /// Bounds applied by the enumerator.
    #[must_use]
    pub fn bounds(&self) -> SearchBounds {
        self.bounds
    }

    /// Collects simple routes from `start` to `goal` over the mask.
    ///
    /// Out-of-bounds or blocked endpoints produce an empty enumeration. When
    /// `start == goal` the single-cell route is the only candidate. Reaching the
    /// cap is a normal outcome reported through [`Enumeration::reached_cap`].
    #[must_use]
    pub fn enumerate(&self, mask: &WalkabilityMask, start: Cell, goal: Cell) -> Enumeration {
        if self.bounds.cap == 0 {
            return Enumeration::default();
        }

        let Some(start_offset) = walkable_offset(mask, start) else {
            debug!("start {start:?} is outside the grid or blocked");
            return Enumeration::default();
        };
        if walkable_offset(mask, goal).is_none() {
            debug!("goal {goal:?} is outside the grid or blocked");
            return Enumeration::default();
        }

        let mut search = Search::new(mask, goal);
        search.enter(start, start_offset);

        let mut reached_cap = false;
        loop {
            if search.paths.len() >= self.bounds.cap {
                reached_cap = true;
                break;
            }

            let Some(frame) = search.frames.last_mut() else {
                break;
            };

            match Direction::ALL.get(frame.cursor).copied() {
                Some(direction) => {
                    frame.cursor += 1;
                    let current = frame.cell;
                    search.extend(current, direction, self.bounds.max_depth);
                }
                None => search.leave(),
            }
        }

        search.unwind();
        debug!(
            "enumerated {} routes from {start:?} to {goal:?} (cap reached: {reached_cap})",
            search.paths.len()
        );

        Enumeration {
            paths: search.paths,
            reached_cap,
        }
    }
}

/// Backtracking state owned by a single enumeration call.
struct Search<'a> {
    mask: &'a WalkabilityMask,
    goal: Cell,
    visited: Vec<bool>,
    path: Vec<Cell>,
    frames: Vec<Frame>,
    paths: Vec<Path>,
}

/// Cell on the current route together with the next direction to try.
struct Frame {
    cell: Cell,
    offset: usize,
    cursor: usize,
}

impl<'a> Search<'a> {
    fn new(mask: &'a WalkabilityMask, goal: Cell) -> Self {
        Self {
            mask,
            goal,
            visited: vec![false; mask.cell_count()],
            path: Vec::new(),
            frames: Vec::new(),
            paths: Vec::new(),
        }
    }

    fn extend(&mut self, current: Cell, direction: Direction, max_depth: usize) {
        let Some(next) = current.step(direction) else {
            return;
        };
        let Some(offset) = walkable_offset(self.mask, next) else {
            return;
        };
        if self.visited[offset] {
            return;
        }

        // The next cell sits `path.len()` moves away from the start.
        if self.path.len() > max_depth {
            return;
        }

        self.enter(next, offset);
    }

    fn enter(&mut self, cell: Cell, offset: usize) {
        self.visited[offset] = true;
        self.path.push(cell);

        let cursor = if cell == self.goal {
            trace!("route #{} found with {} cells", self.paths.len(), self.path.len());
            self.paths.push(Path::from_cells(self.path.clone()));
            Direction::ALL.len()
        } else {
            0
        };

        self.frames.push(Frame {
            cell,
            offset,
            cursor,
        });
    }

    fn leave(&mut self) {
        if let Some(frame) = self.frames.pop() {
            let _ = self.path.pop();
            self.visited[frame.offset] = false;
        }
    }

    fn unwind(&mut self) {
        while !self.frames.is_empty() {
            self.leave();
        }

        debug_assert!(self.path.is_empty());
        debug_assert!(self.visited.iter().all(|visited| !visited));
    }
}

fn walkable_offset(mask: &WalkabilityMask, cell: Cell) -> Option<usize> {
    if mask.is_walkable(cell) {
        mask.index(cell)
    } else {
        None
    }
}
