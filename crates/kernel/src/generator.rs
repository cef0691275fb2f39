use labyrinth_common::{Direction, GridPoint};
use rand::Rng;

use crate::grid::CellGrid;
use crate::maze::{DenseMaze, KernelError};

/// Carver state. `Done` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenState {
    Carving,
    Backtracking,
    Done,
}

/// Output of a finished carve, before texturing and bordering.
#[derive(Debug, Clone)]
pub struct Carved {
    pub grid: CellGrid,
    /// Raw dense form: `RAW_WALL` or `OPEN` only.
    pub dense: DenseMaze,
    /// Entry in dense coordinates, always on row 0.
    pub entry: GridPoint,
    /// Exit in dense coordinates, on the east, south or west boundary.
    pub exit: GridPoint,
    pub exit_side: Direction,
}

/// Randomized depth-first carver over a `CellGrid`.
///
/// Starts at a random column of the north edge and carves until every
/// cell has been visited, backtracking along the logged directions
/// whenever it gets boxed in. The result is a spanning tree.
pub struct Generator<R> {
    grid: CellGrid,
    rng: R,
    log: Vec<Direction>,
    current: GridPoint,
    entry_column: usize,
    remaining: usize,
    state: GenState,
}

impl<R: Rng> Generator<R> {
    pub fn new(width: usize, height: usize, mut rng: R) -> Result<Self, KernelError> {
        if width == 0 || height == 0 {
            return Err(KernelError::EmptyGrid { width, height });
        }
        let mut grid = CellGrid::new(width, height);
        let entry_column = rng.gen_range(0..width);
        let start = GridPoint::new(entry_column, 0);
        grid.break_wall(Direction::North, start);
        grid.mark_visited(start);

        let remaining = width * height - 1;
        Ok(Self {
            grid,
            rng,
            log: Vec::new(),
            current: start,
            entry_column,
            remaining,
            state: if remaining == 0 {
                GenState::Done
            } else {
                GenState::Carving
            },
        })
    }

    pub fn state(&self) -> GenState {
        self.state
    }

    pub fn current(&self) -> GridPoint {
        self.current
    }

    pub fn grid(&self) -> &CellGrid {
        &self.grid
    }

    /// Cells not yet reached by a carved passage.
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Advance the state machine by one transition.
    pub fn step(&mut self) -> GenState {
        match self.state {
            GenState::Done => {}
            GenState::Carving => self.carve(),
            GenState::Backtracking => self.backtrack(),
        }
        self.state
    }

    fn carve(&mut self) {
        let options = self.grid.unvisited_directions(self.current);
        let dir = match options.as_slice() {
            [] => {
                self.state = GenState::Backtracking;
                return;
            }
            [only] => *only,
            _ => options[self.rng.gen_range(0..options.len())],
        };
        let Some(next) = self.grid.move_through(dir, self.current) else {
            self.state = GenState::Backtracking;
            return;
        };
        self.log.push(dir);
        self.current = next;
        self.remaining -= 1;
        if self.remaining == 0 {
            self.state = GenState::Done;
        }
    }

    fn backtrack(&mut self) {
        let mut steps = 0usize;
        while self.grid.remaining_paths(self.current) == 0 {
            let Some(dir) = self.log.pop() else { break };
            match self.current.step(dir.opposite()) {
                Some(prev) => self.current = prev,
                None => break,
            }
            steps += 1;
        }
        tracing::trace!(steps, at = ?self.current, "backtracked");

        self.state = if self.remaining == 0 || self.grid.remaining_paths(self.current) == 0 {
            GenState::Done
        } else {
            GenState::Carving
        };
    }

    /// Carve to completion, then open the exit and expand to dense form.
    pub fn run(mut self) -> Carved {
        let (width, height) = (self.grid.width(), self.grid.height());
        let _span = tracing::debug_span!("generate_maze", width, height).entered();

        while self.step() != GenState::Done {}

        // The exit never shares the entry's north edge.
        let exit_side = [Direction::East, Direction::South, Direction::West]
            [self.rng.gen_range(0..3)];
        let (cell, exit) = match exit_side {
            Direction::East => {
                let y = self.rng.gen_range(0..height);
                (GridPoint::new(width - 1, y), GridPoint::new(2 * width, 2 * y + 1))
            }
            Direction::South => {
                let x = self.rng.gen_range(0..width);
                (GridPoint::new(x, height - 1), GridPoint::new(2 * x + 1, 2 * height))
            }
            Direction::West | Direction::North => {
                let y = self.rng.gen_range(0..height);
                (GridPoint::new(0, y), GridPoint::new(0, 2 * y + 1))
            }
        };
        self.grid.break_wall(exit_side, cell);

        let entry = GridPoint::new(2 * self.entry_column + 1, 0);
        tracing::debug!(?entry, ?exit, ?exit_side, "maze carved");

        Carved {
            dense: self.grid.to_dense(),
            grid: self.grid,
            entry,
            exit,
            exit_side,
        }
    }
}
