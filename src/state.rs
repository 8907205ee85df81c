use crate::{Cell, GridInt};

use rand::{rngs::StdRng, Rng, SeedableRng};
use Heading::*;
use RunState::*;

/// The direction the head will move on the next step.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Heading {
    Up,
    Down,
    Left,
    Right,
}

impl Heading {
    pub fn delta(self) -> Cell {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum RunState {
    Idle,
    Running,
    Paused,
    GameOver,
}

/// Everything the simulation can be told from outside.
#[derive(Copy, Clone)]
pub struct Config {
    pub width: GridInt,
    pub height: GridInt,
    pub tick_ms: u64,
    pub start_cell: Cell,
    pub start_food: Cell,
    pub start_heading: Heading,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            width: 20,
            height: 20,
            tick_ms: 200,
            start_cell: (10, 10),
            start_food: (15, 15),
            start_heading: Right,
        }
    }
}

/// Read-only copy of the observable state, handed to the renderer after
/// every step and every command.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Snapshot {
    pub snake: Vec<Cell>,
    pub food: Cell,
    pub score: u32,
    pub state: RunState,
}

/// The whole simulation: snake body (head first), food cell, score and
/// run state, advanced one discrete step at a time by `tick`.
///
/// The simulation holds no timer; the host clock decides when to call
/// `tick`, and key events may overwrite the latched heading at any point
/// in between. Whatever heading is latched when `tick` runs is the one
/// used for that step.
pub struct GameState {
    config: Config,
    snake: Vec<Cell>,
    food: Cell,
    heading: Heading,
    score: u32,
    state: RunState,
    rng: StdRng,
}

impl GameState {
    pub fn new(config: Config) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    fn with_rng(config: Config, rng: StdRng) -> Self {
        GameState {
            config,
            snake: vec![config.start_cell],
            food: config.start_food,
            heading: config.start_heading,
            score: 0,
            state: Idle,
            rng,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn run_state(&self) -> RunState {
        self.state
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            snake: self.snake.clone(),
            food: self.food,
            score: self.score,
            state: self.state,
        }
    }

    /// Latches a new heading for the next step. Last write wins; a 180°
    /// reversal is accepted and will run the head into the neck on the
    /// next step.
    pub fn set_heading(&mut self, heading: Heading) {
        self.heading = heading;
    }

    /// Advances the simulation one step. Does nothing unless running.
    pub fn tick(&mut self) -> Snapshot {
        if self.state != Running {
            return self.snapshot();
        }

        let (hx, hy) = self.snake[0];
        let (dx, dy) = self.heading.delta();
        let new_head = (hx + dx, hy + dy);

        // The body check runs against the pre-move body, so the cell the
        // tail is about to vacate still counts as occupied.
        if self.hits_boundary(new_head) || self.snake.contains(&new_head) {
            self.state = GameOver;
            return self.snapshot();
        }

        self.snake.insert(0, new_head);

        if new_head == self.food {
            self.food = self.spawn_food();
            self.score += 1;
        } else {
            self.snake.pop();
        }

        self.snapshot()
    }

    /// Fresh payload, clock running.
    pub fn start(&mut self) -> Snapshot {
        self.reinit(Running)
    }

    /// Fresh payload, clock stopped.
    pub fn reset(&mut self) -> Snapshot {
        self.reinit(Idle)
    }

    pub fn pause(&mut self) -> Snapshot {
        if self.state == Running {
            self.state = Paused;
        }
        self.snapshot()
    }

    pub fn resume(&mut self) -> Snapshot {
        if self.state == Paused {
            self.state = Running;
        }
        self.snapshot()
    }

    ///////////////////////////////////////////////////////////////////////////

    fn reinit(&mut self, state: RunState) -> Snapshot {
        self.snake = vec![self.config.start_cell];
        self.food = self.config.start_food;
        self.heading = self.config.start_heading;
        self.score = 0;
        self.state = state;
        self.snapshot()
    }

    fn hits_boundary(&self, (x, y): Cell) -> bool {
        x < 0 || x >= self.config.width || y < 0 || y >= self.config.height
    }

    // Uniform over the whole grid: the new food cell may land on the
    // snake's body, where it sits uncollectable until the snake moves off.
    fn spawn_food(&mut self) -> Cell {
        let x = self.rng.gen_range(0..self.config.width);
        let y = self.rng.gen_range(0..self.config.height);
        (x, y)
    }
}
