//! Game state and core simulation types
//!
//! The whole session (phase, score, lives, entities, RNG) lives in
//! [`GameState`], owned by the frame driver.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::rect::Rect;
use crate::tuning::Tuning;
use crate::{clamp_span, clamp_velocity};

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Title screen, waiting for the start trigger
    Menu,
    /// Active gameplay
    Playing,
    /// All lives lost
    GameOver,
    /// Every brick destroyed
    Win,
}

impl GamePhase {
    /// Menu, GameOver and Win all wait for an explicit (re)start
    pub fn awaits_start(self) -> bool {
        !matches!(self, GamePhase::Playing)
    }
}

/// Side effects produced by a simulation tick, consumed by audio/HUD adapters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Ball reflected off a side wall or the ceiling
    WallBounce,
    /// Ball reflected off the paddle
    PaddleBounce,
    /// A brick was destroyed
    BrickBreak { row: usize, col: usize },
    /// Ball fell below the paddle line
    LifeLost,
    /// Last life lost
    GameOver,
    /// Last brick destroyed
    Win,
    /// A game was started from a menu or end screen
    UiBlip,
}

/// Ball state - in play or waiting off the field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallState {
    Active,
    OutOfPlay,
}

/// The ball
#[derive(Debug, Clone)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub state: BallState,
}

impl Ball {
    pub fn new(radius: f32) -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            radius,
            state: BallState::OutOfPlay,
        }
    }

    pub fn is_active(&self) -> bool {
        self.state == BallState::Active
    }

    /// Put the ball back at the reset point with a fresh random dx
    pub fn respawn(&mut self, tuning: &Tuning, rng: &mut Pcg32) {
        let spread = tuning.ball_reset_spread;
        let dx = if spread > 0.0 {
            rng.random_range(-spread..spread)
        } else {
            0.0
        };
        self.pos = tuning.reset_position();
        self.vel = clamp_velocity(
            Vec2::new(dx, -tuning.ball_reset_speed),
            tuning.ball_max_speed,
        );
        self.state = BallState::Active;
    }

    /// Take the ball off the field
    pub fn retire(&mut self) {
        self.vel = Vec2::ZERO;
        self.state = BallState::OutOfPlay;
    }
}

/// The player's paddle
#[derive(Debug, Clone)]
pub struct Paddle {
    /// Left edge (pixels)
    pub x: f32,
    /// Top edge (pixels), fixed for the session
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Paddle {
    /// Paddle centered horizontally at its resting height
    pub fn centered(tuning: &Tuning) -> Self {
        Self {
            x: (tuning.field_width - tuning.paddle_width) / 2.0,
            y: tuning.paddle_y,
            width: tuning.paddle_width,
            height: tuning.paddle_height,
        }
    }

    /// The paddle as a rectangle for collision detection
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Move the left edge, keeping the paddle inside the field
    pub fn set_left(&mut self, x: f32, field_width: f32) {
        self.x = clamp_span(x, self.width, field_width);
    }

    /// Center the paddle on `x`, keeping it inside the field
    pub fn center_on(&mut self, x: f32, field_width: f32) {
        self.set_left(x - self.width / 2.0, field_width);
    }

    /// Shift the paddle by `dx`, keeping it inside the field
    pub fn nudge(&mut self, dx: f32, field_width: f32) {
        self.set_left(self.x + dx, field_width);
    }
}

/// Brick status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BrickStatus {
    #[default]
    Intact,
    Destroyed,
}

/// One cell of the brick grid
#[derive(Debug, Clone)]
pub struct Brick {
    pub row: usize,
    pub col: usize,
    pub rect: Rect,
    pub status: BrickStatus,
}

impl Brick {
    pub fn is_intact(&self) -> bool {
        self.status == BrickStatus::Intact
    }
}

/// Fixed rows x cols grid, stored row-major
#[derive(Debug, Clone)]
pub struct BrickGrid {
    rows: usize,
    cols: usize,
    bricks: Vec<Brick>,
    destroyed: usize,
}

impl BrickGrid {
    /// Lay out a fresh grid of intact bricks
    pub fn new(tuning: &Tuning) -> Self {
        let mut bricks = Vec::with_capacity(tuning.brick_count());
        for row in 0..tuning.rows {
            for col in 0..tuning.cols {
                let x = col as f32 * (tuning.brick_width + tuning.brick_padding_x)
                    + tuning.brick_offset_x;
                let y = row as f32 * (tuning.brick_height + tuning.brick_padding_y)
                    + tuning.brick_offset_y;
                bricks.push(Brick {
                    row,
                    col,
                    rect: Rect::new(x, y, tuning.brick_width, tuning.brick_height),
                    status: BrickStatus::Intact,
                });
            }
        }
        Self {
            rows: tuning.rows,
            cols: tuning.cols,
            bricks,
            destroyed: 0,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total bricks, destroyed or not
    pub fn total(&self) -> usize {
        self.bricks.len()
    }

    pub fn destroyed_count(&self) -> usize {
        self.destroyed
    }

    pub fn is_cleared(&self) -> bool {
        self.destroyed == self.bricks.len()
    }

    /// Brick at (row, col), if inside the grid
    pub fn get(&self, row: usize, col: usize) -> Option<&Brick> {
        if row < self.rows && col < self.cols {
            self.bricks.get(row * self.cols + col)
        } else {
            None
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Brick> {
        self.bricks.iter()
    }

    /// Index of the first intact brick whose open rectangle contains `point`
    pub fn first_hit(&self, point: Vec2) -> Option<usize> {
        self.bricks
            .iter()
            .position(|b| b.is_intact() && b.rect.contains_open(point))
    }

    /// Mark a brick destroyed. Returns its (row, col) if it was intact.
    pub fn destroy(&mut self, index: usize) -> Option<(usize, usize)> {
        let brick = self.bricks.get_mut(index)?;
        if !brick.is_intact() {
            return None;
        }
        brick.status = BrickStatus::Destroyed;
        self.destroyed += 1;
        Some((brick.row, brick.col))
    }
}

/// Complete game session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the session RNG was created from
    pub seed: u64,
    rng: Pcg32,
    /// Numeric rules in force
    pub tuning: Tuning,
    /// Current phase
    pub phase: GamePhase,
    /// Bricks destroyed this game
    pub score: u64,
    /// Remaining lives
    pub lives: u8,
    pub ball: Ball,
    pub paddle: Paddle,
    pub bricks: BrickGrid,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Games started this session
    pub games_started: u32,
}

impl GameState {
    /// Create a new session in the menu with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// Create a new session in the menu
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let tuning = tuning.sanitized();
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Menu,
            score: 0,
            lives: tuning.starting_lives,
            ball: Ball::new(tuning.ball_radius),
            paddle: Paddle::centered(&tuning),
            bricks: BrickGrid::new(&tuning),
            time_ticks: 0,
            games_started: 0,
            tuning,
        }
    }

    /// Begin a fresh game: new grid, score and lives reset, ball served
    pub fn start_game(&mut self) {
        self.bricks = BrickGrid::new(&self.tuning);
        self.score = 0;
        self.lives = self.tuning.starting_lives;
        self.paddle = Paddle::centered(&self.tuning);
        self.ball = Ball::new(self.tuning.ball_radius);
        self.ball.respawn(&self.tuning, &mut self.rng);
        self.phase = GamePhase::Playing;
        self.games_started += 1;
        log::info!(
            "Game {} started ({} bricks, {} lives)",
            self.games_started,
            self.bricks.total(),
            self.lives
        );
    }

    /// Serve a new ball after a lost life
    pub fn respawn_ball(&mut self) {
        self.ball.respawn(&self.tuning, &mut self.rng);
    }

    pub fn bricks_remaining(&self) -> usize {
        self.bricks.total() - self.bricks.destroyed_count()
    }
}
