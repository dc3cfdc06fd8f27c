//! Snake engine
//!
//! The snake moves one cell per [`SnakeState::step`] in its queued direction.
//! Leaving the grid or running into its own body ends the game. Eating food
//! grows the snake by one segment, adds to the score, and shortens the step
//! interval down to a floor.
//!
//! Direction changes are queued in `next_direction` and only applied on the
//! next step, so two quick turns within one step cannot reverse the snake into
//! itself.

use std::collections::VecDeque;

use serde::Serialize;

use crate::rng::RandomSource;
use crate::types::{
    Direction, Point, DEFAULT_SNAKE_HEIGHT, DEFAULT_SNAKE_WIDTH, MAX_GRID_SIDE, SNAKE_FOOD_SCORE,
    SNAKE_INITIAL_SPEED_MS, SNAKE_MIN_SPEED_MS, SNAKE_SPEED_INCREMENT_MS,
};

/// Smallest grid side that fits the starting body
const MIN_SIDE: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnakeState {
    /// Segments, head first
    body: VecDeque<Point>,
    /// `None` only once the snake fills the grid
    food: Option<Point>,
    direction: Direction,
    next_direction: Direction,
    score: u32,
    game_over: bool,
    paused: bool,
    width: usize,
    height: usize,
    /// Milliseconds between steps
    speed_ms: u32,
}

impl SnakeState {
    /// Three segments centred on the grid, heading right, with food placed
    pub fn new<R: RandomSource + ?Sized>(width: usize, height: usize, rng: &mut R) -> Self {
        let width = width.clamp(MIN_SIDE, MAX_GRID_SIDE);
        let height = height.clamp(MIN_SIDE, MAX_GRID_SIDE);
        let cx = (width / 2) as i32;
        let cy = (height / 2) as i32;
        let body: VecDeque<Point> = (0..3).map(|i| Point::new(cx - i, cy)).collect();

        let mut state = Self {
            body,
            food: None,
            direction: Direction::Right,
            next_direction: Direction::Right,
            score: 0,
            game_over: false,
            paused: false,
            width,
            height,
            speed_ms: SNAKE_INITIAL_SPEED_MS,
        };
        state.food = state.place_food(rng);
        state
    }

    /// Game with a fixed body and food; used to set up positions directly
    pub fn with_body(
        width: usize,
        height: usize,
        body: Vec<Point>,
        direction: Direction,
        food: Option<Point>,
    ) -> Self {
        Self {
            body: body.into(),
            food,
            direction,
            next_direction: direction,
            score: 0,
            game_over: false,
            paused: false,
            width: width.clamp(MIN_SIDE, MAX_GRID_SIDE),
            height: height.clamp(MIN_SIDE, MAX_GRID_SIDE),
            speed_ms: SNAKE_INITIAL_SPEED_MS,
        }
    }

    pub fn body(&self) -> &VecDeque<Point> {
        &self.body
    }

    pub fn head(&self) -> Option<Point> {
        self.body.front().copied()
    }

    pub fn food(&self) -> Option<Point> {
        self.food
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn next_direction(&self) -> Direction {
        self.next_direction
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn speed_ms(&self) -> u32 {
        self.speed_ms
    }

    fn in_bounds(&self, p: Point) -> bool {
        p.x >= 0 && p.y >= 0 && (p.x as usize) < self.width && (p.y as usize) < self.height
    }

    /// Uniformly random cell not covered by the body
    fn place_food<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Option<Point> {
        let free: Vec<Point> = (0..self.height as i32)
            .flat_map(|y| (0..self.width as i32).map(move |x| Point::new(x, y)))
            .filter(|p| !self.body.contains(p))
            .collect();
        if free.is_empty() {
            return None;
        }
        Some(free[rng.next_below(free.len())])
    }

    /// Advance one cell in the queued direction
    pub fn step<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Self {
        if self.game_over || self.paused {
            return self.clone();
        }
        let Some(head) = self.head() else {
            return self.clone();
        };

        let new_head = head.step(self.next_direction);
        if !self.in_bounds(new_head) {
            return self.ended();
        }

        let will_eat = self.food == Some(new_head);
        // The tail moves out of the way unless the snake grows this step
        let checked = if will_eat {
            self.body.len()
        } else {
            self.body.len().saturating_sub(1)
        };
        if self.body.iter().take(checked).any(|&p| p == new_head) {
            return self.ended();
        }

        let mut next = self.clone();
        next.body.push_front(new_head);
        next.direction = self.next_direction;

        if will_eat {
            next.score += SNAKE_FOOD_SCORE;
            next.speed_ms = self
                .speed_ms
                .saturating_sub(SNAKE_SPEED_INCREMENT_MS)
                .max(SNAKE_MIN_SPEED_MS);
            next.food = next.place_food(rng);
            if next.food.is_none() {
                next.game_over = true;
            }
        } else {
            next.body.pop_back();
        }
        next
    }

    fn ended(&self) -> Self {
        let mut next = self.clone();
        next.game_over = true;
        next
    }

    /// Queue a turn; reversing onto the current heading is ignored
    pub fn set_direction(&self, direction: Direction) -> Self {
        let mut next = self.clone();
        if self.game_over || self.paused {
            return next;
        }
        if direction != self.direction.opposite() {
            next.next_direction = direction;
        }
        next
    }

    pub fn toggle_pause(&self) -> Self {
        let mut next = self.clone();
        if !self.game_over {
            next.paused = !self.paused;
        }
        next
    }
}

impl Default for SnakeState {
    fn default() -> Self {
        Self::new(
            DEFAULT_SNAKE_WIDTH,
            DEFAULT_SNAKE_HEIGHT,
            &mut crate::rng::SimpleRng::default(),
        )
    }
}
