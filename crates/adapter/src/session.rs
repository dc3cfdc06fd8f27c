//! One driver session: the live game states plus the injected randomness and clock
//!
//! A game starts the first time a command names it, using the configured
//! dimensions. Observing a game that was never started is a `no_game` error.

use serde::Serialize;
use tracing::{debug, info, warn};

use arcade_core::blackjack::{hand_value, BlackjackPhase, BlackjackState, Card, RoundOutcome};
use arcade_core::clock::{Clock, SystemClock};
use arcade_core::life::{self, LifeSpeed, LifeState, DEFAULT_DENSITY, DEFAULT_PATTERN_OFFSET};
use arcade_core::minesweeper::{self, Cell, MinesweeperState, MinesweeperStatus};
use arcade_core::rng::{RandomSource, SystemRng};
use arcade_core::snake::SnakeState;
use arcade_core::tetris::TetrisState;

use crate::config::AdapterConfig;
use crate::error::{AdapterError, ProtocolError};
use crate::protocol::*;

/// Upper bound on generations advanced by a single `life` `step` command
pub const MAX_LIFE_STEPS: u32 = 10_000;

pub struct Session<R = SystemRng, C = SystemClock> {
    config: AdapterConfig,
    rng: R,
    clock: C,
    minesweeper: Option<MinesweeperState>,
    tetris: Option<TetrisState>,
    snake: Option<SnakeState>,
    life: Option<LifeState>,
    blackjack: Option<BlackjackState>,
}

impl Session {
    /// Session with the configured seed (or OS entropy) and the system clock
    pub fn new(config: AdapterConfig) -> Self {
        let rng = SystemRng::from_seed_or_entropy(config.seed);
        Self::with_sources(config, rng, SystemClock)
    }
}

impl<R: RandomSource, C: Clock> Session<R, C> {
    pub fn with_sources(config: AdapterConfig, rng: R, clock: C) -> Self {
        Self {
            config,
            rng,
            clock,
            minesweeper: None,
            tetris: None,
            snake: None,
            life: None,
            blackjack: None,
        }
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    pub fn is_started(&self, game: GameKind) -> bool {
        match game {
            GameKind::Minesweeper => self.minesweeper.is_some(),
            GameKind::Tetris => self.tetris.is_some(),
            GameKind::Snake => self.snake.is_some(),
            GameKind::Life => self.life.is_some(),
            GameKind::Blackjack => self.blackjack.is_some(),
        }
    }

    /// Answer one input line. Only encoding failures are returned as errors;
    /// everything the client got wrong becomes an `error` message.
    pub fn handle_line(&mut self, line: &str) -> Result<Outbound, AdapterError> {
        let parsed = match parse_message(line) {
            Ok(parsed) => parsed,
            Err(e) => {
                let seq = extract_seq_best_effort(line).unwrap_or(0);
                return Ok(reject(seq, ProtocolError::from(e)));
            }
        };

        match parsed {
            ParsedMessage::Hello(hello) => {
                let client = hello.client.as_ref().map(|c| c.name.as_str()).unwrap_or("anonymous");
                info!(seq = hello.seq, client, "hello");
                Ok(Outbound::Welcome(create_welcome(
                    hello.seq,
                    &self.config.protocol_version,
                )))
            }
            ParsedMessage::Command(cmd) => {
                let game = cmd.command.game();
                debug!(seq = cmd.seq, game = game.as_str(), command = ?cmd.command, "command");
                if let Err(e) = self.apply(cmd.command) {
                    return Ok(reject(cmd.seq, e));
                }
                self.observation(cmd.seq, game)
            }
            ParsedMessage::Observe(obs) => {
                debug!(seq = obs.seq, game = obs.game.as_str(), "observe");
                self.observation(obs.seq, obs.game)
            }
            ParsedMessage::Unknown(unknown) => Ok(reject(
                unknown.seq,
                ProtocolError::InvalidCommand(format!(
                    "unknown message type `{}`",
                    unknown.msg_type
                )),
            )),
        }
    }

    /// Run one command against its game, starting the game if needed
    pub fn apply(&mut self, command: GameCommand) -> Result<(), ProtocolError> {
        match command {
            GameCommand::Minesweeper(cmd) => self.apply_minesweeper(cmd),
            GameCommand::Tetris(cmd) => self.apply_tetris(cmd),
            GameCommand::Snake(cmd) => self.apply_snake(cmd),
            GameCommand::Life(cmd) => self.apply_life(cmd)?,
            GameCommand::Blackjack(cmd) => self.apply_blackjack(cmd),
        }
        Ok(())
    }

    fn apply_minesweeper(&mut self, cmd: MinesweeperCommand) {
        let config = &self.config;
        let state = self.minesweeper.get_or_insert_with(|| {
            info!(game = "minesweeper", "new game");
            minesweeper::create_initial_state(
                config.minesweeper_width,
                config.minesweeper_height,
                config.minesweeper_mines,
            )
        });
        let was_over = state.status().is_over();
        *state = match cmd {
            MinesweeperCommand::Reveal { x, y } => {
                minesweeper::reveal_cell(state, x, y, &mut self.rng, &self.clock)
            }
            MinesweeperCommand::Flag { x, y } => minesweeper::toggle_flag(state, x, y),
            MinesweeperCommand::Reset {
                width,
                height,
                mines,
            } => {
                let next = minesweeper::reset_game(
                    width.unwrap_or(config.minesweeper_width),
                    height.unwrap_or(config.minesweeper_height),
                    mines.unwrap_or(config.minesweeper_mines),
                );
                info!(
                    game = "minesweeper",
                    width = next.width(),
                    height = next.height(),
                    mines = next.mines(),
                    "new game"
                );
                next
            }
        };
        if state.status().is_over() && !was_over {
            info!(game = "minesweeper", status = ?state.status(), "game over");
        }
    }

    fn apply_tetris(&mut self, cmd: TetrisCommand) {
        let rng = &mut self.rng;
        let state = self.tetris.get_or_insert_with(|| {
            info!(game = "tetris", "new game");
            TetrisState::new(&mut *rng)
        });
        let was_over = state.game_over();
        *state = match cmd {
            TetrisCommand::Action(action) => state.apply_action(action, &mut *rng),
            TetrisCommand::Tick => state.tick(&mut *rng),
        };
        if let Some(clear) = state.last_clear() {
            debug!(game = "tetris", rows = ?clear.rows, points = clear.points, "lines cleared");
        }
        if state.game_over() && !was_over {
            info!(game = "tetris", score = state.score(), lines = state.lines(), "game over");
        }
    }

    fn apply_snake(&mut self, cmd: SnakeCommand) {
        let (width, height) = (self.config.snake_width, self.config.snake_height);
        let rng = &mut self.rng;
        let state = self.snake.get_or_insert_with(|| {
            info!(game = "snake", "new game");
            SnakeState::new(width, height, &mut *rng)
        });
        let was_over = state.game_over();
        *state = match cmd {
            SnakeCommand::Direction { direction } => state.set_direction(direction),
            SnakeCommand::Step => state.step(&mut *rng),
            SnakeCommand::Pause => state.toggle_pause(),
            SnakeCommand::Reset => {
                info!(game = "snake", "new game");
                SnakeState::new(width, height, &mut *rng)
            }
        };
        if state.game_over() && !was_over {
            info!(game = "snake", score = state.score(), "game over");
        }
    }

    fn apply_life(&mut self, cmd: LifeCommand) -> Result<(), ProtocolError> {
        let (width, height) = (self.config.life_width, self.config.life_height);
        let state = self.life.get_or_insert_with(|| {
            info!(game = "life", "new game");
            LifeState::new(width, height)
        });
        *state = match cmd {
            LifeCommand::Step { generations } => {
                let mut next = state.clone();
                for _ in 0..generations.min(MAX_LIFE_STEPS) {
                    next = next.step();
                }
                next
            }
            LifeCommand::Toggle { x, y } => state.toggle_cell(x, y),
            LifeCommand::Clear => state.clear(),
            LifeCommand::Randomize { density } => {
                state.randomize(density.unwrap_or(DEFAULT_DENSITY), &mut self.rng)
            }
            LifeCommand::Pattern { name, x, y } => {
                let pattern = life::pattern(&name).ok_or_else(|| {
                    ProtocolError::InvalidCommand(format!("unknown pattern `{}`", name))
                })?;
                state.apply_pattern(
                    pattern,
                    x.unwrap_or(DEFAULT_PATTERN_OFFSET),
                    y.unwrap_or(DEFAULT_PATTERN_OFFSET),
                )
            }
            LifeCommand::Speed { speed } => {
                let speed = LifeSpeed::from_str(&speed).ok_or_else(|| {
                    ProtocolError::InvalidCommand(format!("unknown speed `{}`", speed))
                })?;
                state.set_speed(speed)
            }
            LifeCommand::Run => state.toggle_running(),
        };
        Ok(())
    }

    fn apply_blackjack(&mut self, cmd: BlackjackCommand) {
        let rng = &mut self.rng;
        let state = self.blackjack.get_or_insert_with(|| {
            info!(game = "blackjack", "new game");
            BlackjackState::new(&mut *rng)
        });
        *state = match cmd {
            BlackjackCommand::Bet { amount } => state.place_bet(amount),
            BlackjackCommand::ClearBet => state.clear_bet(),
            BlackjackCommand::Deal => state.deal(&mut *rng),
            BlackjackCommand::Hit => state.hit(),
            BlackjackCommand::Stand => state.stand(),
            BlackjackCommand::NewRound => state.new_round(),
            BlackjackCommand::Reset => {
                info!(game = "blackjack", "new game");
                BlackjackState::new(&mut *rng)
            }
        };
        if let Some(outcome) = state.outcome() {
            debug!(game = "blackjack", ?outcome, chips = state.chips(), "round settled");
        }
    }

    /// Serialized view of one game, `None` if it was never started
    pub fn state_json(&self, game: GameKind) -> Result<Option<serde_json::Value>, serde_json::Error> {
        let value = match game {
            GameKind::Minesweeper => self
                .minesweeper
                .as_ref()
                .map(|s| serde_json::to_value(MinesweeperView::new(s, self.clock.now_ms()))),
            GameKind::Tetris => self
                .tetris
                .as_ref()
                .map(|s| serde_json::to_value(s.snapshot())),
            GameKind::Snake => self.snake.as_ref().map(serde_json::to_value),
            GameKind::Life => self
                .life
                .as_ref()
                .map(|s| serde_json::to_value(LifeView::new(s))),
            GameKind::Blackjack => self
                .blackjack
                .as_ref()
                .map(|s| serde_json::to_value(BlackjackView::new(s))),
        };
        value.transpose()
    }

    fn observation(&self, seq: u64, game: GameKind) -> Result<Outbound, AdapterError> {
        match self.state_json(game)? {
            Some(state) => Ok(Outbound::Observation(create_observation(seq, game, state))),
            None => Ok(reject(seq, ProtocolError::NoGame(game.as_str()))),
        }
    }
}

pub(crate) fn reject(seq: u64, error: ProtocolError) -> Outbound {
    warn!(seq, code = ?error.code(), %error, "rejected line");
    Outbound::Error(create_error(seq, error.code(), &error.to_string()))
}

// ============== Observation Views ==============

/// Minesweeper board as seen by the player.
///
/// Each row is a string, one character per cell: `#` hidden, `F` flagged,
/// `*` revealed mine, `0`-`8` revealed count. Unrevealed mines stay hidden.
#[derive(Debug, Clone, Serialize)]
pub struct MinesweeperView {
    pub width: usize,
    pub height: usize,
    pub mines: usize,
    pub status: MinesweeperStatus,
    pub revealed_count: usize,
    pub flagged_count: usize,
    pub mines_remaining: usize,
    pub elapsed_seconds: u64,
    pub rows: Vec<String>,
}

impl MinesweeperView {
    pub fn new(state: &MinesweeperState, now_ms: u64) -> Self {
        let rows = state
            .grid()
            .rows()
            .map(|row| row.iter().map(cell_char).collect())
            .collect();
        Self {
            width: state.width(),
            height: state.height(),
            mines: state.mines(),
            status: state.status(),
            revealed_count: state.revealed_count(),
            flagged_count: state.flagged_count(),
            mines_remaining: state.mines_remaining(),
            elapsed_seconds: state.elapsed_seconds(now_ms),
            rows,
        }
    }
}

fn cell_char(cell: &Cell) -> char {
    match (cell.is_revealed, cell.is_flagged, cell.is_mine) {
        (true, _, true) => '*',
        (true, _, false) => char::from(b'0' + cell.adjacent_mines),
        (false, true, _) => 'F',
        (false, false, _) => '#',
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LifeView {
    pub width: usize,
    pub height: usize,
    pub generation: u64,
    pub population: usize,
    pub running: bool,
    pub speed: LifeSpeed,
    pub interval_ms: u32,
    /// `#` alive, `.` dead
    pub rows: Vec<String>,
}

impl LifeView {
    pub fn new(state: &LifeState) -> Self {
        let grid = state.grid();
        Self {
            width: grid.width(),
            height: grid.height(),
            generation: state.generation(),
            population: state.population(),
            running: state.running(),
            speed: state.speed(),
            interval_ms: state.speed().interval_ms(),
            rows: grid
                .rows()
                .map(|row| row.iter().map(|&alive| if alive { '#' } else { '.' }).collect())
                .collect(),
        }
    }
}

/// The table as the player sees it: the shoe order and, during the player's
/// turn, the dealer's hole card stay hidden
#[derive(Debug, Clone, Serialize)]
pub struct BlackjackView {
    pub phase: BlackjackPhase,
    pub outcome: Option<RoundOutcome>,
    pub chips: u64,
    pub bet: u64,
    pub player: Vec<Card>,
    pub player_value: u32,
    pub dealer: Vec<Card>,
    pub dealer_value: u32,
    pub dealer_hidden: usize,
    pub shoe_remaining: usize,
}

impl BlackjackView {
    pub fn new(state: &BlackjackState) -> Self {
        let shown = match state.phase() {
            BlackjackPhase::PlayerTurn => state.dealer().len().min(1),
            _ => state.dealer().len(),
        };
        let dealer = state.dealer()[..shown].to_vec();
        Self {
            phase: state.phase(),
            outcome: state.outcome(),
            chips: state.chips(),
            bet: state.bet(),
            player: state.player().to_vec(),
            player_value: state.player_value(),
            dealer_value: hand_value(&dealer),
            dealer_hidden: state.dealer().len() - shown,
            dealer,
            shoe_remaining: state.shoe().len(),
        }
    }
}
