//! Protocol module - JSON message types for the line-delimited driver
//!
//! Every message carries `type` and `seq`; outbound messages also carry `ts`
//! (milliseconds since the UNIX epoch). Commands are tagged twice: `game`
//! picks the engine and `action` picks the transition.
//!
//! ```text
//! {"type":"command","seq":3,"command":{"game":"minesweeper","action":"reveal","x":0,"y":0}}
//! ```

use serde::{Deserialize, Serialize};

use arcade_types::{Direction, TetrisAction};

// ============== Client -> Adapter Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HelloType {
    #[serde(rename = "hello")]
    #[default]
    Hello,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CommandType {
    #[serde(rename = "command")]
    #[default]
    Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ObserveType {
    #[serde(rename = "observe")]
    #[default]
    Observe,
}

/// The engines a session can host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameKind {
    Minesweeper,
    Tetris,
    Snake,
    Life,
    Blackjack,
}

impl GameKind {
    pub const ALL: [GameKind; 5] = [
        GameKind::Minesweeper,
        GameKind::Tetris,
        GameKind::Snake,
        GameKind::Life,
        GameKind::Blackjack,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameKind::Minesweeper => "minesweeper",
            GameKind::Tetris => "tetris",
            GameKind::Snake => "snake",
            GameKind::Life => "life",
            GameKind::Blackjack => "blackjack",
        }
    }
}

/// Client hello (optional; any message may come first)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelloMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: HelloType,
    pub seq: u64,
    #[serde(default)]
    pub client: Option<ClientInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
}

/// Apply one transition to one game
#[derive(Debug, Clone, Deserialize)]
pub struct CommandMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: CommandType,
    pub seq: u64,
    pub command: GameCommand,
}

/// Ask for the current state of one game without changing it
#[derive(Debug, Clone, Deserialize)]
pub struct ObserveMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: ObserveType,
    pub seq: u64,
    pub game: GameKind,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "game", rename_all = "lowercase")]
pub enum GameCommand {
    Minesweeper(MinesweeperCommand),
    Tetris(TetrisCommand),
    Snake(SnakeCommand),
    Life(LifeCommand),
    Blackjack(BlackjackCommand),
}

impl GameCommand {
    pub fn game(&self) -> GameKind {
        match self {
            GameCommand::Minesweeper(_) => GameKind::Minesweeper,
            GameCommand::Tetris(_) => GameKind::Tetris,
            GameCommand::Snake(_) => GameKind::Snake,
            GameCommand::Life(_) => GameKind::Life,
            GameCommand::Blackjack(_) => GameKind::Blackjack,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum MinesweeperCommand {
    Reveal {
        x: i32,
        y: i32,
    },
    Flag {
        x: i32,
        y: i32,
    },
    /// Missing dimensions fall back to the configured ones
    Reset {
        #[serde(default)]
        width: Option<usize>,
        #[serde(default)]
        height: Option<usize>,
        #[serde(default)]
        mines: Option<usize>,
    },
}

/// `{"action": "<TetrisAction>"}` or `{"action": "tick"}` for one gravity step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawTetrisCommand")]
pub enum TetrisCommand {
    Action(TetrisAction),
    Tick,
}

#[derive(Deserialize)]
struct RawTetrisCommand {
    action: String,
}

impl TryFrom<RawTetrisCommand> for TetrisCommand {
    type Error = String;

    fn try_from(raw: RawTetrisCommand) -> Result<Self, Self::Error> {
        if raw.action.eq_ignore_ascii_case("tick") {
            return Ok(TetrisCommand::Tick);
        }
        TetrisAction::from_str(&raw.action)
            .map(TetrisCommand::Action)
            .ok_or_else(|| format!("unknown tetris action `{}`", raw.action))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SnakeCommand {
    Direction { direction: Direction },
    Step,
    Pause,
    Reset,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum LifeCommand {
    Step {
        #[serde(default = "one")]
        generations: u32,
    },
    Toggle {
        x: i32,
        y: i32,
    },
    Clear,
    Randomize {
        #[serde(default)]
        density: Option<f64>,
    },
    /// Offsets default to 5 cells from the top-left corner
    Pattern {
        name: String,
        #[serde(default)]
        x: Option<i32>,
        #[serde(default)]
        y: Option<i32>,
    },
    Speed {
        speed: String,
    },
    /// Toggle auto-run
    Run,
}

fn one() -> u32 {
    1
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum BlackjackCommand {
    Bet { amount: u64 },
    ClearBet,
    Deal,
    Hit,
    Stand,
    NewRound,
    /// Fresh shoe and bankroll
    Reset,
}

// ============== Adapter -> Client Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WelcomeType {
    #[serde(rename = "welcome")]
    Welcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObservationType {
    #[serde(rename = "observation")]
    Observation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorType {
    #[serde(rename = "error")]
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    #[serde(rename = "invalid_json")]
    InvalidJson,
    #[serde(rename = "invalid_command")]
    InvalidCommand,
    #[serde(rename = "no_game")]
    NoGame,
    #[serde(rename = "line_too_long")]
    LineTooLong,
}

/// Welcome message (response to hello)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WelcomeMessage {
    #[serde(rename = "type")]
    pub msg_type: WelcomeType,
    pub seq: u64,
    pub ts: u64,
    pub protocol_version: String,
    pub games: Vec<GameKind>,
}

/// State of one game after a command or an observe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservationMessage {
    #[serde(rename = "type")]
    pub msg_type: ObservationType,
    pub seq: u64,
    pub ts: u64,
    pub game: GameKind,
    pub state: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorMessage {
    #[serde(rename = "type")]
    pub msg_type: ErrorType,
    pub seq: u64,
    pub ts: u64,
    pub code: ErrorCode,
    pub message: String,
}

/// Anything the adapter writes back; serialized as the inner message
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Outbound {
    Welcome(WelcomeMessage),
    Observation(ObservationMessage),
    Error(ErrorMessage),
}

impl Outbound {
    pub fn seq(&self) -> u64 {
        match self {
            Outbound::Welcome(m) => m.seq,
            Outbound::Observation(m) => m.seq,
            Outbound::Error(m) => m.seq,
        }
    }
}

// ============== Message Parsing ==============

/// Parse a JSON message from a string
pub fn parse_message(json: &str) -> Result<ParsedMessage, serde_json::Error> {
    #[derive(Debug, Deserialize)]
    #[serde(tag = "type")]
    enum InboundMessage {
        #[serde(rename = "hello")]
        Hello(HelloMessage),
        #[serde(rename = "command")]
        Command(CommandMessage),
        #[serde(rename = "observe")]
        Observe(ObserveMessage),
    }

    match serde_json::from_str::<InboundMessage>(json) {
        Ok(InboundMessage::Hello(m)) => Ok(ParsedMessage::Hello(m)),
        Ok(InboundMessage::Command(m)) => Ok(ParsedMessage::Command(m)),
        Ok(InboundMessage::Observe(m)) => Ok(ParsedMessage::Observe(m)),
        Err(e) => {
            // An unknown `type` is reported, not treated as a parse failure
            #[derive(Debug, Deserialize)]
            struct TypeOnly<'a> {
                #[serde(rename = "type")]
                msg_type: Option<&'a str>,
                seq: Option<u64>,
            }
            let probe = serde_json::from_str::<TypeOnly>(json)?;
            let msg_type = probe.msg_type.unwrap_or("");
            if !matches!(msg_type, "hello" | "command" | "observe") {
                return Ok(ParsedMessage::Unknown(UnknownMessage {
                    seq: probe.seq.unwrap_or(0),
                    msg_type: msg_type.to_string(),
                }));
            }
            Err(e)
        }
    }
}

/// Parsed incoming message
#[derive(Debug, Clone)]
pub enum ParsedMessage {
    Hello(HelloMessage),
    Command(CommandMessage),
    Observe(ObserveMessage),
    Unknown(UnknownMessage),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMessage {
    pub seq: u64,
    pub msg_type: String,
}

/// Pull `"seq": N` out of a line that failed to parse, so the error can echo it
pub fn extract_seq_best_effort(s: &str) -> Option<u64> {
    let start = s.find("\"seq\"")?;
    let after_key = &s[start + 5..];
    let colon = after_key.find(':')?;
    let rest = after_key[colon + 1..].trim_start();
    let end = rest.bytes().take_while(|b| b.is_ascii_digit()).count();
    if end == 0 {
        return None;
    }
    rest[..end].parse::<u64>().ok()
}

// ============== Utility Functions ==============

/// Create a welcome message
pub fn create_welcome(seq: u64, protocol_version: &str) -> WelcomeMessage {
    WelcomeMessage {
        msg_type: WelcomeType::Welcome,
        seq,
        ts: current_timestamp_ms(),
        protocol_version: protocol_version.to_string(),
        games: GameKind::ALL.to_vec(),
    }
}

/// Create an observation message
pub fn create_observation(seq: u64, game: GameKind, state: serde_json::Value) -> ObservationMessage {
    ObservationMessage {
        msg_type: ObservationType::Observation,
        seq,
        ts: current_timestamp_ms(),
        game,
        state,
    }
}

/// Create an error message
pub fn create_error(seq: u64, code: ErrorCode, message: &str) -> ErrorMessage {
    ErrorMessage {
        msg_type: ErrorType::Error,
        seq,
        ts: current_timestamp_ms(),
        code,
        message: message.to_string(),
    }
}

/// Get current timestamp in milliseconds
pub fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
