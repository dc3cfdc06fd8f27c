//! Adapter - drive the game engines with line-delimited JSON
//!
//! Reads one JSON message per line, applies it to the session's games, and
//! writes exactly one JSON message back per line. The binary wires this to
//! stdin/stdout; tests drive it with in-memory buffers.
//!
//! # Message Types
//!
//! ## Client -> Adapter
//!
//! - **hello**: optional handshake, answered with `welcome`
//! - **command**: one transition for one game, answered with `observation`
//! - **observe**: current state of one game, answered with `observation`
//!
//! ## Adapter -> Client
//!
//! - **welcome**: protocol version and the list of games
//! - **observation**: `game` plus the serialized state
//! - **error**: `code` (`invalid_json`, `invalid_command`, `no_game`,
//!   `line_too_long`) and a message
//!
//! # Environment Variables
//!
//! - `ARCADE_SEED`: RNG seed, 0 or unset for OS entropy
//! - `ARCADE_MS_WIDTH`, `ARCADE_MS_HEIGHT`, `ARCADE_MS_MINES`: Minesweeper board
//! - `ARCADE_SNAKE_WIDTH`, `ARCADE_SNAKE_HEIGHT`: Snake grid
//! - `ARCADE_LIFE_WIDTH`, `ARCADE_LIFE_HEIGHT`: Life grid
//! - `ARCADE_MAX_LINE_BYTES`: longest accepted input line (default 64 KiB)

pub mod config;
pub mod error;
pub mod protocol;
pub mod session;

pub use config::AdapterConfig;
pub use error::{AdapterError, ProtocolError};
pub use protocol::{GameCommand, GameKind, Outbound, ParsedMessage};
pub use session::Session;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

use arcade_core::clock::Clock;
use arcade_core::rng::RandomSource;

use crate::protocol::extract_seq_best_effort;
use crate::session::reject;

/// Serve a fresh [`Session`] built from `config` until `reader` hits EOF.
///
/// Returns the number of lines answered.
pub async fn run<R, W>(config: AdapterConfig, reader: R, writer: W) -> Result<u64, AdapterError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    serve(Session::new(config), reader, writer).await
}

/// Serve an existing session until `reader` hits EOF
pub async fn serve<G, C, R, W>(
    mut session: Session<G, C>,
    mut reader: R,
    mut writer: W,
) -> Result<u64, AdapterError>
where
    G: RandomSource,
    C: Clock,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let limit = session.config().max_line_bytes;
    info!(max_line_bytes = limit, "session started");

    let mut line: Vec<u8> = Vec::with_capacity(1024);
    let mut out: Vec<u8> = Vec::with_capacity(4096);
    let mut handled = 0u64;

    loop {
        let response = match read_line(&mut reader, &mut line, limit).await? {
            LineRead::Eof => break,
            LineRead::TooLong => {
                let seq = extract_seq_best_effort(&String::from_utf8_lossy(&line)).unwrap_or(0);
                reject(seq, ProtocolError::LineTooLong { limit })
            }
            LineRead::Line => match std::str::from_utf8(&line) {
                Ok(text) => session.handle_line(text)?,
                Err(e) => reject(0, ProtocolError::InvalidJson(e.to_string())),
            },
        };

        out.clear();
        serde_json::to_writer(&mut out, &response)?;
        out.push(b'\n');
        writer.write_all(&out).await?;
        writer.flush().await?;

        handled += 1;
        debug!(seq = response.seq(), bytes = out.len(), "response written");
    }

    info!(handled, "session ended");
    Ok(handled)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineRead {
    Line,
    TooLong,
    Eof,
}

/// Read one line into `buf` without its terminator, holding at most
/// `limit + 1` bytes. An over-long line is consumed through its newline.
async fn read_line<R>(reader: &mut R, buf: &mut Vec<u8>, limit: usize) -> std::io::Result<LineRead>
where
    R: AsyncBufRead + Unpin,
{
    buf.clear();
    let n = (&mut *reader)
        .take((limit as u64).saturating_add(1))
        .read_until(b'\n', buf)
        .await?;
    if n == 0 {
        return Ok(LineRead::Eof);
    }

    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
        return Ok(LineRead::Line);
    }
    if buf.len() <= limit {
        // Final line without a newline
        return Ok(LineRead::Line);
    }

    skip_rest_of_line(reader).await?;
    Ok(LineRead::TooLong)
}

async fn skip_rest_of_line<R>(reader: &mut R) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        let (consumed, done) = {
            let available = reader.fill_buf().await?;
            if available.is_empty() {
                return Ok(());
            }
            match available.iter().position(|&b| b == b'\n') {
                Some(i) => (i + 1, true),
                None => (available.len(), false),
            }
        };
        reader.consume(consumed);
        if done {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcade_core::clock::FixedClock;
    use arcade_core::rng::SimpleRng;
    use tokio::io::BufReader;

    fn test_session(config: AdapterConfig) -> Session<SimpleRng, FixedClock> {
        Session::with_sources(config, SimpleRng::new(7), FixedClock(0))
    }

    fn responses(out: &[u8]) -> Vec<serde_json::Value> {
        std::str::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_one_response_per_line() {
        let input = concat!(
            "{\"type\":\"hello\",\"seq\":1}\n",
            "{\"type\":\"observe\",\"seq\":2,\"game\":\"tetris\"}\n",
            "{\"type\":\"command\",\"seq\":3,\"command\":{\"game\":\"tetris\",\"action\":\"rotate\"}}\r\n",
            "not json\n",
            "{\"type\":\"observe\",\"seq\":5,\"game\":\"tetris\"}",
        );
        let mut out = Vec::new();
        let handled = serve(test_session(AdapterConfig::default()), input.as_bytes(), &mut out)
            .await
            .unwrap();
        assert_eq!(handled, 5);

        let r = responses(&out);
        assert_eq!(r.len(), 5);
        assert_eq!(r[0]["type"], "welcome");
        assert_eq!(r[1]["code"], "no_game");
        assert_eq!(r[2]["type"], "observation");
        assert_eq!(r[2]["seq"], 3);
        assert_eq!(r[3]["code"], "invalid_json");
        assert_eq!(r[4]["type"], "observation");
        assert_eq!(r[4]["state"], r[2]["state"]);
    }

    #[tokio::test]
    async fn test_line_too_long_is_skipped() {
        let config = AdapterConfig {
            max_line_bytes: 40,
            ..AdapterConfig::default()
        };
        let long = format!(
            "{{\"type\":\"hello\",\"seq\":11,\"pad\":\"{}\"}}\n",
            "x".repeat(200)
        );
        let input = format!("{}{{\"type\":\"hello\",\"seq\":12}}\n", long);

        let mut out = Vec::new();
        serve(test_session(config), input.as_bytes(), &mut out)
            .await
            .unwrap();

        let r = responses(&out);
        assert_eq!(r.len(), 2);
        assert_eq!(r[0]["code"], "line_too_long");
        assert_eq!(r[0]["seq"], 11);
        assert_eq!(r[1]["type"], "welcome");
        assert_eq!(r[1]["seq"], 12);
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_rejected() {
        let input: &[u8] = b"\xff\xfe\n{\"type\":\"hello\",\"seq\":2}\n";
        let mut out = Vec::new();
        serve(test_session(AdapterConfig::default()), input, &mut out)
            .await
            .unwrap();
        let r = responses(&out);
        assert_eq!(r[0]["code"], "invalid_json");
        assert_eq!(r[1]["type"], "welcome");
    }

    #[tokio::test]
    async fn test_reads_from_chunked_stream() {
        let mock = tokio_test::io::Builder::new()
            .read(b"{\"type\":\"command\",\"seq\":1,")
            .read(b"\"command\":{\"game\":\"snake\",\"action\":\"step\"}}\n")
            .read(b"{\"type\":\"observe\",\"seq\":2,\"game\":\"snake\"}\n")
            .build();
        let mut out = Vec::new();
        let handled = serve(
            test_session(AdapterConfig::default()),
            BufReader::new(mock),
            &mut out,
        )
        .await
        .unwrap();
        assert_eq!(handled, 2);

        let r = responses(&out);
        assert_eq!(r[0]["game"], "snake");
        assert_eq!(r[0]["state"]["body"][0]["x"], 11);
        assert_eq!(r[1]["state"], r[0]["state"]);
    }

    #[tokio::test]
    async fn test_empty_input() {
        let mut out = Vec::new();
        let handled = run(AdapterConfig::default(), &b""[..], &mut out)
            .await
            .unwrap();
        assert_eq!(handled, 0);
        assert!(out.is_empty());
    }
}
