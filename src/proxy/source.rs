//! Line-based proxy event feed.
//!
//! The proxy (or a wrapper script around it) writes one command per line:
//!
//! ```text
//! join <player>
//! leave <player>
//! shutdown
//! ```
//!
//! Blank lines and lines starting with `#` are ignored.

use std::sync::Arc;

use bytes::BytesMut;
use futures::StreamExt;
use tokio::io::AsyncRead;
use tokio::task::JoinSet;
use tokio_util::codec::{Decoder, FramedRead, LinesCodec, LinesCodecError};
use tracing::{debug, error, warn};

use crate::common::ProxyEvent;
use crate::proxy::{ProxyEventListener, Roster};

/// Longest accepted command line, in bytes.
const MAX_LINE_LENGTH: usize = 1024;

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxyCommand {
    Join(String),
    Leave(String),
    Shutdown,
}

/// Why the source stopped reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceExit {
    /// A `shutdown` command was read.
    ShutdownRequested,
    /// The input ended or failed.
    Closed,
}

/// A decoded input line, or the marker for one that was too long.
#[derive(Debug, Clone, PartialEq, Eq)]
enum InputLine {
    Line(String),
    Oversized,
}

/// `LinesCodec` that reports overlong lines as a frame instead of an error.
///
/// `FramedRead` stops for good after a decode error. `LinesCodec` already
/// discards the rest of an overlong line, so surfacing it as a frame keeps
/// the stream alive.
struct CommandCodec {
    lines: LinesCodec,
}

impl CommandCodec {
    fn new() -> Self {
        Self {
            lines: LinesCodec::new_with_max_length(MAX_LINE_LENGTH),
        }
    }

    fn wrap(
        result: Result<Option<String>, LinesCodecError>,
    ) -> Result<Option<InputLine>, LinesCodecError> {
        match result {
            Ok(line) => Ok(line.map(InputLine::Line)),
            Err(LinesCodecError::MaxLineLengthExceeded) => Ok(Some(InputLine::Oversized)),
            Err(e) => Err(e),
        }
    }
}

impl Decoder for CommandCodec {
    type Item = InputLine;
    type Error = LinesCodecError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        Self::wrap(self.lines.decode(src))
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        Self::wrap(self.lines.decode_eof(src))
    }
}

/// Parse one input line. `Ok(None)` for blank lines and comments.
pub fn parse_command(line: &str) -> Result<Option<ProxyCommand>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (command, argument) = match line.split_once(char::is_whitespace) {
        Some((command, argument)) => (command, argument.trim()),
        None => (line, ""),
    };

    let player = || {
        if argument.is_empty() {
            Err(format!("'{}' needs a player name", command))
        } else {
            Ok(argument.to_string())
        }
    };

    match command.to_lowercase().as_str() {
        "join" => player().map(|p| Some(ProxyCommand::Join(p))),
        "leave" => player().map(|p| Some(ProxyCommand::Leave(p))),
        "shutdown" => Ok(Some(ProxyCommand::Shutdown)),
        _ => Err(format!("unknown command '{}'", command)),
    }
}

/// Reads proxy commands and hands the resulting events to a listener.
pub struct LineEventSource<R> {
    lines: FramedRead<R, CommandCodec>,
    roster: Arc<Roster>,
}

impl<R: AsyncRead + Unpin> LineEventSource<R> {
    pub fn new(reader: R, roster: Arc<Roster>) -> Self {
        Self {
            lines: FramedRead::new(reader, CommandCodec::new()),
            roster,
        }
    }

    /// Read until `shutdown` or end of input.
    ///
    /// Every event is handled on its own task so a slow delivery never holds
    /// up the next line. The roster is updated before the event is handed
    /// over, so templates see the count including a joining player and
    /// excluding a leaving one. In-flight events finish before this returns.
    pub async fn run(mut self, listener: Arc<dyn ProxyEventListener>) -> SourceExit {
        let mut in_flight = JoinSet::new();

        let exit = loop {
            let line = match self.lines.next().await {
                Some(Ok(InputLine::Line(line))) => line,
                Some(Ok(InputLine::Oversized)) => {
                    warn!("Ignoring proxy input line longer than {} bytes", MAX_LINE_LENGTH);
                    continue;
                }
                Some(Err(e)) => {
                    error!("Failed to read proxy events: {}", e);
                    break SourceExit::Closed;
                }
                None => break SourceExit::Closed,
            };

            let event = match parse_command(&line) {
                Ok(Some(ProxyCommand::Join(player))) => {
                    self.roster.join(&player);
                    ProxyEvent::SessionStarted { player }
                }
                Ok(Some(ProxyCommand::Leave(player))) => {
                    self.roster.leave(&player);
                    ProxyEvent::SessionEnded { player }
                }
                Ok(Some(ProxyCommand::Shutdown)) => break SourceExit::ShutdownRequested,
                Ok(None) => continue,
                Err(message) => {
                    warn!("Ignoring proxy input '{}': {}", line, message);
                    continue;
                }
            };

            debug!("Proxy event: {:?}", event);
            let listener = listener.clone();
            in_flight.spawn(async move { listener.on_event(event).await });

            while in_flight.try_join_next().is_some() {}
        };

        while in_flight.join_next().await.is_some() {}
        exit
    }
}
