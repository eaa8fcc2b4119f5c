//! JSON-Lines Server
//!
//! Bridges a line-oriented byte stream to a [`ScreenSession`]:
//! - Each input line is either a [`Command`] or an `{"Interaction": ...}`
//!   wrapper around a [`SurfaceInteraction`]
//! - Every [`OutboundMessage`] is written as one JSON line
//!
//! ```text
//!   input ──► lines ──► SessionHandle ──► ScreenSession ──► outbox ──► writer task ──► output
//! ```
//!
//! A malformed line is logged and skipped. End of input or the shutdown
//! future stops the reader; the session then drains its queue and the writer
//! flushes everything the session produced.

use std::future::Future;

use anyhow::{Context, Result};
use serde::Deserialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use screen_core::{
    Command, HeadlessSurface, Interpreter, OutboundMessage, RenderSurface, ScreenConfigFile,
    ScreenSession, SessionHandle, SessionStats, SurfaceInteraction,
};

/// One decoded input line
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum InboundLine {
    /// Interaction reported by a surface
    Interaction {
        /// The reported interaction
        #[serde(rename = "Interaction")]
        interaction: SurfaceInteraction,
    },
    /// Command from the remote sender
    Command(Command),
}

impl InboundLine {
    /// Decode one line, `Ok(None)` for blank lines
    ///
    /// # Errors
    ///
    /// Returns an error if the line is neither a command nor an interaction.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        serde_json::from_str(line)
            .map(Some)
            .context("Line is neither a command nor an interaction")
    }
}

/// Build the headless surface described by the configuration
pub fn headless_surface(config: &ScreenConfigFile) -> HeadlessSurface {
    let mut surface = HeadlessSurface::new(config.surface_width, config.surface_height);
    if !config.background.is_transparent() {
        surface.set_background(config.background);
    }
    surface
}

/// Serve one session over `input`/`output` until input ends or `shutdown` fires
///
/// # Errors
///
/// Returns an error if reading input or writing output fails.
pub async fn serve<R, W, F>(
    input: R,
    output: W,
    config: &ScreenConfigFile,
    shutdown: F,
) -> Result<SessionStats>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
    F: Future<Output = ()>,
{
    let interpreter = Interpreter::new(config.interpreter_config(), headless_surface(config));
    let (outbox_tx, outbox_rx) = mpsc::channel(config.channel_capacity);
    let (session, handle) = ScreenSession::new(interpreter, outbox_tx, config.channel_capacity);

    let session_task = tokio::spawn(session.run());
    let writer_task = tokio::spawn(write_messages(outbox_rx, output));

    let read_result = read_lines(input, &handle, shutdown).await;

    // Dropping the last handle lets the session drain its queue and stop
    drop(handle);
    let (_, stats) = session_task.await.context("Session task failed")?;
    let written = writer_task.await.context("Writer task failed")??;

    read_result?;
    info!(
        commands = stats.commands,
        rejected = stats.rejected,
        written,
        "Server stopped"
    );
    Ok(stats)
}

async fn read_lines<R, F>(input: R, handle: &SessionHandle, shutdown: F) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    F: Future<Output = ()>,
{
    let mut lines = input.lines();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            () = &mut shutdown => {
                info!("Shutdown signal received");
                return Ok(());
            }
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read input")? else {
                    info!("Input closed");
                    return Ok(());
                };

                match InboundLine::parse(&line) {
                    Ok(Some(InboundLine::Command(command))) => {
                        debug!(service = %command.service, action = ?command.action, "Command received");
                        handle.send(command).await?;
                    }
                    Ok(Some(InboundLine::Interaction { interaction })) => {
                        debug!(handle = %interaction.handle, kind = %interaction.kind, "Interaction received");
                        handle.interact(interaction).await?;
                    }
                    Ok(None) => {}
                    Err(e) => warn!(error = %e, "Skipping malformed line"),
                }
            }
        }
    }
}

async fn write_messages<W>(mut outbox: mpsc::Receiver<OutboundMessage>, mut output: W) -> Result<u64>
where
    W: AsyncWrite + Unpin,
{
    let mut written = 0;
    while let Some(message) = outbox.recv().await {
        let mut line = serde_json::to_string(&message).context("Failed to encode message")?;
        line.push('\n');
        output
            .write_all(line.as_bytes())
            .await
            .context("Failed to write message")?;
        output.flush().await.context("Failed to flush output")?;
        written += 1;
    }
    output.shutdown().await.ok();
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use screen_core::{ElementHandle, InteractionKind};
    use tokio::io::{AsyncReadExt, BufReader};

    async fn run(input: &str) -> (SessionStats, Vec<serde_json::Value>) {
        let (writer, mut reader) = tokio::io::duplex(64 * 1024);
        let config = ScreenConfigFile::default();

        let stats = serve(
            BufReader::new(input.as_bytes()),
            writer,
            &config,
            std::future::pending(),
        )
        .await
        .unwrap();

        let mut output = String::new();
        reader.read_to_string(&mut output).await.unwrap();
        let messages = output
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        (stats, messages)
    }

    #[test]
    fn test_parse_command_line() {
        let line = InboundLine::parse(r#"{"Service":"LCDT","Message":"hi"}"#)
            .unwrap()
            .unwrap();
        match line {
            InboundLine::Command(command) => {
                assert_eq!(command.service, "LCDT");
                assert_eq!(command.message.as_deref(), Some("hi"));
            }
            other => panic!("expected command, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_interaction_line() {
        let line =
            InboundLine::parse(r#"{"Interaction":{"Handle":3,"Kind":"changed","Text":"abc"}}"#)
                .unwrap()
                .unwrap();
        match line {
            InboundLine::Interaction { interaction } => {
                assert_eq!(interaction.handle, ElementHandle::from_raw(3));
                assert_eq!(interaction.kind, InteractionKind::Changed);
                assert_eq!(interaction.text.as_deref(), Some("abc"));
            }
            other => panic!("expected interaction, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_blank_and_garbage() {
        assert!(InboundLine::parse("   ").unwrap().is_none());
        assert!(InboundLine::parse("{not json").is_err());
        assert!(InboundLine::parse(r#"{"Message":"no service"}"#).is_err());
    }

    #[tokio::test]
    async fn test_serve_round_trip() {
        let input = concat!(
            r#"{"Service":"LCDT","Action":"ORIENTATION","Value":1,"Id":5}"#,
            "\n",
            "garbage\n",
            "\n",
            r#"{"Service":"LCDG","Action":"BUTTON","Message":"Go","Id":7,"Tag":"go"}"#,
            "\n",
            r#"{"Interaction":{"Handle":1,"Kind":"tapped"}}"#,
            "\n",
            r#"{"Service":"LCDG","Action":"LINE","X":1}"#,
            "\n",
        );

        let (stats, messages) = run(input).await;

        assert_eq!(stats.commands, 3);
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0]["Result"]["ResultId"], 0);
        assert_eq!(messages[0]["Result"]["Id"], 5);
        assert_eq!(messages[1]["Event"]["Type"], "tapped");
        assert_eq!(messages[1]["Event"]["Tag"], "go");
        assert_eq!(messages[2]["Rejected"]["Action"], "LINE");
    }

    #[tokio::test]
    async fn test_serve_empty_input() {
        let (stats, messages) = run("").await;
        assert_eq!(stats, SessionStats::default());
        assert!(messages.is_empty());
    }
}
