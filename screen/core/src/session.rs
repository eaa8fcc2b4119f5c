//! Screen Session
//!
//! Single-owner actor around an [`Interpreter`]. Commands and surface
//! interactions arrive on one mpsc channel and are applied strictly in
//! arrival order; everything the screen sends back goes out on an outbox
//! channel as [`OutboundMessage`]s.
//!
//! # Usage
//!
//! ```ignore
//! let (outbox_tx, mut outbox_rx) = mpsc::channel(100);
//! let (session, handle) = ScreenSession::new(interpreter, outbox_tx, 100);
//! let task = tokio::spawn(session.run());
//!
//! handle.send(Command::new("LCDT").with_message("hello")).await?;
//! handle.shutdown().await?;
//! let (interpreter, stats) = task.await?;
//! ```

use thiserror::Error;
use tokio::sync::mpsc;

use crate::bridge::SurfaceInteraction;
use crate::command::Command;
use crate::interpreter::Interpreter;
use crate::messages::OutboundMessage;
use crate::surface::RenderSurface;

/// Input accepted by a session
#[derive(Clone, Debug, PartialEq)]
pub enum SessionInput {
    /// Command from the remote sender
    Command(Command),
    /// Interaction reported by the rendering surface
    Interaction(SurfaceInteraction),
    /// Stop after everything queued before this
    Shutdown,
}

/// Session errors
#[derive(Debug, Error)]
pub enum SessionError {
    /// The session is no longer running
    #[error("Screen session closed")]
    Closed,
}

/// Counters reported when a session stops
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Commands received
    pub commands: u64,
    /// Commands rejected
    pub rejected: u64,
    /// Interaction events sent
    pub events: u64,
    /// Result messages sent
    pub results: u64,
}

/// Cloneable sender half of a session
#[derive(Clone, Debug)]
pub struct SessionHandle {
    tx: mpsc::Sender<SessionInput>,
}

impl SessionHandle {
    /// Queue a command
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Closed`] if the session has stopped.
    pub async fn send(&self, command: Command) -> Result<(), SessionError> {
        self.submit(SessionInput::Command(command)).await
    }

    /// Queue a surface interaction
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Closed`] if the session has stopped.
    pub async fn interact(&self, interaction: SurfaceInteraction) -> Result<(), SessionError> {
        self.submit(SessionInput::Interaction(interaction)).await
    }

    /// Ask the session to stop once the queue ahead of this drains
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Closed`] if the session has already stopped.
    pub async fn shutdown(&self) -> Result<(), SessionError> {
        self.submit(SessionInput::Shutdown).await
    }

    /// Queue any input
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Closed`] if the session has stopped.
    pub async fn submit(&self, input: SessionInput) -> Result<(), SessionError> {
        self.tx.send(input).await.map_err(|_| SessionError::Closed)
    }

    /// Whether the session has stopped
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Actor applying session input to an interpreter
pub struct ScreenSession<S: RenderSurface> {
    interpreter: Interpreter<S>,
    inbox: mpsc::Receiver<SessionInput>,
    outbox: mpsc::Sender<OutboundMessage>,
    stats: SessionStats,
}

impl<S: RenderSurface> ScreenSession<S> {
    /// Create a session and its handle
    ///
    /// `capacity` bounds the inbound queue (minimum 1).
    #[must_use]
    pub fn new(
        interpreter: Interpreter<S>,
        outbox: mpsc::Sender<OutboundMessage>,
        capacity: usize,
    ) -> (Self, SessionHandle) {
        let (tx, inbox) = mpsc::channel(capacity.max(1));
        let session = Self {
            interpreter,
            inbox,
            outbox,
            stats: SessionStats::default(),
        };
        (session, SessionHandle { tx })
    }

    /// Run until shutdown or until every handle is dropped
    ///
    /// Returns the interpreter so its final state can be inspected.
    pub async fn run(mut self) -> (Interpreter<S>, SessionStats) {
        tracing::info!("Screen session started");

        while let Some(input) = self.inbox.recv().await {
            let outbound = match input {
                SessionInput::Command(command) => self.handle_command(&command),
                SessionInput::Interaction(interaction) => self.handle_interaction(interaction),
                SessionInput::Shutdown => {
                    tracing::debug!("Shutdown requested");
                    break;
                }
            };

            if let Some(message) = outbound {
                let label = message.label();
                if self.outbox.send(message).await.is_err() {
                    tracing::warn!(message = label, "Outbox closed, message dropped");
                }
            }
        }

        tracing::info!(
            commands = self.stats.commands,
            rejected = self.stats.rejected,
            events = self.stats.events,
            results = self.stats.results,
            "Screen session stopped"
        );

        (self.interpreter, self.stats)
    }

    fn handle_command(&mut self, command: &Command) -> Option<OutboundMessage> {
        self.stats.commands += 1;

        match self.interpreter.apply(command) {
            Ok(applied) => applied.result.map(|result| {
                self.stats.results += 1;
                OutboundMessage::Result(result)
            }),
            Err(error) => {
                self.stats.rejected += 1;
                tracing::warn!(
                    service = %command.service,
                    action = ?command.action,
                    error = %error,
                    "Command rejected"
                );
                Some(OutboundMessage::Rejected {
                    service: command.service.clone(),
                    action: command.action.clone(),
                    id: command.id,
                    reason: error.to_string(),
                })
            }
        }
    }

    fn handle_interaction(&mut self, interaction: SurfaceInteraction) -> Option<OutboundMessage> {
        let event = self.interpreter.interact(interaction)?;
        self.stats.events += 1;
        Some(OutboundMessage::Event(event))
    }
}
