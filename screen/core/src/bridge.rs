//! Event/Result Bridge
//!
//! Translates between the rendering surface and the message channel:
//!
//! - Surface interaction reports become [`InteractionEvent`]s, tagged with the
//!   originating element's service, remote id and tag.
//! - Query-style commands (`ORIENTATION`) get a [`ResultMessage`] correlated to
//!   the command instead of an event.
//!
//! Interactions are matched against the live registry. A report for an element
//! that has since been removed, or for an interaction the element never
//! registered, produces nothing.
//!
//! The registry never sees edits made on the surface, so the surface is the
//! only source of an input's live text. A `changed`/`lostfocus` report without
//! text yields an event with no `Value`.

use serde::{Deserialize, Serialize};

use crate::command::Command;
use crate::element::{ElementHandle, InteractionKind};
use crate::messages::{InteractionEvent, ResultMessage};
use crate::registry::ElementRegistry;
use crate::surface::Orientation;

/// Interaction reported by the rendering surface
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SurfaceInteraction {
    /// Element the interaction happened on
    pub handle: ElementHandle,
    /// What happened
    pub kind: InteractionKind,
    /// Live text of the element, for inputs
    ///
    /// Surfaces must fill this on `changed` and `lostfocus` reports.
    #[serde(default)]
    pub text: Option<String>,
}

impl SurfaceInteraction {
    /// Interaction without text
    #[must_use]
    pub fn new(handle: ElementHandle, kind: InteractionKind) -> Self {
        Self {
            handle,
            kind,
            text: None,
        }
    }

    /// Interaction carrying the element's current text
    #[must_use]
    pub fn with_text(handle: ElementHandle, kind: InteractionKind, text: impl Into<String>) -> Self {
        Self {
            handle,
            kind,
            text: Some(text.into()),
        }
    }
}

/// Translate a surface interaction into an outgoing event
///
/// Returns `None` when the element is gone or did not register `kind`.
#[must_use]
pub fn translate_interaction(
    registry: &ElementRegistry,
    interaction: SurfaceInteraction,
) -> Option<InteractionEvent> {
    let Some(element) = registry.get(interaction.handle) else {
        tracing::debug!(
            handle = %interaction.handle,
            kind = %interaction.kind,
            "Interaction for removed element dropped"
        );
        return None;
    };

    if !element.interactions.accepts(interaction.kind) {
        tracing::debug!(
            handle = %interaction.handle,
            kind = %interaction.kind,
            element = element.kind().name(),
            "Unregistered interaction dropped"
        );
        return None;
    }

    let value = if interaction.kind.carries_text() {
        if interaction.text.is_none() {
            tracing::debug!(
                handle = %interaction.handle,
                kind = %interaction.kind,
                "Text interaction reported without live text"
            );
        }
        interaction.text
    } else {
        None
    };

    Some(InteractionEvent {
        service: element.service.clone(),
        id: element.remote_id,
        tag: element.tag.clone(),
        kind: interaction.kind,
        value,
    })
}

/// Reply to an `ORIENTATION` command with the orientation active before it
#[must_use]
pub fn orientation_result(command: &Command, previous: Orientation) -> ResultMessage {
    ResultMessage::reply_to(command, previous.code())
}
