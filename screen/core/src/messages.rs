//! Outbound Messages
//!
//! Messages the screen core sends back over the message channel. Field names
//! on the wire are PascalCase, matching inbound commands.
//!
//! - [`ResultMessage`]: synchronous reply to a query-style command
//! - [`InteractionEvent`]: report of a user interaction with a placed element
//! - [`OutboundMessage::Rejected`]: a command that could not be applied

use serde::{Deserialize, Serialize};

use crate::command::Command;
use crate::element::InteractionKind;

/// Reply correlated to a command
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResultMessage {
    /// Service of the originating command
    pub service: String,
    /// Action of the originating command
    pub action: Option<String>,
    /// Remote id of the originating command
    pub id: Option<i32>,
    /// Tag of the originating command
    pub tag: Option<String>,
    /// Result value
    pub result_id: i32,
}

impl ResultMessage {
    /// Build a reply to `command` carrying `result_id`
    #[must_use]
    pub fn reply_to(command: &Command, result_id: i32) -> Self {
        Self {
            service: command.service.clone(),
            action: command.action.clone(),
            id: command.id,
            tag: command.tag.clone(),
            result_id,
        }
    }
}

/// Report of a user interaction with a placed element
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InteractionEvent {
    /// Service of the command that placed the element
    pub service: String,
    /// Remote id of the element
    pub id: Option<i32>,
    /// Tag of the element
    pub tag: Option<String>,
    /// What happened
    #[serde(rename = "Type")]
    pub kind: InteractionKind,
    /// Live text of an input (`lostfocus` and `changed` only)
    pub value: Option<String>,
}

/// Everything the core sends back to the sender
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutboundMessage {
    /// Reply to a query-style command
    Result(ResultMessage),
    /// Interaction on a placed element
    Event(InteractionEvent),
    /// A command was rejected without changing any state
    #[serde(rename_all = "PascalCase")]
    Rejected {
        /// Service of the rejected command
        service: String,
        /// Action of the rejected command
        action: Option<String>,
        /// Remote id of the rejected command
        id: Option<i32>,
        /// Why it was rejected
        reason: String,
    },
}

impl OutboundMessage {
    /// Short label for logging
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Result(_) => "result",
            Self::Event(_) => "event",
            Self::Rejected { .. } => "rejected",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_reply_echoes_command() {
        let mut command = Command::new("LCDT").with_action("orientation").with_id(9);
        command.tag = Some("rot".to_string());

        let reply = ResultMessage::reply_to(&command, 2);
        assert_eq!(reply.service, "LCDT");
        assert_eq!(reply.action.as_deref(), Some("orientation"));
        assert_eq!(reply.id, Some(9));
        assert_eq!(reply.tag.as_deref(), Some("rot"));
        assert_eq!(reply.result_id, 2);
    }

    #[test]
    fn test_event_wire_format() {
        let event = InteractionEvent {
            service: "LCDG".to_string(),
            id: Some(4),
            tag: None,
            kind: InteractionKind::LostFocus,
            value: Some("typed".to_string()),
        };
        let json = serde_json::to_value(OutboundMessage::Event(event)).unwrap();
        assert_eq!(json["Event"]["Type"], "lostfocus");
        assert_eq!(json["Event"]["Id"], 4);
        assert_eq!(json["Event"]["Value"], "typed");
    }

    #[test]
    fn test_rejected_wire_format() {
        let rejected = OutboundMessage::Rejected {
            service: "LCDG".to_string(),
            action: Some("LINE".to_string()),
            id: None,
            reason: "LINE requires X2".to_string(),
        };
        let json = serde_json::to_value(&rejected).unwrap();
        assert_eq!(json["Rejected"]["Service"], "LCDG");
        assert_eq!(json["Rejected"]["Reason"], "LINE requires X2");
        assert_eq!(rejected.label(), "rejected");
    }
}
