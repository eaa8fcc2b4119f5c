//! Screen Commands
//!
//! Inbound paint/control instructions, already deserialized from the message
//! channel. Field names on the wire are PascalCase (`Service`, `Action`,
//! `X2`, `ARGB`, ...). Every field except `Service` is optional.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One inbound screen instruction
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Command {
    /// Channel/category, e.g. `"LCDT"`
    pub service: String,
    /// Verb, matched case-insensitively
    #[serde(default)]
    pub action: Option<String>,
    /// Text payload
    #[serde(default)]
    pub message: Option<String>,
    /// Remote element id
    #[serde(default)]
    pub id: Option<i32>,
    /// Remote id to remove (`CLEAR`)
    #[serde(default)]
    pub pid: Option<i32>,
    /// Horizontal position (pixels, or columns for implicit text)
    #[serde(default)]
    pub x: Option<i32>,
    /// Vertical position (pixels, or line row for implicit text)
    #[serde(default)]
    pub y: Option<i32>,
    /// Line end x
    #[serde(default, rename = "X2")]
    pub x2: Option<i32>,
    /// Line end y
    #[serde(default, rename = "Y2")]
    pub y2: Option<i32>,
    /// Explicit width (stroke width for `LINE`)
    #[serde(default)]
    pub width: Option<i32>,
    /// Explicit height
    #[serde(default)]
    pub height: Option<i32>,
    /// Font/point size
    #[serde(default)]
    pub size: Option<f64>,
    /// Color in the `ARGB` encoding (see [`crate::color::decode_argb`])
    #[serde(default, rename = "ARGB")]
    pub argb: Option<String>,
    /// Text color in plain hex (see [`crate::color::decode_hex`])
    #[serde(default)]
    pub foreground: Option<String>,
    /// Opaque passthrough tag
    #[serde(default)]
    pub tag: Option<String>,
    /// Absolute resource locator (`IMAGE`)
    #[serde(default)]
    pub path: Option<String>,
    /// Multi-line input flag
    #[serde(default)]
    pub multi: Option<bool>,
    /// Horizontal alignment name
    #[serde(default)]
    pub horizontal_alignment: Option<String>,
    /// Flow direction name
    #[serde(default)]
    pub flow_direction: Option<String>,
    /// Integer argument, e.g. an orientation code
    #[serde(default)]
    pub value: Option<i32>,
}

impl Command {
    /// Create a command for a service with no other fields set
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            ..Self::default()
        }
    }

    /// Parse a command from its JSON form
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error when the input is not a valid command.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The parsed action verb, if any
    #[must_use]
    pub fn action(&self) -> Option<Action> {
        self.action.as_deref().map(Action::parse)
    }

    /// Parsed horizontal alignment, ignoring unknown names
    #[must_use]
    pub fn alignment(&self) -> Option<HorizontalAlignment> {
        self.horizontal_alignment
            .as_deref()
            .and_then(HorizontalAlignment::parse)
    }

    /// Parsed flow direction, ignoring unknown names
    #[must_use]
    pub fn direction(&self) -> Option<FlowDirection> {
        self.flow_direction.as_deref().and_then(FlowDirection::parse)
    }

    /// Key used for the sensor set: `"<Service>:<Message>"`
    #[must_use]
    pub fn sensor_key(&self) -> String {
        format!("{}:{}", self.service, self.message.as_deref().unwrap_or(""))
    }

    /// Set the action verb
    #[must_use]
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Set the text payload
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Set the remote id
    #[must_use]
    pub fn with_id(mut self, id: i32) -> Self {
        self.id = Some(id);
        self
    }

    /// Set the position
    #[must_use]
    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }
}

/// Command verbs
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// Query (and optionally set) the display orientation
    Orientation,
    /// Turn a sensor on
    Enable,
    /// Turn a sensor off
    Disable,
    /// Remove elements (by line, by id, or everything)
    Clear,
    /// Place a button
    Button,
    /// Place an image
    Image,
    /// Draw a line
    Line,
    /// Place an editable text box
    Input,
    /// Place a filled rectangle
    Rectangle,
    /// Place static text at pixel coordinates
    Text,
    /// Unrecognized verb (uppercased)
    Other(String),
}

impl Action {
    /// Parse a verb, ignoring case
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "ORIENTATION" => Self::Orientation,
            "ENABLE" => Self::Enable,
            "DISABLE" => Self::Disable,
            "CLEAR" => Self::Clear,
            "BUTTON" => Self::Button,
            "IMAGE" => Self::Image,
            "LINE" => Self::Line,
            "INPUT" => Self::Input,
            "RECTANGLE" => Self::Rectangle,
            "TEXT" => Self::Text,
            other => Self::Other(other.to_string()),
        }
    }

    /// Canonical uppercase name
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Orientation => "ORIENTATION",
            Self::Enable => "ENABLE",
            Self::Disable => "DISABLE",
            Self::Clear => "CLEAR",
            Self::Button => "BUTTON",
            Self::Image => "IMAGE",
            Self::Line => "LINE",
            Self::Input => "INPUT",
            Self::Rectangle => "RECTANGLE",
            Self::Text => "TEXT",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Horizontal alignment of an element
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HorizontalAlignment {
    /// Align to the left edge
    Left,
    /// Center across the full surface width
    Center,
    /// Align to the right edge
    Right,
    /// Stretch to the available width
    Stretch,
}

impl HorizontalAlignment {
    /// Parse an alignment name, ignoring case
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "left" => Some(Self::Left),
            "center" => Some(Self::Center),
            "right" => Some(Self::Right),
            "stretch" => Some(Self::Stretch),
            _ => None,
        }
    }
}

/// Text flow direction of an element
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowDirection {
    /// Left to right
    LeftToRight,
    /// Right to left
    RightToLeft,
}

impl FlowDirection {
    /// Parse a flow direction name, ignoring case
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "lefttoright" => Some(Self::LeftToRight),
            "righttoleft" => Some(Self::RightToLeft),
            _ => None,
        }
    }
}
