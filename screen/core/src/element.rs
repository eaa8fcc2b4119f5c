//! Element Descriptors
//!
//! The interpreter's output unit. A descriptor records what one on-screen
//! element is, where it sits and which interactions the rendering surface must
//! report for it, without reference to any UI toolkit. Descriptors are never
//! edited in place: an element changes by being removed and placed again.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::command::{FlowDirection, HorizontalAlignment};

/// Local handle of a placed element
///
/// Allocated by the [`ElementRegistry`](crate::registry::ElementRegistry) and
/// unique for the lifetime of a registry, unlike remote ids which the sender
/// controls and may repeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementHandle(u64);

impl ElementHandle {
    /// Wrap a raw handle value
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw numeric value
    #[must_use]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "el-{}", self.0)
    }
}

/// Kind tag of an element
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// Static or line-addressable text
    Text,
    /// Push button
    Button,
    /// Bitmap image
    Image,
    /// Straight line
    Line,
    /// Editable text box
    Input,
    /// Filled rectangle
    Rectangle,
}

impl ElementKind {
    /// Lowercase kind name
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Button => "button",
            Self::Image => "image",
            Self::Line => "line",
            Self::Input => "input",
            Self::Rectangle => "rectangle",
        }
    }
}

/// Kind-specific content of an element
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ElementContent {
    /// Text block
    Text {
        /// Displayed text
        text: String,
        /// Font size in surface units
        font_size: f64,
        /// Text color
        foreground: Color,
        /// Font family hint (fixed-width for line-addressable text)
        font_family: Option<String>,
        /// Center the text within the element
        centered: bool,
    },
    /// Button
    Button {
        /// Button label
        label: String,
        /// Font size in surface units
        font_size: f64,
    },
    /// Image
    Image {
        /// Absolute resource locator
        source: String,
        /// Decode-time width hint
        decode_width: Option<u32>,
        /// Decode-time height hint
        decode_height: Option<u32>,
    },
    /// Line between two points, in pixels
    Line {
        /// Start x
        x1: f64,
        /// Start y
        y1: f64,
        /// End x
        x2: f64,
        /// End y
        y2: f64,
        /// Stroke thickness
        stroke_width: f64,
        /// Stroke color
        stroke: Color,
    },
    /// Editable text box
    Input {
        /// Initial text
        text: String,
        /// Font size in surface units
        font_size: f64,
        /// Text color
        foreground: Color,
        /// Accepts line breaks
        multiline: bool,
    },
    /// Filled rectangle
    Rectangle {
        /// Fill color
        fill: Color,
    },
}

impl ElementContent {
    /// Kind tag of this content
    #[must_use]
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Text { .. } => ElementKind::Text,
            Self::Button { .. } => ElementKind::Button,
            Self::Image { .. } => ElementKind::Image,
            Self::Line { .. } => ElementKind::Line,
            Self::Input { .. } => ElementKind::Input,
            Self::Rectangle { .. } => ElementKind::Rectangle,
        }
    }
}

/// Resolved position and size, in surface pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
    /// Width, `None` for the element's natural width
    pub width: Option<f64>,
    /// Height, `None` for the element's natural height
    pub height: Option<f64>,
}

/// Interaction kinds a surface can report
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionKind {
    /// Tap/touch
    Tapped,
    /// Button click
    Click,
    /// Pointer pressed
    Pressed,
    /// Pointer released
    Released,
    /// Input lost keyboard focus
    LostFocus,
    /// Input text changed
    Changed,
}

impl InteractionKind {
    /// Wire name of the interaction
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Tapped => "tapped",
            Self::Click => "click",
            Self::Pressed => "pressed",
            Self::Released => "released",
            Self::LostFocus => "lostfocus",
            Self::Changed => "changed",
        }
    }

    /// Whether events of this kind carry the element's live text
    #[must_use]
    pub fn carries_text(&self) -> bool {
        matches!(self, Self::LostFocus | Self::Changed)
    }
}

impl fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Set of interactions registered on an element
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct Interactions {
    /// Report taps
    pub on_tap: bool,
    /// Report button clicks
    pub on_click: bool,
    /// Report pointer presses
    pub on_press: bool,
    /// Report pointer releases
    pub on_release: bool,
    /// Report text changes
    pub on_change: bool,
    /// Report focus loss
    pub on_lost_focus: bool,
}

impl Interactions {
    /// No interactions
    pub const NONE: Interactions = Interactions {
        on_tap: false,
        on_click: false,
        on_press: false,
        on_release: false,
        on_change: false,
        on_lost_focus: false,
    };

    /// Tap only (images, rectangles)
    pub const TAP: Interactions = Interactions {
        on_tap: true,
        ..Self::NONE
    };

    /// Tap, click, press and release (buttons)
    pub const BUTTON: Interactions = Interactions {
        on_tap: true,
        on_click: true,
        on_press: true,
        on_release: true,
        ..Self::NONE
    };

    /// Focus loss and text change (inputs)
    pub const INPUT: Interactions = Interactions {
        on_change: true,
        on_lost_focus: true,
        ..Self::NONE
    };

    /// Whether the given interaction is registered
    #[must_use]
    pub fn accepts(&self, kind: InteractionKind) -> bool {
        match kind {
            InteractionKind::Tapped => self.on_tap,
            InteractionKind::Click => self.on_click,
            InteractionKind::Pressed => self.on_press,
            InteractionKind::Released => self.on_release,
            InteractionKind::Changed => self.on_change,
            InteractionKind::LostFocus => self.on_lost_focus,
        }
    }

    /// Whether no interaction is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }
}

/// Abstract record of one on-screen element
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ElementDescriptor {
    /// Local handle, used by the surface for removal and event reports
    pub handle: ElementHandle,
    /// Remote id for `CLEAR` by `Pid`
    pub remote_id: Option<i32>,
    /// Service of the command that produced the element
    pub service: String,
    /// Opaque passthrough tag
    pub tag: Option<String>,
    /// Line row for line-addressable text
    pub line: Option<i32>,
    /// Kind-specific content
    pub content: ElementContent,
    /// Resolved position and size
    pub geometry: Geometry,
    /// Horizontal alignment, if requested
    pub alignment: Option<HorizontalAlignment>,
    /// Flow direction, if requested
    pub flow_direction: Option<FlowDirection>,
    /// Interactions the surface must report
    pub interactions: Interactions,
}

impl ElementDescriptor {
    /// Kind tag of this element
    #[must_use]
    pub fn kind(&self) -> ElementKind {
        self.content.kind()
    }

    /// Whether this element is line-addressable text
    #[must_use]
    pub fn is_line_text(&self) -> bool {
        self.line.is_some() && self.kind() == ElementKind::Text
    }

    /// Text content of text, button and input elements
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            ElementContent::Text { text, .. } | ElementContent::Input { text, .. } => Some(text),
            ElementContent::Button { label, .. } => Some(label),
            _ => None,
        }
    }

    /// Resolved color (text foreground, line stroke or rectangle fill)
    #[must_use]
    pub fn color(&self) -> Option<Color> {
        match &self.content {
            ElementContent::Text { foreground, .. } | ElementContent::Input { foreground, .. } => {
                Some(*foreground)
            }
            ElementContent::Line { stroke, .. } => Some(*stroke),
            ElementContent::Rectangle { fill } => Some(*fill),
            ElementContent::Button { .. } | ElementContent::Image { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rectangle(handle: u64) -> ElementDescriptor {
        ElementDescriptor {
            handle: ElementHandle::from_raw(handle),
            remote_id: None,
            service: "LCDG".to_string(),
            tag: None,
            line: None,
            content: ElementContent::Rectangle { fill: Color::GRAY },
            geometry: Geometry::default(),
            alignment: None,
            flow_direction: None,
            interactions: Interactions::TAP,
        }
    }

    #[test]
    fn test_handle_display() {
        assert_eq!(ElementHandle::from_raw(7).to_string(), "el-7");
    }

    #[test]
    fn test_interaction_sets() {
        assert!(Interactions::BUTTON.accepts(InteractionKind::Click));
        assert!(Interactions::BUTTON.accepts(InteractionKind::Released));
        assert!(!Interactions::BUTTON.accepts(InteractionKind::Changed));
        assert!(Interactions::INPUT.accepts(InteractionKind::LostFocus));
        assert!(!Interactions::INPUT.accepts(InteractionKind::Tapped));
        assert!(Interactions::NONE.is_empty());
        assert!(!Interactions::TAP.is_empty());
    }

    #[test]
    fn test_interaction_kind_wire_names() {
        assert_eq!(InteractionKind::LostFocus.name(), "lostfocus");
        assert!(InteractionKind::Changed.carries_text());
        assert!(!InteractionKind::Tapped.carries_text());
    }

    #[test]
    fn test_descriptor_accessors() {
        let rect = rectangle(1);
        assert_eq!(rect.kind(), ElementKind::Rectangle);
        assert_eq!(rect.color(), Some(Color::GRAY));
        assert_eq!(rect.text(), None);
        assert!(!rect.is_line_text());

        let mut text = rectangle(2);
        text.content = ElementContent::Text {
            text: "hello".to_string(),
            font_size: 22.0,
            foreground: Color::WHITE,
            font_family: None,
            centered: false,
        };
        text.line = Some(0);
        assert!(text.is_line_text());
        assert_eq!(text.text(), Some("hello"));
    }
}
