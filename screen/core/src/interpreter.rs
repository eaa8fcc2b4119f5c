//! Command Interpreter
//!
//! The screen state machine. Each [`Command`] is mapped to at most one
//! registry mutation plus at most one new element, and the rendering surface
//! is told about every change.
//!
//! # Dispatch
//!
//! ```text
//! Command ──► log service? ──yes──► LogConsole
//!               │no
//!               ▼
//!          Action present? ──► decode ARGB ──► match action
//!               │                                 │
//!               │      ENABLE/DISABLE ◄───────────┤ (stop here)
//!               │      ORIENTATION/CLEAR/unknown ─┤ (no element)
//!               │      BUTTON/IMAGE/LINE/... ─────┤ (element draft)
//!               ▼                                 ▼
//!        no draft, text service, Message? ──► implicit line text
//!               │
//!               ▼
//!        place: layout ─► column-0 overwrite ─► registry ─► surface
//! ```
//!
//! Commands are validated before anything is mutated, so a rejected command
//! leaves the registry, sensors and surface exactly as they were.

use thiserror::Error;

use crate::bridge::{self, SurfaceInteraction};
use crate::color::{self, Color};
use crate::command::{Action, Command, HorizontalAlignment};
use crate::console::LogConsole;
use crate::element::{
    ElementContent, ElementDescriptor, ElementHandle, Geometry, Interactions,
};
use crate::layout::{Addressing, LayoutResolver, DEFAULT_FONT_SIZE};
use crate::messages::{InteractionEvent, ResultMessage};
use crate::registry::{ElementRegistry, SensorSet};
use crate::surface::{Orientation, RenderSurface};

/// Errors that reject a single command
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// One or more required fields are absent
    #[error("{action} requires {}", .fields.join(", "))]
    MissingField {
        /// Action that was rejected
        action: String,
        /// Names of every missing field
        fields: Vec<&'static str>,
    },

    /// A field is present but unusable
    #[error("{action} has invalid {field}: {reason}")]
    InvalidField {
        /// Action that was rejected
        action: String,
        /// Name of the offending field
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

/// Interpreter configuration
#[derive(Clone, Debug)]
pub struct InterpreterConfig {
    /// Service whose messages become line-addressable text
    pub text_service: String,
    /// Service routed to the log console
    pub log_service: String,
    /// Font size used when a command has no `Size`
    pub default_font_size: f64,
    /// Fixed-width font family for line-addressable text
    pub font_family: String,
    /// Lines retained by the log console
    pub console_max_lines: usize,
    /// Default text and line stroke color
    pub foreground: Color,
    /// Default rectangle fill
    pub fill: Color,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            text_service: "LCDT".to_string(),
            log_service: "LOG".to_string(),
            default_font_size: DEFAULT_FONT_SIZE,
            font_family: "Courier New".to_string(),
            console_max_lines: 500,
            foreground: Color::WHITE,
            fill: Color::GRAY,
        }
    }
}

/// What applying one command did
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Applied {
    /// Element placed by the command
    pub placed: Option<ElementHandle>,
    /// Number of elements removed
    pub removed: usize,
    /// Reply for query-style commands
    pub result: Option<ResultMessage>,
    /// Whether the command went to the log console
    pub logged: bool,
}

/// Element about to be placed
struct Draft {
    content: ElementContent,
    addressing: Addressing,
    expand_to_edge: bool,
    line_text: bool,
    tag: Option<String>,
    interactions: Interactions,
}

impl Draft {
    fn pixels(content: ElementContent, interactions: Interactions) -> Self {
        Self {
            content,
            addressing: Addressing::Pixels,
            expand_to_edge: false,
            line_text: false,
            tag: None,
            interactions,
        }
    }

    fn expanding(mut self) -> Self {
        self.expand_to_edge = true;
        self
    }

    fn tagged(mut self, tag: Option<String>) -> Self {
        self.tag = tag;
        self
    }
}

/// The screen state machine
///
/// Owns the element registry, the sensor set, the log console and the
/// rendering surface. It is not shared: one task applies commands in arrival
/// order (see [`crate::session`]).
pub struct Interpreter<S: RenderSurface> {
    config: InterpreterConfig,
    layout: LayoutResolver,
    registry: ElementRegistry,
    sensors: SensorSet,
    console: LogConsole,
    surface: S,
}

impl<S: RenderSurface> Interpreter<S> {
    /// Create an interpreter driving `surface`
    pub fn new(config: InterpreterConfig, surface: S) -> Self {
        Self {
            layout: LayoutResolver::new(config.default_font_size),
            console: LogConsole::new(config.console_max_lines),
            registry: ElementRegistry::new(),
            sensors: SensorSet::new(),
            config,
            surface,
        }
    }

    /// Apply one command
    ///
    /// # Errors
    ///
    /// Returns a [`CommandError`] when the command lacks required fields or
    /// carries unusable values. No state changes in that case.
    pub fn apply(&mut self, command: &Command) -> Result<Applied, CommandError> {
        let mut applied = Applied::default();

        if command.service == self.config.log_service {
            self.console.print(command);
            applied.logged = true;
            return Ok(applied);
        }

        let mut draft = None;

        if let Some(action) = command.action() {
            let color = self.decode_color(command);

            match action {
                Action::Orientation => applied.result = Some(self.orientation(command)),
                Action::Enable => {
                    let key = command.sensor_key();
                    let changed = self.sensors.enable(key.clone());
                    tracing::debug!(sensor = %key, changed, "Sensor enabled");
                    return Ok(applied);
                }
                Action::Disable => {
                    let key = command.sensor_key();
                    let changed = self.sensors.disable(&key);
                    tracing::debug!(sensor = %key, changed, "Sensor disabled");
                    return Ok(applied);
                }
                Action::Clear => applied.removed = self.clear(command, color),
                Action::Button => draft = Some(self.button(command)),
                Action::Image => draft = Some(Self::image(command)?),
                Action::Line => draft = Some(self.line(command)?),
                Action::Input => draft = Some(self.input(command, color)),
                Action::Rectangle => draft = Some(self.rectangle(command, color)),
                Action::Text => draft = Some(self.text(command, color)),
                Action::Other(name) => {
                    tracing::debug!(action = %name, service = %command.service, "Unrecognized action");
                }
            }
        }

        if draft.is_none() && command.service == self.config.text_service {
            if let Some(message) = &command.message {
                draft = Some(self.implicit_text(command, message));
            }
        }

        if let Some(draft) = draft {
            let (handle, overwritten) = self.place(command, draft);
            applied.placed = Some(handle);
            applied.removed += overwritten;
        }

        Ok(applied)
    }

    /// Translate a surface interaction into an outgoing event
    #[must_use]
    pub fn interact(&self, interaction: SurfaceInteraction) -> Option<InteractionEvent> {
        bridge::translate_interaction(&self.registry, interaction)
    }

    /// Interpreter configuration
    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    /// Live elements
    pub fn registry(&self) -> &ElementRegistry {
        &self.registry
    }

    /// Enabled sensors
    pub fn sensors(&self) -> &SensorSet {
        &self.sensors
    }

    /// Log console
    pub fn console(&self) -> &LogConsole {
        &self.console
    }

    /// Rendering surface
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Consume the interpreter, returning its surface
    pub fn into_surface(self) -> S {
        self.surface
    }

    // ------------------------------------------------------------------
    // Actions
    // ------------------------------------------------------------------

    fn decode_color(&self, command: &Command) -> Option<Color> {
        let spec = command.argb.as_deref()?.trim();
        if spec.is_empty() {
            return None;
        }
        let decoded = color::decode_argb(spec);
        if decoded.is_none() {
            tracing::warn!(argb = spec, service = %command.service, "Malformed color, using default");
        }
        decoded
    }

    fn orientation(&mut self, command: &Command) -> ResultMessage {
        let previous = self.surface.orientation();
        if let Some(code) = command.value {
            let next = Orientation(code);
            self.surface.set_orientation(next);
            tracing::debug!(%previous, %next, "Orientation changed");
        }
        bridge::orientation_result(command, previous)
    }

    fn clear(&mut self, command: &Command, color: Option<Color>) -> usize {
        if let Some(line) = command.y {
            return self.remove_line(line);
        }

        if let Some(pid) = command.pid {
            let removed = self.registry.remove_by_id(pid);
            for element in &removed {
                self.surface.remove(element.handle);
            }
            tracing::debug!(remote_id = pid, removed = removed.len(), "Cleared by id");
            return removed.len();
        }

        let removed = self.registry.clear();
        self.surface.clear();
        if let Some(color) = color {
            self.surface.set_background(color);
        }
        self.surface.stop_media();
        tracing::info!(removed = removed.len(), "Screen cleared");
        removed.len()
    }

    fn remove_line(&mut self, line: i32) -> usize {
        let removed = self.registry.remove_by_line(line);
        for element in &removed {
            self.surface.remove(element.handle);
        }
        if !removed.is_empty() {
            tracing::debug!(line, removed = removed.len(), "Cleared line");
        }
        removed.len()
    }

    fn button(&self, command: &Command) -> Draft {
        let content = ElementContent::Button {
            label: command.message.clone().unwrap_or_default(),
            font_size: self.layout.font_size(command),
        };
        Draft::pixels(content, Interactions::BUTTON).tagged(command.tag.clone())
    }

    fn image(command: &Command) -> Result<Draft, CommandError> {
        let path = command
            .path
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| CommandError::MissingField {
                action: Action::Image.name().to_string(),
                fields: vec!["Path"],
            })?;

        if !is_absolute_locator(path) {
            return Err(CommandError::InvalidField {
                action: Action::Image.name().to_string(),
                field: "Path",
                reason: format!("`{path}` is not an absolute locator"),
            });
        }

        let content = ElementContent::Image {
            source: path.to_string(),
            decode_width: command.width.and_then(|w| u32::try_from(w).ok()),
            decode_height: command.height.and_then(|h| u32::try_from(h).ok()),
        };
        Ok(Draft::pixels(content, Interactions::TAP).tagged(command.tag.clone()))
    }

    fn line(&self, command: &Command) -> Result<Draft, CommandError> {
        let (Some(x1), Some(y1), Some(x2), Some(y2)) =
            (command.x, command.y, command.x2, command.y2)
        else {
            let fields = [
                ("X", command.x),
                ("Y", command.y),
                ("X2", command.x2),
                ("Y2", command.y2),
            ]
            .into_iter()
            .filter(|(_, value)| value.is_none())
            .map(|(name, _)| name)
            .collect();

            return Err(CommandError::MissingField {
                action: Action::Line.name().to_string(),
                fields,
            });
        };

        // Per-command color applies to fill-style elements only; lines use the
        // configured foreground.
        let content = ElementContent::Line {
            x1: f64::from(x1),
            y1: f64::from(y1),
            x2: f64::from(x2),
            y2: f64::from(y2),
            stroke_width: command.width.map_or(1.0, f64::from),
            stroke: self.config.foreground,
        };

        let mut draft = Draft::pixels(content, Interactions::NONE);
        draft.addressing = Addressing::Endpoints;
        Ok(draft)
    }

    fn input(&self, command: &Command, color: Option<Color>) -> Draft {
        let content = ElementContent::Input {
            text: command.message.clone().unwrap_or_default(),
            font_size: self.layout.font_size(command),
            foreground: color.unwrap_or(self.config.foreground),
            multiline: command.multi.unwrap_or(false),
        };
        Draft::pixels(content, Interactions::INPUT).expanding()
    }

    fn rectangle(&self, command: &Command, color: Option<Color>) -> Draft {
        let content = ElementContent::Rectangle {
            fill: color.unwrap_or(self.config.fill),
        };
        Draft::pixels(content, Interactions::TAP).tagged(command.tag.clone())
    }

    fn text(&self, command: &Command, color: Option<Color>) -> Draft {
        let content = ElementContent::Text {
            text: command.message.clone().unwrap_or_default(),
            font_size: self.layout.font_size(command),
            foreground: color.unwrap_or(self.config.foreground),
            font_family: None,
            centered: false,
        };
        Draft::pixels(content, Interactions::NONE).expanding()
    }

    fn implicit_text(&self, command: &Command, message: &str) -> Draft {
        let font_size = self.layout.font_size(command);
        let foreground = command
            .foreground
            .as_deref()
            .and_then(|spec| {
                let decoded = color::decode_hex(spec);
                if decoded.is_none() {
                    tracing::warn!(foreground = spec, "Malformed foreground, using default");
                }
                decoded
            })
            .unwrap_or(self.config.foreground);

        let content = ElementContent::Text {
            text: message.to_string(),
            font_size,
            foreground,
            font_family: Some(self.config.font_family.clone()),
            centered: command.alignment() == Some(HorizontalAlignment::Center),
        };

        Draft {
            content,
            addressing: Addressing::Lines { font_size },
            expand_to_edge: true,
            line_text: true,
            tag: None,
            interactions: Interactions::NONE,
        }
    }

    // ------------------------------------------------------------------
    // Placement
    // ------------------------------------------------------------------

    /// Resolve geometry, apply column-0 overwrite, then register and materialize
    ///
    /// Returns the new handle and the number of overwritten elements.
    fn place(&mut self, command: &Command, draft: Draft) -> (ElementHandle, usize) {
        let placement = self.layout.resolve(command, draft.addressing, &self.registry);

        let alignment = command.alignment();
        if alignment.is_none() {
            if let Some(name) = &command.horizontal_alignment {
                tracing::debug!(alignment = %name, "Unknown horizontal alignment ignored");
            }
        }
        let flow_direction = command.direction();
        if flow_direction.is_none() {
            if let Some(name) = &command.flow_direction {
                tracing::debug!(flow_direction = %name, "Unknown flow direction ignored");
            }
        }

        let centered = alignment == Some(HorizontalAlignment::Center);
        let width = match draft.addressing {
            Addressing::Endpoints => None,
            Addressing::Lines { .. } | Addressing::Pixels => self.layout.width(
                command,
                draft.expand_to_edge,
                centered,
                self.surface.available_width(),
            ),
        };

        let mut overwritten = 0;
        if draft.line_text && placement.column == 0 {
            overwritten = self.remove_line(placement.row);
        }

        let handle = self.registry.allocate_handle();
        let descriptor = ElementDescriptor {
            handle,
            remote_id: command.id,
            service: command.service.clone(),
            tag: draft.tag,
            line: draft.line_text.then_some(placement.row),
            content: draft.content,
            geometry: Geometry {
                x: placement.x,
                y: placement.y,
                width,
                height: self.layout.height(command),
            },
            alignment,
            flow_direction,
            interactions: draft.interactions,
        };

        tracing::debug!(
            handle = %handle,
            kind = descriptor.kind().name(),
            line = ?descriptor.line,
            remote_id = ?descriptor.remote_id,
            x = descriptor.geometry.x,
            y = descriptor.geometry.y,
            "Element placed"
        );

        self.surface.place(&descriptor);
        self.registry.insert(descriptor);

        if draft.line_text && !placement.explicit_row {
            self.registry.advance_line(placement.row);
        }

        (handle, overwritten)
    }
}

/// Whether `path` is an absolute resource locator (`scheme:...` or `/...`)
fn is_absolute_locator(path: &str) -> bool {
    if path.starts_with('/') {
        return true;
    }
    let Some((scheme, _)) = path.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::HeadlessSurface;
    use pretty_assertions::assert_eq;

    fn interpreter() -> Interpreter<HeadlessSurface> {
        Interpreter::new(InterpreterConfig::default(), HeadlessSurface::new(640.0, 480.0))
    }

    #[test]
    fn test_absolute_locator() {
        assert!(is_absolute_locator("ms-appx:///Assets/logo.png"));
        assert!(is_absolute_locator("http://example.com/a.png"));
        assert!(is_absolute_locator("/var/images/a.png"));
        assert!(!is_absolute_locator("images/a.png"));
        assert!(!is_absolute_locator(":nope"));
        assert!(!is_absolute_locator("1http://x"));
    }

    #[test]
    fn test_missing_field_message_lists_fields() {
        let error = CommandError::MissingField {
            action: "LINE".to_string(),
            fields: vec!["X", "Y2"],
        };
        assert_eq!(error.to_string(), "LINE requires X, Y2");
    }

    #[test]
    fn test_log_service_goes_to_console() {
        let mut interpreter = interpreter();
        let applied = interpreter
            .apply(&Command::new("LOG").with_message("booted"))
            .unwrap();
        assert!(applied.logged);
        assert!(interpreter.registry().is_empty());
        assert_eq!(interpreter.console().text(), "booted\r\n");
    }

    #[test]
    fn test_line_uses_foreground_not_command_color() {
        let mut interpreter = interpreter();
        let mut command = Command::new("LCDG").with_action("LINE").at(0, 0);
        command.x2 = Some(10);
        command.y2 = Some(10);
        command.argb = Some("#FF102030".to_string());
        command.width = Some(3);

        let handle = interpreter.apply(&command).unwrap().placed.unwrap();
        let line = interpreter.registry().get(handle).unwrap();
        assert_eq!(line.color(), Some(Color::WHITE));
        assert_eq!(line.geometry.width, None);
        match &line.content {
            ElementContent::Line { stroke_width, .. } => assert_eq!(*stroke_width, 3.0),
            other => panic!("expected line, got {other:?}"),
        }
    }

    #[test]
    fn test_rectangle_uses_decoded_fill() {
        let mut interpreter = interpreter();
        let mut command = Command::new("LCDG").with_action("rectangle").at(5, 6);
        command.argb = Some("#00102030".to_string());

        let handle = interpreter.apply(&command).unwrap().placed.unwrap();
        let rect = interpreter.registry().get(handle).unwrap();
        assert_eq!(rect.color(), Some(Color::argb(255, 0x10, 0x20, 0x30)));
        assert_eq!((rect.geometry.x, rect.geometry.y), (5.0, 6.0));
    }

    #[test]
    fn test_malformed_color_falls_back() {
        let mut interpreter = interpreter();
        let mut command = Command::new("LCDG").with_action("RECTANGLE");
        command.argb = Some("#zz".to_string());

        let handle = interpreter.apply(&command).unwrap().placed.unwrap();
        assert_eq!(
            interpreter.registry().get(handle).unwrap().color(),
            Some(Color::GRAY)
        );
    }
}
