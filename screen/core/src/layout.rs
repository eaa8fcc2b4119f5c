//! Layout Resolver
//!
//! Fills in the position of elements whose command omits coordinates.
//!
//! - Column `x` defaults to `0`, row `y` defaults to the registry's next line.
//! - Line-addressable text is positioned in line units: the on-surface
//!   position is `(x * font_size, y * font_size)`.
//! - Every other element uses raw pixel coordinates.
//! - Line elements carry their own endpoints and take no position.

use crate::command::Command;
use crate::registry::ElementRegistry;

/// Font size used whenever a command has no `Size`
pub const DEFAULT_FONT_SIZE: f64 = 22.0;

/// How an element's coordinates are interpreted
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Addressing {
    /// Column/row in units of the given font size
    Lines {
        /// Font size of the text
        font_size: f64,
    },
    /// Raw pixels
    Pixels,
    /// Positioned by its own endpoints
    Endpoints,
}

/// Resolved position of an element
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    /// Effective column (`X` or `0`)
    pub column: i32,
    /// Effective row (`Y` or the next free line)
    pub row: i32,
    /// Whether `Y` was given explicitly
    pub explicit_row: bool,
    /// On-surface left edge
    pub x: f64,
    /// On-surface top edge
    pub y: f64,
}

/// Computes default positions and sizes
#[derive(Clone, Debug)]
pub struct LayoutResolver {
    default_font_size: f64,
}

impl Default for LayoutResolver {
    fn default() -> Self {
        Self::new(DEFAULT_FONT_SIZE)
    }
}

impl LayoutResolver {
    /// Create a resolver with the given default font size
    #[must_use]
    pub fn new(default_font_size: f64) -> Self {
        Self { default_font_size }
    }

    /// The configured default font size
    #[must_use]
    pub fn default_font_size(&self) -> f64 {
        self.default_font_size
    }

    /// Effective font size for a command
    #[must_use]
    pub fn font_size(&self, command: &Command) -> f64 {
        command.size.unwrap_or(self.default_font_size)
    }

    /// Resolve the position of an element
    #[must_use]
    pub fn resolve(
        &self,
        command: &Command,
        addressing: Addressing,
        registry: &ElementRegistry,
    ) -> Placement {
        let column = command.x.unwrap_or(0);
        let row = command.y.unwrap_or_else(|| registry.next_line());

        let (x, y) = match addressing {
            Addressing::Lines { font_size } => {
                (f64::from(column) * font_size, f64::from(row) * font_size)
            }
            Addressing::Pixels => (f64::from(column), f64::from(row)),
            Addressing::Endpoints => (0.0, 0.0),
        };

        Placement {
            column,
            row,
            explicit_row: command.y.is_some(),
            x,
            y,
        }
    }

    /// Resolve the width of an element
    ///
    /// An explicit `Width` always wins. Otherwise centered elements take the
    /// full surface width so centering is visible, and elements that expand to
    /// the edge take the full surface width too.
    #[must_use]
    pub fn width(
        &self,
        command: &Command,
        expand_to_edge: bool,
        centered: bool,
        surface_width: f64,
    ) -> Option<f64> {
        match command.width {
            Some(width) => Some(f64::from(width)),
            None if centered || expand_to_edge => Some(surface_width),
            None => None,
        }
    }

    /// Resolve the height of an element
    #[must_use]
    pub fn height(&self, command: &Command) -> Option<f64> {
        command.height.map(f64::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text() -> Command {
        Command::new("LCDT").with_message("hi")
    }

    #[test]
    fn test_defaults_use_next_line() {
        let resolver = LayoutResolver::default();
        let mut registry = ElementRegistry::new();
        registry.advance_line(2);

        let placement = resolver.resolve(
            &text(),
            Addressing::Lines {
                font_size: DEFAULT_FONT_SIZE,
            },
            &registry,
        );
        assert_eq!(placement.column, 0);
        assert_eq!(placement.row, 3);
        assert!(!placement.explicit_row);
        assert_eq!((placement.x, placement.y), (0.0, 66.0));
    }

    #[test]
    fn test_line_units_scale_by_font_size() {
        let resolver = LayoutResolver::default();
        let registry = ElementRegistry::new();
        let command = text().at(2, 3);

        let placement = resolver.resolve(&command, Addressing::Lines { font_size: 10.0 }, &registry);
        assert!(placement.explicit_row);
        assert_eq!((placement.x, placement.y), (20.0, 30.0));
    }

    #[test]
    fn test_pixels_are_raw() {
        let resolver = LayoutResolver::default();
        let registry = ElementRegistry::new();
        let command = Command::new("LCDG").at(15, 40);

        let placement = resolver.resolve(&command, Addressing::Pixels, &registry);
        assert_eq!((placement.x, placement.y), (15.0, 40.0));
    }

    #[test]
    fn test_endpoints_take_no_position() {
        let resolver = LayoutResolver::default();
        let registry = ElementRegistry::new();
        let command = Command::new("LCDG").at(15, 40);

        let placement = resolver.resolve(&command, Addressing::Endpoints, &registry);
        assert_eq!((placement.x, placement.y), (0.0, 0.0));
    }

    #[test]
    fn test_font_size_default() {
        let resolver = LayoutResolver::new(30.0);
        let mut command = text();
        assert_eq!(resolver.font_size(&command), 30.0);
        command.size = Some(12.0);
        assert_eq!(resolver.font_size(&command), 12.0);
    }

    #[test]
    fn test_width_rules() {
        let resolver = LayoutResolver::default();
        let mut command = text();

        assert_eq!(resolver.width(&command, false, false, 800.0), None);
        assert_eq!(resolver.width(&command, true, false, 800.0), Some(800.0));
        assert_eq!(resolver.width(&command, false, true, 800.0), Some(800.0));

        command.width = Some(120);
        assert_eq!(resolver.width(&command, true, true, 800.0), Some(120.0));
    }
}
