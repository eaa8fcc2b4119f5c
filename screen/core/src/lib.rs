//! Screen Core - Headless Remote Screen Interpreter
//!
//! This crate turns a stream of small JSON commands from a remote sender
//! (typically a microcontroller) into a model of on-screen elements, and turns
//! user interactions with those elements back into messages for the sender.
//! It knows nothing about any UI toolkit: a [`RenderSurface`] adapter does the
//! actual drawing, and [`HeadlessSurface`] stands in for one in tests and the
//! daemon.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                       Remote sender                               │
//! │              Command (down)      OutboundMessage (up)             │
//! └──────────────────────┬────────────────────▲───────────────────────┘
//!                        │                    │
//! ┌──────────────────────┼────────────────────┼───────────────────────┐
//! │                 SCREEN CORE               │                       │
//! │  ┌───────────────────▼────────────────────┴─────────────────────┐ │
//! │  │                     ScreenSession                             │ │
//! │  │  ┌─────────────────────────────────────────────────────────┐  │ │
//! │  │  │                    Interpreter                           │  │ │
//! │  │  │ ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────────┐ │  │ │
//! │  │  │ │ Layout   │ │ Element  │ │ Sensor   │ │ Log          │ │  │ │
//! │  │  │ │ Resolver │ │ Registry │ │ Set      │ │ Console      │ │  │ │
//! │  │  │ └──────────┘ └──────────┘ └──────────┘ └──────────────┘ │  │ │
//! │  │  └─────────────────────────┬─────────────────▲─────────────┘  │ │
//! │  └────────────────────────────┼─────────────────┼────────────────┘ │
//! └───────────────────────────────┼─────────────────┼──────────────────┘
//!                  place/remove/clear     SurfaceInteraction
//!                                 ▼                 │
//! ┌──────────────────────────────────────────────────────────────────┐
//! │            RenderSurface (toolkit adapter / headless)             │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Module Overview
//!
//! - [`color`]: ARGB and hex color decoding
//! - [`command`]: Inbound command record and action names
//! - [`element`]: Element descriptors, kinds and interaction flags
//! - [`registry`]: Element registry, line cursor and sensor set
//! - [`layout`]: Default positions and sizes
//! - [`interpreter`]: The command state machine
//! - [`bridge`]: Interaction events and query results
//! - [`messages`]: Outbound message types
//! - [`surface`]: Rendering surface trait and headless implementation
//! - [`console`]: Log console for the log service
//! - [`session`]: Single-owner actor around the interpreter
//! - [`config`]: TOML/env/CLI configuration
//!
//! # No UI Dependencies
//!
//! This crate has **zero** dependencies on any UI framework.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod bridge;
pub mod color;
pub mod command;
pub mod config;
pub mod console;
pub mod element;
pub mod interpreter;
pub mod layout;
pub mod messages;
pub mod registry;
pub mod session;
pub mod surface;

// Re-exports for convenience
pub use bridge::{translate_interaction, SurfaceInteraction};
pub use color::{decode_argb, decode_hex, Color};
pub use command::{Action, Command, FlowDirection, HorizontalAlignment};
pub use console::LogConsole;
pub use element::{
    ElementContent, ElementDescriptor, ElementHandle, ElementKind, Geometry, InteractionKind,
    Interactions,
};
pub use interpreter::{Applied, CommandError, Interpreter, InterpreterConfig};
pub use layout::{Addressing, LayoutResolver, Placement, DEFAULT_FONT_SIZE};
pub use messages::{InteractionEvent, OutboundMessage, ResultMessage};
pub use registry::{ElementRegistry, SensorSet, NO_LINE};
pub use session::{ScreenSession, SessionError, SessionHandle, SessionInput, SessionStats};
pub use surface::{HeadlessSurface, Orientation, RenderSurface, SurfaceOp, DEFAULT_OP_HISTORY};

// Config exports
pub use config::{
    default_config_path, load_config, load_config_from_path, ConfigError, ConfigOverrides,
    ConfigSource, ScreenConfigFile, ScreenConfigToml,
};
