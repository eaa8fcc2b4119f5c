//! Rendering Surface
//!
//! The interpreter never touches a UI toolkit. It drives a [`RenderSurface`]
//! through a small set of abstract operations, and the surface adapter turns
//! them into widgets, pixels or whatever its platform uses.
//!
//! [`HeadlessSurface`] is the toolkit-free implementation used by tests and
//! the daemon. It records recent calls and keeps the resulting screen state so
//! it can be inspected from another clone.

use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::element::{ElementDescriptor, ElementHandle};

/// Display orientation flags, as carried in `Value` and `ResultId`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Orientation(pub i32);

impl Orientation {
    /// No preference
    pub const NONE: Orientation = Orientation(0);
    /// Landscape
    pub const LANDSCAPE: Orientation = Orientation(1);
    /// Portrait
    pub const PORTRAIT: Orientation = Orientation(2);
    /// Landscape, flipped
    pub const LANDSCAPE_FLIPPED: Orientation = Orientation(4);
    /// Portrait, flipped
    pub const PORTRAIT_FLIPPED: Orientation = Orientation(8);

    /// Raw orientation code
    #[must_use]
    pub const fn code(&self) -> i32 {
        self.0
    }

    /// Whether every flag of `other` is set
    #[must_use]
    pub const fn contains(&self, other: Orientation) -> bool {
        self.0 & other.0 == other.0
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = [
            (Self::LANDSCAPE, "landscape"),
            (Self::PORTRAIT, "portrait"),
            (Self::LANDSCAPE_FLIPPED, "landscape-flipped"),
            (Self::PORTRAIT_FLIPPED, "portrait-flipped"),
        ]
        .iter()
        .filter(|(flag, _)| self.contains(*flag))
        .map(|(_, name)| *name)
        .collect();

        if names.is_empty() {
            write!(f, "none")
        } else {
            write!(f, "{}", names.join("|"))
        }
    }
}

/// Operations a rendering surface must implement
///
/// Calls arrive from the single task that owns the interpreter, in the order
/// the commands were applied.
pub trait RenderSurface: Send {
    /// Materialize a newly placed element
    fn place(&mut self, element: &ElementDescriptor);

    /// Remove a previously placed element
    fn remove(&mut self, handle: ElementHandle);

    /// Remove every element
    fn clear(&mut self);

    /// Set the surface background
    fn set_background(&mut self, color: Color);

    /// Stop any media playback and drop its source
    fn stop_media(&mut self);

    /// Current orientation preference
    fn orientation(&self) -> Orientation;

    /// Change the orientation preference
    fn set_orientation(&mut self, orientation: Orientation);

    /// Width available to elements that stretch to the edge
    fn available_width(&self) -> f64;
}

/// Number of surface calls a [`HeadlessSurface`] remembers by default
pub const DEFAULT_OP_HISTORY: usize = 256;

/// One recorded surface call
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceOp {
    /// `place`
    Place(ElementHandle),
    /// `remove`
    Remove(ElementHandle),
    /// `clear`
    Clear,
    /// `set_background`
    Background(Color),
    /// `stop_media`
    StopMedia,
    /// `set_orientation`
    SetOrientation(Orientation),
}

#[derive(Debug)]
struct HeadlessState {
    width: f64,
    height: f64,
    elements: BTreeMap<ElementHandle, ElementDescriptor>,
    background: Color,
    orientation: Orientation,
    media_playing: bool,
    ops: VecDeque<SurfaceOp>,
    op_history: usize,
}

impl HeadlessState {
    fn record(&mut self, op: SurfaceOp) {
        if self.op_history == 0 {
            return;
        }
        if self.ops.len() == self.op_history {
            self.ops.pop_front();
        }
        self.ops.push_back(op);
    }
}

/// Toolkit-free surface that records what it is told
///
/// Cloning shares the underlying state. Only the most recent calls are kept,
/// so a long-running session holds memory proportional to the screen, not to
/// the number of commands applied.
#[derive(Clone, Debug)]
pub struct HeadlessSurface {
    state: Arc<Mutex<HeadlessState>>,
}

impl HeadlessSurface {
    /// Create a surface with the given size
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self::with_op_history(width, height, DEFAULT_OP_HISTORY)
    }

    /// Create a surface that remembers at most `op_history` calls
    ///
    /// Zero disables recording.
    #[must_use]
    pub fn with_op_history(width: f64, height: f64, op_history: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(HeadlessState {
                width,
                height,
                elements: BTreeMap::new(),
                background: Color::transparent(),
                orientation: Orientation::NONE,
                media_playing: false,
                ops: VecDeque::with_capacity(op_history.min(DEFAULT_OP_HISTORY)),
                op_history,
            })),
        }
    }

    /// Surface height
    #[must_use]
    pub fn height(&self) -> f64 {
        self.state.lock().height
    }

    /// Number of materialized elements
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.state.lock().elements.len()
    }

    /// Snapshot of a materialized element
    #[must_use]
    pub fn element(&self, handle: ElementHandle) -> Option<ElementDescriptor> {
        self.state.lock().elements.get(&handle).cloned()
    }

    /// Snapshot of all materialized elements, ordered by handle
    #[must_use]
    pub fn elements(&self) -> Vec<ElementDescriptor> {
        self.state.lock().elements.values().cloned().collect()
    }

    /// Current background
    #[must_use]
    pub fn background(&self) -> Color {
        self.state.lock().background
    }

    /// Whether media is marked as playing
    #[must_use]
    pub fn media_playing(&self) -> bool {
        self.state.lock().media_playing
    }

    /// Mark media as playing (stands in for a media side channel)
    pub fn start_media(&self) {
        self.state.lock().media_playing = true;
    }

    /// Recently recorded calls, oldest first
    #[must_use]
    pub fn ops(&self) -> Vec<SurfaceOp> {
        self.state.lock().ops.iter().cloned().collect()
    }

    /// Forget recorded calls
    pub fn clear_ops(&self) {
        self.state.lock().ops.clear();
    }
}

impl Default for HeadlessSurface {
    fn default() -> Self {
        Self::new(800.0, 480.0)
    }
}

impl RenderSurface for HeadlessSurface {
    fn place(&mut self, element: &ElementDescriptor) {
        let mut state = self.state.lock();
        tracing::trace!(
            handle = %element.handle,
            kind = element.kind().name(),
            x = element.geometry.x,
            y = element.geometry.y,
            "Headless place"
        );
        state.record(SurfaceOp::Place(element.handle));
        state.elements.insert(element.handle, element.clone());
    }

    fn remove(&mut self, handle: ElementHandle) {
        let mut state = self.state.lock();
        tracing::trace!(handle = %handle, "Headless remove");
        state.record(SurfaceOp::Remove(handle));
        state.elements.remove(&handle);
    }

    fn clear(&mut self) {
        let mut state = self.state.lock();
        state.record(SurfaceOp::Clear);
        state.elements.clear();
    }

    fn set_background(&mut self, color: Color) {
        let mut state = self.state.lock();
        state.record(SurfaceOp::Background(color));
        state.background = color;
    }

    fn stop_media(&mut self) {
        let mut state = self.state.lock();
        state.record(SurfaceOp::StopMedia);
        state.media_playing = false;
    }

    fn orientation(&self) -> Orientation {
        self.state.lock().orientation
    }

    fn set_orientation(&mut self, orientation: Orientation) {
        let mut state = self.state.lock();
        state.record(SurfaceOp::SetOrientation(orientation));
        state.orientation = orientation;
    }

    fn available_width(&self) -> f64 {
        self.state.lock().width
    }
}
