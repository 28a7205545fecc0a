//! Application state structures.
//!
//! This module contains the state that tracks the editor's current UI
//! condition: canvas navigation, the drag state machine, the selection, and
//! the main application struct tying them to the diagram and its scene.

use crate::model::{Diagram, NodeId, PortId};
use crate::scene::{Scene, ShapeId};
use eframe::egui;
use serde::{Deserialize, Serialize};

/// State related to canvas navigation and display.
#[derive(Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasState {
    /// Current canvas pan offset for navigation (in screen space)
    #[serde(skip)]
    pub offset: egui::Vec2,
    /// Current zoom level (1.0 = normal, 2.0 = 2x zoom, 0.5 = 50% zoom)
    pub zoom_factor: f32,
    /// Whether the grid should be displayed on the canvas
    pub show_grid: bool,
}

impl Default for CanvasState {
    fn default() -> Self {
        Self {
            offset: egui::Vec2::ZERO,
            zoom_factor: 1.0,
            show_grid: true,
        }
    }
}

/// The drag state machine. The two drag modes are mutually exclusive by
/// construction: there is exactly one variant live at a time, and a
/// pointer-down is only dispatched from `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    /// No drag in progress.
    #[default]
    Idle,
    /// Repositioning a node; `last_pos` is the reference point the next
    /// pointer-move delta is computed from (world space).
    MovingNode {
        /// Node being dragged.
        id: NodeId,
        /// Last pointer position, world space.
        last_pos: egui::Pos2,
    },
    /// Dragging a connection out of a port.
    Connecting {
        /// The port the drag started from.
        source: PortId,
        /// Scene shape of the dashed preview segment.
        temp: ShapeId,
    },
}

/// Transient pointer-interaction state.
#[derive(Default)]
pub struct InteractionState {
    /// Current drag mode.
    pub drag: DragState,
    /// Port currently under the pointer, if any. Drives the indicator dot.
    pub hovered_port: Option<PortId>,
    /// Whether the user is currently panning the canvas
    pub is_panning: bool,
    /// Last mouse position during panning operation
    pub last_pan_pos: Option<egui::Pos2>,
}

/// Tracks the current selection: at most one node XOR one connection.
/// All transitions go through the methods in `ui::selection`, which enforce
/// the exclusivity.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct SelectionState {
    /// Selected node, if any.
    pub node: Option<NodeId>,
    /// Selected connection index, if any.
    pub connection: Option<usize>,
}

/// The main application structure: the diagram being edited, its hit-test
/// scene, and all UI state.
///
/// This struct implements the `eframe::App` trait and handles all user
/// interface rendering and interaction logic.
#[derive(Serialize, Deserialize)]
#[serde(default)]
pub struct NodeEditorApp {
    /// The diagram being edited. Not persisted; diagrams live only for the session.
    #[serde(skip)]
    pub diagram: Diagram,
    /// Containment index rebuilt from the diagram each frame.
    #[serde(skip)]
    pub scene: Scene,
    /// Canvas navigation and display state
    pub canvas: CanvasState,
    /// Pointer interaction state
    #[serde(skip)]
    pub interaction: InteractionState,
    /// Current selection
    #[serde(skip)]
    pub selection: SelectionState,
    /// Whether dark mode visuals are enabled
    pub dark_mode: bool,
}

impl Default for NodeEditorApp {
    fn default() -> Self {
        Self {
            diagram: Diagram::default(),
            scene: Scene::default(),
            canvas: CanvasState::default(),
            interaction: InteractionState::default(),
            selection: SelectionState::default(),
            dark_mode: true,
        }
    }
}

impl NodeEditorApp {
    /// Serializes the persisted UI settings to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Restores UI settings from JSON. The diagram itself always starts empty.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
