//! # Node Editor
//!
//! An interactive node-diagram editor: place typed nodes on a canvas, drag
//! connections between their labeled ports, and select or delete nodes and
//! connections.
//!
//! ## Features
//! - Fixed catalog of node kinds, each with its own port layout
//! - Port-to-port connection dragging with a live dashed preview
//! - Containment-index hit testing (ports, node bodies, connection paths)
//! - Single selection of a node or a connection, with cascade deletion
//! - Canvas panning and zooming

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod catalog;
pub mod constants;
pub mod model;
pub mod scene;
mod ui;

pub use model::*;
use ui::NodeEditorApp;

/// Runs the node editor application with default settings.
///
/// Initializes the egui application window, restores persisted UI settings if
/// any, and starts the main event loop.
pub fn run_app() -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Node Editor",
        options,
        Box::new(|cc| {
            let app = cc
                .storage
                .and_then(|storage| storage.get_string("app_state"))
                .and_then(|json| NodeEditorApp::from_json(&json).ok())
                .unwrap_or_default();
            Ok(Box::new(app))
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_diagram_by_default() {
        let diagram = Diagram::default();
        assert!(diagram.nodes.is_empty());
        assert!(diagram.connections.is_empty());
    }

    #[test]
    fn public_model_types_reexported() {
        let mut diagram = Diagram::new();
        let id = diagram.add_node(NodeKind::Start, (0.0, 0.0));
        assert_eq!(diagram.nodes[&id].ports.len(), 1);
    }
}
