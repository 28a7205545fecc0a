//! User interface components and interaction logic for the node editor.
//!
//! # Module Organization
//!
//! - `state` - Application state structures and the main NodeEditorApp
//! - `canvas` - Navigation, coordinate transforms, and the drag controller
//! - `selection` - The node-XOR-connection selection protocol
//! - `rendering` - Drawing nodes, ports, connections, and the grid

mod canvas;
mod rendering;
mod selection;
mod state;


pub use state::NodeEditorApp;

use crate::constants::ERROR_RECEIVED_SPAWN_OFFSET_Y;
use crate::model::NodeKind;
use eframe::egui;

impl eframe::App for NodeEditorApp {
    /// Persist UI settings between restarts. The diagram itself is
    /// session-only and is skipped by serialization.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        match self.to_json() {
            Ok(json) => storage.set_string("app_state", json),
            Err(err) => log::error!("failed to serialize app state: {err}"),
        }
    }

    /// Main update function called by egui for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let visuals = if self.dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        };
        ctx.set_visuals(visuals);

        self.handle_create_shortcuts(ctx);
        self.handle_delete_key(ctx);

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.checkbox(&mut self.canvas.show_grid, "Grid");
                ui.checkbox(&mut self.dark_mode, "Dark mode");
                ui.separator();
                ui.label(
                    "Ctrl+N General · Ctrl+E Error · Ctrl+V Combinator · \
                     Ctrl+S Separator · Ctrl+1 Start · Ctrl+0 End · Del removes selection",
                );
            });
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                self.draw_canvas(ui);
            });
    }
}

impl NodeEditorApp {
    /// Lays out the canvas area, runs navigation and pointer dispatch against
    /// a scene kept in step with the diagram, then paints everything.
    pub fn draw_canvas(&mut self, ui: &mut egui::Ui) {
        let (response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());

        self.handle_canvas_panning(ui, &response);
        self.handle_canvas_zoom(ui, &response);

        // The hit-test index must reflect the current model before events are
        // dispatched against it.
        self.sync_scene(response.rect);
        self.handle_pointer_interactions(ui, &response);

        // Dispatch may have mutated the diagram; refresh before painting.
        self.sync_scene(response.rect);
        self.render_diagram(&painter, response.rect);
    }

    /// Rebuilds the scene over the world-space region the canvas shows.
    fn sync_scene(&mut self, canvas_rect: egui::Rect) {
        let world_rect = egui::Rect::from_min_max(
            self.screen_to_world(canvas_rect.min),
            self.screen_to_world(canvas_rect.max),
        );
        self.scene.sync(&self.diagram, world_rect);
    }

    /// Ctrl-modified node creation commands, placed at the pointer position.
    fn handle_create_shortcuts(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() || !ctx.input(|i| i.modifiers.command) {
            return;
        }
        let Some(pointer) = ctx.input(|i| i.pointer.hover_pos()) else {
            return;
        };
        let world = self.screen_to_world(pointer);
        let at = (world.x, world.y);

        let pressed = |key: egui::Key| ctx.input(|i| i.key_pressed(key));
        if pressed(egui::Key::N) {
            self.diagram.add_node(NodeKind::General, at);
        }
        if pressed(egui::Key::E) {
            // An Error node always arrives with its receiver box below it.
            // The receiver is placed by its top-left corner, not centered.
            self.diagram.add_node(NodeKind::Error, at);
            self.diagram
                .add_node_at(NodeKind::ErrorReceived, (at.0, at.1 + ERROR_RECEIVED_SPAWN_OFFSET_Y));
        }
        if pressed(egui::Key::V) {
            self.diagram.add_node(NodeKind::Combinator, at);
        }
        if pressed(egui::Key::S) {
            self.diagram.add_node(NodeKind::Separator, at);
        }
        if pressed(egui::Key::Num1) {
            self.diagram.add_node(NodeKind::Start, at);
        }
        if pressed(egui::Key::Num0) {
            self.diagram.add_node(NodeKind::End, at);
        }
    }

    /// Delete/Backspace removes the current selection, unless a text edit
    /// widget owns the keyboard.
    fn handle_delete_key(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        let delete_pressed = ctx.input(|i| {
            i.key_pressed(egui::Key::Delete) || i.key_pressed(egui::Key::Backspace)
        });
        if delete_pressed {
            self.delete_selected();
        }
    }

    /// Acts on the current selection: cascade-removes a selected node, or
    /// removes a single selected connection. No-op when nothing is selected.
    pub(crate) fn delete_selected(&mut self) {
        if let Some(id) = self.selection.node.take() {
            self.diagram.remove_node(&id);
            self.interaction.hovered_port = None;
        } else if let Some(index) = self.selection.connection.take() {
            self.diagram.remove_connection(index);
        }
    }
}
