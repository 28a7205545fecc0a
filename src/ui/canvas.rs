//! Canvas interaction: navigation, pointer dispatch, and the drag controller.
//!
//! This module handles canvas panning and zooming, coordinate transformations
//! between screen and world space, and the two drag modes (node repositioning
//! and port-to-port connection dragging) driven by pointer events.

use super::state::{DragState, NodeEditorApp};
use crate::model::PortId;
use crate::scene::{HitEntity, ShapeId};
use eframe::egui;

impl NodeEditorApp {
    /// Converts screen coordinates to world coordinates accounting for zoom and pan.
    pub fn screen_to_world(&self, screen_pos: egui::Pos2) -> egui::Pos2 {
        (screen_pos - self.canvas.offset) / self.canvas.zoom_factor
    }

    /// Converts world coordinates to screen coordinates accounting for zoom and pan.
    pub fn world_to_screen(&self, world_pos: egui::Pos2) -> egui::Pos2 {
        world_pos * self.canvas.zoom_factor + self.canvas.offset
    }

    /// Handles middle-click or Cmd/Ctrl+left-click canvas panning.
    ///
    /// `modifiers.command` automatically uses Cmd on macOS and Ctrl elsewhere.
    pub fn handle_canvas_panning(&mut self, ui: &mut egui::Ui, response: &egui::Response) {
        let should_pan = ui.input(|i| {
            i.pointer.middle_down() || (i.pointer.primary_down() && i.modifiers.command)
        });

        if should_pan {
            if let Some(current_pos) = response.interact_pointer_pos() {
                if !self.interaction.is_panning {
                    self.interaction.is_panning = true;
                    self.interaction.last_pan_pos = Some(current_pos);
                } else if let Some(last_pos) = self.interaction.last_pan_pos {
                    let delta = current_pos - last_pos;
                    self.canvas.offset += delta;
                    self.interaction.last_pan_pos = Some(current_pos);
                }
            }
        } else {
            self.interaction.is_panning = false;
            self.interaction.last_pan_pos = None;
        }
    }

    /// Handles scroll wheel zooming, keeping the point under the cursor fixed.
    /// Zoom range is clamped between 0.25x and 5.0x.
    pub fn handle_canvas_zoom(&mut self, ui: &mut egui::Ui, response: &egui::Response) {
        let scroll_delta = ui.input(|i| i.smooth_scroll_delta.y);

        if scroll_delta != 0.0 {
            let mouse_pos = ui
                .input(|i| i.pointer.hover_pos())
                .or_else(|| response.interact_pointer_pos());

            if let Some(mouse_pos) = mouse_pos {
                if !response.rect.contains(mouse_pos) {
                    return;
                }

                let world_pos_before_zoom = self.screen_to_world(mouse_pos);

                let zoom_delta = if scroll_delta > 0.0 { 0.025 } else { -0.025 };
                let old_zoom = self.canvas.zoom_factor;
                self.canvas.zoom_factor = (self.canvas.zoom_factor + zoom_delta).clamp(0.25, 5.0);

                if (self.canvas.zoom_factor - old_zoom).abs() > f32::EPSILON {
                    let world_pos_after_zoom = self.world_to_screen(world_pos_before_zoom);
                    self.canvas.offset += mouse_pos - world_pos_after_zoom;
                }
            }
        }
    }

    /// Dispatches primary-button pointer events to the drag controller and the
    /// selection protocol. Panning takes priority; while it is active no drag
    /// mode can start.
    pub fn handle_pointer_interactions(&mut self, ui: &mut egui::Ui, response: &egui::Response) {
        // Hover tracking is independent of both drag modes.
        self.interaction.hovered_port = ui
            .input(|i| i.pointer.hover_pos())
            .map(|pos| self.screen_to_world(pos))
            .and_then(|world| match self.scene.resolve_entity_at(world) {
                HitEntity::Port(port) => Some(port),
                _ => None,
            });

        let pressed = ui.input(|i| i.pointer.primary_pressed());
        let down = ui.input(|i| i.pointer.primary_down());
        let released = ui.input(|i| i.pointer.primary_released());

        let Some(pointer) = response
            .interact_pointer_pos()
            .or_else(|| ui.input(|i| i.pointer.hover_pos()))
        else {
            return;
        };
        let world = self.screen_to_world(pointer);

        if !self.interaction.is_panning && !ui.input(|i| i.modifiers.command) {
            if pressed {
                self.on_pointer_down(world);
            } else if down {
                self.on_pointer_move(world);
            }
        }
        // A release must reach the state machine even while the pan modifier
        // is held, or an active drag stays stuck past the button-up.
        if released {
            self.on_pointer_up(world);
        }
    }

    /// Pointer-down entry point of the drag state machine. Only reachable from
    /// `Idle`: each mode captures the pointer for its duration, so a second
    /// down event mid-drag is ignored structurally.
    pub(crate) fn on_pointer_down(&mut self, world: egui::Pos2) {
        if self.interaction.drag != DragState::Idle {
            return;
        }
        match self.scene.resolve_entity_at(world) {
            HitEntity::Port(port) => self.begin_connect_drag(port),
            HitEntity::NodeBody(id) => {
                self.selection.select_node(id);
                self.interaction.drag = DragState::MovingNode {
                    id,
                    last_pos: world,
                };
            }
            HitEntity::Connection(index) => self.selection.select_connection(index),
            HitEntity::Background => self.selection.deselect_all(),
            // Text regions and anything un-modeled: do nothing, in particular
            // do not deselect.
            HitEntity::Other | HitEntity::Miss => {}
        }
    }

    /// Pointer-move step of whichever drag mode is active.
    pub(crate) fn on_pointer_move(&mut self, world: egui::Pos2) {
        match self.interaction.drag {
            DragState::Idle => {}
            DragState::MovingNode { id, last_pos } => {
                let delta = world - last_pos;
                if delta != egui::Vec2::ZERO {
                    // Attached connection endpoints track the move live.
                    self.diagram.move_node_by(id, delta.x, delta.y);
                }
                self.interaction.drag = DragState::MovingNode {
                    id,
                    last_pos: world,
                };
            }
            DragState::Connecting { temp, .. } => {
                self.scene.update_temp_line_end(temp, world);
            }
        }
    }

    /// Pointer-up exit of the drag state machine.
    pub(crate) fn on_pointer_up(&mut self, world: egui::Pos2) {
        match std::mem::take(&mut self.interaction.drag) {
            DragState::Idle => {}
            // No validation on node moves; any position is legal.
            DragState::MovingNode { .. } => {}
            DragState::Connecting { source, temp } => {
                self.finish_connect_drag(source, temp, world);
            }
        }
    }

    /// Enters connect mode: a dashed preview segment anchored at the source
    /// port's center, kept beneath all interactive shapes.
    fn begin_connect_drag(&mut self, source: PortId) {
        let Some(center) = self.diagram.port_center(source) else {
            return;
        };
        let anchor = egui::pos2(center.0, center.1);
        let temp = self.scene.attach_temp_line(anchor, anchor);
        log::debug!(
            "connect drag started from {:?}",
            self.diagram.port_tag(source)
        );
        self.interaction.drag = DragState::Connecting { source, temp };
    }

    /// Resolves the release point and either commits the preview as a
    /// permanent connection or discards it.
    fn finish_connect_drag(&mut self, source: PortId, temp: ShapeId, world: egui::Pos2) {
        // Hide the preview during resolution so it cannot hit-test itself.
        self.scene.set_visible(temp, false);
        let hit = self.scene.resolve_entity_at(world);
        self.scene.set_visible(temp, true);

        let target = match hit {
            HitEntity::Port(port) if port != source => port,
            _ => {
                log::debug!("invalid drop (self or no port); removing preview");
                self.scene.detach(temp);
                return;
            }
        };

        let (Some(start), Some(end)) = (
            self.diagram.port_center(source),
            self.diagram.port_center(target),
        ) else {
            self.scene.detach(temp);
            return;
        };
        let start = egui::pos2(start.0, start.1);
        let end = egui::pos2(end.0, end.1);

        // The preview may have been detached by a concurrent rebuild; a lost
        // visual must never cost a logically valid connection.
        let temp = self.scene.ensure_attached(temp, start, end);

        match self.diagram.add_connection(source, target) {
            Some(index) => {
                // Snap the far endpoint to the target port's center, restyle to
                // the committed appearance and register it for hit testing.
                self.scene.promote_temp_line(temp, index, start, end);
                log::debug!(
                    "connection {index} committed: {:?} -> {:?}",
                    self.diagram.port_tag(source),
                    self.diagram.port_tag(target)
                );
            }
            None => self.scene.detach(temp),
        }
    }
}
