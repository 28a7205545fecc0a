//! Canvas rendering for nodes, ports, connections and the grid.
//!
//! Elements are drawn in layers: grid first, then the connect-drag preview
//! (beneath everything interactive), then committed connections, then nodes
//! with their ports on top.

use super::state::{DragState, NodeEditorApp};
use crate::catalog;
use crate::constants::*;
use crate::model::{DiagramNode, PortId, PortRole};
use eframe::egui;
use eframe::epaint::StrokeKind;

/// Classic beveled-box fill shared by every node kind.
const NODE_FILL: egui::Color32 = egui::Color32::from_rgb(212, 208, 200);
/// Highlight stroke for the selected node and connection.
const SELECTION_COLOR: egui::Color32 = egui::Color32::from_rgb(50, 100, 255);
/// Accent color for error ports.
const ERROR_ACCENT: egui::Color32 = egui::Color32::from_rgb(128, 0, 0);
/// Color of the connect-drag preview line.
const TEMP_LINE_COLOR: egui::Color32 = egui::Color32::from_rgb(139, 0, 139);

impl NodeEditorApp {
    /// Renders the whole diagram onto the canvas painter.
    pub fn render_diagram(&self, painter: &egui::Painter, canvas_rect: egui::Rect) {
        let background = if self.dark_mode {
            egui::Color32::from_gray(32)
        } else {
            egui::Color32::from_gray(245)
        };
        painter.rect_filled(canvas_rect, 0.0, background);

        if self.canvas.show_grid {
            self.draw_grid(painter, canvas_rect);
        }

        // Preview first so it sits beneath all interactive shapes.
        for (start, end) in self.scene.temp_segments() {
            self.draw_temp_line(painter, start, end);
        }

        for (index, conn) in self.diagram.connections.iter().enumerate() {
            let a = self.world_to_screen(egui::pos2(conn.path.start.0, conn.path.start.1));
            let b = self.world_to_screen(egui::pos2(conn.path.end.0, conn.path.end.1));
            let (width, color) = if self.selection.is_connection_selected(index) {
                (CONNECTION_SELECTED_STROKE_WIDTH, SELECTION_COLOR)
            } else {
                (CONNECTION_STROKE_WIDTH, self.line_color())
            };
            painter.line_segment([a, b], egui::Stroke::new(width * self.canvas.zoom_factor, color));
        }

        // Stable stacking order to match the hit-test index.
        let mut nodes: Vec<&DiagramNode> = self.diagram.nodes.values().collect();
        nodes.sort_by_key(|n| n.id);
        for node in nodes {
            self.draw_node(painter, node);
        }
    }

    fn line_color(&self) -> egui::Color32 {
        if self.dark_mode {
            egui::Color32::from_gray(220)
        } else {
            egui::Color32::BLACK
        }
    }

    /// Draws the background grid, skipping it when zoomed out too far to read.
    pub fn draw_grid(&self, painter: &egui::Painter, canvas_rect: egui::Rect) {
        let grid_size = GRID_SIZE;
        let minor = egui::Stroke::new(1.0, egui::Color32::from_rgba_unmultiplied(128, 128, 128, 32));
        let major = egui::Stroke::new(1.0, egui::Color32::from_rgba_unmultiplied(128, 128, 128, 64));

        let screen_grid_size = grid_size * self.canvas.zoom_factor;
        if screen_grid_size < 2.0 {
            return;
        }

        let top_left_world = self.screen_to_world(canvas_rect.min);
        let bottom_right_world = self.screen_to_world(canvas_rect.max);
        let start_x = (top_left_world.x / grid_size).floor() * grid_size;
        let end_x = (bottom_right_world.x / grid_size).ceil() * grid_size;
        let start_y = (top_left_world.y / grid_size).floor() * grid_size;
        let end_y = (bottom_right_world.y / grid_size).ceil() * grid_size;

        let mut x = start_x;
        while x <= end_x {
            let screen_x = self.world_to_screen(egui::pos2(x, 0.0)).x;
            let is_major = (x / grid_size).round() as i64 % GRID_WIDTH as i64 == 0;
            painter.line_segment(
                [
                    egui::pos2(screen_x, canvas_rect.min.y),
                    egui::pos2(screen_x, canvas_rect.max.y),
                ],
                if is_major { major } else { minor },
            );
            x += grid_size;
        }

        let mut y = start_y;
        while y <= end_y {
            let screen_y = self.world_to_screen(egui::pos2(0.0, y)).y;
            let is_major = (y / grid_size).round() as i64 % GRID_WIDTH as i64 == 0;
            painter.line_segment(
                [
                    egui::pos2(canvas_rect.min.x, screen_y),
                    egui::pos2(canvas_rect.max.x, screen_y),
                ],
                if is_major { major } else { minor },
            );
            y += grid_size;
        }
    }

    fn draw_temp_line(&self, painter: &egui::Painter, start: egui::Pos2, end: egui::Pos2) {
        let a = self.world_to_screen(start);
        let b = self.world_to_screen(end);
        let stroke = egui::Stroke::new(
            TEMP_LINE_STROKE_WIDTH * self.canvas.zoom_factor,
            TEMP_LINE_COLOR,
        );
        painter.extend(egui::Shape::dashed_line(
            &[a, b],
            stroke,
            TEMP_LINE_DASH * self.canvas.zoom_factor,
            TEMP_LINE_GAP * self.canvas.zoom_factor,
        ));
    }

    fn draw_node(&self, painter: &egui::Painter, node: &DiagramNode) {
        let zoom = self.canvas.zoom_factor;
        let min = self.world_to_screen(egui::pos2(node.position.0, node.position.1));
        let size = egui::vec2(NODE_WIDTH * zoom, NODE_HEIGHT * zoom);
        let rect = egui::Rect::from_min_size(min, size);

        painter.rect_filled(rect, 0.0, NODE_FILL);

        // Classic bevel: light on the top/left inner edge, dark on the bottom/right.
        let inset = 2.0 * zoom;
        let light = egui::Stroke::new(2.0 * zoom, egui::Color32::WHITE);
        let dark = egui::Stroke::new(2.0 * zoom, egui::Color32::from_gray(128));
        painter.line_segment(
            [
                egui::pos2(rect.min.x + inset, rect.max.y - inset),
                egui::pos2(rect.min.x + inset, rect.min.y + inset),
            ],
            light,
        );
        painter.line_segment(
            [
                egui::pos2(rect.min.x + inset, rect.min.y + inset),
                egui::pos2(rect.max.x - inset, rect.min.y + inset),
            ],
            light,
        );
        painter.line_segment(
            [
                egui::pos2(rect.max.x - inset, rect.min.y + inset),
                egui::pos2(rect.max.x - inset, rect.max.y - inset),
            ],
            dark,
        );
        painter.line_segment(
            [
                egui::pos2(rect.min.x + inset, rect.max.y - inset),
                egui::pos2(rect.max.x - inset, rect.max.y - inset),
            ],
            dark,
        );

        let (border_width, border_color) = if self.selection.is_node_selected(node.id) {
            (NODE_SELECTED_BORDER_WIDTH, SELECTION_COLOR)
        } else {
            (NODE_BORDER_WIDTH, egui::Color32::BLACK)
        };
        painter.rect_stroke(
            rect,
            0.0,
            egui::Stroke::new(border_width * zoom, border_color),
            StrokeKind::Outside,
        );

        let font_size = (12.0 * zoom).clamp(8.0, 24.0);
        painter.text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            catalog::label(node.kind),
            egui::FontId::proportional(font_size),
            egui::Color32::BLACK,
        );

        for (slot, port) in node.ports.iter().enumerate() {
            let id = PortId {
                node: node.id,
                slot,
            };
            let center = self.world_to_screen(egui::pos2(
                node.position.0 + port.offset.0,
                node.position.1 + port.offset.1,
            ));
            let (ring_color, dot_color) = match port.role {
                PortRole::ErrorOut => (ERROR_ACCENT, egui::Color32::RED),
                _ => (egui::Color32::BLACK, egui::Color32::from_rgb(34, 34, 34)),
            };
            painter.circle_stroke(
                center,
                PORT_RING_RADIUS * zoom,
                egui::Stroke::new(1.0 * zoom, ring_color),
            );
            if self.is_port_dot_visible(id) {
                painter.circle_filled(center, PORT_DOT_RADIUS * zoom, dot_color);
            }
        }
    }

    /// A port's indicator dot shows while the port is hovered, while it is the
    /// source of an in-progress connect drag, or while any connection
    /// references it.
    pub fn is_port_dot_visible(&self, port: PortId) -> bool {
        if self.interaction.hovered_port == Some(port) {
            return true;
        }
        if let DragState::Connecting { source, .. } = self.interaction.drag {
            if source == port {
                return true;
            }
        }
        self.diagram.is_port_connected(port)
    }
}
