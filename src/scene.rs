//! The scene: an explicit containment index over the diagram's visual shapes,
//! and the hit testing that resolves a pointer position to a diagram entity.
//!
//! Instead of asking a live UI tree what sits under the pointer, the editor
//! maintains its own shape records (each with a parent link) and resolves hits
//! with a bounded walk over them. Deepest shape first, then upward through the
//! parent chain until a shape carrying a port tag is found; untagged
//! decorative shapes are skipped along the way. This keeps the engine
//! independent of the rendering framework's traversal APIs.

use eframe::egui;

use crate::constants::{CONNECTION_HIT_THRESHOLD, NODE_HEIGHT, NODE_WIDTH, PORT_HIT_RADIUS};
use crate::model::{Diagram, NodeId, PortId};

/// Handle to a shape in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeId(u64);

/// What a shape represents. Only `PortHit` carries a tag; everything else is
/// either an interactive surface in its own right or decoration the hit walk
/// skips over.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    /// The root background surface.
    Surface,
    /// A node's bounding box.
    NodeFrame(NodeId),
    /// The text-edit region inside a node. Hits here belong to the text
    /// editor, not the diagram; they must not deselect anything.
    TextRegion,
    /// Untagged decorative shape (bevel corners and the like).
    Decor,
    /// The tagged hit circle of a port.
    PortHit {
        /// The port this circle belongs to.
        port: PortId,
        /// The port's tag; an empty tag would make the walk skip this shape.
        tag: String,
    },
    /// A committed connection's visual path, by connection index.
    ConnectionLine(usize),
    /// The in-progress connect-drag preview. Never hit-testable.
    TempLine,
}

/// Geometry of a shape, in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeGeometry {
    /// Axis-aligned rectangle.
    Rect(egui::Rect),
    /// Circle around a center point.
    Circle {
        /// Center in world coordinates.
        center: egui::Pos2,
        /// Radius in world units.
        radius: f32,
    },
    /// Line segment with a hit threshold on either side.
    Line {
        /// Segment start.
        a: egui::Pos2,
        /// Segment end.
        b: egui::Pos2,
        /// Maximum distance from the segment that still counts as a hit.
        threshold: f32,
    },
}

#[derive(Debug, Clone)]
struct Shape {
    id: ShapeId,
    parent: Option<ShapeId>,
    kind: ShapeKind,
    geometry: ShapeGeometry,
    hit_testable: bool,
    visible: bool,
}

impl Shape {
    fn contains(&self, point: egui::Pos2) -> bool {
        match self.geometry {
            ShapeGeometry::Rect(rect) => rect.contains(point),
            ShapeGeometry::Circle { center, radius } => {
                (point - center).length_sq() <= radius * radius
            }
            ShapeGeometry::Line { a, b, threshold } => {
                point_to_segment_distance(point, a, b) <= threshold
            }
        }
    }
}

/// Result of resolving a pointer position against the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitEntity {
    /// A port's hit circle (directly, or reached by walking out of an inner shape).
    Port(PortId),
    /// A node's body, outside any port and outside the text region.
    NodeBody(NodeId),
    /// A committed connection's path, by connection index.
    Connection(usize),
    /// The root background surface itself.
    Background,
    /// Some other UI element (e.g. a text-edit region). Callers must not act
    /// on this; in particular it never triggers deselection.
    Other,
    /// Nothing under the pointer at all.
    Miss,
}

/// The shape store. Shapes are kept back-to-front; hit testing scans them
/// front-to-back so later (topmost) shapes win.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    shapes: Vec<Shape>,
    next_id: u64,
}

impl Scene {
    /// Creates an empty scene. Call [`Scene::sync`] to populate it.
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc_id(&mut self) -> ShapeId {
        self.next_id += 1;
        ShapeId(self.next_id)
    }

    fn index_of(&self, id: ShapeId) -> Option<usize> {
        self.shapes.iter().position(|s| s.id == id)
    }

    /// Rebuilds the shape records from the diagram: the surface, every
    /// connection path, and every node with its decorative children and port
    /// hit circles. Any attached connect-drag preview survives the rebuild,
    /// kept just above the surface so it stays beneath all interactive shapes.
    pub fn sync(&mut self, diagram: &Diagram, surface_rect: egui::Rect) {
        let temp_lines: Vec<Shape> = self
            .shapes
            .iter()
            .filter(|s| s.kind == ShapeKind::TempLine)
            .cloned()
            .collect();
        self.shapes.clear();

        let surface_id = self.alloc_id();
        self.shapes.push(Shape {
            id: surface_id,
            parent: None,
            kind: ShapeKind::Surface,
            geometry: ShapeGeometry::Rect(surface_rect),
            hit_testable: true,
            visible: true,
        });
        for mut temp in temp_lines {
            temp.parent = Some(surface_id);
            self.shapes.push(temp);
        }

        for (index, conn) in diagram.connections.iter().enumerate() {
            let id = self.alloc_id();
            self.shapes.push(Shape {
                id,
                parent: Some(surface_id),
                kind: ShapeKind::ConnectionLine(index),
                geometry: ShapeGeometry::Line {
                    a: egui::pos2(conn.path.start.0, conn.path.start.1),
                    b: egui::pos2(conn.path.end.0, conn.path.end.1),
                    threshold: CONNECTION_HIT_THRESHOLD,
                },
                hit_testable: true,
                visible: true,
            });
        }

        // HashMap iteration order is arbitrary; sort for a stable stacking order.
        let mut nodes: Vec<_> = diagram.nodes.values().collect();
        nodes.sort_by_key(|n| n.id);
        for node in nodes {
            let origin = egui::pos2(node.position.0, node.position.1);
            let frame_id = self.alloc_id();
            self.shapes.push(Shape {
                id: frame_id,
                parent: Some(surface_id),
                kind: ShapeKind::NodeFrame(node.id),
                geometry: ShapeGeometry::Rect(egui::Rect::from_min_size(
                    origin,
                    egui::vec2(NODE_WIDTH, NODE_HEIGHT),
                )),
                hit_testable: true,
                visible: true,
            });
            // Corner highlight decorations; untagged, so the hit walk passes
            // through them to the frame.
            for corner in [egui::vec2(2.0, 56.0), egui::vec2(96.0, 2.0)] {
                let id = self.alloc_id();
                self.shapes.push(Shape {
                    id,
                    parent: Some(frame_id),
                    kind: ShapeKind::Decor,
                    geometry: ShapeGeometry::Rect(egui::Rect::from_min_size(
                        origin + corner,
                        egui::vec2(2.0, 2.0),
                    )),
                    hit_testable: true,
                    visible: true,
                });
            }
            let text_id = self.alloc_id();
            self.shapes.push(Shape {
                id: text_id,
                parent: Some(frame_id),
                kind: ShapeKind::TextRegion,
                geometry: ShapeGeometry::Rect(egui::Rect::from_min_size(
                    origin + egui::vec2(10.0, 10.0),
                    egui::vec2(78.0, 40.0),
                )),
                hit_testable: true,
                visible: true,
            });
            for (slot, port) in node.ports.iter().enumerate() {
                let id = self.alloc_id();
                self.shapes.push(Shape {
                    id,
                    parent: Some(frame_id),
                    kind: ShapeKind::PortHit {
                        port: PortId {
                            node: node.id,
                            slot,
                        },
                        tag: port.tag.clone(),
                    },
                    geometry: ShapeGeometry::Circle {
                        center: origin + egui::vec2(port.offset.0, port.offset.1),
                        radius: PORT_HIT_RADIUS,
                    },
                    hit_testable: true,
                    visible: true,
                });
            }
        }
    }

    /// Resolves the most specific diagram entity under `point`.
    ///
    /// Precedence: a tagged port found by walking outward from the deepest hit
    /// shape, then a connection path hit directly, then the background surface
    /// itself; anything else is an opaque non-diagram element.
    pub fn resolve_entity_at(&self, point: egui::Pos2) -> HitEntity {
        let Some(deepest) = self
            .shapes
            .iter()
            .rposition(|s| s.hit_testable && s.visible && s.contains(point))
        else {
            log::debug!("hit test miss at {point:?}");
            return HitEntity::Miss;
        };

        // Walk outward looking for a tagged port shape; untagged decorations
        // along the chain are skipped.
        let mut cursor = Some(deepest);
        while let Some(i) = cursor {
            let shape = &self.shapes[i];
            if let ShapeKind::PortHit { port, tag } = &shape.kind {
                if !tag.is_empty() {
                    log::debug!("hit port {tag} at {point:?}");
                    return HitEntity::Port(*port);
                }
            }
            cursor = shape.parent.and_then(|p| self.index_of(p));
        }

        match &self.shapes[deepest].kind {
            ShapeKind::ConnectionLine(index) => HitEntity::Connection(*index),
            ShapeKind::Surface => HitEntity::Background,
            ShapeKind::TextRegion => HitEntity::Other,
            ShapeKind::NodeFrame(node) => HitEntity::NodeBody(*node),
            ShapeKind::Decor => {
                // Decoration belongs to whichever node frame contains it.
                let mut cursor = self.shapes[deepest].parent.and_then(|p| self.index_of(p));
                while let Some(i) = cursor {
                    if let ShapeKind::NodeFrame(node) = self.shapes[i].kind {
                        return HitEntity::NodeBody(node);
                    }
                    cursor = self.shapes[i].parent.and_then(|p| self.index_of(p));
                }
                HitEntity::Other
            }
            ShapeKind::PortHit { .. } | ShapeKind::TempLine => HitEntity::Other,
        }
    }

    /// Adds the connect-drag preview segment, anchored at `start`, just above
    /// the surface. The preview is never hit-testable, so it cannot intercept
    /// its own drop resolution.
    pub fn attach_temp_line(&mut self, start: egui::Pos2, end: egui::Pos2) -> ShapeId {
        let id = self.alloc_id();
        let parent = self.shapes.first().map(|s| s.id);
        let insert_at = if self.shapes.is_empty() { 0 } else { 1 };
        self.shapes.insert(
            insert_at,
            Shape {
                id,
                parent,
                kind: ShapeKind::TempLine,
                geometry: ShapeGeometry::Line {
                    a: start,
                    b: end,
                    threshold: 0.0,
                },
                hit_testable: false,
                visible: true,
            },
        );
        id
    }

    /// Moves the preview's free endpoint to `end`.
    pub fn update_temp_line_end(&mut self, id: ShapeId, end: egui::Pos2) {
        if let Some(i) = self.index_of(id) {
            if let ShapeGeometry::Line { b, .. } = &mut self.shapes[i].geometry {
                *b = end;
            }
        }
    }

    /// Whether the shape is currently part of the scene.
    pub(crate) fn is_attached(&self, id: ShapeId) -> bool {
        self.index_of(id).is_some()
    }

    /// Re-attaches the preview if something removed it mid-drag, and snaps its
    /// endpoints. Losing the visual must never cost a logically valid
    /// connection, so finalize always runs through here first.
    pub fn ensure_attached(&mut self, id: ShapeId, start: egui::Pos2, end: egui::Pos2) -> ShapeId {
        if let Some(i) = self.index_of(id) {
            self.shapes[i].geometry = ShapeGeometry::Line {
                a: start,
                b: end,
                threshold: 0.0,
            };
            return id;
        }
        log::warn!("connect preview was detached mid-drag; re-attaching before finalize");
        self.attach_temp_line(start, end)
    }

    /// Turns the preview into the committed connection's path shape: snapped
    /// endpoints, hit-testable from now on, registered under the connection's
    /// index so future clicks select it.
    pub fn promote_temp_line(&mut self, id: ShapeId, index: usize, start: egui::Pos2, end: egui::Pos2) {
        if let Some(i) = self.index_of(id) {
            let shape = &mut self.shapes[i];
            shape.kind = ShapeKind::ConnectionLine(index);
            shape.geometry = ShapeGeometry::Line {
                a: start,
                b: end,
                threshold: CONNECTION_HIT_THRESHOLD,
            };
            shape.hit_testable = true;
            shape.visible = true;
        }
    }

    /// Removes a shape from the scene.
    pub fn detach(&mut self, id: ShapeId) {
        if let Some(i) = self.index_of(id) {
            self.shapes.remove(i);
        }
    }

    /// Shows or hides a shape. Hidden shapes are skipped by hit testing.
    pub fn set_visible(&mut self, id: ShapeId, visible: bool) {
        if let Some(i) = self.index_of(id) {
            self.shapes[i].visible = visible;
        }
    }

    /// Endpoints of every visible connect-drag preview, for rendering.
    pub fn temp_segments(&self) -> Vec<(egui::Pos2, egui::Pos2)> {
        self.shapes
            .iter()
            .filter(|s| s.kind == ShapeKind::TempLine && s.visible)
            .filter_map(|s| match s.geometry {
                ShapeGeometry::Line { a, b, .. } => Some((a, b)),
                _ => None,
            })
            .collect()
    }
}

/// Distance from `point` to the closest point on segment `a`-`b`.
fn point_to_segment_distance(point: egui::Pos2, a: egui::Pos2, b: egui::Pos2) -> f32 {
    let seg = b - a;
    let to_point = point - a;
    let len_sq = seg.length_sq();
    if len_sq < 0.0001 {
        return to_point.length();
    }
    let t = (to_point.dot(seg) / len_sq).clamp(0.0, 1.0);
    (point - (a + seg * t)).length()
}
