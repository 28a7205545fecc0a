//! Core data types for the node diagram.
//!
//! This module defines nodes, ports, connections and the [`Diagram`] aggregate
//! that owns them, together with all mutation operations the editor performs.

use std::collections::HashMap;
use uuid::Uuid;

use crate::catalog;
use crate::constants::{NODE_HEIGHT, NODE_WIDTH};

/// Unique identifier for diagram nodes.
pub type NodeId = Uuid;

/// The structural kind of a node. Kinds differ only in label and port layout;
/// there is no runtime interpretation of the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Plain processing box with one input and one output.
    General,
    /// Box with an extra error output on its top edge.
    Error,
    /// Sink for error outputs; input only.
    ErrorReceived,
    /// Merges two inputs into one output.
    Combinator,
    /// Splits one input into two outputs.
    Separator,
    /// Entry point; output only.
    Start,
    /// Terminal point; input only.
    End,
}

/// The role a port plays on its node's boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortRole {
    /// Receives connections.
    In,
    /// Originates connections.
    Out,
    /// Originates error connections; drawn in the error accent color.
    ErrorOut,
}

/// An attachment point on a node's boundary. Ports are owned by their node and
/// never exist independently of it.
#[derive(Debug, Clone)]
pub struct Port {
    /// Tag string in the form `"<Role>_<KindOrLabel>[_<index>]"`. Hit testing
    /// uses the tag to tell port shapes apart from untagged decorative shapes.
    pub tag: String,
    /// Role of this port.
    pub role: PortRole,
    /// Center of the port in node-local coordinates (the node box is
    /// `NODE_WIDTH` x `NODE_HEIGHT` with origin at its top-left corner).
    pub offset: (f32, f32),
}

/// Diagram-wide reference to a port: the owning node plus the port's slot in
/// that node's ordered port list.
///
/// The tag string alone cannot serve as the identity because two nodes of the
/// same kind carry identical tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PortId {
    /// Node that owns the port.
    pub node: NodeId,
    /// Index into the node's port list.
    pub slot: usize,
}

/// A straight visual path with two endpoints in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// Start point (the `from` port's center).
    pub start: (f32, f32),
    /// End point (the `to` port's center).
    pub end: (f32, f32),
}

/// A directed link between two ports. The connection holds non-owning port
/// references; its only owned resource is the visual path.
#[derive(Debug, Clone)]
pub struct Connection {
    /// Source port.
    pub from: PortId,
    /// Target port.
    pub to: PortId,
    /// The connection's owned visual path, kept in sync with the endpoint
    /// port centers as nodes move.
    pub path: Segment,
}

/// A single node in the diagram: fixed-size box of one [`NodeKind`] with an
/// ordered list of owned ports.
#[derive(Debug, Clone)]
pub struct DiagramNode {
    /// Unique identifier for this node.
    pub id: NodeId,
    /// Structural kind, which determines the label and port layout.
    pub kind: NodeKind,
    /// Top-left corner of the bounding box in world coordinates.
    pub position: (f32, f32),
    /// Ports owned by this node, in catalog order.
    pub ports: Vec<Port>,
}

impl DiagramNode {
    /// Creates a node of the given kind with its top-left corner at `top_left`.
    /// Ports are instantiated from the kind's catalog layout.
    pub fn new(kind: NodeKind, top_left: (f32, f32)) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            position: top_left,
            ports: catalog::port_layout(kind)
                .iter()
                .map(|spec| Port {
                    tag: spec.tag.to_string(),
                    role: spec.role,
                    offset: spec.offset,
                })
                .collect(),
        }
    }

    /// World-space center of the port at `slot`, or `None` for an out-of-range slot.
    pub fn port_center(&self, slot: usize) -> Option<(f32, f32)> {
        self.ports.get(slot).map(|port| {
            (
                self.position.0 + port.offset.0,
                self.position.1 + port.offset.1,
            )
        })
    }
}

/// The aggregate root: all nodes and connections of one diagram.
///
/// Connections are kept in creation order; that order doubles as hit-test
/// precedence and as the connection's identity (its index).
#[derive(Debug, Clone, Default)]
pub struct Diagram {
    /// All nodes, indexed by id. Insertion order is irrelevant.
    pub nodes: HashMap<NodeId, DiagramNode>,
    /// All connections in creation order.
    pub connections: Vec<Connection>,
}

impl Diagram {
    /// Creates an empty diagram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node of `kind` centered on `pointer_pos`, so the box's top-left
    /// lands at `pointer_pos - (width/2, height/2)`. Always succeeds.
    pub fn add_node(&mut self, kind: NodeKind, pointer_pos: (f32, f32)) -> NodeId {
        self.add_node_at(
            kind,
            (
                pointer_pos.0 - NODE_WIDTH / 2.0,
                pointer_pos.1 - NODE_HEIGHT / 2.0,
            ),
        )
    }

    /// Adds a node of `kind` with its top-left corner at `top_left`.
    /// Used directly for the paired Error Received node, which the editor
    /// places below its Error node without centering.
    pub fn add_node_at(&mut self, kind: NodeKind, top_left: (f32, f32)) -> NodeId {
        let node = DiagramNode::new(kind, top_left);
        let id = node.id;
        log::debug!("add_node {kind:?} at {top_left:?} -> {id}");
        self.nodes.insert(id, node);
        id
    }

    /// World-space center of the referenced port, or `None` if the reference
    /// is stale (node gone or slot out of range).
    pub fn port_center(&self, port: PortId) -> Option<(f32, f32)> {
        self.nodes
            .get(&port.node)
            .and_then(|node| node.port_center(port.slot))
    }

    /// Returns the port's tag, if the reference resolves.
    pub fn port_tag(&self, port: PortId) -> Option<&str> {
        self.nodes
            .get(&port.node)
            .and_then(|node| node.ports.get(port.slot))
            .map(|p| p.tag.as_str())
    }

    /// Ancestry check: true iff `port` resolves to a live port owned by `node`.
    pub(crate) fn is_port_of(&self, port: PortId, node: NodeId) -> bool {
        port.node == node
            && self
                .nodes
                .get(&node)
                .is_some_and(|n| port.slot < n.ports.len())
    }

    /// True iff at least one connection references `port` at either end.
    /// Drives the port indicator dot's "stays visible while connected" rule.
    pub fn is_port_connected(&self, port: PortId) -> bool {
        self.connections
            .iter()
            .any(|c| c.from == port || c.to == port)
    }

    /// Adds a connection between two distinct live ports and returns its index.
    ///
    /// A self-connection (`from == to`) or a stale endpoint is rejected with
    /// `None` — a user-facing no-op, not a fault. There is no duplicate
    /// detection: a second drag between the same ports creates a second
    /// connection.
    pub fn add_connection(&mut self, from: PortId, to: PortId) -> Option<usize> {
        if from == to {
            log::debug!("add_connection rejected: identical port {from:?}");
            return None;
        }
        let (start, end) = match (self.port_center(from), self.port_center(to)) {
            (Some(start), Some(end)) => (start, end),
            _ => {
                log::debug!("add_connection rejected: unresolved endpoint {from:?} -> {to:?}");
                return None;
            }
        };
        self.connections.push(Connection {
            from,
            to,
            path: Segment { start, end },
        });
        let index = self.connections.len() - 1;
        log::debug!(
            "connection {} added: {:?} -> {:?} (total {})",
            index,
            self.port_tag(from),
            self.port_tag(to),
            self.connections.len()
        );
        Some(index)
    }

    /// Removes the connection at `index`. Nodes are unaffected.
    pub fn remove_connection(&mut self, index: usize) -> bool {
        if index < self.connections.len() {
            self.connections.remove(index);
            true
        } else {
            false
        }
    }

    /// Removes a node and, first, every connection with an endpoint owned by
    /// it. The touching connections are computed as a batch before the node is
    /// detached, because port ancestry is undefined once the node is gone.
    pub fn remove_node(&mut self, node_id: &NodeId) -> bool {
        if !self.nodes.contains_key(node_id) {
            return false;
        }
        let before = self.connections.len();
        self.connections
            .retain(|c| !(c.from.node == *node_id || c.to.node == *node_id));
        log::debug!(
            "remove_node {node_id}: cascaded {} connection(s)",
            before - self.connections.len()
        );
        self.nodes.remove(node_id).is_some()
    }

    /// Translates a node by `(dx, dy)` and refreshes the endpoints of every
    /// attached connection so they track the move live.
    pub fn move_node_by(&mut self, node_id: NodeId, dx: f32, dy: f32) {
        if let Some(node) = self.nodes.get_mut(&node_id) {
            node.position.0 += dx;
            node.position.1 += dy;
        } else {
            return;
        }
        self.update_connections_for(node_id);
    }

    /// Recomputes the world-space endpoints of every connection whose `from`
    /// or `to` port belongs to `node_id`. O(connections), which is fine at
    /// the tens-to-hundreds scale this editor targets.
    pub fn update_connections_for(&mut self, node_id: NodeId) {
        let Some(node) = self.nodes.get(&node_id) else {
            return;
        };
        let centers: Vec<Option<(f32, f32)>> =
            (0..node.ports.len()).map(|s| node.port_center(s)).collect();
        for conn in &mut self.connections {
            if conn.from.node == node_id {
                if let Some(Some(center)) = centers.get(conn.from.slot) {
                    conn.path.start = *center;
                }
            }
            if conn.to.node == node_id {
                if let Some(Some(center)) = centers.get(conn.to.slot) {
                    conn.path.end = *center;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn port(diagram: &Diagram, node: NodeId, tag: &str) -> PortId {
        let slot = diagram.nodes[&node]
            .ports
            .iter()
            .position(|p| p.tag == tag)
            .unwrap_or_else(|| panic!("no port tagged {tag}"));
        PortId { node, slot }
    }

    #[test]
    fn add_node_centers_box_on_pointer() {
        let mut diagram = Diagram::new();
        let id = diagram.add_node(NodeKind::General, (200.0, 150.0));

        let node = &diagram.nodes[&id];
        assert_eq!(node.position, (150.0, 120.0));
        assert_eq!(node.kind, NodeKind::General);
    }

    #[test]
    fn port_centers_sit_on_node_boundary() {
        let mut diagram = Diagram::new();
        let id = diagram.add_node_at(NodeKind::General, (0.0, 0.0));

        let input = port(&diagram, id, "In_General");
        let output = port(&diagram, id, "Out_General");
        assert_eq!(diagram.port_center(input), Some((0.0, 32.0)));
        assert_eq!(diagram.port_center(output), Some((100.0, 32.0)));
    }

    #[test]
    fn add_connection_rejects_identical_port() {
        let mut diagram = Diagram::new();
        let id = diagram.add_node(NodeKind::Start, (0.0, 0.0));
        let out = port(&diagram, id, "Out_Start");

        assert_eq!(diagram.add_connection(out, out), None);
        assert!(diagram.connections.is_empty());
    }

    #[test]
    fn add_connection_rejects_stale_endpoint() {
        let mut diagram = Diagram::new();
        let a = diagram.add_node(NodeKind::Start, (0.0, 0.0));
        let out = port(&diagram, a, "Out_Start");
        let ghost = PortId {
            node: Uuid::new_v4(),
            slot: 0,
        };

        assert_eq!(diagram.add_connection(out, ghost), None);
        assert_eq!(diagram.add_connection(ghost, out), None);
        assert!(diagram.connections.is_empty());
    }

    #[test]
    fn add_connection_between_distinct_ports_succeeds() {
        let mut diagram = Diagram::new();
        let a = diagram.add_node(NodeKind::Start, (100.0, 100.0));
        let b = diagram.add_node(NodeKind::General, (300.0, 100.0));
        let from = port(&diagram, a, "Out_Start");
        let to = port(&diagram, b, "In_General");

        let index = diagram.add_connection(from, to);

        assert_eq!(index, Some(0));
        let conn = &diagram.connections[0];
        assert_eq!(conn.path.start, diagram.port_center(from).unwrap());
        assert_eq!(conn.path.end, diagram.port_center(to).unwrap());
    }

    #[test]
    fn duplicate_connections_are_allowed() {
        let mut diagram = Diagram::new();
        let a = diagram.add_node(NodeKind::Start, (0.0, 0.0));
        let b = diagram.add_node(NodeKind::End, (200.0, 0.0));
        let from = port(&diagram, a, "Out_Start");
        let to = port(&diagram, b, "In_End");

        assert_eq!(diagram.add_connection(from, to), Some(0));
        assert_eq!(diagram.add_connection(from, to), Some(1));
        assert_eq!(diagram.connections.len(), 2);
    }

    #[test]
    fn remove_node_cascades_exactly_its_connections() {
        let mut diagram = Diagram::new();
        let a = diagram.add_node(NodeKind::Start, (0.0, 0.0));
        let b = diagram.add_node(NodeKind::General, (200.0, 0.0));
        let c = diagram.add_node(NodeKind::End, (400.0, 0.0));
        let a_out = port(&diagram, a, "Out_Start");
        let b_in = port(&diagram, b, "In_General");
        let b_out = port(&diagram, b, "Out_General");
        let c_in = port(&diagram, c, "In_End");
        diagram.add_connection(a_out, b_in).unwrap();
        diagram.add_connection(b_out, c_in).unwrap();
        let survivor_from = port(&diagram, a, "Out_Start");
        let survivor_to = port(&diagram, c, "In_End");
        diagram.add_connection(survivor_from, survivor_to).unwrap();

        assert!(diagram.remove_node(&b));

        assert_eq!(diagram.connections.len(), 1);
        assert_eq!(diagram.connections[0].from, survivor_from);
        assert_eq!(diagram.connections[0].to, survivor_to);
        assert!(!diagram.nodes.contains_key(&b));
    }

    #[test]
    fn remove_nonexistent_node_is_a_noop() {
        let mut diagram = Diagram::new();
        assert!(!diagram.remove_node(&Uuid::new_v4()));
    }

    #[test]
    fn remove_connection_leaves_nodes_alone() {
        let mut diagram = Diagram::new();
        let a = diagram.add_node(NodeKind::Start, (0.0, 0.0));
        let b = diagram.add_node(NodeKind::End, (200.0, 0.0));
        let from = port(&diagram, a, "Out_Start");
        let to = port(&diagram, b, "In_End");
        diagram.add_connection(from, to).unwrap();

        assert!(diagram.remove_connection(0));
        assert!(!diagram.remove_connection(0));
        assert_eq!(diagram.nodes.len(), 2);
    }

    #[test]
    fn moving_a_node_shifts_attached_endpoints_by_the_same_delta() {
        let mut diagram = Diagram::new();
        let a = diagram.add_node(NodeKind::Start, (100.0, 100.0));
        let b = diagram.add_node(NodeKind::General, (300.0, 100.0));
        let c = diagram.add_node(NodeKind::End, (500.0, 100.0));
        let a_out = port(&diagram, a, "Out_Start");
        let b_in = port(&diagram, b, "In_General");
        let b_out = port(&diagram, b, "Out_General");
        let c_in = port(&diagram, c, "In_End");
        diagram.add_connection(a_out, b_in).unwrap();
        diagram.add_connection(b_out, c_in).unwrap();

        let attached_before = diagram.connections[0].path;
        let far_before = {
            // connection 1's far end belongs to c and must not move
            diagram.connections[1].path.end
        };

        diagram.move_node_by(b, 25.0, -10.0);

        let attached_after = diagram.connections[0].path;
        assert_eq!(attached_after.start, attached_before.start);
        assert_eq!(
            attached_after.end,
            (attached_before.end.0 + 25.0, attached_before.end.1 - 10.0)
        );
        assert_eq!(diagram.connections[1].path.end, far_before);
    }

    #[test]
    fn is_port_connected_tracks_both_endpoints() {
        let mut diagram = Diagram::new();
        let a = diagram.add_node(NodeKind::Start, (0.0, 0.0));
        let b = diagram.add_node(NodeKind::End, (200.0, 0.0));
        let from = port(&diagram, a, "Out_Start");
        let to = port(&diagram, b, "In_End");

        assert!(!diagram.is_port_connected(from));
        diagram.add_connection(from, to).unwrap();
        assert!(diagram.is_port_connected(from));
        assert!(diagram.is_port_connected(to));

        diagram.remove_connection(0);
        assert!(!diagram.is_port_connected(to));
    }

    #[test]
    fn ancestry_check_requires_live_owned_port() {
        let mut diagram = Diagram::new();
        let a = diagram.add_node(NodeKind::General, (0.0, 0.0));
        let b = diagram.add_node(NodeKind::General, (200.0, 0.0));
        let p = port(&diagram, a, "In_General");

        assert!(diagram.is_port_of(p, a));
        assert!(!diagram.is_port_of(p, b));
        assert!(!diagram.is_port_of(PortId { node: a, slot: 99 }, a));
    }
}
