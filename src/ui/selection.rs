//! The selection protocol: at most one node XOR one connection.
//!
//! Visual state follows the selection at render time (highlight stroke on the
//! selected entity, default styling on everything else), so these methods only
//! have to keep the two fields mutually exclusive.

use super::state::SelectionState;
use crate::model::NodeId;

impl SelectionState {
    /// Selects a node, clearing any connection selection. Idempotent when the
    /// node is already selected.
    pub fn select_node(&mut self, id: NodeId) {
        if self.node == Some(id) {
            return;
        }
        log::debug!("select node {id}");
        self.connection = None;
        self.node = Some(id);
    }

    /// Selects a connection by index, clearing any node selection.
    pub fn select_connection(&mut self, index: usize) {
        if self.connection == Some(index) {
            return;
        }
        log::debug!("select connection {index}");
        self.node = None;
        self.connection = Some(index);
    }

    /// Clears whichever selection is set.
    pub fn deselect_all(&mut self) {
        if self.node.is_some() || self.connection.is_some() {
            log::debug!("deselect all");
        }
        self.node = None;
        self.connection = None;
    }

    /// True if this node is the current selection.
    pub fn is_node_selected(&self, id: NodeId) -> bool {
        self.node == Some(id)
    }

    /// True if this connection index is the current selection.
    pub fn is_connection_selected(&self, index: usize) -> bool {
        self.connection == Some(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn selection_is_mutually_exclusive() {
        let mut sel = SelectionState::default();
        let node = Uuid::new_v4();

        sel.select_node(node);
        assert!(sel.is_node_selected(node));
        assert_eq!(sel.connection, None);

        sel.select_connection(2);
        assert_eq!(sel.node, None);
        assert!(sel.is_connection_selected(2));

        sel.select_node(node);
        assert_eq!(sel.connection, None);
        assert!(sel.node.is_some() ^ sel.connection.is_some());
    }

    #[test]
    fn deselect_all_clears_either_kind() {
        let mut sel = SelectionState::default();
        sel.select_node(Uuid::new_v4());
        sel.deselect_all();
        assert_eq!(sel, SelectionState::default());

        sel.select_connection(0);
        sel.deselect_all();
        assert_eq!(sel, SelectionState::default());
    }

    #[test]
    fn reselecting_the_same_node_is_idempotent() {
        let mut sel = SelectionState::default();
        let node = Uuid::new_v4();
        sel.select_node(node);
        let before = sel;
        sel.select_node(node);
        assert_eq!(sel, before);
    }
}
