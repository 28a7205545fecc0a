//! The fixed catalog of node kinds: display labels and per-kind port layouts.
//!
//! Every node is a 100x60 box; ports sit on its boundary at the offsets listed
//! here (port centers in node-local coordinates). The tag format is
//! `"<Role>_<KindOrLabel>[_<index>]"`, with the index disambiguating multiple
//! ports of one role on the same node.

use crate::model::{NodeKind, PortRole};

/// Static description of one port in a kind's layout table.
#[derive(Debug, Clone, Copy)]
pub struct PortSpec {
    /// Tag stamped onto the port shape; hit testing walks up to it.
    pub tag: &'static str,
    /// Role of the port.
    pub role: PortRole,
    /// Port center in node-local coordinates.
    pub offset: (f32, f32),
}

const GENERAL_PORTS: &[PortSpec] = &[
    PortSpec { tag: "In_General", role: PortRole::In, offset: (0.0, 32.0) },
    PortSpec { tag: "Out_General", role: PortRole::Out, offset: (100.0, 32.0) },
];

const ERROR_PORTS: &[PortSpec] = &[
    PortSpec { tag: "In_Error", role: PortRole::In, offset: (0.0, 32.0) },
    PortSpec { tag: "Out_Error", role: PortRole::Out, offset: (100.0, 32.0) },
    PortSpec { tag: "ErrorOut_Error", role: PortRole::ErrorOut, offset: (50.0, -4.0) },
];

const ERROR_RECEIVED_PORTS: &[PortSpec] = &[
    PortSpec { tag: "In_ErrorReceived", role: PortRole::In, offset: (0.0, 32.0) },
];

const COMBINATOR_PORTS: &[PortSpec] = &[
    PortSpec { tag: "In_Combinator_1", role: PortRole::In, offset: (0.0, 20.0) },
    PortSpec { tag: "In_Combinator_2", role: PortRole::In, offset: (0.0, 44.0) },
    PortSpec { tag: "Out_Combinator", role: PortRole::Out, offset: (100.0, 32.0) },
];

const SEPARATOR_PORTS: &[PortSpec] = &[
    PortSpec { tag: "In_Separator", role: PortRole::In, offset: (0.0, 32.0) },
    PortSpec { tag: "Out_Separator_1", role: PortRole::Out, offset: (100.0, 20.0) },
    PortSpec { tag: "Out_Separator_2", role: PortRole::Out, offset: (100.0, 44.0) },
];

const START_PORTS: &[PortSpec] = &[
    PortSpec { tag: "Out_Start", role: PortRole::Out, offset: (100.0, 32.0) },
];

const END_PORTS: &[PortSpec] = &[
    PortSpec { tag: "In_End", role: PortRole::In, offset: (0.0, 32.0) },
];

/// Port layout table for the given kind.
pub fn port_layout(kind: NodeKind) -> &'static [PortSpec] {
    match kind {
        NodeKind::General => GENERAL_PORTS,
        NodeKind::Error => ERROR_PORTS,
        NodeKind::ErrorReceived => ERROR_RECEIVED_PORTS,
        NodeKind::Combinator => COMBINATOR_PORTS,
        NodeKind::Separator => SEPARATOR_PORTS,
        NodeKind::Start => START_PORTS,
        NodeKind::End => END_PORTS,
    }
}

/// Display label drawn inside the node box.
pub fn label(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::General => "General",
        NodeKind::Error => "Error",
        NodeKind::ErrorReceived => "Error Received",
        NodeKind::Combinator => "Combinator",
        NodeKind::Separator => "Separator",
        NodeKind::Start => "START",
        NodeKind::End => "END",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{NODE_HEIGHT, NODE_WIDTH};

    const ALL_KINDS: &[NodeKind] = &[
        NodeKind::General,
        NodeKind::Error,
        NodeKind::ErrorReceived,
        NodeKind::Combinator,
        NodeKind::Separator,
        NodeKind::Start,
        NodeKind::End,
    ];

    #[test]
    fn every_kind_has_at_least_one_port() {
        for &kind in ALL_KINDS {
            assert!(!port_layout(kind).is_empty(), "{kind:?} has no ports");
        }
    }

    #[test]
    fn tags_are_unique_within_a_kind_and_carry_the_role_prefix() {
        for &kind in ALL_KINDS {
            let specs = port_layout(kind);
            for (i, spec) in specs.iter().enumerate() {
                let prefix = match spec.role {
                    PortRole::In => "In_",
                    PortRole::Out => "Out_",
                    PortRole::ErrorOut => "ErrorOut_",
                };
                assert!(
                    spec.tag.starts_with(prefix),
                    "{kind:?} port {} tag {:?} does not match its role",
                    i,
                    spec.tag
                );
                assert!(
                    specs.iter().filter(|s| s.tag == spec.tag).count() == 1,
                    "{kind:?} has duplicate tag {:?}",
                    spec.tag
                );
            }
        }
    }

    #[test]
    fn in_ports_sit_on_left_edge_and_out_ports_on_right_edge() {
        for &kind in ALL_KINDS {
            for spec in port_layout(kind) {
                match spec.role {
                    PortRole::In => assert_eq!(spec.offset.0, 0.0, "{kind:?} {}", spec.tag),
                    PortRole::Out => {
                        assert_eq!(spec.offset.0, NODE_WIDTH, "{kind:?} {}", spec.tag)
                    }
                    // The error output sits above the top edge, horizontally centered
                    PortRole::ErrorOut => {
                        assert_eq!(spec.offset.0, NODE_WIDTH / 2.0);
                        assert!(spec.offset.1 < 0.0);
                    }
                }
                assert!(spec.offset.1 < NODE_HEIGHT);
            }
        }
    }

    #[test]
    fn only_the_error_kind_has_an_error_output() {
        for &kind in ALL_KINDS {
            let has_err = port_layout(kind)
                .iter()
                .any(|s| s.role == PortRole::ErrorOut);
            assert_eq!(has_err, kind == NodeKind::Error);
        }
    }
}
