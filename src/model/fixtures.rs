// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowcanvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::diagram::Diagram;
use super::element::{ComponentKind, DiagramElement, ElementDetails, Position};
use super::ids::{DiagramId, ElementId};

pub(crate) fn eid(value: &str) -> ElementId {
    ElementId::new(value).expect("element id")
}

fn place(diagram: &mut Diagram, element: DiagramElement) {
    diagram.elements_mut().insert(element.element_id().clone(), element);
}

/// `proc-a -> funnel-b -> rpg-c`, plus an unconnected `funnel-d`.
pub(crate) fn small_flow() -> Diagram {
    let mut diagram = Diagram::new(DiagramId::new("d:flow").expect("diagram id"), "Flow");

    place(
        &mut diagram,
        DiagramElement::new(eid("proc-a"), ComponentKind::Processor, Position::new(0.0, 0.0))
            .with_details(ElementDetails::Processor {
                component_type: Some("GenerateFlowFile".to_owned()),
            }),
    );
    place(
        &mut diagram,
        DiagramElement::new(eid("funnel-b"), ComponentKind::Funnel, Position::new(200.0, 0.0)),
    );
    place(
        &mut diagram,
        DiagramElement::new(
            eid("rpg-c"),
            ComponentKind::RemoteProcessGroup,
            Position::new(400.0, 0.0),
        )
        .with_details(ElementDetails::RemoteProcessGroup {
            target_uri: "https://remote.example.com/flow".to_owned(),
        }),
    );
    place(
        &mut diagram,
        DiagramElement::new(eid("funnel-d"), ComponentKind::Funnel, Position::new(200.0, 200.0)),
    );
    place(
        &mut diagram,
        DiagramElement::new(eid("conn-ab"), ComponentKind::Connection, Position::new(100.0, 0.0))
            .with_details(ElementDetails::Connection {
                source: eid("proc-a"),
                destination: eid("funnel-b"),
            }),
    );
    place(
        &mut diagram,
        DiagramElement::new(eid("conn-bc"), ComponentKind::Connection, Position::new(300.0, 0.0))
            .with_details(ElementDetails::Connection {
                source: eid("funnel-b"),
                destination: eid("rpg-c"),
            }),
    );

    diagram
}

#[cfg(test)]
mod tests {
    use super::small_flow;

    #[test]
    fn small_flow_has_nodes_and_connections() {
        let diagram = small_flow();
        assert_eq!(diagram.elements().len(), 6);
        let edges = diagram.elements().values().filter(|e| e.kind().is_edge()).count();
        assert_eq!(edges, 2);
    }
}
