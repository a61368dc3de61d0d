// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Reference timelines: one base life-course DAG plus six structural
//! variants.
//!
//! All seven graphs share the same twelve events (same types, same
//! attribute values, fresh ids per graph) and differ only in a handful of
//! edges. That makes them useful as "target" fixtures: fingerprints of
//! neighboring variants should land close under cosine similarity while
//! still differing in at least one bucket.
use std::collections::BTreeMap;

use crate::graph::{EventGraph, GraphError};
use crate::ident::EventId;
use crate::node::{AttrValue, EventNode};

/// Number of graphs produced by [`reference_timelines`].
pub const TIMELINE_COUNT: usize = 7;

/// Builds the seven reference timelines.
///
/// Index 0 is the base life course (school → work → family); indexes 1–6
/// are variants with an extra shortcut edge, a replaced edge, or a
/// re-ordered house/marriage/relocation path.
///
/// # Errors
/// Propagates [`GraphError`]; the fixed edge lists are acyclic, so none
/// are expected.
pub fn reference_timelines() -> Result<Vec<EventGraph>, GraphError> {
    // Edges reference events by their index in `timeline_events`.
    let base: &[(usize, usize)] = &[
        (0, 1),   // started_school -> finished_school
        (1, 10),  // finished_school -> graduated_highschool
        (1, 11),  // finished_school -> graduated_university
        (10, 2),  // graduated_highschool -> started_work
        (11, 2),  // graduated_university -> started_work
        (2, 4),   // started_work -> bought_house
        (2, 5),   // started_work -> got_married
        (5, 7),   // got_married -> had_child
        (7, 3),   // had_child -> new_family_member
        (4, 8),   // bought_house -> moved_city
        (8, 9),   // moved_city -> moved_country
        (6, 3),   // got_divorced -> new_family_member
    ];

    let graphs = vec![
        build(base)?,
        build(&extended(base, &[(2, 8)]))?,
        build(&replaced(base, (4, 8), (4, 3)))?,
        build(&extended(base, &[(2, 8), (5, 8)]))?,
        build(&replaced(base, (2, 4), (5, 4)))?,
        build(&replaced(base, (4, 8), (8, 4)))?,
        build(&extended(base, &[(11, 8), (3, 9)]))?,
    ];
    Ok(graphs)
}

fn extended(base: &[(usize, usize)], extra: &[(usize, usize)]) -> Vec<(usize, usize)> {
    base.iter().chain(extra).copied().collect()
}

fn replaced(
    base: &[(usize, usize)],
    drop: (usize, usize),
    add: (usize, usize),
) -> Vec<(usize, usize)> {
    base.iter()
        .copied()
        .filter(|edge| *edge != drop)
        .chain(std::iter::once(add))
        .collect()
}

fn build(edges: &[(usize, usize)]) -> Result<EventGraph, GraphError> {
    let nodes = timeline_events();
    let ids: Vec<EventId> = nodes.iter().map(EventNode::id).collect();
    let mut graph = EventGraph::new();
    for node in nodes {
        graph.add_node(node)?;
    }
    for &(from, to) in edges {
        graph.add_edge(ids[from], ids[to])?;
    }
    Ok(graph)
}

/// The twelve shared events with their literal attribute values.
fn timeline_events() -> Vec<EventNode> {
    let specs: &[(&str, &[(&str, AttrValue)])] = &[
        (
            "started_school",
            &[
                ("age", AttrValue::Int(6)),
                ("time", AttrValue::Str("2005-09".into())),
                ("education_level", AttrValue::Str("primary".into())),
            ],
        ),
        (
            "finished_school",
            &[
                ("age", AttrValue::Int(18)),
                ("time", AttrValue::Str("2017-05".into())),
                ("education_level", AttrValue::Str("highschool".into())),
            ],
        ),
        (
            "started_work",
            &[
                ("age", AttrValue::Int(22)),
                ("time", AttrValue::Str("2019-06".into())),
                ("industry", AttrValue::Str("tech".into())),
                ("position", AttrValue::Str("junior".into())),
                ("company", AttrValue::Str("Acme Corp".into())),
            ],
        ),
        (
            "new_family_member",
            &[
                ("age", AttrValue::Int(30)),
                ("time", AttrValue::Str("2022-01".into())),
            ],
        ),
        (
            "bought_house",
            &[
                ("age", AttrValue::Int(28)),
                ("time", AttrValue::Str("2021-07".into())),
            ],
        ),
        (
            "got_married",
            &[
                ("age", AttrValue::Int(29)),
                ("time", AttrValue::Str("2021-06".into())),
            ],
        ),
        (
            "got_divorced",
            &[
                ("age", AttrValue::Int(35)),
                ("time", AttrValue::Str("2023-03".into())),
            ],
        ),
        (
            "had_child",
            &[
                ("age", AttrValue::Int(30)),
                ("time", AttrValue::Str("2022-02".into())),
            ],
        ),
        (
            "moved_city",
            &[
                ("age", AttrValue::Int(27)),
                ("time", AttrValue::Str("2020-10".into())),
                ("city", AttrValue::Str("Chiang Mai".into())),
            ],
        ),
        (
            "moved_country",
            &[
                ("age", AttrValue::Int(33)),
                ("time", AttrValue::Str("2024-01".into())),
                ("country", AttrValue::Str("Australia".into())),
            ],
        ),
        (
            "graduated_highschool",
            &[
                ("age", AttrValue::Int(18)),
                ("time", AttrValue::Str("2017-05".into())),
            ],
        ),
        (
            "graduated_university",
            &[
                ("age", AttrValue::Int(22)),
                ("time", AttrValue::Str("2021-06".into())),
            ],
        ),
    ];

    specs
        .iter()
        .map(|(event_type, attrs)| {
            let attributes: BTreeMap<String, AttrValue> = attrs
                .iter()
                .map(|(name, value)| ((*name).to_owned(), value.clone()))
                .collect();
            EventNode::with_attributes(*event_type, attributes)
        })
        .collect()
}
