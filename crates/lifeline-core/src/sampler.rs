// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Rule-constrained stochastic growth of life-event graphs.
//!
//! The sampler is a state machine over age: it advances from zero to a
//! weighted-random maximum, at each age evaluates every catalog entry
//! against the rule engine, runs one Bernoulli trial per surviving
//! candidate, caps simultaneous firings, and commits survivors in
//! lexicographic name order.
//!
//! Every committed event is chained onto the *single previously committed
//! node*, not onto a cause-specific predecessor. The result is a path with
//! optional cross-links added later through the graph API, not a
//! multi-parent causal DAG. That chain-to-last shape is intentional,
//! preserved behavior.
//!
//! An empty candidate set at a given age is a normal outcome; the loop
//! simply advances.
use std::collections::{BTreeMap, BTreeSet};

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::catalog::{EventCatalog, EventType};
use crate::graph::{EventGraph, GraphError};
use crate::ident::EventId;
use crate::node::{AttrValue, EventNode};
use crate::prng::Prng;
use crate::rule::{self, Rule, RuleSet};

/// Tunable parameters for one sampling run.
#[derive(Debug, Clone)]
pub struct SamplerConfig {
    /// Inclusive ceiling for the per-run target node count; the actual
    /// target is drawn uniformly from `2..=max_events`.
    pub max_events: u32,
    /// Base rate applied to candidates no rule band covers.
    pub default_rate: f32,
    /// Maximum number of events committed at a single age.
    pub max_per_age: usize,
    /// Weighted choices `(age, weight)` for a run's maximum age.
    pub age_max_choices: Vec<(u32, f32)>,
    /// Inclusive year range for synthesized `time` attributes.
    pub year_range: (i32, i32),
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            max_events: 80,
            default_rate: 0.01,
            max_per_age: 3,
            age_max_choices: vec![(70, 0.10), (75, 0.20), (80, 0.35), (85, 0.25), (90, 0.10)],
            year_range: (1950, 2025),
        }
    }
}

/// Grows one event graph under `rules`, drawing all randomness from `rng`.
///
/// The run terminates early once the drawn target node count is reached,
/// or when the drawn maximum age is exhausted — whichever comes first.
/// Constraint checks, trial order, and commit order are all deterministic
/// functions of the seed, so equal `(seed, catalog, rules, config)` inputs
/// replay byte-equal event sequences.
///
/// # Errors
/// Propagates [`GraphError`] from graph mutation; with fresh node ids and
/// chain-only edges none are expected in practice.
pub fn sample_graph(
    rng: &mut Prng,
    catalog: &EventCatalog,
    rules: &RuleSet,
    config: &SamplerConfig,
) -> Result<EventGraph, GraphError> {
    let mut graph = EventGraph::new();
    let mut last: Option<EventId> = None;

    // Name → matched-rules index, built once per run.
    let matched: FxHashMap<&str, Vec<&Rule>> = catalog
        .names()
        .map(|name| (name, rules.matched(name)))
        .collect();
    let mut occurred: BTreeSet<&str> = BTreeSet::new();
    let mut counts: FxHashMap<&str, u32> = FxHashMap::default();

    let age_max = pick_age_max(rng, &config.age_max_choices);
    let target_events = rng.next_u32(2, config.max_events.max(2)) as usize;

    for age in 0..=age_max {
        if graph.len() >= target_events {
            break;
        }

        // Candidates allowed by age, prerequisites, and caps, in catalog order.
        let mut candidates: Vec<(&str, f32)> = Vec::new();
        for name in catalog.names() {
            let rules_for = &matched[name];
            if !rule::allowed_by_age(rules_for, age) {
                continue;
            }
            if rule::prereqs_for(rules_for)
                .iter()
                .any(|req| !occurred.contains(req))
            {
                continue;
            }
            if let Some(cap) = rule::cap_for(rules_for) {
                if counts.get(name).copied().unwrap_or(0) >= cap {
                    continue;
                }
            }
            let p = rule::base_rate_for(rules_for, age, config.default_rate);
            if p > 0.0 {
                candidates.push((name, p));
            }
        }

        // Shuffle, then one independent Bernoulli trial per candidate. The
        // shuffle keeps the draw order of the random stream stable with the
        // reference behavior this sampler reproduces.
        rng.shuffle(&mut candidates);
        let mut fired: Vec<&str> = Vec::new();
        for &(name, p) in &candidates {
            if rng.bernoulli(p) {
                fired.push(name);
            }
        }

        // At most K events per age, drawn without replacement.
        if fired.len() > config.max_per_age {
            let keep = rng.sample_indices(fired.len(), config.max_per_age);
            fired = keep.into_iter().map(|index| fired[index]).collect();
        }

        // Commit in deterministic lexicographic order, chained to the last
        // committed node.
        fired.sort_unstable();
        for name in fired {
            let Some(entry) = catalog.get(name) else { continue };
            let attributes = synthesize_attributes(rng, entry, age, config);
            let node = EventNode::with_attributes(name, attributes);
            let id = node.id();
            graph.add_node(node)?;
            if let Some(prev) = last {
                graph.add_edge(prev, id)?;
            }
            last = Some(id);
            occurred.insert(name);
            *counts.entry(name).or_insert(0) += 1;
            trace!(event = name, age, "committed event");
        }
    }

    debug!(
        nodes = graph.len(),
        edges = graph.edge_count(),
        age_max,
        target = target_events,
        "sampling run finished"
    );
    Ok(graph)
}

/// Generates `n` independent graphs from one seeded stream.
///
/// Each graph draws from the same advancing stream, so the whole batch is
/// reproducible from `seed` while individual graphs stay diverse.
///
/// # Errors
/// As [`sample_graph`].
pub fn generate_noise_graphs(
    n: usize,
    catalog: &EventCatalog,
    rules: &RuleSet,
    config: &SamplerConfig,
    seed: u64,
) -> Result<Vec<EventGraph>, GraphError> {
    let mut rng = Prng::seed_from(seed);
    (0..n)
        .map(|_| sample_graph(&mut rng, catalog, rules, config))
        .collect()
}

fn pick_age_max(rng: &mut Prng, choices: &[(u32, f32)]) -> u32 {
    if choices.is_empty() {
        return 0;
    }
    let weights: Vec<f32> = choices.iter().map(|(_, w)| *w).collect();
    choices[rng.weighted_index(&weights)].0
}

/// Synthesizes one value per attribute name the catalog entry declares,
/// drawing from `rng` in declaration order.
///
/// `age` reflects the committing age, `time` is a bounded random
/// `"YYYY-MM"`, and every other declared name draws uniformly from its
/// fixed vocabulary — or stays `Null` when no vocabulary exists for it.
fn synthesize_attributes(
    rng: &mut Prng,
    entry: &EventType,
    age: u32,
    config: &SamplerConfig,
) -> BTreeMap<String, AttrValue> {
    let mut attributes = BTreeMap::new();
    for attr in &entry.attributes {
        let value = match attr.as_str() {
            "age" => AttrValue::Int(i64::from(age)),
            "time" => {
                let (lo, hi) = config.year_range;
                let year = rng.next_int(lo.min(hi), hi.max(lo));
                let month = rng.next_int(1, 12);
                AttrValue::Str(format!("{year}-{month:02}"))
            }
            other => vocabulary(other).map_or(AttrValue::Null, |words| {
                AttrValue::Str(words[rng.next_u32(0, (words.len() - 1) as u32) as usize].to_owned())
            }),
        };
        attributes.insert(attr.clone(), value);
    }
    attributes
}

/// Fixed value vocabulary per attribute name.
fn vocabulary(attr: &str) -> Option<&'static [&'static str]> {
    match attr {
        "education_level" => Some(&["primary", "secondary", "highschool", "university"]),
        "industry" => Some(&["tech", "finance", "healthcare", "education", "construction"]),
        "position" => Some(&["junior", "mid", "senior", "lead"]),
        "company" => Some(&["Acme Corp", "Globex", "Initech", "Wayne Enterprises"]),
        "city" => Some(&["Chiang Mai", "Berlin", "Lisbon", "Austin"]),
        "country" => Some(&["Australia", "Japan", "Germany", "Canada"]),
        "hobby" => Some(&["climbing", "painting", "chess", "photography"]),
        "university" => Some(&["State University", "Polytechnic Institute", "Riverside College"]),
        _ => None,
    }
}
