// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Declarative sampling constraints and the pure rule-query engine.
//!
//! Rules are loaded once and never mutated. Several rules may match the
//! same event-type name; their constraints compose:
//!
//! - ANY failing age-window, prerequisite, or cap check excludes a
//!   candidate;
//! - base rates compose by **maximum** over covering age bands;
//! - occurrence caps compose by **minimum**.
//!
//! The max-rate / min-cap asymmetry is deliberate and load-bearing —
//! changing either side changes sampling distributions.
//!
//! Every query in this module is a pure function of `(rules, name, age)`.
//! Callers typically build a name → matched-rules index once per sampling
//! run via [`RuleSet::matched`] and feed the resulting slices back in.
use std::collections::{BTreeMap, BTreeSet};

use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

/// Rule-file load failures.
///
/// All variants are malformed-rule conditions: they abort loading
/// synchronously and are never retried.
#[derive(Debug, Error)]
pub enum RuleError {
    /// The rule file is not JSON of the expected shape.
    #[error("malformed rule file: {0}")]
    Json(#[from] serde_json::Error),
    /// A `pattern` failed to compile as a regular expression.
    #[error("malformed rule pattern {pattern:?}: {source}")]
    Pattern {
        /// The offending pattern text.
        pattern: String,
        /// Underlying regex error.
        #[source]
        source: Box<regex::Error>,
    },
    /// A `base_rates` key is not of the `"A-B"` form, or has `A > B`.
    #[error("malformed age range key {key:?}")]
    Range {
        /// The offending range key.
        key: String,
    },
    /// A base rate is not a finite probability in `[0, 1]`.
    #[error("invalid base rate {rate} for range {key:?}")]
    Rate {
        /// The range key the rate was attached to.
        key: String,
        /// The offending rate.
        rate: f32,
    },
}

/// Inclusive age band `[lo, hi]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeBand {
    /// Inclusive lower bound.
    pub lo: u32,
    /// Inclusive upper bound.
    pub hi: u32,
}

impl AgeBand {
    /// True when `age` falls inside the band (both ends inclusive).
    #[must_use]
    pub fn contains(self, age: u32) -> bool {
        self.lo <= age && age <= self.hi
    }
}

/// Raw rule entry as it appears in a rule file.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleSpec {
    /// Regular expression matched (unanchored) against event-type names.
    pub pattern: String,
    /// Exact event-type names that must all have occurred at least once.
    #[serde(default)]
    pub prereqs: Vec<String>,
    /// Inclusive lower age bound; unbounded when absent.
    #[serde(default)]
    pub age_min: Option<u32>,
    /// Inclusive upper age bound; unbounded when absent.
    #[serde(default)]
    pub age_max: Option<u32>,
    /// Maximum occurrence count; unbounded when absent.
    #[serde(default)]
    pub max_count: Option<u32>,
    /// Base firing rates keyed by `"A-B"` inclusive age ranges.
    #[serde(default)]
    pub base_rates: BTreeMap<String, f32>,
}

#[derive(Debug, Clone, Deserialize)]
struct RuleFile {
    #[serde(default)]
    rules: Vec<RuleSpec>,
}

/// A compiled constraint over event-type names.
#[derive(Debug, Clone)]
pub struct Rule {
    pattern: Regex,
    prereqs: Vec<String>,
    age_min: Option<u32>,
    age_max: Option<u32>,
    max_count: Option<u32>,
    base_rates: Vec<(AgeBand, f32)>,
}

impl Rule {
    /// Compiles a raw spec, validating the pattern and every rate band.
    ///
    /// # Errors
    /// Any [`RuleError`] variant other than `Json`.
    pub fn compile(spec: &RuleSpec) -> Result<Self, RuleError> {
        let pattern = Regex::new(&spec.pattern).map_err(|source| RuleError::Pattern {
            pattern: spec.pattern.clone(),
            source: Box::new(source),
        })?;
        let mut base_rates = Vec::with_capacity(spec.base_rates.len());
        for (key, rate) in &spec.base_rates {
            let band = parse_band(key)?;
            if !rate.is_finite() || *rate < 0.0 || *rate > 1.0 {
                return Err(RuleError::Rate {
                    key: key.clone(),
                    rate: *rate,
                });
            }
            base_rates.push((band, *rate));
        }
        Ok(Self {
            pattern,
            prereqs: spec.prereqs.clone(),
            age_min: spec.age_min,
            age_max: spec.age_max,
            max_count: spec.max_count,
            base_rates,
        })
    }

    /// True when the rule's pattern matches anywhere in `name`.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.pattern.is_match(name)
    }
}

fn parse_band(key: &str) -> Result<AgeBand, RuleError> {
    let malformed = || RuleError::Range { key: key.to_owned() };
    let (lo, hi) = key.split_once('-').ok_or_else(malformed)?;
    let lo: u32 = lo.trim().parse().map_err(|_| malformed())?;
    let hi: u32 = hi.trim().parse().map_err(|_| malformed())?;
    if lo > hi {
        return Err(malformed());
    }
    Ok(AgeBand { lo, hi })
}

/// Immutable, compiled rule collection.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// A rule set with no rules — every candidate falls back to defaults.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Compiles a rule set from raw specs.
    ///
    /// # Errors
    /// The first [`RuleError`] encountered; nothing is partially loaded.
    pub fn from_specs(specs: impl IntoIterator<Item = RuleSpec>) -> Result<Self, RuleError> {
        let rules = specs
            .into_iter()
            .map(|spec| Rule::compile(&spec))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    /// Parses and compiles a JSON rule file (`{"rules": [...]}`).
    ///
    /// # Errors
    /// [`RuleError::Json`] on shape mismatch, otherwise as
    /// [`RuleSet::from_specs`].
    pub fn from_json_str(text: &str) -> Result<Self, RuleError> {
        let file: RuleFile = serde_json::from_str(text)?;
        Self::from_specs(file.rules)
    }

    /// Compiles a rule set from an already-parsed JSON value.
    ///
    /// # Errors
    /// As [`RuleSet::from_json_str`].
    pub fn from_value(value: serde_json::Value) -> Result<Self, RuleError> {
        let file: RuleFile = serde_json::from_value(value)?;
        Self::from_specs(file.rules)
    }

    /// The subset of rules whose pattern matches `name`.
    #[must_use]
    pub fn matched(&self, name: &str) -> Vec<&Rule> {
        self.rules.iter().filter(|rule| rule.matches(name)).collect()
    }

    /// Number of compiled rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True when no rules are loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// False iff any matched rule's age window excludes `age`.
#[must_use]
pub fn allowed_by_age(rules: &[&Rule], age: u32) -> bool {
    rules.iter().all(|rule| {
        rule.age_min.is_none_or(|min| age >= min) && rule.age_max.is_none_or(|max| age <= max)
    })
}

/// Union of prerequisite names across matched rules.
#[must_use]
pub fn prereqs_for<'a>(rules: &[&'a Rule]) -> BTreeSet<&'a str> {
    rules
        .iter()
        .flat_map(|rule| rule.prereqs.iter().map(String::as_str))
        .collect()
}

/// Tightest (minimum) occurrence cap across matched rules, or `None` when
/// no matched rule specifies one.
#[must_use]
pub fn cap_for(rules: &[&Rule]) -> Option<u32> {
    rules.iter().filter_map(|rule| rule.max_count).min()
}

/// Maximum base rate among matched rules whose age band contains `age`;
/// `default` when no band covers it.
#[must_use]
pub fn base_rate_for(rules: &[&Rule], age: u32, default: f32) -> f32 {
    rules
        .iter()
        .flat_map(|rule| rule.base_rates.iter())
        .filter(|(band, _)| band.contains(age))
        .map(|(_, rate)| *rate)
        .fold(None, |best: Option<f32>, rate| {
            Some(best.map_or(rate, |b| b.max(rate)))
        })
        .unwrap_or(default)
}
