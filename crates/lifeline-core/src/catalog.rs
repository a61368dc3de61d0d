// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Read-only catalog of event types and their declared attribute schemas.
//!
//! The catalog is an immutable lookup table loaded once per process. The
//! sampler only ever reads declared attribute *names* from it — the values
//! are synthesized elsewhere. Iteration order is catalog (numeric id)
//! order, which is also the sampler's candidate-evaluation order.
use std::collections::BTreeMap;

/// A single catalog entry.
#[derive(Debug, Clone)]
pub struct EventType {
    /// Stable numeric identifier within the catalog.
    pub id: u32,
    /// Event-type name, unique within the catalog.
    pub name: String,
    /// Declared attribute names, in declaration order.
    pub attributes: Vec<String>,
}

/// Immutable collection of [`EventType`] entries with name lookup.
#[derive(Debug, Clone, Default)]
pub struct EventCatalog {
    entries: Vec<EventType>,
    by_name: BTreeMap<String, usize>,
}

impl EventCatalog {
    /// Builds a catalog from entries; later entries shadow earlier ones with
    /// the same name.
    pub fn new(entries: impl IntoIterator<Item = EventType>) -> Self {
        let entries: Vec<EventType> = entries.into_iter().collect();
        let by_name = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| (entry.name.clone(), index))
            .collect();
        Self { entries, by_name }
    }

    /// The built-in life-event catalog.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(BUILTIN.iter().enumerate().map(|(id, (name, attrs))| EventType {
            id: id as u32,
            name: (*name).to_owned(),
            attributes: attrs.iter().map(|a| (*a).to_owned()).collect(),
        }))
    }

    /// Looks an entry up by event-type name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&EventType> {
        self.by_name.get(name).map(|index| &self.entries[*index])
    }

    /// Looks an entry up by its numeric catalog id.
    #[must_use]
    pub fn get_by_id(&self, id: u32) -> Option<&EventType> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Event-type names in catalog order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    /// All entries in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &EventType> {
        self.entries.iter()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the catalog has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Built-in event-type table: (name, declared attribute names).
const BUILTIN: &[(&str, &[&str])] = &[
    ("started_school", &["age", "time", "education_level"]),
    ("finished_school", &["age", "time", "education_level"]),
    ("started_work", &["age", "time", "industry", "position", "company"]),
    ("new_family_member", &["age", "time"]),
    ("bought_house", &["age", "time"]),
    ("got_married", &["age", "time"]),
    ("got_divorced", &["age", "time"]),
    ("had_child", &["age", "time"]),
    ("moved_city", &["age", "time", "city"]),
    ("moved_country", &["age", "time", "country"]),
    ("graduated_highschool", &["age", "time"]),
    ("graduated_university", &["age", "time"]),
    ("started_university", &["age", "time"]),
    ("started_relationship", &["age", "time"]),
    ("death_in_family", &["age", "time"]),
    ("major_illness", &["age", "time"]),
    ("started_business", &["age", "time", "industry"]),
    ("business_closed", &["age", "time", "industry"]),
    ("promoted_at_work", &["age", "time", "industry", "position", "company"]),
    ("lost_job", &["age", "time", "industry", "position", "company"]),
    ("career_change", &["age", "time", "industry", "position", "company"]),
    ("retired", &["age", "time"]),
    ("won_award", &["age", "time"]),
    ("bought_car", &["age", "time"]),
    ("sold_car", &["age", "time"]),
    ("traveled_abroad", &["age", "time", "country"]),
    ("military_service_started", &["age", "time"]),
    ("military_service_finished", &["age", "time"]),
    ("published_book", &["age", "time"]),
    ("released_music", &["age", "time"]),
    ("started_hobby", &["age", "time", "hobby"]),
    ("arrested", &["age", "time"]),
    ("released_from_prison", &["age", "time"]),
    ("got_pet", &["age", "time"]),
    ("lost_pet", &["age", "time"]),
    ("won_competition", &["age", "time"]),
    ("therapy_started", &["age", "time"]),
    ("therapy_ended", &["age", "time"]),
    ("diagnosed_condition", &["age", "time"]),
    ("surgery", &["age", "time"]),
    ("got_engaged", &["age", "time"]),
    ("graduated_phd", &["age", "time", "university"]),
    ("graduated_masters", &["age", "time", "university"]),
];
