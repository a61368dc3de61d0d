// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Event node records and attribute values.
use std::collections::BTreeMap;

use crate::ident::EventId;

/// Primitive attribute value carried by an event node.
///
/// Invariants
/// - Values are assigned at node construction and never mutated afterwards.
/// - `canonical` encoding is total: every variant has exactly one byte form,
///   so equal values always hash into the same feature bucket.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum AttrValue {
    /// Absent / unknown value.
    Null,
    /// Signed integer value (ages, years, counts).
    Int(i64),
    /// Free-form string value.
    Str(String),
}

impl AttrValue {
    /// Appends the canonical byte encoding of the value to `out`.
    ///
    /// Layout (little-endian): one tag byte (`0` null, `1` int, `2` str),
    /// then the payload — integers as 8-byte two's complement, strings as
    /// an 8-byte length prefix followed by the UTF-8 bytes.
    pub fn write_canonical(&self, out: &mut Vec<u8>) {
        match self {
            Self::Null => out.push(0),
            Self::Int(value) => {
                out.push(1);
                out.extend_from_slice(&value.to_le_bytes());
            }
            Self::Str(value) => {
                out.push(2);
                out.extend_from_slice(&(value.len() as u64).to_le_bytes());
                out.extend_from_slice(value.as_bytes());
            }
        }
    }
}

impl std::fmt::Display for AttrValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Str(value) => f.write_str(value),
        }
    }
}

/// A single life event.
///
/// Invariants
/// - `id` is unique within any graph that holds the node and is never
///   derived from content.
/// - `event_type` names an entry of the governing catalog.
/// - All fields are fixed at construction; there are no setters.
#[derive(Debug, Clone)]
pub struct EventNode {
    id: EventId,
    event_type: String,
    attributes: BTreeMap<String, AttrValue>,
}

impl EventNode {
    /// Creates a node of the given event type with no attributes.
    pub fn new(event_type: impl Into<String>) -> Self {
        Self::with_attributes(event_type, BTreeMap::new())
    }

    /// Creates a node of the given event type carrying `attributes`.
    pub fn with_attributes(
        event_type: impl Into<String>,
        attributes: BTreeMap<String, AttrValue>,
    ) -> Self {
        Self {
            id: EventId::fresh(),
            event_type: event_type.into(),
            attributes,
        }
    }

    /// The node's unique identifier.
    pub fn id(&self) -> EventId {
        self.id
    }

    /// The event-type name, drawn from the closed catalog.
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// Attribute name/value pairs, in name order.
    pub fn attributes(&self) -> &BTreeMap<String, AttrValue> {
        &self.attributes
    }
}
