// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Record types and wire schemas for the Fornex DNS API.
//!
//! Two incompatible JSON shapes of an `entry_set` record exist:
//!
//! | Schema | Host field | Value field |
//! |--------|------------|-------------|
//! | [`RecordSchema::V1`] | `host` | `value` |
//! | [`RecordSchema::V2`] | `name` | `content` |
//!
//! Both carry `id`, `type`, `ttl` and `prio`. The schema is selected per issuer, so the
//! rest of the crate only ever sees [`DnsRecord`].

use serde::{Deserialize, Serialize};

/// One DNS entry as seen by the solver.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DnsRecord {
    /// Provider-assigned identifier, `None` until the record is created
    pub id: Option<i64>,
    /// Host label (relative or fully qualified, see [`HostFormat`])
    pub host: String,
    /// Record type (e.g., "TXT")
    pub record_type: String,
    /// Record value / content
    pub value: String,
    /// Time-to-live in seconds
    pub ttl: Option<i64>,
    /// Priority, unused for TXT records
    pub prio: Option<i64>,
}

impl DnsRecord {
    /// Build a TXT record that has not been created yet.
    #[must_use]
    pub fn txt(host: impl Into<String>, value: impl Into<String>, ttl: i64) -> Self {
        Self {
            id: None,
            host: host.into(),
            record_type: crate::constants::RECORD_TYPE_TXT.to_string(),
            value: value.into(),
            ttl: Some(ttl),
            prio: None,
        }
    }

    /// Returns true if type, host and value all match exactly. The identifier is ignored.
    #[must_use]
    pub fn matches(&self, record_type: &str, host: &str, value: &str) -> bool {
        self.record_type == record_type && self.host == host && self.value == value
    }
}

/// JSON field naming used by the Fornex API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordSchema {
    /// `{id, host, type, value, ttl, prio}`
    #[default]
    V1,
    /// `{id, name, type, content, ttl, prio}`
    V2,
}

/// How the `host` field of listed records is represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HostFormat {
    /// Listed records carry the full name without trailing dot
    /// (e.g., `_acme-challenge.example.com`)
    #[default]
    FullyQualified,
    /// Listed records carry the label relative to the zone (e.g., `_acme-challenge`)
    Relative,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct HostValueRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    host: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    record_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ttl: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    prio: Option<i64>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct NameContentRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    record_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ttl: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    prio: Option<i64>,
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

impl From<&DnsRecord> for HostValueRecord {
    fn from(record: &DnsRecord) -> Self {
        Self {
            id: record.id,
            host: non_empty(&record.host),
            record_type: non_empty(&record.record_type),
            value: non_empty(&record.value),
            ttl: record.ttl,
            prio: record.prio,
        }
    }
}

impl From<HostValueRecord> for DnsRecord {
    fn from(wire: HostValueRecord) -> Self {
        Self {
            id: wire.id,
            host: wire.host.unwrap_or_default(),
            record_type: wire.record_type.unwrap_or_default(),
            value: wire.value.unwrap_or_default(),
            ttl: wire.ttl,
            prio: wire.prio,
        }
    }
}

impl From<&DnsRecord> for NameContentRecord {
    fn from(record: &DnsRecord) -> Self {
        Self {
            id: record.id,
            name: non_empty(&record.host),
            record_type: non_empty(&record.record_type),
            content: non_empty(&record.value),
            ttl: record.ttl,
            prio: record.prio,
        }
    }
}

impl From<NameContentRecord> for DnsRecord {
    fn from(wire: NameContentRecord) -> Self {
        Self {
            id: wire.id,
            host: wire.name.unwrap_or_default(),
            record_type: wire.record_type.unwrap_or_default(),
            value: wire.content.unwrap_or_default(),
            ttl: wire.ttl,
            prio: wire.prio,
        }
    }
}

impl RecordSchema {
    /// Serialize a record into a request body.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn encode(self, record: &DnsRecord) -> Result<Vec<u8>, serde_json::Error> {
        match self {
            Self::V1 => serde_json::to_vec(&HostValueRecord::from(record)),
            Self::V2 => serde_json::to_vec(&NameContentRecord::from(record)),
        }
    }

    /// Decode an `entry_set` listing (a JSON array).
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not a JSON array of records in this schema.
    pub fn decode_list(self, body: &[u8]) -> Result<Vec<DnsRecord>, serde_json::Error> {
        match self {
            Self::V1 => Ok(serde_json::from_slice::<Vec<HostValueRecord>>(body)?
                .into_iter()
                .map(DnsRecord::from)
                .collect()),
            Self::V2 => Ok(serde_json::from_slice::<Vec<NameContentRecord>>(body)?
                .into_iter()
                .map(DnsRecord::from)
                .collect()),
        }
    }

    /// Decode a single record, as returned by a create call.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not a JSON record in this schema.
    pub fn decode_record(self, body: &[u8]) -> Result<DnsRecord, serde_json::Error> {
        match self {
            Self::V1 => serde_json::from_slice::<HostValueRecord>(body).map(DnsRecord::from),
            Self::V2 => serde_json::from_slice::<NameContentRecord>(body).map(DnsRecord::from),
        }
    }
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;
