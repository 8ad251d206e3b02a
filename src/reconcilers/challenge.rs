// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! DNS-01 challenge record reconciliation.
//!
//! Fornex offers no atomic "ensure record" call, so both operations are list-then-act:
//!
//! 1. derive the desired record from the challenge request ([`ChallengeTarget`]),
//! 2. list the actual records of the zone,
//! 3. create, delete, or do nothing depending on whether a matching record exists.
//!
//! A record matches when its type is `TXT`, its host equals the expected listed host,
//! and its value equals the challenge key. Identifiers are only used to address a
//! record that was matched in the same call.
//!
//! Two concurrent calls for the same challenge can both observe "absent" and both
//! create. cert-manager serializes retries of one challenge, so this is not guarded.

use crate::challenge::ChallengeRequest;
use crate::constants::{CHALLENGE_RECORD_TTL_SECS, RECORD_TYPE_TXT};
use crate::context::CallContext;
use crate::dns_errors::SolverError;
use crate::fornex::{DnsRecord, HostFormat, RecordApi};
use crate::metrics::record_record_operation;
use tracing::{debug, info};

/// Names derived from a challenge request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeTarget {
    /// Zone without trailing dot (e.g., `example.com`)
    pub domain: String,
    /// Label relative to the zone (e.g., `_acme-challenge`)
    pub host: String,
    /// FQDN without trailing dot (e.g., `_acme-challenge.example.com`)
    pub full_name: String,
}

impl ChallengeTarget {
    /// Derive the target names from `resolvedZone` and `resolvedFQDN`.
    ///
    /// If the FQDN does not end in the zone, `host` is the FQDN unchanged.
    #[must_use]
    pub fn from_request(request: &ChallengeRequest) -> Self {
        let zone = request.resolved_zone.as_str();
        let fqdn = request.resolved_fqdn.as_str();

        let domain = zone.strip_suffix('.').unwrap_or(zone);
        let host = fqdn.strip_suffix(&format!(".{zone}")).unwrap_or(fqdn);
        let full_name = fqdn.strip_suffix('.').unwrap_or(fqdn);

        Self {
            domain: domain.to_string(),
            host: host.to_string(),
            full_name: full_name.to_string(),
        }
    }

    /// Host value expected on a listed record, according to `format`.
    #[must_use]
    pub fn listed_host(&self, format: HostFormat) -> &str {
        match format {
            HostFormat::FullyQualified => &self.full_name,
            HostFormat::Relative => &self.host,
        }
    }
}

/// Find the challenge record for `target` with value `key` in `records`.
#[must_use]
pub fn find_challenge_record<'a>(
    records: &'a [DnsRecord],
    target: &ChallengeTarget,
    key: &str,
    format: HostFormat,
) -> Option<&'a DnsRecord> {
    let host = target.listed_host(format);
    records
        .iter()
        .find(|record| record.matches(RECORD_TYPE_TXT, host, key))
}

/// Result of a successful Present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentOutcome {
    /// A matching record already existed; nothing was created
    AlreadyPresent {
        /// Identifier of the existing record
        id: Option<i64>,
    },
    /// A new record was created
    Created {
        /// Identifier Fornex assigned to the new record
        id: i64,
    },
}

/// Result of a successful CleanUp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanUpOutcome {
    /// The matching record was deleted
    Deleted {
        /// Identifier of the deleted record
        id: i64,
    },
    /// No matching record existed
    NotFound,
}

/// Ensure the challenge TXT record exists.
///
/// Idempotent: if a matching record is listed, nothing is created.
///
/// # Errors
///
/// Returns [`SolverError::Retrieve`] if listing fails and [`SolverError::Create`] if
/// creation fails. Nothing is retried.
pub async fn present(
    api: &dyn RecordApi,
    ctx: &CallContext,
    request: &ChallengeRequest,
    format: HostFormat,
) -> Result<PresentOutcome, SolverError> {
    let target = ChallengeTarget::from_request(request);
    debug!(
        domain = %target.domain,
        host = %target.host,
        full_name = %target.full_name,
        "Derived challenge target"
    );

    let records = api
        .list_records(ctx, &target.domain)
        .await
        .map_err(SolverError::Retrieve)?;

    if let Some(existing) = find_challenge_record(&records, &target, &request.key, format) {
        info!(
            domain = %target.domain,
            id = ?existing.id,
            "Record is already present"
        );
        record_record_operation("already_present");
        return Ok(PresentOutcome::AlreadyPresent { id: existing.id });
    }

    let record = DnsRecord::txt(
        target.host.as_str(),
        request.key.as_str(),
        CHALLENGE_RECORD_TTL_SECS,
    );
    let id = api
        .create_record(ctx, &target.domain, &record)
        .await
        .map_err(SolverError::Create)?;

    info!(domain = %target.domain, host = %target.host, id = id, "Created record");
    record_record_operation("created");
    Ok(PresentOutcome::Created { id })
}

/// Remove the challenge TXT record if it exists.
///
/// Idempotent: a missing record is success. The record is only deleted after being
/// matched in a fresh listing.
///
/// # Errors
///
/// Returns [`SolverError::Retrieve`] if listing fails and [`SolverError::Delete`] if
/// deletion fails, including when the record vanished between listing and deletion.
pub async fn cleanup(
    api: &dyn RecordApi,
    ctx: &CallContext,
    request: &ChallengeRequest,
    format: HostFormat,
) -> Result<CleanUpOutcome, SolverError> {
    let target = ChallengeTarget::from_request(request);

    let records = api
        .list_records(ctx, &target.domain)
        .await
        .map_err(SolverError::Retrieve)?;

    let matched = find_challenge_record(&records, &target, &request.key, format);

    // A listed record without an identifier cannot be addressed
    let Some(id) = matched.and_then(|record| record.id) else {
        info!(
            domain = %target.domain,
            host = %target.listed_host(format),
            "No matching record to delete"
        );
        return Ok(CleanUpOutcome::NotFound);
    };

    api.delete_record(ctx, &target.domain, id)
        .await
        .map_err(SolverError::Delete)?;

    info!(domain = %target.domain, id = id, "Deleted record");
    record_record_operation("deleted");
    Ok(CleanUpOutcome::Deleted { id })
}
