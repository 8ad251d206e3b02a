// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Reconciliation of DNS-01 challenge records against the Fornex API.
//!
//! # Reconciliation Architecture
//!
//! Each challenge is reconciled with the same short, sequential workflow:
//!
//! 1. **Derive** - Compute the desired TXT record from the challenge request
//! 2. **List** - Fetch the actual record set of the zone
//! 3. **Act** - Create, delete, or leave the record set untouched
//!
//! # Available Reconcilers
//!
//! - [`present`] - Ensures the challenge record exists
//! - [`cleanup`] - Removes the challenge record

pub mod challenge;

pub use challenge::{
    cleanup, find_challenge_record, present, ChallengeTarget, CleanUpOutcome, PresentOutcome,
};

#[cfg(test)]
mod challenge_tests;
