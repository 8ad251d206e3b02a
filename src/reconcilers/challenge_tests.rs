// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for the challenge record reconciler
//!
//! The reconciler is driven against an in-memory record set that stores created
//! records the way Fornex lists them back.

#[cfg(test)]
mod tests {
    use crate::challenge::ChallengeRequest;
    use crate::context::CallContext;
    use crate::dns_errors::{ApiError, SolverError};
    use crate::fornex::{DnsRecord, HostFormat, RecordApi};
    use crate::reconcilers::challenge::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// In-memory stand-in for one Fornex domain.
    #[derive(Default)]
    struct FakeRecordApi {
        records: Mutex<Vec<DnsRecord>>,
        next_id: Mutex<i64>,
        creates: Mutex<usize>,
        deletes: Mutex<Vec<i64>>,
        list_failure: Option<u16>,
        create_failure: Option<u16>,
        delete_failure: Option<u16>,
        relative_hosts: bool,
    }

    impl FakeRecordApi {
        fn with_records(records: Vec<DnsRecord>) -> Self {
            Self {
                records: Mutex::new(records),
                next_id: Mutex::new(1000),
                ..Self::default()
            }
        }

        fn records(&self) -> Vec<DnsRecord> {
            self.records.lock().unwrap().clone()
        }

        fn creates(&self) -> usize {
            *self.creates.lock().unwrap()
        }

        fn deletes(&self) -> Vec<i64> {
            self.deletes.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RecordApi for FakeRecordApi {
        async fn list_records(
            &self,
            _ctx: &CallContext,
            domain: &str,
        ) -> Result<Vec<DnsRecord>, ApiError> {
            if let Some(status) = self.list_failure {
                return Err(ApiError::Retrieval {
                    domain: domain.to_string(),
                    status: Some(status),
                    reason: "HTTP error".to_string(),
                });
            }
            Ok(self.records())
        }

        async fn create_record(
            &self,
            _ctx: &CallContext,
            domain: &str,
            record: &DnsRecord,
        ) -> Result<i64, ApiError> {
            *self.creates.lock().unwrap() += 1;
            if let Some(status) = self.create_failure {
                return Err(ApiError::Create {
                    domain: domain.to_string(),
                    status: Some(status),
                    body: None,
                    reason: "HTTP error".to_string(),
                });
            }

            let id = {
                let mut next = self.next_id.lock().unwrap();
                *next += 1;
                *next
            };
            let host = if self.relative_hosts {
                record.host.clone()
            } else {
                format!("{}.{domain}", record.host)
            };
            self.records.lock().unwrap().push(DnsRecord {
                id: Some(id),
                host,
                ..record.clone()
            });
            Ok(id)
        }

        async fn delete_record(
            &self,
            _ctx: &CallContext,
            domain: &str,
            id: i64,
        ) -> Result<(), ApiError> {
            self.deletes.lock().unwrap().push(id);
            if let Some(status) = self.delete_failure {
                return Err(ApiError::Deletion {
                    domain: domain.to_string(),
                    id,
                    status: Some(status),
                    reason: "HTTP error".to_string(),
                });
            }

            let mut records = self.records.lock().unwrap();
            let before = records.len();
            records.retain(|r| r.id != Some(id));
            if records.len() == before {
                return Err(ApiError::Deletion {
                    domain: domain.to_string(),
                    id,
                    status: Some(404),
                    reason: "HTTP error".to_string(),
                });
            }
            Ok(())
        }
    }

    fn request(key: &str) -> ChallengeRequest {
        ChallengeRequest {
            uid: "uid-1".to_string(),
            action: "Present".to_string(),
            key: key.to_string(),
            resource_namespace: "cert-manager".to_string(),
            resolved_fqdn: "_acme-challenge.example.com.".to_string(),
            resolved_zone: "example.com.".to_string(),
            ..ChallengeRequest::default()
        }
    }

    fn listed(id: i64, host: &str, record_type: &str, value: &str) -> DnsRecord {
        DnsRecord {
            id: Some(id),
            host: host.to_string(),
            record_type: record_type.to_string(),
            value: value.to_string(),
            ttl: Some(120),
            prio: None,
        }
    }

    #[test]
    fn test_target_from_request() {
        let target = ChallengeTarget::from_request(&request("abc"));

        assert_eq!(target.domain, "example.com");
        assert_eq!(target.host, "_acme-challenge");
        assert_eq!(target.full_name, "_acme-challenge.example.com");
        assert_eq!(
            target.listed_host(HostFormat::FullyQualified),
            "_acme-challenge.example.com"
        );
        assert_eq!(target.listed_host(HostFormat::Relative), "_acme-challenge");
    }

    #[test]
    fn test_target_nested_label() {
        let mut req = request("abc");
        req.resolved_fqdn = "_acme-challenge.www.example.com.".to_string();

        let target = ChallengeTarget::from_request(&req);

        assert_eq!(target.host, "_acme-challenge.www");
        assert_eq!(target.full_name, "_acme-challenge.www.example.com");
    }

    #[test]
    fn test_target_fqdn_outside_zone_keeps_fqdn_as_host() {
        let mut req = request("abc");
        req.resolved_fqdn = "_acme-challenge.other.org.".to_string();

        let target = ChallengeTarget::from_request(&req);

        assert_eq!(target.domain, "example.com");
        assert_eq!(target.host, "_acme-challenge.other.org.");
        assert_eq!(target.full_name, "_acme-challenge.other.org");
    }

    #[test]
    fn test_find_challenge_record_requires_exact_match() {
        let target = ChallengeTarget::from_request(&request("abc"));
        let records = vec![
            listed(1, "_acme-challenge.example.com", "A", "abc"),
            listed(2, "_acme-challenge.example.com", "TXT", "other"),
            listed(3, "www.example.com", "TXT", "abc"),
            listed(4, "_acme-challenge.example.com", "TXT", "abc"),
        ];

        let found = find_challenge_record(&records, &target, "abc", HostFormat::FullyQualified);
        assert_eq!(found.and_then(|r| r.id), Some(4));

        let found = find_challenge_record(&records, &target, "abc", HostFormat::Relative);
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_present_creates_missing_record() {
        let api = FakeRecordApi::with_records(vec![]);

        let outcome = present(
            &api,
            &CallContext::background(),
            &request("abc"),
            HostFormat::FullyQualified,
        )
        .await
        .unwrap();

        assert_eq!(outcome, PresentOutcome::Created { id: 1001 });
        let records = api.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].host, "_acme-challenge.example.com");
        assert_eq!(records[0].record_type, "TXT");
        assert_eq!(records[0].value, "abc");
        assert_eq!(records[0].ttl, Some(120));
    }

    #[tokio::test]
    async fn test_present_is_idempotent() {
        let api = FakeRecordApi::with_records(vec![]);
        let ctx = CallContext::background();
        let req = request("abc");

        present(&api, &ctx, &req, HostFormat::FullyQualified)
            .await
            .unwrap();
        let second = present(&api, &ctx, &req, HostFormat::FullyQualified)
            .await
            .unwrap();

        assert_eq!(second, PresentOutcome::AlreadyPresent { id: Some(1001) });
        assert_eq!(api.creates(), 1);
        assert_eq!(api.records().len(), 1);
    }

    #[tokio::test]
    async fn test_present_skips_existing_record() {
        let api = FakeRecordApi::with_records(vec![listed(
            7,
            "_acme-challenge.example.com",
            "TXT",
            "abc",
        )]);

        let outcome = present(
            &api,
            &CallContext::background(),
            &request("abc"),
            HostFormat::FullyQualified,
        )
        .await
        .unwrap();

        assert_eq!(outcome, PresentOutcome::AlreadyPresent { id: Some(7) });
        assert_eq!(api.creates(), 0);
    }

    #[tokio::test]
    async fn test_present_other_value_creates_second_record() {
        // Wildcard and apex certificates share one FQDN with different keys
        let api = FakeRecordApi::with_records(vec![listed(
            7,
            "_acme-challenge.example.com",
            "TXT",
            "first",
        )]);

        let outcome = present(
            &api,
            &CallContext::background(),
            &request("second"),
            HostFormat::FullyQualified,
        )
        .await
        .unwrap();

        assert!(matches!(outcome, PresentOutcome::Created { .. }));
        assert_eq!(api.records().len(), 2);
    }

    #[tokio::test]
    async fn test_present_relative_host_format() {
        let api = FakeRecordApi {
            relative_hosts: true,
            ..FakeRecordApi::with_records(vec![])
        };
        let ctx = CallContext::background();
        let req = request("abc");

        present(&api, &ctx, &req, HostFormat::Relative).await.unwrap();
        let second = present(&api, &ctx, &req, HostFormat::Relative).await.unwrap();

        assert!(matches!(second, PresentOutcome::AlreadyPresent { .. }));
        assert_eq!(api.creates(), 1);
    }

    #[tokio::test]
    async fn test_present_list_failure_creates_nothing() {
        let api = FakeRecordApi {
            list_failure: Some(500),
            ..FakeRecordApi::with_records(vec![])
        };

        let err = present(
            &api,
            &CallContext::background(),
            &request("abc"),
            HostFormat::FullyQualified,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, SolverError::Retrieve(_)));
        assert_eq!(err.stage(), "retrieve");
        assert_eq!(api.creates(), 0);
    }

    #[tokio::test]
    async fn test_present_create_failure() {
        let api = FakeRecordApi {
            create_failure: Some(400),
            ..FakeRecordApi::with_records(vec![])
        };

        let err = present(
            &api,
            &CallContext::background(),
            &request("abc"),
            HostFormat::FullyQualified,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, SolverError::Create(_)));
        assert_eq!(err.api_error().and_then(ApiError::status), Some(400));
        assert!(err.to_string().starts_with("create record error"));
    }

    #[tokio::test]
    async fn test_cleanup_deletes_matching_record() {
        let api = FakeRecordApi::with_records(vec![
            listed(7, "_acme-challenge.example.com", "TXT", "abc"),
            listed(8, "www.example.com", "A", "192.0.2.1"),
        ]);

        let outcome = cleanup(
            &api,
            &CallContext::background(),
            &request("abc"),
            HostFormat::FullyQualified,
        )
        .await
        .unwrap();

        assert_eq!(outcome, CleanUpOutcome::Deleted { id: 7 });
        assert_eq!(api.deletes(), vec![7]);
        assert_eq!(api.records().len(), 1);
    }

    #[tokio::test]
    async fn test_cleanup_missing_record_is_success() {
        let api = FakeRecordApi::with_records(vec![listed(
            7,
            "_acme-challenge.example.com",
            "TXT",
            "other",
        )]);

        let outcome = cleanup(
            &api,
            &CallContext::background(),
            &request("abc"),
            HostFormat::FullyQualified,
        )
        .await
        .unwrap();

        assert_eq!(outcome, CleanUpOutcome::NotFound);
        assert!(api.deletes().is_empty());
    }

    #[tokio::test]
    async fn test_cleanup_ignores_other_host_with_same_value() {
        let other = listed(1, "b.example.com", "TXT", "v");
        let api = FakeRecordApi::with_records(vec![other.clone()]);
        let mut req = request("v");
        req.resolved_fqdn = "a.example.com.".to_string();

        let outcome = cleanup(
            &api,
            &CallContext::background(),
            &req,
            HostFormat::FullyQualified,
        )
        .await
        .unwrap();

        assert_eq!(outcome, CleanUpOutcome::NotFound);
        assert!(api.deletes().is_empty());
        assert_eq!(api.records(), vec![other]);
    }

    #[tokio::test]
    async fn test_present_ignores_other_host_with_same_value() {
        let api = FakeRecordApi::with_records(vec![listed(1, "b.example.com", "TXT", "v")]);
        let mut req = request("v");
        req.resolved_fqdn = "a.example.com.".to_string();

        let outcome = present(
            &api,
            &CallContext::background(),
            &req,
            HostFormat::FullyQualified,
        )
        .await
        .unwrap();

        assert!(matches!(outcome, PresentOutcome::Created { .. }));
        assert_eq!(api.creates(), 1);
        assert_eq!(api.records().len(), 2);
        assert!(api.records().iter().any(|r| r.host == "a.example.com"));
    }

    #[tokio::test]
    async fn test_present_then_cleanup_restores_record_set() {
        let existing = listed(8, "www.example.com", "A", "192.0.2.1");
        let api = FakeRecordApi::with_records(vec![existing.clone()]);
        let ctx = CallContext::background();
        let req = request("abc");

        present(&api, &ctx, &req, HostFormat::FullyQualified)
            .await
            .unwrap();
        cleanup(&api, &ctx, &req, HostFormat::FullyQualified)
            .await
            .unwrap();
        let again = cleanup(&api, &ctx, &req, HostFormat::FullyQualified)
            .await
            .unwrap();

        assert_eq!(again, CleanUpOutcome::NotFound);
        assert_eq!(api.records(), vec![existing]);
    }

    #[tokio::test]
    async fn test_cleanup_skips_match_without_id() {
        let mut record = listed(0, "_acme-challenge.example.com", "TXT", "abc");
        record.id = None;
        let api = FakeRecordApi::with_records(vec![record]);

        let outcome = cleanup(
            &api,
            &CallContext::background(),
            &request("abc"),
            HostFormat::FullyQualified,
        )
        .await
        .unwrap();

        assert_eq!(outcome, CleanUpOutcome::NotFound);
        assert!(api.deletes().is_empty());
    }

    #[tokio::test]
    async fn test_cleanup_list_failure_deletes_nothing() {
        let api = FakeRecordApi {
            list_failure: Some(401),
            ..FakeRecordApi::with_records(vec![listed(
                7,
                "_acme-challenge.example.com",
                "TXT",
                "abc",
            )])
        };

        let err = cleanup(
            &api,
            &CallContext::background(),
            &request("abc"),
            HostFormat::FullyQualified,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, SolverError::Retrieve(_)));
        assert!(api.deletes().is_empty());
    }

    #[tokio::test]
    async fn test_cleanup_delete_failure() {
        let api = FakeRecordApi {
            delete_failure: Some(404),
            ..FakeRecordApi::with_records(vec![listed(
                7,
                "_acme-challenge.example.com",
                "TXT",
                "abc",
            )])
        };

        let err = cleanup(
            &api,
            &CallContext::background(),
            &request("abc"),
            HostFormat::FullyQualified,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, SolverError::Delete(_)));
        assert_eq!(err.stage(), "delete");
        assert_eq!(api.deletes(), vec![7]);
    }
}
