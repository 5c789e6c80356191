use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::core::error::Result;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::dashboard::dtos::{
    DashboardSummaryDto, DocumentTypeUsageDto, QuotaUsageDto,
};
use crate::features::documents::models::{DocumentRecord, DocumentType};
use crate::modules::records::{DocumentFilter, DocumentStore};
use crate::shared::constants::MAX_DOCUMENTS_PER_USER;

/// Count and newest upload time of one document type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypeUsage {
    pub count: i64,
    pub last_used_at: Option<DateTime<Utc>>,
}

/// Group records by type. Rows whose type is not a known [`DocumentType`]
/// are skipped.
pub fn aggregate_by_type(records: &[DocumentRecord]) -> HashMap<DocumentType, TypeUsage> {
    let mut usage: HashMap<DocumentType, TypeUsage> = HashMap::new();

    for record in records {
        let Ok(document_type) = record.document_type.parse::<DocumentType>() else {
            continue;
        };
        let entry = usage.entry(document_type).or_default();
        entry.count += 1;
        entry.last_used_at = entry.last_used_at.max(Some(record.created_at));
    }

    usage
}

/// `Never used`, `Last used today` (under 24 hours ago) or `Last used on M/D/YYYY`
pub fn format_last_used(last_used_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    match last_used_at {
        None => "Never used".to_string(),
        Some(last) if now - last < Duration::hours(24) => "Last used today".to_string(),
        Some(last) => format!("Last used on {}", last.format("%-m/%-d/%Y")),
    }
}

/// Service for the per-user dashboard
pub struct DashboardService {
    store: Arc<dyn DocumentStore>,
}

impl DashboardService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn get_summary(
        &self,
        user: &AuthenticatedUser,
        now: DateTime<Utc>,
    ) -> Result<DashboardSummaryDto> {
        let records = self
            .store
            .select_all(&DocumentFilter::owned_by(&user.user_id), None)
            .await?;

        let usage = aggregate_by_type(&records);

        let types: Vec<DocumentTypeUsageDto> = DocumentType::ALL
            .iter()
            .map(|document_type| {
                let entry = usage.get(document_type).copied().unwrap_or_default();
                DocumentTypeUsageDto {
                    document_type: *document_type,
                    count: entry.count,
                    last_used_at: entry.last_used_at,
                    last_used_label: format_last_used(entry.last_used_at, now),
                }
            })
            .collect();

        let used: i64 = types.iter().map(|t| t.count).sum();

        debug!(
            "Dashboard summary for user {}: {} of {} documents used",
            user.user_id, used, MAX_DOCUMENTS_PER_USER
        );

        Ok(DashboardSummaryDto {
            types,
            quota: QuotaUsageDto {
                used,
                remaining: (MAX_DOCUMENTS_PER_USER - used).max(0),
                total: MAX_DOCUMENTS_PER_USER,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::records::InMemoryDocumentStore;
    use crate::shared::test_helpers::test_user;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_format_last_used() {
        let now = at(2024, 3, 20, 12);
        assert_eq!(format_last_used(None, now), "Never used");
        assert_eq!(
            format_last_used(Some(now - Duration::hours(23)), now),
            "Last used today"
        );
        assert_eq!(
            format_last_used(Some(now - Duration::hours(24)), now),
            "Last used on 3/19/2024"
        );
        assert_eq!(
            format_last_used(Some(at(2024, 3, 5, 9)), now),
            "Last used on 3/5/2024"
        );
    }

    #[test]
    fn test_aggregate_by_type_ignores_case_and_unknown_types() {
        let store = InMemoryDocumentStore::new();
        let old = at(2024, 1, 1, 0);
        let new = at(2024, 2, 1, 0);
        let records = vec![
            store.seed("u", "a.pdf", "resume", old),
            store.seed("u", "b.pdf", "RESUME", new),
            store.seed("u", "c.pdf", "invoice", old),
            store.seed("u", "d.pdf", "passport", new),
        ];

        let usage = aggregate_by_type(&records);

        assert_eq!(usage.len(), 2);
        assert_eq!(
            usage[&DocumentType::Resume],
            TypeUsage {
                count: 2,
                last_used_at: Some(new)
            }
        );
        assert_eq!(usage[&DocumentType::Invoice].count, 1);
        assert!(!usage.contains_key(&DocumentType::Challan));
    }

    #[tokio::test]
    async fn test_summary_reports_every_type_and_quota() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let now = at(2024, 3, 20, 12);
        store.seed("user-1", "a.pdf", "invoice", now - Duration::hours(1));
        store.seed("user-1", "b.pdf", "invoice", at(2024, 3, 1, 8));
        store.seed("user-2", "c.pdf", "resume", now);

        let service = DashboardService::new(store.clone());
        let summary = service.get_summary(&test_user("user-1"), now).await.unwrap();

        let kinds: Vec<DocumentType> = summary.types.iter().map(|t| t.document_type).collect();
        assert_eq!(kinds, DocumentType::ALL.to_vec());

        let resume = &summary.types[0];
        assert_eq!(resume.count, 0);
        assert_eq!(resume.last_used_label, "Never used");

        let invoice = &summary.types[1];
        assert_eq!(invoice.count, 2);
        assert_eq!(invoice.last_used_label, "Last used today");

        assert_eq!(summary.quota.used, 2);
        assert_eq!(summary.quota.remaining, 5);
        assert_eq!(summary.quota.total, 7);
    }

    #[tokio::test]
    async fn test_summary_surfaces_store_failure() {
        let store = Arc::new(InMemoryDocumentStore::new());
        store.fail_selects();
        let service = DashboardService::new(store);

        tokio_test::assert_err!(service.get_summary(&test_user("user-1"), Utc::now()).await);
    }
}
