use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::documents::models::DocumentType;

/// Usage of one document type by the current user
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DocumentTypeUsageDto {
    pub document_type: DocumentType,
    /// Number of stored documents of this type
    pub count: i64,
    /// Upload time of the newest document of this type
    pub last_used_at: Option<DateTime<Utc>>,
    /// Human-readable form of `last_used_at`
    pub last_used_label: String,
}

/// Remaining upload allowance
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QuotaUsageDto {
    pub used: i64,
    pub remaining: i64,
    pub total: i64,
}

/// Per-type usage and quota for the dashboard cards
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardSummaryDto {
    /// One entry per document type, in a fixed order
    pub types: Vec<DocumentTypeUsageDto>,
    pub quota: QuotaUsageDto,
}
