use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

use crate::shared::validation::file_extension;

/// Category chosen by the user for every file in an upload batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Resume,
    Invoice,
    Challan,
}

impl DocumentType {
    pub const ALL: [DocumentType; 3] = [
        DocumentType::Resume,
        DocumentType::Invoice,
        DocumentType::Challan,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Resume => "resume",
            DocumentType::Invoice => "invoice",
            DocumentType::Challan => "challan",
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "resume" => Ok(DocumentType::Resume),
            "invoice" => Ok(DocumentType::Invoice),
            "challan" => Ok(DocumentType::Challan),
            other => Err(format!(
                "Unknown document type '{}'. Expected one of: resume, invoice, challan",
                other
            )),
        }
    }
}

/// Processing status stored on each record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Success,
    Failure,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Success => "success",
            DocumentStatus::Failure => "failure",
        }
    }
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a stored file can be shown inline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PreviewKind {
    Image,
    Pdf,
    Other,
}

impl PreviewKind {
    /// Classify by the extension of the stored path
    pub fn from_path(path: &str) -> Self {
        match file_extension(path).as_deref() {
            Some("jpg" | "jpeg" | "png" | "webp" | "gif") => PreviewKind::Image,
            Some("pdf") => PreviewKind::Pdf,
            _ => PreviewKind::Other,
        }
    }
}
