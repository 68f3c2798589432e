use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const MAX_PHOTO_BYTES: u64 = 5 * 1024 * 1024;
pub const MAX_DOCUMENT_BYTES: u64 = 10 * 1024 * 1024;

const PHOTO_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png"];
const DOCUMENT_TYPES: &[&str] = &["application/pdf", "image/jpeg", "image/jpg", "image/png"];

/// A file chosen on the client. Only its metadata reaches the service.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub content_type: String,
    pub size_bytes: u64,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("Photo size should be less than 5MB")]
    PhotoTooLarge,
    #[error("Only JPG, JPEG, and PNG files are allowed")]
    PhotoType,
    #[error("Document size should be less than 10MB")]
    DocumentTooLarge,
    #[error("Only PDF, JPG, JPEG, and PNG files are allowed")]
    DocumentType,
    #[error("File name is required")]
    MissingName,
}

fn content_type_allowed(file: &SelectedFile, allowed: &[&str]) -> bool {
    let content_type = file.content_type.trim().to_ascii_lowercase();
    allowed.contains(&content_type.as_str())
}

pub fn accept_photo(file: &SelectedFile) -> Result<(), UploadError> {
    if file.name.trim().is_empty() {
        return Err(UploadError::MissingName);
    }
    if file.size_bytes > MAX_PHOTO_BYTES {
        return Err(UploadError::PhotoTooLarge);
    }
    if !content_type_allowed(file, PHOTO_TYPES) {
        return Err(UploadError::PhotoType);
    }
    Ok(())
}

pub fn accept_document(file: &SelectedFile) -> Result<(), UploadError> {
    if file.name.trim().is_empty() {
        return Err(UploadError::MissingName);
    }
    if file.size_bytes > MAX_DOCUMENT_BYTES {
        return Err(UploadError::DocumentTooLarge);
    }
    if !content_type_allowed(file, DOCUMENT_TYPES) {
        return Err(UploadError::DocumentType);
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DocumentType {
    #[serde(rename = "Offer Letter", alias = "offer-letter")]
    OfferLetter,
    #[serde(rename = "Appointment Letter", alias = "appointment-letter")]
    AppointmentLetter,
    #[serde(rename = "Promotion Letter", alias = "promotion-letter")]
    PromotionLetter,
    #[serde(rename = "Increment Letter", alias = "increment-letter")]
    IncrementLetter,
    #[serde(rename = "Payslip", alias = "payslip")]
    Payslip,
    #[serde(rename = "Aadhaar", alias = "aadhaar")]
    Aadhaar,
    #[serde(rename = "PAN", alias = "pan")]
    Pan,
    #[serde(rename = "12th Marksheet", alias = "12th-marksheet")]
    TwelfthMarksheet,
    #[serde(rename = "Bank Passbook", alias = "bank-passbook")]
    BankPassbook,
    #[serde(rename = "Certificates", alias = "certificates")]
    Certificates,
    #[serde(rename = "Cheque", alias = "cheque")]
    Cheque,
    #[serde(rename = "Photo", alias = "photo")]
    Photo,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum DocumentCategory {
    Employment,
    Payroll,
    Identity,
    Education,
    Banking,
    Personal,
}

impl DocumentType {
    pub const ALL: [DocumentType; 12] = [
        DocumentType::OfferLetter,
        DocumentType::AppointmentLetter,
        DocumentType::PromotionLetter,
        DocumentType::IncrementLetter,
        DocumentType::Payslip,
        DocumentType::Aadhaar,
        DocumentType::Pan,
        DocumentType::TwelfthMarksheet,
        DocumentType::BankPassbook,
        DocumentType::Certificates,
        DocumentType::Cheque,
        DocumentType::Photo,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DocumentType::OfferLetter => "Offer Letter",
            DocumentType::AppointmentLetter => "Appointment Letter",
            DocumentType::PromotionLetter => "Promotion Letter",
            DocumentType::IncrementLetter => "Increment Letter",
            DocumentType::Payslip => "Payslip",
            DocumentType::Aadhaar => "Aadhaar",
            DocumentType::Pan => "PAN",
            DocumentType::TwelfthMarksheet => "12th Marksheet",
            DocumentType::BankPassbook => "Bank Passbook",
            DocumentType::Certificates => "Certificates",
            DocumentType::Cheque => "Cheque",
            DocumentType::Photo => "Photo",
        }
    }

    pub fn category(&self) -> DocumentCategory {
        match self {
            DocumentType::OfferLetter
            | DocumentType::AppointmentLetter
            | DocumentType::PromotionLetter
            | DocumentType::IncrementLetter => DocumentCategory::Employment,
            DocumentType::Payslip => DocumentCategory::Payroll,
            DocumentType::Aadhaar | DocumentType::Pan => DocumentCategory::Identity,
            DocumentType::TwelfthMarksheet | DocumentType::Certificates => DocumentCategory::Education,
            DocumentType::BankPassbook | DocumentType::Cheque => DocumentCategory::Banking,
            DocumentType::Photo => DocumentCategory::Personal,
        }
    }

    /// Employment letters can be downloaded by the employee; everything else
    /// is view-only on the profile page.
    pub fn downloadable(&self) -> bool {
        matches!(self.category(), DocumentCategory::Employment | DocumentCategory::Payroll)
    }

    /// Accepts the label or a dashed lowercase slug (`offer-letter`).
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().replace('-', " ");
        Self::ALL
            .into_iter()
            .find(|t| t.label().eq_ignore_ascii_case(&normalized))
    }
}

/// Files picked in the document-upload screen, by document type. Nothing is
/// transmitted; submitting only reports what was selected.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DocumentUploadState {
    pub files: BTreeMap<DocumentType, SelectedFile>,
}

impl DocumentUploadState {
    pub fn select(&mut self, doc_type: DocumentType, file: SelectedFile) -> Result<(), UploadError> {
        accept_document(&file)?;
        self.files.insert(doc_type, file);
        Ok(())
    }

    pub fn remove(&mut self, doc_type: DocumentType) -> Option<SelectedFile> {
        self.files.remove(&doc_type)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }
}
