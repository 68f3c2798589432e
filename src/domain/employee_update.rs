use crate::domain::format;
use crate::domain::models::{BankDetails, Education, EmergencyContact, Employee};
use crate::domain::salary::{parse_amount, parse_present_amount, MonthlyInputs, Salary, SalaryBreakdown};
use crate::domain::uploads::{accept_photo, SelectedFile, UploadError};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

pub const DEFAULT_PHOTO: &str =
    "https://images.unsplash.com/photo-1472099645785-5658abf4ff4e?w=40&h=40&fit=crop&crop=face";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EmployeeError {
    #[error("Please fill in all required fields")]
    MissingRequired,
    #[error("Employee {0} already exists")]
    DuplicateId(String),
    #[error("Employee {0} not found")]
    NotFound(String),
    #[error(transparent)]
    Upload(#[from] UploadError),
}

/// Add-employee form. Amount fields stay as typed so blank and garbage
/// input can default to zero.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewEmployee {
    pub employee_id: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub department: String,
    pub designation: String,
    pub join_date: Option<NaiveDate>,
    pub annual_ctc: String,
    pub monthly_ctc: String,
    #[serde(flatten)]
    pub monthly: MonthlyInputs,
    pub bank_name: String,
    pub account_number: String,
    pub ifsc_code: String,
    pub degree: String,
    pub institute: String,
    pub graduation_year: String,
    pub emergency_contact_name: String,
    pub emergency_contact_relationship: String,
    pub emergency_contact_phone: String,
    pub profile_photo: Option<SelectedFile>,
}

impl NewEmployee {
    pub fn validate(&self) -> Result<(), EmployeeError> {
        let required = [
            &self.employee_id,
            &self.password,
            &self.first_name,
            &self.last_name,
            &self.email,
        ];
        if required.iter().any(|field| field.trim().is_empty()) {
            return Err(EmployeeError::MissingRequired);
        }
        if let Some(photo) = &self.profile_photo {
            accept_photo(photo)?;
        }
        Ok(())
    }

    /// Builds the stored record. The admin-entered id is used as-is.
    pub fn into_employee(self) -> Result<Employee, EmployeeError> {
        self.validate()?;
        let photo = self
            .profile_photo
            .as_ref()
            .map(photo_reference)
            .unwrap_or_else(|| DEFAULT_PHOTO.to_string());

        Ok(Employee {
            id: self.employee_id.trim().to_string(),
            name: full_name(&self.first_name, &self.last_name),
            photo,
            email: self.email.trim().to_string(),
            phone: self.phone_number.trim().to_string(),
            department: self.department.trim().to_string(),
            designation: self.designation.trim().to_string(),
            join_date: self.join_date.unwrap_or_else(format::today),
            salary: Some(Salary {
                annual_ctc: parse_amount(&self.annual_ctc),
                monthly_ctc: parse_amount(&self.monthly_ctc),
                breakdown: SalaryBreakdown::from_monthly_inputs(&self.monthly),
            }),
            bank_details: Some(BankDetails {
                bank_name: self.bank_name,
                account_number: self.account_number,
                ifsc: self.ifsc_code,
            }),
            education: Some(Education {
                degree: self.degree,
                institute: self.institute,
                year: self.graduation_year,
            }),
            emergency_contact: Some(EmergencyContact {
                name: self.emergency_contact_name,
                relationship: self.emergency_contact_relationship,
                phone: self.emergency_contact_phone,
            }),
        })
    }
}

/// Edit-employee form. Blank text and unparsable amounts keep the stored
/// value, field by field.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EmployeeUpdate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub department: String,
    pub designation: String,
    pub annual_ctc: String,
    pub monthly_ctc: String,
    #[serde(flatten)]
    pub monthly: MonthlyInputs,
    pub profile_photo: Option<SelectedFile>,
}

impl EmployeeUpdate {
    pub fn validate(&self) -> Result<(), EmployeeError> {
        if let Some(photo) = &self.profile_photo {
            accept_photo(photo)?;
        }
        Ok(())
    }
}

pub fn apply_update(employee: &mut Employee, update: &EmployeeUpdate) -> Result<(), EmployeeError> {
    update.validate()?;

    let (stored_first, stored_last) = split_name(&employee.name);
    let first = non_blank(&update.first_name).unwrap_or(stored_first);
    let last = non_blank(&update.last_name).unwrap_or(stored_last);
    employee.name = full_name(first, last);

    merge_text(&mut employee.email, &update.email);
    merge_text(&mut employee.phone, &update.phone_number);
    merge_text(&mut employee.department, &update.department);
    merge_text(&mut employee.designation, &update.designation);

    let mut salary = employee.salary.unwrap_or_default();
    merge_amount(&mut salary.annual_ctc, &update.annual_ctc);
    merge_amount(&mut salary.monthly_ctc, &update.monthly_ctc);
    let inputs = &update.monthly;
    let breakdown = &mut salary.breakdown;
    merge_amount(&mut breakdown.basic, &inputs.basic_monthly);
    merge_amount(&mut breakdown.hra, &inputs.hra_monthly);
    merge_amount(&mut breakdown.conveyance, &inputs.conveyance_monthly);
    merge_amount(&mut breakdown.medical, &inputs.medical_monthly);
    merge_amount(&mut breakdown.pf, &inputs.pf_monthly);
    merge_amount(&mut breakdown.incentives, &inputs.incentives);
    merge_amount(&mut breakdown.other, &inputs.other_monthly);
    employee.salary = Some(salary);

    if let Some(photo) = &update.profile_photo {
        employee.photo = photo_reference(photo);
    }
    Ok(())
}

fn non_blank(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn merge_text(field: &mut String, submitted: &str) {
    if let Some(value) = non_blank(submitted) {
        *field = value.to_string();
    }
}

fn merge_amount(field: &mut Decimal, submitted: &str) {
    if let Some(value) = parse_present_amount(submitted) {
        *field = value;
    }
}

fn full_name(first: &str, last: &str) -> String {
    format!("{} {}", first.trim(), last.trim()).trim().to_string()
}

/// First word and the rest.
fn split_name(name: &str) -> (&str, &str) {
    let name = name.trim();
    name.split_once(' ')
        .map(|(first, rest)| (first, rest.trim()))
        .unwrap_or((name, ""))
}

fn photo_reference(file: &SelectedFile) -> String {
    format!("uploads/photos/{}", file.name.trim())
}
