use crate::domain::format::{format_inr, format_long_date};
use crate::domain::models::{Announcement, Employee, Priority};
use crate::domain::salary::{rollup, Salary, SalaryRollup};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct SalaryLine {
    pub component: &'static str,
    pub monthly: Decimal,
    pub annual: Decimal,
    pub monthly_display: String,
    pub annual_display: String,
}

#[derive(Debug, Serialize)]
pub struct SalaryView {
    pub rollup: SalaryRollup,
    pub lines: Vec<SalaryLine>,
    pub monthly_ctc_display: String,
    pub annual_ctc_display: String,
    pub monthly_total_display: String,
    pub annual_total_display: String,
}

impl SalaryView {
    pub fn new(salary: &Salary) -> Self {
        let rolled = rollup(salary);
        let lines = rolled
            .monthly
            .components()
            .into_iter()
            .zip(rolled.annual.components())
            .map(|((component, monthly), (_, annual))| SalaryLine {
                component,
                monthly,
                annual,
                monthly_display: format_inr(monthly),
                annual_display: format_inr(annual),
            })
            .collect();

        Self {
            lines,
            monthly_ctc_display: format_inr(rolled.monthly_ctc),
            annual_ctc_display: format_inr(rolled.annual_ctc),
            monthly_total_display: format_inr(rolled.monthly_total),
            annual_total_display: format_inr(rolled.annual_total),
            rollup: rolled,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EmployeeDetail {
    #[serde(flatten)]
    pub employee: Employee,
    pub join_date_display: String,
    pub salary_view: Option<SalaryView>,
}

impl From<Employee> for EmployeeDetail {
    fn from(employee: Employee) -> Self {
        Self {
            join_date_display: format_long_date(employee.join_date),
            salary_view: employee.salary.as_ref().map(SalaryView::new),
            employee,
        }
    }
}

/// Row in the employee table.
#[derive(Debug, Serialize)]
pub struct EmployeeSummary {
    pub id: String,
    pub name: String,
    pub photo: String,
    pub email: String,
    pub phone: String,
    pub department: String,
    pub designation: String,
    pub join_date: NaiveDate,
}

impl From<&Employee> for EmployeeSummary {
    fn from(e: &Employee) -> Self {
        Self {
            id: e.id.clone(),
            name: e.name.clone(),
            photo: e.photo.clone(),
            email: e.email.clone(),
            phone: e.phone.clone(),
            department: e.department.clone(),
            designation: e.designation.clone(),
            join_date: e.join_date,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AnnouncementView {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub date: NaiveDate,
    pub date_display: String,
    pub attachment: Option<String>,
}

impl From<Announcement> for AnnouncementView {
    fn from(a: Announcement) -> Self {
        Self {
            date_display: format_long_date(a.date),
            id: a.id,
            title: a.title,
            description: a.description,
            priority: a.priority,
            date: a.date,
            attachment: a.attachment,
        }
    }
}
