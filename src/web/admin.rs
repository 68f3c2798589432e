use crate::domain::directory::{departments, filter_employees, paginate, DepartmentFilter, Page};
use crate::domain::employee_update::{EmployeeUpdate, NewEmployee};
use crate::domain::format::format_inr;
use crate::domain::models::UserRole;
use crate::domain::salary::{MonthlyInputs, Salary, SalaryBreakdown, parse_amount};
use crate::identity::{IdentityError, Principal, ProfileUpdate};
use crate::state::SharedState;
use crate::web::error::ApiError;
use crate::web::session::AdminUser;
use crate::web::views::{AnnouncementView, EmployeeDetail, EmployeeSummary, SalaryView};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

const RECENT_LIMIT: usize = 3;

#[derive(Debug, Deserialize)]
pub struct EmployeeQuery {
    #[serde(default)]
    pub search: String,
    pub department: Option<String>,
    pub page: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RollupPreviewPayload {
    pub annual_ctc: String,
    pub monthly_ctc: String,
    #[serde(flatten)]
    pub monthly: MonthlyInputs,
}

#[derive(Debug, Serialize)]
pub struct DashboardMetrics {
    pub total_employees: usize,
    pub average_annual_ctc: Decimal,
    pub average_annual_ctc_display: String,
    pub total_announcements: usize,
    pub recent_employees: Vec<EmployeeSummary>,
    pub recent_announcements: Vec<AnnouncementView>,
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/employees", get(list_employees).post(create_employee))
        .route("/employees/departments", get(list_departments))
        .route(
            "/employees/:id",
            get(get_employee).put(update_employee).delete(delete_employee),
        )
        .route("/salary/rollup", post(preview_rollup))
        .with_state(state)
}

async fn dashboard(
    AdminUser(_admin): AdminUser,
    State(state): State<SharedState>,
) -> Json<DashboardMetrics> {
    let employees = state.employees.list().await;
    let announcements = state.announcements.list().await;

    let salaries: Vec<Decimal> = employees
        .iter()
        .filter_map(|e| e.salary.map(|s| s.annual_ctc))
        .collect();
    let average_annual_ctc = if salaries.is_empty() {
        Decimal::ZERO
    } else {
        let total = salaries.iter().fold(Decimal::ZERO, |acc, s| acc.saturating_add(*s));
        (total / Decimal::from(salaries.len())).round_dp(2)
    };

    let mut recent: Vec<_> = employees.iter().collect();
    recent.sort_by(|a, b| b.join_date.cmp(&a.join_date));

    Json(DashboardMetrics {
        total_employees: employees.len(),
        average_annual_ctc,
        average_annual_ctc_display: format_inr(average_annual_ctc),
        total_announcements: announcements.len(),
        recent_employees: recent.into_iter().take(RECENT_LIMIT).map(EmployeeSummary::from).collect(),
        recent_announcements: announcements
            .into_iter()
            .take(RECENT_LIMIT)
            .map(AnnouncementView::from)
            .collect(),
    })
}

async fn list_employees(
    AdminUser(_admin): AdminUser,
    State(state): State<SharedState>,
    Query(query): Query<EmployeeQuery>,
) -> Json<Page<EmployeeSummary>> {
    let employees = state.employees.list().await;
    let filter = DepartmentFilter::parse(query.department.as_deref());
    let matches: Vec<EmployeeSummary> = filter_employees(&employees, query.search.trim(), &filter)
        .into_iter()
        .map(EmployeeSummary::from)
        .collect();
    Json(paginate(matches, query.page.unwrap_or(1)))
}

async fn list_departments(
    AdminUser(_admin): AdminUser,
    State(state): State<SharedState>,
) -> Json<Vec<String>> {
    Json(departments(&state.employees.list().await))
}

async fn get_employee(
    AdminUser(_admin): AdminUser,
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<EmployeeDetail>, ApiError> {
    let employee = state
        .employees
        .get(&id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Employee {id} not found")))?;
    Ok(Json(employee.into()))
}

async fn create_employee(
    AdminUser(admin): AdminUser,
    State(state): State<SharedState>,
    Json(payload): Json<NewEmployee>,
) -> Result<(StatusCode, Json<EmployeeDetail>), ApiError> {
    let password = payload.password.clone();
    let employee = payload.into_employee().map_err(|e| {
        tracing::warn!("Rejected new employee: {}", e);
        e
    })?;
    let employee = state.employees.insert(employee).await?;

    let principal = Principal {
        user_id: employee.id.clone(),
        name: employee.name.clone(),
        email: employee.email.clone(),
        role: UserRole::Employee,
        photo: Some(employee.photo.clone()),
    };
    if let Err(e) = state.directory.register(principal, &password).await {
        // Keep the store and the directory in step
        if let Err(rollback) = state.employees.remove(&employee.id).await {
            tracing::warn!("Rollback of employee {} failed: {}", employee.id, rollback);
        }
        return Err(match e {
            IdentityError::Exists(id) => ApiError::Conflict(format!("Login {id} already exists")),
            IdentityError::Hash => ApiError::Internal(anyhow::anyhow!("password hashing failed")),
        });
    }

    tracing::info!("Employee {} created by {}", employee.id, admin.user_id);
    Ok((StatusCode::CREATED, Json(employee.into())))
}

async fn update_employee(
    AdminUser(admin): AdminUser,
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(payload): Json<EmployeeUpdate>,
) -> Result<Json<EmployeeDetail>, ApiError> {
    let updated = state.employees.update(&id, &payload).await?;
    let profile = ProfileUpdate {
        name: updated.name.clone(),
        email: updated.email.clone(),
        photo: Some(updated.photo.clone()),
    };
    let had_login = state.directory.update_profile(&updated.id, &profile).await;
    let refreshed = state.sessions.refresh_user(&updated.id, &profile).await;
    tracing::info!(
        "Employee {} updated by {} (login updated: {}, sessions refreshed: {})",
        id,
        admin.user_id,
        had_login,
        refreshed
    );
    Ok(Json(updated.into()))
}

async fn delete_employee(
    AdminUser(admin): AdminUser,
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let removed = state.employees.remove(&id).await?;
    let had_login = state.directory.remove(&removed.id).await;
    let closed = state.sessions.close_user(&removed.id).await;
    tracing::info!(
        "Employee {} deleted by {} (login removed: {}, sessions closed: {})",
        removed.id,
        admin.user_id,
        had_login,
        closed
    );
    Ok(StatusCode::NO_CONTENT)
}

/// Live rollup for the salary section of the add/edit forms.
async fn preview_rollup(
    AdminUser(_admin): AdminUser,
    Json(payload): Json<RollupPreviewPayload>,
) -> Json<SalaryView> {
    let salary = Salary {
        annual_ctc: parse_amount(&payload.annual_ctc),
        monthly_ctc: parse_amount(&payload.monthly_ctc),
        breakdown: SalaryBreakdown::from_monthly_inputs(&payload.monthly),
    };
    Json(SalaryView::new(&salary))
}
