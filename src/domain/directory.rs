use crate::domain::models::Employee;
use serde::Serialize;

pub const PAGE_SIZE: usize = 10;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DepartmentFilter {
    All,
    Named(String),
}

impl DepartmentFilter {
    /// Empty input and `all` (any case) both select every department.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => DepartmentFilter::All,
            Some(value) if value.eq_ignore_ascii_case("all") => DepartmentFilter::All,
            Some(value) => DepartmentFilter::Named(value.to_string()),
        }
    }

    fn matches(&self, department: &str) -> bool {
        match self {
            DepartmentFilter::All => true,
            DepartmentFilter::Named(name) => department.to_lowercase() == name.to_lowercase(),
        }
    }
}

pub fn filter_employees<'a>(
    employees: &'a [Employee],
    search: &str,
    department: &DepartmentFilter,
) -> Vec<&'a Employee> {
    let needle = search.to_lowercase();
    employees
        .iter()
        .filter(|e| {
            let matches_search = e.name.to_lowercase().contains(&needle)
                || e.id.to_lowercase().contains(&needle)
                || e.email.to_lowercase().contains(&needle);
            matches_search && department.matches(&e.department)
        })
        .collect()
}

#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub total_pages: usize,
    pub total: usize,
}

pub fn total_pages(count: usize) -> usize {
    count.div_ceil(PAGE_SIZE)
}

/// `page` is 1-based and clamped into `[1, max(total_pages, 1)]`.
pub fn paginate<T>(items: Vec<T>, page: usize) -> Page<T> {
    let total = items.len();
    let total_pages = total_pages(total);
    let page = page.clamp(1, total_pages.max(1));
    let start = (page - 1) * PAGE_SIZE;
    let items = items.into_iter().skip(start).take(PAGE_SIZE).collect();
    Page {
        items,
        page,
        total_pages,
        total,
    }
}

/// Distinct department names in first-seen order.
pub fn departments(employees: &[Employee]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for e in employees {
        if !out.iter().any(|d| d.eq_ignore_ascii_case(&e.department)) {
            out.push(e.department.clone());
        }
    }
    out
}
