pub mod directory;
pub mod employee_update;
pub mod format;
pub mod models;
pub mod password_reset;
pub mod salary;
pub mod uploads;
