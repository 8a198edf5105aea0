//! Employee records (CRUD module of the dashboard).

pub mod employee;

pub use employee::{Employee, EmployeePatch, EmployeeStatus, NewEmployee};
