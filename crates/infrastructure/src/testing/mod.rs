//! Builders for store tests

mod fixtures;

pub use fixtures::{cpf, employee, employee_with};
