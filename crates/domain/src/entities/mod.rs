//! Domain entities - Objects with identity and lifecycle

mod department;
mod employee;
mod job_title;
mod role;
mod user_account;

pub use department::Department;
pub use employee::{Employee, NewEmployee};
pub use job_title::JobTitle;
pub use role::{Permission, Role};
pub use user_account::UserAccount;
