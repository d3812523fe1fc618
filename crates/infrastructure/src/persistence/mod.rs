//! Persistence module
//!
//! In-memory stores behind the application ports. Unique indexes are
//! enforced under the table's write lock.

mod employee_store;
mod error;
mod reference_store;
mod user_account_store;

pub use employee_store::InMemoryEmployeeStore;
pub use error::StoreError;
pub use reference_store::InMemoryReferenceStore;
pub use user_account_store::InMemoryUserAccountStore;
