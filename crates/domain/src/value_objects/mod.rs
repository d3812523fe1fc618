//! Value Objects - Immutable, identity-less domain primitives

mod credentials;
mod date_of_birth;
mod document_number;
mod email_address;
mod hierarchical_role;
mod identifiers;
mod person_name;
mod phone_number;
mod phone_set;

pub use credentials::{PasswordHash, SecurityStamp};
pub use date_of_birth::DateOfBirth;
pub use document_number::DocumentNumber;
pub use email_address::EmailAddress;
pub use hierarchical_role::{HierarchicalRole, HierarchyLevel};
pub use identifiers::{DepartmentId, EmployeeId, JobTitleId, RoleId, UserAccountId};
pub use person_name::PersonName;
pub use phone_number::{PhoneLineType, PhoneNumber, PhoneRegion};
pub use phone_set::{PhoneSet, PhoneSetChanges};
