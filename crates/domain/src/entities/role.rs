//! Role entity: a named rank with a permission set

use std::{collections::BTreeSet, fmt};

use serde::{Deserialize, Serialize};

use crate::{
    entities::UserAccount,
    errors::DomainError,
    value_objects::{HierarchicalRole, RoleId},
};

/// Fine-grained capability carried by a role
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ViewEmployees,
    CreateEmployees,
    EditEmployees,
    DeactivateEmployees,
    ManageDepartments,
    ManageJobTitles,
    ManageRoles,
    ResetPasswords,
}

impl Permission {
    pub const ALL: [Self; 8] = [
        Self::ViewEmployees,
        Self::CreateEmployees,
        Self::EditEmployees,
        Self::DeactivateEmployees,
        Self::ManageDepartments,
        Self::ManageJobTitles,
        Self::ManageRoles,
        Self::ResetPasswords,
    ];
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ViewEmployees => "view_employees",
            Self::CreateEmployees => "create_employees",
            Self::EditEmployees => "edit_employees",
            Self::DeactivateEmployees => "deactivate_employees",
            Self::ManageDepartments => "manage_departments",
            Self::ManageJobTitles => "manage_job_titles",
            Self::ManageRoles => "manage_roles",
            Self::ResetPasswords => "reset_passwords",
        };
        f.write_str(name)
    }
}

/// A named role at a given rank
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    id: RoleId,
    name: String,
    level: HierarchicalRole,
    permissions: BTreeSet<Permission>,
}

impl Role {
    /// Create a role with an explicit permission set
    pub fn new(
        name: impl AsRef<str>,
        level: HierarchicalRole,
        permissions: impl IntoIterator<Item = Permission>,
    ) -> Result<Self, DomainError> {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return Err(DomainError::InvalidName(
                "role name must not be empty".to_string(),
            ));
        }
        Ok(Self {
            id: RoleId::new(),
            name: name.to_string(),
            level,
            permissions: permissions.into_iter().collect(),
        })
    }

    /// Restore a role from storage
    #[must_use]
    pub const fn restore(
        id: RoleId,
        name: String,
        level: HierarchicalRole,
        permissions: BTreeSet<Permission>,
    ) -> Self {
        Self {
            id,
            name,
            level,
            permissions,
        }
    }

    /// The canonical role for a rank, named after it, with its default permissions
    pub fn default_for(level: HierarchicalRole) -> Self {
        use Permission::{
            CreateEmployees, DeactivateEmployees, EditEmployees, ManageDepartments,
            ManageJobTitles, ResetPasswords, ViewEmployees,
        };

        let permissions: BTreeSet<Permission> = match level {
            HierarchicalRole::SuperUser => Permission::ALL.into_iter().collect(),
            HierarchicalRole::Director => [
                ViewEmployees,
                CreateEmployees,
                EditEmployees,
                DeactivateEmployees,
                ManageDepartments,
                ManageJobTitles,
                ResetPasswords,
            ]
            .into_iter()
            .collect(),
            HierarchicalRole::Manager => [
                ViewEmployees,
                CreateEmployees,
                EditEmployees,
                DeactivateEmployees,
                ResetPasswords,
            ]
            .into_iter()
            .collect(),
            HierarchicalRole::Senior => [ViewEmployees, CreateEmployees, EditEmployees]
                .into_iter()
                .collect(),
            HierarchicalRole::Pleno | HierarchicalRole::Junior => {
                std::iter::once(ViewEmployees).collect()
            },
        };

        Self {
            id: RoleId::new(),
            name: level.as_str().to_string(),
            level,
            permissions,
        }
    }

    pub const fn id(&self) -> RoleId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn level(&self) -> HierarchicalRole {
        self.level
    }

    pub const fn permissions(&self) -> &BTreeSet<Permission> {
        &self.permissions
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }

    /// Whether this role may create a role (or an employee) of the target rank
    pub const fn can_create_role(&self, target: HierarchicalRole) -> bool {
        self.level.can_act_on(target)
    }

    /// Whether this role may modify the given account, judged by the account's highest role
    pub fn can_modify_user(&self, target: &UserAccount) -> bool {
        self.level.can_act_on(target.highest_role_level())
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.level)
    }
}
