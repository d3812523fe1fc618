//! User account aggregate: credentials, lockout state and role assignments

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    entities::Role,
    value_objects::{
        EmailAddress, EmployeeId, HierarchicalRole, PasswordHash, RoleId, SecurityStamp,
        UserAccountId,
    },
};

/// Login account linked 1:1 to an employee
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    id: UserAccountId,
    employee_id: EmployeeId,
    user_name: EmailAddress,
    password_hash: PasswordHash,
    security_stamp: SecurityStamp,
    access_failed_count: u32,
    lockout_end: Option<DateTime<Utc>>,
    lockout_enabled: bool,
    is_active: bool,
    two_factor_enabled: bool,
    roles: Vec<Role>,
    last_login_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserAccount {
    /// Create an active account with no roles
    ///
    /// The user name is the employee's normalized email; the hash is computed
    /// by the caller.
    pub fn create(
        id: UserAccountId,
        employee_id: EmployeeId,
        user_name: EmailAddress,
        password_hash: PasswordHash,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            employee_id,
            user_name,
            password_hash,
            security_stamp: SecurityStamp::generate(),
            access_failed_count: 0,
            lockout_end: None,
            lockout_enabled: true,
            is_active: true,
            two_factor_enabled: false,
            roles: Vec::new(),
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub const fn id(&self) -> UserAccountId {
        self.id
    }

    pub const fn employee_id(&self) -> EmployeeId {
        self.employee_id
    }

    pub const fn user_name(&self) -> &EmailAddress {
        &self.user_name
    }

    pub const fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    pub const fn security_stamp(&self) -> SecurityStamp {
        self.security_stamp
    }

    pub const fn access_failed_count(&self) -> u32 {
        self.access_failed_count
    }

    pub const fn lockout_end(&self) -> Option<DateTime<Utc>> {
        self.lockout_end
    }

    pub const fn lockout_enabled(&self) -> bool {
        self.lockout_enabled
    }

    pub const fn is_active(&self) -> bool {
        self.is_active
    }

    pub const fn two_factor_enabled(&self) -> bool {
        self.two_factor_enabled
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub const fn last_login_at(&self) -> Option<DateTime<Utc>> {
        self.last_login_at
    }

    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Keep the user name in step with the employee's email
    pub fn change_user_name(&mut self, user_name: EmailAddress) -> bool {
        if self.user_name == user_name {
            return false;
        }
        self.user_name = user_name;
        self.touch();
        true
    }

    /// Administrative password replacement
    ///
    /// Rotates the security stamp and clears failure counters and lockout.
    pub fn set_password_hash(&mut self, password_hash: PasswordHash) {
        self.password_hash = password_hash;
        self.security_stamp = SecurityStamp::generate();
        self.access_failed_count = 0;
        self.lockout_end = None;
        self.touch();
    }

    /// Password change by the account owner; rotates the security stamp
    pub fn change_password(&mut self, password_hash: PasswordHash) {
        self.password_hash = password_hash;
        self.security_stamp = SecurityStamp::generate();
        self.touch();
    }

    /// Count a failed login and lock the account once `max_attempts` is reached
    ///
    /// Returns `true` when this attempt triggered a lockout. Inactive accounts
    /// are left untouched. The counter restarts after a lockout is applied.
    pub fn record_failed_login_attempt(&mut self, max_attempts: u32, lockout_duration: Duration) -> bool {
        if !self.is_active {
            return false;
        }

        self.access_failed_count = self.access_failed_count.saturating_add(1);
        let locked = self.lockout_enabled && self.access_failed_count >= max_attempts.max(1);
        if locked {
            self.lockout_end = Some(Utc::now() + lockout_duration);
            self.access_failed_count = 0;
        }
        self.touch();
        locked
    }

    /// Clear failure state and record the login time
    pub fn reset_failures_after_successful_login(&mut self) {
        self.access_failed_count = 0;
        self.lockout_end = None;
        self.last_login_at = Some(Utc::now());
        self.touch();
    }

    /// Lift any lockout immediately
    pub fn unlock_now(&mut self) -> bool {
        if self.lockout_end.is_none() && self.access_failed_count == 0 {
            return false;
        }
        self.lockout_end = None;
        self.access_failed_count = 0;
        self.touch();
        true
    }

    /// Whether a lockout is in force at `now`
    pub fn is_locked_out(&self, now: DateTime<Utc>) -> bool {
        self.lockout_end.is_some_and(|end| end > now)
    }

    pub fn activate(&mut self) -> bool {
        if self.is_active {
            return false;
        }
        self.is_active = true;
        self.touch();
        true
    }

    pub fn deactivate(&mut self) -> bool {
        if !self.is_active {
            return false;
        }
        self.is_active = false;
        self.touch();
        true
    }

    pub fn enable_two_factor(&mut self) -> bool {
        if self.two_factor_enabled {
            return false;
        }
        self.two_factor_enabled = true;
        self.touch();
        true
    }

    pub fn disable_two_factor(&mut self) -> bool {
        if !self.two_factor_enabled {
            return false;
        }
        self.two_factor_enabled = false;
        self.touch();
        true
    }

    /// Assign a role; adding a role already held is a no-op
    pub fn add_role(&mut self, role: Role) -> bool {
        if self.roles.iter().any(|r| r.id() == role.id()) {
            return false;
        }
        self.roles.push(role);
        self.touch();
        true
    }

    pub fn remove_role(&mut self, role_id: RoleId) -> bool {
        let before = self.roles.len();
        self.roles.retain(|r| r.id() != role_id);
        if self.roles.len() == before {
            return false;
        }
        self.touch();
        true
    }

    pub fn has_role(&self, role_id: RoleId) -> bool {
        self.roles.iter().any(|r| r.id() == role_id)
    }

    /// Whether any held role may create the target rank; false without roles
    pub fn can_create_role(&self, target: HierarchicalRole) -> bool {
        self.roles.iter().any(|r| r.can_create_role(target))
    }

    /// Whether any held role may modify `target`; false without roles
    pub fn can_modify_user(&self, target: &Self) -> bool {
        self.roles.iter().any(|r| r.can_modify_user(target))
    }

    /// Highest rank among held roles, the lowest rank when none are held
    pub fn highest_role_level(&self) -> HierarchicalRole {
        self.roles
            .iter()
            .map(Role::level)
            .max()
            .unwrap_or(HierarchicalRole::LOWEST)
    }
}
