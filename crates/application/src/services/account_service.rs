//! Account Service - credentials, lockout and role administration

use std::fmt;

use chrono::Utc;
use domain::{EmailAddress, HierarchicalRole, Role, RoleId, UserAccount, UserAccountId};
use secrecy::{ExposeSecret, SecretString};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use super::{
    ServicePorts,
    authorization::{ensure_can_create, ensure_can_modify, ensure_not_cancelled, resolve_actor},
};
use crate::{
    error::{ApplicationError, ValidationErrors},
    policy::{LockoutPolicy, RequestPolicy},
    request_context::RequestContext,
    requests::{ChangePasswordRequest, check_password},
};

/// Service for user account operations
#[derive(Clone)]
pub struct AccountService {
    ports: ServicePorts,
    request_policy: RequestPolicy,
    lockout: LockoutPolicy,
}

impl fmt::Debug for AccountService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountService")
            .field("lockout", &self.lockout)
            .finish_non_exhaustive()
    }
}

impl AccountService {
    /// Create a new account service
    pub const fn new(
        ports: ServicePorts,
        request_policy: RequestPolicy,
        lockout: LockoutPolicy,
    ) -> Self {
        Self {
            ports,
            request_policy,
            lockout,
        }
    }

    async fn load_account(&self, id: UserAccountId) -> Result<UserAccount, ApplicationError> {
        self.ports
            .accounts
            .get_by_id(id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("User account", id))
    }

    /// Resolve the actor and the target, requiring the actor to outrank the target
    ///
    /// An actor always reaches its own account.
    async fn load_modifiable(
        &self,
        ctx: &RequestContext,
        target_id: UserAccountId,
    ) -> Result<(UserAccount, UserAccount), ApplicationError> {
        let actor = resolve_actor(self.ports.accounts.as_ref(), ctx.actor_id()).await?;
        if target_id == actor.id() {
            let target = actor.clone();
            return Ok((actor, target));
        }
        let target = self.load_account(target_id).await?;
        ensure_can_modify(&actor, &target)?;
        Ok((actor, target))
    }

    async fn save(
        &self,
        account: &UserAccount,
        cancel: &CancellationToken,
    ) -> Result<(), ApplicationError> {
        ensure_not_cancelled(cancel)?;
        self.ports.accounts.update(account).await
    }

    /// Change the password of the actor's own account or, rank permitting, another one
    ///
    /// Own account: `current_password` must verify and the stamp rotates.
    /// Other account: the actor must outrank the target's current role; the
    /// stamp rotates and any lockout is cleared.
    #[instrument(
        skip(self, ctx, request, cancel),
        fields(actor = %ctx.actor_id(), target = %target_id)
    )]
    pub async fn change_password(
        &self,
        ctx: &RequestContext,
        target_id: UserAccountId,
        request: &ChangePasswordRequest,
        cancel: &CancellationToken,
    ) -> Result<(), ApplicationError> {
        let own = target_id == ctx.actor_id();
        let mut errors = ValidationErrors::new();
        check_password(
            &mut errors,
            "new_password",
            &request.new_password,
            self.request_policy.min_password_length,
        );
        if own && request.current_password.is_none() {
            errors.push("current_password", "is required to change your own password");
        }
        errors.into_result()?;

        let (_, mut target) = self.load_modifiable(ctx, target_id).await?;

        if own {
            let current = request
                .current_password
                .as_ref()
                .map(ExposeSecret::expose_secret)
                .unwrap_or_default();
            if !self.ports.hasher.verify(current, target.password_hash())? {
                warn!("Current password did not verify");
                return Err(ApplicationError::InvalidCredentials);
            }
        }

        let hash = self.ports.hasher.hash(request.new_password.expose_secret())?;
        if own {
            target.change_password(hash);
        } else {
            target.set_password_hash(hash);
        }

        self.save(&target, cancel).await?;
        info!(own, "Password changed");
        Ok(())
    }

    /// Authenticate with user name and password, applying the lockout policy
    ///
    /// # Errors
    ///
    /// `InvalidCredentials` for an unknown user or wrong password,
    /// `AccountInactive`, or `AccountLocked` while a lockout is in force.
    #[instrument(skip(self, password, cancel), fields(user_name = %user_name))]
    pub async fn sign_in(
        &self,
        user_name: &str,
        password: &SecretString,
        cancel: &CancellationToken,
    ) -> Result<UserAccount, ApplicationError> {
        let email =
            EmailAddress::new(user_name).map_err(|_| ApplicationError::InvalidCredentials)?;
        let mut account = self
            .ports
            .accounts
            .get_by_email(&email)
            .await?
            .ok_or(ApplicationError::InvalidCredentials)?;

        if !account.is_active() {
            return Err(ApplicationError::AccountInactive);
        }
        if let Some(until) = account
            .lockout_end()
            .filter(|_| account.is_locked_out(Utc::now()))
        {
            debug!(account_id = %account.id(), %until, "Sign-in attempted while locked out");
            return Err(ApplicationError::AccountLocked { until });
        }

        if self
            .ports
            .hasher
            .verify(password.expose_secret(), account.password_hash())?
        {
            account.reset_failures_after_successful_login();
            self.save(&account, cancel).await?;
            info!(account_id = %account.id(), "Signed in");
            return Ok(account);
        }

        let locked = account.record_failed_login_attempt(
            self.lockout.max_failed_attempts,
            self.lockout.lockout_duration,
        );
        self.save(&account, cancel).await?;
        if locked {
            warn!(account_id = %account.id(), "Account locked after repeated failures");
        }
        Err(ApplicationError::InvalidCredentials)
    }

    /// Lift a lockout; returns whether one was in place
    #[instrument(skip(self, ctx, cancel), fields(actor = %ctx.actor_id(), target = %target_id))]
    pub async fn unlock_account(
        &self,
        ctx: &RequestContext,
        target_id: UserAccountId,
        cancel: &CancellationToken,
    ) -> Result<bool, ApplicationError> {
        let (_, mut target) = self.load_modifiable(ctx, target_id).await?;
        if !target.unlock_now() {
            return Ok(false);
        }
        self.save(&target, cancel).await?;
        info!("Account unlocked");
        Ok(true)
    }

    /// Activate or deactivate an account; returns whether it changed
    #[instrument(skip(self, ctx, cancel), fields(actor = %ctx.actor_id(), target = %target_id))]
    pub async fn set_account_active(
        &self,
        ctx: &RequestContext,
        target_id: UserAccountId,
        active: bool,
        cancel: &CancellationToken,
    ) -> Result<bool, ApplicationError> {
        let (_, mut target) = self.load_modifiable(ctx, target_id).await?;
        let changed = if active {
            target.activate()
        } else {
            target.deactivate()
        };
        if changed {
            self.save(&target, cancel).await?;
            info!(active, "Account activation changed");
        }
        Ok(changed)
    }

    /// Grant the stored role of rank `level`
    #[instrument(skip(self, ctx, cancel), fields(actor = %ctx.actor_id(), target = %target_id))]
    pub async fn assign_role(
        &self,
        ctx: &RequestContext,
        target_id: UserAccountId,
        level: HierarchicalRole,
        cancel: &CancellationToken,
    ) -> Result<bool, ApplicationError> {
        let (actor, mut target) = self.load_modifiable(ctx, target_id).await?;
        ensure_can_create(&actor, level)?;
        let role = self
            .ports
            .roles
            .get_by_level(level)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Role", level))?;

        if !target.add_role(role) {
            return Ok(false);
        }
        self.save(&target, cancel).await?;
        info!(rank = %level, "Role assigned");
        Ok(true)
    }

    /// Revoke a held role; the actor must be able to grant that role's rank
    #[instrument(skip(self, ctx, cancel), fields(actor = %ctx.actor_id(), target = %target_id))]
    pub async fn remove_role(
        &self,
        ctx: &RequestContext,
        target_id: UserAccountId,
        role_id: RoleId,
        cancel: &CancellationToken,
    ) -> Result<bool, ApplicationError> {
        let (actor, mut target) = self.load_modifiable(ctx, target_id).await?;
        let Some(level) = target
            .roles()
            .iter()
            .find(|r| r.id() == role_id)
            .map(Role::level)
        else {
            return Ok(false);
        };
        ensure_can_create(&actor, level)?;

        target.remove_role(role_id);
        self.save(&target, cancel).await?;
        info!(rank = %level, "Role removed");
        Ok(true)
    }

    /// Toggle two-factor authentication on the actor's own account
    #[instrument(skip(self, ctx, cancel), fields(actor = %ctx.actor_id()))]
    pub async fn set_two_factor(
        &self,
        ctx: &RequestContext,
        enabled: bool,
        cancel: &CancellationToken,
    ) -> Result<bool, ApplicationError> {
        let mut account = resolve_actor(self.ports.accounts.as_ref(), ctx.actor_id()).await?;
        let changed = if enabled {
            account.enable_two_factor()
        } else {
            account.disable_two_factor()
        };
        if changed {
            self.save(&account, cancel).await?;
            info!(enabled, "Two-factor setting changed");
        }
        Ok(changed)
    }
}
