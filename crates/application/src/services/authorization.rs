//! Rank checks shared by the services
//!
//! Every write follows the same shape: resolve the acting account, then compare
//! its highest role against the rank being created or the account being
//! modified. Cancellation is polled between steps with `ensure_not_cancelled`.

use domain::{HierarchicalRole, UserAccount, UserAccountId};
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::{error::ApplicationError, ports::UserAccountStore};

/// Load the acting account
///
/// # Errors
///
/// `ActorNotFound` when the id is unknown, `PermissionDenied` when the account
/// is deactivated.
pub(crate) async fn resolve_actor(
    accounts: &dyn UserAccountStore,
    actor_id: UserAccountId,
) -> Result<UserAccount, ApplicationError> {
    let actor = accounts
        .get_by_id(actor_id)
        .await?
        .ok_or_else(|| ApplicationError::ActorNotFound(actor_id.to_string()))?;

    if !actor.is_active() {
        warn!(actor = %actor_id, "Inactive account attempted a write");
        return Err(ApplicationError::PermissionDenied(
            "acting account is inactive".to_string(),
        ));
    }
    Ok(actor)
}

/// Require that `actor` may create something of rank `target`
pub(crate) fn ensure_can_create(
    actor: &UserAccount,
    target: HierarchicalRole,
) -> Result<(), ApplicationError> {
    if actor.can_create_role(target) {
        return Ok(());
    }
    warn!(
        actor = %actor.id(),
        actor_rank = %actor.highest_role_level(),
        target_rank = %target,
        "Rank too low to create target"
    );
    Err(ApplicationError::PermissionDenied(format!(
        "{} cannot assign rank {target}",
        actor.highest_role_level()
    )))
}

/// Require that `actor` may modify the account `target` as it currently stands
pub(crate) fn ensure_can_modify(
    actor: &UserAccount,
    target: &UserAccount,
) -> Result<(), ApplicationError> {
    if actor.can_modify_user(target) {
        return Ok(());
    }
    warn!(
        actor = %actor.id(),
        target = %target.id(),
        target_rank = %target.highest_role_level(),
        "Rank too low to modify target"
    );
    Err(ApplicationError::PermissionDenied(format!(
        "{} cannot modify a {} account",
        actor.highest_role_level(),
        target.highest_role_level()
    )))
}

pub(crate) fn ensure_not_cancelled(cancel: &CancellationToken) -> Result<(), ApplicationError> {
    if cancel.is_cancelled() {
        Err(ApplicationError::Cancelled)
    } else {
        Ok(())
    }
}
