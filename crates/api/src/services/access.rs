//! Authorization guard for owner-scoped resources.
//!
//! Pure decisions, checked before any read, update, or delete on per-user
//! data. A denial never touches the persistence layer.

use plantsco_core::UserId;

use crate::error::AppError;
use crate::models::user::{CurrentUser, UserUpdate};

/// Outcome of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    /// Turn a denial into the API's access-denied error.
    ///
    /// # Errors
    ///
    /// Returns `AppError::AccessDenied` for `Deny`.
    pub fn require(self) -> Result<(), AppError> {
        match self {
            Self::Allow => Ok(()),
            Self::Deny => Err(AppError::AccessDenied),
        }
    }
}

/// Can `requester` act on a resource owned by `target_owner`?
///
/// Allow iff the requester is the owner or an admin.
#[must_use]
pub fn can_access(requester: &CurrentUser, target_owner: UserId) -> Decision {
    if requester.id == target_owner || requester.is_admin {
        Decision::Allow
    } else {
        Decision::Deny
    }
}

/// Can `requester` use the admin-only views?
///
/// The wildcard-owner form of [`can_access`]: there is no single owner, so
/// only the admin flag counts.
#[must_use]
pub const fn can_administer(requester: &CurrentUser) -> Decision {
    if requester.is_admin {
        Decision::Allow
    } else {
        Decision::Deny
    }
}

/// May this profile update go through, given who is asking?
///
/// A non-admin requester is denied when the requested role or admin flag
/// differs from their current values, independent of the owner-match check.
#[must_use]
pub fn permits_profile_change(requester: &CurrentUser, changes: &UserUpdate) -> Decision {
    if requester.is_admin {
        return Decision::Allow;
    }

    if let Some(role) = &changes.role
        && *role != requester.role
    {
        return Decision::Deny;
    }

    if let Some(is_admin) = changes.is_admin
        && is_admin != requester.is_admin
    {
        return Decision::Deny;
    }

    Decision::Allow
}
