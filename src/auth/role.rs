use crate::user::{Role, User};

use super::error::AuthError;

/// Post-authentication authorization check for a route's permitted roles.
///
/// Verification is checked first: an unverified admin is still rejected, and
/// with a distinct error so clients can route the user to the verification
/// flow instead of a generic forbidden.
pub struct RoleGate {
    allowed: &'static [Role],
}

impl RoleGate {
    pub const fn new(allowed: &'static [Role]) -> Self {
        Self { allowed }
    }

    pub fn check(&self, user: &User) -> Result<(), AuthError> {
        if !user.is_verified {
            return Err(AuthError::AccountNotVerified);
        }
        match Role::parse(&user.role) {
            Some(role) if self.allowed.contains(&role) => Ok(()),
            _ => Err(AuthError::InsufficientPermission),
        }
    }
}

pub static ANY_ROLE: RoleGate = RoleGate::new(&[Role::Admin, Role::Partner, Role::User]);
pub static ADMIN_ONLY: RoleGate = RoleGate::new(&[Role::Admin]);
pub static ADMIN_OR_PARTNER: RoleGate = RoleGate::new(&[Role::Admin, Role::Partner]);
