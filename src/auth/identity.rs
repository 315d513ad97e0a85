use std::sync::Arc;

use crate::user::{User, UserStore};

use super::error::AuthError;
use super::token::Claims;

/// Maps verified token claims to a persisted user identity.
pub struct IdentityResolver {
    users: Arc<dyn UserStore>,
}

impl IdentityResolver {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// Look up the user behind the claims' subject.
    ///
    /// `Ok(None)` means the user no longer exists (deleted after issuance);
    /// callers treat that as unauthenticated. Storage failures propagate and
    /// fail the request closed.
    pub async fn resolve(&self, claims: &Claims) -> Result<Option<User>, AuthError> {
        Ok(self.users.find_by_email(&claims.sub).await?)
    }
}
