use storefront_auth::Role;
use storefront_core::UserId;

/// Authenticated identity for a request.
///
/// Inserted by the auth middleware and threaded explicitly into every
/// handler; no domain route runs without one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    user_id: UserId,
    roles: Vec<Role>,
}

impl AuthContext {
    pub fn new(user_id: UserId, roles: Vec<Role>) -> Self {
        Self { user_id, roles }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(Role::is_admin)
    }
}
