//! Authentication collaborator
//!
//! Sign-in itself happens outside the engine; the engine only asks who the
//! current user is.

/// Source of the signed-in user's id
pub trait AuthProvider: Send + Sync {
    /// Current user id, `None` when nobody is signed in
    fn current_user_id(&self) -> Option<String>;
}

/// Fixed identity, e.g. from configuration or a command-line flag
#[derive(Debug, Clone, Default)]
pub struct StaticAuth {
    user_id: Option<String>,
}

impl StaticAuth {
    pub fn signed_in(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
        }
    }

    pub fn signed_out() -> Self {
        Self { user_id: None }
    }
}

impl AuthProvider for StaticAuth {
    fn current_user_id(&self) -> Option<String> {
        self.user_id.clone().filter(|id| !id.trim().is_empty())
    }
}
