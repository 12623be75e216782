//! Request-scoped state.

use anyhow::{Result, anyhow};
use chrono::{DateTime, Utc};

use crate::records::{Role, User};
use crate::store::GradeStore;

/// Who is acting for the duration of one request.
///
/// Built once per request from the store and passed down explicitly.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub user: User,
    pub started_at: DateTime<Utc>,
}

impl RequestContext {
    /// Resolves `user_id` through `store`. Fails if the user does not exist.
    pub async fn resolve<S: GradeStore + ?Sized>(store: &S, user_id: &str) -> Result<Self> {
        let user = store
            .find_user(user_id)
            .await?
            .ok_or_else(|| anyhow!("unknown user '{user_id}'"))?;

        Ok(Self::for_user(user))
    }

    pub fn for_user(user: User) -> Self {
        Self {
            user,
            started_at: Utc::now(),
        }
    }

    pub fn role(&self) -> Role {
        self.user.role
    }
}
