use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{
    models::{Role, Session},
    storage::PersistedStorage,
};

use super::{AUTH_STORAGE_KEY, hydrate, persist};

const DEMO_EMAIL: &str = "demo@example.com";
const DEMO_PASSWORD: &str = "demo123";
const MIN_PASSWORD_LEN: usize = 6;

/// `user` and `is_authenticated` only change together; nothing outside this module can set one
/// without the other.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    #[serde(default)]
    user: Option<Session>,
    #[serde(default)]
    is_authenticated: bool,
}

impl AuthState {
    pub fn user(&self) -> Option<&Session> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated
    }

    fn signed_in(user: Session) -> Self {
        Self {
            user: Some(user),
            is_authenticated: true,
        }
    }

    fn normalized(self) -> Self {
        if self.is_authenticated != self.user.is_some() {
            tracing::warn!("persisted auth state was inconsistent; normalizing");
        }
        Self {
            is_authenticated: self.user.is_some(),
            user: self.user,
        }
    }
}

/// Partial session update. `None` fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPatch {
    pub email: Option<String>,
    pub name: Option<String>,
    pub role: Option<Role>,
    pub avatar: Option<String>,
}

/// Client-held session cache. It verifies nothing and must not gate access to anything.
#[derive(Debug)]
pub struct AuthStore {
    storage: PersistedStorage,
    state: AuthState,
}

impl AuthStore {
    pub fn new(storage: PersistedStorage) -> Self {
        let state = hydrate::<AuthState>(&storage, AUTH_STORAGE_KEY).normalized();
        Self { storage, state }
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn user(&self) -> Option<&Session> {
        self.state.user()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated()
    }

    pub fn is_admin(&self) -> bool {
        self.user().is_some_and(|user| user.role == Role::Admin)
    }

    pub fn login(&mut self, user: Session) {
        self.state = AuthState::signed_in(user);
        self.save();
    }

    /// Demo sign-in. Accepts the demo account, or any email with a password of six or more
    /// characters. Returns false and leaves the state alone otherwise.
    pub fn login_with_credentials(
        &mut self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> bool {
        let now = Utc::now();
        let name = name.filter(|n| !n.is_empty());

        let (id, display_name) = if email == DEMO_EMAIL && password == DEMO_PASSWORD {
            ("demo-user-1".to_string(), name.unwrap_or("Demo User").to_string())
        } else if !email.is_empty() && password.chars().count() >= MIN_PASSWORD_LEN {
            let local_part = email.split('@').next().unwrap_or(email);
            (
                format!("user-{}", now.timestamp_millis()),
                name.unwrap_or(local_part).to_string(),
            )
        } else {
            tracing::debug!("demo sign-in rejected");
            return false;
        };

        self.login(Session {
            id,
            email: email.to_string(),
            name: display_name,
            role: Role::User,
            avatar: Some(format!(
                "https://api.dicebear.com/7.x/avataaars/svg?seed={email}"
            )),
            created_at: now,
            updated_at: now,
        });
        true
    }

    pub fn logout(&mut self) {
        self.state = AuthState::default();
        self.save();
    }

    /// Shallow-merges `patch` into the current user. Does nothing when signed out.
    pub fn update_user(&mut self, patch: SessionPatch) {
        let Some(user) = self.state.user.as_mut() else {
            return;
        };
        if let Some(email) = patch.email {
            user.email = email;
        }
        if let Some(name) = patch.name {
            user.name = name;
        }
        if let Some(role) = patch.role {
            user.role = role;
        }
        if let Some(avatar) = patch.avatar {
            user.avatar = Some(avatar);
        }
        self.save();
    }

    fn save(&self) {
        persist(&self.storage, AUTH_STORAGE_KEY, &self.state);
    }
}
