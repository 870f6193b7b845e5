use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::storage::{KeyValueStore, KeyValueStoreExt};
use crate::util::{generate_id, is_valid_email};

pub const CURRENT_USER_KEY: &str = "currentUser";
const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub avatar: String,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

impl AuthMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Login => Self::Register,
            Self::Register => Self::Login,
        }
    }
}

/// Raw form values as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuthSubmission {
    pub mode: AuthMode,
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl AuthSubmission {
    pub fn login(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            mode: AuthMode::Login,
            email: email.into(),
            password: password.into(),
            ..Self::default()
        }
    }

    pub fn register(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        confirm_password: impl Into<String>,
    ) -> Self {
        Self {
            mode: AuthMode::Register,
            name: name.into(),
            email: email.into(),
            password: password.into(),
            confirm_password: confirm_password.into(),
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        if !is_valid_email(self.email.trim()) {
            return Err(AppError::validation("Please enter a valid email address"));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::validation(
                "Password must be at least 6 characters",
            ));
        }
        if self.mode == AuthMode::Register {
            if self.name.trim().is_empty() {
                return Err(AppError::validation("Please enter your full name"));
            }
            if self.password != self.confirm_password {
                return Err(AppError::validation("Passwords do not match"));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
struct PendingAuth {
    ticket: u64,
    mode: AuthMode,
    email: String,
    name: String,
}

#[derive(Debug, Default)]
pub struct AuthManager {
    current_user: Option<User>,
    prompt_visible: bool,
    pending: Option<PendingAuth>,
    next_ticket: u64,
}

impl AuthManager {
    pub fn restore(store: &dyn KeyValueStore) -> Self {
        let current_user = store.load::<Option<User>>(CURRENT_USER_KEY, None);
        if let Some(user) = &current_user {
            info!(email = %user.email, "session restored");
        }
        Self {
            current_user,
            ..Self::default()
        }
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user.is_some()
    }

    pub fn prompt_visible(&self) -> bool {
        self.prompt_visible
    }

    pub fn show_prompt(&mut self) {
        self.prompt_visible = true;
    }

    pub fn dismiss_prompt(&mut self) -> bool {
        std::mem::replace(&mut self.prompt_visible, false)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Validates the submission and records it as in flight. The returned
    /// ticket identifies the completion event.
    pub fn begin(&mut self, submission: &AuthSubmission) -> AppResult<u64> {
        if self.pending.is_some() {
            return Err(AppError::validation("Authentication already in progress"));
        }
        submission.validate()?;

        self.next_ticket = self.next_ticket.wrapping_add(1);
        let ticket = self.next_ticket;
        self.pending = Some(PendingAuth {
            ticket,
            mode: submission.mode,
            email: submission.email.trim().to_string(),
            name: submission.name.trim().to_string(),
        });
        Ok(ticket)
    }

    /// Finishes the in-flight request. Stale tickets are ignored.
    pub fn complete(
        &mut self,
        ticket: u64,
        store: &mut dyn KeyValueStore,
        now: DateTime<Utc>,
    ) -> AppResult<Option<(User, AuthMode)>> {
        match &self.pending {
            Some(pending) if pending.ticket == ticket => {}
            _ => return Ok(None),
        }
        let Some(pending) = self.pending.take() else {
            return Ok(None);
        };

        let user = build_user(&pending, now);
        store.save(CURRENT_USER_KEY, &Some(&user))?;
        info!(email = %user.email, role = ?user.role, "signed in");

        self.current_user = Some(user.clone());
        self.prompt_visible = false;
        Ok(Some((user, pending.mode)))
    }

    pub fn logout(&mut self, store: &mut dyn KeyValueStore) -> AppResult<bool> {
        let Some(user) = self.current_user.take() else {
            return Ok(false);
        };
        store.remove(CURRENT_USER_KEY)?;
        info!(email = %user.email, "signed out");
        Ok(true)
    }
}

fn build_user(pending: &PendingAuth, now: DateTime<Utc>) -> User {
    let (name, role) = match pending.mode {
        AuthMode::Login => {
            let local = pending
                .email
                .split('@')
                .next()
                .unwrap_or(pending.email.as_str());
            let role = if pending.email.contains("admin") {
                Role::Admin
            } else {
                Role::Student
            };
            (local.to_string(), role)
        }
        AuthMode::Register => (pending.name.clone(), Role::Student),
    };

    User {
        id: generate_id(),
        email: pending.email.clone(),
        name,
        role,
        avatar: format!(
            "https://api.dicebear.com/7.x/avataaars/svg?seed={}",
            pending.email
        ),
        joined_at: now,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::{AuthManager, AuthMode, AuthSubmission, CURRENT_USER_KEY, Role};
    use crate::storage::{KeyValueStore, MemoryStore};

    #[test]
    fn login_validation_messages() {
        let bad_email = AuthSubmission::login("nope", "secret1");
        assert_eq!(
            bad_email.validate().map_err(|err| err.to_string()),
            Err("Please enter a valid email address".to_string())
        );

        let short = AuthSubmission::login("a@b.co", "12345");
        assert_eq!(
            short.validate().map_err(|err| err.to_string()),
            Err("Password must be at least 6 characters".to_string())
        );
    }

    #[test]
    fn register_requires_name_and_matching_confirmation() {
        let nameless = AuthSubmission::register(" ", "a@b.co", "secret1", "secret1");
        assert_eq!(
            nameless.validate().map_err(|err| err.to_string()),
            Err("Please enter your full name".to_string())
        );

        let mismatch = AuthSubmission::register("Ana", "a@b.co", "secret1", "secret2");
        assert_eq!(
            mismatch.validate().map_err(|err| err.to_string()),
            Err("Passwords do not match".to_string())
        );
    }

    #[test]
    fn completed_login_persists_user_and_derives_role() {
        let mut store = MemoryStore::default();
        let mut auth = AuthManager::restore(&store);
        auth.show_prompt();

        let ticket = auth
            .begin(&AuthSubmission::login("lab-admin@bits.edu", "secret1"))
            .expect("valid submission");
        assert!(auth.is_pending());
        assert!(!auth.is_authenticated());

        let (user, mode) = auth
            .complete(ticket, &mut store, Utc::now())
            .expect("completion should persist")
            .expect("ticket matches");
        assert_eq!(mode, AuthMode::Login);
        assert_eq!(user.name, "lab-admin");
        assert_eq!(user.role, Role::Admin);
        assert!(!auth.prompt_visible());
        assert!(store.get_raw(CURRENT_USER_KEY).is_some());

        let restored = AuthManager::restore(&store);
        assert_eq!(restored.current_user(), Some(&user));
    }

    #[test]
    fn stale_ticket_is_ignored_and_logout_clears_storage() {
        let mut store = MemoryStore::default();
        let mut auth = AuthManager::default();
        let ticket = auth
            .begin(&AuthSubmission::register("Ana Lima", "ana@bits.edu", "secret1", "secret1"))
            .expect("valid submission");

        assert!(
            auth.complete(ticket + 1, &mut store, Utc::now())
                .expect("stale completion is not an error")
                .is_none()
        );
        let (user, _) = auth
            .complete(ticket, &mut store, Utc::now())
            .expect("completion should persist")
            .expect("ticket matches");
        assert_eq!(user.name, "Ana Lima");
        assert_eq!(user.role, Role::Student);

        assert!(auth.logout(&mut store).expect("logout should succeed"));
        assert!(!auth.is_authenticated());
        assert!(store.get_raw(CURRENT_USER_KEY).is_none());
        assert!(!auth.logout(&mut store).expect("second logout is a no-op"));
    }
}
