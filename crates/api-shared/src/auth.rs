//! Authentication and role-based access control.
//!
//! Users log in with a username and password and receive an opaque bearer token that identifies
//! a session held in memory. Each request presents the token; the session resolves to a
//! [`SessionUser`] whose [`Role`] decides which routes it may call.
//!
//! Passwords are stored as bcrypt hashes. Tokens are random v4 UUIDs and carry no data of their
//! own.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Roles permitted to read predictions, patient data and fairness data.
pub const CLINICAL_ROLES: &[Role] = &[Role::Physician, Role::Nurse];

/// Errors from login, token resolution and role checks.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AuthError {
    #[error("Access token required")]
    MissingToken,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Insufficient permissions")]
    InsufficientPermissions,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("session store unavailable: {0}")]
    SessionStore(String),
    #[error("password hashing failed: {0}")]
    PasswordHash(String),
}

pub type AuthResult<T> = std::result::Result<T, AuthError>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Physician,
    Nurse,
    Administrator,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Physician => "physician",
            Role::Nurse => "nurse",
            Role::Administrator => "administrator",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Work factor used when hashing stored passwords.
pub const PASSWORD_HASH_COST: u32 = bcrypt::DEFAULT_COST;

/// bcrypt hash of `password` at the given work factor.
pub fn hash_password(password: &str, cost: u32) -> AuthResult<String> {
    bcrypt::hash(password, cost).map_err(|e| AuthError::PasswordHash(e.to_string()))
}

/// A registered user with stored credentials.
#[derive(Clone, Debug)]
pub struct User {
    pub id: String,
    pub username: String,
    pub role: Role,
    pub name: String,
    pub department: String,
    password_hash: String,
}

impl User {
    /// Creates a user from an already computed bcrypt hash (see [`hash_password`]).
    pub fn new(
        id: impl Into<String>,
        username: impl Into<String>,
        role: Role,
        name: impl Into<String>,
        department: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            role,
            name: name.into(),
            department: department.into(),
            password_hash: password_hash.into(),
        }
    }

    /// # Errors
    ///
    /// Returns [`AuthError::PasswordHash`] if the stored hash is not a valid bcrypt hash.
    pub fn verify_password(&self, password: &str) -> AuthResult<bool> {
        bcrypt::verify(password, &self.password_hash)
            .map_err(|e| AuthError::PasswordHash(e.to_string()))
    }

    pub fn session_user(&self) -> SessionUser {
        SessionUser {
            id: self.id.clone(),
            username: self.username.clone(),
            role: self.role,
            name: self.name.clone(),
            department: self.department.clone(),
        }
    }
}

/// Registered users, looked up by username.
#[derive(Clone, Debug, Default)]
pub struct UserDirectory {
    users: HashMap<String, User>,
}

impl UserDirectory {
    pub fn new(users: impl IntoIterator<Item = User>) -> Self {
        Self {
            users: users
                .into_iter()
                .map(|u| (u.username.clone(), u))
                .collect(),
        }
    }

    /// The two demo accounts of the reference deployment, both using `password`.
    pub fn with_demo_users(password: &str, cost: u32) -> AuthResult<Self> {
        let password_hash = hash_password(password, cost)?;
        Ok(Self::new([
            User::new(
                "1",
                "dr.smith",
                Role::Physician,
                "Dr. Sarah Smith",
                "Internal Medicine",
                password_hash.clone(),
            ),
            User::new(
                "2",
                "nurse.jones",
                Role::Nurse,
                "Nurse Mary Jones",
                "Internal Medicine",
                password_hash,
            ),
        ]))
    }

    pub fn find(&self, username: &str) -> Option<&User> {
        self.users.get(username)
    }

    /// Checks credentials. Runs a full bcrypt verification, so call it off the async executor.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] for an unknown user and for a wrong password
    /// alike.
    pub fn authenticate(&self, username: &str, password: &str) -> AuthResult<&User> {
        let user = self.find(username).ok_or_else(|| {
            tracing::warn!(username, "failed login attempt");
            AuthError::InvalidCredentials
        })?;
        if !user.verify_password(password)? {
            tracing::warn!(username, "failed login attempt");
            return Err(AuthError::InvalidCredentials);
        }
        Ok(user)
    }
}

/// The identity attached to an authenticated request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SessionUser {
    pub id: String,
    pub username: String,
    pub role: Role,
    pub name: String,
    pub department: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: SessionUser,
    pub expires_at: DateTime<Utc>,
}

/// In-memory bearer-token sessions shared by all request handlers.
#[derive(Clone, Debug)]
pub struct SessionStore {
    ttl: Duration,
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Opens a session for `user`, valid until `now + ttl`.
    pub fn issue(&self, user: &User, now: DateTime<Utc>) -> AuthResult<Session> {
        let session = Session {
            token: uuid::Uuid::new_v4().simple().to_string(),
            user: user.session_user(),
            expires_at: now + self.ttl,
        };

        self.sessions
            .write()
            .map_err(|e| AuthError::SessionStore(e.to_string()))?
            .insert(session.token.clone(), session.clone());

        Ok(session)
    }

    /// Resolves a token to its user. Expired sessions are evicted.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidToken`] for unknown or expired tokens.
    pub fn resolve(&self, token: &str, now: DateTime<Utc>) -> AuthResult<SessionUser> {
        {
            let sessions = self
                .sessions
                .read()
                .map_err(|e| AuthError::SessionStore(e.to_string()))?;
            match sessions.get(token) {
                None => return Err(AuthError::InvalidToken),
                Some(session) if session.expires_at > now => return Ok(session.user.clone()),
                Some(_) => {}
            }
        }

        self.revoke(token)?;
        Err(AuthError::InvalidToken)
    }

    /// Ends a session. Returns whether a session was removed.
    pub fn revoke(&self, token: &str) -> AuthResult<bool> {
        Ok(self
            .sessions
            .write()
            .map_err(|e| AuthError::SessionStore(e.to_string()))?
            .remove(token)
            .is_some())
    }

    /// Drops every session that has expired by `now`; returns how many were dropped.
    pub fn purge_expired(&self, now: DateTime<Utc>) -> AuthResult<usize> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|e| AuthError::SessionStore(e.to_string()))?;
        let before = sessions.len();
        sessions.retain(|_, s| s.expires_at > now);
        Ok(before - sessions.len())
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: Option<&str>) -> AuthResult<&str> {
    let header = header.ok_or(AuthError::MissingToken)?;
    let (scheme, token) = header.split_once(' ').ok_or(AuthError::MissingToken)?;
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(AuthError::MissingToken);
    }
    Ok(token)
}

/// Checks that `user` holds one of `allowed`.
pub fn require_role(user: &SessionUser, allowed: &[Role]) -> AuthResult<()> {
    if allowed.contains(&user.role) {
        return Ok(());
    }

    tracing::warn!(
        user = %user.username,
        role = %user.role,
        required_roles = ?allowed,
        "unauthorized access attempt"
    );
    Err(AuthError::InsufficientPermissions)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Lowest bcrypt work factor, keeps the tests fast.
    const TEST_COST: u32 = 4;

    fn now() -> DateTime<Utc> {
        "2024-12-20T09:00:00Z".parse().expect("timestamp")
    }

    fn demo_directory() -> UserDirectory {
        UserDirectory::with_demo_users("password", TEST_COST).expect("hash demo password")
    }

    #[test]
    fn test_hash_password_is_salted_bcrypt() {
        let a = hash_password("password", TEST_COST).expect("hash");
        let b = hash_password("password", TEST_COST).expect("hash");
        assert!(a.starts_with("$2"));
        assert_ne!(a, b);
        assert!(!a.contains("password"));

        let user = User::new("9", "u", Role::Nurse, "U", "Ward", a);
        assert_eq!(user.verify_password("password"), Ok(true));
        assert_eq!(user.verify_password("Password"), Ok(false));
    }

    #[test]
    fn test_malformed_stored_hash_is_an_error_not_a_match() {
        let user = User::new("9", "u", Role::Nurse, "U", "Ward", "not-a-bcrypt-hash");
        assert!(matches!(
            user.verify_password("password"),
            Err(AuthError::PasswordHash(_))
        ));
    }

    #[test]
    fn test_authenticate_demo_users() {
        let directory = demo_directory();

        let user = directory
            .authenticate("dr.smith", "password")
            .expect("valid credentials");
        assert_eq!(user.role, Role::Physician);

        assert_eq!(
            directory.authenticate("dr.smith", "wrong").unwrap_err(),
            AuthError::InvalidCredentials
        );
        assert_eq!(
            directory.authenticate("nobody", "password").unwrap_err(),
            AuthError::InvalidCredentials
        );
    }

    #[test]
    fn test_session_resolves_until_expiry() {
        let directory = demo_directory();
        let user = directory.find("nurse.jones").expect("demo user");
        let store = SessionStore::new(Duration::hours(8));

        let session = store.issue(user, now()).expect("issue session");
        assert_eq!(session.expires_at, now() + Duration::hours(8));

        let resolved = store
            .resolve(&session.token, now() + Duration::hours(7))
            .expect("session valid");
        assert_eq!(resolved.role, Role::Nurse);

        assert_eq!(
            store.resolve(&session.token, now() + Duration::hours(8)),
            Err(AuthError::InvalidToken)
        );
        // Expired sessions are evicted on first rejected use.
        assert_eq!(store.revoke(&session.token), Ok(false));
    }

    #[test]
    fn test_revoke_and_purge() {
        let directory = demo_directory();
        let user = directory.find("dr.smith").expect("demo user");
        let store = SessionStore::new(Duration::minutes(30));

        let first = store.issue(user, now()).expect("issue");
        let _second = store.issue(user, now() + Duration::minutes(20)).expect("issue");

        assert_eq!(store.revoke(&first.token), Ok(true));
        assert_eq!(store.resolve(&first.token, now()), Err(AuthError::InvalidToken));

        assert_eq!(store.purge_expired(now() + Duration::hours(1)), Ok(1));
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(Some("Bearer abc123")), Ok("abc123"));
        assert_eq!(bearer_token(Some("bearer abc123")), Ok("abc123"));
        assert_eq!(bearer_token(None), Err(AuthError::MissingToken));
        assert_eq!(bearer_token(Some("Bearer")), Err(AuthError::MissingToken));
        assert_eq!(bearer_token(Some("Bearer   ")), Err(AuthError::MissingToken));
        assert_eq!(bearer_token(Some("Basic abc123")), Err(AuthError::MissingToken));
    }

    #[test]
    fn test_require_role() {
        let clinician = SessionUser {
            id: "1".into(),
            username: "dr.smith".into(),
            role: Role::Physician,
            name: "Dr. Sarah Smith".into(),
            department: "Internal Medicine".into(),
        };
        assert!(require_role(&clinician, CLINICAL_ROLES).is_ok());

        let admin = SessionUser {
            role: Role::Administrator,
            ..clinician
        };
        assert_eq!(
            require_role(&admin, CLINICAL_ROLES),
            Err(AuthError::InsufficientPermissions)
        );
    }
}
