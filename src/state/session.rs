//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! The session (bearer token + user profile) is read by the navigation guard
//! to make redirect decisions and by the API client to authorize requests.
//! It is provided to components as an `RwSignal<BrowserSessionStore>` context
//! instead of a global singleton.
//!
//! DESIGN
//! ======
//! Every mutation goes through [`SessionStore`], which updates the in-memory
//! [`Session`] and its durable copy together. Durable keys are `token` (raw
//! string) and `user` (JSON object).

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::storage::{KeyValueStore, LocalStorage};

/// Durable-storage key holding the raw bearer token.
pub const TOKEN_KEY: &str = "token";
/// Durable-storage key holding the JSON-serialized user record.
pub const USER_KEY: &str = "user";

pub const ADMIN_DASHBOARD_PATH: &str = "/admin/dashboard";
pub const USER_DASHBOARD_PATH: &str = "/user/dashboard";

const USER_TYPE_FIELD: &str = "userType";

/// Account role carried in the user record's `userType` field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UserType {
    Regular,
    Admin,
}

impl UserType {
    /// Integer code used on the wire and in route metadata.
    pub const fn code(self) -> i64 {
        match self {
            Self::Regular => 0,
            Self::Admin => 1,
        }
    }
}

/// Landing dashboard for a session's raw `userType`.
///
/// Anything other than the admin code, including a missing field, lands on the
/// regular-user dashboard.
pub fn home_path_for(user_type: Option<i64>) -> &'static str {
    if user_type == Some(UserType::Admin.code()) {
        ADMIN_DASHBOARD_PATH
    } else {
        USER_DASHBOARD_PATH
    }
}

/// Open-ended user record as returned by the backend.
///
/// Only `userType` is interpreted; all other fields are carried verbatim so a
/// `set_user` followed by a reload returns the same record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserProfile(Map<String, Value>);

impl UserProfile {
    /// The empty record `{}`.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user_type(user_type: UserType) -> Self {
        let mut fields = Map::new();
        fields.insert(USER_TYPE_FIELD.to_owned(), Value::from(user_type.code()));
        Self(fields)
    }

    /// Parse a durable `user` entry, falling back to `{}` for anything that is
    /// not a JSON object.
    pub fn parse_or_empty(raw: &str) -> Self {
        match serde_json::from_str::<Map<String, Value>>(raw) {
            Ok(fields) => Self(fields),
            Err(err) => {
                log::warn!("discarding malformed stored user record: {err}");
                Self::default()
            }
        }
    }

    /// Integer `userType`, if present and integral.
    pub fn user_type(&self) -> Option<i64> {
        self.0.get(USER_TYPE_FIELD).and_then(integer_value)
    }

    /// Name to show in the layout header.
    pub fn display_name(&self) -> Option<&str> {
        ["nickname", "username", "name"]
            .iter()
            .find_map(|field| self.0.get(*field).and_then(Value::as_str))
            .filter(|name| !name.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_json(&self) -> String {
        Value::Object(self.0.clone()).to_string()
    }
}

impl From<Map<String, Value>> for UserProfile {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
fn integer_value(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.is_finite() && f.fract() == 0.0)
            .map(|f| f as i64)
    })
}

/// In-memory authentication state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Session {
    token: String,
    user: UserProfile,
}

impl Session {
    pub fn new(token: impl Into<String>, user: UserProfile) -> Self {
        Self { token: token.into(), user }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn user(&self) -> &UserProfile {
        &self.user
    }

    pub fn is_authenticated(&self) -> bool {
        !self.token.is_empty()
    }

    pub fn is_admin(&self) -> bool {
        self.user.user_type() == Some(UserType::Admin.code())
    }

    pub fn user_type(&self) -> Option<i64> {
        self.user.user_type()
    }

    pub fn home_path(&self) -> &'static str {
        home_path_for(self.user_type())
    }
}

/// Session state mirrored to durable storage.
///
/// A store created with [`SessionStore::pending`] reports `loading` until
/// [`SessionStore::reload`] has read the durable copy. Server rendering never
/// gets past that point, so signed-in chrome only appears in the browser.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionStore<S> {
    session: Session,
    storage: S,
    loading: bool,
}

/// Session store backed by the browser's `localStorage`.
pub type BrowserSessionStore = SessionStore<LocalStorage>;

impl<S: KeyValueStore> SessionStore<S> {
    /// Load the persisted session from `storage`.
    ///
    /// Missing keys default to an empty token and `{}`.
    pub fn initialize(storage: S) -> Self {
        Self {
            session: load_session(&storage),
            storage,
            loading: false,
        }
    }

    /// An empty, still-loading store over `storage`.
    pub fn pending(storage: S) -> Self {
        Self {
            session: Session::default(),
            storage,
            loading: true,
        }
    }

    /// Re-read the durable session and clear the loading flag.
    pub fn reload(&mut self) {
        self.session = load_session(&self.storage);
        self.loading = false;
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.session.token = token.into();
        if let Err(err) = self.storage.set_item(TOKEN_KEY, &self.session.token) {
            log::warn!("failed to persist session token: {err}");
        }
    }

    pub fn set_user(&mut self, user: UserProfile) {
        self.session.user = user;
        if let Err(err) = self.storage.set_item(USER_KEY, &self.session.user.to_json()) {
            log::warn!("failed to persist session user: {err}");
        }
    }

    /// Clear the session in memory and in durable storage.
    pub fn logout(&mut self) {
        self.session = Session::default();
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(err) = self.storage.remove_item(key) {
                log::warn!("failed to clear `{key}` from storage: {err}");
            }
        }
    }
}

impl<S> SessionStore<S> {
    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn token(&self) -> &str {
        self.session.token()
    }

    pub fn current_user(&self) -> &UserProfile {
        self.session.user()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn is_admin(&self) -> bool {
        self.session.is_admin()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}

fn load_session<S: KeyValueStore>(storage: &S) -> Session {
    let token = storage.get_item(TOKEN_KEY).unwrap_or_default();
    let user = storage
        .get_item(USER_KEY)
        .map(|raw| UserProfile::parse_or_empty(&raw))
        .unwrap_or_default();
    Session { token, user }
}
