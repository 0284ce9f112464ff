use std::fmt;

use serde::{Deserialize, Serialize};

/// An administrator account as returned by the admin backend.
///
/// Every field is mandatory: a fetched record is always fully populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    /// Assigned by the backend; never changes.
    pub id: i64,

    /// Login name, unique across admins.
    pub username: String,

    pub nick_name: String,

    pub email: String,

    pub note: String,

    /// Timestamps are opaque strings in whatever format the backend emits.
    pub create_time: String,

    pub update_time: String,

    pub login_time: String,

    /// Whether the account is enabled.
    pub status: bool,
}

/// Partial update for an [`Admin`].
///
/// Absent fields are omitted from the JSON body and left unchanged by the
/// receiver. An explicit `null` in incoming JSON reads as absent.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminParam {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// New password. Has no counterpart on [`Admin`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nick_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<bool>,
}

impl AdminParam {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_nick_name(mut self, nick_name: impl Into<String>) -> Self {
        self.nick_name = Some(nick_name.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn with_status(mut self, status: bool) -> Self {
        self.status = Some(status);
        self
    }

    /// True when no field is provided.
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.password.is_none()
            && self.email.is_none()
            && self.nick_name.is_none()
            && self.note.is_none()
            && self.status.is_none()
    }

    /// Apply the provided fields to `admin`.
    ///
    /// Absent fields and `id` are left alone. `password` is not part of the
    /// read model and is skipped. Returns the JSON names of the fields whose
    /// value actually changed.
    pub fn apply(&self, admin: &mut Admin) -> Vec<&'static str> {
        let mut changed = Vec::new();
        assign(&mut admin.username, &self.username, "username", &mut changed);
        assign(&mut admin.email, &self.email, "email", &mut changed);
        assign(&mut admin.nick_name, &self.nick_name, "nickName", &mut changed);
        assign(&mut admin.note, &self.note, "note", &mut changed);
        assign(&mut admin.status, &self.status, "status", &mut changed);
        changed
    }
}

fn assign<T: Clone + PartialEq>(
    target: &mut T,
    value: &Option<T>,
    name: &'static str,
    changed: &mut Vec<&'static str>,
) {
    if let Some(value) = value {
        if target != value {
            *target = value.clone();
            changed.push(name);
        }
    }
}

impl fmt::Debug for AdminParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminParam")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("email", &self.email)
            .field("nick_name", &self.nick_name)
            .field("note", &self.note)
            .field("status", &self.status)
            .finish()
    }
}
