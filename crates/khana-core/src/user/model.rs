//! Session identity model.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use uuid::Uuid;

/// Role declared by the caller at login or registration.
///
/// Customers are stored as `"user"`, which is how existing client storage
/// spells that role.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
    #[default]
    #[serde(rename = "user", alias = "customer")]
    #[strum(to_string = "customer", serialize = "user")]
    Customer,
    Chef,
    Admin,
}

/// The identity held by the client while someone is logged in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl UserSession {
    /// Builds an identity for `email` without consulting any backing store.
    ///
    /// The identifier is derived from the lowercased email, so logging in
    /// twice with the same address yields the same id and the same chef
    /// keeps ownership of their meals across sessions.
    pub fn synthesize(
        name: impl Into<String>,
        email: impl Into<String>,
        role: Role,
        avatar: Option<String>,
    ) -> Self {
        let email = email.into();
        Self {
            id: Self::id_for_email(&email),
            name: name.into(),
            email,
            role,
            avatar,
        }
    }

    /// Deterministic identifier for an email address.
    pub fn id_for_email(email: &str) -> String {
        Uuid::new_v5(&Uuid::NAMESPACE_OID, email.trim().to_lowercase().as_bytes()).to_string()
    }

    /// Display name used when only an email is known: the part before `@`.
    pub fn name_from_email(email: &str) -> &str {
        email.split_once('@').map(|(local, _)| local).unwrap_or(email)
    }
}
