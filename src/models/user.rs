use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{query_builder::Separated, FromRow, Postgres};
use uuid::Uuid;

use super::{PayloadError, Record, Required};
use crate::utils::hash_password;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Admin,
    #[serde(rename = "Warehouse Manager")]
    WarehouseManager,
    #[serde(rename = "Branch Manager")]
    BranchManager,
    /// Least privileged.
    #[default]
    #[serde(rename = "Assistant Manager")]
    AssistantManager,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::WarehouseManager => "Warehouse Manager",
            Role::BranchManager => "Branch Manager",
            Role::AssistantManager => "Assistant Manager",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Role {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "Admin" => Ok(Role::Admin),
            "Warehouse Manager" => Ok(Role::WarehouseManager),
            "Branch Manager" => Ok(Role::BranchManager),
            "Assistant Manager" => Ok(Role::AssistantManager),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub phone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct NewUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
    pub phone: Option<String>,
}

/// `password` arrives in plain text and is replaced by its hash in
/// [`Record::prepare`] before the patch is applied.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl Record for User {
    const COLLECTION: &'static str = "users";
    const LABEL: &'static str = "User";
    const COLUMNS: &'static [&'static str] = &["name", "email", "password_hash", "role", "phone"];
    const UNIQUE: Option<&'static str> = Some("email");

    type Draft = NewUser;
    type Patch = UserPatch;

    fn from_draft(draft: NewUser, id: Uuid, now: DateTime<Utc>) -> Result<Self, PayloadError> {
        let mut required = Required::default();
        let mut user = User {
            id,
            name: required.text("name", draft.name),
            email: required.text("email", draft.email),
            password_hash: required.text("password", draft.password),
            role: required.value("role", draft.role),
            phone: required.text("phone", draft.phone),
            created_at: now,
            updated_at: now,
        };
        user = required.finish(user)?;
        user.password_hash =
            hash_password(&user.password_hash).map_err(|e| PayloadError::Invalid(e.to_string()))?;
        Ok(user)
    }

    fn prepare(mut patch: UserPatch) -> Result<UserPatch, PayloadError> {
        if let Some(password) = patch.password.take() {
            if password.trim().is_empty() {
                return Err(PayloadError::Invalid("password cannot be empty".to_string()));
            }
            let hash = hash_password(&password).map_err(|e| PayloadError::Invalid(e.to_string()))?;
            patch.password = Some(hash);
        }
        Ok(patch)
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }

    fn unique_value(&self) -> Option<&str> {
        Some(&self.email)
    }

    fn apply(&mut self, patch: UserPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(hash) = patch.password {
            self.password_hash = hash;
        }
        if let Some(role) = patch.role {
            self.role = role;
        }
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
    }

    fn push_columns<'args>(&self, row: &mut Separated<'_, 'args, Postgres, &'static str>) {
        row.push_bind(self.name.clone());
        row.push_bind(self.email.clone());
        row.push_bind(self.password_hash.clone());
        row.push_bind(self.role.as_str());
        row.push_bind(self.phone.clone());
    }
}
