use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{query_builder::Separated, FromRow, Postgres};
use uuid::Uuid;

use super::{PayloadError, Record, Required};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub id: Uuid,
    pub name: String,
    pub location: String,
    pub contact: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct NewBranch {
    pub name: Option<String>,
    pub location: Option<String>,
    pub contact: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct BranchPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
}

impl Record for Branch {
    const COLLECTION: &'static str = "branches";
    const LABEL: &'static str = "Branch";
    const COLUMNS: &'static [&'static str] = &["name", "location", "contact"];
    const UNIQUE: Option<&'static str> = Some("name");

    type Draft = NewBranch;
    type Patch = BranchPatch;

    fn from_draft(draft: NewBranch, id: Uuid, now: DateTime<Utc>) -> Result<Self, PayloadError> {
        let mut required = Required::default();
        let branch = Branch {
            id,
            name: required.text("name", draft.name),
            location: required.text("location", draft.location),
            contact: required.text("contact", draft.contact),
            created_at: now,
            updated_at: now,
        };
        required.finish(branch)
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
        Some(&self.name)
    }

    fn apply(&mut self, patch: BranchPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
        if let Some(contact) = patch.contact {
            self.contact = contact;
        }
    }

    fn push_columns<'args>(&self, row: &mut Separated<'_, 'args, Postgres, &'static str>) {
        row.push_bind(self.name.clone());
        row.push_bind(self.location.clone());
        row.push_bind(self.contact.clone());
    }
}
