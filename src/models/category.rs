use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{query_builder::Separated, FromRow, Postgres};
use uuid::Uuid;

use super::{nullable, Named, PayloadError, Record, Required};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CategoryPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
}

impl Named for Category {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Record for Category {
    const COLLECTION: &'static str = "categories";
    const LABEL: &'static str = "Category";
    const COLUMNS: &'static [&'static str] = &["name", "description"];
    const UNIQUE: Option<&'static str> = Some("name");

    type Draft = NewCategory;
    type Patch = CategoryPatch;

    fn from_draft(draft: NewCategory, id: Uuid, now: DateTime<Utc>) -> Result<Self, PayloadError> {
        let mut required = Required::default();
        let category = Category {
            id,
            name: required.text("name", draft.name),
            description: draft.description,
            created_at: now,
            updated_at: now,
        };
        required.finish(category)
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

    fn apply(&mut self, patch: CategoryPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
    }

    fn push_columns<'args>(&self, row: &mut Separated<'_, 'args, Postgres, &'static str>) {
        row.push_bind(self.name.clone());
        row.push_bind(self.description.clone());
    }
}
