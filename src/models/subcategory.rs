use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{query_builder::Separated, FromRow, Postgres};
use uuid::Uuid;

use super::{nullable, Named, PayloadError, Record, Reference, Required};

/// Belongs to one category. The reference is not checked on write, so it may
/// dangle after the category is deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Subcategory {
    pub id: Uuid,
    pub name: String,
    #[sqlx(rename = "category_id")]
    pub category: Uuid,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct NewSubcategory {
    pub name: Option<String>,
    pub category: Option<Uuid>,
    pub description: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SubcategoryPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Uuid>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
}

/// Response shape with the category name resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubcategoryView {
    pub id: Uuid,
    pub name: String,
    pub category: Reference,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SubcategoryView {
    pub fn resolve(subcategory: Subcategory, category_names: &HashMap<Uuid, String>) -> Self {
        Self {
            id: subcategory.id,
            category: Reference {
                id: subcategory.category,
                name: category_names.get(&subcategory.category).cloned(),
            },
            name: subcategory.name,
            description: subcategory.description,
            created_at: subcategory.created_at,
            updated_at: subcategory.updated_at,
        }
    }
}

impl Named for Subcategory {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Record for Subcategory {
    const COLLECTION: &'static str = "subcategories";
    const LABEL: &'static str = "Subcategory";
    const COLUMNS: &'static [&'static str] = &["name", "category_id", "description"];
    const UNIQUE: Option<&'static str> = Some("name");

    type Draft = NewSubcategory;
    type Patch = SubcategoryPatch;

    fn from_draft(draft: NewSubcategory, id: Uuid, now: DateTime<Utc>) -> Result<Self, PayloadError> {
        let mut required = Required::default();
        let subcategory = Subcategory {
            id,
            name: required.text("name", draft.name),
            category: required.value("category", draft.category),
            description: draft.description,
            created_at: now,
            updated_at: now,
        };
        required.finish(subcategory)
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

    fn apply(&mut self, patch: SubcategoryPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
    }

    fn push_columns<'args>(&self, row: &mut Separated<'_, 'args, Postgres, &'static str>) {
        row.push_bind(self.name.clone());
        row.push_bind(self.category);
        row.push_bind(self.description.clone());
    }
}
