use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{query_builder::Separated, FromRow, Postgres};
use uuid::Uuid;

use super::{money, nullable, PayloadError, Record, Required};

/// Precision of the `value` column; wider than the money columns.
const VALUE_PRECISION: u32 = 16;

/// A dashboard tile, e.g. "Revenue" with a currency value and a trend label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Stat {
    pub id: Uuid,
    pub title: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub value: Decimal,
    pub change: Option<String>,
    pub is_currency: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStat {
    pub title: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub value: Option<Decimal>,
    pub change: Option<String>,
    pub is_currency: Option<bool>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<Decimal>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub change: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_currency: Option<bool>,
}

impl Record for Stat {
    const COLLECTION: &'static str = "stats";
    const LABEL: &'static str = "Stat";
    const COLUMNS: &'static [&'static str] = &["title", "value", "change", "is_currency"];
    const UNIQUE: Option<&'static str> = Some("title");

    type Draft = NewStat;
    type Patch = StatPatch;

    fn from_draft(draft: NewStat, id: Uuid, now: DateTime<Utc>) -> Result<Self, PayloadError> {
        let mut required = Required::default();
        let mut stat = Stat {
            id,
            title: required.text("title", draft.title),
            value: required.value("value", draft.value),
            change: draft.change,
            is_currency: draft.is_currency.unwrap_or(false),
            created_at: now,
            updated_at: now,
        };
        stat = required.finish(stat)?;
        stat.value = money("value", stat.value, VALUE_PRECISION)?;
        Ok(stat)
    }

    fn prepare(mut patch: StatPatch) -> Result<StatPatch, PayloadError> {
        patch.value = patch
            .value
            .map(|value| money("value", value, VALUE_PRECISION))
            .transpose()?;
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
        Some(&self.title)
    }

    fn apply(&mut self, patch: StatPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(value) = patch.value {
            self.value = value;
        }
        if let Some(change) = patch.change {
            self.change = change;
        }
        if let Some(is_currency) = patch.is_currency {
            self.is_currency = is_currency;
        }
    }

    fn push_columns<'args>(&self, row: &mut Separated<'_, 'args, Postgres, &'static str>) {
        row.push_bind(self.title.clone());
        row.push_bind(self.value);
        row.push_bind(self.change.clone());
        row.push_bind(self.is_currency);
    }
}
