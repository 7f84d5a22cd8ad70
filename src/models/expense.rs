use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{query_builder::Separated, FromRow, Postgres};
use uuid::Uuid;

use super::{flexible_date, money, nullable, PayloadError, Record, Required};

/// Precision of the `amount` column.
const AMOUNT_PRECISION: u32 = 12;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: Uuid,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[sqlx(rename = "expense_date")]
    pub date: DateTime<Utc>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct NewExpense {
    pub name: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub amount: Option<Decimal>,
    /// Defaults to the creation time.
    #[serde(default, deserialize_with = "flexible_date")]
    pub date: Option<DateTime<Utc>>,
    pub description: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ExpensePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub amount: Option<Decimal>,
    #[serde(default, deserialize_with = "flexible_date", skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
}

impl Record for Expense {
    const COLLECTION: &'static str = "expenses";
    const LABEL: &'static str = "Expense";
    const COLUMNS: &'static [&'static str] = &["name", "amount", "expense_date", "description"];
    const UNIQUE: Option<&'static str> = None;

    type Draft = NewExpense;
    type Patch = ExpensePatch;

    fn from_draft(draft: NewExpense, id: Uuid, now: DateTime<Utc>) -> Result<Self, PayloadError> {
        let mut required = Required::default();
        let mut expense = Expense {
            id,
            name: required.text("name", draft.name),
            amount: required.value("amount", draft.amount),
            date: draft.date.unwrap_or(now),
            description: draft.description,
            created_at: now,
            updated_at: now,
        };
        expense = required.finish(expense)?;
        expense.amount = money("amount", expense.amount, AMOUNT_PRECISION)?;
        Ok(expense)
    }

    fn prepare(mut patch: ExpensePatch) -> Result<ExpensePatch, PayloadError> {
        patch.amount = patch
            .amount
            .map(|amount| money("amount", amount, AMOUNT_PRECISION))
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
        None
    }

    fn apply(&mut self, patch: ExpensePatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
    }

    fn push_columns<'args>(&self, row: &mut Separated<'_, 'args, Postgres, &'static str>) {
        row.push_bind(self.name.clone());
        row.push_bind(self.amount);
        row.push_bind(self.date);
        row.push_bind(self.description.clone());
    }
}
