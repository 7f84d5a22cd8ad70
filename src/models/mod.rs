pub mod branch;
pub mod warehouse;
pub mod category;
pub mod subcategory;
pub mod product;
pub mod user;
pub mod expense;
pub mod order;
pub mod stat;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use sqlx::{postgres::PgRow, query_builder::Separated, FromRow, Postgres};
use thiserror::Error;
use uuid::Uuid;

pub use branch::{Branch, BranchPatch, NewBranch};
pub use warehouse::{NewWarehouse, Warehouse, WarehousePatch};
pub use category::{Category, CategoryPatch, NewCategory};
pub use subcategory::{NewSubcategory, Subcategory, SubcategoryPatch, SubcategoryView};
pub use product::{NewProduct, Product, ProductPatch, ProductView};
pub use user::{NewUser, Role, User, UserPatch};
pub use expense::{Expense, ExpensePatch, NewExpense};
pub use order::{NewOrder, Order, OrderPatch, OrderStatus};
pub use stat::{NewStat, Stat, StatPatch};

/// A persisted entity: one row in a Postgres table, one element of a
/// collection in the memory store.
pub trait Record:
    Serialize + for<'r> FromRow<'r, PgRow> + Clone + Send + Sync + Unpin + 'static
{
    /// Table / collection name.
    const COLLECTION: &'static str;
    /// Singular display name used in error messages.
    const LABEL: &'static str;
    /// Writable columns, in the order `push_columns` binds them.
    const COLUMNS: &'static [&'static str];
    /// Column carrying a uniqueness constraint, if any.
    const UNIQUE: Option<&'static str>;

    /// Create payload; every field optional so absence can be reported.
    type Draft: DeserializeOwned + Send + 'static;
    /// Partial update; a field is applied iff its key was present.
    type Patch: DeserializeOwned + Send + 'static;

    /// May be CPU-bound (password hashing); callers on an async runtime run it
    /// on the blocking pool.
    fn from_draft(draft: Self::Draft, id: Uuid, now: DateTime<Utc>) -> Result<Self, PayloadError>;

    /// Runs before the patch reaches the store, outside any lock or transaction.
    /// Same threading rule as `from_draft`.
    fn prepare(patch: Self::Patch) -> Result<Self::Patch, PayloadError> {
        Ok(patch)
    }

    fn id(&self) -> Uuid;
    fn created_at(&self) -> DateTime<Utc>;
    fn updated_at(&self) -> DateTime<Utc>;
    fn touch(&mut self, at: DateTime<Utc>);
    fn unique_value(&self) -> Option<&str>;

    /// Overwrite exactly the fields present in `patch`.
    fn apply(&mut self, patch: Self::Patch);

    fn push_columns<'args>(&self, row: &mut Separated<'_, 'args, Postgres, &'static str>);
}

/// Entities other records point at by id and display by name.
pub trait Named {
    fn name(&self) -> &str;
}

/// A create or update payload that cannot become a record.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PayloadError {
    #[error("Missing required fields: {}", .0.join(", "))]
    Missing(Vec<&'static str>),
    #[error("{0}")]
    Invalid(String),
}

/// Collects missing required fields while a create payload is validated.
#[derive(Default)]
pub(crate) struct Required {
    missing: Vec<&'static str>,
}

impl Required {
    pub(crate) fn text(&mut self, field: &'static str, value: Option<String>) -> String {
        match value {
            Some(v) if !v.trim().is_empty() => v,
            _ => {
                self.missing.push(field);
                String::new()
            }
        }
    }

    pub(crate) fn value<T: Default>(&mut self, field: &'static str, value: Option<T>) -> T {
        value.unwrap_or_else(|| {
            self.missing.push(field);
            T::default()
        })
    }

    pub(crate) fn finish<T>(self, record: T) -> Result<T, PayloadError> {
        if self.missing.is_empty() {
            Ok(record)
        } else {
            Err(PayloadError::Missing(self.missing))
        }
    }
}

/// Digits after the decimal point in every money column (`NUMERIC(p, 2)`).
pub const MONEY_SCALE: u32 = 2;

/// Rounds to cents the way a `NUMERIC(precision, 2)` column does on write and
/// rejects values the column cannot hold, so both stores keep the same number.
pub(crate) fn money(field: &'static str, value: Decimal, precision: u32) -> Result<Decimal, PayloadError> {
    let rounded = value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    let integer_digits = precision - MONEY_SCALE;
    if rounded.abs() >= Decimal::from(10u64.pow(integer_digits)) {
        return Err(PayloadError::Invalid(format!(
            "{field} is out of range: at most {integer_digits} digits before the decimal point"
        )));
    }
    Ok(rounded)
}

/// A reference to another record, resolved to its display name for responses.
/// `name` is `None` when the referenced record no longer exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub id: Uuid,
    pub name: Option<String>,
}

/// Distinguishes an omitted key (`None`) from an explicit `null` (`Some(None)`).
/// Pair with `#[serde(default)]`.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Accepts an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC).
pub fn flexible_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    let Some(raw) = raw else {
        return Ok(None);
    };
    if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(ts.with_timezone(&Utc)));
    }
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| Some(dt.and_utc()))
        .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {raw}")))
}
