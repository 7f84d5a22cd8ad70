use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{query_builder::Separated, FromRow, Postgres};
use uuid::Uuid;

use super::{money, PayloadError, Record, Required};

/// Precision of the `amount` column.
const AMOUNT_PRECISION: u32 = 12;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Completed,
    #[default]
    Pending,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Completed => "Completed",
            OrderStatus::Pending => "Pending",
            OrderStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for OrderStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "Completed" => Ok(OrderStatus::Completed),
            "Pending" => Ok(OrderStatus::Pending),
            "Cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(format!("unknown order status: {other}")),
        }
    }
}

/// A sale. `branch_name` is a free-text copy of the branch's name, not a reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    #[serde(rename = "saleID")]
    pub sale_id: String,
    pub branch_name: String,
    pub customer_name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[sqlx(try_from = "String")]
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    #[serde(rename = "saleID")]
    pub sale_id: Option<String>,
    pub branch_name: Option<String>,
    pub customer_name: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub amount: Option<Decimal>,
    pub status: Option<OrderStatus>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPatch {
    #[serde(rename = "saleID", skip_serializing_if = "Option::is_none")]
    pub sale_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
}

impl Record for Order {
    const COLLECTION: &'static str = "orders";
    const LABEL: &'static str = "Order";
    const COLUMNS: &'static [&'static str] =
        &["sale_id", "branch_name", "customer_name", "amount", "status"];
    const UNIQUE: Option<&'static str> = Some("sale_id");

    type Draft = NewOrder;
    type Patch = OrderPatch;

    fn from_draft(draft: NewOrder, id: Uuid, now: DateTime<Utc>) -> Result<Self, PayloadError> {
        let mut required = Required::default();
        let mut order = Order {
            id,
            sale_id: required.text("saleID", draft.sale_id),
            branch_name: required.text("branchName", draft.branch_name),
            customer_name: required.text("customerName", draft.customer_name),
            amount: required.value("amount", draft.amount),
            status: draft.status.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };
        order = required.finish(order)?;
        order.amount = money("amount", order.amount, AMOUNT_PRECISION)?;
        Ok(order)
    }

    fn prepare(mut patch: OrderPatch) -> Result<OrderPatch, PayloadError> {
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
        Some(&self.sale_id)
    }

    fn apply(&mut self, patch: OrderPatch) {
        if let Some(sale_id) = patch.sale_id {
            self.sale_id = sale_id;
        }
        if let Some(branch_name) = patch.branch_name {
            self.branch_name = branch_name;
        }
        if let Some(customer_name) = patch.customer_name {
            self.customer_name = customer_name;
        }
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
    }

    fn push_columns<'args>(&self, row: &mut Separated<'_, 'args, Postgres, &'static str>) {
        row.push_bind(self.sale_id.clone());
        row.push_bind(self.branch_name.clone());
        row.push_bind(self.customer_name.clone());
        row.push_bind(self.amount);
        row.push_bind(self.status.as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_defaults_to_pending() {
        let draft: NewOrder = serde_json::from_str(
            r#"{"saleID": "S-1", "branchName": "Downtown", "customerName": "Ada", "amount": 19.99}"#,
        )
        .unwrap();
        let order = Order::from_draft(draft, Uuid::new_v4(), Utc::now()).unwrap();
        assert_eq!(order.status, OrderStatus::Pending);

        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["saleID"], "S-1");
        assert_eq!(json["branchName"], "Downtown");
        assert_eq!(json["status"], "Pending");
    }

    #[test]
    fn unknown_status_is_rejected() {
        let parsed = serde_json::from_str::<OrderPatch>(r#"{"status": "Shipped"}"#);
        assert!(parsed.is_err());
    }
}
