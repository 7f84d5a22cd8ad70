use crate::{error::ApiResult, models::Expense, store::Store};

use super::Resource;

impl Resource for Expense {
    type View = Expense;

    async fn present(_store: &Store, records: Vec<Self>) -> ApiResult<Vec<Expense>> {
        Ok(records)
    }

    fn unresolved(record: Self) -> Expense {
        record
    }
}
