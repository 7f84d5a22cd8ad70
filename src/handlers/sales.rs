use crate::{
    error::ApiResult,
    models::{Order, Stat},
    store::Store,
};

use super::Resource;

// `branch_name` is a denormalized copy; it is not resolved against branches.
impl Resource for Order {
    type View = Order;

    async fn present(_store: &Store, records: Vec<Self>) -> ApiResult<Vec<Order>> {
        Ok(records)
    }

    fn unresolved(record: Self) -> Order {
        record
    }
}

impl Resource for Stat {
    type View = Stat;

    async fn present(_store: &Store, records: Vec<Self>) -> ApiResult<Vec<Stat>> {
        Ok(records)
    }

    fn unresolved(record: Self) -> Stat {
        record
    }
}
