use crate::{
    error::ApiResult,
    models::{Branch, Warehouse},
    store::Store,
};

use super::Resource;

impl Resource for Branch {
    type View = Branch;

    async fn present(_store: &Store, records: Vec<Self>) -> ApiResult<Vec<Branch>> {
        Ok(records)
    }

    fn unresolved(record: Self) -> Branch {
        record
    }
}

impl Resource for Warehouse {
    type View = Warehouse;

    async fn present(_store: &Store, records: Vec<Self>) -> ApiResult<Vec<Warehouse>> {
        Ok(records)
    }

    fn unresolved(record: Self) -> Warehouse {
        record
    }
}
