use crate::{error::ApiResult, models::User, store::Store};

use super::Resource;

// Password hashes are skipped by `User`'s serializer, so records go out as-is.
impl Resource for User {
    type View = User;

    async fn present(_store: &Store, records: Vec<Self>) -> ApiResult<Vec<User>> {
        Ok(records)
    }

    fn unresolved(record: Self) -> User {
        record
    }
}
