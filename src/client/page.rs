use uuid::Uuid;

use super::{ClientContext, ClientError, ClientResource, TablePage, TableView};

/// Lifecycle of one data page.
#[derive(Debug, Clone, PartialEq)]
pub enum PageState<T> {
    Idle,
    Loading,
    Ready(Vec<T>),
    /// Terminal: there is no automatic retry.
    Failed(String),
}

/// One entity's table page: the loaded collection plus its sort, filter and
/// paging settings. Writes go to the server and the response is merged into
/// the local collection without refetching it.
#[derive(Debug, Clone)]
pub struct ResourcePage<R: ClientResource> {
    state: PageState<R>,
    pub table: TableView,
}

impl<R: ClientResource> Default for ResourcePage<R> {
    fn default() -> Self {
        Self {
            state: PageState::Idle,
            table: TableView::default(),
        }
    }
}

impl<R: ClientResource> ResourcePage<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &PageState<R> {
        &self.state
    }

    /// The loaded collection; empty unless the page is ready.
    pub fn items(&self) -> &[R] {
        match &self.state {
            PageState::Ready(items) => items,
            _ => &[],
        }
    }

    pub fn view(&self) -> TablePage<'_, R> {
        self.table.apply(self.items())
    }

    pub async fn load(&mut self, ctx: &ClientContext) {
        self.state = PageState::Loading;
        self.state = match ctx.api.list::<R>().await {
            Ok(items) => PageState::Ready(items),
            Err(e) => {
                let message = format!("Failed to load {}: {}", R::PATH, e);
                ctx.toaster.error(message.clone());
                PageState::Failed(message)
            }
        };
    }

    pub async fn create(&mut self, ctx: &ClientContext, draft: &R::Draft) -> Result<R, ClientError> {
        let created = self.report(ctx, ctx.api.create::<R>(draft).await, "added")?;
        if let PageState::Ready(items) = &mut self.state {
            items.push(created.clone());
        }
        Ok(created)
    }

    pub async fn update(
        &mut self,
        ctx: &ClientContext,
        id: Uuid,
        patch: &R::Patch,
    ) -> Result<R, ClientError> {
        let updated = self.report(ctx, ctx.api.update::<R>(id, patch).await, "updated")?;
        if let PageState::Ready(items) = &mut self.state {
            if let Some(slot) = items.iter_mut().find(|item| item.id() == id) {
                *slot = updated.clone();
            }
        }
        Ok(updated)
    }

    pub async fn delete(&mut self, ctx: &ClientContext, id: Uuid) -> Result<(), ClientError> {
        self.report(ctx, ctx.api.delete::<R>(id).await, "deleted")?;
        if let PageState::Ready(items) = &mut self.state {
            items.retain(|item| item.id() != id);
        }
        Ok(())
    }

    fn report<T>(
        &self,
        ctx: &ClientContext,
        result: Result<T, ClientError>,
        verb: &str,
    ) -> Result<T, ClientError> {
        match &result {
            Ok(_) => ctx.toaster.success(format!("{} {} successfully", R::LABEL, verb)),
            Err(e) => ctx.toaster.error(e.to_string()),
        }
        result
    }
}
