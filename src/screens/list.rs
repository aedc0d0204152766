use async_trait::async_trait;

use crate::error::Result;
use crate::resources::{ListQuery, Record, Resource, ResourceClient};
use crate::routes::Route;
use crate::screens::{ListView, PageView, Row, Screen};

pub struct ListScreen<R: Resource> {
    client: ResourceClient<R>,
    query: ListQuery,
}

impl<R: Resource> ListScreen<R> {
    pub fn new(client: ResourceClient<R>, query: ListQuery) -> Self {
        Self { client, query }
    }

    /// One list fetch, rendered as a table
    pub async fn mount(&self) -> Result<ListView> {
        let listing = self.client.list(&self.query).await?;
        let collection = R::COLLECTION;

        let columns = listing
            .items
            .first()
            .map(|r| r.fields().into_iter().map(|(label, _)| label).collect())
            .unwrap_or_default();

        let rows = listing
            .items
            .iter()
            .map(|record| Row {
                id: record.id().to_string(),
                cells: record.fields().into_iter().map(|(_, v)| v).collect(),
                link: Route::Detail(collection, record.id().to_string()).path(),
            })
            .collect();

        Ok(ListView {
            collection,
            heading: R::HEADING.to_string(),
            columns,
            rows,
            page: listing.page,
            last_page: listing.last_page,
            create_link: Route::Create(collection).path(),
        })
    }

    /// Delete a row, then fetch the list again
    pub async fn delete(&self, id: &str) -> Result<ListView> {
        self.client.delete(id).await?;
        tracing::info!(resource = R::NOUN, id, "record deleted");
        self.mount().await
    }
}

#[async_trait]
impl<R: Resource> Screen for ListScreen<R> {
    async fn render(&self) -> Result<PageView> {
        Ok(PageView::List(self.mount().await?))
    }
}
