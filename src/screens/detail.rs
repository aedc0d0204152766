use async_trait::async_trait;

use crate::config::config;
use crate::error::Result;
use crate::resources::{storage_link, Record, Resource, ResourceClient};
use crate::routes::Route;
use crate::screens::{list_link, DetailView, PageView, Screen};

pub struct DetailScreen<R: Resource> {
    client: ResourceClient<R>,
    id: String,
}

impl<R: Resource> DetailScreen<R> {
    pub fn new(client: ResourceClient<R>, id: impl Into<String>) -> Self {
        Self {
            client,
            id: id.into(),
        }
    }

    pub async fn mount(&self) -> Result<DetailView> {
        let record = self.client.get(&self.id).await?;

        Ok(DetailView {
            collection: R::COLLECTION,
            id: record.id().to_string(),
            title: record.title().to_string(),
            fields: record.fields(),
            image_url: record
                .image()
                .map(|path| storage_link(&config().api.storage_url, path)),
            edit_link: Route::Edit(R::COLLECTION, self.id.clone()).path(),
            back_link: list_link(R::COLLECTION),
        })
    }

    /// Delete the shown record and leave for the list
    pub async fn delete(&self) -> Result<Route> {
        self.client.delete(&self.id).await?;
        tracing::info!(resource = R::NOUN, id = %self.id, "record deleted");
        Ok(Route::List(R::COLLECTION))
    }
}

#[async_trait]
impl<R: Resource> Screen for DetailScreen<R> {
    async fn render(&self) -> Result<PageView> {
        Ok(PageView::Detail(self.mount().await?))
    }
}
