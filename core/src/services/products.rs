//! Products catalogue, used to exercise query strings and custom headers.

use tracing::info;

use crate::assertions::{assert_status, assert_valid};
use crate::config::ClientConfig;
use crate::deserialize::deserialize_validated;
use crate::error::ApiError;
use crate::executor::RequestExecutor;
use crate::schema::Schema;
use crate::template::query_string;
use crate::types::Product;

pub fn product_list_schema() -> Schema {
    Schema::array(Schema::object([
        ("id", Schema::integer()),
        ("title", Schema::string()),
        ("price", Schema::number()),
        ("category", Schema::string()),
    ]))
}

pub struct ProductsApi {
    executor: RequestExecutor,
    base_url: String,
}

impl ProductsApi {
    pub fn new(base_url: &str, config: ClientConfig) -> Self {
        Self {
            executor: RequestExecutor::new(config),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn close(&mut self) {
        self.executor.close();
    }

    pub async fn get_products(
        &mut self,
        query_params: &[(&str, &str)],
        headers: &[(&str, &str)],
    ) -> Result<Vec<Product>, ApiError> {
        let query = query_string(query_params);
        let uri = format!("{}/products{query}", self.base_url);
        info!("Query params: {query}");
        info!("Complete URI: {uri}");

        let response = self.executor.get(&uri, headers).await?;
        assert_status(200, &response, "Status code assertion")?;
        let products = assert_valid(
            deserialize_validated(&response, &product_list_schema()),
            "Product list should be valid according to schema",
        )?;
        Ok(products)
    }
}
