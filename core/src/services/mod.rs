//! Concrete services built on `RequestExecutor`.
//!
//! Each service owns its own executor, and therefore its own connection
//! context, so services can run on separate tasks without sharing state.

pub mod places;
pub mod products;

pub use places::{PlaceLookup, PlacesApi};
pub use products::ProductsApi;

use crate::config::ClientConfig;

/// Every service the suite talks to, against one base URL.
pub struct Services {
    pub places: PlacesApi,
    pub products: ProductsApi,
}

impl Services {
    pub fn new(base_url: &str, config: ClientConfig) -> Self {
        Self {
            places: PlacesApi::new(base_url, config.clone()),
            products: ProductsApi::new(base_url, config),
        }
    }

    /// End-of-suite cleanup.
    pub fn close_connections(&mut self) {
        self.places.close();
        self.products.close();
    }
}
