//! Request and response models for the services in `crate::services`.
//!
//! Request bodies only serialize; response models only deserialize and are
//! paired with a `Schema` in the service that reads them.

use serde::{Deserialize, Serialize};

/// Coordinates sent when creating a place.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewLocation {
    pub lat: f64,
    pub lng: f64,
}

/// Body of the add-place call.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewPlace {
    pub location: NewLocation,
    pub accuracy: i64,
    pub name: String,
    pub phone_number: String,
    pub address: String,
    pub types: Vec<String>,
    pub website: String,
    pub language: String,
}

impl NewPlace {
    /// A complete place whose address ends in `address_suffix`, so repeated
    /// runs create distinguishable places.
    pub fn sample(address_suffix: &str) -> Self {
        Self {
            location: NewLocation {
                lat: 20.7565972669,
                lng: -103.40019389712755,
            },
            accuracy: 2,
            name: "Nice Restaurant".to_string(),
            phone_number: "(52) 55 3312 3456".to_string(),
            address: format!("Valdepeñas {address_suffix}"),
            types: vec!["coffee".to_string(), "restaurant".to_string(), "bar".to_string()],
            website: "https://nicerestaurant.com".to_string(),
            language: "United States-EN".to_string(),
        }
    }
}

/// Body of the update-place call.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UpdatePlace {
    pub place_id: String,
    pub address: String,
    pub key: String,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Location {
    pub latitude: String,
    pub longitude: String,
}

/// A place as the get call returns it. Coordinates and accuracy come back
/// as strings, `types` as a comma-separated list.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct PlaceDetails {
    pub location: Location,
    pub accuracy: String,
    pub name: String,
    pub phone_number: String,
    pub address: String,
    pub types: String,
    pub website: String,
    pub language: String,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct AddPlaceResponse {
    pub status: String,
    pub place_id: String,
    pub scope: String,
    pub reference: String,
    pub id: String,
}

/// `{"msg": ...}` replies, used for errors and for update confirmations.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct GenericMessage {
    pub msg: String,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct StatusMessage {
    pub status: String,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Product {
    pub id: u32,
    pub title: String,
    pub price: f64,
    pub category: String,
}
