//! Places API: look up, create, update and delete map locations.

use tracing::info;

use crate::assertions::{assert_equals, assert_status, assert_string_not_null_nor_empty, assert_valid};
use crate::config::ClientConfig;
use crate::deserialize::{deserialize_validated, StatusSchemas};
use crate::error::ApiError;
use crate::executor::RequestExecutor;
use crate::schema::Schema;
use crate::template::{replace_key, replace_key_name};
use crate::types::{AddPlaceResponse, GenericMessage, NewPlace, PlaceDetails, StatusMessage, UpdatePlace};

const GET_PATH: &str = "/maps/api/place/get/json?key={{key}}&place_id={{placeId}}";
const ADD_PATH: &str = "/maps/api/place/add/json?key={{key}}";
const UPDATE_PATH: &str = "/maps/api/place/update/json";
const DELETE_PATH: &str = "/maps/api/place/delete/json?key={{key}}&place_id={{placeId}}";

pub const NOT_FOUND_MSG: &str = "Get operation failed, looks like place_id  doesn't exists";
pub const UPDATED_MSG: &str = "Address successfully updated";

/// Outcome of a place lookup, by status code.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaceLookup {
    Found(PlaceDetails),
    NotFound(GenericMessage),
}

pub fn place_details_schema() -> Schema {
    Schema::object([
        (
            "location",
            Schema::object([("latitude", Schema::string()), ("longitude", Schema::string())]),
        ),
        ("accuracy", Schema::string()),
        ("name", Schema::string()),
        ("phone_number", Schema::string()),
        ("address", Schema::string()),
        ("types", Schema::string()),
        ("website", Schema::url()),
        ("language", Schema::string()),
    ])
}

pub fn generic_message_schema() -> Schema {
    Schema::object([("msg", Schema::string())])
}

pub fn add_place_schema() -> Schema {
    Schema::object([
        ("status", Schema::string()),
        ("place_id", Schema::string()),
        ("scope", Schema::string()),
        ("reference", Schema::string()),
        ("id", Schema::string()),
    ])
}

fn lookup_schemas() -> StatusSchemas<PlaceLookup> {
    StatusSchemas::new()
        .on(200, place_details_schema(), PlaceLookup::Found)
        .on(404, generic_message_schema(), PlaceLookup::NotFound)
}

pub struct PlacesApi {
    executor: RequestExecutor,
    base_url: String,
}

impl PlacesApi {
    pub fn new(base_url: &str, config: ClientConfig) -> Self {
        Self {
            executor: RequestExecutor::new(config),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn close(&mut self) {
        self.executor.close();
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub async fn get_location_info(&mut self, key: &str, place_id: &str) -> Result<PlaceLookup, ApiError> {
        let url = replace_key(&self.url(GET_PATH), key)?;
        let url = replace_key_name(&url, "placeId", place_id)?;

        let response = self.executor.get(&url, &[]).await?;
        let lookup = assert_valid(
            lookup_schemas().deserialize(&response),
            "Response JSON should be valid according to schema",
        )?;

        match &lookup {
            PlaceLookup::Found(place) => {
                info!("Location name: {}", place.name);
                info!("Location address: {}", place.address);
            }
            PlaceLookup::NotFound(reply) => {
                assert_equals(NOT_FOUND_MSG, reply.msg.as_str(), "Error message should be as expected")?;
            }
        }
        Ok(lookup)
    }

    /// Create a place and return the server's reply, including the new id.
    pub async fn post_new_location(&mut self, key: &str, place: &NewPlace) -> Result<AddPlaceResponse, ApiError> {
        let url = replace_key(&self.url(ADD_PATH), key)?;

        let response = self.executor.post(&url, place, &[]).await?;
        let created: AddPlaceResponse = assert_valid(
            deserialize_validated(&response, &add_place_schema()),
            "Response JSON should be valid according to schema",
        )?;
        assert_string_not_null_nor_empty(Some(created.place_id.as_str()), "Generated place id")?;

        info!("New place id generated from POST call: {}", created.place_id);
        info!("Scope: {}", created.scope);
        Ok(created)
    }

    pub async fn put_update_existing_location(&mut self, body: &UpdatePlace) -> Result<GenericMessage, ApiError> {
        let url = self.url(UPDATE_PATH);

        let response = self.executor.put(&url, body, &[]).await?;
        let reply: GenericMessage = assert_valid(
            deserialize_validated(&response, &generic_message_schema()),
            "Response JSON should be valid according to schema",
        )?;
        assert_equals(UPDATED_MSG, reply.msg.as_str(), "Success HTTP PUT message should be as expected")?;
        Ok(reply)
    }

    pub async fn delete_location(&mut self, key: &str, place_id: &str) -> Result<StatusMessage, ApiError> {
        let url = replace_key(&self.url(DELETE_PATH), key)?;
        let url = replace_key_name(&url, "placeId", place_id)?;

        let response = self.executor.delete(&url, &[]).await?;
        assert_status(200, &response, "Status code when deleting a place")?;
        let reply = assert_valid(
            deserialize_validated(&response, &Schema::object([("status", Schema::literal("OK"))])),
            "Response JSON should be valid according to schema",
        )?;
        Ok(reply)
    }
}
