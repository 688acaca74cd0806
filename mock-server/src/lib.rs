use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, patch, post, put},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// API key accepted by every places route.
pub const KNOWN_KEY: &str = "qaclick123";

/// Place seeded into every fresh `app()`.
pub const KNOWN_PLACE_ID: &str = "f360892225d5d091e4b043b63e391f54";

pub const NOT_FOUND_GET_MSG: &str = "Get operation failed, looks like place_id  doesn't exists";
pub const UPDATED_MSG: &str = "Address successfully updated";
pub const NOT_FOUND_UPDATE_MSG: &str =
    "Update address operation failed, looks like the data doesn't exists";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Location {
    pub latitude: String,
    pub longitude: String,
}

/// A stored place, in the shape the get endpoint returns it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Place {
    pub location: Location,
    pub accuracy: String,
    pub name: String,
    pub phone_number: String,
    pub address: String,
    pub types: String,
    pub website: String,
    pub language: String,
}

#[derive(Deserialize)]
pub struct NewLocation {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Deserialize)]
pub struct NewPlace {
    pub location: NewLocation,
    pub accuracy: i64,
    pub name: String,
    pub phone_number: String,
    pub address: String,
    #[serde(default)]
    pub types: Vec<String>,
    pub website: String,
    pub language: String,
}

#[derive(Deserialize)]
pub struct UpdatePlace {
    pub place_id: String,
    pub address: String,
    pub key: String,
}

#[derive(Deserialize)]
pub struct PlaceQuery {
    pub key: Option<String>,
    pub place_id: Option<String>,
}

#[derive(Deserialize)]
pub struct ProductQuery {
    pub limit: Option<usize>,
    pub page: Option<usize>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: u32,
    pub title: String,
    pub price: f64,
    pub category: String,
}

pub type Db = Arc<RwLock<HashMap<String, Place>>>;

type Reply = (StatusCode, Json<Value>);

pub fn app() -> Router {
    let mut places = HashMap::new();
    places.insert(KNOWN_PLACE_ID.to_string(), known_place());
    let db: Db = Arc::new(RwLock::new(places));

    Router::new()
        .route("/maps/api/place/get/json", get(get_place))
        .route("/maps/api/place/add/json", post(add_place))
        .route("/maps/api/place/update/json", put(update_place))
        .route("/maps/api/place/delete/json", axum::routing::delete(delete_place))
        .route("/products", get(list_products))
        .route("/echo", patch(echo_json))
        .route("/echo/form", post(echo_form))
        .route("/echo/headers", get(echo_headers))
        .route("/plain", get(plain))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn known_place() -> Place {
    Place {
        location: Location {
            latitude: "-38.383494".to_string(),
            longitude: "33.427362".to_string(),
        },
        accuracy: "50".to_string(),
        name: "Frontline house".to_string(),
        phone_number: "(+91) 983 893 3937".to_string(),
        address: "29, side layout, cohen 09".to_string(),
        types: "shoe park,shop".to_string(),
        website: "http://google.com".to_string(),
        language: "French-IN".to_string(),
    }
}

fn check_key(key: Option<&str>) -> Result<(), Reply> {
    match key {
        Some(KNOWN_KEY) => Ok(()),
        _ => Err((StatusCode::UNAUTHORIZED, Json(json!({ "msg": "invalid key" })))),
    }
}

fn msg(status: StatusCode, text: &str) -> Reply {
    (status, Json(json!({ "msg": text })))
}

async fn get_place(State(db): State<Db>, Query(query): Query<PlaceQuery>) -> Reply {
    if let Err(reply) = check_key(query.key.as_deref()) {
        return reply;
    }
    let places = db.read().await;
    match query.place_id.as_deref().and_then(|id| places.get(id)) {
        Some(place) => (StatusCode::OK, Json(json!(place))),
        None => msg(StatusCode::NOT_FOUND, NOT_FOUND_GET_MSG),
    }
}

async fn add_place(
    State(db): State<Db>,
    Query(query): Query<PlaceQuery>,
    Json(input): Json<NewPlace>,
) -> Reply {
    if let Err(reply) = check_key(query.key.as_deref()) {
        return reply;
    }
    let place_id = Uuid::new_v4().simple().to_string();
    let reference = Uuid::new_v4().simple().to_string();
    let place = Place {
        location: Location {
            latitude: input.location.lat.to_string(),
            longitude: input.location.lng.to_string(),
        },
        accuracy: input.accuracy.to_string(),
        name: input.name,
        phone_number: input.phone_number,
        address: input.address,
        types: input.types.join(","),
        website: input.website,
        language: input.language,
    };
    db.write().await.insert(place_id.clone(), place);
    (
        StatusCode::OK,
        Json(json!({
            "status": "OK",
            "place_id": place_id,
            "scope": "APP",
            "reference": reference,
            "id": reference,
        })),
    )
}

async fn update_place(State(db): State<Db>, Json(input): Json<UpdatePlace>) -> Reply {
    if let Err(reply) = check_key(Some(&input.key)) {
        return reply;
    }
    let mut places = db.write().await;
    match places.get_mut(&input.place_id) {
        Some(place) => {
            place.address = input.address;
            msg(StatusCode::OK, UPDATED_MSG)
        }
        None => msg(StatusCode::NOT_FOUND, NOT_FOUND_UPDATE_MSG),
    }
}

async fn delete_place(State(db): State<Db>, Query(query): Query<PlaceQuery>) -> Reply {
    if let Err(reply) = check_key(query.key.as_deref()) {
        return reply;
    }
    let removed = match query.place_id.as_deref() {
        Some(id) => db.write().await.remove(id),
        None => None,
    };
    match removed {
        Some(_) => (StatusCode::OK, Json(json!({ "status": "OK" }))),
        None => msg(StatusCode::NOT_FOUND, "Delete operation failed, looks like the data doesn't exists"),
    }
}

fn catalog() -> Vec<Product> {
    [
        (1, "Backpack", 109.95, "men's clothing"),
        (2, "Slim Fit T-Shirt", 22.3, "men's clothing"),
        (3, "Cotton Jacket", 55.99, "men's clothing"),
        (4, "Silver Dragon Bracelet", 695.0, "jewelery"),
        (5, "External Hard Drive", 64.0, "electronics"),
    ]
    .into_iter()
    .map(|(id, title, price, category)| Product {
        id,
        title: title.to_string(),
        price,
        category: category.to_string(),
    })
    .collect()
}

async fn list_products(Query(query): Query<ProductQuery>) -> Json<Vec<Product>> {
    let products = catalog();
    let limit = query.limit.unwrap_or(products.len());
    let skip = query.page.unwrap_or(1).saturating_sub(1).saturating_mul(limit);
    Json(products.into_iter().skip(skip).take(limit).collect())
}

async fn echo_json(Json(body): Json<Value>) -> Json<Value> {
    Json(body)
}

async fn echo_form(Form(pairs): Form<BTreeMap<String, String>>) -> Json<BTreeMap<String, String>> {
    Json(pairs)
}

async fn echo_headers(headers: HeaderMap) -> Json<BTreeMap<String, String>> {
    let echoed = headers
        .iter()
        .filter_map(|(name, value)| Some((name.to_string(), value.to_str().ok()?.to_string())))
        .collect();
    Json(echoed)
}

async fn plain() -> &'static str {
    "this is not json"
}
