use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Place, Product, KNOWN_KEY, KNOWN_PLACE_ID};
use serde_json::Value;
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

const NEW_PLACE: &str = r#"{"location":{"lat":20.75,"lng":-103.4},"accuracy":2,"name":"Nice Restaurant",
    "phone_number":"(52) 55 3312 3456","address":"Valdepenas","types":["coffee","bar"],
    "website":"https://nicerestaurant.com","language":"United States-EN"}"#;

// --- get ---

#[tokio::test]
async fn get_known_place() {
    let resp = app()
        .oneshot(get(&format!(
            "/maps/api/place/get/json?key={KNOWN_KEY}&place_id={KNOWN_PLACE_ID}"
        )))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let place: Place = body_json(resp).await;
    assert_eq!(place.name, "Frontline house");
}

#[tokio::test]
async fn get_unknown_place_returns_404_message() {
    let resp = app()
        .oneshot(get(&format!("/maps/api/place/get/json?key={KNOWN_KEY}&place_id=nope")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = body_json(resp).await;
    assert_eq!(body["msg"], mock_server::NOT_FOUND_GET_MSG);
}

#[tokio::test]
async fn wrong_key_returns_401() {
    let resp = app()
        .oneshot(get(&format!(
            "/maps/api/place/get/json?key=bad&place_id={KNOWN_PLACE_ID}"
        )))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// --- add ---

#[tokio::test]
async fn add_place_returns_generated_id() {
    let resp = app()
        .oneshot(json_request("POST", &format!("/maps/api/place/add/json?key={KNOWN_KEY}"), NEW_PLACE))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body["status"], "OK");
    assert_eq!(body["scope"], "APP");
    assert_eq!(body["place_id"].as_str().unwrap().len(), 32);
}

#[tokio::test]
async fn add_place_malformed_json_returns_422() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            &format!("/maps/api/place/add/json?key={KNOWN_KEY}"),
            r#"{"name":1}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// --- update ---

#[tokio::test]
async fn update_unknown_place_returns_404() {
    let body = format!(r#"{{"place_id":"nope","address":"x","key":"{KNOWN_KEY}"}}"#);
    let resp = app()
        .oneshot(json_request("PUT", "/maps/api/place/update/json", &body))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = body_json(resp).await;
    assert_eq!(body["msg"], mock_server::NOT_FOUND_UPDATE_MSG);
}

// --- products and echo ---

#[tokio::test]
async fn products_are_paged() {
    let resp = app().oneshot(get("/products?limit=2&page=2")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let products: Vec<Product> = body_json(resp).await;
    let ids: Vec<u32> = products.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![3, 4]);
}

#[tokio::test]
async fn huge_page_is_empty_not_an_overflow() {
    let resp = app()
        .oneshot(get(&format!("/products?limit={}&page={}", usize::MAX, usize::MAX)))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let products: Vec<Product> = body_json(resp).await;
    assert!(products.is_empty());
}

#[tokio::test]
async fn echo_form_returns_pairs_as_json() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/echo/form")
                .header(http::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body("a=1&b=two+words".to_string())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body, serde_json::json!({"a": "1", "b": "two words"}));
}

#[tokio::test]
async fn plain_is_not_json() {
    let resp = app().oneshot(get("/plain")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_bytes(resp).await;
    assert!(serde_json::from_slice::<Value>(&body).is_err());
}

// --- full lifecycle ---

#[tokio::test]
async fn place_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // add
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", &format!("/maps/api/place/add/json?key={KNOWN_KEY}"), NEW_PLACE))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let created: Value = body_json(resp).await;
    let id = created["place_id"].as_str().unwrap().to_string();

    // get: coordinates come back as strings, types joined
    let get_uri = format!("/maps/api/place/get/json?key={KNOWN_KEY}&place_id={id}");
    let resp = ServiceExt::ready(&mut app).await.unwrap().call(get(&get_uri)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let place: Place = body_json(resp).await;
    assert_eq!(place.location.latitude, "20.75");
    assert_eq!(place.accuracy, "2");
    assert_eq!(place.types, "coffee,bar");

    // update
    let body = format!(r#"{{"place_id":"{id}","address":"Moved","key":"{KNOWN_KEY}"}}"#);
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("PUT", "/maps/api/place/update/json", &body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let reply: Value = body_json(resp).await;
    assert_eq!(reply["msg"], mock_server::UPDATED_MSG);

    let resp = ServiceExt::ready(&mut app).await.unwrap().call(get(&get_uri)).await.unwrap();
    let place: Place = body_json(resp).await;
    assert_eq!(place.address, "Moved");

    // delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(
            Request::builder()
                .method("DELETE")
                .uri(format!("/maps/api/place/delete/json?key={KNOWN_KEY}&place_id={id}"))
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // get after delete is a 404
    let resp = ServiceExt::ready(&mut app).await.unwrap().call(get(&get_uri)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
