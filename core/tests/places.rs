//! Place and product services against the live mock server.

use api_harness::assertions::{assert_equals, assert_not_equals};
use api_harness::types::{NewPlace, UpdatePlace};
use api_harness::{ApiError, ClientConfig, PlaceLookup, PlacesApi, Services};
use mock_server::{KNOWN_KEY, KNOWN_PLACE_ID};

async fn spawn_server() -> String {
    api_harness::logging::init();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(mock_server::run(listener));
    format!("http://{addr}")
}

fn expect_found(lookup: PlaceLookup) -> api_harness::types::PlaceDetails {
    match lookup {
        PlaceLookup::Found(details) => details,
        other => panic!("expected a place, got {other:?}"),
    }
}

#[tokio::test]
async fn get_known_and_unknown_place() {
    let base = spawn_server().await;
    let mut services = Services::new(&base, ClientConfig::default());

    let details = expect_found(services.places.get_location_info(KNOWN_KEY, KNOWN_PLACE_ID).await.unwrap());
    assert_eq!(details.name, "Frontline house");
    assert_eq!(details.location.latitude, "-38.383494");

    let lookup = services
        .places
        .get_location_info(KNOWN_KEY, "2151251251252151")
        .await
        .unwrap();
    assert!(matches!(lookup, PlaceLookup::NotFound(ref m) if m.msg == api_harness::services::places::NOT_FOUND_MSG));

    services.close_connections();
}

#[tokio::test]
async fn unhandled_status_fails_the_lookup() {
    let base = spawn_server().await;
    let mut places = PlacesApi::new(&base, ClientConfig::default());

    let err = places.get_location_info("wrong-key", KNOWN_PLACE_ID).await.unwrap_err();
    match err {
        ApiError::Assertion(failure) => {
            assert_eq!(failure.check, "assert_fail");
            assert_eq!(failure.message, "Unhandled status code: 401");
        }
        other => panic!("expected assertion failure, got {other:?}"),
    }
}

#[tokio::test]
async fn failed_update_is_an_assertion_failure() {
    let base = spawn_server().await;
    let mut places = PlacesApi::new(&base, ClientConfig::default());

    let body = UpdatePlace {
        place_id: "does-not-exist".to_string(),
        address: "Nowhere".to_string(),
        key: KNOWN_KEY.to_string(),
    };
    let err = places.put_update_existing_location(&body).await.unwrap_err();
    assert!(matches!(err, ApiError::Assertion(ref f) if f.check == "assert_equals"));
}

#[tokio::test]
async fn post_get_put_get_flow() -> Result<(), ApiError> {
    let base = spawn_server().await;
    let mut services = Services::new(&base, ClientConfig::default());

    // Step 1: create a place.
    let new_place = NewPlace::sample("e2e");
    let created = services.places.post_new_location(KNOWN_KEY, &new_place).await?;
    assert_equals("OK", created.status.as_str(), "Status when VALID post")?;
    let place_id = created.place_id;
    assert_eq!(place_id.len(), 32);

    // Step 2: it reads back as sent.
    let details = expect_found(services.places.get_location_info(KNOWN_KEY, &place_id).await?);
    assert_equals(new_place.address.as_str(), details.address.as_str(), "Address should match POST")?;
    assert_equals(new_place.name.as_str(), details.name.as_str(), "Name should match POST")?;
    assert_equals("coffee,restaurant,bar", details.types.as_str(), "Types are joined")?;

    // Step 3: change the address.
    let new_address = "Put New Address e2e";
    services
        .places
        .put_update_existing_location(&UpdatePlace {
            place_id: place_id.clone(),
            address: new_address.to_string(),
            key: KNOWN_KEY.to_string(),
        })
        .await?;

    // Step 4: only the address changed.
    let after = expect_found(services.places.get_location_info(KNOWN_KEY, &place_id).await?);
    assert_equals(new_place.name.as_str(), after.name.as_str(), "Name should be unchanged")?;
    assert_equals(new_address, after.address.as_str(), "Address should match PUT")?;
    assert_not_equals(new_place.address.as_str(), after.address.as_str(), "Address should differ from POST")?;

    // Step 5: delete, then the place is gone.
    let deleted = services.places.delete_location(KNOWN_KEY, &place_id).await?;
    assert_equals("OK", deleted.status.as_str(), "Delete status")?;
    let gone = services.places.get_location_info(KNOWN_KEY, &place_id).await?;
    assert!(matches!(gone, PlaceLookup::NotFound(_)));

    services.close_connections();
    Ok(())
}

#[tokio::test]
async fn products_with_query_params_and_headers() {
    let base = spawn_server().await;
    let mut services = Services::new(&base, ClientConfig::default());

    let products = services
        .products
        .get_products(
            &[("limit", "2"), ("page", "1")],
            &[("User-Agent", "PostmanRuntime/7.43.3"), ("Connection", "keep-alive")],
        )
        .await
        .unwrap();
    assert_eq!(products.len(), 2);

    let page_two = services
        .products
        .get_products(&[("limit", "2"), ("page", "2")], &[])
        .await
        .unwrap();
    let ids: Vec<u32> = page_two.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![3, 4]);

    let all = services.products.get_products(&[], &[]).await.unwrap();
    assert_eq!(all.len(), 5);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn independent_services_run_concurrently() {
    let base = spawn_server().await;

    let tasks: Vec<_> = (0..4)
        .map(|i| {
            let base = base.clone();
            tokio::spawn(async move {
                let mut places = PlacesApi::new(&base, ClientConfig::default());
                let created = places
                    .post_new_location(KNOWN_KEY, &NewPlace::sample(&format!("worker {i}")))
                    .await?;
                let details = expect_found(places.get_location_info(KNOWN_KEY, &created.place_id).await?);
                places.close();
                Ok::<_, ApiError>(details.address)
            })
        })
        .collect();

    for (i, task) in tasks.into_iter().enumerate() {
        let address = task.await.unwrap().unwrap();
        assert_eq!(address, format!("Valdepeñas worker {i}"));
    }
}
