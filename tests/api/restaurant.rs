use diesel::{ExpressionMethods, QueryDsl, RunQueryDsl};
use serde_json::json;
use tablebook::models::Restaurant;
use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, ResponseTemplate};

use crate::helpers::{listing, TestApp};

#[actix_web::test]
async fn manager_creates_an_unapproved_listing_and_an_admin_is_notified() {
    let app = TestApp::spawn_app().await;
    let (_, admin_token) = app.register_and_login("ADMIN").await;
    let (manager_id, manager_token) = app.register_and_login("RESTAURANT_MANAGER").await;

    let restaurant_id = app.create_restaurant(
        &manager_token,
        listing("Thali Palace", "Springfield", "62704", json!({"2": 1, "4": 1}))
    ).await;

    let stored = {
        use tablebook::schema::restaurants;

        let mut conn = app.pool.get().unwrap();
        restaurants::table
            .filter(restaurants::restaurant_id.eq(restaurant_id))
            .first::<Restaurant>(&mut conn)
            .unwrap()
    };
    assert_eq!(stored.manager_id, manager_id);
    assert!(!stored.is_approved);

    let notifications: serde_json::Value = app.api_client
        .get(format!("{}/notifications", app.get_app_url()))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(notifications.as_array().unwrap().len(), 1);
    assert!(notifications[0]["message"]
        .as_str()
        .unwrap()
        .contains("Thali Palace"));
}

#[actix_web::test]
async fn customers_and_admins_cannot_create_listings() {
    let app = TestApp::spawn_app().await;
    let (_, customer_token) = app.register_and_login("CUSTOMER").await;
    let (_, admin_token) = app.register_and_login("ADMIN").await;

    let body = listing("Thali Palace", "Springfield", "62704", json!({"2": 1}));

    let response = app.api_client
        .post(format!("{}/restaurants", app.get_app_url()))
        .bearer_auth(&customer_token)
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);

    let response = app.api_client
        .post(format!("{}/restaurants", app.get_app_url()))
        .bearer_auth(&admin_token)
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 403);
}

#[actix_web::test]
async fn malformed_listings_are_rejected() {
    let app = TestApp::spawn_app().await;
    let (_, manager_token) = app.register_and_login("RESTAURANT_MANAGER").await;

    let mut bad_zip = listing("Thali Palace", "Springfield", "62704", json!({"2": 1}));
    bad_zip["zip_code"] = json!("627");

    let response = app.api_client
        .post(format!("{}/restaurants", app.get_app_url()))
        .bearer_auth(&manager_token)
        .json(&bad_zip)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);

    let mut bad_tables = listing("Thali Palace", "Springfield", "62704", json!({"2": 0}));
    bad_tables["tables"] = json!({"2": 0});

    let response = app.api_client
        .post(format!("{}/restaurants", app.get_app_url()))
        .bearer_auth(&manager_token)
        .json(&bad_tables)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
}

#[actix_web::test]
async fn admin_approval_notifies_the_manager_and_clears_the_pending_list() {
    let app = TestApp::spawn_app().await;
    let (_, admin_token) = app.register_and_login("ADMIN").await;
    let (_, manager_token) = app.register_and_login("RESTAURANT_MANAGER").await;

    let restaurant_id = app.create_restaurant(
        &manager_token,
        listing("Thali Palace", "Springfield", "62704", json!({"2": 1}))
    ).await;

    let pending: serde_json::Value = app.api_client
        .get(format!("{}/admin/restaurants/pending", app.get_app_url()))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(pending.as_array().unwrap().len(), 1);

    app.approve_restaurant(&admin_token, restaurant_id).await;

    let pending: serde_json::Value = app.api_client
        .get(format!("{}/admin/restaurants/pending", app.get_app_url()))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(pending.as_array().unwrap().len(), 0);

    let notifications: serde_json::Value = app.api_client
        .get(format!("{}/notifications", app.get_app_url()))
        .bearer_auth(&manager_token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(notifications
        .as_array()
        .unwrap()
        .iter()
        .any(|n| n["message"].as_str().unwrap().contains("approved")));
}

#[actix_web::test]
async fn restaurant_details_expose_listing_and_read_time_aggregates() {
    let app = TestApp::spawn_app().await;
    let (_, manager_token) = app.register_and_login("RESTAURANT_MANAGER").await;

    let restaurant_id = app.create_restaurant(
        &manager_token,
        listing("Thali Palace", "Springfield", "62704", json!({"2": 1, "4": 2}))
    ).await;

    let details: serde_json::Value = app.api_client
        .get(format!("{}/restaurants/{}", app.get_app_url(), restaurant_id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(details["name"], "Thali Palace");
    assert_eq!(details["tables"]["4"], 2);
    assert_eq!(details["total_reviews"], 0);
    assert!(details["average_rating"].is_null());
    assert_eq!(details["bookings_today"], 0);
}

#[actix_web::test]
async fn getting_an_unknown_restaurant_returns_404() {
    let app = TestApp::spawn_app().await;

    let response = app.api_client
        .get(format!("{}/restaurants/{}", app.get_app_url(), uuid::Uuid::new_v4()))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 404);
}

#[actix_web::test]
async fn only_the_owning_manager_or_an_admin_may_update_a_listing() {
    let app = TestApp::spawn_app().await;
    let (_, owner_token) = app.register_and_login("RESTAURANT_MANAGER").await;
    let (_, other_token) = app.register_and_login("RESTAURANT_MANAGER").await;

    let restaurant_id = app.create_restaurant(
        &owner_token,
        listing("Thali Palace", "Springfield", "62704", json!({"2": 1}))
    ).await;

    let mut update = listing("Thali Palace", "Springfield", "62704", json!({"2": 1}));
    update["cuisine"] = json!("South Indian");

    let response = app.api_client
        .patch(format!("{}/restaurants/{}", app.get_app_url(), restaurant_id))
        .bearer_auth(&other_token)
        .json(&update)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 403);

    let response = app.api_client
        .patch(format!("{}/restaurants/{}", app.get_app_url(), restaurant_id))
        .bearer_auth(&owner_token)
        .json(&update)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["cuisine"], "South Indian");
}

#[actix_web::test]
async fn the_owning_manager_can_delete_their_listing() {
    let app = TestApp::spawn_app().await;
    let (_, manager_token) = app.register_and_login("RESTAURANT_MANAGER").await;
    let (_, customer_token) = app.register_and_login("CUSTOMER").await;

    let restaurant_id = app.create_restaurant(
        &manager_token,
        listing("Thali Palace", "Springfield", "62704", json!({"2": 1}))
    ).await;

    let response = app.api_client
        .delete(format!("{}/restaurants/{}", app.get_app_url(), restaurant_id))
        .bearer_auth(&customer_token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 403);

    let response = app.api_client
        .delete(format!("{}/restaurants/{}", app.get_app_url(), restaurant_id))
        .bearer_auth(&manager_token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let response = app.api_client
        .get(format!("{}/restaurants/{}", app.get_app_url(), restaurant_id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);
}

#[actix_web::test]
async fn listings_without_coordinates_are_geocoded() {
    let app = TestApp::spawn_app().await;
    let (_, manager_token) = app.register_and_login("RESTAURANT_MANAGER").await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/geocoding/v5/mapbox\.places/.*\.json$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "features": [{ "center": [-89.65, 39.78] }]
        })))
        .expect(1)
        .mount(&app.geocoding_api)
        .await;

    let mut body = listing("Thali Palace", "Springfield", "62704", json!({"2": 1}));
    body["latitude"] = json!(null);
    body["longitude"] = json!(null);

    let restaurant_id = app.create_restaurant(&manager_token, body).await;

    let stored = {
        use tablebook::schema::restaurants;

        let mut conn = app.pool.get().unwrap();
        restaurants::table
            .filter(restaurants::restaurant_id.eq(restaurant_id))
            .first::<Restaurant>(&mut conn)
            .unwrap()
    };
    assert_eq!(stored.latitude, Some(39.78));
    assert_eq!(stored.longitude, Some(-89.65));
}

#[actix_web::test]
async fn a_failed_geocoding_call_does_not_block_the_listing() {
    let app = TestApp::spawn_app().await;
    let (_, manager_token) = app.register_and_login("RESTAURANT_MANAGER").await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&app.geocoding_api)
        .await;

    let mut body = listing("Thali Palace", "Springfield", "62704", json!({"2": 1}));
    body["latitude"] = json!(null);
    body["longitude"] = json!(null);

    let restaurant_id = app.create_restaurant(&manager_token, body).await;

    let stored = {
        use tablebook::schema::restaurants;

        let mut conn = app.pool.get().unwrap();
        restaurants::table
            .filter(restaurants::restaurant_id.eq(restaurant_id))
            .first::<Restaurant>(&mut conn)
            .unwrap()
    };
    assert!(stored.latitude.is_none());
    assert!(stored.longitude.is_none());
}

#[actix_web::test]
async fn managers_see_their_own_listings() {
    let app = TestApp::spawn_app().await;
    let (_, manager_token) = app.register_and_login("RESTAURANT_MANAGER").await;
    let (_, other_token) = app.register_and_login("RESTAURANT_MANAGER").await;

    app.create_restaurant(
        &manager_token,
        listing("Thali Palace", "Springfield", "62704", json!({"2": 1}))
    ).await;
    app.create_restaurant(
        &other_token,
        listing("Shelby Curry House", "Shelbyville", "62565", json!({"2": 1}))
    ).await;

    let mine: serde_json::Value = app.api_client
        .get(format!("{}/manager/restaurants", app.get_app_url()))
        .bearer_auth(&manager_token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(mine.as_array().unwrap().len(), 1);
    assert_eq!(mine[0]["name"], "Thali Palace");
}
