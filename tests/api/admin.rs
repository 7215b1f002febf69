use serde_json::json;

use crate::helpers::{listing, TestApp};

#[actix_web::test]
async fn stats_reflect_platform_activity() {
    let app = TestApp::spawn_app().await;
    let (_, admin_token) = app.register_and_login("ADMIN").await;
    let (_, manager_token) = app.register_and_login("RESTAURANT_MANAGER").await;
    let (_, customer_token) = app.register_and_login("CUSTOMER").await;

    let approved = app.create_restaurant(
        &manager_token,
        listing("Thali Palace", "Springfield", "62704", json!({"2": 1}))
    ).await;
    app.create_restaurant(
        &manager_token,
        listing("Masala Corner", "Springfield", "62704", json!({"2": 1}))
    ).await;
    app.approve_restaurant(&admin_token, approved).await;

    let response = app.book_table(&customer_token, approved, "2030-06-14", "18:00", 2).await;
    assert_eq!(response.status().as_u16(), 200);

    let stats: serde_json::Value = app.api_client
        .get(format!("{}/admin/stats", app.get_app_url()))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(stats["total_restaurants"], 2);
    assert_eq!(stats["approved_restaurants"], 1);
    assert_eq!(stats["pending_restaurants"], 1);
    assert_eq!(stats["total_users"], 3);
    assert_eq!(stats["total_bookings"], 1);
    assert_eq!(stats["confirmed_bookings"], 1);
    assert_eq!(stats["pending_bookings"], 0);
}

#[actix_web::test]
async fn top_restaurants_rank_by_booking_count() {
    let app = TestApp::spawn_app().await;
    let (_, admin_token) = app.register_and_login("ADMIN").await;
    let (_, manager_token) = app.register_and_login("RESTAURANT_MANAGER").await;
    let (_, customer_token) = app.register_and_login("CUSTOMER").await;

    let busy = app.create_restaurant(
        &manager_token,
        listing("Thali Palace", "Springfield", "62704", json!({"2": 3}))
    ).await;
    let quiet = app.create_restaurant(
        &manager_token,
        listing("Masala Corner", "Springfield", "62704", json!({"2": 3}))
    ).await;
    app.approve_restaurant(&admin_token, busy).await;
    app.approve_restaurant(&admin_token, quiet).await;

    // bookings far enough apart that every one lands
    app.book_table(&customer_token, busy, "2030-06-14", "12:00", 2).await;
    app.book_table(&customer_token, busy, "2030-06-14", "18:00", 2).await;
    app.book_table(&customer_token, quiet, "2030-06-14", "12:00", 2).await;

    let top: serde_json::Value = app.api_client
        .get(format!("{}/admin/top-restaurants", app.get_app_url()))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let top = top.as_array().unwrap();
    assert_eq!(top.len(), 2);
    assert_eq!(top[0]["restaurant_id"].as_str().unwrap(), busy.to_string());
    assert_eq!(top[0]["booking_count"], 2);
    assert_eq!(top[1]["booking_count"], 1);
}

#[actix_web::test]
async fn admin_endpoints_reject_other_roles() {
    let app = TestApp::spawn_app().await;
    let (_, manager_token) = app.register_and_login("RESTAURANT_MANAGER").await;

    for url in [
        format!("{}/admin/stats", app.get_app_url()),
        format!("{}/admin/restaurants", app.get_app_url()),
        format!("{}/admin/restaurants/pending", app.get_app_url()),
        format!("{}/admin/top-restaurants", app.get_app_url()),
    ] {
        let response = app.api_client
            .get(url)
            .bearer_auth(&manager_token)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 401);
    }
}

#[actix_web::test]
async fn admins_see_every_listing() {
    let app = TestApp::spawn_app().await;
    let (_, admin_token) = app.register_and_login("ADMIN").await;
    let (_, manager_token) = app.register_and_login("RESTAURANT_MANAGER").await;

    let approved = app.create_restaurant(
        &manager_token,
        listing("Thali Palace", "Springfield", "62704", json!({"2": 1}))
    ).await;
    app.create_restaurant(
        &manager_token,
        listing("Masala Corner", "Springfield", "62704", json!({"2": 1}))
    ).await;
    app.approve_restaurant(&admin_token, approved).await;

    let all: serde_json::Value = app.api_client
        .get(format!("{}/admin/restaurants", app.get_app_url()))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(all.as_array().unwrap().len(), 2);
}
