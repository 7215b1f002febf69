use serde_json::json;

use crate::helpers::{listing, TestApp};

#[actix_web::test]
async fn a_booking_notifies_both_the_manager_and_the_customer() {
    let app = TestApp::spawn_app().await;
    let (_, admin_token) = app.register_and_login("ADMIN").await;
    let (_, manager_token) = app.register_and_login("RESTAURANT_MANAGER").await;
    let (_, customer_token) = app.register_and_login("CUSTOMER").await;

    let restaurant_id = app.create_restaurant(
        &manager_token,
        listing("Thali Palace", "Springfield", "62704", json!({"2": 1}))
    ).await;
    app.approve_restaurant(&admin_token, restaurant_id).await;

    let response = app.book_table(&customer_token, restaurant_id, "2030-06-14", "18:00", 2).await;
    assert_eq!(response.status().as_u16(), 200);

    let manager_inbox: serde_json::Value = app.api_client
        .get(format!("{}/notifications", app.get_app_url()))
        .bearer_auth(&manager_token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(manager_inbox
        .as_array()
        .unwrap()
        .iter()
        .any(|n| n["message"].as_str().unwrap().contains("New booking at Thali Palace")));

    let customer_inbox: serde_json::Value = app.api_client
        .get(format!("{}/notifications", app.get_app_url()))
        .bearer_auth(&customer_token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(customer_inbox
        .as_array()
        .unwrap()
        .iter()
        .any(|n| n["message"].as_str().unwrap().contains("confirmed at Thali Palace")));
}

#[actix_web::test]
async fn marking_a_notification_read_returns_the_remaining_unread_ones() {
    let app = TestApp::spawn_app().await;
    let (_, admin_token) = app.register_and_login("ADMIN").await;
    let (_, manager_token) = app.register_and_login("RESTAURANT_MANAGER").await;

    // two submitted listings -> two unread notifications for the admin
    for name in ["Thali Palace", "Masala Corner"] {
        app.create_restaurant(
            &manager_token,
            listing(name, "Springfield", "62704", json!({"2": 1}))
        ).await;
    }

    let inbox: serde_json::Value = app.api_client
        .get(format!("{}/notifications", app.get_app_url()))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let inbox = inbox.as_array().unwrap();
    assert_eq!(inbox.len(), 2);

    let first_id = inbox[0]["notification_id"].as_str().unwrap();
    let remaining: serde_json::Value = app.api_client
        .patch(format!("{}/notifications/{}/read", app.get_app_url(), first_id))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(remaining.as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn users_cannot_touch_each_others_notifications() {
    let app = TestApp::spawn_app().await;
    let (_, admin_token) = app.register_and_login("ADMIN").await;
    let (_, manager_token) = app.register_and_login("RESTAURANT_MANAGER").await;
    let (_, customer_token) = app.register_and_login("CUSTOMER").await;

    app.create_restaurant(
        &manager_token,
        listing("Thali Palace", "Springfield", "62704", json!({"2": 1}))
    ).await;

    let inbox: serde_json::Value = app.api_client
        .get(format!("{}/notifications", app.get_app_url()))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let notification_id = inbox[0]["notification_id"].as_str().unwrap().to_string();

    let response = app.api_client
        .patch(format!("{}/notifications/{}/read", app.get_app_url(), notification_id))
        .bearer_auth(&customer_token)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 404);
}
