use serde_json::json;

use crate::helpers::{listing, TestApp};

async fn setup_restaurant(app: &TestApp) -> (uuid::Uuid, String) {
    let (_, admin_token) = app.register_and_login("ADMIN").await;
    let (_, manager_token) = app.register_and_login("RESTAURANT_MANAGER").await;

    let restaurant_id = app.create_restaurant(
        &manager_token,
        listing("Thali Palace", "Springfield", "62704", json!({"2": 2}))
    ).await;
    app.approve_restaurant(&admin_token, restaurant_id).await;

    (restaurant_id, manager_token)
}

#[actix_web::test]
async fn a_customer_reviews_once_and_the_duplicate_is_rejected() {
    let app = TestApp::spawn_app().await;
    let (restaurant_id, _) = setup_restaurant(&app).await;
    let (_, customer_token) = app.register_and_login("CUSTOMER").await;

    let body = json!({
        "restaurant_id": restaurant_id,
        "rating": 4,
        "comment": "Great thali, generous portions"
    });

    let response = app.api_client
        .post(format!("{}/reviews", app.get_app_url()))
        .bearer_auth(&customer_token)
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 201);

    // the second submission from the same account is a forbidden action
    let response = app.api_client
        .post(format!("{}/reviews", app.get_app_url()))
        .bearer_auth(&customer_token)
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 403);

    let reviews: serde_json::Value = app.api_client
        .get(format!("{}/restaurants/{}/reviews", app.get_app_url(), restaurant_id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let reviews = reviews.as_array().unwrap();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0]["rating"], 4);
    assert!(reviews[0]["user_email"].as_str().unwrap().contains('@'));
}

#[actix_web::test]
async fn two_reviewers_move_the_read_time_average() {
    let app = TestApp::spawn_app().await;
    let (restaurant_id, _) = setup_restaurant(&app).await;
    let (_, first_token) = app.register_and_login("CUSTOMER").await;
    let (_, second_token) = app.register_and_login("CUSTOMER").await;

    for (token, rating) in [(&first_token, 4), (&second_token, 2)] {
        let response = app.api_client
            .post(format!("{}/reviews", app.get_app_url()))
            .bearer_auth(token)
            .json(&json!({
                "restaurant_id": restaurant_id,
                "rating": rating,
                "comment": "Solid food"
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 201);
    }

    let details: serde_json::Value = app.api_client
        .get(format!("{}/restaurants/{}", app.get_app_url(), restaurant_id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(details["total_reviews"], 2);
    assert_eq!(details["average_rating"], 3.0);
}

#[actix_web::test]
async fn out_of_range_ratings_are_rejected() {
    let app = TestApp::spawn_app().await;
    let (restaurant_id, _) = setup_restaurant(&app).await;
    let (_, customer_token) = app.register_and_login("CUSTOMER").await;

    for rating in [0, 6] {
        let response = app.api_client
            .post(format!("{}/reviews", app.get_app_url()))
            .bearer_auth(&customer_token)
            .json(&json!({
                "restaurant_id": restaurant_id,
                "rating": rating,
                "comment": "Out of range"
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 400);
    }
}

#[actix_web::test]
async fn only_customers_may_review() {
    let app = TestApp::spawn_app().await;
    let (restaurant_id, manager_token) = setup_restaurant(&app).await;

    let response = app.api_client
        .post(format!("{}/reviews", app.get_app_url()))
        .bearer_auth(&manager_token)
        .json(&json!({
            "restaurant_id": restaurant_id,
            "rating": 5,
            "comment": "Reviewing my own place"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 401);
}

#[actix_web::test]
async fn reviewing_an_unknown_restaurant_returns_404() {
    let app = TestApp::spawn_app().await;
    let (_, customer_token) = app.register_and_login("CUSTOMER").await;

    let response = app.api_client
        .post(format!("{}/reviews", app.get_app_url()))
        .bearer_auth(&customer_token)
        .json(&json!({
            "restaurant_id": uuid::Uuid::new_v4(),
            "rating": 3,
            "comment": "Phantom restaurant"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 404);
}

#[actix_web::test]
async fn reviewers_can_delete_only_their_own_review() {
    let app = TestApp::spawn_app().await;
    let (restaurant_id, _) = setup_restaurant(&app).await;
    let (_, author_token) = app.register_and_login("CUSTOMER").await;
    let (_, other_token) = app.register_and_login("CUSTOMER").await;

    let review: serde_json::Value = app.api_client
        .post(format!("{}/reviews", app.get_app_url()))
        .bearer_auth(&author_token)
        .json(&json!({
            "restaurant_id": restaurant_id,
            "rating": 4,
            "comment": "Lovely evening"
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let review_url = format!(
        "{}/reviews/{}",
        app.get_app_url(),
        review["review_id"].as_str().unwrap()
    );

    let response = app.api_client
        .delete(&review_url)
        .bearer_auth(&other_token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 403);

    let response = app.api_client
        .delete(&review_url)
        .bearer_auth(&author_token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let reviews: serde_json::Value = app.api_client
        .get(format!("{}/restaurants/{}/reviews", app.get_app_url(), restaurant_id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(reviews.as_array().unwrap().len(), 0);
}
