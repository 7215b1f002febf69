use serde::Serialize;
use uuid::Uuid;

use crate::models::Review;

pub mod delete;
pub mod get;
pub mod post;

pub use delete::delete_review;
pub use get::get_restaurant_reviews;
pub use post::post_review;

// Struct to represent a review in responses, with the author's email joined
// in the way the review cards render it
#[derive(Serialize, Debug)]
pub struct ReviewResponse{
    pub review_id: Uuid,
    pub restaurant_id: Uuid,
    pub user_id: Uuid,
    pub user_email: String,
    pub rating: i32,
    pub comment: String,
    pub created_at: String
}

impl ReviewResponse {
    pub fn from_review(review: Review, user_email: String) -> Self {
        ReviewResponse{
            review_id: review.review_id,
            restaurant_id: review.restaurant_id,
            user_id: review.user_id,
            user_email,
            rating: review.rating,
            comment: review.comment,
            created_at: review.created_at.to_rfc3339()
        }
    }
}
