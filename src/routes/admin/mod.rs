pub mod restaurants;
pub mod stats;
pub mod top_restaurants;

pub use restaurants::{approve_restaurant, get_all_restaurants, get_pending_restaurants};
pub use stats::get_admin_stats;
pub use top_restaurants::get_top_restaurants;
