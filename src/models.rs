use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use diesel::prelude::{AsChangeset, Insertable, Queryable};
use uuid::Uuid;

use crate::schema::bookings;
use crate::schema::notifications;
use crate::schema::restaurants;
use crate::schema::reviews;
use crate::schema::users;

#[derive(Queryable, Insertable, Clone)]
#[diesel(table_name = users)]
pub struct User{
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>
}

// Hours and tables hold JSON text; domain::Hours and domain::TableInventory
// own the parsing
#[derive(Queryable, Insertable, Clone, Debug)]
#[diesel(table_name = restaurants)]
pub struct Restaurant{
    pub restaurant_id: Uuid,
    pub manager_id: Uuid,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub phone: String,
    pub description: String,
    pub cuisine: String,
    pub cost_rating: String,
    pub hours: String,
    pub tables: String,
    pub photo_url: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>
}

// Columns a manager may edit in place; identity, approval and ownership
// stay fixed. None on the nullable columns leaves the stored value alone.
#[derive(AsChangeset, Clone)]
#[diesel(table_name = restaurants)]
pub struct RestaurantUpdate{
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub phone: String,
    pub description: String,
    pub cuisine: String,
    pub cost_rating: String,
    pub hours: String,
    pub tables: String,
    pub photo_url: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>
}

#[derive(Queryable, Insertable, Clone)]
#[diesel(table_name = bookings)]
pub struct Booking{
    pub booking_id: Uuid,
    pub user_id: Uuid,
    pub restaurant_id: Uuid,
    pub table_id: i32,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub party_size: i32,
    pub status: String,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>
}

#[derive(Queryable, Insertable, Clone)]
#[diesel(table_name = reviews)]
pub struct Review{
    pub review_id: Uuid,
    pub restaurant_id: Uuid,
    pub user_id: Uuid,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>
}

#[derive(Queryable, Insertable, Clone, Debug)]
#[diesel(table_name = notifications)]
pub struct Notification{
    pub notification_id: Uuid,
    pub user_id: Uuid,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>
}
