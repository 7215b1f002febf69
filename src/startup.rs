use std::net::TcpListener;

use actix_web::{dev::Server, web, App, HttpServer};
use diesel::{r2d2::ConnectionManager, PgConnection};
use r2d2::Pool;
use tracing_actix_web::TracingLogger;

use crate::auth::jwt::Tokenizer;
use crate::configuration::Settings;
use crate::geocoding_client::GeocodingClient;
use crate::routes::{
    admin::{approve_restaurant, get_admin_stats, get_all_restaurants, get_pending_restaurants, get_top_restaurants},
    authentication::{login, register},
    booking::{cancel_booking, confirm_booking, get_my_bookings, get_restaurant_bookings, post_booking},
    health_check,
    notification::{get_notifications, mark_notification_read},
    restaurant::{delete_restaurant, get_manager_restaurants, get_restaurant_details, get_table_availability, post_restaurant, search_restaurants, update_restaurant},
    review::{delete_review, get_restaurant_reviews, post_review},
};
use crate::utils::DbPool;

pub struct Application{
    pub host: String,
    pub port: u16,
    pub server: Server
}

impl Application {
    pub async fn new(settings: Settings) -> Result<Application, anyhow::Error>{
        let manager = ConnectionManager::<PgConnection>::new(
            settings.database.get_database_table_url()
        );
        let pool: DbPool = Pool::builder()
            .build(manager)?;

        let tokenizer = Tokenizer::new(&settings.jwt);
        let geocoder = GeocodingClient::new(
            settings.geocoding.api_uri,
            settings.geocoding.access_token,
            settings.geocoding.timeout_seconds
        );
        let booking_settings = settings.booking.clone();

        let listener = TcpListener::bind((
            settings.application.host.as_str(),
            settings.application.port
        ))?;
        let port = listener.local_addr()?.port();
        let host = settings.application.host;

        let pool_data = web::Data::new(pool);
        let tokenizer_data = web::Data::new(tokenizer);
        let geocoder_data = web::Data::new(geocoder);
        let booking_data = web::Data::new(booking_settings);

        let server = HttpServer::new(move || {
            App::new()
                .wrap(TracingLogger::default())
                .app_data(pool_data.clone())
                .app_data(tokenizer_data.clone())
                .app_data(geocoder_data.clone())
                .app_data(booking_data.clone())
                .route("/health", web::get().to(health_check))
                .route("/register", web::post().to(register))
                .route("/login", web::post().to(login))
                .route("/restaurants/search", web::get().to(search_restaurants))
                .route("/restaurants", web::post().to(post_restaurant))
                .route("/restaurants/{id}", web::get().to(get_restaurant_details))
                .route("/restaurants/{id}", web::patch().to(update_restaurant))
                .route("/restaurants/{id}", web::delete().to(delete_restaurant))
                .route("/restaurants/{id}/availability", web::get().to(get_table_availability))
                .route("/restaurants/{id}/reviews", web::get().to(get_restaurant_reviews))
                .route("/restaurants/{id}/bookings", web::get().to(get_restaurant_bookings))
                .route("/manager/restaurants", web::get().to(get_manager_restaurants))
                .route("/bookings", web::post().to(post_booking))
                .route("/bookings/my", web::get().to(get_my_bookings))
                .route("/bookings/{id}/confirm", web::patch().to(confirm_booking))
                .route("/bookings/{id}", web::delete().to(cancel_booking))
                .route("/reviews", web::post().to(post_review))
                .route("/reviews/{id}", web::delete().to(delete_review))
                .route("/notifications", web::get().to(get_notifications))
                .route("/notifications/{id}/read", web::patch().to(mark_notification_read))
                .route("/admin/restaurants", web::get().to(get_all_restaurants))
                .route("/admin/restaurants/pending", web::get().to(get_pending_restaurants))
                .route("/admin/restaurants/{id}/approve", web::patch().to(approve_restaurant))
                .route("/admin/stats", web::get().to(get_admin_stats))
                .route("/admin/top-restaurants", web::get().to(get_top_restaurants))
        })
        .listen(listener)?
        .run();

        Ok(Application{host, port, server})
    }
}
