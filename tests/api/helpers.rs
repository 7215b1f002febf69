use std::error::Error;

use diesel::{pg::Pg, r2d2::ConnectionManager, Connection, PgConnection, RunQueryDsl};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use once_cell::sync::Lazy;
use r2d2::Pool;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde_json::json;
use tablebook::{
    configuration::{DatabaseSettings, Settings},
    startup::Application,
    telemetry::{get_subscriber, init_subscriber},
    utils::DbPool,
};
use uuid::Uuid;
use wiremock::MockServer;

static LOGGER_INSTANCE: Lazy<()> = Lazy::new(|| {
    let log_level = "info".to_string();
    let name = "tablebook-test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(name, log_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(name, log_level, std::io::sink);
        init_subscriber(subscriber);
    }

    ()
});

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

fn run_migrations(connection: &mut impl MigrationHarness<Pg>)
    -> Result<(), Box<dyn Error + Send + Sync + 'static>>
{
    connection.run_pending_migrations(MIGRATIONS)?;
    Ok(())
}

pub struct TestApp{
    pub host: String,
    pub port: u16,
    pub pool: DbPool,
    pub geocoding_api: MockServer,
    pub api_client: reqwest::Client
}

impl TestApp {
    fn create_db(settings: &DatabaseSettings) -> DbPool{
        let mut connection = PgConnection::establish(&settings.get_database_url())
                                .expect("Failed to connect to postgres database");

        let query = format!(r#"CREATE DATABASE "{}";"#, settings.name);
        diesel::sql_query(query)
            .execute(&mut connection)
            .expect("Failed to create test database");

        let pool = Pool::new(ConnectionManager::<PgConnection>::new(settings.get_database_table_url()))
            .expect("Failed to build connection pool to test database");

        let mut conn = pool.get().expect("Failed to get connection to test database");
        run_migrations(&mut conn).expect("Failed to run migrations");

        pool
    }

    pub fn get_app_url(&self) -> String{
        format!("http://{}:{}", self.host, self.port)
    }

    pub async fn spawn_app() -> TestApp{
        TestApp::spawn_app_inner(true).await
    }

    // Same app, but bookings land as PENDING and need manager confirmation
    pub async fn spawn_app_with_pending_bookings() -> TestApp{
        TestApp::spawn_app_inner(false).await
    }

    async fn spawn_app_inner(auto_confirm: bool) -> TestApp{
        Lazy::force(&LOGGER_INSTANCE);

        let geocoding_api = MockServer::start().await;

        let mut settings = Settings::get();
        settings.application.port = 0;
        settings.database.name = Uuid::new_v4().to_string();
        settings.geocoding.api_uri = geocoding_api.uri();
        settings.booking.auto_confirm = auto_confirm;

        let pool = TestApp::create_db(&settings.database);

        let application = Application::new(settings)
                            .await
                            .expect("Failed to build application");

        tokio::task::spawn(application.server);

        let api_client = reqwest::Client::builder()
                            .build()
                            .unwrap();

        TestApp{
            host: application.host,
            port: application.port,
            pool,
            geocoding_api,
            api_client
        }
    }

    pub async fn register_user(&self, email: &str, role: &str) -> Uuid{
        let body = json!({
            "email": email,
            "name": "Test User",
            "password": "testpassword",
            "confirm_password": "testpassword",
            "role": role
        });

        let response = self.api_client
            .post(format!("{}/register", self.get_app_url()))
            .json(&body)
            .send()
            .await
            .expect("Failed to send request to register endpoint");
        assert_eq!(response.status().as_u16(), 200);

        let body: serde_json::Value = response.json().await.unwrap();
        Uuid::parse_str(body["user_id"].as_str().unwrap()).unwrap()
    }

    pub async fn login_user(&self, email: &str) -> String{
        let body = json!({
            "email": email,
            "password": "testpassword"
        });

        let response = self.api_client
            .post(format!("{}/login", self.get_app_url()))
            .json(&body)
            .send()
            .await
            .expect("Failed to send request to login endpoint");
        assert_eq!(response.status().as_u16(), 200);

        let body: serde_json::Value = response.json().await.unwrap();
        body["token"].as_str().unwrap().to_string()
    }

    // Registers a fresh account with a random email and hands back its id
    // and bearer token
    pub async fn register_and_login(&self, role: &str) -> (Uuid, String){
        let email = random_email();
        let user_id = self.register_user(&email, role).await;
        let token = self.login_user(&email).await;
        (user_id, token)
    }

    pub async fn create_restaurant(&self, token: &str, listing: serde_json::Value) -> Uuid{
        let response = self.api_client
            .post(format!("{}/restaurants", self.get_app_url()))
            .bearer_auth(token)
            .json(&listing)
            .send()
            .await
            .expect("Failed to send request to restaurants endpoint");
        assert_eq!(response.status().as_u16(), 201);

        let body: serde_json::Value = response.json().await.unwrap();
        Uuid::parse_str(body["restaurant_id"].as_str().unwrap()).unwrap()
    }

    pub async fn approve_restaurant(&self, admin_token: &str, restaurant_id: Uuid){
        let response = self.api_client
            .patch(format!("{}/admin/restaurants/{}/approve", self.get_app_url(), restaurant_id))
            .bearer_auth(admin_token)
            .send()
            .await
            .expect("Failed to send request to approve endpoint");
        assert_eq!(response.status().as_u16(), 200);
    }

    pub async fn book_table(
        &self,
        token: &str,
        restaurant_id: Uuid,
        date: &str,
        time: &str,
        party_size: i32
    ) -> reqwest::Response{
        let body = json!({
            "restaurant_id": restaurant_id,
            "date": date,
            "time": time,
            "party_size": party_size
        });

        self.api_client
            .post(format!("{}/bookings", self.get_app_url()))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .expect("Failed to send request to bookings endpoint")
    }

    pub async fn get_availability(
        &self,
        restaurant_id: Uuid,
        date: &str,
        time: &str
    ) -> serde_json::Value{
        let response = self.api_client
            .get(format!("{}/restaurants/{}/availability", self.get_app_url(), restaurant_id))
            .query(&[("date", date), ("time", time)])
            .send()
            .await
            .expect("Failed to send request to availability endpoint");
        assert_eq!(response.status().as_u16(), 200);

        response.json().await.unwrap()
    }
}

pub fn random_email() -> String{
    let local: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(12)
        .map(char::from)
        .collect();

    format!("{}@example.com", local.to_lowercase())
}

// A complete listing with coordinates supplied, so creating it never calls
// out to the geocoding API
pub fn listing(name: &str, city: &str, zip: &str, tables: serde_json::Value) -> serde_json::Value{
    json!({
        "name": name,
        "address": "190 Main St",
        "city": city,
        "state": "IL",
        "zip_code": zip,
        "phone": "555-0134",
        "description": "Family-style thalis and dosa all day",
        "cuisine": "Indian",
        "cost_rating": "$$",
        "hours": {
            "Mon": "10:00-22:00",
            "Tue": "10:00-22:00",
            "Wed": "10:00-22:00",
            "Thu": "10:00-22:00",
            "Fri": "10:00-22:00",
            "Sat": "10:00-22:00",
            "Sun": "10:00-22:00"
        },
        "tables": tables,
        "latitude": 39.78,
        "longitude": -89.65
    })
}
