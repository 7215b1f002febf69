use config::{Config, File};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct Settings{
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
    pub jwt: JWTSettings,
    pub geocoding: GeocodingSettings,
    pub booking: BookingSettings
}

#[derive(Deserialize, Debug)]
pub struct ApplicationSettings{
    pub host: String,
    pub port: u16
}

#[derive(Deserialize, Debug)]
pub struct DatabaseSettings{
    pub username: String,
    pub password: SecretString,
    pub host: String,
    pub port: u16,
    pub name: String
}

#[derive(Deserialize, Debug)]
pub struct JWTSettings{
    pub secret: String,
    pub expiry_hours: u64
}

#[derive(Deserialize, Debug)]
pub struct GeocodingSettings{
    pub api_uri: String,
    pub access_token: SecretString,
    pub timeout_seconds: u64
}

// Reservation policy knobs. The availability window is a stand-in for a real
// seating-duration model the product has not defined yet, so it stays
// configurable instead of hardcoded.
#[derive(Deserialize, Debug, Clone)]
pub struct BookingSettings{
    pub auto_confirm: bool,
    pub availability_window_minutes: u32
}

impl Settings{
    pub fn get() -> Self{
        let config = Config::builder()
            .add_source(File::with_name("configuration/base.yaml"))
            .build()
            .expect("Failed to get configuration")
            .try_deserialize::<Settings>()
            .expect("Failed to deserialize to Settings struct");

        config
    }
}

impl DatabaseSettings{
    // Connection string to the postgres instance, without a database name
    pub fn get_database_url(&self) -> String{
        format!(
            "postgres://{}:{}@{}:{}",
            self.username,
            self.password.expose_secret(),
            self.host,
            self.port
        )
    }

    // Connection string to the configured database
    pub fn get_database_table_url(&self) -> String{
        format!("{}/{}", self.get_database_url(), self.name)
    }
}
