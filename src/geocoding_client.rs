use std::time::Duration;

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;

// Client for the forward-geocoding API used to place restaurants on the map
#[derive(Clone)]
pub struct GeocodingClient {
    http_client: Client,
    base_url: String,
    access_token: SecretString,
}

#[derive(Error, Debug)]
pub enum GeocodeError {
    #[error("geocoding request failed")]
    RequestError(#[from] reqwest::Error),
    #[error("geocoding response was not understood")]
    MalformedUrl,
    #[error("no coordinates found for {0}")]
    NoCoordinates(String),
}

#[derive(Deserialize)]
struct GeocodeResponse {
    features: Vec<GeocodeFeature>,
}

#[derive(Deserialize)]
struct GeocodeFeature {
    // [longitude, latitude]
    center: Vec<f64>,
}

impl GeocodingClient {
    pub fn new(
        base_url: String,
        access_token: SecretString,
        timeout: u64,
    ) -> GeocodingClient {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()
            .unwrap();

        Self {
            http_client,
            base_url,
            access_token,
        }
    }

    // Latitude/longitude for a street address, falling back to the bare zip
    // code when the full address resolves to nothing
    #[tracing::instrument(
        "Geocoding restaurant address",
        skip(self)
    )]
    pub async fn get_coordinates(
        &self,
        full_address: &str,
        zip_code: &str,
    ) -> Result<(f64, f64), GeocodeError> {
        match self.try_geocode(full_address).await {
            Ok(coordinates) => Ok(coordinates),
            Err(e) => {
                tracing::warn!("Failed to geocode full address, retrying with zip code: {:?}", e);
                self.try_geocode(zip_code).await
            }
        }
    }

    async fn try_geocode(&self, location: &str) -> Result<(f64, f64), GeocodeError> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|_| GeocodeError::MalformedUrl)?;

        // Url takes care of percent-encoding the free-text location
        let place = format!("{}.json", location);
        url.path_segments_mut()
            .map_err(|_| GeocodeError::MalformedUrl)?
            .extend(["geocoding", "v5", "mapbox.places"])
            .push(&place);
        url.query_pairs_mut()
            .append_pair("access_token", self.access_token.expose_secret());

        let response = self.http_client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json::<GeocodeResponse>()
            .await?;

        match response.features.first() {
            Some(feature) if feature.center.len() == 2 => {
                Ok((feature.center[1], feature.center[0]))
            }
            _ => Err(GeocodeError::NoCoordinates(location.to_string())),
        }
    }
}
