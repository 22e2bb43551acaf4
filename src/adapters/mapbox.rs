use crate::domain::model::FeatureCollection;
use crate::domain::ports::{GeocoderSettings, NeighborhoodResolver};
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "https://api.mapbox.com";
pub const DEFAULT_DATASET: &str = "mapbox.places";

/// Coordinates are sent with this many decimal places.
const COORDINATE_PRECISION: i32 = 5;

/// Reverse geocoder backed by the Mapbox geocoding v5 API.
///
/// One HTTP client is created per geocoder and reused for every lookup.
/// Nothing is cached or retried.
pub struct MapboxGeocoder {
    client: Client,
    settings: GeocoderSettings,
}

impl MapboxGeocoder {
    pub fn new(settings: GeocoderSettings) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = settings.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            settings,
        })
    }

    /// Builds `{endpoint}/geocoding/v5/{dataset}/{lon},{lat}.json` with query
    /// parameters, including the access token.
    pub fn reverse_url(&self, longitude: f64, latitude: f64) -> Result<Url> {
        let base = self.settings.endpoint.trim_end_matches('/');
        let raw = format!(
            "{}/geocoding/v5/{}/{},{}.json",
            base,
            self.settings.dataset,
            round_coordinate(longitude),
            round_coordinate(latitude)
        );

        let mut url = Url::parse(&raw).map_err(|e| EtlError::InvalidConfigValueError {
            field: "geocoder.endpoint".to_string(),
            value: self.settings.endpoint.clone(),
            reason: format!("Invalid URL format: {}", e),
        })?;

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("access_token", &self.settings.access_token);
            if !self.settings.types.is_empty() {
                query.append_pair("types", &self.settings.types.join(","));
            }
            if let Some(language) = &self.settings.language {
                query.append_pair("language", language);
            }
        }

        Ok(url)
    }
}

#[async_trait]
impl NeighborhoodResolver for MapboxGeocoder {
    async fn resolve(&self, longitude: f64, latitude: f64) -> Result<String> {
        let url = self.reverse_url(longitude, latitude)?;
        let loggable = redact_token(&url);

        tracing::debug!("Reverse geocoding request: {}", loggable);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        tracing::debug!("Geocoding response status: {}", status);

        if !status.is_success() {
            return Err(EtlError::GeocodeStatus {
                status: status.as_u16(),
                url: loggable,
            });
        }

        let body = response.bytes().await?;
        let collection: FeatureCollection = serde_json::from_slice(&body)?;

        if collection.features.is_empty() {
            return Err(EtlError::GeocodeShape {
                message: format!("no features for ({}, {})", longitude, latitude),
            });
        }

        collection
            .neighborhood()
            .map(str::to_string)
            .ok_or_else(|| EtlError::GeocodeShape {
                message: format!(
                    "first feature for ({}, {}) has no context",
                    longitude, latitude
                ),
            })
    }
}

fn round_coordinate(value: f64) -> f64 {
    let factor = 10f64.powi(COORDINATE_PRECISION);
    (value * factor).round() / factor
}

/// URL rendering with the `access_token` value replaced, for logs and errors.
pub fn redact_token(url: &Url) -> String {
    let mut redacted = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let value = if k == "access_token" {
                "REDACTED".to_string()
            } else {
                v.into_owned()
            };
            (k.into_owned(), value)
        })
        .collect();

    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}
