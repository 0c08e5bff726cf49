//! Reverse Geocoding
//!
//! Raw `lat,lon` strings (optionally prefixed `GPS:`) are looked up on a
//! Nominatim-compatible `/reverse` endpoint; everything else, and every
//! failed lookup, comes back unchanged.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::domain::capability::Geocoder;

const USER_AGENT: &str = concat!("report-api/", env!("CARGO_PKG_VERSION"));

#[derive(Clone)]
pub struct NominatimGeocoder {
    client: Client,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    display_name: Option<String>,
}

impl NominatimGeocoder {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    async fn lookup(&self, lat: f64, lon: f64) -> Result<Option<String>, reqwest::Error> {
        let response: ReverseResponse = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("format", "jsonv2".to_string()),
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response.display_name.filter(|name| !name.trim().is_empty()))
    }
}

impl Geocoder for NominatimGeocoder {
    async fn reverse_lookup(&self, raw: &str) -> String {
        let Some((lat, lon)) = parse_coordinates(raw) else {
            return raw.to_string();
        };

        match self.lookup(lat, lon).await {
            Ok(Some(address)) => address,
            Ok(None) => raw.to_string(),
            Err(e) => {
                tracing::warn!(location = %raw, error = %e, "Reverse geocoding failed, keeping raw location");
                raw.to_string()
            }
        }
    }
}

/// Geocoder for environments without a lookup service
#[derive(Debug, Clone, Default)]
pub struct PassThroughGeocoder;

impl Geocoder for PassThroughGeocoder {
    async fn reverse_lookup(&self, raw: &str) -> String {
        raw.to_string()
    }
}

/// Geocoder picked at startup from configuration
#[derive(Clone)]
pub enum SelectedGeocoder {
    Nominatim(NominatimGeocoder),
    PassThrough(PassThroughGeocoder),
}

impl Geocoder for SelectedGeocoder {
    async fn reverse_lookup(&self, raw: &str) -> String {
        match self {
            SelectedGeocoder::Nominatim(geocoder) => geocoder.reverse_lookup(raw).await,
            SelectedGeocoder::PassThrough(geocoder) => geocoder.reverse_lookup(raw).await,
        }
    }
}

/// Parse `lat,lon`, `GPS: lat,lon` or `GPS: Lat lat, Lon lon`
pub fn parse_coordinates(raw: &str) -> Option<(f64, f64)> {
    let trimmed = raw.trim();
    let body = match trimmed.get(..4) {
        Some(prefix) if prefix.eq_ignore_ascii_case("gps:") => &trimmed[4..],
        _ => trimmed,
    };

    let (lat, lon) = body.split_once(',')?;
    let lat = parse_component(lat)?;
    let lon = parse_component(lon)?;

    ((-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon)).then_some((lat, lon))
}

/// A number with an optional `Lat`/`Lon`/`Lng` label in front
fn parse_component(part: &str) -> Option<f64> {
    let number = part
        .trim()
        .trim_start_matches(|c: char| c.is_ascii_alphabetic() || c == ':')
        .trim();
    let value: f64 = number.parse().ok()?;
    value.is_finite().then_some(value)
}
