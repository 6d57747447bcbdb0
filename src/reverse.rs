use std::time::Duration;

use geoutils::Location;
use reqwest::Client;

use crate::{error::LookupError, structs::NominatimResponse};

pub const UNKNOWN_LOCATION: &str = "Unknown Location";

/// Best single address for the coordinates, or [`UNKNOWN_LOCATION`] on any
/// failure. Never returns an error.
pub async fn reverse_geocode(
    client: &Client,
    base_url: &str,
    point: &Location,
    timeout: Duration,
) -> String {
    println!("🛰️ Reverse geocoding to improve accuracy...");
    match lookup_address(client, base_url, point, timeout).await {
        Ok(address) => address,
        Err(e) => {
            log::debug!(
                "reverse geocoding ({}, {}) failed: {}",
                point.latitude(),
                point.longitude(),
                e
            );
            UNKNOWN_LOCATION.to_string()
        }
    }
}

async fn lookup_address(
    client: &Client,
    base_url: &str,
    point: &Location,
    timeout: Duration,
) -> Result<String, LookupError> {
    let url = format!("{}/reverse", base_url.trim_end_matches('/'));
    let response = client
        .get(url)
        .query(&[
            ("format", "jsonv2".to_string()),
            ("lat", point.latitude().to_string()),
            ("lon", point.longitude().to_string()),
        ])
        .timeout(timeout)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(LookupError::Status(status));
    }

    let body: NominatimResponse = response.json().await?;
    if let Some(error) = body.error {
        return Err(LookupError::Provider(error));
    }
    body.display_name
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| LookupError::Payload("no display_name".to_string()))
}
