use std::time::Duration;

use ipinfo::{IpDetails, IpInfo, IpInfoConfig};
use reqwest::Client;

use crate::{
    config::Provider,
    error::LookupError,
    structs::{IpApiComResponse, IpapiResponse, LocationRecord, UNKNOWN},
};

/// Where and how to look an address up.
pub struct Lookup<'a> {
    pub provider: Provider,
    pub base_url: &'a str,
    pub ipinfo_token: Option<&'a str>,
    pub timeout: Duration,
}

pub async fn lookup_location(
    client: &Client,
    lookup: &Lookup<'_>,
    ip: &str,
) -> Result<LocationRecord, LookupError> {
    match lookup.provider {
        Provider::Ipapi => {
            let url = format!("{}/{}/json/", lookup.base_url.trim_end_matches('/'), ip);
            let body: IpapiResponse = fetch_json(client, &url, lookup.timeout).await?;
            from_ipapi(ip, body)
        }
        Provider::IpApiCom => {
            let url = format!("{}/json/{}", lookup.base_url.trim_end_matches('/'), ip);
            let body: IpApiComResponse = fetch_json(client, &url, lookup.timeout).await?;
            from_ip_api_com(ip, body)
        }
        Provider::IpInfo => lookup_ipinfo(lookup, ip).await,
    }
}

async fn fetch_json<T: serde::de::DeserializeOwned>(
    client: &Client,
    url: &str,
    timeout: Duration,
) -> Result<T, LookupError> {
    let response = client.get(url).timeout(timeout).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(LookupError::Status(status));
    }
    Ok(response.json::<T>().await?)
}

async fn lookup_ipinfo(lookup: &Lookup<'_>, ip: &str) -> Result<LocationRecord, LookupError> {
    let config = IpInfoConfig {
        token: lookup.ipinfo_token.map(str::to_string),
        timeout: lookup.timeout,
        ..Default::default()
    };

    let mut ipinfo = IpInfo::new(config).map_err(|e| LookupError::IpInfo(e.to_string()))?;
    let details = ipinfo
        .lookup(ip)
        .await
        .map_err(|e| LookupError::IpInfo(e.to_string()))?;

    Ok(from_ipinfo(ip, details))
}

pub fn from_ipinfo(ip: &str, details: IpDetails) -> LocationRecord {
    let (latitude, longitude) = parse_loc(&details.loc);
    LocationRecord {
        ip: non_blank(Some(details.ip)).unwrap_or_else(|| ip.to_string()),
        city: or_unknown(Some(details.city)),
        region: or_unknown(Some(details.region)),
        country: or_unknown(Some(details.country)),
        latitude,
        longitude,
        isp: None,
    }
}

pub fn from_ipapi(ip: &str, body: IpapiResponse) -> Result<LocationRecord, LookupError> {
    if body.error {
        return Err(LookupError::Provider(
            body.reason.unwrap_or_else(|| "error".to_string()),
        ));
    }

    Ok(LocationRecord {
        ip: ip.to_string(),
        city: or_unknown(body.city),
        region: or_unknown(body.region),
        country: or_unknown(body.country_name),
        latitude: body.latitude.unwrap_or(0.0),
        longitude: body.longitude.unwrap_or(0.0),
        isp: non_blank(body.org),
    })
}

pub fn from_ip_api_com(ip: &str, body: IpApiComResponse) -> Result<LocationRecord, LookupError> {
    if body.status.as_deref() == Some("fail") {
        return Err(LookupError::Provider(
            body.message.unwrap_or_else(|| "fail".to_string()),
        ));
    }

    Ok(LocationRecord {
        ip: non_blank(body.query).unwrap_or_else(|| ip.to_string()),
        city: or_unknown(body.city),
        region: or_unknown(body.region_name),
        country: or_unknown(body.country),
        latitude: body.lat.unwrap_or(0.0),
        longitude: body.lon.unwrap_or(0.0),
        isp: non_blank(body.isp),
    })
}

/// ipinfo reports coordinates as `"lat,lon"`; anything else reads as (0, 0).
pub fn parse_loc(loc: &str) -> (f64, f64) {
    let mut parts = loc.split(',').map(|p| p.trim().parse::<f64>());
    match (parts.next(), parts.next(), parts.next()) {
        (Some(Ok(lat)), Some(Ok(lon)), None) => (lat, lon),
        _ => (0.0, 0.0),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn or_unknown(value: Option<String>) -> String {
    non_blank(value).unwrap_or_else(|| UNKNOWN.to_string())
}
