use anyhow::Context;
use geoutils::Location;
use reqwest::Client;

use crate::{
    config::Config,
    geolocations::{self, Lookup},
    public_ip, reverse,
    structs::LocationRecord,
};

pub struct Resolver {
    client: Client,
    config: Config,
}

impl Resolver {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .context("building http client")?;
        Ok(Resolver { client, config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub async fn get_public_ip(&self) -> Option<String> {
        public_ip::get_public_ip(&self.client, &self.config.ip_sources, self.config.ip_timeout)
            .await
    }

    /// Looks up `ip`, or the caller's own address when none is given.
    /// Returns `None` without contacting the geolocation service if no
    /// address can be determined.
    pub async fn get_location(&self, ip: Option<&str>) -> Option<LocationRecord> {
        let ip = match ip.map(str::trim).filter(|ip| !ip.is_empty()) {
            Some(ip) => ip.to_string(),
            None => self.get_public_ip().await?,
        };

        println!("Looking up location for IP: {}...", ip);
        let lookup = Lookup {
            provider: self.config.provider,
            base_url: &self.config.geo_url,
            ipinfo_token: self.config.ipinfo_token.as_deref(),
            timeout: self.config.geo_timeout,
        };
        match geolocations::lookup_location(&self.client, &lookup, &ip).await {
            Ok(record) => Some(record),
            Err(e) => {
                log::warn!("geolocation of {} failed: {}", ip, e);
                println!(" Something went wrong while fetching location data. Try again later.");
                None
            }
        }
    }

    pub async fn reverse_geocode(&self, latitude: f64, longitude: f64) -> String {
        reverse::reverse_geocode(
            &self.client,
            &self.config.reverse_url,
            &Location::new(latitude, longitude),
            self.config.reverse_timeout,
        )
        .await
    }
}
