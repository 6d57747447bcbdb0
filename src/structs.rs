use std::fmt;

pub const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, PartialEq)]
pub struct LocationRecord {
    pub ip: String,
    pub city: String,
    pub region: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    pub isp: Option<String>,
}

impl LocationRecord {
    pub fn has_unknown_city(&self) -> bool {
        self.city == UNKNOWN
    }
}

impl fmt::Display for LocationRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "   - IP Address: {}", self.ip)?;
        writeln!(
            f,
            "   - Location: {}, {}, {}",
            self.city, self.region, self.country
        )?;
        write!(
            f,
            "   - Coordinates: ({}, {})",
            self.latitude, self.longitude
        )?;
        if let Some(isp) = &self.isp {
            write!(f, "\n   - ISP: {}", isp)?;
        }
        Ok(())
    }
}

/// Body of IP-echo services that answer with JSON, e.g. ipify.
#[derive(Debug, serde::Deserialize)]
pub struct IpEcho {
    pub ip: Option<String>,
}

/// ipapi.co `/{ip}/json/` payload.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct IpapiResponse {
    pub error: bool,
    pub reason: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub country_name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub org: Option<String>,
}

/// ip-api.com `/json/{ip}` payload.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IpApiComResponse {
    pub status: Option<String>,
    pub message: Option<String>,
    pub query: Option<String>,
    pub city: Option<String>,
    pub region_name: Option<String>,
    pub country: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub isp: Option<String>,
}

/// Nominatim `/reverse` payload; `error` is set when nothing was found.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct NominatimResponse {
    pub display_name: Option<String>,
    pub error: Option<String>,
}
