use std::{env, path::PathBuf, str::FromStr, time::Duration};

use anyhow::{anyhow, bail};

pub const DEFAULT_OUTPUT: &str = "user_location_map.html";
pub const DEFAULT_USER_AGENT: &str = "geo_locator";
pub const IPAPI_URL: &str = "https://ipapi.co";
pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

const DEFAULT_IP_SOURCES: [&str; 3] = [
    "https://api64.ipify.org?format=json",
    "https://checkip.amazonaws.com",
    "https://ifconfig.me",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EchoFormat {
    Json,
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpSource {
    pub url: String,
    pub format: EchoFormat,
}

impl IpSource {
    /// Sources asking for `format=json` answer `{"ip": ...}`, the rest plain text.
    pub fn from_url(url: &str) -> Self {
        let format = if url.contains("format=json") {
            EchoFormat::Json
        } else {
            EchoFormat::Text
        };
        IpSource {
            url: url.to_string(),
            format,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Ipapi,
    IpApiCom,
    IpInfo,
}

impl Provider {
    /// `None` for ipinfo: its client carries its own endpoint.
    pub fn default_url(self) -> Option<&'static str> {
        match self {
            Provider::Ipapi => Some(IPAPI_URL),
            Provider::IpApiCom => Some("http://ip-api.com"),
            Provider::IpInfo => None,
        }
    }
}

impl FromStr for Provider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ipapi" | "ipapi.co" => Ok(Provider::Ipapi),
            "ip-api" | "ip-api.com" => Ok(Provider::IpApiCom),
            "ipinfo" | "ipinfo.io" => Ok(Provider::IpInfo),
            other => Err(anyhow!("unknown geolocation provider `{}`", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub ip_sources: Vec<IpSource>,
    pub provider: Provider,
    /// Base URL of the HTTP providers; empty for ipinfo.
    pub geo_url: String,
    pub ipinfo_token: Option<String>,
    pub reverse_url: String,
    pub output: PathBuf,
    pub user_agent: String,
    pub ip_timeout: Duration,
    pub geo_timeout: Duration,
    pub reverse_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            ip_sources: DEFAULT_IP_SOURCES.iter().map(|u| IpSource::from_url(u)).collect(),
            provider: Provider::Ipapi,
            geo_url: IPAPI_URL.to_string(),
            ipinfo_token: None,
            reverse_url: NOMINATIM_URL.to_string(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            ip_timeout: Duration::from_secs(10),
            geo_timeout: Duration::from_secs(5),
            reverse_timeout: Duration::from_secs(10),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Config::default();

        if let Some(provider) = get("GEOLOCATOR_PROVIDER") {
            config.provider = provider.parse()?;
        }
        config.geo_url = match (get("GEOLOCATOR_GEO_URL"), config.provider.default_url()) {
            (Some(_), None) => bail!("GEOLOCATOR_GEO_URL has no effect with provider ipinfo"),
            (Some(url), Some(_)) => url,
            (None, default) => default.unwrap_or_default().to_string(),
        };
        config.ipinfo_token = get("IPINFO");
        if config.provider == Provider::IpInfo && config.ipinfo_token.is_none() {
            bail!("provider ipinfo needs a token in IPINFO");
        }

        if let Some(sources) = get("GEOLOCATOR_IP_SOURCES") {
            config.ip_sources = parse_sources(&sources);
            if config.ip_sources.is_empty() {
                bail!("GEOLOCATOR_IP_SOURCES lists no usable URL");
            }
        }
        if let Some(url) = get("GEOLOCATOR_REVERSE_URL") {
            config.reverse_url = url;
        }
        if let Some(output) = get("GEOLOCATOR_OUTPUT") {
            config.output = PathBuf::from(output);
        }
        if let Some(agent) = get("GEOLOCATOR_USER_AGENT") {
            config.user_agent = agent;
        }

        Ok(config)
    }
}

fn parse_sources(list: &str) -> Vec<IpSource> {
    list.split(',')
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .map(IpSource::from_url)
        .collect()
}
