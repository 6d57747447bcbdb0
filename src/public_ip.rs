use std::{net::IpAddr, time::Duration};

use reqwest::Client;

use crate::{
    config::{EchoFormat, IpSource},
    error::LookupError,
    structs::IpEcho,
};

/// Asks each IP-echo source in turn and returns the first usable answer.
/// Later sources are not contacted once one succeeds.
pub async fn get_public_ip(
    client: &Client,
    sources: &[IpSource],
    timeout: Duration,
) -> Option<String> {
    for source in sources {
        println!("Trying {}...", source.url);
        match fetch_ip(client, source, timeout).await {
            Ok(ip) => {
                log::debug!("{} reported {}", source.url, ip);
                return Some(ip);
            }
            Err(e) => log::debug!("{} failed: {}", source.url, e),
        }
    }

    log::warn!("all {} ip-echo sources failed", sources.len());
    println!("⚠️ Oops! Couldn't fetch your public IP from any service.");
    None
}

async fn fetch_ip(
    client: &Client,
    source: &IpSource,
    timeout: Duration,
) -> Result<String, LookupError> {
    let response = client.get(&source.url).timeout(timeout).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(LookupError::Status(status));
    }

    let raw = match source.format {
        EchoFormat::Json => response
            .json::<IpEcho>()
            .await?
            .ip
            .ok_or_else(|| LookupError::Payload("no `ip` field".to_string()))?,
        EchoFormat::Text => response.text().await?,
    };

    let ip = raw.trim();
    ip.parse::<IpAddr>()
        .map_err(|_| LookupError::Payload(format!("`{}` is not an ip address", ip)))?;
    Ok(ip.to_string())
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn source(server: &MockServer, route: &str, format: EchoFormat) -> IpSource {
        IpSource {
            url: format!("{}{}", server.uri(), route),
            format,
        }
    }

    #[tokio::test]
    async fn first_success_wins_and_later_sources_are_skipped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/down"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ip": "203.0.113.7"})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/text"))
            .respond_with(ResponseTemplate::new(200).set_body_string("198.51.100.1\n"))
            .expect(0)
            .mount(&server)
            .await;

        let sources = vec![
            source(&server, "/down", EchoFormat::Text),
            source(&server, "/json", EchoFormat::Json),
            source(&server, "/text", EchoFormat::Text),
        ];
        let ip = get_public_ip(&Client::new(), &sources, Duration::from_secs(2)).await;
        assert_eq!(ip.as_deref(), Some("203.0.113.7"));
    }

    #[tokio::test]
    async fn plain_text_answer_is_trimmed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/text"))
            .respond_with(ResponseTemplate::new(200).set_body_string("  2001:db8::1\n"))
            .mount(&server)
            .await;

        let sources = vec![source(&server, "/text", EchoFormat::Text)];
        let ip = get_public_ip(&Client::new(), &sources, Duration::from_secs(2)).await;
        assert_eq!(ip.as_deref(), Some("2001:db8::1"));
    }

    #[tokio::test]
    async fn all_sources_failing_yields_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/down"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/html"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>blocked</html>"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("192.0.2.1")
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/empty"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let sources = vec![
            source(&server, "/down", EchoFormat::Text),
            source(&server, "/html", EchoFormat::Text),
            source(&server, "/slow", EchoFormat::Text),
            source(&server, "/empty", EchoFormat::Json),
        ];
        let ip = get_public_ip(&Client::new(), &sources, Duration::from_millis(100)).await;
        assert_eq!(ip, None);
    }

    #[tokio::test]
    async fn unreachable_source_falls_through() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/text"))
            .respond_with(ResponseTemplate::new(200).set_body_string("192.0.2.44"))
            .expect(1)
            .mount(&server)
            .await;

        let sources = vec![
            IpSource::from_url("http://127.0.0.1:1/?format=json"),
            source(&server, "/text", EchoFormat::Text),
        ];
        let ip = get_public_ip(&Client::new(), &sources, Duration::from_secs(2)).await;
        assert_eq!(ip.as_deref(), Some("192.0.2.44"));
    }
}
