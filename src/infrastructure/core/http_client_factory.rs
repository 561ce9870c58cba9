use crate::domain::errors::ProviderError;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Upper bound on how much of an error body is kept in a `ProviderError`.
const MAX_ERROR_BODY: usize = 200;

pub struct HttpClientFactory;

impl HttpClientFactory {
    /// Shared client for every provider. No retry layer: a failed provider
    /// call falls through to the next provider instead.
    pub fn create_client(timeout: Duration) -> Client {
        Client::builder()
            .pool_max_idle_per_host(5)
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(5)))
            .user_agent(concat!("rustsignal/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| Client::new())
    }
}

/// Joins `path` onto `base_url` and appends `params` as an encoded query.
pub fn build_url_with_query<K, V>(
    base_url: &str,
    path: &str,
    params: &[(K, V)],
) -> Result<Url, url::ParseError>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let base = format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'));
    Url::parse_with_params(&base, params.iter().map(|(k, v)| (k.as_ref(), v.as_ref())))
}

/// GET `url` and decode the body as JSON, mapping every failure to a
/// [`ProviderError`] for `provider`.
///
/// A client-side timeout is reported as a transport failure; the gateway
/// owns [`ProviderError::Timeout`] since it knows the budget.
pub async fn get_json(client: &Client, provider: &str, url: Url) -> Result<Value, ProviderError> {
    let response = client.get(url).send().await.map_err(|e| {
        let is_timeout = e.is_timeout();
        let detail = e.without_url().to_string();
        ProviderError::Transport {
            provider: provider.to_string(),
            reason: if is_timeout {
                format!("request timed out: {}", detail)
            } else {
                detail
            },
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::HttpStatus {
            provider: provider.to_string(),
            status: status.as_u16(),
            body: truncate(&body),
        });
    }

    response.json::<Value>().await.map_err(|e| ProviderError::Decode {
        provider: provider.to_string(),
        reason: e.without_url().to_string(),
    })
}

fn truncate(body: &str) -> String {
    match body.char_indices().nth(MAX_ERROR_BODY) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url_encodes_slash_pair() {
        let url = build_url_with_query(
            "https://api.twelvedata.com/",
            "/time_series",
            &[("symbol", "XAU/USD"), ("interval", "1h")],
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.twelvedata.com/time_series?symbol=XAU%2FUSD&interval=1h"
        );
    }

    #[test]
    fn test_build_url_rejects_garbage_base() {
        let params: [(&str, &str); 0] = [];
        assert!(build_url_with_query("not a url", "x", &params).is_err());
    }

    #[tokio::test]
    async fn test_client_timeout_is_a_transport_failure() {
        // Accepts connections and never answers
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let client = HttpClientFactory::create_client(Duration::from_millis(100));
        let url = Url::parse(&format!("http://{}/api/v3/klines", addr)).unwrap();
        let err = get_json(&client, "binance", url).await.unwrap_err();

        match err {
            ProviderError::Transport { provider, reason } => {
                assert_eq!(provider, "binance");
                assert!(reason.starts_with("request timed out"), "{}", reason);
            }
            other => panic!("expected transport failure, got {:?}", other),
        }
    }

    #[test]
    fn test_truncate_long_bodies() {
        let body = "x".repeat(500);
        let truncated = truncate(&body);
        assert_eq!(truncated.len(), MAX_ERROR_BODY + 3);
        assert_eq!(truncate("short"), "short");
    }
}
