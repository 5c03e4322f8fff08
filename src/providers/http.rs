use super::util::{RetryPolicy, with_retry};
use crate::core::snapshot::RawSnapshot;
use crate::core::source::SnapshotSource;
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Url;
use tracing::{debug, error, instrument};

const DASHBOARD_PATH: &str = "/api/individual/dashboard";

/// Fetches the dashboard snapshot from the backend API.
pub struct HttpSource {
    base_url: String,
    account_id: Option<String>,
    period: Option<String>,
    retry: RetryPolicy,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(
        base_url: &str,
        account_id: Option<String>,
        period: Option<String>,
        retries: usize,
        retry_delay_ms: u64,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("capwise/0.1")
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            account_id,
            period,
            retry: RetryPolicy::new(retries, retry_delay_ms),
            client,
        })
    }

    fn snapshot_url(&self) -> Result<Url> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, DASHBOARD_PATH))
            .with_context(|| format!("Invalid base URL: {}", self.base_url))?;
        {
            let mut query = url.query_pairs_mut();
            if let Some(account) = &self.account_id {
                query.append_pair("account", account);
            }
            if let Some(period) = &self.period {
                query.append_pair("period", period);
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }
        Ok(url)
    }
}

#[async_trait]
impl SnapshotSource for HttpSource {
    #[instrument(name = "HttpSnapshotFetch", skip(self), fields(base_url = %self.base_url))]
    async fn fetch_snapshot(&self) -> Result<RawSnapshot> {
        let url = self.snapshot_url()?;
        debug!("Requesting dashboard snapshot from {}", url);

        let response = with_retry(|| self.client.get(url.clone()).send(), self.retry)
            .await
            .with_context(|| format!("Request to {url} failed"))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for dashboard snapshot",
                response.status()
            ));
        }

        let text = response
            .text()
            .await
            .context("Failed to get response text")?;

        match serde_json::from_str(&text) {
            Ok(snapshot) => Ok(snapshot),
            Err(e) => {
                error!(
                    error = ?e,
                    response = %text,
                    "Failed to parse dashboard snapshot"
                );
                Err(e).context("Failed to parse dashboard snapshot")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MOCK_JSON: &str = r#"{
        "balance": 1000,
        "incomeCycle": { "usualArrival": "2nd week", "onTimePercent": 60 },
        "transactions": [
            { "id": 1, "date": "2025-09-01", "desc": "Salary", "amount": 5000 }
        ]
    }"#;

    async fn create_mock_server(status: u16, body: &str) -> MockServer {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(DASHBOARD_PATH))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&mock_server)
            .await;
        mock_server
    }

    #[tokio::test]
    async fn test_successful_fetch() {
        let mock_server = create_mock_server(200, MOCK_JSON).await;
        let source = HttpSource::new(&mock_server.uri(), None, None, 0, 0).unwrap();

        let raw = source.fetch_snapshot().await.unwrap();
        assert_eq!(raw.balance, Some(Decimal::from(1000)));
        assert_eq!(raw.transactions.unwrap().len(), 1);
        assert!(raw.weekly_trend.is_none());
    }

    #[tokio::test]
    async fn test_sends_account_and_period() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(DASHBOARD_PATH))
            .and(query_param("account", "acct-42"))
            .and(query_param("period", "2025-09"))
            .respond_with(ResponseTemplate::new(200).set_body_string(MOCK_JSON))
            .expect(1)
            .mount(&mock_server)
            .await;

        let base_url = format!("{}/", mock_server.uri());
        let source = HttpSource::new(
            &base_url,
            Some("acct-42".to_string()),
            Some("2025-09".to_string()),
            0,
            0,
        )
        .unwrap();
        assert!(source.fetch_snapshot().await.is_ok());
    }

    #[tokio::test]
    async fn test_server_error() {
        let mock_server = create_mock_server(500, "").await;
        let source = HttpSource::new(&mock_server.uri(), None, None, 0, 0).unwrap();

        let result = source.fetch_snapshot().await;
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "HTTP error: 500 Internal Server Error for dashboard snapshot"
        );
    }

    #[tokio::test]
    async fn test_malformed_json() {
        let mock_server = create_mock_server(200, "{ not json").await;
        let source = HttpSource::new(&mock_server.uri(), None, None, 0, 0).unwrap();

        let result = source.fetch_snapshot().await;
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to parse dashboard snapshot")
        );
    }

    #[tokio::test]
    async fn test_unreachable_host_gives_up_after_retries() {
        // Reserve a free port, then release it so connections are refused.
        let base_url = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            format!("http://{}", listener.local_addr().unwrap())
        };
        let source = HttpSource::new(&base_url, None, None, 2, 1).unwrap();

        let err = source.fetch_snapshot().await.unwrap_err();
        assert!(err.to_string().contains(&format!("Request to {base_url}")));
    }
}
