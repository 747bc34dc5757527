//! HTTP fetching and outcome classification
//!
//! One GET per fetch task. The outcome is classified into the three cases
//! the pipeline distinguishes: an error-status response worth recording, a
//! resolved page whose body feeds the extract pool, or a transport failure
//! that produced no response at all. Anything outside those three is an
//! unexpected failure and propagates as an error.

use crate::SweepError;
use reqwest::Client;

/// Classified outcome of a single fetch
#[derive(Debug)]
pub enum FetchOutcome {
    /// The response resolved with a success/redirect-range status
    Page {
        /// Response body, handed to the extract pool for link discovery
        body: String,
    },

    /// The response carries an error-range status code
    ErrorStatus {
        /// The exact HTTP status code
        status: u16,
    },

    /// No response was obtained (connection refused, DNS failure, timeout)
    Transport {
        /// Error description for the log
        error: String,
    },
}

/// Builds the HTTP client shared by all fetch workers
///
/// Redirects follow the client default; no request timeout is imposed beyond
/// whatever the transport applies. The crawl accepts plain-http links on the
/// audited host, so the client is not restricted to https.
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    let user_agent = format!("linksweep/{}", env!("CARGO_PKG_VERSION"));

    Client::builder()
        .user_agent(user_agent)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Performs one GET and classifies the outcome
///
/// Error-status responses are classified without reading the body; there is
/// no link discovery from error pages. A body that fails mid-transfer counts
/// as a transport failure. A request that cannot even be constructed is an
/// unexpected failure and becomes an `Err`.
pub async fn fetch_url(client: &Client, url: &str) -> Result<FetchOutcome, SweepError> {
    match client.get(url).send().await {
        Ok(response) => {
            let status = response.status().as_u16();

            if status >= 400 {
                return Ok(FetchOutcome::ErrorStatus { status });
            }

            match response.text().await {
                Ok(body) => Ok(FetchOutcome::Page { body }),
                Err(e) => Ok(FetchOutcome::Transport {
                    error: e.to_string(),
                }),
            }
        }
        Err(e) if e.is_builder() => Err(SweepError::Http {
            url: url.to_string(),
            source: e,
        }),
        Err(e) => Ok(FetchOutcome::Transport {
            error: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_build_http_client() {
        assert!(build_http_client().is_ok());
    }

    #[tokio::test]
    async fn test_success_yields_page_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>hi</html>"))
            .mount(&server)
            .await;

        let client = build_http_client().unwrap();
        let outcome = fetch_url(&client, &format!("{}/page", server.uri()))
            .await
            .unwrap();

        match outcome {
            FetchOutcome::Page { body } => assert_eq!(body, "<html>hi</html>"),
            other => panic!("expected Page, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_error_status_is_classified() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gone"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = build_http_client().unwrap();
        let outcome = fetch_url(&client, &format!("{}/gone", server.uri()))
            .await
            .unwrap();

        match outcome {
            FetchOutcome::ErrorStatus { status } => assert_eq!(status, 404),
            other => panic!("expected ErrorStatus, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_server_error_status_is_classified() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/boom"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = build_http_client().unwrap();
        let outcome = fetch_url(&client, &format!("{}/boom", server.uri()))
            .await
            .unwrap();

        match outcome {
            FetchOutcome::ErrorStatus { status } => assert_eq!(status, 503),
            other => panic!("expected ErrorStatus, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_connection_failure_is_transport() {
        // Nothing listens on the discard port.
        let client = build_http_client().unwrap();
        let outcome = fetch_url(&client, "http://127.0.0.1:9/x").await.unwrap();

        assert!(matches!(outcome, FetchOutcome::Transport { .. }));
    }
}
