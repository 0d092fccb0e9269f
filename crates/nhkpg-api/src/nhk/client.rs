//! `NhkClient` - NHK Program Guide API client implementation.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use super::api::NhkApi;
use super::endpoint::{DEFAULT_BASE_URL, Endpoint};
use super::error::{Result, map_api_error};
use super::transport::fetch;
use super::types::{DescriptionList, NowOnAirList, ProgramList, decode};

/// Default User-Agent.
const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// NHK Program Guide API client.
///
/// Immutable after construction and safe to share between threads.
#[derive(Clone)]
#[allow(clippy::module_name_repetitions)]
pub struct NhkClient {
    /// HTTP client (reqwest blocking).
    http_client: Client,
    /// Base URL for API requests.
    base_url: String,
    /// API key sent as the `key` query parameter.
    api_key: String,
}

impl std::fmt::Debug for NhkClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NhkClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"***")
            .finish_non_exhaustive()
    }
}

/// Builder for `NhkClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct NhkClientBuilder {
    api_key: String,
    base_url: Option<Url>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl NhkClientBuilder {
    /// Creates a new builder.
    fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: None,
            timeout: None,
            user_agent: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets a total request timeout (default: none).
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the User-Agent (default: `nhkpg-api/<version>`).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Returns [`NhkError::Transport`](super::NhkError::Transport) if the
    /// underlying `reqwest` client cannot be built.
    pub fn build(self) -> Result<NhkClient> {
        let base_url = self
            .base_url
            .map_or_else(|| String::from(DEFAULT_BASE_URL), String::from);

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| String::from(DEFAULT_USER_AGENT));

        // Blocking reqwest defaults to 30s; `None` disables the timeout.
        let http_client = Client::builder()
            .user_agent(user_agent)
            .gzip(true)
            .timeout(self.timeout)
            .build()?;

        Ok(NhkClient {
            http_client,
            base_url,
            api_key: self.api_key,
        })
    }
}

impl NhkClient {
    /// Creates a client for the default NHK API host.
    ///
    /// # Errors
    ///
    /// Returns [`NhkError::Transport`](super::NhkError::Transport) if the
    /// underlying `reqwest` client cannot be built.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::builder(api_key).build()
    }

    /// Creates a new builder.
    #[must_use]
    pub fn builder(api_key: impl Into<String>) -> NhkClientBuilder {
        NhkClientBuilder::new(api_key.into())
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full request URL for an endpoint, including the API key.
    #[must_use]
    pub fn url_for(&self, version: &str, endpoint: &Endpoint<'_>) -> String {
        endpoint.url(&self.base_url, version, &self.api_key)
    }

    /// Fetches an endpoint and decodes a 200 response, mapping any other status.
    fn get_json<T: DeserializeOwned>(
        &self,
        version: &str,
        endpoint: &Endpoint<'_>,
        context: &str,
    ) -> Result<T> {
        let url = self.url_for(version, endpoint);

        tracing::debug!(
            endpoint = endpoint.name(),
            url = %endpoint.redacted_url(&self.base_url, version),
            "NHK API request"
        );

        let response = fetch(&self.http_client, &url)?;

        if response.status != StatusCode::OK.as_u16() {
            let err = map_api_error(&response.body, response.status);
            tracing::warn!(
                endpoint = endpoint.name(),
                status = response.status,
                error = %err,
                "NHK API returned an error"
            );
            return Err(err);
        }

        decode(&response.body, context)
    }
}

impl NhkApi for NhkClient {
    #[instrument(skip_all, fields(version = %version, area = %area, service = %service))]
    fn program_list(
        &self,
        version: &str,
        area: &str,
        service: &str,
        date: &str,
    ) -> Result<ProgramList> {
        let endpoint = Endpoint::List {
            area,
            service,
            date,
        };
        self.get_json(version, &endpoint, "program list")
    }

    #[instrument(skip_all, fields(version = %version, area = %area, service = %service))]
    fn program_genre(
        &self,
        version: &str,
        area: &str,
        service: &str,
        genre: &str,
        date: &str,
    ) -> Result<ProgramList> {
        let endpoint = Endpoint::Genre {
            area,
            service,
            genre,
            date,
        };
        self.get_json(version, &endpoint, "program genre list")
    }

    #[instrument(skip_all, fields(version = %version, area = %area, service = %service))]
    fn program_info(
        &self,
        version: &str,
        area: &str,
        service: &str,
        id: &str,
    ) -> Result<DescriptionList> {
        let endpoint = Endpoint::Info { area, service, id };
        self.get_json(version, &endpoint, "program info")
    }

    #[instrument(skip_all, fields(version = %version, area = %area, service = %service))]
    fn now_on_air(&self, version: &str, area: &str, service: &str) -> Result<NowOnAirList> {
        let endpoint = Endpoint::Now { area, service };
        self.get_json(version, &endpoint, "now on air list")
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::*;

    /// Builds a client against a mock server. Call only from a blocking context.
    fn mock_client(server_uri: &str) -> NhkClient {
        let base_url = format!("{server_uri}/").parse().unwrap();
        NhkClient::builder("testApikey")
            .base_url(base_url)
            .user_agent("test/0.0.0")
            .build()
            .unwrap()
    }

    #[test]
    fn test_new_uses_default_base_url() {
        // Arrange & Act
        let client = NhkClient::new("testApikey").unwrap();

        // Assert
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_builder_with_custom_base_url() {
        // Arrange
        let custom_url = Url::parse("http://localhost:8080/").unwrap();

        // Act
        let client = NhkClient::builder("testApikey")
            .base_url(custom_url)
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();

        // Assert
        assert_eq!(client.base_url(), "http://localhost:8080/");
    }

    #[test]
    fn test_url_for_carries_api_key() {
        // Arrange
        let client = NhkClient::new("testApikey").unwrap();
        let endpoint = Endpoint::List {
            area: "130",
            service: "g1",
            date: "2024-01-01",
        };

        // Act
        let url = Url::parse(&client.url_for("v1", &endpoint)).unwrap();

        // Assert
        let key = url
            .query_pairs()
            .find(|(name, _)| name == "key")
            .map(|(_, value)| value.into_owned());
        assert_eq!(key.as_deref(), Some("testApikey"));
        assert_eq!(url.path(), "/v1/pg/list/130/g1/2024-01-01.json");
    }

    #[test]
    fn test_debug_does_not_leak_api_key() {
        // Arrange
        let client = NhkClient::new("super-secret-key").unwrap();

        // Act
        let debug = format!("{client:?}");

        // Assert
        assert!(!debug.contains("super-secret-key"));
        assert!(debug.contains("***"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_program_list_via_http() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/nhk/program_list.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/v1/pg/list/130/g1/2024-01-01.json"))
            .and(wiremock::matchers::query_param("key", "testApikey"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let uri = mock_server.uri();

        // Act
        let result = tokio::task::spawn_blocking(move || {
            mock_client(&uri).program_list("v1", "130", "g1", "2024-01-01")
        })
        .await
        .unwrap();

        // Assert
        let list = result.unwrap();
        assert_eq!(list.list["g1"].len(), 3);
        assert_eq!(list.list["g1"][0].title, "ニュース");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_program_genre_via_http() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/nhk/program_genre.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path(
                "/v1/pg/genre/130/g1/0000/2024-01-01.json",
            ))
            .and(wiremock::matchers::query_param("key", "testApikey"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let uri = mock_server.uri();

        // Act
        let result = tokio::task::spawn_blocking(move || {
            mock_client(&uri).program_genre("v1", "130", "g1", "0000", "2024-01-01")
        })
        .await
        .unwrap();

        // Assert
        let list = result.unwrap();
        assert_eq!(list.list["0000"][0].id, "2024010120001");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_program_info_via_http() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/nhk/program_info.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/v1/pg/info/130/g1/2024010120002.json"))
            .and(wiremock::matchers::query_param("key", "testApikey"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let uri = mock_server.uri();

        // Act
        let result = tokio::task::spawn_blocking(move || {
            mock_client(&uri).program_info("v1", "130", "g1", "2024010120002")
        })
        .await
        .unwrap();

        // Assert
        let list = result.unwrap();
        let description = &list.list["g1"][0];
        assert_eq!(description.program.title, "おはよう日本");
        assert_eq!(description.extras.ondemand_program.id, "P000001");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_now_on_air_via_http() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/nhk/now_on_air.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/v1/pg/now/130/g1.json"))
            .and(wiremock::matchers::query_param("key", "testApikey"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let uri = mock_server.uri();

        // Act
        let result =
            tokio::task::spawn_blocking(move || mock_client(&uri).now_on_air("v1", "130", "g1"))
                .await
                .unwrap();

        // Assert
        let list = result.unwrap();
        let g1 = &list.now_on_air_list["g1"];
        assert_eq!(g1.previous.as_ref().unwrap().id, "2024010120001");
        assert_eq!(g1.present.as_ref().unwrap().id, "2024010120002");
        assert_eq!(g1.following.as_ref().unwrap().id, "2024010120003");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_user_agent_is_sent() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/nhk/now_on_air.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::header("User-Agent", "test/0.0.0"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let uri = mock_server.uri();

        // Act & Assert (mock expect(1) verifies User-Agent header)
        tokio::task::spawn_blocking(move || mock_client(&uri).now_on_air("v1", "130", "g1"))
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_non_200_is_not_decoded_as_success() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let error_body = include_str!("../../../../fixtures/nhk/error_invalid_parameters.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(400).set_body_string(error_body))
            .mount(&mock_server)
            .await;

        let uri = mock_server.uri();

        // Act
        let result = tokio::task::spawn_blocking(move || {
            mock_client(&uri).program_info("v1", "130", "g1", "unknown")
        })
        .await
        .unwrap();

        // Assert
        let err = result.unwrap_err();
        assert!(err.is_api());
        assert_eq!(err.status(), Some(400));
        assert!(err.to_string().contains("[code: 1][message: Invalid parameters]"));
    }
}
