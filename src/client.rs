use std::time::Duration;

use crate::config::ClientConfig;
use crate::error::{AltmetricError, Result};
use crate::identifier::{Identifier, IdentifierQuery};
use crate::models::MetricsResult;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use reqwest::{Client, RequestBuilder, StatusCode};
use tracing::{debug, info, instrument, warn};

/// Per-call additions to the outgoing request
///
/// Everything here is merged into the request unchanged.
///
/// # Example
///
/// ```
/// use altmetric_client::RequestOptions;
/// use std::time::Duration;
///
/// let options = RequestOptions::new()
///     .with_api_key("per-call-key")
///     .with_header("X-Request-Id", "abc123")
///     .with_query_param("callback", "cb")
///     .with_timeout(Duration::from_secs(5));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Key that overrides the client's configured key for this call
    pub api_key: Option<String>,
    /// Extra request headers
    pub headers: Vec<(String, String)>,
    /// Extra query parameters, appended after `key`
    pub query: Vec<(String, String)>,
    /// Timeout for this call only
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_key<S: Into<String>>(mut self, api_key: S) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_header<K: Into<String>, V: Into<String>>(mut self, name: K, value: V) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_query_param<K: Into<String>, V: Into<String>>(mut self, name: K, value: V) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn header_map(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        for (name, value) in &self.headers {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|err| {
                AltmetricError::InvalidConfig {
                    message: format!("invalid header name {:?}: {}", name, err),
                }
            })?;
            let value =
                HeaderValue::from_str(value).map_err(|err| AltmetricError::InvalidConfig {
                    message: format!("invalid value for header {}: {}", name, err),
                })?;
            headers.append(name, value);
        }
        Ok(headers)
    }
}

/// Client for the Altmetric v1 API
#[derive(Clone)]
pub struct AltmetricClient {
    client: Client,
    base_url: String,
    config: ClientConfig,
}

impl AltmetricClient {
    /// Create a client whose API key comes from `ALTMETRIC_KEY`, falling back
    /// to the shared demo key
    ///
    /// # Example
    ///
    /// ```
    /// use altmetric_client::AltmetricClient;
    ///
    /// let client = AltmetricClient::new();
    /// ```
    pub fn new() -> Self {
        Self::with_config(ClientConfig::from_env())
    }

    /// Create a client with custom configuration
    ///
    /// # Example
    ///
    /// ```
    /// use altmetric_client::{AltmetricClient, ClientConfig};
    ///
    /// let config = ClientConfig::new()
    ///     .with_api_key("your_api_key_here")
    ///     .with_timeout_seconds(10);
    ///
    /// let client = AltmetricClient::with_config(config);
    /// ```
    pub fn with_config(config: ClientConfig) -> Self {
        let base_url = config.effective_base_url().to_string();

        let client = {
            #[cfg(not(target_arch = "wasm32"))]
            {
                Client::builder().timeout(config.timeout).build()
            }

            #[cfg(target_arch = "wasm32")]
            {
                Client::builder().build()
            }
        }
        .unwrap_or_else(|err| {
            warn!(error = %err, "Failed to build configured HTTP client, using defaults");
            Client::new()
        });

        Self {
            client,
            base_url,
            config,
        }
    }

    /// Create a client around an existing reqwest client
    ///
    /// The `User-Agent` header is still set on every request from the
    /// configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use altmetric_client::{AltmetricClient, ClientConfig};
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = AltmetricClient::with_client(http_client, ClientConfig::new());
    /// ```
    pub fn with_client(client: Client, config: ClientConfig) -> Self {
        let base_url = config.effective_base_url().to_string();
        Self {
            client,
            base_url,
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Fetch and flatten the metrics for one object
    ///
    /// # Errors
    ///
    /// * `AltmetricError::NotFound` - the API answered 404 for the object
    /// * `AltmetricError::RequestError` - the HTTP request failed
    /// * `AltmetricError::JsonError` - the response body is not JSON
    ///
    /// Other non-success statuses are logged as warnings and the body is
    /// parsed anyway.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use altmetric_client::{AltmetricClient, Identifier};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = AltmetricClient::new();
    ///     let result = client
    ///         .fetch_metrics(&Identifier::doi("10.1038/480426a")?)
    ///         .await?;
    ///     println!("Title: {:?}", result.title());
    ///     println!("Score: {:?}", result.score());
    ///     Ok(())
    /// }
    /// ```
    pub async fn fetch_metrics(&self, identifier: &Identifier) -> Result<MetricsResult> {
        self.fetch_metrics_with_options(identifier, &RequestOptions::default())
            .await
    }

    /// Resolve named identifier slots and fetch the single object they name
    ///
    /// # Example
    ///
    /// ```no_run
    /// use altmetric_client::{AltmetricClient, IdentifierQuery};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = AltmetricClient::new();
    ///     let result = client
    ///         .fetch_query(&IdentifierQuery::new().arxiv("arXiv:1108.2455"))
    ///         .await?;
    ///     println!("{} fields", result.len());
    ///     Ok(())
    /// }
    /// ```
    pub async fn fetch_query(&self, query: &IdentifierQuery) -> Result<MetricsResult> {
        let identifier = query.select()?;
        self.fetch_metrics(&identifier).await
    }

    /// Fetch metrics, merging extra headers, query parameters, a per-call
    /// key and a timeout into the request
    #[instrument(skip(self, options), fields(identifier = %identifier))]
    pub async fn fetch_metrics_with_options(
        &self,
        identifier: &Identifier,
        options: &RequestOptions,
    ) -> Result<MetricsResult> {
        let headers = options.header_map()?;
        let url = self.build_url(identifier, options);

        debug!(url = %redact_key(&url), "Making Altmetric API request");

        let request = self
            .client
            .get(&url)
            .header(USER_AGENT, self.config.effective_user_agent())
            .headers(headers);

        let response = with_timeout(request, options.timeout).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            debug!("Altmetric API has no record of this object");
            return Err(AltmetricError::NotFound {
                identifier: identifier.path(),
            });
        }

        if !status.is_success() {
            warn!(
                status = status.as_u16(),
                "Altmetric API request failed with status: {}", status
            );
        }

        let body = response.text().await?;
        let document: serde_json::Value = serde_json::from_str(&body)?;
        let result = MetricsResult::new(identifier.clone(), document);

        info!(fields = result.len(), "Fetched metrics");
        Ok(result)
    }

    /// Blocking variant of [`fetch_metrics`](Self::fetch_metrics)
    ///
    /// Runs the request on a private single-threaded runtime.
    ///
    /// # Errors
    ///
    /// Returns `AltmetricError::IoError` without sending a request when called
    /// from inside a tokio runtime; use [`fetch_metrics`](Self::fetch_metrics)
    /// there instead.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn fetch_metrics_blocking(&self, identifier: &Identifier) -> Result<MetricsResult> {
        if tokio::runtime::Handle::try_current().is_ok() {
            return Err(AltmetricError::IoError {
                message: "fetch_metrics_blocking cannot run inside an async runtime".to_string(),
            });
        }

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| AltmetricError::IoError {
                message: err.to_string(),
            })?;
        runtime.block_on(self.fetch_metrics(identifier))
    }

    fn build_url(&self, identifier: &Identifier, options: &RequestOptions) -> String {
        let encoded_value = identifier
            .value()
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");

        let mut url = format!(
            "{}/{}/{}",
            self.base_url,
            identifier.kind().as_str(),
            encoded_value
        );

        let api_key = options
            .api_key
            .as_deref()
            .unwrap_or_else(|| self.config.effective_api_key());

        url.push_str("?key=");
        url.push_str(&urlencoding::encode(api_key));

        for (key, value) in &options.query {
            url.push('&');
            url.push_str(&urlencoding::encode(key));
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }

        url
    }
}

impl Default for AltmetricClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn with_timeout(request: RequestBuilder, timeout: Option<Duration>) -> RequestBuilder {
    match timeout {
        Some(timeout) => request.timeout(timeout),
        None => request,
    }
}

// Browsers own request timeouts on wasm
#[cfg(target_arch = "wasm32")]
fn with_timeout(request: RequestBuilder, _timeout: Option<Duration>) -> RequestBuilder {
    request
}

fn redact_key(url: &str) -> String {
    match url.split_once("?key=") {
        Some((base, rest)) => {
            let tail = rest.find('&').map(|i| &rest[i..]).unwrap_or("");
            format!("{}?key=***{}", base, tail)
        }
        None => url.to_string(),
    }
}
