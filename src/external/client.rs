use std::sync::LazyLock;
use std::time::Duration;

/// User agent sent on every outbound relay request.
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Process-wide HTTP client shared by all relay deliveries.
///
/// Built lazily on first use so connection pools are reused across requests.
/// The per-request timeout is applied by the caller; the values here are
/// upper bounds.
///
/// # Example
/// ```ignore
/// use crate::external::client::HTTP_CLIENT;
///
/// let response = HTTP_CLIENT
///     .post("https://chat.example.com/api/v1/external/slack_incoming")
///     .body(r#"{"text":"hi"}"#)
///     .send()
///     .await?;
/// ```
pub static HTTP_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    reqwest::Client::builder()
        // Timeouts
        .timeout(Duration::from_secs(60))
        .connect_timeout(Duration::from_secs(10))
        // Connection pooling
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(90))
        // HTTP/2 settings
        .http2_adaptive_window(true)
        .http2_keep_alive_interval(Duration::from_secs(10))
        .http2_keep_alive_timeout(Duration::from_secs(20))
        // Security
        .https_only(false)
        .use_rustls_tls()
        .user_agent(USER_AGENT)
        .build()
        .expect("Failed to build HTTP client")
});
