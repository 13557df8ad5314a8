use clap::Parser;

/// # Lingua Proxy Configuration
///
/// Configuration from command-line arguments, environment variables, and an
/// optional .env file loaded by the binary. Credentials are handled by
/// [`crate::credentials::CredentialPool`], which reads the environment
/// variable named in `credentials_env` directly so the secret list never
/// travels through clap's argument machinery (or its debug output).
#[derive(Debug, Clone, Parser)]
#[command(name = "lingua-proxy")]
#[command(about = "Streaming generative-AI proxy for the Lingua language-learning app")]
#[command(version)]
pub struct Config {
    /// Server port to listen on
    #[arg(short, long, env = "PORT", default_value = "8080")]
    pub port: u16,

    /// Server host to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Base URL of the Gemini-style generation backend
    #[arg(
        long,
        env = "GEMINI_BASE_URL",
        default_value = "https://generativelanguage.googleapis.com"
    )]
    pub upstream_url: String,

    /// Name of the environment variable holding the comma-separated
    /// credential list
    #[arg(long, default_value = "GEMINI_API_KEYS")]
    pub credentials_env: String,

    /// Upstream connect timeout in seconds
    #[arg(long, env = "UPSTREAM_CONNECT_TIMEOUT", default_value = "5")]
    pub upstream_connect_timeout: u64,

    /// Upstream idle-read timeout in seconds. Bounds how long a streaming
    /// request may sit with no bytes arriving before it is torn down.
    #[arg(long, env = "UPSTREAM_READ_TIMEOUT", default_value = "120")]
    pub upstream_read_timeout: u64,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

impl Config {
    /// Parse configuration from CLI arguments and the environment.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// A fixed configuration for tests. The upstream URL is a placeholder;
    /// tests point it at a wiremock server.
    pub fn for_test() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            upstream_url: "http://localhost:9999".to_string(),
            credentials_env: "GEMINI_API_KEYS".to_string(),
            upstream_connect_timeout: 2,
            upstream_read_timeout: 5,
            log_level: "debug".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::parse_from(["lingua-proxy"]);
        assert_eq!(config.port, 8080);
        assert_eq!(config.credentials_env, "GEMINI_API_KEYS");
        assert!(config.upstream_url.contains("generativelanguage"));
    }

    #[test]
    fn test_config_overrides() {
        let config = Config::parse_from([
            "lingua-proxy",
            "--port",
            "9090",
            "--upstream-url",
            "http://localhost:1234",
        ]);
        assert_eq!(config.port, 9090);
        assert_eq!(config.upstream_url, "http://localhost:1234");
    }
}
