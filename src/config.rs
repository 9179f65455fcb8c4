// Process-wide configuration, read once at startup and immutable afterwards.
// CLI flags win over environment variables; a missing OPENAI_API_KEY is not
// an error, it degrades completion-dependent endpoints instead.

use clap::Parser;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;

#[derive(Parser, Debug, Default)]
#[clap(name = "ambient-server", about = "Location-aware playlist recommendation API")]
pub struct CliArgs {
    /// Address to bind to (overrides AMBIENT_HOST)
    #[clap(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides AMBIENT_PORT)
    #[clap(long)]
    pub port: Option<u16>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub openai_api_key: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            openai_api_key: None,
        }
    }
}

impl AppConfig {
    pub fn from_env(args: &CliArgs) -> Self {
        let host = args
            .host
            .clone()
            .or_else(|| std::env::var("AMBIENT_HOST").ok())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = args
            .port
            .or_else(|| {
                std::env::var("AMBIENT_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
            })
            .unwrap_or(DEFAULT_PORT);
        // An empty key counts as unset, like the original backend
        let openai_api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());

        AppConfig {
            host,
            port,
            openai_api_key,
        }
    }

    pub fn openai_configured(&self) -> bool {
        self.openai_api_key.is_some()
    }
}
