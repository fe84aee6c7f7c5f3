use secrecy::Secret;
use serde::Deserialize;

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub upstream: UpstreamSettings,
    /// Invocation ARN of the hosting runtime, when the platform provides one.
    #[serde(default)]
    pub invocation_arn: Option<String>,
}

#[derive(Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Deserialize, Clone)]
pub struct UpstreamSettings {
    /// Base URL of the text-generation service. Required; startup aborts
    /// without it.
    pub base_url: String,
    /// Bearer token for the upstream, when it requires one.
    #[serde(default)]
    pub api_key: Option<Secret<String>>,
    #[serde(default = "default_generate_timeout_secs")]
    pub generate_timeout_secs: u64,
    #[serde(default = "default_health_timeout_secs")]
    pub health_timeout_secs: u64,
}

fn default_generate_timeout_secs() -> u64 {
    60
}

fn default_health_timeout_secs() -> u64 {
    5
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().expect("Failed to determine the current directory");

    // Check if we're already in relay-service directory or need to navigate to it
    let configuration_directory = if base_path.ends_with("relay-service") {
        base_path.join("config")
    } else {
        base_path.join("relay-service").join("config")
    };

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")).required(true))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}

/// Extract the region from an `arn:aws:lambda:<region>:...` style invocation
/// ARN. Anything that does not look like one falls back to `us-east-1`.
pub fn region_from_arn(arn: &str) -> String {
    arn.strip_prefix("arn:aws:lambda:")
        .and_then(|rest| rest.split(':').next())
        .filter(|region| !region.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| "us-east-1".to_string())
}
