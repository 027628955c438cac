use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub port: u16,

    // Admin surface; `None` disables it
    pub admin_api_key: Option<String>,

    // Optional JSON file loaded into the store at startup
    pub seed_file: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            port: match std::env::var("PORT") {
                Ok(raw) => raw
                    .parse()
                    .context(format!("PORT must be a valid port number, got '{}'", raw))?,
                Err(_) => 8080,
            },

            admin_api_key: non_empty_var("ADMIN_API_KEY"),

            seed_file: non_empty_var("SEED_FILE"),
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
