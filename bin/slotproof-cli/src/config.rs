// SPDX-License-Identifier: MIT
use std::path::PathBuf;

use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    pub rpc_url: Option<String>,
}

fn config_path() -> Option<PathBuf> {
    dirs_next::home_dir().map(|h| h.join(".slotproof").join("config.toml"))
}

pub fn load_config() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };
    if !path.exists() {
        return Config::default();
    }
    match std::fs::read_to_string(&path) {
        Ok(contents) => toml::from_str(&contents).unwrap_or_default(),
        Err(_) => Config::default(),
    }
}

/// Resolve the RPC URL from CLI flag, environment variable, or config file.
pub fn resolve_rpc_url(cli_flag: Option<&str>) -> Result<String> {
    if let Some(url) = cli_flag.filter(|u| !u.is_empty()) {
        return Ok(url.to_string());
    }

    // Prefer the tool-specific env var, but also support the ubiquitous `RPC_URL`.
    for var in ["SLOTPROOF_RPC_URL", "RPC_URL"] {
        if let Ok(env_val) = std::env::var(var) {
            if !env_val.is_empty() {
                return Ok(env_val);
            }
        }
    }

    if let Some(url) = load_config().rpc_url {
        if !url.is_empty() {
            return Ok(url);
        }
    }

    anyhow::bail!(
        "No RPC URL provided. Use --rpc-url, SLOTPROOF_RPC_URL/RPC_URL env var, \
         or ~/.slotproof/config.toml"
    )
}
