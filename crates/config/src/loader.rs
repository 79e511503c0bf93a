use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{env_subst::substitute_env, schema::SlackMcpConfig};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &[
    "slack-mcp.toml",
    "slack-mcp.yaml",
    "slack-mcp.yml",
    "slack-mcp.json",
];

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> anyhow::Result<SlackMcpConfig> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    let raw = substitute_env(&raw);
    parse_config(&raw, path)
}

/// Discover and load config from standard locations, then overlay the
/// `SLACK_MCP_*` environment variables.
///
/// Search order:
/// 1. `./slack-mcp.{toml,yaml,yml,json}` (project-local)
/// 2. `~/.config/slack-mcp/slack-mcp.{toml,yaml,yml,json}` (user-global)
///
/// Returns defaults (plus the environment overlay) if no file is found, so
/// an environment-only deployment works without any file on disk.
pub fn discover_and_load() -> SlackMcpConfig {
    let mut config = match find_config_file() {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            match load_config(&path) {
                Ok(cfg) => cfg,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
                    SlackMcpConfig::default()
                },
            }
        },
        None => {
            debug!("no config file found, using defaults");
            SlackMcpConfig::default()
        },
    };
    config.overlay_env();
    config
}

/// Find the first config file in standard locations.
fn find_config_file() -> Option<PathBuf> {
    // Project-local
    for name in CONFIG_FILENAMES {
        let p = PathBuf::from(name);
        if p.exists() {
            return Some(p);
        }
    }

    // User-global: ~/.config/slack-mcp/
    if let Some(dir) = config_dir() {
        for name in CONFIG_FILENAMES {
            let p = dir.join(name);
            if p.exists() {
                return Some(p);
            }
        }
    }

    None
}

/// Returns the user-global config directory (`~/.config/slack-mcp/`).
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "slack-mcp").map(|d| d.config_dir().to_path_buf())
}

fn parse_config(raw: &str, path: &Path) -> anyhow::Result<SlackMcpConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => Ok(toml::from_str(raw)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        _ => anyhow::bail!("unsupported config format: .{ext}"),
    }
}
