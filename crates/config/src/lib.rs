//! Configuration for the slack-mcp server.
//!
//! Config files are discovered project-local first, then user-global, in
//! TOML/YAML/JSON. `${ENV_VAR}` placeholders are substituted before parsing,
//! and the well-known `SLACK_MCP_*` environment variables overlay whatever
//! the file left unset, so a bare environment-only deployment needs no file
//! at all.

pub mod env_subst;
pub mod loader;
pub mod schema;
pub mod validate;

pub use env_subst::substitute_env;
pub use loader::{config_dir, discover_and_load, load_config};
pub use schema::{AuthConfig, CacheConfig, HistoryConfig, SlackMcpConfig};
pub use validate::validate;
