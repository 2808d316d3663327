//! Wire constants and well-known identifiers

/// Wildcard marker on either axis of a permission ("all resources" / "all actions")
pub const WILDCARD: &str = "*";

/// Separator between resource and action in the text form `resource:action`
pub const SEPARATOR: char = ':';

/// Action that gates the others under the read-gated edit policy
pub const READ_ACTION: &str = "read";

// Environment variables read by `Config::from_env`
pub const ENV_API_URL: &str = "ROLEGATE_API_URL";
pub const ENV_API_TOKEN: &str = "ROLEGATE_API_TOKEN";
pub const ENV_CACHE_DIR: &str = "ROLEGATE_CACHE_DIR";
pub const ENV_LABELS: &str = "ROLEGATE_LABELS";
pub const ENV_EDIT_POLICY: &str = "ROLEGATE_EDIT_POLICY";
pub const ENV_TIMEOUT_SECS: &str = "ROLEGATE_TIMEOUT_SECS";
pub const ENV_CACHE_TTL_SECS: &str = "ROLEGATE_CACHE_TTL_SECS";

pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// How long a cached catalog is served before it is fetched again
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

// LMDB sizing for the query cache
pub const CACHE_MAP_SIZE: usize = 64 << 20;
pub const CACHE_MAX_DBS: u32 = 3;
