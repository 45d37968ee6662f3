/// Project and reserved-name constants shared by the catalog and the fix set

// Projects with built-in fixes
pub const CMIP5: &str = "CMIP5";

/// Catalog name of the fix applied to every variable of a model
pub const ALL_VARIABLES: &str = "allvars";

// Fixed file naming
pub const FIXED_TOKEN_LEN: usize = 8;
pub const FIXED_TOKEN_ATTEMPTS: usize = 100;

// Default locations
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
pub const DEFAULT_LOG_FILE: &str = "cmor_fixes.log";
pub const DEFAULT_LOG_FILTER: &str = "cmor_fixes=info";
