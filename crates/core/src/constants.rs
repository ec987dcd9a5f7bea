/// Constants used throughout the flexlayout codebase
// Environment variable names
pub const FLEXLAYOUT_LOG_VAR: &str = "FLEXLAYOUT_LOG";
pub const ON_RELEASE_FAILURE_VAR: &str = "FLEXLAYOUT_JNI_ON_RELEASE_FAILURE";

// Default log filter when neither RUST_LOG nor FLEXLAYOUT_LOG is set
pub const DEFAULT_LOG_FILTER: &str = "info";

// JNI operation names used in error reports
pub const OP_GET_ENV: &str = "GetEnv";
pub const OP_DELETE_GLOBAL_REF: &str = "DeleteGlobalRef";
