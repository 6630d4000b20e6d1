/// Constants used throughout the buildenv codebase
// Input files
pub const DEFAULT_VARIABLES_FILE: &str = "variables.yml";
pub const SETTINGS_FILENAME: &str = ".buildenv.yaml";

// Environment variable names
pub const BUILDENV_LOG_VAR: &str = "BUILDENV_LOG";
pub const ENVIRONMENT_VAR: &str = "ENVIRONMENT";
pub const DATACENTER_VAR: &str = "DATACENTER";
pub const VARIABLES_FILE_VAR: &str = "VARIABLES_FILE";
pub const SHELL_VAR: &str = "SHELL";

// Fallback shell invocation when $SHELL is unset
pub const FALLBACK_SHELL: &[&str] = &["/usr/bin/env", "bash"];

// Field read by simple secret declarations
pub const SIMPLE_SECRET_FIELD: &str = "value";

// Scope comments
pub const GLOBAL_SCOPE_COMMENT: &str = "Global Variables";

// Process exit codes
pub const EXIT_CONFIGURATION: i32 = 2;
pub const EXIT_FILE_UNREADABLE: i32 = 4;
pub const EXIT_BAD_INPUT: i32 = 5;
pub const EXIT_STORE: i32 = 6;
pub const EXIT_NOT_FOUND: i32 = 7;
pub const EXIT_SERIALIZATION: i32 = 8;
pub const EXIT_MLOCK: i32 = 9;

// Returned by the exec sink when the child could not be started
pub const EXEC_START_FAILED: i32 = -1;
