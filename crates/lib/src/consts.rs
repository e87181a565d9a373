/// Application name, used for temporary directory prefixes and log targets.
pub const APP_NAME: &str = "saltsolo";

/// Subdirectory of the sandbox that receives the contents of `data_path`.
pub const SANDBOX_DATA_DIR: &str = "data";

/// Extension directories copied from the project root into the file root
/// when they exist (custom execution modules, states, grains, renderers
/// and returners).
pub const EXTENSION_DIRS: [&str; 5] = ["_modules", "_states", "_grains", "_renderers", "_returners"];

/// Oldest `salt-call` release whose exit code can be trusted with
/// `--retcode-passthrough`. Anything at or below it misreports failures.
pub const RETCODE_PASSTHROUGH_VERSION: &str = "0.17.5";

/// Pattern that marks a failed state in `salt-call` output.
pub const FAILURE_PATTERN: &str = "Result.*False";

/// File the run script tees `salt-call` output into on the target.
pub const RUN_OUTPUT_FILE: &str = "/tmp/salt-call-output";

/// Exit status used by the install script for a missing or mismatched agent.
pub const INSTALL_FAILURE_EXIT: i32 = 2;
