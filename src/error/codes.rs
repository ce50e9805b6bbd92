/// Error code registry for koscreen
///
/// Error codes are organized by category:
/// - 1000-1999: Configuration errors
/// - 2000-2999: Input table errors
/// - 3000-3999: Filesystem errors
/// - 4000-4999: Execution errors
#[allow(dead_code)]
pub struct ErrorCode;

impl ErrorCode {
    // Configuration errors (1000-1999)
    pub const CONFIG_GENERIC: u16 = 1000;
    pub const CONFIG_NOT_FOUND: u16 = 1001;
    pub const CONFIG_INVALID_TOML: u16 = 1002;
    pub const CONFIG_INVALID_VALUE: u16 = 1003;

    // Input table errors (2000-2999)
    pub const INPUT_GENERIC: u16 = 2000;
    pub const INPUT_NOT_FOUND: u16 = 2001;
    pub const INPUT_MISSING_COLUMNS: u16 = 2002;
    pub const INPUT_MALFORMED_ROW: u16 = 2003;

    // Filesystem errors (3000-3999)
    pub const IO_GENERIC: u16 = 3000;
    pub const IO_CREATE_DIR: u16 = 3001;
    pub const IO_WRITE_FAILED: u16 = 3002;
    pub const IO_READ_DIR: u16 = 3003;

    // Execution errors (4000-4999)
    pub const EXEC_GENERIC: u16 = 4000;
    pub const EXEC_COMMAND_NOT_FOUND: u16 = 4001;
    pub const EXEC_TIMEOUT: u16 = 4002;
    pub const EXEC_SUBPROCESS_FAILED: u16 = 4003;
    pub const EXEC_SPAWN_FAILED: u16 = 4007;
}

/// Get a human-readable description for an error code
pub fn describe_error_code(code: u16) -> &'static str {
    match code {
        ErrorCode::CONFIG_GENERIC => "Configuration error",
        ErrorCode::CONFIG_NOT_FOUND => "Configuration file not found",
        ErrorCode::CONFIG_INVALID_TOML => "Configuration file is not valid TOML",
        ErrorCode::CONFIG_INVALID_VALUE => "Invalid configuration value",

        ErrorCode::INPUT_GENERIC => "Input table error",
        ErrorCode::INPUT_NOT_FOUND => "Input table not found",
        ErrorCode::INPUT_MISSING_COLUMNS => "Required columns missing from input table",
        ErrorCode::INPUT_MALFORMED_ROW => "Malformed row in input table",

        ErrorCode::IO_GENERIC => "Filesystem error",
        ErrorCode::IO_CREATE_DIR => "Failed to create directory",
        ErrorCode::IO_WRITE_FAILED => "Failed to write output file",
        ErrorCode::IO_READ_DIR => "Failed to list directory",

        ErrorCode::EXEC_GENERIC => "Execution error",
        ErrorCode::EXEC_COMMAND_NOT_FOUND => "External command not found",
        ErrorCode::EXEC_TIMEOUT => "External command timed out",
        ErrorCode::EXEC_SUBPROCESS_FAILED => "External command exited with a failure status",
        ErrorCode::EXEC_SPAWN_FAILED => "Failed to spawn external command",

        _ => "Unknown error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_known_codes() {
        assert_eq!(
            describe_error_code(ErrorCode::INPUT_MISSING_COLUMNS),
            "Required columns missing from input table"
        );
        assert_eq!(
            describe_error_code(ErrorCode::EXEC_SUBPROCESS_FAILED),
            "External command exited with a failure status"
        );
    }

    #[test]
    fn test_describe_unknown_code() {
        assert_eq!(describe_error_code(9999), "Unknown error");
    }
}
