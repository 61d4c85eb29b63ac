//! CLI Exit Code Registry
//!
//! Single source of truth for the `telfill` exit codes. They are part of
//! the shell contract — batch scripts rely on them.
//!
//! | Code | Meaning                                            |
//! |------|----------------------------------------------------|
//! | 0    | Success                                            |
//! | 1    | General error (unspecified)                        |
//! | 2    | CLI usage error (bad args)                         |
//! | 3    | Invalid or unparseable run config                  |
//! | 4    | Required column missing (identifier or output)     |
//! | 5    | Runtime error (file read/write, CSV parse)         |

/// Success - run completed and the output file was written.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// Config file failed to parse or validate.
pub const EXIT_INVALID_CONFIG: u8 = 3;

/// A structurally required column is absent (master identifier under any
/// accepted alias, or a fixed output column). No output is produced.
pub const EXIT_MISSING_COLUMN: u8 = 4;

/// IO or parse failure reading inputs / writing the output.
pub const EXIT_RUNTIME: u8 = 5;
