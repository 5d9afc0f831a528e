//! Exit code constants for the shpfiles CLI.
//!
//! - 0: Success
//! - 1: User error (bad seed, bad config, local-only command on a URL)
//! - 2: I/O failure
//! - 4: Lock failure (contention or mismatched release)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, invalid seed or configuration.
pub const USER_ERROR: i32 = 1;

/// Underlying I/O failure: open, read, write, delete or advisory lock.
pub const IO_FAILURE: i32 = 2;

/// Lock failure: group lock busy or release without a matching acquisition.
pub const LOCK_FAILURE: i32 = 4;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct() {
        let codes = [SUCCESS, USER_ERROR, IO_FAILURE, LOCK_FAILURE];
        for (i, &a) in codes.iter().enumerate() {
            for (j, &b) in codes.iter().enumerate() {
                if i != j {
                    assert_ne!(a, b, "Exit codes must be distinct");
                }
            }
        }
    }
}
