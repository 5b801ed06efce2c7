#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// The run completed (or was stopped). Blocked and failed requests are informational.
    Success = 0,

    /// Invalid CLI/config (bad flags, zero workers or requests, negative interval, bad URL).
    InvalidInput = 30,

    /// Internal/runtime error (task join failures, signal handler setup).
    RuntimeError = 40,
}

impl ExitCode {
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}
