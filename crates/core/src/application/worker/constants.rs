// Worker constants (no magic values)

/// Default maximum number of messages per receive call
pub const DEFAULT_MAX_MESSAGES: i32 = 10;

/// Default server-side long-poll wait (seconds)
pub const DEFAULT_WAIT_TIME_SECONDS: i32 = 20;
