/// Maximum length of a checkout's client code.
pub const MAX_CLIENT_CODE_LEN: usize = 4;

/// Notifications kept on a session before the oldest are dropped.
pub const MAX_PENDING_NOTIFICATIONS: usize = 64;
