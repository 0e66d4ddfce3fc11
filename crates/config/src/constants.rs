/// Application constants
///
/// Event update interval in milliseconds. The popup is mostly static;
/// four ticks per second keeps the lockout countdown responsive.
pub const EVENT_HANDLER_INTERVAL_MS: u64 = 250;

/// Minimum terminal size the popup can be drawn in
pub const MIN_TERMINAL_WIDTH: u16 = 40;
pub const MIN_TERMINAL_HEIGHT: u16 = 10;
