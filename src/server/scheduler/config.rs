pub mod watchdog {
    /// Cron expression for the lease watchdog
    /// Runs every 5 minutes (00:00, 00:05, 00:10, etc.)
    pub const CRON_EXPRESSION: &str = "0 */5 * * * *";
}
