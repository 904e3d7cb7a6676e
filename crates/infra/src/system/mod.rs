use chrono::Utc;

/// Clock seam. Delivery windows and the status transitions all read time
/// through this, so tests can pin or advance the clock.
pub trait ISys: Send + Sync {
    /// Current unix timestamp in millis
    fn get_timestamp_millis(&self) -> i64;
}

/// Wall clock, the only implementation outside of tests
pub struct RealSys {}
impl ISys for RealSys {
    fn get_timestamp_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}
