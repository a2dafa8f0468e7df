/// Correlates a system time with a time instant.
///
/// Record headers carry nanosecond offsets relative to the anchor's instant;
/// the consumer combines them with the anchor's wall-clock half to recover
/// real timestamps.
#[derive(Debug, Clone)]
pub struct TimeAnchor {
    /// The system time.
    pub system_time: chrono::DateTime<chrono::Utc>,

    /// The time instant.
    pub instant: tokio::time::Instant,
}

impl TimeAnchor {
    pub fn new() -> Self {
        TimeAnchor {
            system_time: chrono::Utc::now(),
            instant: tokio::time::Instant::now(),
        }
    }

    /// The anchor's wall-clock time as Unix seconds and subsecond nanos.
    pub fn unix_parts(&self) -> (i64, i32) {
        (
            self.system_time.timestamp(),
            self.system_time.timestamp_subsec_nanos() as i32,
        )
    }

    /// Maps a header nanotime (offset from the anchor instant) to wall time.
    pub fn to_wall(&self, nanotime: i64) -> chrono::DateTime<chrono::Utc> {
        self.system_time + chrono::Duration::nanoseconds(nanotime)
    }
}

impl Default for TimeAnchor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_wall_offsets() {
        let anchor = TimeAnchor::new();
        assert_eq!(anchor.to_wall(0), anchor.system_time);
        let later = anchor.to_wall(1_500_000_000);
        assert_eq!((later - anchor.system_time).num_milliseconds(), 1500);
    }
}
