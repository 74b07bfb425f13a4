use crate::base::Timer;

/// Interval between two retries of the client.
pub const RETRY_TIME: i64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PingTimer {
    remain: i64,
}

impl PingTimer {
    pub fn new() -> Self {
        PingTimer { remain: RETRY_TIME }
    }

    pub fn reset(&mut self) {
        self.remain = RETRY_TIME;
    }
}

impl Default for PingTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer for PingTimer {
    fn remaining_time(&self) -> i64 {
        self.remain
    }

    fn wait(&mut self, t: i64) {
        self.remain = (self.remain - t).max(0);
    }
}
