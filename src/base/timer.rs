use std::fmt;

/// A pending timer owned by a node.
///
/// Absolute time does not exist in the state graph; `remaining_time` only
/// lets protocols order their own timers.
pub trait Timer: TimerClone + fmt::Debug + Send + Sync {
    fn remaining_time(&self) -> i64;

    /// Let the timer elapse by `t`. All timers of a node should be advanced
    /// by the same amount.
    fn wait(&mut self, t: i64);
}

pub trait TimerClone {
    fn clone_box(&self) -> Box<dyn Timer>;
}

impl<T: Timer + Clone + 'static> TimerClone for T {
    fn clone_box(&self) -> Box<dyn Timer> {
        Box::new(self.clone())
    }
}

impl Clone for Box<dyn Timer> {
    fn clone(&self) -> Self {
        (**self).clone_box()
    }
}
