use std::thread;
use std::time::Duration;

use rand::Rng;

/// Upper bound (exclusive) of the uniform jitter added to every politeness
/// sleep, in seconds.
pub const JITTER_SECS: f64 = 3.0;

pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

impl<T: Sleeper + ?Sized> Sleeper for &T {
    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration);
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }
}

pub fn politeness_delay(base_secs: f64) -> Duration {
    let jitter = rand::thread_rng().gen_range(0.0..JITTER_SECS);
    Duration::from_secs_f64(base_secs.max(0.0) + jitter)
}
