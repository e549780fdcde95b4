//! Delayed-task scheduling for background refills.
//!
//! The service never blocks a caller and never spawns threads itself; it hands
//! futures to a `Scheduler` together with a delay measured in ticks.

use std::time::Duration;

use futures::future::BoxFuture;
use tokio::runtime::Handle;

/// Scheduler granularity.
pub const TICK: Duration = Duration::from_millis(50);

/// Delay, in ticks, that means "as soon as possible but still asynchronous".
pub const MIN_DELAY_TICKS: u64 = 1;

/// Rounds `d` down to whole ticks, plus one so the task never fires early.
pub fn duration_to_ticks(d: Duration) -> u64 {
  (d.as_millis() / TICK.as_millis()) as u64 + 1
}

pub fn ticks_to_duration(ticks: u64) -> Duration {
  TICK * u32::try_from(ticks).unwrap_or(u32::MAX)
}

pub trait Scheduler: Send + Sync {
  /// Runs `task` once, after at least `delay_ticks` ticks.
  fn run_delayed(&self, task: BoxFuture<'static, ()>, delay_ticks: u64);
}

/// Runs tasks on a tokio runtime. Holding a `Handle` lets synchronous callers
/// outside the runtime schedule work.
#[derive(Clone, Debug)]
pub struct TokioScheduler {
  handle: Handle,
}

impl TokioScheduler {
  pub fn new(handle: Handle) -> Self {
    Self { handle }
  }

  /// Panics if called outside a tokio runtime.
  pub fn current() -> Self {
    Self::new(Handle::current())
  }
}

impl Scheduler for TokioScheduler {
  fn run_delayed(&self, task: BoxFuture<'static, ()>, delay_ticks: u64) {
    let delay = ticks_to_duration(delay_ticks);
    self.handle.spawn(async move {
      tokio::time::sleep(delay).await;
      task.await;
    });
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::atomic::{AtomicBool, Ordering};
  use std::sync::Arc;

  #[test]
  fn tick_conversion() {
    assert_eq!(duration_to_ticks(Duration::ZERO), 1);
    assert_eq!(duration_to_ticks(Duration::from_millis(49)), 1);
    assert_eq!(duration_to_ticks(Duration::from_millis(50)), 2);
    assert_eq!(duration_to_ticks(Duration::from_millis(4999)), 100);
    assert_eq!(ticks_to_duration(20), Duration::from_secs(1));
  }

  #[tokio::test(start_paused = true)]
  async fn tokio_scheduler_waits_for_delay() {
    let ran = Arc::new(AtomicBool::new(false));
    let flag = ran.clone();
    TokioScheduler::current().run_delayed(
      Box::pin(async move {
        flag.store(true, Ordering::SeqCst);
      }),
      10,
    );

    tokio::time::sleep(Duration::from_millis(400)).await;
    assert!(!ran.load(Ordering::SeqCst));
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(ran.load(Ordering::SeqCst));
  }
}
