//! Scheduler that only runs tasks when told to.

use std::collections::VecDeque;
use std::sync::Mutex;

use futures::future::BoxFuture;

use crate::trivia::scheduler::Scheduler;

struct Pending {
  delay_ticks: u64,
  task: BoxFuture<'static, ()>,
}

/// Records scheduled tasks with their requested delay. Tasks run in FIFO order
/// when the test calls `run_next`/`run_all`; the delay is only recorded.
#[derive(Default)]
pub struct ManualScheduler {
  queue: Mutex<VecDeque<Pending>>,
  history: Mutex<Vec<u64>>,
}

impl std::fmt::Debug for ManualScheduler {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ManualScheduler")
      .field("pending", &self.pending())
      .field("history", &self.history())
      .finish()
  }
}

impl ManualScheduler {
  pub fn new() -> Self {
    Self::default()
  }

  /// Tasks scheduled but not yet run.
  pub fn pending(&self) -> usize {
    self.queue.lock().unwrap().len()
  }

  /// Delays of the tasks still waiting, in FIFO order.
  pub fn pending_delays(&self) -> Vec<u64> {
    self.queue.lock().unwrap().iter().map(|p| p.delay_ticks).collect()
  }

  /// Delays of every task ever scheduled.
  pub fn history(&self) -> Vec<u64> {
    self.history.lock().unwrap().clone()
  }

  /// Runs the oldest pending task to completion. Returns false if none was pending.
  pub async fn run_next(&self) -> bool {
    let next = self.queue.lock().unwrap().pop_front();
    match next {
      Some(p) => {
        p.task.await;
        true
      }
      None => false,
    }
  }

  /// Runs pending tasks, including ones they schedule, up to `limit` tasks.
  /// Returns how many ran.
  pub async fn run_all(&self, limit: usize) -> usize {
    let mut ran = 0;
    while ran < limit && self.run_next().await {
      ran += 1;
    }
    ran
  }

  /// Drops every pending task without running it.
  pub fn discard_pending(&self) {
    self.queue.lock().unwrap().clear();
  }
}

impl Scheduler for ManualScheduler {
  fn run_delayed(&self, task: BoxFuture<'static, ()>, delay_ticks: u64) {
    self.history.lock().unwrap().push(delay_ticks);
    self.queue.lock().unwrap().push_back(Pending { delay_ticks, task });
  }
}
