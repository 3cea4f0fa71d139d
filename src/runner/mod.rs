//! Bounded worker pool for independent analysis units
//!
//! Each (system, mechanism, feature-group) combination is an independent
//! unit: it reads its own inputs and writes its own artifact, with no
//! shared mutable state. The pool runs the queued units on a bounded
//! number of worker threads and collects a per-unit outcome; one unit's
//! failure never halts or corrupts the others.

use crate::error::{Error, Result};
use std::collections::VecDeque;
use std::sync::Mutex;

/// One queued unit of work
pub struct Task {
    /// Display label, e.g. `"sysa r1ae fg3 gradients"`
    pub label: String,
    job: Box<dyn FnOnce() -> Result<()> + Send>,
}

impl Task {
    /// Build a task from a label and a job closure
    pub fn new(label: impl Into<String>, job: impl FnOnce() -> Result<()> + Send + 'static) -> Self {
        Self {
            label: label.into(),
            job: Box::new(job),
        }
    }
}

/// Outcome of one task
pub struct TaskReport {
    /// Label of the task that produced this outcome
    pub label: String,
    /// `Ok` or the unit's error
    pub outcome: Result<()>,
}

/// Fixed-size worker pool over a task queue
#[derive(Debug, Clone, Copy)]
pub struct TaskPool {
    workers: usize,
}

impl TaskPool {
    /// Pool with `workers` threads (at least one)
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    /// Run all tasks to completion and collect per-task reports
    ///
    /// Reports are returned in completion order, not submission order.
    pub fn run(&self, tasks: Vec<Task>) -> Vec<TaskReport> {
        let queue: Mutex<VecDeque<Task>> = Mutex::new(tasks.into());
        let reports: Mutex<Vec<TaskReport>> = Mutex::new(Vec::new());

        std::thread::scope(|scope| {
            for _ in 0..self.workers {
                scope.spawn(|| loop {
                    let task = match queue.lock() {
                        Ok(mut q) => q.pop_front(),
                        Err(_) => None,
                    };
                    let Some(task) = task else { break };

                    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(task.job))
                        .unwrap_or_else(|_| {
                            Err(Error::InvalidConfig(format!(
                                "task '{}' panicked",
                                task.label
                            )))
                        });

                    if let Ok(mut r) = reports.lock() {
                        r.push(TaskReport {
                            label: task.label,
                            outcome,
                        });
                    }
                });
            }
        });

        reports.into_inner().unwrap_or_default()
    }
}
