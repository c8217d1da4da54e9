//! Deferred work for the single-threaded event loop.
//!
//! Tasks run in FIFO order on the next [`Scheduler::run_pending`] call. A
//! task must check that whatever it touches is still alive; disposal can
//! happen between posting and running.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;

type Task = Box<dyn FnOnce()>;

/// FIFO queue of tasks deferred to the next event loop iteration.
#[derive(Default)]
pub struct Scheduler {
    queue: RefCell<VecDeque<Task>>,
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("pending", &self.pending())
            .finish()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a task behind everything already posted.
    pub fn post(&self, task: impl FnOnce() + 'static) {
        self.queue.borrow_mut().push_back(Box::new(task));
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Run the tasks that were queued when the call started. Tasks posted
    /// while running wait for the next call. Returns the number run.
    pub fn run_pending(&self) -> usize {
        let batch = self.pending();
        let mut ran = 0;
        for _ in 0..batch {
            // Release the borrow before running so the task may post again.
            let task = self.queue.borrow_mut().pop_front();
            let Some(task) = task else {
                break;
            };
            task();
            ran += 1;
        }
        ran
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn test_fifo_order() {
        let scheduler = Scheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        for i in 0..3 {
            let log = Rc::clone(&log);
            scheduler.post(move || log.borrow_mut().push(i));
        }
        assert_eq!(scheduler.run_pending(), 3);
        assert_eq!(*log.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn test_reposted_task_waits_for_next_run() {
        let scheduler = Rc::new(Scheduler::new());
        let hits = Rc::new(RefCell::new(0));
        {
            let inner = Rc::clone(&scheduler);
            let hits = Rc::clone(&hits);
            scheduler.post(move || {
                let hits = Rc::clone(&hits);
                inner.post(move || *hits.borrow_mut() += 1);
            });
        }
        assert_eq!(scheduler.run_pending(), 1);
        assert_eq!(*hits.borrow(), 0);
        assert_eq!(scheduler.run_pending(), 1);
        assert_eq!(*hits.borrow(), 1);
    }
}
