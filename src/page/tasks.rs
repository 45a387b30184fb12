//! Deferred work that must observe the end of the current synchronous handler.
//!
//! Tasks scheduled during a dispatch run on the next [`TaskQueue::take_tick`]
//! batch, never inside the dispatch that scheduled them.

use std::collections::VecDeque;

use kuchiki::NodeRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

impl TaskId {
    pub fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusReason {
    /// A lower dialog became the top of the stack.
    NextDialog,
    /// The stack emptied; focus returns to whatever opened the dialog.
    Opener,
}

#[derive(Debug, Clone)]
pub enum DeferredTask {
    Focus { node: NodeRef, reason: FocusReason },
}

#[derive(Debug)]
pub struct ScheduledTask {
    pub id: TaskId,
    pub task: DeferredTask,
}

#[derive(Debug)]
pub struct TaskQueue {
    next_id: u64,
    pending: VecDeque<ScheduledTask>,
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskQueue {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            pending: VecDeque::new(),
        }
    }

    pub fn schedule(&mut self, task: DeferredTask) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1).max(1);
        self.pending.push_back(ScheduledTask { id, task });
        id
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Removes everything queued so far, in scheduling order. Tasks scheduled
    /// while the returned batch runs land in the following tick.
    pub fn take_tick(&mut self) -> Vec<ScheduledTask> {
        self.pending.drain(..).collect()
    }

    pub fn pending(&self) -> impl Iterator<Item = &ScheduledTask> {
        self.pending.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kuchiki::traits::*;

    #[test]
    fn ticks_drain_in_order() {
        let doc = kuchiki::parse_html().one("<p>x</p>");
        let mut queue = TaskQueue::new();
        let first = queue.schedule(DeferredTask::Focus {
            node: doc.clone(),
            reason: FocusReason::Opener,
        });
        let second = queue.schedule(DeferredTask::Focus {
            node: doc,
            reason: FocusReason::NextDialog,
        });
        assert!(first < second);
        assert_eq!(queue.len(), 2);

        let batch = queue.take_tick();
        assert_eq!(batch.iter().map(|t| t.id).collect::<Vec<_>>(), vec![first, second]);
        assert!(queue.is_empty());
    }
}
