//! Deferred work: next-frame callbacks and fixed-duration timers.
//!
//! The scheduler has no clock of its own. The host reports elapsed time
//! through [`Scheduler::advance`] and frame boundaries through
//! [`Scheduler::take_frame`], which keeps the whole pipeline deterministic.

use std::time::Duration;

/// Identifies the target a task belongs to, so a newer event can cancel
/// stale work for the same target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TaskKey {
    Transitions,
    NavScroll,
    DeepLink,
    Group(String),
}

/// Deferred work.
#[derive(Debug, Clone, PartialEq)]
pub enum Task {
    ResumeTransitions,
    /// Put the nav panel back at its last known offset, clamped to the new
    /// extent.
    RestoreNavScroll,
    /// Scroll a deep-link target into view once it is laid out.
    ScrollToRow { id: String },
    Highlight { id: String },
    FinishGroupAnimation { group: String },
    /// Bring an expanded group fully into the nav viewport.
    AutoScrollGroup { group: String },
}

#[derive(Debug)]
struct Timer {
    due: Duration,
    seq: u64,
    key: TaskKey,
    task: Task,
}

/// Pending frame callbacks and timers.
#[derive(Debug, Default)]
pub struct Scheduler {
    now: Duration,
    seq: u64,
    frame: Vec<(TaskKey, Task)>,
    timers: Vec<Timer>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `task` on the next frame, replacing any frame task with the same
    /// key.
    pub fn schedule_frame(&mut self, key: TaskKey, task: Task) {
        self.frame.retain(|(k, _)| *k != key);
        self.frame.push((key, task));
    }

    /// Runs `task` once `delay` has elapsed.
    pub fn schedule_after(&mut self, delay: Duration, key: TaskKey, task: Task) {
        self.seq += 1;
        self.timers.push(Timer {
            due: self.now + delay,
            seq: self.seq,
            key,
            task,
        });
    }

    /// Drops every pending frame task and timer with `key`.
    ///
    /// Returns the number of tasks cancelled.
    pub fn cancel(&mut self, key: &TaskKey) -> usize {
        let before = self.frame.len() + self.timers.len();
        self.frame.retain(|(k, _)| k != key);
        self.timers.retain(|t| t.key != *key);
        before - self.frame.len() - self.timers.len()
    }

    /// Takes the tasks queued for this frame, in scheduling order.
    pub fn take_frame(&mut self) -> Vec<Task> {
        std::mem::take(&mut self.frame)
            .into_iter()
            .map(|(_, task)| task)
            .collect()
    }

    /// Moves the clock forward and returns the timers that fell due, oldest
    /// deadline first.
    pub fn advance(&mut self, dt: Duration) -> Vec<Task> {
        self.now += dt;
        let now = self.now;
        let (mut due, pending): (Vec<Timer>, Vec<Timer>) =
            std::mem::take(&mut self.timers).into_iter().partition(|t| t.due <= now);
        self.timers = pending;
        due.sort_by_key(|t| (t.due, t.seq));
        due.into_iter().map(|t| t.task).collect()
    }

    /// Returns `true` if anything is queued with `key`.
    pub fn is_pending(&self, key: &TaskKey) -> bool {
        self.frame.iter().any(|(k, _)| k == key) || self.timers.iter().any(|t| t.key == *key)
    }

    /// Returns `true` if any frame task or timer is queued.
    pub fn has_pending(&self) -> bool {
        !self.frame.is_empty() || !self.timers.is_empty()
    }

    /// Time until the next timer falls due.
    pub fn next_due(&self) -> Option<Duration> {
        self.timers
            .iter()
            .map(|t| t.due.saturating_sub(self.now))
            .min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_frame_tasks_dedup_by_key() {
        let mut s = Scheduler::new();
        s.schedule_frame(TaskKey::DeepLink, Task::ScrollToRow { id: "a".into() });
        s.schedule_frame(TaskKey::Transitions, Task::ResumeTransitions);
        s.schedule_frame(TaskKey::DeepLink, Task::ScrollToRow { id: "b".into() });

        assert_eq!(
            s.take_frame(),
            [
                Task::ResumeTransitions,
                Task::ScrollToRow { id: "b".into() }
            ]
        );
        assert!(s.take_frame().is_empty());
    }

    #[test]
    fn test_timers_fire_in_deadline_order() {
        let mut s = Scheduler::new();
        s.schedule_after(ms(500), TaskKey::DeepLink, Task::Highlight { id: "late".into() });
        s.schedule_after(ms(70), TaskKey::DeepLink, Task::Highlight { id: "early".into() });

        assert!(s.advance(ms(69)).is_empty());
        assert_eq!(s.advance(ms(1)), [Task::Highlight { id: "early".into() }]);
        assert_eq!(s.next_due(), Some(ms(430)));
        assert_eq!(s.advance(ms(1000)), [Task::Highlight { id: "late".into() }]);
        assert!(!s.has_pending());
    }

    #[test]
    fn test_cancel_by_key() {
        let mut s = Scheduler::new();
        let group = TaskKey::Group("Magic Mods".into());
        s.schedule_after(ms(500), group.clone(), Task::AutoScrollGroup { group: "Magic Mods".into() });
        s.schedule_after(ms(500), TaskKey::DeepLink, Task::Highlight { id: "x".into() });

        assert_eq!(s.cancel(&group), 1);
        assert!(!s.is_pending(&group));
        assert_eq!(s.advance(ms(500)), [Task::Highlight { id: "x".into() }]);
    }
}
