//! Cancelable scheduled tasks on the simulation clock
//!
//! Each task is keyed by its purpose. Scheduling a key that is already
//! pending replaces it in place, so there is never more than one timer per
//! purpose. Tasks are pulled one at a time with [`Timers::next_due`], which
//! means a handler that cancels or replaces another task takes effect before
//! that task could fire in the same tick.

use std::collections::HashMap;

use super::entity::EntityId;
use super::powerup::PowerUpKind;

/// What a scheduled task is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimerKey {
    /// Player auto-fire cadence
    PlayerShoot,
    /// Effect expiry for a collected power-up
    PowerUpExpiry(PowerUpKind),
    /// Uncollected pickup timeout
    Despawn(EntityId),
    /// Wave cadence
    Wave,
    /// One delayed batch of a wave, `count` enemies
    WaveBatch { wave: u32, batch: u32, count: u32 },
    /// Wave size ramp
    Difficulty,
    /// Carrier cadence (fixed interval or per-type check)
    Carrier,
    /// Boss cadence
    Boss,
}

impl TimerKey {
    /// Keys owned by the spawn scheduler
    pub fn is_spawner(&self) -> bool {
        matches!(
            self,
            TimerKey::Wave
                | TimerKey::WaveBatch { .. }
                | TimerKey::Difficulty
                | TimerKey::Carrier
                | TimerKey::Boss
        )
    }
}

#[derive(Debug, Clone, Copy)]
struct Scheduled {
    due_ms: u64,
    period_ms: Option<u64>,
    /// Scheduling order, breaks ties between equal due times
    seq: u64,
}

/// Set of pending tasks
#[derive(Debug, Default, Clone)]
pub struct Timers {
    tasks: HashMap<TimerKey, Scheduled>,
    next_seq: u64,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, key: TimerKey, due_ms: u64, period_ms: Option<u64>) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.tasks.insert(key, Scheduled { due_ms, period_ms, seq });
    }

    /// Fire `key` once, `delay_ms` after `now_ms`. Replaces any pending task with the same key.
    pub fn schedule_once(&mut self, key: TimerKey, now_ms: u64, delay_ms: u64) {
        self.insert(key, now_ms.saturating_add(delay_ms), None);
    }

    /// Fire `key` every `period_ms`, first at `now_ms + period_ms`. Replaces any pending task.
    pub fn schedule_every(&mut self, key: TimerKey, now_ms: u64, period_ms: u64) {
        let period_ms = if period_ms == 0 {
            log::warn!("Zero period for {:?}, using 1ms", key);
            1
        } else {
            period_ms
        };
        self.insert(key, now_ms.saturating_add(period_ms), Some(period_ms));
    }

    /// Cancel a task. Returns whether one was pending.
    pub fn cancel(&mut self, key: TimerKey) -> bool {
        self.tasks.remove(&key).is_some()
    }

    /// Cancel every task whose key matches `pred`, returning how many were removed
    pub fn cancel_where(&mut self, mut pred: impl FnMut(&TimerKey) -> bool) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|key, _| !pred(key));
        before - self.tasks.len()
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    pub fn is_scheduled(&self, key: TimerKey) -> bool {
        self.tasks.contains_key(&key)
    }

    /// When `key` fires next, if pending
    pub fn due_at(&self, key: TimerKey) -> Option<u64> {
        self.tasks.get(&key).map(|t| t.due_ms)
    }

    /// Time left before `key` fires
    pub fn remaining(&self, key: TimerKey, now_ms: u64) -> Option<u64> {
        self.due_at(key).map(|due| due.saturating_sub(now_ms))
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Pop the earliest task due at or before `until_ms`.
    ///
    /// Periodic tasks are rescheduled one period after their due time, so a
    /// period shorter than a tick fires several times within that tick, each
    /// with its own timestamp.
    pub fn next_due(&mut self, until_ms: u64) -> Option<(TimerKey, u64)> {
        let (key, task) = self
            .tasks
            .iter()
            .filter(|(_, t)| t.due_ms <= until_ms)
            .min_by_key(|(_, t)| (t.due_ms, t.seq))
            .map(|(k, t)| (*k, *t))?;

        match task.period_ms {
            Some(period) => {
                let seq = self.next_seq;
                self.next_seq += 1;
                self.tasks.insert(
                    key,
                    Scheduled {
                        due_ms: task.due_ms + period,
                        period_ms: Some(period),
                        seq,
                    },
                );
            }
            None => {
                self.tasks.remove(&key);
            }
        }

        Some((key, task.due_ms))
    }
}
