/// Scheduler: every timer the game runs, on one simulated clock.
///
/// Timers are named by `TimerId`. At most one timer per name exists;
/// scheduling a name again replaces the pending one, which is how a
/// second power pellet restarts the scare window.
///
/// The owner drives time forward with `pop_due(until)` in a loop,
/// handling each fired id before asking for the next one. A timer
/// cancelled while handling an earlier one therefore never fires.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TimerId {
    /// Recurring: the ghost at this roster index takes a step.
    Ghost(usize),
    /// One-shot: scared ghosts turn back to normal.
    ScareExpiry,
    /// One-shot: intro finished, the round begins.
    RoundStart,
    /// One-shot: game-over pause finished, back to Ready.
    RoundReset,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Timer {
    id: TimerId,
    due_ms: u64,
    period_ms: Option<u64>,
    seq: u64, // scheduling order, breaks ties between equal due times
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Scheduler {
    now_ms: u64,
    timers: Vec<Timer>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Scheduler::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Fire `id` once, `delay_ms` from now.
    pub fn schedule_once(&mut self, id: TimerId, delay_ms: u64) {
        self.insert(id, delay_ms, None);
    }

    /// Fire `id` every `period_ms`, first time one period from now.
    pub fn schedule_every(&mut self, id: TimerId, period_ms: u64) {
        // A zero period would fire forever within a single advance.
        let period_ms = period_ms.max(1);
        self.insert(id, period_ms, Some(period_ms));
    }

    fn insert(&mut self, id: TimerId, delay_ms: u64, period_ms: Option<u64>) {
        self.cancel(id);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.push(Timer {
            id,
            due_ms: self.now_ms + delay_ms,
            period_ms,
            seq,
        });
    }

    /// Returns true if a pending timer was removed.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    pub fn cancel_where(&mut self, mut pred: impl FnMut(TimerId) -> bool) {
        self.timers.retain(|t| !pred(t.id));
    }

    pub fn cancel_all(&mut self) {
        self.timers.clear();
    }

    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    /// Milliseconds until `id` next fires.
    pub fn remaining_ms(&self, id: TimerId) -> Option<u64> {
        self.timers
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.due_ms.saturating_sub(self.now_ms))
    }

    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    /// Fire the earliest timer due at or before `until_ms`.
    /// The clock moves to that timer's due time; recurring timers are
    /// re-armed one period later, one-shots are removed.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<TimerId> {
        let idx = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_ms <= until_ms)
            .min_by_key(|(_, t)| (t.due_ms, t.seq))
            .map(|(i, _)| i)?;

        let due = self.timers[idx].due_ms;
        self.now_ms = self.now_ms.max(due);
        let id = self.timers[idx].id;

        match self.timers[idx].period_ms {
            Some(period) => {
                let seq = self.next_seq;
                self.next_seq += 1;
                let t = &mut self.timers[idx];
                t.due_ms = due + period;
                t.seq = seq;
            }
            None => {
                self.timers.swap_remove(idx);
            }
        }
        Some(id)
    }

    /// Move the clock to `until_ms` once nothing more is due.
    pub fn settle(&mut self, until_ms: u64) {
        self.now_ms = self.now_ms.max(until_ms);
    }
}
