//! Object Aggregator: tally list, total, announcement text, poll gate
//!
//! Each successful poll replaces the tally wholesale. Rows are ordered by
//! descending count; equal counts keep label order (stable sort over a
//! sorted map).

use tracing::debug;

use crate::types::{ObjectCounts, ObjectEntry, ObjectTally, UiIntent};
use crate::OBJECT_POLL_INTERVAL_MS;

/// Sort counts into display rows and sum the total
pub fn aggregate(counts: &ObjectCounts) -> ObjectTally {
    let mut entries: Vec<ObjectEntry> = counts
        .iter()
        .map(|(label, count)| ObjectEntry {
            label: label.to_string(),
            count,
        })
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    let total = entries.iter().map(|entry| u64::from(entry.count)).sum();
    ObjectTally { entries, total }
}

/// Spoken text for a tally, `None` when there is nothing to say
pub fn announcement_text(tally: &ObjectTally) -> Option<String> {
    match tally.entries.as_slice() {
        [] => None,
        [only] => Some(format!("{} detected", only.label)),
        _ => {
            let labels: Vec<&str> = tally.labels().collect();
            Some(format!("Multiple objects detected: {}", labels.join(", ")))
        }
    }
}

/// Holds the latest tally and turns polls into intents
#[derive(Debug, Clone, Default)]
pub struct ObjectAggregator {
    current: ObjectTally,
}

impl ObjectAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the tally with this poll's counts
    pub fn on_poll(&mut self, counts: &ObjectCounts) -> (ObjectTally, UiIntent) {
        self.current = aggregate(counts);
        debug!(
            labels = self.current.entries.len(),
            total = self.current.total,
            "object tally updated"
        );
        let intent = UiIntent::RenderObjects {
            entries: self.current.entries.clone(),
            total: self.current.total,
        };
        (self.current.clone(), intent)
    }

    pub fn current(&self) -> &ObjectTally {
        &self.current
    }
}

/// Per-frame self-check for the object poller.
///
/// A request is due once `min_interval_ms` has passed since the issue time of
/// the last successful update and no request is in flight. Failures leave the
/// update time alone, so the next frame tries again.
#[derive(Debug, Clone)]
pub struct ObjectPollGate {
    min_interval_ms: u64,
    last_update_ms: Option<u64>,
    in_flight_since: Option<u64>,
}

impl Default for ObjectPollGate {
    fn default() -> Self {
        Self::new(OBJECT_POLL_INTERVAL_MS)
    }
}

impl ObjectPollGate {
    pub fn new(min_interval_ms: u64) -> Self {
        Self {
            min_interval_ms,
            last_update_ms: None,
            in_flight_since: None,
        }
    }

    /// Frame callback: should a request be issued at `now_ms`?
    pub fn tick(&mut self, now_ms: u64) -> bool {
        if self.in_flight_since.is_some() {
            return false;
        }
        let due = match self.last_update_ms {
            Some(at) => now_ms.saturating_sub(at) >= self.min_interval_ms,
            None => true,
        };
        if due {
            self.in_flight_since = Some(now_ms);
        }
        due
    }

    /// The request issued at the last due `tick` finished
    pub fn complete(&mut self, success: bool) {
        if let Some(issued_at) = self.in_flight_since.take() {
            if success {
                self.last_update_ms = Some(issued_at);
            }
        }
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight_since.is_some()
    }

    pub fn last_update_ms(&self) -> Option<u64> {
        self.last_update_ms
    }
}
