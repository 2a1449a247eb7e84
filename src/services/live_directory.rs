use std::collections::{HashMap, HashSet};

use log::debug;

use crate::models::stream::StreamSummary;

/// What changed between two consecutive polls.
#[derive(Debug, Default)]
pub struct PollDelta {
    pub went_live: Vec<StreamSummary>,
    pub went_offline: Vec<StreamSummary>,
}

/// The set of currently-live broadcasts, keyed by broadcaster id.
///
/// The directory owns the refresh cycle for the mutable summary
/// fields: a poll never replaces a tracked summary, it copies `game`,
/// `current_viewers` and `title` onto the entry already there, so the
/// identity, preview template and start time survive every refresh.
///
/// No internal locking. Whoever owns the directory serializes access.
#[derive(Debug, Default)]
pub struct LiveDirectory {
    streams: HashMap<String, StreamSummary>,
}

impl LiveDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconcile one poll result against the tracked set.
    pub fn apply_poll(&mut self, polled: Vec<StreamSummary>) -> PollDelta {
        let mut delta = PollDelta::default();
        let mut seen: HashSet<String> = HashSet::with_capacity(polled.len());

        for incoming in polled {
            seen.insert(incoming.broadcaster.id.clone());
            match self.streams.get_mut(&incoming.broadcaster.id) {
                Some(tracked) => {
                    tracked.game = incoming.game;
                    tracked.current_viewers = incoming.current_viewers;
                    tracked.title = incoming.title;
                }
                None => {
                    debug!("[LiveDirectory] {} went live", incoming.broadcaster.login);
                    self.streams
                        .insert(incoming.broadcaster.id.clone(), incoming.clone());
                    delta.went_live.push(incoming);
                }
            }
        }

        let offline_ids: Vec<String> = self
            .streams
            .keys()
            .filter(|id| !seen.contains(*id))
            .cloned()
            .collect();
        for id in offline_ids {
            if let Some(gone) = self.streams.remove(&id) {
                debug!("[LiveDirectory] {} went offline", gone.broadcaster.login);
                delta.went_offline.push(gone);
            }
        }

        delta
    }

    pub fn get(&self, broadcaster_id: &str) -> Option<&StreamSummary> {
        self.streams.get(broadcaster_id)
    }

    pub fn contains(&self, broadcaster_id: &str) -> bool {
        self.streams.contains_key(broadcaster_id)
    }

    pub fn len(&self) -> usize {
        self.streams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    /// Tracked streams, smallest audience first.
    pub fn by_viewers(&self) -> Vec<&StreamSummary> {
        let mut streams: Vec<&StreamSummary> = self.streams.values().collect();
        streams.sort_by(|a, b| a.viewer_order(b));
        streams
    }
}
