use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::models::user::BroadcasterIdentity;

/// Snapshot of one live broadcast's observable metadata.
///
/// Identity lives entirely in the broadcaster: two summaries are the
/// same stream when their broadcaster ids match, even if one copy
/// carries stale metadata. `game`, `current_viewers` and `title` are
/// refreshed in place between polls; the remaining fields are fixed for
/// the life of the broadcast. Nothing is validated at construction.
///
/// The struct has no internal locking. A summary mutated on one thread
/// while read on another can be observed torn; serializing access is
/// the owner's job.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct StreamSummary {
    pub broadcaster: BroadcasterIdentity,
    pub game: Option<String>,
    pub current_viewers: u32,
    pub preview_template: Option<String>,
    /// Broadcast start time, epoch milliseconds.
    pub started_at_ms: i64,
    pub title: Option<String>,
}

impl StreamSummary {
    /// Ascending viewer-count order.
    ///
    /// A weak ordering: ties are possible, and two summaries comparing
    /// `Equal` here are usually not `==`. That inconsistency is why
    /// this is a named comparator instead of an `Ord` impl. A display
    /// comparator that also weighs pinning lives with the list view,
    /// not here.
    pub fn viewer_order(&self, other: &StreamSummary) -> Ordering {
        self.current_viewers.cmp(&other.current_viewers)
    }

    /// Expand the `{width}`/`{height}` placeholders in the preview
    /// template into a fetchable image URL.
    pub fn preview_url(&self, width: u32, height: u32) -> Option<String> {
        self.preview_template.as_ref().map(|template| {
            template
                .replace("{width}", &width.to_string())
                .replace("{height}", &height.to_string())
        })
    }

    /// Serialize into the opaque blob used to hand a stream over to
    /// another window. The receiving side rebuilds an identical summary
    /// with [`StreamSummary::from_transfer_blob`].
    pub fn to_transfer_blob(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_transfer_blob(blob: &str) -> serde_json::Result<StreamSummary> {
        serde_json::from_str(blob)
    }
}

impl PartialEq for StreamSummary {
    fn eq(&self, other: &StreamSummary) -> bool {
        self.broadcaster.id == other.broadcaster.id
    }
}

impl Eq for StreamSummary {}

impl Hash for StreamSummary {
    // Must stay in lock-step with PartialEq: broadcaster id only.
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.broadcaster.id.hash(state);
    }
}

impl fmt::Display for StreamSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.broadcaster.display_name)
    }
}
