use serde::{Deserialize, Serialize};

/// Identity of a content creator: the stable platform id plus the two
/// name forms Helix hands out. Treated as opaque by everything that
/// carries one.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BroadcasterIdentity {
    pub id: String,
    pub login: String,
    pub display_name: String,
}
