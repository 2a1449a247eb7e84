use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use log::debug;
use once_cell::sync::Lazy;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::Client;
use serde::Deserialize;

use crate::models::stream::StreamSummary;
use crate::models::user::BroadcasterIdentity;

const HELIX_BASE: &str = "https://api.twitch.tv/helix";
const PAGE_SIZE: usize = 100;

// One connection pool for every Helix call in the process.
static HTTP_CLIENT: Lazy<Client> = Lazy::new(Client::new);

/// One entry of a `GET /helix/streams` response, as it comes off the
/// wire. Fields the client does not consume are ignored by serde.
///
/// `started_at` is an RFC 3339 instant; a record with a malformed one
/// fails during deserialization, before any summary exists, and that
/// error reaches the caller untouched.
#[derive(Debug, Clone, Deserialize)]
pub struct HelixStream {
    pub user_id: String,
    pub user_login: String,
    pub user_name: String,
    #[serde(default)]
    pub game_name: Option<String>,
    pub viewer_count: u32,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HelixStreamsPage {
    data: Vec<HelixStream>,
}

impl From<HelixStream> for StreamSummary {
    fn from(stream: HelixStream) -> Self {
        StreamSummary {
            broadcaster: BroadcasterIdentity {
                id: stream.user_id,
                login: stream.user_login,
                display_name: stream.user_name,
            },
            game: stream.game_name,
            current_viewers: stream.viewer_count,
            preview_template: stream.thumbnail_url,
            started_at_ms: stream.started_at.timestamp_millis(),
            title: stream.title,
        }
    }
}

/// Thin Helix client for the streams endpoints. One page per call, no
/// retries: a failed poll is the caller's tick to skip.
pub struct HelixService {
    client_id: String,
}

impl HelixService {
    pub fn new(client_id: String) -> Self {
        Self { client_id }
    }

    /// Live streams for the given logins. Logins that are offline (or
    /// unknown) simply produce no entry. Helix caps one request at 100
    /// logins; extras are dropped here rather than split into pages.
    pub async fn get_streams_by_login(
        &self,
        token: &str,
        logins: &[String],
    ) -> Result<Vec<StreamSummary>> {
        if logins.is_empty() {
            return Ok(Vec::new());
        }

        let query = logins
            .iter()
            .take(PAGE_SIZE)
            .map(|login| format!("user_login={}", urlencoding::encode(login)))
            .collect::<Vec<_>>()
            .join("&");
        let url = format!("{}/streams?first={}&{}", HELIX_BASE, PAGE_SIZE, query);

        let page = self.fetch_streams_page(token, &url).await?;
        Ok(page.data.into_iter().map(StreamSummary::from).collect())
    }

    /// Streams currently live among the channels `user_id` follows.
    pub async fn get_followed_streams(
        &self,
        token: &str,
        user_id: &str,
    ) -> Result<Vec<StreamSummary>> {
        let url = format!(
            "{}/streams/followed?user_id={}&first={}",
            HELIX_BASE,
            urlencoding::encode(user_id),
            PAGE_SIZE
        );

        let page = self.fetch_streams_page(token, &url).await?;
        Ok(page.data.into_iter().map(StreamSummary::from).collect())
    }

    async fn fetch_streams_page(&self, token: &str, url: &str) -> Result<HelixStreamsPage> {
        let response = HTTP_CLIENT
            .get(url)
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .header("Client-Id", &self.client_id)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("Helix returned {} for {}", response.status(), url));
        }

        let page = response.json::<HelixStreamsPage>().await?;
        debug!("[Helix] {} -> {} streams", url, page.data.len());
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // A realistic Helix payload, extra fields and all.
    const STREAMS_PAYLOAD: &str = r#"{
        "data": [
            {
                "id": "40952121085",
                "user_id": "101051819",
                "user_login": "examplestreamer",
                "user_name": "exampleStreamer",
                "game_id": "263490",
                "game_name": "Rust",
                "type": "live",
                "title": "Rust systems design stream",
                "viewer_count": 5000,
                "started_at": "2020-01-01T00:00:00Z",
                "language": "en",
                "thumbnail_url": "https://static-cdn.jtvnw.net/previews-ttv/live_user_examplestreamer-{width}x{height}.jpg",
                "tag_ids": [],
                "is_mature": false
            }
        ],
        "pagination": {}
    }"#;

    #[test]
    fn adapts_a_helix_record_verbatim() {
        let page: HelixStreamsPage = serde_json::from_str(STREAMS_PAYLOAD).unwrap();
        let stream = page.data.into_iter().next().unwrap();
        let summary = StreamSummary::from(stream);

        assert_eq!(summary.broadcaster.id, "101051819");
        assert_eq!(summary.broadcaster.login, "examplestreamer");
        assert_eq!(summary.broadcaster.display_name, "exampleStreamer");
        assert_eq!(summary.game.as_deref(), Some("Rust"));
        assert_eq!(summary.current_viewers, 5000);
        assert_eq!(summary.title.as_deref(), Some("Rust systems design stream"));
        assert_eq!(
            summary.preview_url(440, 248).as_deref(),
            Some("https://static-cdn.jtvnw.net/previews-ttv/live_user_examplestreamer-440x248.jpg")
        );
        // 2020-01-01T00:00:00Z as epoch milliseconds.
        assert_eq!(summary.started_at_ms, 1_577_836_800_000);
    }

    #[test]
    fn absent_optionals_become_none() {
        let record = r#"{
            "user_id": "1",
            "user_login": "a",
            "user_name": "A",
            "viewer_count": 0,
            "started_at": "2020-01-01T00:00:00Z"
        }"#;
        let stream: HelixStream = serde_json::from_str(record).unwrap();
        let summary = StreamSummary::from(stream);

        assert_eq!(summary.game, None);
        assert_eq!(summary.title, None);
        assert_eq!(summary.preview_template, None);
        assert_eq!(summary.current_viewers, 0);
    }

    #[test]
    fn malformed_start_instant_fails_before_adaptation() {
        let record = r#"{
            "user_id": "1",
            "user_login": "a",
            "user_name": "A",
            "viewer_count": 10,
            "started_at": "not-a-timestamp"
        }"#;
        assert!(serde_json::from_str::<HelixStream>(record).is_err());
    }
}
