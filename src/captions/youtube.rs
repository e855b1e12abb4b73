//! YouTube caption tracks via the innertube player API.

use super::{CaptionProvider, CaptionSegment};
use crate::config::YoutubeSettings;
use crate::error::{Result, VidsumError};
use crate::http::build_client;
use async_trait::async_trait;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{debug, instrument};

static INNERTUBE_API_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""INNERTUBE_API_KEY":\s*"([a-zA-Z0-9_-]+)""#).expect("Invalid regex")
});

/// A caption track advertised by the player response.
#[derive(Debug, Clone, PartialEq)]
struct CaptionTrack {
    language_code: String,
    base_url: String,
    is_generated: bool,
}

/// Caption provider backed by youtube.com.
pub struct YoutubeCaptions {
    client: reqwest::Client,
    base_url: String,
    languages: Vec<String>,
}

impl YoutubeCaptions {
    /// Create a provider from settings.
    pub fn new(settings: &YoutubeSettings) -> Result<Self> {
        Ok(Self::with_client(
            build_client(Duration::from_secs(settings.timeout_seconds))?,
            &settings.watch_base_url,
            settings.languages.clone(),
        ))
    }

    /// Create a provider with an explicit HTTP client and site root.
    pub fn with_client(client: reqwest::Client, base_url: &str, languages: Vec<String>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            languages,
        }
    }

    async fn fetch_watch_page(&self, video_id: &str) -> Result<String> {
        let url = format!("{}/watch", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("v", video_id)])
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US")
            .send()
            .await
            .map_err(fetch_error)?;

        check_status(&response)?;
        let html = response.text().await.map_err(fetch_error)?;

        if html.contains("action=\"https://consent.youtube.com/s\"") {
            return Err(VidsumError::TranscriptFetch(
                "YouTube requires cookie consent for this request".to_string(),
            ));
        }
        if html.contains("class=\"g-recaptcha\"") {
            return Err(VidsumError::TranscriptFetch(
                "YouTube is blocking requests from this IP".to_string(),
            ));
        }
        Ok(html)
    }

    async fn fetch_player(&self, video_id: &str, api_key: &str) -> Result<Value> {
        let url = format!("{}/youtubei/v1/player", self.base_url);
        let body = serde_json::json!({
            "context": {
                "client": {
                    "clientName": "ANDROID",
                    "clientVersion": "20.10.38"
                }
            },
            "videoId": video_id
        });

        let response = self
            .client
            .post(&url)
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await
            .map_err(fetch_error)?;

        check_status(&response)?;
        response.json().await.map_err(fetch_error)
    }

    async fn fetch_track(&self, track: &CaptionTrack) -> Result<Vec<CaptionSegment>> {
        if track.base_url.contains("&exp=xpe") {
            return Err(VidsumError::TranscriptFetch(
                "Caption track requires a proof-of-origin token".to_string(),
            ));
        }

        let url = format!("{}&fmt=json3", track.base_url.replace("&fmt=srv3", ""));
        let response = self.client.get(&url).send().await.map_err(fetch_error)?;
        check_status(&response)?;

        let body: Value = response.json().await.map_err(fetch_error)?;
        Ok(parse_json3(&body))
    }
}

#[async_trait]
impl CaptionProvider for YoutubeCaptions {
    #[instrument(skip(self))]
    async fn fetch_captions(&self, video_id: &str) -> Result<Vec<CaptionSegment>> {
        let html = self.fetch_watch_page(video_id).await?;
        let api_key = extract_innertube_api_key(&html)?;
        let player = self.fetch_player(video_id, &api_key).await?;

        let languages: Vec<&str> = self.languages.iter().map(String::as_str).collect();
        let track = select_track(&player, &languages)?;
        debug!(
            "Using {} caption track ({})",
            track.language_code,
            if track.is_generated { "generated" } else { "manual" }
        );

        self.fetch_track(&track).await
    }
}

fn fetch_error(e: reqwest::Error) -> VidsumError {
    VidsumError::TranscriptFetch(e.without_url().to_string())
}

fn check_status(response: &reqwest::Response) -> Result<()> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(VidsumError::TranscriptFetch(
            "YouTube is rate limiting requests from this IP".to_string(),
        ));
    }
    Err(VidsumError::TranscriptFetch(format!(
        "HTTP {}: {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown error")
    )))
}

fn extract_innertube_api_key(html: &str) -> Result<String> {
    INNERTUBE_API_KEY
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| {
            VidsumError::TranscriptFetch("Could not parse the YouTube watch page".to_string())
        })
}

/// Map the player's playability status onto the error taxonomy.
fn check_playability(player: &Value) -> Result<()> {
    let Some(playability) = player.get("playabilityStatus") else {
        return Ok(());
    };

    let status = playability["status"].as_str().unwrap_or("");
    let reason = playability["reason"].as_str().unwrap_or("");

    match status {
        "OK" | "" => Ok(()),
        "ERROR" => Err(VidsumError::VideoUnavailable),
        "LOGIN_REQUIRED" if reason.contains("not a bot") => Err(VidsumError::TranscriptFetch(
            "YouTube is blocking requests from this IP".to_string(),
        )),
        "LOGIN_REQUIRED" if reason.contains("inappropriate") => Err(
            VidsumError::TranscriptFetch("Video is age restricted".to_string()),
        ),
        _ => Err(VidsumError::TranscriptFetch(format!(
            "Video is unplayable: {}",
            if reason.is_empty() { status } else { reason }
        ))),
    }
}

/// Pick a caption track, preferring manual tracks over generated ones for
/// each language in order.
fn select_track(player: &Value, languages: &[&str]) -> Result<CaptionTrack> {
    check_playability(player)?;

    let tracks: Vec<CaptionTrack> = player
        .pointer("/captions/playerCaptionsTracklistRenderer/captionTracks")
        .and_then(Value::as_array)
        .map(|tracks| {
            tracks
                .iter()
                .filter_map(|t| {
                    Some(CaptionTrack {
                        language_code: t["languageCode"].as_str()?.to_string(),
                        base_url: t["baseUrl"].as_str()?.to_string(),
                        is_generated: t["kind"].as_str() == Some("asr"),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    if tracks.is_empty() {
        return Err(VidsumError::CaptionsDisabled);
    }

    for lang in languages {
        let matching = |generated: bool| {
            tracks
                .iter()
                .find(|t| t.language_code == *lang && t.is_generated == generated)
        };
        if let Some(track) = matching(false).or_else(|| matching(true)) {
            return Ok(track.clone());
        }
    }

    Err(VidsumError::NoCaptionsFound)
}

/// Convert a `json3` timed-text document into caption segments.
fn parse_json3(body: &Value) -> Vec<CaptionSegment> {
    let Some(events) = body["events"].as_array() else {
        return Vec::new();
    };

    events
        .iter()
        .filter_map(|event| {
            let text: String = event["segs"]
                .as_array()?
                .iter()
                .filter_map(|seg| seg["utf8"].as_str())
                .collect();
            let text = text.replace('\n', " ").trim().to_string();
            if text.is_empty() {
                return None;
            }
            Some(CaptionSegment {
                text,
                start: event["tStartMs"].as_f64().unwrap_or(0.0) / 1000.0,
                duration: event["dDurationMs"].as_f64().unwrap_or(0.0) / 1000.0,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{bind_local, serve_on, spawn_router};
    use axum::{
        extract::Query,
        routing::{get, post},
        Json, Router,
    };
    use serde_json::json;
    use std::collections::HashMap;

    fn player_with_tracks(tracks: Value) -> Value {
        json!({
            "playabilityStatus": { "status": "OK" },
            "captions": {
                "playerCaptionsTracklistRenderer": { "captionTracks": tracks }
            }
        })
    }

    #[test]
    fn test_extract_api_key() {
        let html = r#"<script>ytcfg.set({"INNERTUBE_API_KEY": "AIzaTestKey_1-2","X":1})</script>"#;
        assert_eq!(extract_innertube_api_key(html).unwrap(), "AIzaTestKey_1-2");
        assert!(matches!(
            extract_innertube_api_key("<html></html>"),
            Err(VidsumError::TranscriptFetch(_))
        ));
    }

    #[test]
    fn test_missing_captions_renderer_is_disabled() {
        let player = json!({ "playabilityStatus": { "status": "OK" } });
        let err = select_track(&player, &["en"]).unwrap_err();
        assert!(matches!(err, VidsumError::CaptionsDisabled));
        assert_eq!(err.to_string(), "Captions are disabled for this video.");
    }

    #[test]
    fn test_unavailable_video() {
        let player = json!({
            "playabilityStatus": { "status": "ERROR", "reason": "This video is unavailable" }
        });
        assert!(matches!(
            select_track(&player, &["en"]),
            Err(VidsumError::VideoUnavailable)
        ));
    }

    #[test]
    fn test_bot_check_is_generic_failure() {
        let player = json!({
            "playabilityStatus": {
                "status": "LOGIN_REQUIRED",
                "reason": "Sign in to confirm you're not a bot"
            }
        });
        assert!(matches!(
            select_track(&player, &["en"]),
            Err(VidsumError::TranscriptFetch(_))
        ));
    }

    #[test]
    fn test_no_track_in_requested_language() {
        let player = player_with_tracks(json!([
            { "languageCode": "de", "baseUrl": "https://x.test/de" }
        ]));
        assert!(matches!(
            select_track(&player, &["en"]),
            Err(VidsumError::NoCaptionsFound)
        ));
    }

    #[test]
    fn test_prefers_manual_track() {
        let player = player_with_tracks(json!([
            { "languageCode": "en", "baseUrl": "https://x.test/asr", "kind": "asr" },
            { "languageCode": "en", "baseUrl": "https://x.test/manual" }
        ]));
        let track = select_track(&player, &["en"]).unwrap();
        assert_eq!(track.base_url, "https://x.test/manual");
        assert!(!track.is_generated);

        let player = player_with_tracks(json!([
            { "languageCode": "fr", "baseUrl": "https://x.test/fr" },
            { "languageCode": "en", "baseUrl": "https://x.test/asr", "kind": "asr" }
        ]));
        let track = select_track(&player, &["en", "fr"]).unwrap();
        assert_eq!(track.base_url, "https://x.test/asr");
    }

    #[test]
    fn test_parse_json3() {
        let body = json!({
            "events": [
                { "tStartMs": 0, "dDurationMs": 1500, "segs": [{ "utf8": "hello" }, { "utf8": " world" }] },
                { "tStartMs": 1500, "segs": [{ "utf8": "\n" }] },
                { "tStartMs": 1600, "dDurationMs": 400 },
                { "tStartMs": 2000, "dDurationMs": 1000, "segs": [{ "utf8": "second\nline" }] }
            ]
        });

        let segments = parse_json3(&body);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].text, "hello world");
        assert_eq!(segments[0].duration, 1.5);
        assert_eq!(segments[1].text, "second line");
        assert_eq!(segments[1].start, 2.0);
    }

    #[tokio::test]
    async fn test_fetch_captions_over_http() {
        let (listener, addr) = bind_local().await;
        let base = format!("http://{}", addr);

        let track_url = format!("{}/api/timedtext?v=dQw4w9WgXcQ&lang=en", base);
        let router = Router::new()
            .route(
                "/watch",
                get(|| async { r#"<script>{"INNERTUBE_API_KEY":"testkey"}</script>"# }),
            )
            .route(
                "/youtubei/v1/player",
                post(move |Query(q): Query<HashMap<String, String>>| {
                    let track_url = track_url.clone();
                    async move {
                        assert_eq!(q.get("key").map(String::as_str), Some("testkey"));
                        Json(player_with_tracks(json!([
                            { "languageCode": "en", "baseUrl": track_url }
                        ])))
                    }
                }),
            )
            .route(
                "/api/timedtext",
                get(|Query(q): Query<HashMap<String, String>>| async move {
                    assert_eq!(q.get("fmt").map(String::as_str), Some("json3"));
                    Json(json!({
                        "events": [
                            { "tStartMs": 0, "dDurationMs": 1000, "segs": [{ "utf8": "a" }] },
                            { "tStartMs": 1000, "dDurationMs": 1000, "segs": [{ "utf8": "b" }] }
                        ]
                    }))
                }),
            );

        serve_on(listener, router);

        let captions =
            YoutubeCaptions::with_client(reqwest::Client::new(), &base, vec!["en".to_string()]);
        let segments = captions.fetch_captions("dQw4w9WgXcQ").await.unwrap();
        let texts: Vec<&str> = segments.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_watch_page_error_is_fetch_error() {
        let router = Router::new().route(
            "/watch",
            get(|| async { (axum::http::StatusCode::SERVICE_UNAVAILABLE, "down") }),
        );
        let addr = spawn_router(router).await;

        let captions = YoutubeCaptions::with_client(
            reqwest::Client::new(),
            &format!("http://{}", addr),
            vec!["en".to_string()],
        );
        let err = captions.fetch_captions("dQw4w9WgXcQ").await.unwrap_err();
        assert!(matches!(err, VidsumError::TranscriptFetch(_)));
        assert_eq!(err.status_code(), 500);
    }
}
