//! Test doubles shared across module tests.

use crate::captions::{CaptionProvider, CaptionSegment};
use crate::error::{Result, VidsumError};
use crate::summary::Summarizer;
use crate::video::{MetadataProvider, VideoMetadata};
use async_trait::async_trait;
use axum::Router;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// Bind an ephemeral localhost port.
pub async fn bind_local() -> (TcpListener, SocketAddr) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    (listener, addr)
}

/// Serve a router on an already bound listener.
pub fn serve_on(listener: TcpListener, router: Router) {
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
}

/// Serve a router on an ephemeral localhost port.
pub async fn spawn_router(router: Router) -> SocketAddr {
    let (listener, addr) = bind_local().await;
    serve_on(listener, router);
    addr
}

pub fn segment(text: &str) -> CaptionSegment {
    CaptionSegment {
        text: text.to_string(),
        start: 0.0,
        duration: 1.0,
    }
}

#[derive(Clone, Default)]
pub struct FakeCaptions {
    pub segments: Vec<CaptionSegment>,
    pub fail_with: Option<fn() -> VidsumError>,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl FakeCaptions {
    pub fn new(texts: &[&str]) -> Self {
        Self {
            segments: texts.iter().map(|t| segment(t)).collect(),
            ..Default::default()
        }
    }

    pub fn failing(fail_with: fn() -> VidsumError) -> Self {
        Self {
            fail_with: Some(fail_with),
            ..Default::default()
        }
    }
}

#[async_trait]
impl CaptionProvider for FakeCaptions {
    async fn fetch_captions(&self, video_id: &str) -> Result<Vec<CaptionSegment>> {
        self.calls.lock().unwrap().push(video_id.to_string());
        match self.fail_with {
            Some(fail) => Err(fail()),
            None => Ok(self.segments.clone()),
        }
    }
}

#[derive(Clone, Default)]
pub struct FakeMetadata {
    pub fail_with: Option<fn() -> VidsumError>,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl FakeMetadata {
    pub fn failing(fail_with: fn() -> VidsumError) -> Self {
        Self {
            fail_with: Some(fail_with),
            ..Default::default()
        }
    }
}

#[async_trait]
impl MetadataProvider for FakeMetadata {
    async fn fetch_metadata(&self, video_id: &str) -> Result<VideoMetadata> {
        self.calls.lock().unwrap().push(video_id.to_string());
        if let Some(fail) = self.fail_with {
            return Err(fail());
        }
        Ok(VideoMetadata {
            id: video_id.to_string(),
            title: format!("Title of {}", video_id),
            thumbnail_url: format!("https://i.ytimg.com/vi/{}/hqdefault.jpg", video_id),
        })
    }
}

#[derive(Clone)]
pub struct FakeSummarizer {
    pub summary: String,
    pub fail_with: Option<String>,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl FakeSummarizer {
    pub fn new(summary: &str) -> Self {
        Self {
            summary: summary.to_string(),
            fail_with: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Self::new("")
        }
    }
}

#[async_trait]
impl Summarizer for FakeSummarizer {
    fn model(&self) -> &str {
        "fake-model"
    }

    async fn summarize(&self, input: &str) -> Result<String> {
        self.calls.lock().unwrap().push(input.to_string());
        match &self.fail_with {
            Some(msg) => Err(VidsumError::SummaryGeneration(msg.clone())),
            None => Ok(self.summary.clone()),
        }
    }
}
