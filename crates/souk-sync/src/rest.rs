use anyhow::Result;
use async_trait::async_trait;

use souk_proto::{ChatMessageWire, OutgoingChat};

/// Pull and send endpoints of the feed backend.
#[async_trait]
pub trait FeedApi: Send + Sync {
    /// Fetch the server's full current chat list; ground truth for the
    /// replace path.
    async fn fetch_chat(&self) -> Result<Vec<ChatMessageWire>>;

    /// Fire-and-forget write; no response payload is consumed.
    async fn post_chat(&self, outgoing: &OutgoingChat) -> Result<()>;
}

/// REST implementation of [`FeedApi`].
pub struct HttpFeedApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpFeedApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn chat_endpoint(&self) -> String {
        format!("{}/chat", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl FeedApi for HttpFeedApi {
    async fn fetch_chat(&self) -> Result<Vec<ChatMessageWire>> {
        let response = self
            .client
            .get(self.chat_endpoint())
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    async fn post_chat(&self, outgoing: &OutgoingChat) -> Result<()> {
        self.client
            .post(self.chat_endpoint())
            .json(outgoing)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
