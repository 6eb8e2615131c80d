use async_trait::async_trait;
use url::Url;

use crate::relay::{MailError, MailRequest, MailResponse, Mailer};

/// HTTP client for a running mail relay.
#[derive(Debug, Clone)]
pub struct RelayClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl RelayClient {
    /// `base_url` is the relay root, e.g. `http://localhost:3000/`.
    pub fn new(base_url: &str) -> Result<Self, MailError> {
        let endpoint = Url::parse(base_url)?.join("send-email")?;
        Ok(RelayClient {
            http: reqwest::Client::new(),
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub async fn post(&self, request: &MailRequest) -> Result<MailResponse, MailError> {
        let reply: MailResponse = self
            .http
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await?
            .json()
            .await?;
        if reply.success {
            Ok(reply)
        } else {
            Err(MailError::Rejected(reply.error.unwrap_or_default()))
        }
    }
}

#[async_trait]
impl Mailer for RelayClient {
    async fn send(&self, request: &MailRequest) -> Result<String, MailError> {
        let reply = self.post(request).await?;
        Ok(reply.message.unwrap_or_default())
    }
}
