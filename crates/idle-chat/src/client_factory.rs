use anyhow::Result;
use idle_llm::{ChatClient, ClientFactory, ProviderConfig};
use std::sync::Arc;

/// Picks the provider client for a request's credential
pub trait ClientResolver: Send + Sync {
    fn resolve(&self, api_key: Option<&str>) -> Result<Arc<dyn ChatClient>>;
}

/// Google client resolution
///
/// A caller supplied key gets a fresh client. Otherwise the client built from
/// the server key is shared across requests. With no key at all the request
/// still goes out and the provider's auth error is streamed back.
pub struct GoogleClientResolver {
    base_url: Option<String>,
    server_client: Option<Arc<dyn ChatClient>>,
}

impl GoogleClientResolver {
    pub fn new(server_key: Option<String>, base_url: Option<String>) -> Result<Self> {
        let server_client = server_key
            .filter(|key| !key.trim().is_empty())
            .map(|key| Self::create(&key, base_url.clone()))
            .transpose()?;

        Ok(Self {
            base_url,
            server_client,
        })
    }

    pub fn has_server_key(&self) -> bool {
        self.server_client.is_some()
    }

    /// Client backed by the server key, if one is configured
    pub fn server_client(&self) -> Option<Arc<dyn ChatClient>> {
        self.server_client.clone()
    }

    fn create(api_key: &str, base_url: Option<String>) -> Result<Arc<dyn ChatClient>> {
        ClientFactory::create_client(ProviderConfig::google(api_key).with_base_url(base_url))
    }
}

impl ClientResolver for GoogleClientResolver {
    fn resolve(&self, api_key: Option<&str>) -> Result<Arc<dyn ChatClient>> {
        if let Some(key) = api_key {
            return Self::create(key, self.base_url.clone());
        }

        if let Some(client) = &self.server_client {
            return Ok(Arc::clone(client));
        }

        tracing::warn!("No API key supplied or configured; provider will reject the request");
        Self::create("", self.base_url.clone())
    }
}
