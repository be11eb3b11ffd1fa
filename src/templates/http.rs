//! Template fetching over HTTP
//!
//! Overrides may be absolute URLs or paths relative to the provider's base
//! URL. There is no retry: a failed request fails the whole load.

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use url::Url;

use super::{template_location, TemplateOverrides, TemplatePart, TemplateProvider, TemplateSet};
use crate::error::{WidgetError, WidgetResult};

/// HTTP client configuration for template requests
#[derive(Debug, Clone, PartialEq)]
pub struct HttpConfig {
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Total request timeout
    pub timeout: Duration,
    /// Idle connections kept per host
    pub max_idle_per_host: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            timeout: Duration::from_secs(30),
            max_idle_per_host: 2,
        }
    }
}

impl HttpConfig {
    pub fn build_client(&self) -> WidgetResult<Client> {
        Ok(ClientBuilder::new()
            .connect_timeout(self.connect_timeout)
            .timeout(self.timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(self.max_idle_per_host)
            .build()?)
    }
}

#[derive(Debug, Clone)]
pub struct HttpTemplateProvider {
    base: Url,
    client: Client,
}

impl HttpTemplateProvider {
    pub fn new(base: &str, config: &HttpConfig) -> WidgetResult<Self> {
        let base = Url::parse(base)?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(WidgetError::invalid_input(format!(
                "template base URL must be http or https, got '{}'",
                base.scheme()
            )));
        }
        Ok(Self {
            base,
            client: config.build_client()?,
        })
    }

    /// Absolute URL `part` is fetched from.
    pub fn resolve(&self, part: TemplatePart, overrides: &TemplateOverrides) -> WidgetResult<Url> {
        Ok(self.base.join(&template_location(part, overrides))?)
    }
}

#[async_trait]
impl TemplateProvider for HttpTemplateProvider {
    async fn load_templates(&self, overrides: &TemplateOverrides) -> WidgetResult<TemplateSet> {
        let mut set = TemplateSet::default();
        for part in TemplatePart::ALL {
            let url = self.resolve(part, overrides)?;
            log::debug!("Fetching template {} from {}", part, url);
            let source = self
                .client
                .get(url)
                .send()
                .await?
                .error_for_status()?
                .text()
                .await?;
            set.insert(part, source);
        }
        set.ensure_complete()
    }
}
