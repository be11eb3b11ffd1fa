use async_trait::async_trait;
use std::path::{Path, PathBuf};

use super::{template_location, TemplateOverrides, TemplateProvider, TemplateSet};
use crate::config::WidgetConfig;
use crate::error::{WidgetError, WidgetResult};

/// Reads templates from a directory. Overrides are paths, relative ones are
/// resolved against the directory.
#[derive(Debug, Clone)]
pub struct FileTemplateProvider {
    dir: PathBuf,
}

impl FileTemplateProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The configured directory, else the platform default.
    pub fn from_config(config: &WidgetConfig) -> Option<Self> {
        config
            .template_dir
            .clone()
            .or_else(Self::default_dir)
            .map(Self::new)
    }

    /// `<data dir>/calwidget/templates`, if the platform has a data dir.
    pub fn default_dir() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("calwidget").join("templates"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl TemplateProvider for FileTemplateProvider {
    async fn load_templates(&self, overrides: &TemplateOverrides) -> WidgetResult<TemplateSet> {
        let mut set = TemplateSet::default();
        for part in super::TemplatePart::ALL {
            let path = self.dir.join(template_location(part, overrides));
            let source = tokio::fs::read_to_string(&path).await.map_err(|e| {
                log::debug!("Template {} unreadable at {}: {}", part, path.display(), e);
                WidgetError::Io(e)
            })?;
            set.insert(part, source);
        }
        set.ensure_complete()
    }
}
