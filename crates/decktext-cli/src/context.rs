use crate::config::Config;
use crate::types::OutputFormat;
use anyhow::Result;
use once_cell::sync::OnceCell;
use std::path::PathBuf;

/// Per-invocation state shared by the handlers.
pub struct ExecutionContext {
    config_path: Option<PathBuf>,
    config: OnceCell<Config>,
    pub format: OutputFormat,
}

impl ExecutionContext {
    pub fn new(config_path: Option<PathBuf>, format: OutputFormat) -> Self {
        Self {
            config_path: Config::resolve_path(config_path.as_deref()),
            config: OnceCell::new(),
            format,
        }
    }

    /// Config, loaded on first use.
    pub fn config(&self) -> Result<&Config> {
        self.config.get_or_try_init(|| match &self.config_path {
            Some(path) => Config::load_from(path),
            None => Ok(Config::default()),
        })
    }

    pub fn json(&self) -> bool {
        self.format == OutputFormat::Json
    }
}
