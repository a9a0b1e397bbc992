#![allow(dead_code)]

use handoff::config::{RawActionItem, RawConfigFile, RawWatchItem, RunConfig};

/// Builder for `RunConfig` to simplify test setup.
///
/// Goes through the same validation as a config file on disk.
pub struct RunConfigBuilder {
    config: RawConfigFile,
}

impl RunConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn initial_run(mut self, path: &str) -> Self {
        self.config.initial_run = Some(path.to_string());
        self
    }

    pub fn watch(mut self, item: RawWatchItem) -> Self {
        self.config.watch.push(item);
        self
    }

    pub fn close_program(mut self, name: &str) -> Self {
        self.config.action.push(RawActionItem {
            action: Some("close".to_string()),
            kind: Some("program".to_string()),
            name: Some(name.to_string()),
        });
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> RunConfig {
        RunConfig::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for RunConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for one `watch` entry.
pub struct WatchItemBuilder {
    item: RawWatchItem,
}

impl WatchItemBuilder {
    pub fn program(name: &str, timeout_seconds: f64) -> Self {
        Self {
            item: RawWatchItem {
                name: Some(name.to_string()),
                kind: Some("program".to_string()),
                timeout_seconds: Some(timeout_seconds),
                pattern: None,
                encoding: None,
            },
        }
    }

    pub fn log(path: &str, pattern: &str, timeout_seconds: f64) -> Self {
        Self {
            item: RawWatchItem {
                name: Some(path.to_string()),
                kind: Some("log".to_string()),
                timeout_seconds: Some(timeout_seconds),
                pattern: Some(pattern.to_string()),
                encoding: None,
            },
        }
    }

    pub fn encoding(mut self, encoding: &str) -> Self {
        self.item.encoding = Some(encoding.to_string());
        self
    }

    pub fn no_timeout(mut self) -> Self {
        self.item.timeout_seconds = None;
        self
    }

    pub fn build(self) -> RawWatchItem {
        self.item
    }
}
