#![allow(dead_code)]

use ktalk::config::{ConfigFile, RawConfigFile};

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn program(mut self, program: &str) -> Self {
        self.config.validator.program = program.to_string();
        self
    }

    pub fn timeout(mut self, timeout: &str) -> Self {
        self.config.executor.timeout = timeout.to_string();
        self
    }

    pub fn stderr_tail_bytes(mut self, bytes: usize) -> Self {
        self.config.executor.stderr_tail_bytes = bytes;
        self
    }

    pub fn endpoint(mut self, endpoint: &str) -> Self {
        self.config.generator.endpoint = endpoint.to_string();
        self
    }

    pub fn model(mut self, model: &str) -> Self {
        self.config.generator.model = model.to_string();
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.config.generator.max_tokens = max_tokens;
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
