//! Resource bounds enforced while parsing a message.
//!
//! The defaults are deliberately small. Header blocks and bodies are parsed from
//! memory the connection layer already buffered, so every cap here bounds how much
//! work a hostile peer can make a single parse do.

use serde::Deserialize;

use crate::ensure;
use crate::protocol::error::ConfigError;

/// Default maximum length of a single line, terminator excluded.
pub const DEFAULT_MAX_LINE: usize = 8 * 1024;

/// Default maximum number of fields in one header block.
pub const DEFAULT_MAX_FIELD_NUM: usize = 64;

/// Default maximum combined key and value size of one field.
pub const DEFAULT_MAX_FIELD_SIZE: usize = 8 * 1024;

/// Default maximum body size.
pub const DEFAULT_MAX_ENTITY_SIZE: usize = 1024 * 1024;

/// Immutable parse limits, shared read-only across parses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    line: usize,
    field_num: usize,
    field_size: usize,
    entity_size: usize,
}

impl Limits {
    pub const fn new(line: usize, field_num: usize, field_size: usize, entity_size: usize) -> Self {
        Self { line, field_num, field_size, entity_size }
    }

    /// Maximum length of one line, terminator excluded.
    #[inline]
    pub fn line(&self) -> usize {
        self.line
    }

    /// Maximum number of fields in one header block.
    #[inline]
    pub fn field_num(&self) -> usize {
        self.field_num
    }

    /// Maximum key plus value length of one field.
    #[inline]
    pub fn field_size(&self) -> usize {
        self.field_size
    }

    /// Maximum total body length.
    #[inline]
    pub fn entity_size(&self) -> usize {
        self.entity_size
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LINE, DEFAULT_MAX_FIELD_NUM, DEFAULT_MAX_FIELD_SIZE, DEFAULT_MAX_ENTITY_SIZE)
    }
}

/// Deserializable form of [`Limits`]; missing keys take the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    pub line: usize,
    pub field_num: usize,
    pub field_size: usize,
    pub entity_size: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            line: DEFAULT_MAX_LINE,
            field_num: DEFAULT_MAX_FIELD_NUM,
            field_size: DEFAULT_MAX_FIELD_SIZE,
            entity_size: DEFAULT_MAX_ENTITY_SIZE,
        }
    }
}

impl LimitsConfig {
    /// Rejects zero caps, which would make every message unparsable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure!(self.line > 0, ConfigError::zero_limit("line"));
        ensure!(self.field_num > 0, ConfigError::zero_limit("field_num"));
        ensure!(self.field_size > 0, ConfigError::zero_limit("field_size"));
        ensure!(self.entity_size > 0, ConfigError::zero_limit("entity_size"));
        Ok(())
    }

    /// Validates the config and builds the limits from it.
    pub fn build(&self) -> Result<Limits, ConfigError> {
        self.validate()?;
        Ok(Limits::from(self))
    }
}

impl From<&LimitsConfig> for Limits {
    fn from(config: &LimitsConfig) -> Self {
        Self::new(config.line, config.field_num, config.field_size, config.entity_size)
    }
}
