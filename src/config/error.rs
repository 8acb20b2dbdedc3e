//! Authoring errors.

use thiserror::Error;

/// Errors raised while declaring rules on a [`Configurator`].
///
/// [`Configurator`]: super::Configurator
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A set-once field was assigned a second time. The original value is
    /// left untouched.
    #[error("{field} has already been defined for {rule}")]
    Redefinition { rule: String, field: &'static str },
}

impl ConfigError {
    pub(crate) fn redefined(rule: String, field: &'static str) -> Self {
        ConfigError::Redefinition { rule, field }
    }
}
