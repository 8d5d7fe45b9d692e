//! Engine configuration.

use mathexpr_ir::{ImplicitMode, ParenthesisMode, RenderOptions};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure to load a [`Config`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid configuration: epsilon must be a non-negative number, got {0}")]
    Epsilon(f64),
}

/// Options that shape the built-in functions and default rendering.
///
/// Every field has a default, so a partial JSON document is a valid config.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Relative tolerance for comparing numbers.
    pub epsilon: f64,
    /// Keep output types stable: `sqrt(-4)` is `NaN` rather than complex.
    pub predictable: bool,
    pub parenthesis: ParenthesisMode,
    pub implicit: ImplicitMode,
    /// Functions that exist in the namespace but may not be called.
    pub forbidden: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            epsilon: 1e-12,
            predictable: false,
            parenthesis: ParenthesisMode::Keep,
            implicit: ImplicitMode::Hide,
            forbidden: ["evaluate", "parse", "compile"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl Config {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(json)?;
        if config.epsilon.is_nan() || config.epsilon < 0.0 {
            return Err(ConfigError::Epsilon(config.epsilon));
        }
        Ok(config)
    }

    /// Render options for the configured parenthesis and implicit modes.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions::new(self.parenthesis, self.implicit)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn partial_documents_keep_defaults() {
        let config = Config::from_json_str(r#"{"predictable": true, "parenthesis": "auto"}"#)
            .unwrap();
        assert!(config.predictable);
        assert_eq!(config.parenthesis, ParenthesisMode::Auto);
        assert_eq!(config.epsilon, 1e-12);
        assert_eq!(config.forbidden, vec!["evaluate", "parse", "compile"]);
    }

    #[test]
    fn negative_epsilon_is_rejected() {
        let err = Config::from_json_str(r#"{"epsilon": -1}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Epsilon(_)));
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(matches!(
            Config::from_json_str("{"),
            Err(ConfigError::Json(_))
        ));
    }
}
