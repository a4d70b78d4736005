//! Error types for configuration loading and host integration.
//!
//! The simulation itself never fails: bad numbers are clamped when a
//! configuration is sanitized. Errors only exist at the edges, when a
//! configuration is parsed or a host resource is looked up.

use std::fmt;

/// Errors raised while reading a field configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// A colour string that is not `#rgb`, `#rrggbb` or `#rrggbbaa`.
    InvalidColor(String),
    /// The configuration JSON could not be parsed.
    Json(serde_json::Error),
    /// A preset name that matches none of the built-in presets.
    UnknownPreset(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidColor(s) => write!(f, "Invalid colour '{}': expected #rrggbb or #rrggbbaa", s),
            ConfigError::Json(e) => write!(f, "Failed to parse field config: {}", e),
            ConfigError::UnknownPreset(name) => write!(
                f,
                "Unknown preset '{}': expected one of network, stream, pellets",
                name
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}

/// Errors raised while binding the engine to its host page.
///
/// All of these mean "disable the effect": callers log them and skip
/// starting the animation.
#[derive(Debug)]
pub enum HostError {
    /// No global `window`/`document` (not running in a browser page).
    NoWindow,
    /// No element with the given id.
    MissingElement(String),
    /// The element exists but is not of the expected kind.
    WrongElementType { id: String, expected: &'static str },
    /// The canvas refused to hand out a 2D context.
    NoContext(String),
    /// A JavaScript call threw.
    Js(String),
    /// The configuration passed by the host was rejected.
    Config(ConfigError),
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostError::NoWindow => write!(f, "No window/document available"),
            HostError::MissingElement(id) => write!(f, "No element with id '{}'", id),
            HostError::WrongElementType { id, expected } => {
                write!(f, "Element '{}' is not a {}", id, expected)
            }
            HostError::NoContext(id) => write!(f, "Canvas '{}' has no 2D context", id),
            HostError::Js(msg) => write!(f, "JavaScript call failed: {}", msg),
            HostError::Config(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for HostError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HostError::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for HostError {
    fn from(e: ConfigError) -> Self {
        HostError::Config(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_config_error_source_chain() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: HostError = ConfigError::from(json_err).into();

        assert!(err.to_string().starts_with("Failed to parse field config"));
        let source = err.source().expect("config error is the source");
        assert!(source.source().is_some(), "json error is chained below");
    }

    #[test]
    fn test_display_names_element() {
        let err = HostError::WrongElementType { id: "scene".into(), expected: "canvas" };
        assert_eq!(err.to_string(), "Element 'scene' is not a canvas");
    }
}
