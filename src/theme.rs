//! Theme dev-server ports
//!
//! During development each theme listed in configuration is served by
//! its own local server. The port for a theme is the matching entry of
//! the `ports` list when that entry is a usable non-zero number, and
//! otherwise [`DEFAULT_THEME_PORT`] plus the theme's position in the
//! `themes` list.

use serde_json::Value;

use crate::source::LoadError;
use crate::store::ConfigResolver;

/// Port assigned to the first theme when `ports` has no usable entry.
pub const DEFAULT_THEME_PORT: u16 = 4001;

/// The local port serving `theme`, or `None` when the theme is not
/// listed under `themes`.
pub fn theme_server_port(
    resolver: &ConfigResolver,
    theme: &str,
) -> Result<Option<u16>, LoadError> {
    let themes = resolver.resolve("themes")?.to_value();
    let Some(themes) = themes.as_array() else {
        return Ok(None);
    };
    let Some(index) = themes.iter().position(|entry| entry.as_str() == Some(theme)) else {
        return Ok(None);
    };

    let ports = resolver.resolve("ports")?.to_value();
    let configured = ports
        .as_array()
        .and_then(|entries| entries.get(index))
        .and_then(Value::as_u64)
        .filter(|port| *port != 0)
        .and_then(|port| u16::try_from(port).ok());

    match configured {
        Some(port) => Ok(Some(port)),
        None => Ok(u16::try_from(DEFAULT_THEME_PORT as usize + index).ok()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockSource;
    use std::sync::Arc;

    fn resolver(main: &str) -> ConfigResolver {
        ConfigResolver::bootstrap(Arc::new(MockSource::new().with_block("main", main))).unwrap()
    }

    #[test]
    fn test_configured_port_wins() {
        let r = resolver(r#"{"themes": ["aurora", "mono"], "ports": [4004, 4002]}"#);
        assert_eq!(theme_server_port(&r, "mono").unwrap(), Some(4002));
        assert_eq!(theme_server_port(&r, "aurora").unwrap(), Some(4004));
    }

    #[test]
    fn test_missing_ports_fall_back_to_offset() {
        let r = resolver(r#"{"themes": ["aurora", "mono"]}"#);
        assert_eq!(theme_server_port(&r, "aurora").unwrap(), Some(4001));
        assert_eq!(theme_server_port(&r, "mono").unwrap(), Some(4002));
    }

    #[test]
    fn test_unusable_port_entry_falls_back_to_offset() {
        let r = resolver(r#"{"themes": ["a", "b", "c"], "ports": [0, "high", 9]}"#);
        assert_eq!(theme_server_port(&r, "a").unwrap(), Some(4001));
        assert_eq!(theme_server_port(&r, "b").unwrap(), Some(4002));
        assert_eq!(theme_server_port(&r, "c").unwrap(), Some(9));
    }

    #[test]
    fn test_short_ports_list_falls_back_to_offset() {
        let r = resolver(r#"{"themes": ["a", "b"], "ports": [5000]}"#);
        assert_eq!(theme_server_port(&r, "a").unwrap(), Some(5000));
        assert_eq!(theme_server_port(&r, "b").unwrap(), Some(4002));
    }

    #[test]
    fn test_unknown_theme_is_none() {
        let r = resolver(r#"{"themes": ["aurora"], "ports": [4004]}"#);
        assert_eq!(theme_server_port(&r, "missing").unwrap(), None);
    }

    #[test]
    fn test_no_themes_list_is_none() {
        let r = resolver(r#"{"debug": true}"#);
        assert_eq!(theme_server_port(&r, "aurora").unwrap(), None);

        let r = resolver(r#"{"themes": "aurora"}"#);
        assert_eq!(theme_server_port(&r, "aurora").unwrap(), None);
    }
}
