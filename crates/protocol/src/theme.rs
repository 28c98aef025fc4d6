use serde::{Deserialize, Serialize};

use crate::config::TimelineConfig;
use crate::shared_str::SharedStr;

/// Theme properties flowing through to presentation.
///
/// The engine itself reads only the minimum event height and the color
/// fallbacks; everything else rides along in `extra` untouched so hosts
/// can theme their renderers through the same object.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ThemeProperties {
    /// Pixel floor for rendered event height, overriding the config
    /// default when set.
    #[serde(default)]
    pub minimum_event_height: Option<f64>,
    /// Fallback fill color for events that carry none.
    #[serde(default)]
    pub default_event_color: Option<SharedStr>,
    /// Fallback border color for events that carry none.
    #[serde(default)]
    pub default_border_color: Option<SharedStr>,
    /// Opaque presentation-only properties.
    #[serde(default, flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ThemeProperties {
    /// Merge against the config defaults into the effective values the
    /// frame deriver reads. Theme wins where it is set.
    pub fn resolve(&self, config: &TimelineConfig) -> ResolvedTheme {
        ResolvedTheme {
            minimum_event_height: self
                .minimum_event_height
                .unwrap_or(config.minimum_event_height),
            default_event_color: self
                .default_event_color
                .clone()
                .unwrap_or_else(|| config.default_event_color.clone()),
            default_border_color: self
                .default_border_color
                .clone()
                .unwrap_or_else(|| config.default_border_color.clone()),
        }
    }
}

/// Theme values after the config-default fallback, all mandatory.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTheme {
    pub minimum_event_height: f64,
    pub default_event_color: SharedStr,
    pub default_border_color: SharedStr,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_fields_pass_through() {
        let theme: ThemeProperties = serde_json::from_str(
            r##"{"minimum_event_height":20.0,"cellBorderColor":"#ddd"}"##,
        )
        .unwrap_or_default();
        assert_eq!(theme.minimum_event_height, Some(20.0));
        assert_eq!(
            theme.extra.get("cellBorderColor").and_then(|v| v.as_str()),
            Some("#ddd"),
        );
    }

    #[test]
    fn resolve_prefers_theme_over_config() {
        let config = TimelineConfig::default();
        let theme = ThemeProperties {
            minimum_event_height: Some(28.0),
            default_event_color: Some("#222222".into()),
            ..ThemeProperties::default()
        };
        let resolved = theme.resolve(&config);
        assert_eq!(resolved.minimum_event_height, 28.0);
        assert_eq!(resolved.default_event_color, SharedStr::from("#222222"));
        assert_eq!(resolved.default_border_color, config.default_border_color);
    }

    #[test]
    fn default_is_empty() {
        let theme = ThemeProperties::default();
        assert!(theme.minimum_event_height.is_none());
        assert!(theme.extra.is_empty());
    }
}
