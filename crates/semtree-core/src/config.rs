use crate::orientation::Orientation;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Settings of a tree view. Every field has a default, so partial JSON is accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewConfig {
    pub direction: Orientation,
    /// Show the whole tree on a fresh load instead of only the root.
    pub expanded: bool,
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub duration_ms: u64,
    /// Transition length while the inspection modifier is held.
    pub slow_duration_ms: u64,
    /// Node attributes listed in the hover text, in order.
    pub tooltip_fields: Vec<String>,
    pub font_size: f64,
    pub marker_radius: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            direction: Orientation::TopToBottom,
            expanded: false,
            canvas_width: 1280.0,
            canvas_height: 800.0,
            duration_ms: 500,
            slow_duration_ms: 5000,
            tooltip_fields: vec!["type".to_string(), "role".to_string()],
            font_size: 20.0,
            marker_radius: 4.5,
        }
    }
}

impl ViewConfig {
    pub fn from_value(value: &Value) -> Result<Self> {
        let mut cfg = Self::default();
        cfg.merge_json(value)?;
        Ok(cfg)
    }

    /// Parses a JSON5 document (comments and trailing commas allowed) over the defaults.
    pub fn from_json5_str(text: &str) -> Result<Self> {
        let value: Value = json5::from_str(text).map_err(|e| Error::InvalidConfig {
            message: e.to_string(),
        })?;
        Self::from_value(&value)
    }

    /// Deep merges `overrides` onto this config.
    pub fn merge_json(&mut self, overrides: &Value) -> Result<()> {
        if !overrides.is_object() {
            return Err(Error::InvalidConfig {
                message: format!("expected a JSON object, got {overrides}"),
            });
        }
        let mut base = serde_json::to_value(&*self)?;
        deep_merge_value(&mut base, overrides);
        *self = serde_json::from_value(base).map_err(|e| Error::InvalidConfig {
            message: e.to_string(),
        })?;
        Ok(())
    }

    pub fn duration(&self, slow: bool) -> Duration {
        Duration::from_millis(if slow {
            self.slow_duration_ms
        } else {
            self.duration_ms
        })
    }
}

fn deep_merge_value(base: &mut Value, incoming: &Value) {
    match (base, incoming) {
        (Value::Object(base_map), Value::Object(in_map)) => {
            for (key, in_value) in in_map {
                match base_map.get_mut(key) {
                    Some(base_value) => deep_merge_value(base_value, in_value),
                    None => {
                        base_map.insert(key.clone(), in_value.clone());
                    }
                }
            }
        }
        (base_slot, in_value) => {
            *base_slot = in_value.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn partial_overrides_keep_other_defaults() {
        let cfg = ViewConfig::from_value(&json!({"direction": "left-right", "expanded": true}))
            .unwrap();
        assert_eq!(cfg.direction, Orientation::LeftToRight);
        assert!(cfg.expanded);
        assert_eq!(cfg.canvas_width, 1280.0);
        assert_eq!(cfg.tooltip_fields, vec!["type", "role"]);
    }

    #[test]
    fn json5_documents_are_accepted() {
        let cfg = ViewConfig::from_json5_str(
            "{\n  // hover shows ids too\n  tooltipFields: ['id', 'type', 'role'],\n  durationMs: 250,\n}",
        )
        .unwrap();
        assert_eq!(cfg.tooltip_fields, vec!["id", "type", "role"]);
        assert_eq!(cfg.duration(false), Duration::from_millis(250));
        assert_eq!(cfg.duration(true), Duration::from_millis(5000));
    }

    #[test]
    fn bad_values_are_reported() {
        let err = ViewConfig::from_value(&json!({"direction": "diagonal"})).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));
        let err = ViewConfig::from_value(&json!(3)).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));
    }
}
