//! Binding options.
//!
//! Options arrive as loosely-typed JSON (from JS, fixtures or hosts) and are
//! normalized here into [`BindingOptions`]. Defaults follow the lenient
//! contract: missing `over` -> 70, missing/non-object `animations` -> empty.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::ConfigError;
use crate::interp::is_valid_over;
use crate::resolve::Tween;
use crate::throttle::ThrottleConfig;
use crate::transform::TransformRegistry;

/// Scroll distance used when neither the options nor a tween specify one.
pub const DEFAULT_OVER: f64 = 70.0;

/// Property name -> tween, in declaration order.
pub type PropertyTweens = IndexMap<String, Tween>;

/// Selector -> properties, in declaration order.
pub type Animations = IndexMap<String, PropertyTweens>;

/// What an unreadable tween endpoint becomes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackPolicy {
    /// Always `0`.
    #[default]
    Zero,
    /// The transform function's identity (`1` for scales), `0` for everything else.
    Identity,
}

/// Fully-normalized options for one binding.
#[derive(Clone, Debug, PartialEq)]
pub struct BindingOptions {
    pub over: f64,
    pub animations: Animations,
    pub fallback: FallbackPolicy,
    pub throttle: ThrottleConfig,
    pub transforms: TransformRegistry,
}

impl Default for BindingOptions {
    fn default() -> Self {
        Self {
            over: DEFAULT_OVER,
            animations: Animations::new(),
            fallback: FallbackPolicy::default(),
            throttle: ThrottleConfig::default(),
            transforms: TransformRegistry::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawOptions {
    #[serde(default)]
    over: Option<JsonValue>,
    #[serde(default)]
    animations: Option<JsonValue>,
    #[serde(default)]
    fallback: Option<FallbackPolicy>,
    #[serde(default)]
    throttle: Option<ThrottleConfig>,
    #[serde(default)]
    transform_functions: Option<IndexMap<String, f64>>,
}

impl BindingOptions {
    pub fn with_over(mut self, over: f64) -> Self {
        self.over = over;
        self
    }

    pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn with_throttle(mut self, throttle: ThrottleConfig) -> Self {
        self.throttle = throttle;
        self
    }

    /// Append a tween for `property` under `selector` (declaration order is kept).
    pub fn animate(
        mut self,
        selector: impl Into<String>,
        property: impl Into<String>,
        tween: Tween,
    ) -> Self {
        self.animations
            .entry(selector.into())
            .or_default()
            .insert(property.into(), tween);
        self
    }

    /// Check binding-wide values. Per-property checks happen during tree build.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_valid_over(self.over) {
            return Err(ConfigError::InvalidGlobalOver {
                value: self.over.to_string(),
            });
        }
        self.throttle.validate()
    }

    /// Normalize a JSON options object. `null` yields the defaults.
    pub fn from_json(value: &JsonValue) -> Result<Self, ConfigError> {
        let raw: RawOptions = match value {
            JsonValue::Null => RawOptions::default(),
            JsonValue::Object(_) => {
                RawOptions::deserialize(value).map_err(|e| ConfigError::MalformedOptions {
                    reason: e.to_string(),
                })?
            }
            other => {
                return Err(ConfigError::MalformedOptions {
                    reason: format!("expected an object, got {other}"),
                })
            }
        };

        let over = match raw.over {
            None | Some(JsonValue::Null) => DEFAULT_OVER,
            Some(v) => v
                .as_f64()
                .ok_or_else(|| ConfigError::InvalidGlobalOver {
                    value: v.to_string(),
                })?,
        };

        let animations = match raw.animations {
            Some(JsonValue::Object(map)) => parse_animations(map)?,
            _ => Animations::new(),
        };

        let mut transforms = TransformRegistry::default();
        for (name, identity) in raw.transform_functions.unwrap_or_default() {
            transforms.register(name, identity);
        }

        let options = Self {
            over,
            animations,
            fallback: raw.fallback.unwrap_or_default(),
            throttle: raw.throttle.unwrap_or_default(),
            transforms,
        };
        options.validate()?;
        Ok(options)
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let value: JsonValue =
            serde_json::from_str(s).map_err(|e| ConfigError::MalformedOptions {
                reason: e.to_string(),
            })?;
        Self::from_json(&value)
    }
}

fn parse_animations(map: serde_json::Map<String, JsonValue>) -> Result<Animations, ConfigError> {
    let mut animations = Animations::with_capacity(map.len());
    for (selector, props) in map {
        let props = match props {
            JsonValue::Object(props) => props,
            other => {
                return Err(ConfigError::MalformedSelector {
                    selector,
                    reason: format!("expected an object of properties, got {other}"),
                })
            }
        };
        let mut tweens = PropertyTweens::with_capacity(props.len());
        for (property, tween) in props {
            let tween = Tween::deserialize(&tween).map_err(|e| ConfigError::MalformedTween {
                selector: selector.clone(),
                property: property.clone(),
                reason: e.to_string(),
            })?;
            tweens.insert(property, tween);
        }
        animations.insert(selector, tweens);
    }
    Ok(animations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_and_empty_yield_defaults() {
        let a = BindingOptions::from_json(&JsonValue::Null).unwrap();
        let b = BindingOptions::from_json(&json!({})).unwrap();
        assert_eq!(a, BindingOptions::default());
        assert_eq!(b, BindingOptions::default());
        assert_eq!(a.over, 70.0);
        assert!(a.animations.is_empty());
    }

    #[test]
    fn non_object_animations_become_empty() {
        for animations in [json!(null), json!(5), json!("x"), json!([1, 2])] {
            let o = BindingOptions::from_json(&json!({ "animations": animations })).unwrap();
            assert!(o.animations.is_empty());
        }
    }

    #[test]
    fn keeps_declaration_order() {
        let o = BindingOptions::from_json(&json!({
            "over": 200,
            "animations": {
                "this": { "rotate": { "to": 90, "unit": "deg" }, "scale": { "to": 0.5 }, "opacity": { "from": 1, "to": 0, "unit": "" } },
                ".logo": { "translateY": { "to": 40, "unit": "px" } }
            }
        }))
        .unwrap();
        assert_eq!(o.over, 200.0);
        let selectors: Vec<_> = o.animations.keys().map(String::as_str).collect();
        assert_eq!(selectors, ["this", ".logo"]);
        let props: Vec<_> = o.animations["this"].keys().map(String::as_str).collect();
        assert_eq!(props, ["rotate", "scale", "opacity"]);
        assert_eq!(o.animations["this"]["scale"], Tween::to(0.5));
    }

    #[test]
    fn rejects_bad_global_over() {
        for over in [json!(0), json!(-10), json!("far"), json!(true)] {
            let err = BindingOptions::from_json(&json!({ "over": over })).unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidGlobalOver { .. }),
                "{err:?}"
            );
        }
    }

    #[test]
    fn malformed_tween_names_location() {
        let err = BindingOptions::from_json(&json!({
            "animations": { ".logo": { "scale": { "to": "big" } } }
        }))
        .unwrap_err();
        assert_eq!(err.selector(), Some(".logo"));
        assert_eq!(err.property(), Some("scale"));

        let err = BindingOptions::from_json(&json!({
            "animations": { ".logo": { "scale": { "to": 1, "ease": "in" } } }
        }))
        .unwrap_err();
        assert!(matches!(err, ConfigError::MalformedTween { .. }));

        let err = BindingOptions::from_json(&json!({
            "animations": { ".logo": 3 }
        }))
        .unwrap_err();
        assert!(matches!(err, ConfigError::MalformedSelector { .. }));
    }

    #[test]
    fn optional_sections() {
        let o = BindingOptions::from_json(&json!({
            "fallback": "identity",
            "throttle": { "windowMs": 32, "trailingMs": 100 },
            "transformFunctions": { "skewX": 0 }
        }))
        .unwrap();
        assert_eq!(o.fallback, FallbackPolicy::Identity);
        assert_eq!(o.throttle.window_ms, 32);
        assert_eq!(o.throttle.trailing_ms, 100);
        assert!(o.transforms.contains("skewX"));
        assert!(o.transforms.contains("scale"));

        let err = BindingOptions::from_json(&json!({ "throttle": { "windowMs": 0 } })).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidThrottle { .. }));
    }

    #[test]
    fn non_object_options_are_rejected() {
        assert!(BindingOptions::from_json(&json!(3)).is_err());
        assert!(BindingOptions::from_json_str("not json").is_err());
    }

    #[test]
    fn builder_matches_json() {
        let built = BindingOptions::default()
            .with_over(200.0)
            .animate(".logo", "scale", Tween::to(0.5));
        let parsed = BindingOptions::from_json_str(
            r#"{ "over": 200, "animations": { ".logo": { "scale": { "to": 0.5 } } } }"#,
        )
        .unwrap();
        assert_eq!(built, parsed);
    }
}
