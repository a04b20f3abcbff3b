//! Property resolution: Tween (declarative) -> PropertyBinding (closed-form).

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::FallbackPolicy;
use crate::error::ConfigError;
use crate::host::StyleReader;
use crate::interp::{format_css_number, is_valid_over, value_at};
use crate::transform::TransformRegistry;

/// Declarative description of one animated property.
/// Missing fields are filled in by [`resolve`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Tween {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub over: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl Tween {
    pub fn to(to: f64) -> Self {
        Self {
            to: Some(to),
            ..Self::default()
        }
    }

    pub fn between(from: f64, to: f64) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
            ..Self::default()
        }
    }

    pub fn with_over(mut self, over: f64) -> Self {
        self.over = Some(over);
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }
}

/// A resolved tween. Evaluation is a pure function of the scroll position.
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyBinding {
    pub from: f64,
    pub to: f64,
    pub over: f64,
    pub unit: String,
    pub is_transform: bool,
}

impl PropertyBinding {
    #[inline]
    pub fn value_at(&self, scroll_pos: f64) -> f64 {
        value_at(self.from, self.to, self.over, scroll_pos)
    }

    /// `<value><unit>` at `scroll_pos`, ready to be written as a style value.
    pub fn format_at(&self, scroll_pos: f64) -> String {
        let mut out = format_css_number(self.value_at(scroll_pos));
        out.push_str(&self.unit);
        out
    }

    /// True when both endpoints coincide; the value never changes.
    pub fn is_constant(&self) -> bool {
        self.from == self.to
    }
}

/// Binding-wide inputs to [`resolve`].
#[derive(Clone, Copy, Debug)]
pub struct ResolveCtx<'a> {
    /// Selector the property belongs to (for error reporting).
    pub selector: &'a str,
    pub global_over: f64,
    pub transforms: &'a TransformRegistry,
    pub fallback: FallbackPolicy,
}

/// Resolve one property of one selector.
///
/// Missing endpoints are inferred from `element`'s computed style (the first
/// matched target). With no element, or a value that does not start with a
/// number, the fallback policy decides.
pub fn resolve<R>(
    property: &str,
    tween: &Tween,
    reader: &R,
    element: Option<&R::Element>,
    ctx: &ResolveCtx<'_>,
) -> Result<PropertyBinding, ConfigError>
where
    R: StyleReader + ?Sized,
{
    let over = match tween.over {
        Some(over) if is_valid_over(over) => over,
        Some(over) => {
            return Err(ConfigError::InvalidOver {
                selector: ctx.selector.to_string(),
                property: property.to_string(),
                value: over,
            })
        }
        None => ctx.global_over,
    };

    let is_transform = ctx.transforms.contains(property);

    // Read the style at most once; both endpoints see the same value.
    let mut inferred: Option<f64> = None;
    let mut infer = || {
        *inferred.get_or_insert_with(|| {
            element
                .and_then(|el| reader.computed_style_value(el, property))
                .and_then(|raw| parse_style_number(&raw))
                .unwrap_or_else(|| fallback_value(property, ctx))
        })
    };
    let from = match tween.from {
        Some(from) => from,
        None => infer(),
    };
    let to = match tween.to {
        Some(to) => to,
        None => infer(),
    };
    for (endpoint, value) in [("from", from), ("to", to)] {
        if !value.is_finite() {
            return Err(ConfigError::InvalidEndpoint {
                selector: ctx.selector.to_string(),
                property: property.to_string(),
                endpoint,
                value,
            });
        }
    }

    let unit = match &tween.unit {
        Some(unit) => unit.clone(),
        None if is_transform => String::new(),
        None => "px".to_string(),
    };

    let binding = PropertyBinding {
        from,
        to,
        over,
        unit,
        is_transform,
    };
    if binding.is_constant() {
        debug!(
            "'{}' on '{}' resolved to a constant {} (from/to coincide)",
            property, ctx.selector, binding.from
        );
    }
    Ok(binding)
}

fn fallback_value(property: &str, ctx: &ResolveCtx<'_>) -> f64 {
    match ctx.fallback {
        FallbackPolicy::Zero => 0.0,
        FallbackPolicy::Identity => ctx.transforms.identity(property).unwrap_or(0.0),
    }
}

/// Parse the leading number of a computed style value (`"10px"` -> 10,
/// `" -2.5deg"` -> -2.5, `"none"` -> None). Trailing text is ignored.
pub fn parse_style_number(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }
    // Exponent only counts when followed by at least one digit.
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }
    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::Dom;

    struct FixedStyle(Option<&'static str>);

    impl Dom for FixedStyle {
        type Element = ();
    }

    impl StyleReader for FixedStyle {
        fn computed_style_value(&self, _element: &(), _property: &str) -> Option<String> {
            self.0.map(str::to_string)
        }
    }

    fn ctx(transforms: &TransformRegistry, fallback: FallbackPolicy) -> ResolveCtx<'_> {
        ResolveCtx {
            selector: ".logo",
            global_over: 70.0,
            transforms,
            fallback,
        }
    }

    #[test]
    fn parses_leading_numbers() {
        assert_eq!(parse_style_number("10px"), Some(10.0));
        assert_eq!(parse_style_number("  -2.5deg"), Some(-2.5));
        assert_eq!(parse_style_number(".5"), Some(0.5));
        assert_eq!(parse_style_number("5."), Some(5.0));
        assert_eq!(parse_style_number("+3"), Some(3.0));
        assert_eq!(parse_style_number("1e2px"), Some(100.0));
        assert_eq!(parse_style_number("2em"), Some(2.0));
        assert_eq!(parse_style_number("none"), None);
        assert_eq!(parse_style_number(""), None);
        assert_eq!(parse_style_number("-"), None);
        assert_eq!(parse_style_number("."), None);
        assert_eq!(parse_style_number("1e999"), None);
    }

    #[test]
    fn infers_both_endpoints_from_style() {
        let reg = TransformRegistry::default();
        let reader = FixedStyle(Some("10px"));
        let b = resolve(
            "padding-top",
            &Tween::default(),
            &reader,
            Some(&()),
            &ctx(&reg, FallbackPolicy::Zero),
        )
        .unwrap();
        assert_eq!((b.from, b.to), (10.0, 10.0));
        assert!(b.is_constant());
        assert_eq!(b.value_at(1000.0), 10.0);
    }

    #[test]
    fn default_units() {
        let reg = TransformRegistry::default();
        let reader = FixedStyle(None);
        let c = ctx(&reg, FallbackPolicy::Zero);
        let scale = resolve("scale", &Tween::to(2.0), &reader, Some(&()), &c).unwrap();
        assert_eq!(scale.unit, "");
        assert!(scale.is_transform);
        let pad = resolve("padding-top", &Tween::to(2.0), &reader, Some(&()), &c).unwrap();
        assert_eq!(pad.unit, "px");
        assert!(!pad.is_transform);
        let rot = resolve(
            "rotate",
            &Tween::to(90.0).with_unit("deg"),
            &reader,
            Some(&()),
            &c,
        )
        .unwrap();
        assert_eq!(rot.unit, "deg");
        let bare = resolve(
            "opacity",
            &Tween::to(1.0).with_unit(""),
            &reader,
            Some(&()),
            &c,
        )
        .unwrap();
        assert_eq!(bare.unit, "");
    }

    #[test]
    fn over_defaults_to_global_and_rejects_non_positive() {
        let reg = TransformRegistry::default();
        let reader = FixedStyle(None);
        let c = ctx(&reg, FallbackPolicy::Zero);
        let b = resolve("top", &Tween::between(0.0, 10.0), &reader, None, &c).unwrap();
        assert_eq!(b.over, 70.0);
        let b = resolve(
            "top",
            &Tween::between(0.0, 10.0).with_over(300.0),
            &reader,
            None,
            &c,
        )
        .unwrap();
        assert_eq!(b.over, 300.0);

        for bad in [0.0, -5.0] {
            let err = resolve(
                "top",
                &Tween::between(0.0, 10.0).with_over(bad),
                &reader,
                None,
                &c,
            )
            .unwrap_err();
            assert_eq!(
                err,
                ConfigError::InvalidOver {
                    selector: ".logo".into(),
                    property: "top".into(),
                    value: bad,
                }
            );
        }
    }

    #[test]
    fn unparsable_style_uses_fallback_policy() {
        let reg = TransformRegistry::default();
        let reader = FixedStyle(Some("none"));
        let zero = resolve(
            "scale",
            &Tween::to(0.5),
            &reader,
            Some(&()),
            &ctx(&reg, FallbackPolicy::Zero),
        )
        .unwrap();
        assert_eq!(zero.from, 0.0);
        let ident = resolve(
            "scale",
            &Tween::to(0.5),
            &reader,
            Some(&()),
            &ctx(&reg, FallbackPolicy::Identity),
        )
        .unwrap();
        assert_eq!(ident.from, 1.0);
        assert_eq!(ident.value_at(35.0), 0.75);
        // Non-transform properties have no identity; they fall back to zero.
        let pad = resolve(
            "padding-top",
            &Tween::to(20.0),
            &reader,
            Some(&()),
            &ctx(&reg, FallbackPolicy::Identity),
        )
        .unwrap();
        assert_eq!(pad.from, 0.0);
    }

    #[test]
    fn missing_element_skips_style_read() {
        let reg = TransformRegistry::default();
        let reader = FixedStyle(Some("42"));
        let b = resolve(
            "width",
            &Tween::to(10.0),
            &reader,
            None,
            &ctx(&reg, FallbackPolicy::Zero),
        )
        .unwrap();
        assert_eq!(b.from, 0.0);
    }

    #[test]
    fn non_finite_endpoints_are_rejected() {
        let reg = TransformRegistry::default();
        let reader = FixedStyle(Some("5px"));
        let c = ctx(&reg, FallbackPolicy::Zero);
        let err = resolve("top", &Tween::between(f64::NAN, 1.0), &reader, None, &c).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidEndpoint { endpoint: "from", value, .. } if value.is_nan()
        ));
        assert_eq!(err.property(), Some("top"));
        // An explicit `to` is checked even when `from` comes from the style.
        let err = resolve("top", &Tween::to(f64::INFINITY), &reader, Some(&()), &c).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidEndpoint {
                selector: ".logo".into(),
                property: "top".into(),
                endpoint: "to",
                value: f64::INFINITY,
            }
        );
    }

    #[test]
    fn format_appends_unit() {
        let b = PropertyBinding {
            from: 0.0,
            to: 90.0,
            over: 100.0,
            unit: "deg".into(),
            is_transform: true,
        };
        assert_eq!(b.format_at(50.0), "45deg");
        assert_eq!(b.format_at(-1.0), "0deg");
    }
}
