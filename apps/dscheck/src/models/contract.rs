//! Contract schema: the declarative expectations extracted from the design
//! tool for one component.
//!
//! Property and token tables keep their document order; the evaluator walks
//! them in that order so reports are stable across runs.

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use serde_json::Value as Json;
use std::fmt;
use std::marker::PhantomData;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Root contract document.
pub struct Contract {
    pub component: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub extracted_at: Option<String>,
    #[serde(default, deserialize_with = "ordered")]
    pub properties: Vec<(String, PropertySpec)>,
    #[serde(default, alias = "tokens", deserialize_with = "ordered")]
    pub design_tokens: Vec<(String, Json)>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Expectations for a single component property.
pub struct PropertySpec {
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub default: Option<Json>,
    #[serde(default, alias = "values")]
    pub allowed_values: Option<Vec<Json>>,
    /// Type alias holding the union when it differs from the declared type.
    #[serde(default)]
    pub type_name: Option<String>,
}

impl Contract {
    pub fn version_label(&self) -> &str {
        self.version.as_deref().unwrap_or("unversioned")
    }

    pub fn property(&self, name: &str) -> Option<&PropertySpec> {
        self.properties
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, spec)| spec)
    }

    /// Collect every structural invariant violation.
    ///
    /// - at least one property is required
    /// - required properties carry a default
    /// - `allowedValues` is non-empty and contains the default
    pub fn violations(&self) -> Vec<String> {
        let mut out = Vec::new();
        if !self.properties.iter().any(|(_, p)| p.required) {
            out.push("contract declares no required property".to_string());
        }
        for (name, spec) in &self.properties {
            if spec.required && spec.default.is_none() {
                out.push(format!("required property '{}' has no default", name));
            }
            if let Some(values) = spec.allowed_values.as_ref() {
                if values.is_empty() {
                    out.push(format!("property '{}' has an empty allowedValues", name));
                    continue;
                }
                if let Some(def) = spec.default.as_ref() {
                    let def = literal(def);
                    if !values.iter().any(|v| literal(v) == def) {
                        out.push(format!(
                            "default '{}' of property '{}' is not in allowedValues [{}]",
                            def,
                            name,
                            spec.allowed_literals().join(", ")
                        ));
                    }
                }
            }
        }
        for (name, value) in &self.design_tokens {
            if literal(value).trim().is_empty() {
                out.push(format!("design token '{}' has an empty value", name));
            }
        }
        out
    }
}

impl PropertySpec {
    pub fn default_literal(&self) -> Option<String> {
        self.default.as_ref().map(literal)
    }

    pub fn allowed_literals(&self) -> Vec<String> {
        self.allowed_values
            .as_ref()
            .map(|vs| vs.iter().map(literal).collect())
            .unwrap_or_default()
    }
}

/// String form of a contract literal: strings verbatim, other scalars via
/// their JSON text.
pub fn literal(value: &Json) -> String {
    match value {
        Json::String(s) => s.clone(),
        Json::Null => String::new(),
        other => other.to_string(),
    }
}

/// Deserialize a map into a `Vec` of entries in document order.
fn ordered<'de, D, T>(deserializer: D) -> Result<Vec<(String, T)>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    struct OrderedVisitor<T>(PhantomData<T>);

    impl<'de, T: Deserialize<'de>> Visitor<'de> for OrderedVisitor<T> {
        type Value = Vec<(String, T)>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut out: Vec<(String, T)> = Vec::new();
            while let Some((k, v)) = map.next_entry::<String, T>()? {
                if let Some(slot) = out.iter_mut().find(|(name, _)| *name == k) {
                    slot.1 = v;
                } else {
                    out.push((k, v));
                }
            }
            Ok(out)
        }
    }

    deserializer.deserialize_map(OrderedVisitor(PhantomData))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Contract {
        serde_json::from_str(s).unwrap()
    }

    #[test]
    fn test_properties_keep_document_order() {
        let c = parse(
            r#"{
  "component": "Button",
  "properties": {
    "variant": {"required": true, "default": "primary"},
    "size": {"required": true, "default": "md"},
    "disabled": {"required": false, "default": false}
  },
  "tokens": {"radius": "8px", "gap": 8}
}"#,
        );
        let names: Vec<_> = c.properties.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["variant", "size", "disabled"]);
        assert_eq!(c.design_tokens.len(), 2);
        assert_eq!(literal(&c.design_tokens[1].1), "8");
        assert_eq!(
            c.property("disabled").and_then(|p| p.default_literal()),
            Some("false".to_string())
        );
    }

    #[test]
    fn test_violations_flag_default_outside_allowed_values() {
        let c = parse(
            r#"{
  "component": "Badge",
  "properties": {
    "size": {"required": true, "default": "xxl", "allowedValues": ["sm", "md"]},
    "tone": {"required": true},
    "shape": {"values": []}
  }
}"#,
        );
        let v = c.violations();
        assert_eq!(v.len(), 3);
        assert!(v[0].contains("'xxl'"));
        assert!(v[1].contains("'tone' has no default"));
        assert!(v[2].contains("'shape' has an empty allowedValues"));
    }

    #[test]
    fn test_violations_require_one_required_property() {
        let c = parse(r#"{"component": "Tooltip", "properties": {"text": {"default": ""}}}"#);
        assert_eq!(
            c.violations(),
            vec!["contract declares no required property".to_string()]
        );
    }

    #[test]
    fn test_boolean_allowed_values_match_default() {
        let c = parse(
            r#"{"component": "Toggle", "properties": {"checked": {"required": true, "default": false, "allowedValues": [true, false]}}}"#,
        );
        assert!(c.violations().is_empty());
    }
}
