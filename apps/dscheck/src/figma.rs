//! Component extraction from a design-tool file export.
//!
//! Walks the document tree, collects `COMPONENT` nodes whose name contains a
//! needle, and keeps the style fields contracts are authored from.

use serde::Serialize;
use serde_json::{Map, Value as Json};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_FILE: &str = ".figma/cache/file-full.json";
pub const DEFAULT_LIMIT: usize = 10;

#[derive(Debug, Error)]
pub enum FigmaError {
    #[error("design file not found: {0} (download the file export first)")]
    NotFound(PathBuf),
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write {path}: {reason}")]
    Write { path: PathBuf, reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// One component node and the style fields found on it.
pub struct ComponentNode {
    pub name: String,
    pub id: Option<String>,
    pub path: String,
    pub properties: Map<String, Json>,
}

#[derive(Debug)]
/// Result of an extraction run.
pub struct Extraction {
    pub components: Vec<ComponentNode>,
    pub variants: Vec<(String, usize)>,
    pub written: usize,
    pub out: PathBuf,
}

const COPIED_FIELDS: &[(&str, &str)] = &[
    ("fills", "fills"),
    ("strokes", "strokes"),
    ("effects", "effects"),
    ("cornerRadius", "cornerRadius"),
    ("itemSpacing", "itemSpacing"),
    ("layoutMode", "layoutMode"),
    ("characters", "text"),
    ("style", "textStyle"),
];

/// Depth-first collection of component nodes whose name contains `needle`.
///
/// `path` is the slash-joined chain of ancestor names, starting with `/`.
pub fn find_components(node: &Json, needle: &str) -> Vec<ComponentNode> {
    let mut out = Vec::new();
    walk(node, "", needle, &mut out);
    out
}

fn walk(node: &Json, path: &str, needle: &str, out: &mut Vec<ComponentNode>) {
    let Json::Object(obj) = node else {
        return;
    };
    let name = obj.get("name").and_then(Json::as_str).unwrap_or("");
    if obj.get("type").and_then(Json::as_str) == Some("COMPONENT") && name.contains(needle) {
        out.push(ComponentNode {
            name: name.to_string(),
            id: obj.get("id").and_then(Json::as_str).map(str::to_string),
            path: path.to_string(),
            properties: style_properties(obj),
        });
    }
    if let Some(Json::Array(children)) = obj.get("children") {
        let label = if name.is_empty() { "unnamed" } else { name };
        let child_path = format!("{}/{}", path, label);
        for child in children {
            walk(child, &child_path, needle, out);
        }
    }
}

fn style_properties(obj: &Map<String, Json>) -> Map<String, Json> {
    let mut props = Map::new();
    for (from, to) in COPIED_FIELDS {
        if let Some(v) = obj.get(*from) {
            props.insert(to.to_string(), v.clone());
        }
    }
    if obj.contains_key("paddingLeft") {
        let pad = |k: &str| obj.get(k).cloned().unwrap_or(Json::Null);
        let mut padding = Map::new();
        padding.insert("left".into(), pad("paddingLeft"));
        padding.insert("right".into(), pad("paddingRight"));
        padding.insert("top".into(), pad("paddingTop"));
        padding.insert("bottom".into(), pad("paddingBottom"));
        props.insert("padding".into(), Json::Object(padding));
    }
    props
}

/// Distinct component names with their instance counts, sorted by name.
pub fn variant_counts(components: &[ComponentNode]) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for c in components {
        *counts.entry(c.name.clone()).or_default() += 1;
    }
    counts.into_iter().collect()
}

/// Extract components matching `needle` from the file at `file` and write
/// the first `limit` of them as pretty JSON to `out`.
pub fn extract_components(
    file: &Path,
    needle: &str,
    out: &Path,
    limit: usize,
) -> Result<Extraction, FigmaError> {
    if !file.is_file() {
        return Err(FigmaError::NotFound(file.to_path_buf()));
    }
    let text = fs::read_to_string(file).map_err(|source| FigmaError::Read {
        path: file.to_path_buf(),
        source,
    })?;
    let doc: Json = serde_json::from_str(&text).map_err(|source| FigmaError::Parse {
        path: file.to_path_buf(),
        source,
    })?;
    let root = doc.get("document").cloned().unwrap_or(Json::Null);
    let components = find_components(&root, needle);
    tracing::debug!(needle, found = components.len(), "extracted components");

    let head: Vec<&ComponentNode> = components.iter().take(limit).collect();
    let write_err = |reason: String| FigmaError::Write {
        path: out.to_path_buf(),
        reason,
    };
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| write_err(e.to_string()))?;
    }
    let body = serde_json::to_string_pretty(&head).map_err(|e| write_err(e.to_string()))?;
    fs::write(out, body).map_err(|e| write_err(e.to_string()))?;

    Ok(Extraction {
        variants: variant_counts(&components),
        written: head.len(),
        out: out.to_path_buf(),
        components,
    })
}

/// Default cache location for an extraction of `needle`.
pub fn default_out(needle: &str) -> PathBuf {
    PathBuf::from(format!(
        ".figma/cache/{}-components.json",
        crate::config::normalize_component(needle)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn doc() -> Json {
        json!({
            "document": {
                "name": "Document",
                "children": [{
                    "name": "Components",
                    "type": "CANVAS",
                    "children": [
                        {
                            "name": "Button/Primary",
                            "id": "1:2",
                            "type": "COMPONENT",
                            "cornerRadius": 8,
                            "paddingLeft": 16, "paddingRight": 16, "paddingTop": 8, "paddingBottom": 8,
                            "itemSpacing": 8,
                            "layoutMode": "HORIZONTAL",
                            "children": [
                                {"name": "Label", "type": "TEXT", "characters": "Button", "style": {"fontWeight": 600}}
                            ]
                        },
                        {"name": "Button/Primary", "id": "1:3", "type": "COMPONENT"},
                        {"name": "Button Group", "id": "1:4", "type": "COMPONENT_SET"},
                        {"name": "Toggle", "id": "1:5", "type": "COMPONENT"}
                    ]
                }]
            }
        })
    }

    #[test]
    fn test_find_components_filters_type_and_name() {
        let found = find_components(&doc()["document"], "Button");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].id.as_deref(), Some("1:2"));
        assert_eq!(found[0].path, "/Document/Components");
        assert_eq!(found[0].properties["cornerRadius"], 8);
        assert_eq!(found[0].properties["padding"]["top"], 8);
        assert!(found[0].properties.get("text").is_none());
    }

    #[test]
    fn test_text_fields_are_renamed() {
        let found = find_components(
            &json!({"type": "COMPONENT", "name": "Badge", "characters": "3", "style": {"fontSize": 12}}),
            "Badge",
        );
        assert_eq!(found[0].properties["text"], "3");
        assert_eq!(found[0].properties["textStyle"]["fontSize"], 12);
        assert_eq!(found[0].path, "");
    }

    #[test]
    fn test_variant_counts_sorted() {
        let found = find_components(&doc()["document"], "Button");
        assert_eq!(variant_counts(&found), vec![("Button/Primary".to_string(), 2)]);
    }

    #[test]
    fn test_extract_components_writes_limited_output() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("file-full.json");
        fs::write(&file, doc().to_string()).unwrap();
        let out = dir.path().join("cache/button-components.json");
        let ex = extract_components(&file, "Button", &out, 1).unwrap();
        assert_eq!(ex.components.len(), 2);
        assert_eq!(ex.written, 1);
        let written: Json = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(written.as_array().unwrap().len(), 1);
        assert_eq!(written[0]["name"], "Button/Primary");
    }

    #[test]
    fn test_extract_components_missing_file() {
        let dir = tempdir().unwrap();
        let err = extract_components(
            &dir.path().join("nope.json"),
            "Button",
            &dir.path().join("out.json"),
            DEFAULT_LIMIT,
        )
        .unwrap_err();
        assert!(matches!(err, FigmaError::NotFound(_)));
        assert_eq!(default_out("Button"), PathBuf::from(".figma/cache/button-components.json"));
    }
}
