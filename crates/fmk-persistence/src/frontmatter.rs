//! YAML front matter for markdown notes.
//!
//! A note carries metadata in a block delimited by `---` lines at the very top
//! of the file:
//!
//! ```markdown
//! ---
//! status: todo
//! priority: high
//! ---
//! Body text
//! ```
//!
//! Only the metadata block is interpreted. The body is kept byte for byte so a
//! rewrite of one key never touches the note's content.

use fmk_core::{FmkError, FmkResult};
use serde_yaml_ng::{Mapping, Value};

const DELIMITER: &str = "---";

/// A markdown note split into its metadata mapping and the untouched body.
#[derive(Debug, Clone, Default)]
pub struct FrontmatterDocument {
    metadata: Mapping,
    body: String,
}

impl FrontmatterDocument {
    /// Split `content` into front matter and body.
    ///
    /// Content without an opening delimiter, or without a closing one, is
    /// treated as a note with empty metadata.
    pub fn parse(content: &str) -> FmkResult<Self> {
        let Some((yaml, body)) = split(content) else {
            return Ok(Self {
                metadata: Mapping::new(),
                body: content.to_string(),
            });
        };

        let metadata = if yaml.trim().is_empty() {
            Mapping::new()
        } else {
            match serde_yaml_ng::from_str::<Value>(yaml) {
                Ok(Value::Mapping(mapping)) => mapping,
                Ok(Value::Null) => Mapping::new(),
                Ok(_) => {
                    return Err(FmkError::Serialization(
                        "front matter is not a key/value mapping".to_string(),
                    ))
                }
                Err(e) => {
                    return Err(FmkError::Serialization(format!(
                        "Failed to parse YAML front matter: {}",
                        e
                    )))
                }
            }
        };

        Ok(Self {
            metadata,
            body: body.to_string(),
        })
    }

    /// Scalar value at `key` rendered as text.
    ///
    /// Strings come back verbatim, numbers and booleans in canonical form.
    /// Null, lists and nested mappings count as absent.
    pub fn get(&self, key: &str) -> Option<String> {
        match self.metadata.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.metadata.contains_key(key)
    }

    /// Upsert `key`, returning the previous value if there was one.
    pub fn set(&mut self, key: &str, value: &str) -> Option<Value> {
        self.metadata.insert(
            Value::String(key.to_string()),
            Value::String(value.to_string()),
        )
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Serialize back to note text. Keys keep their original order.
    pub fn render(&self) -> FmkResult<String> {
        let yaml = if self.metadata.is_empty() {
            String::new()
        } else {
            serde_yaml_ng::to_string(&self.metadata)
                .map_err(|e| FmkError::Serialization(e.to_string()))?
        };
        Ok(format!("{DELIMITER}\n{yaml}{DELIMITER}\n{}", self.body))
    }
}

/// Returns `(yaml, body)` when `content` opens with a delimited block.
fn split(content: &str) -> Option<(&str, &str)> {
    let rest = content
        .strip_prefix("---\r\n")
        .or_else(|| content.strip_prefix("---\n"))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == DELIMITER {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Some((yaml, body));
        }
        offset += line.len();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reads_scalars() {
        let doc = FrontmatterDocument::parse(
            "---\nstatus: todo\nestimate: 3\nurgent: true\ntags:\n  - a\n---\n# Title\n",
        )
        .unwrap();

        assert_eq!(doc.get("status").as_deref(), Some("todo"));
        assert_eq!(doc.get("estimate").as_deref(), Some("3"));
        assert_eq!(doc.get("urgent").as_deref(), Some("true"));
        assert_eq!(doc.get("tags"), None);
        assert_eq!(doc.get("missing"), None);
        assert_eq!(doc.body(), "# Title\n");
    }

    #[test]
    fn test_no_frontmatter_is_empty_metadata() {
        let doc = FrontmatterDocument::parse("Just a note\n").unwrap();
        assert!(!doc.contains_key("status"));
        assert_eq!(doc.body(), "Just a note\n");
    }

    #[test]
    fn test_unclosed_block_is_treated_as_body() {
        let content = "---\nstatus: todo\nno closing line\n";
        let doc = FrontmatterDocument::parse(content).unwrap();
        assert_eq!(doc.get("status"), None);
        assert_eq!(doc.body(), content);
    }

    #[test]
    fn test_set_preserves_other_keys_and_body() {
        let mut doc =
            FrontmatterDocument::parse("---\nstatus: todo\npriority: high\n---\nBody\n---\nMore\n")
                .unwrap();
        let previous = doc.set("status", "done");
        assert!(previous.is_some());

        let rendered = doc.render().unwrap();
        let reparsed = FrontmatterDocument::parse(&rendered).unwrap();
        assert_eq!(reparsed.get("status").as_deref(), Some("done"));
        assert_eq!(reparsed.get("priority").as_deref(), Some("high"));
        assert_eq!(reparsed.body(), "Body\n---\nMore\n");
    }

    #[test]
    fn test_set_creates_block_when_missing() {
        let mut doc = FrontmatterDocument::parse("Body only\n").unwrap();
        assert!(doc.set("status", "doing").is_none());

        let rendered = doc.render().unwrap();
        assert!(rendered.starts_with("---\nstatus: doing\n---\n"));
        assert!(rendered.ends_with("Body only\n"));
    }

    #[test]
    fn test_crlf_delimiters() {
        let doc = FrontmatterDocument::parse("---\r\nstatus: todo\r\n---\r\nBody\r\n").unwrap();
        assert_eq!(doc.get("status").as_deref(), Some("todo"));
        assert_eq!(doc.body(), "Body\r\n");
    }

    #[test]
    fn test_non_mapping_frontmatter_is_an_error() {
        let result = FrontmatterDocument::parse("---\n- a\n- b\n---\n");
        assert!(matches!(result, Err(FmkError::Serialization(_))));
    }
}
