//! Posts and their front matter.
//!
//! A post is a path-identified markdown document with an optional YAML
//! front-matter block. Silo-assigned identifiers live in that block under
//! `<silo>_syndicate_id` keys; once written, a key is never changed.

use serde_yaml::{Mapping, Value};

use crate::results::SiloId;

/// Returns the front-matter key holding a silo's assigned identifier.
#[must_use]
pub fn syndicate_key(silo: &str) -> String {
    format!("{}_syndicate_id", silo.to_lowercase())
}

/// A post read from the triggering commit.
///
/// The front matter is parsed exactly once, at construction, so metadata
/// reads are identity-preserving: every accessor sees the same structure.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    /// Repository-relative path of the post source file.
    pub path: String,
    front: Mapping,
    body: String,
}

impl Post {
    /// Parses a raw document into front matter and body.
    ///
    /// A document without a leading `---` fence has empty front matter and
    /// the whole text as its body.
    ///
    /// # Errors
    ///
    /// Returns an error if the front-matter block is not valid YAML.
    pub fn parse(path: &str, raw: &str) -> Result<Self, String> {
        let (front, body) = split_document(raw);
        let front = match front {
            Some(block) => serde_yaml::from_str(block)
                .map_err(|e| format!("Failed to parse front matter of {path}: {e}"))?,
            None => Mapping::new(),
        };
        Ok(Self { path: path.to_string(), front, body: body.to_string() })
    }

    /// The parsed front-matter mapping.
    #[must_use]
    pub fn front(&self) -> &Mapping {
        &self.front
    }

    /// The publishable content below the front matter.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// The post title from front matter, if any.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.front.get("title").and_then(Value::as_str)
    }

    /// Whether the post opts into immediate publication (`published: true`).
    #[must_use]
    pub fn published(&self) -> bool {
        self.front.get("published").and_then(Value::as_bool).unwrap_or(false)
    }

    /// The canonical URL from front matter, if any.
    #[must_use]
    pub fn canonical_url(&self) -> Option<&str> {
        self.front.get("canonical_url").and_then(Value::as_str)
    }

    /// Post tags, from either a YAML sequence or a comma-separated string.
    #[must_use]
    pub fn tags(&self) -> Vec<String> {
        match self.front.get("tags") {
            Some(Value::Sequence(items)) => {
                items.iter().filter_map(Value::as_str).map(String::from).collect()
            }
            Some(Value::String(csv)) => {
                csv.split(',').map(str::trim).filter(|t| !t.is_empty()).map(String::from).collect()
            }
            _ => Vec::new(),
        }
    }

    /// Returns the identifier this silo previously assigned, if any.
    ///
    /// # Errors
    ///
    /// Returns an error when `silo` is empty, which is a caller bug rather
    /// than a runtime condition.
    pub fn silo_id(&self, silo: &str) -> Result<Option<SiloId>, String> {
        if silo.trim().is_empty() {
            return Err(format!("missing silo name while reading metadata of {}", self.path));
        }
        Ok(self.front.get(syndicate_key(silo)).and_then(scalar_id))
    }

    /// Returns a new revision of this post with the given silo ids merged
    /// into its front matter.
    ///
    /// Callers must only pass silos the post does not yet carry an id for;
    /// the marking engine guarantees that by filtering first.
    #[must_use]
    pub fn with_silo_ids<'a>(&self, ids: impl IntoIterator<Item = (&'a str, &'a SiloId)>) -> Self {
        let mut front = self.front.clone();
        for (silo, id) in ids {
            let value = match id {
                SiloId::Int(n) => Value::from(*n),
                SiloId::Text(s) => Value::from(s.as_str()),
            };
            front.insert(Value::from(syndicate_key(silo)), value);
        }
        Self { path: self.path.clone(), front, body: self.body.clone() }
    }

    /// Re-serializes the post: front-matter fence plus untouched body.
    ///
    /// # Errors
    ///
    /// Returns an error if the front matter cannot be serialized.
    pub fn document(&self) -> Result<String, String> {
        if self.front.is_empty() {
            return Ok(self.body.clone());
        }
        let yaml = serde_yaml::to_string(&self.front)
            .map_err(|e| format!("Failed to serialize front matter of {}: {e}", self.path))?;
        Ok(format!("---\n{yaml}---\n{}", self.body))
    }
}

/// Splits a raw document into its front-matter block and body.
fn split_document(raw: &str) -> (Option<&str>, &str) {
    let Some(rest) = raw.strip_prefix("---\n") else {
        return (None, raw);
    };
    if let Some(idx) = rest.find("\n---\n") {
        (Some(&rest[..idx]), &rest[idx + 5..])
    } else if let Some(front) = rest.strip_suffix("\n---") {
        (Some(front), "")
    } else {
        (None, raw)
    }
}

/// Interprets a front-matter value as an opaque silo id.
fn scalar_id(value: &Value) -> Option<SiloId> {
    match value {
        Value::Number(n) => Some(match n.as_i64() {
            Some(i) => SiloId::Int(i),
            None => SiloId::Text(n.to_string()),
        }),
        Value::String(s) => Some(SiloId::Text(s.clone())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = "---\ndev_syndicate_id: 42\ntitle: A beautiful mock\ntags: beauty, fake\n---\nWhat is a body?\n";

    #[test]
    fn parses_front_matter_and_body() {
        let post = Post::parse("posts/mock.md", DOCUMENT).unwrap();
        assert_eq!(post.title(), Some("A beautiful mock"));
        assert_eq!(post.body(), "What is a body?\n");
        assert_eq!(post.tags(), vec!["beauty".to_string(), "fake".to_string()]);
    }

    #[test]
    fn document_without_fence_is_all_body() {
        let post = Post::parse("posts/plain.md", "Just text.\n").unwrap();
        assert!(post.front().is_empty());
        assert_eq!(post.body(), "Just text.\n");
        assert_eq!(post.document().unwrap(), "Just text.\n");
    }

    #[test]
    fn silo_id_reads_the_conventional_key() {
        let post = Post::parse("posts/mock.md", DOCUMENT).unwrap();
        assert_eq!(post.silo_id("dev").unwrap(), Some(SiloId::Int(42)));
        assert_eq!(post.silo_id("DEV").unwrap(), Some(SiloId::Int(42)));
        assert_eq!(post.silo_id("medium").unwrap(), None);
    }

    #[test]
    fn silo_id_rejects_an_empty_silo_name() {
        let post = Post::parse("posts/mock.md", DOCUMENT).unwrap();
        assert!(post.silo_id("").is_err());
        assert!(post.silo_id("  ").is_err());
    }

    #[test]
    fn tags_accept_a_yaml_sequence() {
        let post = Post::parse("posts/t.md", "---\ntags:\n- beauty\n- fake\n---\nbody\n").unwrap();
        assert_eq!(post.tags(), vec!["beauty".to_string(), "fake".to_string()]);
    }

    #[test]
    fn with_silo_ids_adds_keys_and_preserves_body() {
        let post = Post::parse("posts/hello.md", "---\ntitle: Hello\n---\nHi.\n").unwrap();
        let id = SiloId::Text("abc123".into());
        let marked = post.with_silo_ids([("Medium", &id)]);
        assert_eq!(marked.silo_id("medium").unwrap(), Some(id));
        assert_eq!(marked.body(), "Hi.\n");
        // Existing keys are untouched.
        assert_eq!(marked.title(), Some("Hello"));
    }

    #[test]
    fn document_round_trips_keys_and_body() {
        let post = Post::parse("posts/mock.md", DOCUMENT).unwrap();
        let reparsed = Post::parse("posts/mock.md", &post.document().unwrap()).unwrap();
        assert_eq!(reparsed.front(), post.front());
        assert_eq!(reparsed.body(), post.body());
    }

    #[test]
    fn front_is_identity_preserving() {
        let post = Post::parse("posts/mock.md", DOCUMENT).unwrap();
        assert!(std::ptr::eq(post.front(), post.front()));
    }
}
