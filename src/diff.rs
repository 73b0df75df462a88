//! Line diffs between schemas resolved at two versions

use serde::Serialize;
use similar::{ChangeTag, TextDiff};

use crate::error::Result;
use crate::resolver::SchemaResolver;
use crate::schema::SchemaTypeEntry;
use crate::version::FormatVersion;

/// One changed line of pretty-printed schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffLine {
    /// `true` for lines only in the newer schema
    pub added: bool,
    /// Line content without trailing newline
    pub text: String,
}

/// Difference between an entry's schema at two versions
#[derive(Debug, Clone, Serialize)]
pub struct SchemaDiff {
    pub from: FormatVersion,
    pub to: FormatVersion,
    pub lines: Vec<DiffLine>,
}

impl SchemaDiff {
    /// Compare `entry` resolved at `from` with `entry` resolved at `to`
    pub fn between(entry: &SchemaTypeEntry, from: &FormatVersion, to: &FormatVersion) -> Result<Self> {
        let resolver = SchemaResolver::new(entry);
        let old_text = serde_json::to_string_pretty(&resolver.resolve(Some(from)))?;
        let new_text = serde_json::to_string_pretty(&resolver.resolve(Some(to)))?;

        let diff = TextDiff::from_lines(&old_text, &new_text);
        let lines = diff
            .iter_all_changes()
            .filter_map(|change| {
                let added = match change.tag() {
                    ChangeTag::Insert => true,
                    ChangeTag::Delete => false,
                    ChangeTag::Equal => return None,
                };
                Some(DiffLine {
                    added,
                    text: change.value().trim_end_matches('\n').to_string(),
                })
            })
            .collect();

        Ok(Self {
            from: from.clone(),
            to: to.clone(),
            lines,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn added(&self) -> usize {
        self.lines.iter().filter(|l| l.added).count()
    }

    pub fn removed(&self) -> usize {
        self.lines.len() - self.added()
    }

    /// Render as `+`/`-` prefixed lines
    pub fn render(&self) -> String {
        self.lines
            .iter()
            .map(|l| format!("{}{}", if l.added { '+' } else { '-' }, l.text))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::SchemaPath;
    use crate::schema::{SchemaModification, VersionChangeSet};
    use serde_json::json;

    fn entry() -> SchemaTypeEntry {
        SchemaTypeEntry::new(vec!["*.json".into()], json!({"properties": {"x": {"type": "string"}}}))
            .with_changes(VersionChangeSet::new(
                "1.1",
                vec![SchemaModification::modify(
                    SchemaPath::parse_dotted("properties.x.type"),
                    json!("number"),
                )],
            ))
    }

    #[test]
    fn test_diff_between_versions() {
        let diff = SchemaDiff::between(&entry(), &"1.0".into(), &"1.1".into()).unwrap();
        assert_eq!(diff.added(), 1);
        assert_eq!(diff.removed(), 1);
        let rendered = diff.render();
        assert!(rendered.contains("-      \"type\": \"string\""));
        assert!(rendered.contains("+      \"type\": \"number\""));
    }

    #[test]
    fn test_diff_same_resolution_is_empty() {
        let diff = SchemaDiff::between(&entry(), &"1.1".into(), &"5".into()).unwrap();
        assert!(diff.is_empty());
        assert_eq!(diff.render(), "");
    }
}
