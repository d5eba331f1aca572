//! Evidence map returned alongside an answer.
//!
//! The service sends a JSON object keyed by citation id. The tokenizer never
//! consults it; renderers look ids up here and must handle a missing entry.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;

/// Placeholder shown for missing page or source metadata.
pub const UNKNOWN: &str = "unknown";

/// A page reference, which the service may send as a number or a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PageLabel {
    Number(serde_json::Number),
    Text(String),
}

impl PageLabel {
    fn is_empty(&self) -> bool {
        matches!(self, PageLabel::Text(s) if s.is_empty())
    }
}

impl fmt::Display for PageLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageLabel::Number(n) => match n.as_f64() {
                // Integral floats print without a fraction: 6.0 as 6
                Some(v) if n.is_f64() && v.fract() == 0.0 && v.abs() < 1e15 => {
                    write!(f, "{}", v as i64)
                }
                _ => write!(f, "{}", n),
            },
            PageLabel::Text(s) => f.write_str(s),
        }
    }
}

/// Metadata for one retrieved chunk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CitationItem {
    /// Loader page index (may be 0-based)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<PageLabel>,

    /// Printed page label, preferred for display
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_label: Option<PageLabel>,

    /// Source path of the indexed document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Short excerpt of the chunk
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,

    /// Full chunk text, when the service includes it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Citation id to evidence, in the order the service listed them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CitationsMap {
    entries: Vec<(String, CitationItem)>,
}

impl CitationsMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up evidence for a citation id.
    pub fn get(&self, id: &str) -> Option<&CitationItem> {
        self.entries
            .iter()
            .find(|(key, _)| key == id)
            .map(|(_, item)| item)
    }

    /// Insert or replace an entry; a new id goes to the end.
    pub fn insert(&mut self, id: impl Into<String>, item: CitationItem) {
        let id = id.into();
        match self.entries.iter_mut().find(|(key, _)| *key == id) {
            Some(entry) => entry.1 = item,
            None => self.entries.push((id, item)),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CitationItem)> {
        self.entries.iter().map(|(id, item)| (id.as_str(), item))
    }
}

impl FromIterator<(String, CitationItem)> for CitationsMap {
    fn from_iter<I: IntoIterator<Item = (String, CitationItem)>>(iter: I) -> Self {
        let mut map = CitationsMap::new();
        for (id, item) in iter {
            map.insert(id, item);
        }
        map
    }
}

impl Serialize for CitationsMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, item) in &self.entries {
            map.serialize_entry(id, item)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CitationsMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CitationsVisitor;

        impl<'de> Visitor<'de> for CitationsVisitor {
            type Value = CitationsMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of citation id to evidence")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut map = CitationsMap::new();
                while let Some((id, item)) = access.next_entry::<String, CitationItem>()? {
                    map.insert(id, item);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(CitationsVisitor)
    }
}

/// Page to show for a chunk: `page_label`, else `page`, else [`UNKNOWN`].
///
/// `page_label` wins even when it is an empty string, which then renders as
/// unknown rather than falling back to `page`.
pub fn format_page_label(item: Option<&CitationItem>) -> String {
    let Some(item) = item else {
        return UNKNOWN.to_string();
    };

    match item.page_label.as_ref().or(item.page.as_ref()) {
        Some(label) if !label.is_empty() => label.to_string(),
        _ => UNKNOWN.to_string(),
    }
}

/// File name of a source path, accepting `/` and `\` separators.
pub fn format_source(source: Option<&str>) -> String {
    match source {
        None | Some("") => UNKNOWN.to_string(),
        Some(path) => match path.rsplit(['/', '\\']).next() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => path.to_string(),
        },
    }
}

/// Evidence entries to display, in map order.
///
/// With `only_cited`, entries whose id does not appear in `cited_ids` are
/// dropped.
pub fn evidence_entries<'a>(
    citations: &'a CitationsMap,
    cited_ids: &[String],
    only_cited: bool,
) -> Vec<(&'a str, &'a CitationItem)> {
    let cited: HashSet<&str> = cited_ids.iter().map(String::as_str).collect();
    citations
        .iter()
        .filter(|(id, _)| !only_cited || cited.contains(id))
        .collect()
}
