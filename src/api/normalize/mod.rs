//! Response normalization
//!
//! Turns the result element of an MWS response into flat [`Record`]s plus the
//! continuation token and count markers found next to them.

pub mod extractor;
pub mod record;

pub use extractor::{FieldExtractor, FieldKind};
pub use record::{FieldValue, Record};

use crate::api::constants::{self, params};
use extractor::{child_element, find_path, text_of};
use indexmap::IndexMap;
use log::{debug, warn};
use roxmltree::{Document, Node};

/// Where records live in a result element and how to read them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordLayout {
    /// Path from the result element to the element holding the records
    pub container: Option<String>,
    /// Tag of each record element
    pub record_tag: String,
    pub fields: Vec<FieldExtractor>,
    /// Tag of the element carrying a count, for count operations
    pub count_tag: Option<String>,
}

impl RecordLayout {
    pub fn new(record_tag: impl Into<String>, fields: Vec<FieldExtractor>) -> Self {
        Self {
            container: None,
            record_tag: record_tag.into(),
            fields,
            count_tag: None,
        }
    }

    pub fn in_container(mut self, path: impl Into<String>) -> Self {
        self.container = Some(path.into());
        self
    }

    pub fn with_count(mut self, tag: impl Into<String>) -> Self {
        self.count_tag = Some(tag.into());
        self
    }
}

/// Normalized content of one response page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub records: Vec<Record>,
    pub token: Option<String>,
    pub count: Option<u64>,
    /// False when there was no document to read at all
    pub found: bool,
    /// Records of further lists in the same result element, by name
    pub companions: IndexMap<String, Vec<Record>>,
}

impl Page {
    pub fn has_more(&self) -> bool {
        self.token.is_some()
    }

    /// Whether the page yielded neither records nor a count
    pub fn is_no_data(&self) -> bool {
        !self.found || (self.records.is_empty() && self.count.is_none())
    }
}

/// Parse a response body. Only bodies that are not XML at all fail here.
pub fn parse_document(body: &str) -> Result<Document<'_>, roxmltree::Error> {
    Document::parse(body)
}

/// Locate the `<Action>Result` element of a response
pub fn find_result<'a, 'input>(document: &'a Document<'input>, action: &str) -> Option<Node<'a, 'input>> {
    let root = document.root_element();
    let result_tag = constants::result_element(action);

    if root.has_tag_name(result_tag.as_str()) {
        return Some(root);
    }
    child_element(root, &result_tag)
}

/// Extract records, continuation token and count from a result element.
///
/// `None` yields an empty page with `found == false`; this is reported, not
/// raised.
pub fn normalize(document: Option<Node<'_, '_>>, layout: &RecordLayout) -> Page {
    let Some(result) = document else {
        warn!("No XML data found for '{}' records", layout.record_tag);
        return Page::default();
    };

    let mut page = Page {
        found: true,
        token: extract_token(result),
        ..Page::default()
    };

    if let Some(count_tag) = &layout.count_tag {
        page.count = child_element(result, count_tag).and_then(|node| {
            let text = text_of(node);
            match text.trim().parse::<u64>() {
                Ok(count) => Some(count),
                Err(_) => {
                    warn!("Ignoring non-numeric {} value '{}'", count_tag, text);
                    None
                }
            }
        });
    }

    let container = match &layout.container {
        Some(path) => find_path(result, path),
        None => Some(result),
    };

    if let Some(container) = container {
        page.records = container
            .children()
            .filter(|n| n.is_element() && n.has_tag_name(layout.record_tag.as_str()))
            .map(|element| build_record(element, &layout.fields))
            .collect();
    }

    debug!(
        "Normalized {} '{}' records (token: {})",
        page.records.len(),
        layout.record_tag,
        page.token.is_some()
    );

    page
}

fn build_record(element: Node<'_, '_>, fields: &[FieldExtractor]) -> Record {
    let mut record = Record::new();
    for field in fields {
        if let Some(value) = field.extract(element) {
            record.insert(field.name.clone(), value);
        }
    }
    record
}

/// A token counts only when it is non-empty and `HasNext` does not say otherwise
fn extract_token(result: Node<'_, '_>) -> Option<String> {
    let has_next = child_element(result, params::HAS_NEXT)
        .map(|n| text_of(n).trim() != "false")
        .unwrap_or(true);

    child_element(result, params::NEXT_TOKEN)
        .map(|n| text_of(n).trim().to_string())
        .filter(|token| has_next && !token.is_empty())
}
