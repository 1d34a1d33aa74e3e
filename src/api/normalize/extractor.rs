//! Field extraction rules
//!
//! A [`FieldExtractor`] describes where one record field lives relative to
//! the record element and how to read it. Paths are `/`-separated element
//! names; namespaces are ignored.

use super::record::FieldValue;
use indexmap::IndexMap;
use roxmltree::Node;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Text content of a single element
    Text,
    /// Selected children of an element, e.g. `Amount` and `CurrencyCode`
    Group(Vec<String>),
    /// Children that each hold a key element and a value element
    Pairs { key: String, value: String },
    /// Text of every child element, in document order
    List,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldExtractor {
    pub name: String,
    pub path: String,
    pub required: bool,
    pub kind: FieldKind,
}

impl FieldExtractor {
    fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        let name = name.into();
        Self {
            path: name.clone(),
            name,
            required: false,
            kind,
        }
    }

    /// Plain text field read from the element of the same name
    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Text)
    }

    /// Compound field built from the listed children
    pub fn group<S: AsRef<str>>(name: impl Into<String>, children: &[S]) -> Self {
        let children = children.iter().map(|c| c.as_ref().to_string()).collect();
        Self::new(name, FieldKind::Group(children))
    }

    /// Money amount (`Amount` + `CurrencyCode`)
    pub fn money(name: impl Into<String>) -> Self {
        Self::group(name, &["Amount", "CurrencyCode"])
    }

    /// Key/value list such as `AttributeList/member/{Key,Value}`
    pub fn pairs(name: impl Into<String>, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(
            name,
            FieldKind::Pairs {
                key: key.into(),
                value: value.into(),
            },
        )
    }

    /// Repeated values such as `PromotionIds/PromotionId`
    pub fn list(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::List)
    }

    /// Read from a different path than the field name
    pub fn at(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Always emit the field, empty when the response lacks it
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Read this field from a record element
    pub fn extract(&self, record: Node<'_, '_>) -> Option<FieldValue> {
        let value = find_path(record, &self.path).and_then(|node| self.read(node));

        match value {
            Some(value) => Some(value),
            None if self.required => Some(self.empty_value()),
            None => None,
        }
    }

    fn read(&self, node: Node<'_, '_>) -> Option<FieldValue> {
        match &self.kind {
            FieldKind::Text => Some(FieldValue::Text(text_of(node))),
            FieldKind::Group(children) => {
                let map: IndexMap<String, String> = children
                    .iter()
                    .filter_map(|child| find_path(node, child).map(|n| (child.clone(), text_of(n))))
                    .collect();
                (!map.is_empty()).then_some(FieldValue::Map(map))
            }
            FieldKind::Pairs { key, value } => {
                let map: IndexMap<String, String> = node
                    .children()
                    .filter(|n| n.is_element())
                    .filter_map(|member| {
                        let k = find_path(member, key).map(text_of)?;
                        let v = find_path(member, value).map(text_of).unwrap_or_default();
                        Some((k, v))
                    })
                    .collect();
                Some(FieldValue::Map(map))
            }
            FieldKind::List => Some(FieldValue::List(
                node.children().filter(|n| n.is_element()).map(text_of).collect(),
            )),
        }
    }

    fn empty_value(&self) -> FieldValue {
        match self.kind {
            FieldKind::Text => FieldValue::Text(String::new()),
            FieldKind::Group(_) | FieldKind::Pairs { .. } => FieldValue::Map(IndexMap::new()),
            FieldKind::List => FieldValue::List(Vec::new()),
        }
    }
}

/// First element reached by following `path` from `node`
pub fn find_path<'a, 'input>(node: Node<'a, 'input>, path: &str) -> Option<Node<'a, 'input>> {
    path.split('/')
        .filter(|step| !step.is_empty())
        .try_fold(node, |current, step| child_element(current, step))
}

/// First child element with the given local name
pub fn child_element<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| n.is_element() && n.has_tag_name(tag))
}

/// Text content of an element, empty if it has none
pub fn text_of(node: Node<'_, '_>) -> String {
    node.text().unwrap_or_default().to_string()
}
