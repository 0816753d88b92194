use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Wire prefix marking widget-library kinds (`lib-rate`, `lib-carousel`, ...).
pub const LIBRARY_PREFIX: &str = "lib-";

/// Element kind. Serialized as a plain string on the wire.
///
/// The standard set is closed; kinds carrying the [`LIBRARY_PREFIX`] marker
/// map to `Library`, and everything else is preserved verbatim as `Custom`
/// so an unknown document never fails to load.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeKind {
    Container,
    Text,
    Button,
    Link,
    Image,
    Divider,
    Heading,
    List,
    Form,
    Input,
    Textarea,
    Tabs,

    /// Widget-library kind, written `lib-<name>` on the wire.
    Library(String),

    /// Unrecognized kind, preserved verbatim.
    Custom(String),
}

impl NodeKind {
    /// The wire-format name, also used to derive the generated class name.
    pub fn name(&self) -> String {
        match self {
            NodeKind::Container => "container".to_string(),
            NodeKind::Text => "text".to_string(),
            NodeKind::Button => "button".to_string(),
            NodeKind::Link => "link".to_string(),
            NodeKind::Image => "image".to_string(),
            NodeKind::Divider => "divider".to_string(),
            NodeKind::Heading => "heading".to_string(),
            NodeKind::List => "list".to_string(),
            NodeKind::Form => "form".to_string(),
            NodeKind::Input => "input".to_string(),
            NodeKind::Textarea => "textarea".to_string(),
            NodeKind::Tabs => "tabs".to_string(),
            NodeKind::Library(name) => format!("{}{}", LIBRARY_PREFIX, name),
            NodeKind::Custom(name) => name.clone(),
        }
    }

    /// Whether this kind owns named slots (`items`) instead of plain children.
    pub fn has_slots(&self) -> bool {
        matches!(self, NodeKind::Tabs)
    }

    /// Whether the generator honors the `autoFill` layout flag on this kind.
    pub fn supports_auto_fill(&self) -> bool {
        matches!(self, NodeKind::Container)
    }
}

impl From<String> for NodeKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "container" => return NodeKind::Container,
            "text" => return NodeKind::Text,
            "button" => return NodeKind::Button,
            "link" => return NodeKind::Link,
            "image" => return NodeKind::Image,
            "divider" => return NodeKind::Divider,
            "heading" => return NodeKind::Heading,
            "list" => return NodeKind::List,
            "form" => return NodeKind::Form,
            "input" => return NodeKind::Input,
            "textarea" => return NodeKind::Textarea,
            "tabs" => return NodeKind::Tabs,
            _ => {}
        }

        if let Some(rest) = value.strip_prefix(LIBRARY_PREFIX) {
            return NodeKind::Library(rest.to_string());
        }

        NodeKind::Custom(value)
    }
}

impl From<NodeKind> for String {
    fn from(kind: NodeKind) -> Self {
        kind.name()
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name())
    }
}

/// Style property value: logical camel-case keys map to either a raw string
/// or a number the generator renders with a pixel unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleValue {
    Number(f64),
    Text(String),
}

impl From<f64> for StyleValue {
    fn from(value: f64) -> Self {
        StyleValue::Number(value)
    }
}

impl From<i32> for StyleValue {
    fn from(value: i32) -> Self {
        StyleValue::Number(value as f64)
    }
}

impl From<&str> for StyleValue {
    fn from(value: &str) -> Self {
        StyleValue::Text(value.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(value: String) -> Self {
        StyleValue::Text(value)
    }
}

/// One named child-list of a composite-slot container (one tab's content).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    /// Slot identifier, unique within its container.
    pub slot_key: String,

    /// User-facing label rendered on the slot tag.
    pub label: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Rc<Node>>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub disabled: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub closable: bool,
}

impl Slot {
    pub fn new(slot_key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            slot_key: slot_key.into(),
            label: label.into(),
            children: Vec::new(),
            disabled: false,
            closable: false,
        }
    }
}

/// One element descriptor in the document tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Unique within the whole tree, slots included.
    pub id: String,

    pub kind: NodeKind,

    /// Open-ended property bag. Specific keys are interpreted only by the
    /// generator's per-kind special cases.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, Value>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub style: BTreeMap<String, StyleValue>,

    /// Free-form class, appended after the derived `pb-<kind>` class.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,

    /// Standard ordered children.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Rc<Node>>,

    /// Slot descriptors; populated only on composite-slot kinds.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<Slot>,

    /// Back-reference to the registry snippet this subtree came from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_id: Option<String>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub undeletable: bool,
}

impl Node {
    pub fn new(id: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            kind,
            properties: BTreeMap::new(),
            style: BTreeMap::new(),
            class_name: None,
            children: Vec::new(),
            items: Vec::new(),
            module_id: None,
            undeletable: false,
        }
    }
}

/// One document: an ordered sequence of root nodes. This is the unit the
/// history manager snapshots and the persistence collaborator stores.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tree {
    pub roots: Vec<Rc<Node>>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_roots(roots: Vec<Node>) -> Self {
        Self {
            roots: roots.into_iter().map(Rc::new).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}
