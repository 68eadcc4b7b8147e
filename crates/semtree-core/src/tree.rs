//! JSON model of the semantic tree handed over by the math engine.
//!
//! The engine serialises its tree as `{"stree": <node>}` where every node carries `id`, `type`,
//! `role`, optional `content` (operator nodes), optional `children` and an optional text payload
//! under `$t`. Everything else (font, annotation, embellished, ...) is kept verbatim.

use crate::{Error, Result};
use indexmap::IndexMap;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for NodeId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.trim().parse::<u32>().map(NodeId)
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        // The engine emits XML attributes as strings (`"id": "3"`); saved trees may use numbers.
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u32),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(NodeId(n)),
            Raw::Text(s) => s
                .parse::<NodeId>()
                .map_err(|_| D::Error::custom(format!("invalid node id: {s:?}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticNode {
    pub id: NodeId,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub role: String,
    #[serde(rename = "$t", default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<SemanticNode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SemanticNode>,
    #[serde(flatten)]
    pub attributes: IndexMap<String, Value>,
}

impl SemanticNode {
    /// Returns a node's attribute rendered as plain text, looking at the typed fields first.
    pub fn attribute(&self, name: &str) -> Option<String> {
        match name {
            "id" => Some(self.id.to_string()),
            "type" => Some(self.kind.clone()),
            "role" => Some(self.role.clone()),
            "$t" | "text" => self.text.clone(),
            other => self.attributes.get(other).map(value_to_text),
        }
    }

    /// Counts this node and all its `children` descendants (content nodes excluded).
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(SemanticNode::count).sum::<usize>()
    }
}

pub(crate) fn value_to_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticTree {
    pub stree: SemanticNode,
}

impl SemanticTree {
    pub fn new(root: SemanticNode) -> Self {
        Self { stree: root }
    }

    pub fn root(&self) -> &SemanticNode {
        &self.stree
    }

    /// Parses engine output. Absent data (`null`, `{}`, `{"stree": null}`) yields `Ok(None)`.
    ///
    /// Both the wrapped form (`{"stree": {...}}`) and a bare root node are accepted.
    pub fn from_value(value: &Value) -> Result<Option<Self>> {
        let root = match value {
            Value::Null => return Ok(None),
            Value::Object(map) if map.is_empty() => return Ok(None),
            Value::Object(map) => match map.get("stree") {
                Some(Value::Null) => return Ok(None),
                Some(inner) => inner,
                None if map.contains_key("id") => value,
                None => {
                    return Err(Error::InvalidTree {
                        message: "expected an `stree` root or a node with an `id`".to_string(),
                    });
                }
            },
            other => {
                return Err(Error::InvalidTree {
                    message: format!("expected a JSON object, got {other}"),
                });
            }
        };
        let node = SemanticNode::deserialize(root)?;
        Ok(Some(Self::new(node)))
    }

    pub fn from_json_str(text: &str) -> Result<Option<Self>> {
        if text.trim().is_empty() {
            return Ok(None);
        }
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(&value)
    }

    /// Pretty JSON (two-space indent) as shown in the JSON text panel.
    pub fn to_pretty_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Depth-first search over `children` (content nodes are not part of the tree structure).
    pub fn find(&self, id: NodeId) -> Option<&SemanticNode> {
        let mut stack = vec![&self.stree];
        while let Some(n) = stack.pop() {
            if n.id == id {
                return Some(n);
            }
            stack.extend(n.children.iter().rev());
        }
        None
    }
}
