//! JSON and serde interop.
//!
//! Mapping from `Value`:
//!
//! | Value                       | JSON                                        |
//! |-----------------------------|---------------------------------------------|
//! | `None`                      | `null`                                      |
//! | `Bool`                      | `true` / `false`                            |
//! | integers                    | number (128-bit values outside the 64-bit range become floats) |
//! | `F32` / `F64`               | number, `null` when not finite              |
//! | `Str`                       | string                                      |
//! | `List`, `Set`, `OrderedSet` | array                                       |
//! | `Dict`, `OrderedDict`       | object; non-text keys use their display text |
//! | `Graph`                     | `{"nodes": n, "edges": [[from, to, weight, directed], …]}` |
//!
//! Parsing goes the other way: integers become `I64` (or `U64` when above
//! `i64::MAX`), other numbers `F64`, arrays `List`, and objects `OrderedDict`
//! in document order.

use std::fmt;

use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq, SerializeStruct};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Map, Number};

use crate::error::Result;
use crate::heap::Graph;
use crate::value::Value;

impl Value {
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::None => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::U32(v) => json!(v),
            Value::U64(v) => json!(v),
            Value::I32(v) => json!(v),
            Value::I64(v) => json!(v),
            Value::U128(v) => match u64::try_from(*v) {
                Ok(small) => json!(small),
                Err(_) => float_json(*v as f64),
            },
            Value::I128(v) => match i64::try_from(*v) {
                Ok(small) => json!(small),
                Err(_) => float_json(*v as f64),
            },
            Value::F32(v) => float_json(f64::from(*v)),
            Value::F64(v) => float_json(*v),
            Value::Str(t) => serde_json::Value::String(t.as_str().to_owned()),
            Value::List(l) => serde_json::Value::Array(l.iter().map(Value::to_json).collect()),
            Value::Set(s) => serde_json::Value::Array(s.iter().map(Value::to_json).collect()),
            Value::OrderedSet(s) => {
                serde_json::Value::Array(s.iter().map(Value::to_json).collect())
            }
            Value::Dict(d) => object_json(d.iter()),
            Value::OrderedDict(d) => object_json(d.iter()),
            Value::Graph(g) => graph_json(g),
        }
    }

    /// Parse a JSON document.
    pub fn from_json_str(text: &str) -> Result<Value> {
        let parsed: serde_json::Value = serde_json::from_str(text)?;
        Ok(Value::from(parsed))
    }

    /// Compact JSON text.
    pub fn to_json_string(&self) -> String {
        self.to_json().to_string()
    }
}

fn float_json(f: f64) -> serde_json::Value {
    Number::from_f64(f).map_or(serde_json::Value::Null, serde_json::Value::Number)
}

fn key_text(key: &Value) -> String {
    match key {
        Value::Str(t) => t.as_str().to_owned(),
        other => other.to_string(),
    }
}

fn object_json<'a>(entries: impl Iterator<Item = (&'a Value, &'a Value)>) -> serde_json::Value {
    let map: Map<String, serde_json::Value> = entries
        .map(|(k, v)| (key_text(k), v.to_json()))
        .collect();
    serde_json::Value::Object(map)
}

/// Undirected edges are emitted once, from the lower node id.
fn graph_edges(graph: &Graph) -> impl Iterator<Item = (usize, usize, f64, bool)> + '_ {
    graph
        .edges()
        .filter(|(from, e)| e.directed || *from <= e.to)
        .map(|(from, e)| (from, e.to, e.weight, e.directed))
}

fn graph_json(graph: &Graph) -> serde_json::Value {
    let edges: Vec<serde_json::Value> = graph_edges(graph)
        .map(|(from, to, weight, directed)| json!([from, to, float_json(weight), directed]))
        .collect();
    json!({ "nodes": graph.node_count(), "edges": edges })
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::None,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::I64(i)
                } else if let Some(u) = n.as_u64() {
                    Value::U64(u)
                } else {
                    Value::F64(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::text(s),
            serde_json::Value::Array(items) => Value::list(items.into_iter().map(Value::from)),
            serde_json::Value::Object(map) => Value::ordered_dict(
                map.into_iter()
                    .map(|(k, v)| (Value::text(k), Value::from(v))),
            ),
        }
    }
}

impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        value.to_json()
    }
}

// ============================================================================
// serde
// ============================================================================

struct GraphEdges<'a>(&'a Graph);

impl Serialize for GraphEdges<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(None)?;
        for edge in graph_edges(self.0) {
            seq.serialize_element(&edge)?;
        }
        seq.end()
    }
}

struct KeyText<'a>(&'a Value);

impl Serialize for KeyText<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&key_text(self.0))
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::None => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::U32(v) => serializer.serialize_u32(*v),
            Value::U64(v) => serializer.serialize_u64(*v),
            Value::U128(v) => serializer.serialize_u128(*v),
            Value::I32(v) => serializer.serialize_i32(*v),
            Value::I64(v) => serializer.serialize_i64(*v),
            Value::I128(v) => serializer.serialize_i128(*v),
            Value::F32(v) => serializer.serialize_f32(*v),
            Value::F64(v) => serializer.serialize_f64(*v),
            Value::Str(t) => serializer.serialize_str(t.as_str()),
            Value::List(l) => serializer.collect_seq(l.iter()),
            Value::Set(s) => serializer.collect_seq(s.iter()),
            Value::OrderedSet(s) => serializer.collect_seq(s.iter()),
            Value::Dict(d) => {
                let mut map = serializer.serialize_map(Some(d.len()))?;
                for (k, v) in d.iter() {
                    map.serialize_entry(&KeyText(k), v)?;
                }
                map.end()
            }
            Value::OrderedDict(d) => {
                let mut map = serializer.serialize_map(Some(d.len()))?;
                for (k, v) in d.iter() {
                    map.serialize_entry(&KeyText(k), v)?;
                }
                map.end()
            }
            Value::Graph(g) => {
                let mut state = serializer.serialize_struct("Graph", 2)?;
                state.serialize_field("nodes", &g.node_count())?;
                state.serialize_field("edges", &GraphEdges(g))?;
                state.end()
            }
        }
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("any JSON-like value")
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<Value, E> {
        Ok(Value::None)
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<Value, E> {
        Ok(Value::None)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> std::result::Result<Value, D::Error> {
        Value::deserialize(deserializer)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Value, E> {
        Ok(Value::I64(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Value, E> {
        Ok(i64::try_from(v).map_or(Value::U64(v), Value::I64))
    }

    fn visit_i128<E: de::Error>(self, v: i128) -> std::result::Result<Value, E> {
        Ok(Value::I128(v))
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> std::result::Result<Value, E> {
        Ok(Value::U128(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Value, E> {
        Ok(Value::F64(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Value, E> {
        Ok(Value::text(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<Value, E> {
        Ok(Value::text(v))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element::<Value>()? {
            items.push(item);
        }
        Ok(Value::from(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Value, A::Error> {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((k, v)) = map.next_entry::<Value, Value>()? {
            entries.push((k, v));
        }
        Ok(Value::ordered_dict(entries))
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}
