//! JSON-LD rendering of IR nodes.
//!
//! Produces the `koral:` wire shapes the search backend consumes. Field
//! order is insertion order (`serde_json` with `preserve_order`), with
//! `@type` always first.

use serde_json::{Value, json};

use crate::boundary::Boundary;
use crate::graph::{NodeId, QueryGraph};
use crate::node::{GroupOperation, QueryNode};

/// Render the subtree under `id` as a JSON-LD value.
pub fn to_value(graph: &QueryGraph, id: NodeId) -> Value {
    match graph.node(id) {
        QueryNode::Token { wrap } => {
            let mut v = json!({ "@type": "koral:token" });
            if let Some(wrap) = wrap {
                v["wrap"] = to_value(graph, *wrap);
            }
            v
        }
        QueryNode::Span { wrap } => {
            let mut v = json!({ "@type": "koral:span" });
            if let Some(wrap) = wrap {
                v["wrap"] = to_value(graph, *wrap);
            }
            v
        }
        QueryNode::Term(term) => term_value(term),
        QueryNode::TermGroup { relation, operands } => json!({
            "@type": "koral:termGroup",
            "relation": relation,
            "operands": operand_values(graph, operands),
        }),
        QueryNode::Group {
            operation,
            class_id,
            boundary,
            distances,
            operands,
        } => {
            let mut v = json!({
                "@type": "koral:group",
                "operation": operation,
            });
            if *operation == GroupOperation::Class {
                if let Some(id) = class_id {
                    v["classOut"] = json!(id);
                }
            }
            if let Some(b) = boundary {
                v["boundary"] = to_value(graph, *b);
            }
            if !distances.is_empty() {
                v["distances"] = Value::Array(operand_values(graph, distances));
            }
            v["operands"] = Value::Array(operand_values(graph, operands));
            v
        }
        QueryNode::Relation {
            kind,
            boundary,
            operands,
        } => {
            let mut rel = term_value(kind);
            if let Some(b) = boundary {
                rel["boundary"] = to_value(graph, *b);
            }
            json!({
                "@type": "koral:group",
                "operation": "operation:relation",
                "relType": rel,
                "operands": operand_values(graph, operands),
            })
        }
        QueryNode::Position { frames, operands } => json!({
            "@type": "koral:group",
            "operation": "operation:position",
            "frames": frames,
            "operands": operand_values(graph, operands),
        }),
        QueryNode::Reference {
            operation,
            class_refs,
            operands,
        } => {
            let mut v = json!({
                "@type": "koral:reference",
                "operation": operation,
                "classRef": class_refs,
            });
            if !operands.is_empty() {
                v["operands"] = Value::Array(operand_values(graph, operands));
            }
            v
        }
        QueryNode::Boundary(b) => boundary_value(b),
        QueryNode::Distance { key, boundary } => json!({
            "@type": "koral:distance",
            "key": key,
            "boundary": boundary_value(boundary),
        }),
        QueryNode::Doc {
            key,
            value,
            match_op,
        } => json!({
            "@type": "koral:doc",
            "key": key,
            "value": value,
            "match": match_op,
        }),
        QueryNode::DocGroup { relation, operands } => json!({
            "@type": "koral:docGroup",
            "relation": relation,
            "operands": operand_values(graph, operands),
        }),
        QueryNode::Empty => json!({}),
    }
}

fn operand_values(graph: &QueryGraph, operands: &[NodeId]) -> Vec<Value> {
    operands.iter().map(|op| to_value(graph, *op)).collect()
}

fn term_value(term: &crate::node::Term) -> Value {
    let mut v = json!({ "@type": "koral:term" });
    if let Some(foundry) = &term.foundry {
        v["foundry"] = json!(foundry);
    }
    if let Some(layer) = &term.layer {
        v["layer"] = json!(layer);
    }
    v["key"] = json!(term.key);
    if let Some(value) = &term.value {
        v["value"] = json!(value);
    }
    v["match"] = json!(term.match_op);
    v
}

fn boundary_value(b: &Boundary) -> Value {
    let mut v = json!({
        "@type": "koral:boundary",
        "min": b.min,
    });
    if let Some(max) = b.max {
        v["max"] = json!(max);
    }
    v
}
