//! Compiler facade and serialized envelope.
//!
//! [`Compiler`] picks the frontend for the requested language, runs the
//! walker and packages the result. [`Compilation::to_json`] renders the
//! full response envelope: `@context`, the query, the virtual
//! collection and the partitioned diagnostics.

use serde_json::{Value, json};

use koral_ir::{NodeId, QueryGraph, to_value};

use crate::Result;
use crate::diagnostics::{DiagnosticMessage, Diagnostics, Severity};
use crate::languages::{
    AnnisStrategy, Cosmas2Strategy, CqlStrategy, CqpStrategy, FcsQlStrategy, PoliqarpStrategy,
};
use crate::strategy::{LanguageStrategy, QueryLanguage};
use crate::tree::ParseTree;
use crate::walk::{DEFAULT_EXEC_FUEL, DEFAULT_RECURSION_FUEL, Walker};

/// JSON-LD context every envelope points at.
pub const KORAL_CONTEXT: &str = "http://korap.ids-mannheim.de/ns/koral/0.3/context.jsonld";

/// Entry point: one configured compiler for one query language.
#[derive(Debug, Clone)]
pub struct Compiler {
    language: QueryLanguage,
    recursion_fuel: u32,
    exec_fuel: u64,
}

impl Compiler {
    pub fn new(language: QueryLanguage) -> Self {
        Self {
            language,
            recursion_fuel: DEFAULT_RECURSION_FUEL,
            exec_fuel: DEFAULT_EXEC_FUEL,
        }
    }

    pub fn with_recursion_fuel(mut self, fuel: u32) -> Self {
        self.recursion_fuel = fuel;
        self
    }

    pub fn with_exec_fuel(mut self, fuel: u64) -> Self {
        self.exec_fuel = fuel;
        self
    }

    pub fn language(&self) -> QueryLanguage {
        self.language
    }

    /// Compile one parse tree into a [`Compilation`].
    pub fn compile(&self, tree: &ParseTree) -> Result<Compilation> {
        match self.language {
            QueryLanguage::Annis => self.run(tree, AnnisStrategy::new()),
            QueryLanguage::Cosmas2 => self.run(tree, Cosmas2Strategy::new()),
            QueryLanguage::Cql => self.run(tree, CqlStrategy::new()),
            QueryLanguage::Cqp => self.run(tree, CqpStrategy::new()),
            QueryLanguage::FcsQl => self.run(tree, FcsQlStrategy::new()),
            QueryLanguage::PoliqarpPlus => self.run(tree, PoliqarpStrategy::new()),
        }
    }

    fn run<S: LanguageStrategy>(&self, tree: &ParseTree, mut strategy: S) -> Result<Compilation> {
        let result = Walker::new(tree)
            .with_recursion_fuel(self.recursion_fuel)
            .with_exec_fuel(self.exec_fuel)
            .run(&mut strategy)?;
        Ok(Compilation {
            graph: result.graph,
            root: result.root,
            collection: None,
            diagnostics: result.diagnostics,
        })
    }
}

/// The result of compiling one query.
#[derive(Debug)]
pub struct Compilation {
    graph: QueryGraph,
    root: Option<NodeId>,
    collection: Option<NodeId>,
    diagnostics: Diagnostics,
}

impl Compilation {
    pub fn graph(&self) -> &QueryGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut QueryGraph {
        &mut self.graph
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Whether the query compiled without errors.
    pub fn is_valid(&self) -> bool {
        !self.diagnostics.has_errors()
    }

    /// Attach a virtual collection (doc or docGroup node built in this
    /// compilation's graph) restricting the documents to search.
    pub fn set_collection(&mut self, node: NodeId) {
        self.collection = Some(node);
    }

    /// The query subtree alone; `{}` when nothing compiled.
    pub fn query_value(&self) -> Value {
        match self.root {
            Some(root) => to_value(&self.graph, root),
            None => json!({}),
        }
    }

    /// The virtual collection subtree alone; `{}` when none is set.
    pub fn collection_value(&self) -> Value {
        match self.collection {
            Some(node) => to_value(&self.graph, node),
            None => json!({}),
        }
    }

    /// Render the whole response envelope.
    pub fn to_json(&self) -> Value {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let mut messages = Vec::new();
        for msg in &self.diagnostics {
            let bucket = match msg.severity {
                Severity::Error => &mut errors,
                Severity::Warning => &mut warnings,
                Severity::Info => &mut messages,
            };
            bucket.push(message_value(msg));
        }

        json!({
            "@context": KORAL_CONTEXT,
            "query": self.query_value(),
            "collection": self.collection_value(),
            "meta": {},
            "errors": errors,
            "warnings": warnings,
            "messages": messages,
        })
    }

    /// Human-readable dump of the compiled query, for tests and logs.
    pub fn dump(&self) -> String {
        match self.root {
            Some(root) => self.graph.dump(root),
            None => "empty\n".to_string(),
        }
    }
}

/// `[code, message]`, plus the input offset when one was recorded.
fn message_value(msg: &DiagnosticMessage) -> Value {
    match msg.offset {
        Some(offset) => json!([msg.code(), msg.message, offset]),
        None => json!([msg.code(), msg.message]),
    }
}
