/// Semantic error categories reported during query compilation.
///
/// Each kind carries the numeric code the serialized envelope exposes to
/// clients, so frontends report conditions by kind and never hand-pick
/// codes at call sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// The parse tree is structurally unusable at this point.
    MalformedQuery,
    /// A reference names a node that was never declared.
    InvalidClassReference,
    /// An operator was applied to an operand type it cannot accept.
    IncompatibleOperatorAndOperand,
    /// A parse-tree category the frontend does not understand.
    UnknownQueryElement,
    /// A relation could not be connected to the rest of the query.
    UnboundRelation,
}

impl DiagnosticKind {
    /// Numeric code exposed in the serialized envelope.
    pub fn code(&self) -> u16 {
        match self {
            Self::MalformedQuery => 302,
            Self::InvalidClassReference => 304,
            Self::IncompatibleOperatorAndOperand => 305,
            Self::UnknownQueryElement => 307,
            Self::UnboundRelation => 308,
        }
    }

    /// Default severity for this kind. Can be overridden on the builder.
    pub fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Base message used when no custom detail is provided.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::MalformedQuery => "malformed query",
            Self::InvalidClassReference => "reference to an undeclared node",
            Self::IncompatibleOperatorAndOperand => "operator and operand are incompatible",
            Self::UnknownQueryElement => "unknown query element",
            Self::UnboundRelation => "relation could not be bound to the query",
        }
    }

    /// Render the final message: fallback alone, or fallback plus detail.
    pub fn message(&self, detail: Option<&str>) -> String {
        match detail {
            None => self.fallback_message().to_string(),
            Some(detail) => format!("{}: {detail}", self.fallback_message()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// One reported condition with its kind, severity and input position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    pub message: String,
    /// Byte offset into the original query string, when the parse tree
    /// carried one for the offending node.
    pub offset: Option<usize>,
}

impl DiagnosticMessage {
    pub(crate) fn with_default_message(kind: DiagnosticKind, offset: Option<usize>) -> Self {
        Self {
            kind,
            severity: kind.default_severity(),
            message: kind.fallback_message().to_string(),
            offset,
        }
    }

    pub fn code(&self) -> u16 {
        self.kind.code()
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

impl std::fmt::Display for DiagnosticMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}: {}", self.severity, self.code(), self.message)?;
        if let Some(offset) = self.offset {
            write!(f, " (at {offset})")?;
        }
        Ok(())
    }
}
