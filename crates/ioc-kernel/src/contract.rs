//! Contract descriptors.
//!
//! A [`Contract`] names a capability set and lists its operations. Each
//! [`Operation`] carries an explicit [`OperationKind`] tag that decides how a
//! generated adapter routes the call:
//!
//! | kind | routed to |
//! |---|---|
//! | `Get { attribute }` | `<contract>:<attribute>.get` with `[backing]` |
//! | `Set { attribute }` | `<contract>:<attribute>.set` with `[backing, value]`, result executed |
//! | `Finish` | `IoC.Unregister` with `[<adapter name>]`, result executed |
//! | `Unsupported` | fails with `UnsupportedOperation` |

use std::fmt;

/// How a contract operation is routed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Get { attribute: String },
    Set { attribute: String },
    Finish,
    Unsupported,
}

impl OperationKind {
    /// Classify an operation by its naming convention: `get<Attr>`,
    /// `set<Attr>`, `finish`. Anything else is unsupported.
    pub fn classify(name: &str) -> Self {
        if let Some(attribute) = name.strip_prefix("set") {
            Self::Set {
                attribute: attribute.to_string(),
            }
        } else if let Some(attribute) = name.strip_prefix("get") {
            Self::Get {
                attribute: attribute.to_string(),
            }
        } else if name == "finish" {
            Self::Finish
        } else {
            Self::Unsupported
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get { attribute } => write!(f, "get({attribute})"),
            Self::Set { attribute } => write!(f, "set({attribute})"),
            Self::Finish => write!(f, "finish"),
            Self::Unsupported => write!(f, "unsupported"),
        }
    }
}

/// A single operation declared on a contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    pub name: String,
    pub kind: OperationKind,
    /// Parameter type names, in declaration order.
    pub params: Vec<String>,
    /// Return type name; `None` for operations that return nothing.
    pub returns: Option<String>,
}

impl Operation {
    pub fn new(name: impl Into<String>, kind: OperationKind) -> Self {
        Self {
            name: name.into(),
            kind,
            params: Vec::new(),
            returns: None,
        }
    }

    /// An operation whose kind is inferred from its name.
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        let kind = OperationKind::classify(&name);
        Self::new(name, kind)
    }

    pub fn with_param(mut self, shape: impl Into<String>) -> Self {
        self.params.push(shape.into());
        self
    }

    pub fn with_return(mut self, shape: impl Into<String>) -> Self {
        self.returns = Some(shape.into());
        self
    }
}

/// A target capability set for adapter synthesis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contract {
    /// Fully qualified name, e.g. `org.example.interfaces.IMovable`.
    pub name: String,
    pub operations: Vec<Operation>,
}

impl Contract {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            operations: Vec::new(),
        }
    }

    /// Build a contract from bare operation names using the naming convention.
    pub fn from_operation_names<I, S>(name: impl Into<String>, operations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut contract = Self::new(name);
        contract
            .operations
            .extend(operations.into_iter().map(Operation::named));
        contract
    }

    pub fn with_operation(mut self, operation: Operation) -> Self {
        self.operations.push(operation);
        self
    }

    /// Builder: `get<Attribute>() -> shape`.
    pub fn getter(self, attribute: &str, shape: &str) -> Self {
        self.with_operation(
            Operation::new(
                format!("get{attribute}"),
                OperationKind::Get {
                    attribute: attribute.to_string(),
                },
            )
            .with_return(shape),
        )
    }

    /// Builder: `set<Attribute>(shape)`.
    pub fn setter(self, attribute: &str, shape: &str) -> Self {
        self.with_operation(
            Operation::new(
                format!("set{attribute}"),
                OperationKind::Set {
                    attribute: attribute.to_string(),
                },
            )
            .with_param(shape),
        )
    }

    /// Builder: `finish()`.
    pub fn finisher(self) -> Self {
        self.with_operation(Operation::new("finish", OperationKind::Finish))
    }

    /// The last `.`-separated segment of the qualified name.
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    /// Name of the generated adapter: the simple name, optionally without its
    /// leading qualifying character, followed by `suffix`.
    ///
    /// `org.example.interfaces.IMovable` → `MovableAdapter`.
    pub fn adapter_name(&self, suffix: &str, strip_leading_char: bool) -> String {
        let simple = self.simple_name();
        let stem = if strip_leading_char {
            let mut chars = simple.chars();
            chars.next();
            chars.as_str()
        } else {
            simple
        };
        format!("{stem}{suffix}")
    }

    pub fn operation(&self, name: &str) -> Option<&Operation> {
        self.operations.iter().find(|op| op.name == name)
    }
}
