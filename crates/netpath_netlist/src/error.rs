//! Error types for netlist loading.

/// Errors that can occur when reading an elaborated netlist.
#[derive(Debug, thiserror::Error)]
pub enum NetlistError {
    /// An I/O error occurred while reading the XML file.
    #[error("failed to read netlist: {0}")]
    Io(#[from] std::io::Error),

    /// The document is not well-formed XML.
    #[error("failed to parse netlist XML: {0}")]
    Xml(String),

    /// The document parsed but violates the elaborator's output format:
    /// a required section or attribute is missing, a type reference never
    /// resolves, a `varref` appears outside a logic block, an assignment
    /// does not have exactly two children, or module-level name prefixes
    /// conflict.
    #[error("malformed netlist input: {0}")]
    MalformedInput(String),
}

impl NetlistError {
    /// Creates a [`NetlistError::MalformedInput`] with the given message.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedInput(message.into())
    }
}
