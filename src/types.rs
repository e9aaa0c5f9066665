use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Handle to a node in the externally owned tree.
///
/// A `NodeId` never keeps the node alive; whether it still refers to an
/// attached node is answered by [`TreeView::is_live`](crate::tree::TreeView::is_live).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Coarse structural class of a node.
///
/// - `Element`: anything inside a document (the usual case).
/// - `File`: a document root that is also a file-system item.
/// - `Directory`: a container of files. Directory changes are tracked
///   elsewhere and never count as out-of-block here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeClass {
    Element,
    File,
    Directory,
}

/// Name of a property carried by property change events.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyName {
    /// Read-only / writable flag of a file. Flipping it cannot change how
    /// any node is interpreted.
    Writable,
    FileName,
    DirectoryName,
    FileTypes,
    Roots,
    Other(String),
}

impl fmt::Display for PropertyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyName::Writable => f.write_str("writable"),
            PropertyName::FileName => f.write_str("fileName"),
            PropertyName::DirectoryName => f.write_str("directoryName"),
            PropertyName::FileTypes => f.write_str("fileTypes"),
            PropertyName::Roots => f.write_str("roots"),
            PropertyName::Other(name) => f.write_str(name),
        }
    }
}

/// Log level as exposed in the `[session]` config section.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(format!(
                "invalid log level: {other} (expected error, warn, info, debug or trace)"
            )),
        }
    }
}
