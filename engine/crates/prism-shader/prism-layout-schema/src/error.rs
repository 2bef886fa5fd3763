use crate::contract::BindingClass;
use crate::field_type::FieldType;
use std::path::PathBuf;

/// 两份布局描述之间的具体差异
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutMismatch {
    #[error("block `{block}` is {found} bytes, expected {expected}")]
    Size { block: String, expected: usize, found: usize },

    #[error("`{block}.{field}` is at offset {found}, expected {expected}")]
    Offset {
        block: String,
        field: String,
        expected: usize,
        found: usize,
    },

    #[error("block `{block}` field #{position} is `{found}`, expected `{expected}`")]
    FieldName {
        block: String,
        position: usize,
        expected: String,
        found: String,
    },

    #[error("block `{block}` has {found} fields, expected {expected}")]
    FieldCount { block: String, expected: usize, found: usize },

    #[error("block `{block}` is missing")]
    MissingBlock { block: String },

    #[error("{class} slot `{name}` is bound at {found}, expected {expected}")]
    BindingIndex {
        class: BindingClass,
        name: String,
        expected: u32,
        found: u32,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("failed to read schema {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse schema")]
    Parse(#[from] toml::de::Error),

    #[error("invalid identifier `{0}`")]
    InvalidIdentifier(String),

    #[error("{class} slots `{first}` and `{second}` share index {index}")]
    DuplicateIndex {
        class: BindingClass,
        index: u32,
        first: String,
        second: String,
    },

    #[error("duplicate {kind} name `{name}`")]
    DuplicateName { kind: &'static str, name: String },

    #[error("`{owner}` references unknown buffer slot `{slot}`")]
    UnknownSlot { owner: String, slot: String },

    #[error("`{owner}` cannot use slot `{slot}`: {reason}")]
    SlotKindMismatch {
        owner: String,
        slot: String,
        reason: &'static str,
    },

    #[error("block `{0}` has no fields")]
    EmptyBlock(String),

    #[error("unknown block `{0}`")]
    UnknownBlock(String),

    #[error("block `{block}` has no field `{field}`")]
    UnknownField { block: String, field: String },

    #[error("vertex layout `{layout}`: {reason}")]
    InvalidVertexLayout { layout: String, reason: String },

    #[error("`{block}.{field}` is {expected}, got a {found} value")]
    TypeMismatch {
        block: String,
        field: String,
        expected: FieldType,
        found: FieldType,
    },

    #[error("buffer for `{block}` is {found} bytes, layout needs {expected}")]
    BufferTooSmall { block: String, expected: usize, found: usize },

    #[error("failed to parse {target} source: {message}")]
    ShaderParse { target: &'static str, message: String },

    /// host 和 shader 对同一份数据的理解不一致
    #[error("layout mismatch ({side})")]
    Mismatch {
        side: String,
        #[source]
        mismatch: LayoutMismatch,
    },
}

impl LayoutError {
    pub fn mismatch(side: impl Into<String>, mismatch: LayoutMismatch) -> Self {
        LayoutError::Mismatch {
            side: side.into(),
            mismatch,
        }
    }

    pub fn is_mismatch(&self) -> bool {
        matches!(self, LayoutError::Mismatch { .. })
    }

    pub fn as_mismatch(&self) -> Option<&LayoutMismatch> {
        match self {
            LayoutError::Mismatch { mismatch, .. } => Some(mismatch),
            _ => None,
        }
    }
}
