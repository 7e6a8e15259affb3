use thiserror::Error;

/// Configuration errors detected while wiring the node graph to its behaviors.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum LoadError {
    #[error("no behavior nodes were loaded")]
    EmptyNodes,
    #[error("no behaviors were loaded")]
    EmptyBehaviors,
    #[error("the \"Default\" behavior does not exist")]
    MissingDefault,
    #[error("behavior {0:?} is defined more than once")]
    DuplicateBehavior(String),
    #[error("node {node:?} does not resolve to any behavior")]
    UnresolvedBehavior { node: String },
    #[error("node {node:?} has id {id} but sits at position {position}")]
    NodeIdMismatch {
        node: String,
        id: usize,
        position: usize,
    },
    #[error("node {node:?} refers to unknown child {child}")]
    UnknownChild { node: String, child: usize },
    #[error("behavior {0:?} has a frame length of zero")]
    ZeroFrameLength(String),
}

/// Errors from reading node and behavior definitions out of a YAML document.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadYamlError {
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
    #[error("action type {action:?} used by behavior {behavior:?} is not registered")]
    MissingAction { behavior: String, action: String },
    #[error("action {action:?} in behavior {behavior:?} has invalid params")]
    InvalidParams { behavior: String, action: String },
    #[error("condition of behavior {behavior:?} could not be parsed")]
    Condition {
        behavior: String,
        source: ParseConditionError,
    },
}

/// A guard expression that does not follow the condition syntax.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unexpected input in condition {expr:?} at offset {offset}")]
pub struct ParseConditionError {
    pub expr: String,
    pub offset: usize,
}
