use thiserror::Error;

use crate::extract::EntityKind;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported document version: {0}")]
    UnsupportedVersion(String),
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unknown primitive type: {0}")]
    UnknownPrimitiveType(String),

    #[error("unknown format '{format}' for type '{type_name}'")]
    UnknownFormat { type_name: String, format: String },

    #[error("unknown parameter source: {0}")]
    UnknownParameterSource(String),

    #[error("unknown HTTP method: {0}")]
    UnknownHttpMethod(String),

    #[error("unresolved reference: {0}")]
    UnresolvedReference(String),

    #[error("malformed response {reference}: {source}")]
    MalformedResponse {
        reference: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed operation {method} {path}: {source}")]
    MalformedOperation {
        path: String,
        method: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("cyclic reference detected: {}", .cycle.join(" -> "))]
    CyclicReference { cycle: Vec<String> },

    #[error("unable to resolve type {0}")]
    UnresolvedType(String),

    #[error("duplicate {kind} name: {name}")]
    DuplicateEntity { kind: EntityKind, name: String },
}

#[derive(Debug, Error)]
pub enum GroupError {
    #[error("dependency {type_name} of module {module} not found in any module")]
    DependencyNotFound { type_name: String, module: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml_ng::Error,
    },
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("extract error: {0}")]
    Extract(#[from] ExtractError),

    #[error("resolve error: {0}")]
    Resolve(#[from] ResolveError),

    #[error("group error: {0}")]
    Group(#[from] GroupError),
}
