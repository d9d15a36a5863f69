//! Incoming requests and path parsing.
//!
//! A path has the shape `[/]component/function[/sub/path]`. Everything after
//! the second separator is passed to the handler untouched.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared_types::{ComponentId, HttpVerb};
use std::sync::Arc;
use tg_03_registry::ComponentDescriptor;

use crate::error::PathError;

/// A request as handed over by the transport layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
    pub verb: HttpVerb,
    pub path: String,
    #[serde(default)]
    pub params: Value,
}

impl RpcRequest {
    pub fn new(verb: HttpVerb, path: impl Into<String>) -> Self {
        Self {
            verb,
            path: path.into(),
            params: Value::Null,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpVerb::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpVerb::Post, path)
    }

    /// Builder-style method to set the parameters
    pub fn with_params(mut self, params: Value) -> Self {
        self.params = params;
        self
    }
}

/// The three segments of a well-formed request path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestPath<'a> {
    pub component: &'a str,
    pub function: &'a str,
    pub sub_path: &'a str,
}

/// Split `path` into component, function and remainder.
///
/// A single leading `/` is ignored. The component and function segments
/// must be non-empty; the remainder may be empty.
pub fn parse_path(path: &str, max_len: usize) -> Result<RequestPath<'_>, PathError> {
    if path.len() > max_len {
        return Err(PathError::TooLong {
            len: path.len(),
            max: max_len,
        });
    }
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    let mut segments = trimmed.splitn(3, '/');

    let component = segments
        .next()
        .filter(|s| !s.is_empty())
        .ok_or(PathError::MissingComponent)?;
    let function = segments
        .next()
        .filter(|s| !s.is_empty())
        .ok_or(PathError::MissingFunction)?;
    let sub_path = segments.next().unwrap_or("");

    Ok(RequestPath {
        component,
        function,
        sub_path,
    })
}

/// A request resolved to a concrete component and entry point.
///
/// Lives for one request only.
#[derive(Clone, Debug)]
pub struct RpcTarget {
    pub component: ComponentId,
    pub descriptor: Arc<ComponentDescriptor>,
    pub method: String,
    pub sub_path: String,
}
