use serde::Serialize;
use serde_json::Value;

use super::method::HttpMethod;
use crate::error::Result;

/// A request relative to the service base URL.
#[derive(Debug, Clone)]
pub struct RequestInput {
    pub method: HttpMethod,
    pub path: String,
    pub body: Option<Value>,
}

impl RequestInput {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            path: path.into(),
            body: None,
        }
    }

    pub fn post_json<T: Serialize + ?Sized>(path: impl Into<String>, body: &T) -> Result<Self> {
        Ok(Self {
            method: HttpMethod::Post,
            path: path.into(),
            body: Some(serde_json::to_value(body)?),
        })
    }
}
