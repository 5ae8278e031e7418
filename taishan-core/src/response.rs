//! Uniform `{code, message, data}` envelope returned by every service call.

use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub const CODE_SUCCESS: i32 = 200;
pub const CODE_ERROR: i32 = 500;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T = serde_json::Value> {
    pub code: i32,
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self { code: CODE_SUCCESS, message: "success".to_string(), data: Some(data) }
    }

    /// Same as [`ApiResponse::success`].
    pub fn data(data: T) -> Self {
        Self::success(data)
    }

    pub fn error() -> Self {
        Self::error_with("error")
    }

    pub fn error_with(message: impl Into<String>) -> Self {
        Self { code: CODE_ERROR, message: message.into(), data: None }
    }

    pub fn custom(code: i32, message: impl Into<String>, data: Option<T>) -> Self {
        Self { code, message: message.into(), data }
    }

    pub fn from_error<E: Display + ?Sized>(err: &E) -> Self {
        let message = err.to_string();
        if message.is_empty() {
            Self::error_with("An unknown error occurred")
        } else {
            Self::error_with(message)
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == CODE_SUCCESS
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        ApiResponse { code: self.code, message: self.message, data: self.data.map(f) }
    }
}
