// ABOUTME: Error taxonomy for parsing and evaluation failures

use std::fmt;

use thiserror::Error;

use crate::value::Value;

/// The semantic error kinds of §7. Every variant carries its fully rendered
/// message text rather than structured fields, since primitives build the
/// message themselves and the evaluator only ever appends frames to it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LispError {
    #[error("{0}")]
    Parse(String),

    #[error("{0}")]
    UndefinedIdentifier(String),

    #[error("{0}")]
    WrongOperatorUsage(String),

    #[error("{0}")]
    InvalidList(String),

    #[error("{0}")]
    CannotCall(String),

    #[error("{0}")]
    Runtime(String),
}

/// Stacked "in: (...)" frames are capped here so a deeply nested failure
/// doesn't grow its message without bound.
const MAX_FRAMES: usize = 3;

impl LispError {
    pub fn undefined_identifier(name: &str) -> Self {
        LispError::UndefinedIdentifier(format!("{name} is not defined"))
    }

    pub fn cannot_call(form: &Value) -> Self {
        LispError::CannotCall(format!("{form} cannot be applied"))
    }

    pub fn wrong_operator_usage(op: &str, message: impl fmt::Display) -> Self {
        LispError::WrongOperatorUsage(format!("{op}: {message}"))
    }

    pub fn invalid_list(message: impl Into<String>) -> Self {
        LispError::InvalidList(message.into())
    }

    pub fn runtime(message: impl Into<String>) -> Self {
        LispError::Runtime(message.into())
    }

    fn message_mut(&mut self) -> &mut String {
        match self {
            LispError::Parse(m)
            | LispError::UndefinedIdentifier(m)
            | LispError::WrongOperatorUsage(m)
            | LispError::InvalidList(m)
            | LispError::CannotCall(m)
            | LispError::Runtime(m) => m,
        }
    }

    fn frame_count(&self) -> usize {
        self.to_string().matches("\nin: ").count()
    }

    /// Decorates the error with an `in: (op a1 … an)` frame built from the
    /// offending, unevaluated call form (§4.4, "Error wrapping").
    pub fn with_frame(mut self, op_name: &str, raw_args: &[Value]) -> Self {
        if self.frame_count() >= MAX_FRAMES {
            return self;
        }
        let mut form_items = vec![Value::symbol(op_name)];
        form_items.extend_from_slice(raw_args);
        let form = Value::from_vec(form_items);
        self.message_mut().push_str(&format!("\nin: {form}"));
        self
    }
}
