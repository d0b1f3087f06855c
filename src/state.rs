// src/state.rs
//! Loading/error/success state a view renders from.

use crate::error::ApiError;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Loadable<T> {
    #[default]
    Idle,
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> Loadable<T> {
    /// Enter the loading state, dropping any previous error or value.
    pub fn start(&mut self) {
        *self = Loadable::Loading;
    }

    /// Store the backend's value as-is, or the error's display message.
    pub fn settle(&mut self, result: Result<T, ApiError>) {
        *self = match result {
            Ok(value) => Loadable::Ready(value),
            Err(e) => Loadable::Failed(e.user_message()),
        };
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Loadable::Loading)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Loadable::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Loadable::Failed(message) => Some(message),
            _ => None,
        }
    }
}

impl<T> From<Result<T, ApiError>> for Loadable<T> {
    fn from(result: Result<T, ApiError>) -> Self {
        let mut state = Loadable::Idle;
        state.settle(result);
        state
    }
}
