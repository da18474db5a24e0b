//! Uniform fetch state shared by every collection panel.

use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// Last fetched value of a remote collection plus the state of the most
/// recent request. A failed request keeps the previous data.
#[derive(Debug, Clone, PartialEq)]
pub struct Remote<T> {
    status: FetchStatus,
    data: Option<T>,
    error: Option<String>,
}

impl<T> Default for Remote<T> {
    fn default() -> Self {
        Self {
            status: FetchStatus::Idle,
            data: None,
            error: None,
        }
    }
}

impl<T> Remote<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> FetchStatus {
        self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == FetchStatus::Loading
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn data_mut(&mut self) -> Option<&mut T> {
        self.data.as_mut()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn start(&mut self) {
        self.status = FetchStatus::Loading;
        self.error = None;
    }

    /// Record the outcome of the request started by [`Remote::start`].
    pub fn resolve<E: Display>(&mut self, result: Result<T, E>) {
        match result {
            Ok(data) => {
                self.data = Some(data);
                self.status = FetchStatus::Success;
                self.error = None;
            }
            Err(e) => {
                self.status = FetchStatus::Error;
                self.error = Some(e.to_string());
            }
        }
    }

    /// Drop data and status, e.g. on logout.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl<T: Default> Remote<T> {
    /// Data, or an empty value before the first successful fetch.
    pub fn items(&self) -> T
    where
        T: Clone,
    {
        self.data.clone().unwrap_or_default()
    }

    /// Patch the in-memory value after a confirmed mutation.
    pub fn update(&mut self, f: impl FnOnce(&mut T)) {
        f(self.data.get_or_insert_with(T::default));
    }
}
