//! Business Services
//!
//! This module contains the record store's business layer:
//!
//! - `TaskService` - create / read-all / partial-update / delete over the
//!   table abstraction, with sparse update composition and existence
//!   preconditions
//! - `TaskServiceError` - the validation / not-found / store error taxonomy

pub mod error;
pub mod task_service;

pub use error::TaskServiceError;
pub use task_service::TaskService;
