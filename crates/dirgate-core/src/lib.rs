//! dirgate core: domain models, the role registry, error types and
//! repository traits shared by every other crate in the workspace.

pub mod error;
pub mod models;
pub mod repository;

pub use error::{DirgateError, DirgateResult};
