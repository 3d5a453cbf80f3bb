//! Request/response DTOs.

pub mod request;
pub mod response;
