//! Request middleware: authentication and access-policy extractors.

pub mod auth;
pub mod rbac;
