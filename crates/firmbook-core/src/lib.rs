//! Core types, access policy and resource managers for Firmbook.
//!
//! This crate is deliberately free of HTTP and database dependencies. The
//! managers enforce the company-scoping and invariant rules on top of any
//! [`store::CompanyStore`] backend.

pub mod access;
pub mod company;
pub mod contact;
pub mod error;
pub mod manager;
pub mod page;
pub mod project;
pub mod store;
pub mod text;

pub use error::{Error, Resource, Result};
