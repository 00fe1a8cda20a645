pub mod blob;
pub mod config;
pub mod error;
pub mod form;
pub mod hub;
pub mod remote;
pub mod services;

pub use error::{Error, Result};
