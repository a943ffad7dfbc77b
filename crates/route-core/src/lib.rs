pub mod access;
pub mod billing;
pub mod config;
pub mod context;
pub mod entities;
pub mod entity;
pub mod error;
pub mod io;
pub mod list;
pub mod migrations;
pub mod palette;
pub mod paths;
pub mod query;
pub mod store;
pub mod workspace;

pub use error::{Result, RouteError};
pub use store::{Hydration, Origin, Store};
pub use workspace::Workspace;
