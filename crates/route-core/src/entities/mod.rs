//! Feature records. Each module owns one record type, its form payloads and
//! the pure list operations for that feature.

pub mod client;
pub mod connection;
pub mod habit;
pub mod inspiration;
pub mod investor;
pub mod kpi;
pub mod milestone;
pub mod profile;
pub mod project;
pub mod reflection;
pub mod resource;
pub mod task;
pub mod transaction;

pub use client::Client;
pub use connection::Connection;
pub use habit::Habit;
pub use inspiration::Inspiration;
pub use investor::Investor;
pub use kpi::Kpi;
pub use milestone::Milestone;
pub use project::Project;
pub use reflection::Reflection;
pub use resource::Resource;
pub use task::Task;
pub use transaction::Transaction;
