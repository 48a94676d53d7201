pub mod config;
pub mod label;
pub mod module;
pub mod project;
pub mod status;
pub mod store;
pub mod task;

pub use config::*;
pub use label::*;
pub use module::*;
pub use project::*;
pub use status::*;
pub use store::*;
pub use task::*;
