pub mod check;
pub mod label_ops;
pub mod module_ops;
pub mod search;
pub mod status_ops;
pub mod task_ops;
pub mod validate;
