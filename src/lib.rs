pub mod cli;
pub mod form;
pub mod io;
pub mod logging;
pub mod model;
pub mod notify;
pub mod ops;
pub mod tui;
pub mod util;
