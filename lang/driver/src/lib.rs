mod cache;
mod database;
mod fs;
pub mod paths;
mod render_reports;
mod result;

pub use database::Database;

pub use fs::*;
pub use paths::*;
pub use render_reports::*;
pub use result::*;
