//! Command implementations.

mod console;
mod info;
mod inspect;
mod record;
mod validate;

pub use console::run_console;
pub use info::run_info;
pub use inspect::run_inspect;
pub use record::run_record;
pub use validate::run_validate;
