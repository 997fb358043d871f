pub mod list;
pub mod remove;

pub use list::handle_list;
pub use remove::handle_remove;
