pub mod clear;
pub mod load;
pub mod new;
pub mod save;
pub mod show;

pub use clear::handle_clear;
pub use load::handle_load;
pub use new::handle_new;
pub use save::handle_save;
pub use show::handle_show;
