pub mod add;
pub mod delete;
pub mod reorder;
pub mod update;

pub use add::handle_add;
pub use delete::handle_delete;
pub use reorder::handle_move;
pub use update::handle_update;
