pub mod environment;
pub mod paths;
pub mod terminal;

pub use environment::{ensure_keys_dir, get_keys_dir};
pub use paths::{ensure_private_dir, format_path_with_tilde, write_private_file};
pub use terminal::sanitize_for_display;
