pub mod files;
pub mod logger;

pub use files::{ensure_directory, find_media_files, is_media_file, output_dir_for};
pub use logger::init_logging;
