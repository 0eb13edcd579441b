pub mod export;

pub use export::{default_output_path, load_document, resolve_output_path, save_document};
