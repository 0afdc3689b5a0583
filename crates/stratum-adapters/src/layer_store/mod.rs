//! Layer store adapters: walk layer roots and parse template/arguments files.

mod disk;
mod format;

pub use disk::DiskLayerStore;
pub use format::{parse_arguments, parse_template, render_arguments};
