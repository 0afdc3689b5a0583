//! Filesystem adapters.

mod local;

pub(crate) use local::map_io_error;
pub use local::LocalFilesystem;
