pub mod error_mapper;

pub use error_mapper::map_io_error;
