pub mod file_ops;

pub use file_ops::{
    load_catalog_file, load_config_file, load_preferences_file, read_raw_catalog,
    save_preferences_file,
};
