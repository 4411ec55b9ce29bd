pub mod formatting;

pub use formatting::{print_json, print_results, print_types, sub_type_notice};
