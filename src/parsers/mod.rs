//! Tools for loading datasets from CSV files.

mod csv_parser;

pub use csv_parser::{read_bandwidths, read_vms};
