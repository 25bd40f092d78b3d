//! Readers and writers for the three supported text formats.

pub mod arff;
pub mod csv;
pub mod libsvm;

pub use arff::{DEFAULT_RELATION, read_arff, write_arff};
pub use csv::{read_csv, write_csv};
pub use libsvm::{read_libsvm, write_libsvm};
