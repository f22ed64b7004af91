pub mod header;
pub mod metric;
