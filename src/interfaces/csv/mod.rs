pub mod cart_reader;
pub mod report_writer;
