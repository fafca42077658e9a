//! different utility modules used throughout the project
/// logger initialisation, trace tables and csv export
pub mod logger;
/// parser of task documents: titled sections of key: values pairs
pub mod task_parser;
mod task_parser_tests;
