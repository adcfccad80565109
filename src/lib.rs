// chat-topics: topic reports and chat transcript classification
//
// This is the library root. The CLI in main.rs is a thin layer over the two
// pipelines; everything it prints is computed here first.

pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod status;
pub mod topics;
pub mod transcript;
