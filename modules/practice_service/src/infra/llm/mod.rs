//! Language-model clients

pub mod http;

pub use http::HttpLanguageModel;
