//! Infrastructure layer - database, object storage and the language-model client

pub mod blob;
pub mod llm;
pub mod storage;
