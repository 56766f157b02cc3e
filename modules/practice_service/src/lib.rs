//! Practice Service Module
//!
//! Back office of a law practice: clients, cases, documents with optional
//! password encryption, tasks, appointments, lawyer profiles, a dashboard,
//! reports and a chat assistant that answers from the practice data.

// Public exports
pub mod contract;
pub use contract::{
    client::PracticeApi, error::PracticeError, Appointment, AuthContext, Case, Client, Document,
    Profile, Session, Task,
};

pub mod module;
pub use module::PracticeServiceModule;

// Internal modules (hidden from public API)
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
