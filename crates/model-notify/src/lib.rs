pub mod error;
pub mod notify;
