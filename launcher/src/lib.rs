//! Starts a number of collaborating garbage collector processes and waits
//! until all of them have exited.

pub mod cli;
pub mod collaborator;
pub mod errors;
pub mod launch;
pub mod worker_count;
