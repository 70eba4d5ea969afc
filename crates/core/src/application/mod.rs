// Application Layer - The poll/dispatch/acknowledge loop

pub mod worker;

// Re-exports
pub use worker::{shutdown_channel, ShutdownSender, ShutdownToken, Worker, WorkerConfig};
