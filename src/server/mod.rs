// Server module entry
// Listener setup, accept loop, per-connection serving and shutdown signals

pub mod connection;
pub mod listener;
pub mod run;
pub mod signal;

pub use listener::create_listener;
pub use run::serve;
pub use signal::{start_signal_handler, SignalHandler};
