pub mod config;
pub mod logging;

pub mod edge;
pub mod invoker;
pub mod notify;
pub mod remote;
pub mod retry;
