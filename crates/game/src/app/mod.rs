mod bootstrap;
mod config;
mod console;
mod loop_runner;
mod session;
mod title;

pub(crate) use bootstrap::build_app;
pub(crate) use loop_runner::run;
