pub mod drift;
pub mod remove;
pub mod show;
pub mod validate;
pub mod watch;
