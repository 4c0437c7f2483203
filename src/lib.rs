pub mod auth;
pub mod cli;
pub mod cmd;
pub mod registry;
pub mod replicate;
pub mod rewrite;
pub mod snapshot;
