// Commands module - Command registry and handlers

pub mod args;
pub mod dispatcher;
pub mod error;
pub mod keys;
pub mod server_cmds;
pub mod string;
pub mod table;
pub mod zset;

pub use dispatcher::Dispatcher;
pub use error::CommandError;
pub use table::{Access, Arity, CommandSpec, CommandTable, Handler};
