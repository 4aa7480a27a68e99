// Command dispatcher

use super::table::CommandTable;
use super::CommandError;
use crate::protocol::RespValue;
use crate::storage::Keyspace;
use bytes::Bytes;
use std::sync::Arc;
use tracing::{debug, trace};

/// Entry point between the protocol layer and the keyspace.
///
/// Holds no per-call state: every `execute` looks the command up, checks its
/// arity and hands the arguments to the handler, which does its own type
/// checks against the shared keyspace.
pub struct Dispatcher {
    table: CommandTable,
    keyspace: Arc<Keyspace>,
}

impl Dispatcher {
    pub fn new(keyspace: Arc<Keyspace>) -> Self {
        Self {
            table: CommandTable::new(),
            keyspace,
        }
    }

    pub fn keyspace(&self) -> &Arc<Keyspace> {
        &self.keyspace
    }

    pub fn table(&self) -> &CommandTable {
        &self.table
    }

    /// Run `name` with `args` (the arguments after the command name).
    pub fn execute(&self, name: &[u8], args: &[Bytes]) -> Result<RespValue, CommandError> {
        let spec = self
            .table
            .lookup(name)
            .ok_or_else(|| CommandError::unknown_command(name, args))?;

        if !spec.arity.accepts(args.len() + 1) {
            return Err(CommandError::wrong_arity(spec.name));
        }

        trace!(command = spec.name, access = ?spec.access, argc = args.len(), "dispatch");
        let result = (spec.handler)(&self.keyspace, args);
        if let Err(err) = &result {
            debug!(command = spec.name, error = %err, "command failed");
        }
        result
    }

    /// Run a full request (command name first) and fold errors into the reply
    pub fn execute_request(&self, request: &[Bytes]) -> RespValue {
        match request.split_first() {
            Some((name, args)) => self.execute(name, args).unwrap_or_else(RespValue::from),
            None => RespValue::Error("ERR empty command".to_string()),
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(Arc::new(Keyspace::new()))
    }
}
