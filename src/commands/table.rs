// Command table - name -> arity and handler

use super::CommandError;
use crate::protocol::RespValue;
use crate::storage::Keyspace;
use bytes::Bytes;
use std::collections::HashMap;

/// Signature shared by every command implementation. `args` excludes the
/// command name and has already passed the arity check.
pub type Handler = fn(&Keyspace, &[Bytes]) -> Result<RespValue, CommandError>;

/// Allowed argument counts. Counts include the command name, so `ZCARD key`
/// is `Exact(2)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    AtLeast(usize),
    Between(usize, usize),
}

impl Arity {
    pub fn accepts(&self, argc: usize) -> bool {
        match *self {
            Arity::Exact(n) => argc == n,
            Arity::AtLeast(n) => argc >= n,
            Arity::Between(min, max) => (min..=max).contains(&argc),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

#[derive(Clone)]
pub struct CommandSpec {
    /// Lowercase command name
    pub name: &'static str,
    pub arity: Arity,
    pub access: Access,
    pub handler: Handler,
}

impl CommandSpec {
    pub fn new(name: &'static str, arity: Arity, access: Access, handler: Handler) -> Self {
        debug_assert_eq!(name, name.to_ascii_lowercase());
        Self {
            name,
            arity,
            access,
            handler,
        }
    }
}

impl std::fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandSpec")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .field("access", &self.access)
            .finish()
    }
}

/// Registry of every command the server understands.
///
/// Built once by [`CommandTable::new`]; afterwards it is only read, so it can
/// be shared between connections without locking.
#[derive(Debug)]
pub struct CommandTable {
    commands: HashMap<&'static str, CommandSpec>,
}

impl CommandTable {
    pub fn new() -> Self {
        let mut table = Self {
            commands: HashMap::new(),
        };
        super::server_cmds::register(&mut table);
        super::keys::register(&mut table);
        super::string::register(&mut table);
        super::zset::register(&mut table);
        table
    }

    pub(crate) fn register(&mut self, spec: CommandSpec) {
        let previous = self.commands.insert(spec.name, spec);
        debug_assert!(previous.is_none(), "command registered twice");
    }

    /// Case-insensitive lookup
    pub fn lookup(&self, name: &[u8]) -> Option<&CommandSpec> {
        let name = std::str::from_utf8(name).ok()?.to_ascii_lowercase();
        self.commands.get(name.as_str())
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Default for CommandTable {
    fn default() -> Self {
        Self::new()
    }
}
