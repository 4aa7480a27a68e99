// Server commands (PING, ECHO, DBSIZE, FLUSHDB)

use super::args::is_keyword;
use super::table::{Access, Arity, CommandSpec, CommandTable};
use super::CommandError;
use crate::protocol::RespValue;
use crate::storage::Keyspace;
use bytes::Bytes;

pub(crate) fn register(table: &mut CommandTable) {
    table.register(CommandSpec::new("ping", Arity::Between(1, 2), Access::Read, ping));
    table.register(CommandSpec::new("echo", Arity::Exact(2), Access::Read, echo));
    table.register(CommandSpec::new("dbsize", Arity::Exact(1), Access::Read, dbsize));
    table.register(CommandSpec::new("flushdb", Arity::Between(1, 2), Access::Write, flushdb));
    table.register(CommandSpec::new("flushall", Arity::Between(1, 2), Access::Write, flushdb));
}

/// PING [message]
pub fn ping(_ks: &Keyspace, args: &[Bytes]) -> Result<RespValue, CommandError> {
    Ok(match args.first() {
        Some(message) => RespValue::bulk(message.clone()),
        None => RespValue::SimpleString("PONG".to_string()),
    })
}

/// ECHO message
pub fn echo(_ks: &Keyspace, args: &[Bytes]) -> Result<RespValue, CommandError> {
    Ok(RespValue::bulk(args[0].clone()))
}

/// DBSIZE
pub fn dbsize(ks: &Keyspace, _args: &[Bytes]) -> Result<RespValue, CommandError> {
    Ok(RespValue::Integer(ks.len() as i64))
}

/// FLUSHDB [ASYNC|SYNC] (FLUSHALL shares it: there is a single keyspace)
pub fn flushdb(ks: &Keyspace, args: &[Bytes]) -> Result<RespValue, CommandError> {
    if let Some(mode) = args.first() {
        if !is_keyword(mode, "ASYNC") && !is_keyword(mode, "SYNC") {
            return Err(CommandError::Syntax);
        }
    }
    ks.clear();
    Ok(RespValue::ok())
}
