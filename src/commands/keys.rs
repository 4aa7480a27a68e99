// Generic key commands (DEL, EXISTS, TYPE)

use super::table::{Access, Arity, CommandSpec, CommandTable};
use super::CommandError;
use crate::protocol::RespValue;
use crate::storage::Keyspace;
use bytes::Bytes;

pub(crate) fn register(table: &mut CommandTable) {
    table.register(CommandSpec::new("del", Arity::AtLeast(2), Access::Write, del));
    table.register(CommandSpec::new("exists", Arity::AtLeast(2), Access::Read, exists));
    table.register(CommandSpec::new("type", Arity::Exact(2), Access::Read, key_type));
}

/// DEL key [key ...]
pub fn del(ks: &Keyspace, args: &[Bytes]) -> Result<RespValue, CommandError> {
    Ok(RespValue::Integer(ks.delete(args) as i64))
}

/// EXISTS key [key ...]
pub fn exists(ks: &Keyspace, args: &[Bytes]) -> Result<RespValue, CommandError> {
    Ok(RespValue::Integer(ks.exists(args) as i64))
}

/// TYPE key
pub fn key_type(ks: &Keyspace, args: &[Bytes]) -> Result<RespValue, CommandError> {
    let name = ks.value_type(&args[0]).map_or("none", |t| t.as_str());
    Ok(RespValue::SimpleString(name.to_string()))
}
