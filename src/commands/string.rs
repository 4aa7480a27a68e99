// String command handlers

use super::args::is_keyword;
use super::table::{Access, Arity, CommandSpec, CommandTable};
use super::CommandError;
use crate::protocol::RespValue;
use crate::storage::{Keyspace, RedisValue};
use bytes::Bytes;

pub(crate) fn register(table: &mut CommandTable) {
    table.register(CommandSpec::new("set", Arity::AtLeast(3), Access::Write, set));
    table.register(CommandSpec::new("get", Arity::Exact(2), Access::Read, get));
}

/// SET key value [NX|XX]
pub fn set(ks: &Keyspace, args: &[Bytes]) -> Result<RespValue, CommandError> {
    let mut must_exist = None;
    for option in &args[2..] {
        let wanted = if is_keyword(option, "NX") {
            false
        } else if is_keyword(option, "XX") {
            true
        } else {
            return Err(CommandError::Syntax);
        };
        // NX and XX together are contradictory
        if must_exist.is_some_and(|prev| prev != wanted) {
            return Err(CommandError::Syntax);
        }
        must_exist = Some(wanted);
    }

    let (key, value) = (args[0].clone(), args[1].clone());
    let written = match must_exist {
        Some(must_exist) => ks.set_string_if(key, value, must_exist),
        None => {
            ks.set(key, RedisValue::String(value));
            true
        }
    };
    Ok(if written { RespValue::ok() } else { RespValue::null() })
}

/// GET key
pub fn get(ks: &Keyspace, args: &[Bytes]) -> Result<RespValue, CommandError> {
    Ok(match ks.get_string(&args[0])? {
        Some(value) => RespValue::bulk(value),
        None => RespValue::null(),
    })
}
