// Command errors and their wire messages

use crate::protocol::RespValue;
use thiserror::Error;

/// Failure of a single command. `Display` is the exact text sent to the
/// client after the `-` marker, so the messages here are part of the
/// protocol surface.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("ERR unknown command '{name}', with args beginning with: {args}")]
    UnknownCommand { name: String, args: String },

    #[error("ERR wrong number of arguments for '{0}' command")]
    WrongArity(String),

    #[error("WRONGTYPE Operation against a key holding the wrong kind of value")]
    WrongType,

    #[error("ERR value is not a valid float")]
    NotAFloat,

    #[error("ERR value is not an integer or out of range")]
    NotAnInteger,

    #[error("ERR syntax error")]
    Syntax,

    #[error("ERR {0}")]
    InvalidArgument(String),
}

impl CommandError {
    pub fn unknown_command(name: &[u8], args: &[bytes::Bytes]) -> Self {
        let args = args
            .iter()
            .map(|arg| format!("'{}' ", String::from_utf8_lossy(arg)))
            .collect::<String>();
        CommandError::UnknownCommand {
            name: String::from_utf8_lossy(name).into_owned(),
            args,
        }
    }

    pub fn wrong_arity(name: &str) -> Self {
        CommandError::WrongArity(name.to_ascii_lowercase())
    }
}

impl From<CommandError> for RespValue {
    fn from(err: CommandError) -> Self {
        RespValue::Error(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn test_messages() {
        assert_eq!(
            CommandError::wrong_arity("ZCARD").to_string(),
            "ERR wrong number of arguments for 'zcard' command"
        );
        assert_eq!(
            CommandError::WrongType.to_string(),
            "WRONGTYPE Operation against a key holding the wrong kind of value"
        );
        assert_eq!(
            CommandError::unknown_command(b"FOO", &[Bytes::from("a"), Bytes::from("b")]).to_string(),
            "ERR unknown command 'FOO', with args beginning with: 'a' 'b' "
        );
    }

    #[test]
    fn test_into_resp_error() {
        let reply: RespValue = CommandError::Syntax.into();
        assert_eq!(reply, RespValue::Error("ERR syntax error".to_string()));
    }
}
