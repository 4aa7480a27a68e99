// End-to-end tests for sorted set commands and the typed keyspace

mod common;

use common::TestRedisServer;
use redis::{ErrorKind, RedisResult};
use redis_keyspace::protocol::RespValue;

#[tokio::test]
async fn test_zadd_zcard_zrem_sequence() {
    let server = TestRedisServer::start().await;
    let mut raw = server.raw().await;

    assert_eq!(raw.call(&["ZADD", "myzset", "1", "one"]).await, b":1\r\n");
    assert_eq!(raw.call(&["ZCARD", "myzset"]).await, b":1\r\n");
    assert_eq!(raw.call(&["ZADD", "myzset", "2", "two", "3", "three"]).await, b":2\r\n");
    assert_eq!(raw.call(&["ZCARD", "myzset"]).await, b":3\r\n");
    assert_eq!(raw.call(&["ZREM", "myzset", "two"]).await, b":1\r\n");
    assert_eq!(raw.call(&["ZCARD", "myzset"]).await, b":2\r\n");

    server.stop();
}

#[tokio::test]
async fn test_zcard_missing_key() {
    let server = TestRedisServer::start().await;
    let mut raw = server.raw().await;

    assert_eq!(raw.call(&["ZCARD", "nosuchkey"]).await, b":0\r\n");
    assert_eq!(raw.call(&["ZREM", "nosuchkey", "a"]).await, b":0\r\n");

    server.stop();
}

#[tokio::test]
async fn test_wrong_type_error() {
    let server = TestRedisServer::start().await;
    let mut raw = server.raw().await;

    assert_eq!(raw.call(&["SET", "string_key", "string_value"]).await, b"+OK\r\n");
    let wrongtype = b"-WRONGTYPE Operation against a key holding the wrong kind of value\r\n";
    assert_eq!(raw.call(&["ZCARD", "string_key"]).await, wrongtype);
    assert_eq!(raw.call(&["ZADD", "string_key", "1", "a"]).await, wrongtype);
    assert_eq!(raw.call(&["ZREM", "string_key", "a"]).await, wrongtype);

    // The string is untouched
    assert_eq!(
        raw.call(&["GET", "string_key"]).await,
        b"$12\r\nstring_value\r\n"
    );

    server.stop();
}

#[tokio::test]
async fn test_wrong_arity_error() {
    let server = TestRedisServer::start().await;
    let mut raw = server.raw().await;

    let zcard = b"-ERR wrong number of arguments for 'zcard' command\r\n";
    assert_eq!(raw.call(&["ZCARD"]).await, zcard);
    assert_eq!(raw.call(&["ZCARD", "myzset", "field"]).await, zcard);
    assert_eq!(
        raw.call(&["ZADD", "myzset", "1"]).await,
        b"-ERR wrong number of arguments for 'zadd' command\r\n"
    );
    assert_eq!(
        raw.call(&["ZREM", "myzset"]).await,
        b"-ERR wrong number of arguments for 'zrem' command\r\n"
    );
    // Nothing was created by the rejected calls
    assert_eq!(raw.call(&["EXISTS", "myzset"]).await, b":0\r\n");

    server.stop();
}

#[tokio::test]
async fn test_invalid_score_is_rejected_whole() {
    let server = TestRedisServer::start().await;
    let mut raw = server.raw().await;

    assert_eq!(
        raw.call(&["ZADD", "z", "1", "a", "abc", "b"]).await,
        b"-ERR value is not a valid float\r\n"
    );
    assert_eq!(raw.call(&["ZCARD", "z"]).await, b":0\r\n");
    assert_eq!(raw.call(&["TYPE", "z"]).await, b"+none\r\n");

    assert_eq!(
        raw.call(&["ZADD", "z", "1e500", "a"]).await,
        b"-ERR value is not a valid float\r\n"
    );
    assert_eq!(raw.call(&["EXISTS", "z"]).await, b":0\r\n");

    server.stop();
}

#[tokio::test]
async fn test_empty_set_is_removed() {
    let server = TestRedisServer::start().await;
    let mut raw = server.raw().await;

    raw.call(&["ZADD", "z", "1", "a", "2", "b"]).await;
    assert_eq!(raw.call(&["TYPE", "z"]).await, b"+zset\r\n");
    assert_eq!(raw.call(&["ZREM", "z", "a", "b", "c"]).await, b":2\r\n");
    assert_eq!(raw.call(&["EXISTS", "z"]).await, b":0\r\n");
    assert_eq!(raw.call(&["DBSIZE"]).await, b":0\r\n");

    // The key is free for another type now
    assert_eq!(raw.call(&["SET", "z", "v"]).await, b"+OK\r\n");

    server.stop();
}

#[tokio::test]
async fn test_unknown_command() {
    let server = TestRedisServer::start().await;
    let mut raw = server.raw().await;

    assert_eq!(
        raw.call(&["FOOBAR", "x"]).await,
        b"-ERR unknown command 'FOOBAR', with args beginning with: 'x' \r\n"
    );

    server.stop();
}

#[tokio::test]
async fn test_inline_and_pipelined_requests() {
    let server = TestRedisServer::start().await;
    let mut raw = server.raw().await;

    raw.send(b"ZADD z 1 a 2 b\r\nZCARD z\r\n*2\r\n$5\r\nZCARD\r\n$1\r\nz\r\n")
        .await;
    assert_eq!(raw.read_reply().await.1, RespValue::Integer(2));
    assert_eq!(raw.read_reply().await.1, RespValue::Integer(2));
    assert_eq!(raw.read_reply().await.1, RespValue::Integer(2));

    server.stop();
}

#[tokio::test]
async fn test_protocol_error_closes_connection() {
    let server = TestRedisServer::start().await;
    let mut raw = server.raw().await;

    raw.send(b"*2\r\n$5\r\nZCARD\r\n+z\r\n").await;
    assert_eq!(
        raw.read_to_end().await,
        b"-ERR Protocol error: expected '$', got '+'\r\n"
    );

    // Requests ahead of the bad frame are still answered
    let mut raw = server.raw().await;
    raw.send(b"*4\r\n$4\r\nZADD\r\n$1\r\nz\r\n$1\r\n1\r\n$1\r\na\r\n*1\r\n:5\r\n")
        .await;
    assert_eq!(
        raw.read_to_end().await,
        b":1\r\n-ERR Protocol error: expected '$', got ':'\r\n"
    );
    let mut raw = server.raw().await;
    assert_eq!(raw.call(&["ZCARD", "z"]).await, b":1\r\n");

    server.stop();
}

#[tokio::test]
async fn test_scores_and_ranges() {
    let server = TestRedisServer::start().await;
    let mut raw = server.raw().await;

    raw.call(&["ZADD", "z", "1", "a", "2.5", "b", "-inf", "c"]).await;
    assert_eq!(raw.call(&["ZSCORE", "z", "b"]).await, b"$3\r\n2.5\r\n");
    assert_eq!(raw.call(&["ZSCORE", "z", "c"]).await, b"$4\r\n-inf\r\n");
    assert_eq!(raw.call(&["ZSCORE", "z", "x"]).await, b"$-1\r\n");
    assert_eq!(raw.call(&["ZINCRBY", "z", "2", "a"]).await, b"$1\r\n3\r\n");
    assert_eq!(raw.call(&["ZRANK", "z", "a"]).await, b":2\r\n");
    assert_eq!(raw.call(&["ZREVRANK", "z", "a"]).await, b":0\r\n");
    assert_eq!(raw.call(&["ZCOUNT", "z", "(1", "+inf"]).await, b":2\r\n");
    assert_eq!(
        raw.call(&["ZRANGE", "z", "0", "-1"]).await,
        b"*3\r\n$1\r\nc\r\n$1\r\nb\r\n$1\r\na\r\n"
    );
    assert_eq!(
        raw.call(&["ZREVRANGE", "z", "0", "0", "WITHSCORES"]).await,
        b"*2\r\n$1\r\na\r\n$1\r\n3\r\n"
    );

    server.stop();
}

#[tokio::test]
async fn test_redis_client_roundtrip() -> RedisResult<()> {
    let server = TestRedisServer::start().await;
    let mut conn = server.get_async_connection().await?;

    let added: i64 = redis::cmd("ZADD")
        .arg("myzset")
        .arg(1)
        .arg("one")
        .arg(2)
        .arg("two")
        .query_async(&mut conn)
        .await?;
    assert_eq!(added, 2);

    let members: Vec<(String, f64)> = redis::cmd("ZRANGE")
        .arg("myzset")
        .arg(0)
        .arg(-1)
        .arg("WITHSCORES")
        .query_async(&mut conn)
        .await?;
    assert_eq!(
        members,
        vec![("one".to_string(), 1.0), ("two".to_string(), 2.0)]
    );

    let _: () = redis::cmd("SET")
        .arg("string_key")
        .arg("string_value")
        .query_async(&mut conn)
        .await?;
    let err = redis::cmd("ZCARD")
        .arg("string_key")
        .query_async::<_, i64>(&mut conn)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeError);

    let err = redis::cmd("ZCARD")
        .query_async::<_, i64>(&mut conn)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ResponseError);

    // The connection stays usable after errors
    let card: i64 = redis::cmd("ZCARD")
        .arg("myzset")
        .query_async(&mut conn)
        .await?;
    assert_eq!(card, 2);

    server.stop();
    Ok(())
}

#[tokio::test]
async fn test_concurrent_clients_share_keyspace() -> RedisResult<()> {
    let server = TestRedisServer::start().await;

    let mut tasks = Vec::new();
    for client in 0..8 {
        let mut conn = server.get_async_connection().await?;
        tasks.push(tokio::spawn(async move {
            for i in 0..25 {
                let _: i64 = redis::cmd("ZADD")
                    .arg("shared")
                    .arg(i)
                    .arg(format!("m{}-{}", client, i))
                    .query_async(&mut conn)
                    .await?;
            }
            Ok::<_, redis::RedisError>(())
        }));
    }
    for task in tasks {
        task.await.expect("client task panicked")?;
    }

    let mut conn = server.get_async_connection().await?;
    let card: i64 = redis::cmd("ZCARD").arg("shared").query_async(&mut conn).await?;
    assert_eq!(card, 200);

    server.stop();
    Ok(())
}
