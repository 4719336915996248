//! Sorted set commands (ZADD, ZSCORE, ZRANK, ZREVRANK, ZCARD, ZRANGEBYSCORE,
//! ZRANGE, ZREVRANGE, ZREM, ZINCRBY)

use super::{
    extract_bulk_string, extract_bulk_strings, extract_float, extract_integer, modify_value,
    read_value, try_reply, write_value, wrong_args, Command, CommandContext,
};
use crate::protocol::{format_score, parse_score, RespValue};
use crate::store::{SortedSet, Value};
use bytes::Bytes;
use std::ops::Bound;

/// Parse a score bound: `1.5` is inclusive, `(1.5` exclusive
fn extract_bound(value: &RespValue) -> Result<Bound<f64>, RespValue> {
    let invalid = || RespValue::error("ERR min or max is not a float");
    let raw = extract_bulk_string(value).map_err(|_| invalid())?;

    let (exclusive, raw) = match raw.first() {
        Some(b'(') => (true, &raw[1..]),
        _ => (false, &raw[..]),
    };
    let score = parse_score(raw).ok_or_else(invalid)?;

    Ok(if exclusive {
        Bound::Excluded(score)
    } else {
        Bound::Included(score)
    })
}

/// Is the trailing WITHSCORES flag present?
fn with_scores(args: &[RespValue], name: &str) -> Result<bool, RespValue> {
    match args {
        [] => Ok(false),
        [flag] if extract_bulk_string(flag)?.eq_ignore_ascii_case(b"WITHSCORES") => Ok(true),
        _ => Err(RespValue::error(format!("ERR syntax error in '{}'", name))),
    }
}

/// Build the reply for a list of (member, score) pairs
fn members_reply(items: Vec<(Bytes, f64)>, scores: bool) -> RespValue {
    let mut reply = Vec::with_capacity(items.len() * if scores { 2 } else { 1 });
    for (member, score) in items {
        reply.push(RespValue::bulk_string(member));
        if scores {
            reply.push(RespValue::bulk_string(format_score(score)));
        }
    }
    RespValue::array(reply)
}

/// ZADD command - Add members with scores, or update their scores
///
/// Syntax: ZADD key score member [score member ...]
pub struct ZAddCommand;

impl Command for ZAddCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[RespValue]) -> RespValue {
        if args.len() < 3 || (args.len() - 1) % 2 != 0 {
            return wrong_args("ZADD");
        }

        let key = try_reply!(extract_bulk_string(&args[0]));

        // Validate every pair before touching the keyspace
        let mut pairs = Vec::with_capacity((args.len() - 1) / 2);
        for pair in args[1..].chunks(2) {
            let score = try_reply!(extract_float(&pair[0]));
            let member = try_reply!(extract_bulk_string(&pair[1])).clone();
            pairs.push((member, score));
        }

        let zset = try_reply!(write_value(
            ctx,
            key,
            Value::empty_sorted_set,
            Value::as_sorted_set_mut
        ));
        let added = pairs
            .into_iter()
            .filter(|(member, score)| zset.insert(member.clone(), *score))
            .count();

        RespValue::integer(added as i64)
    }

    fn name(&self) -> &'static str {
        "ZADD"
    }

    fn min_args(&self) -> usize {
        3
    }
}

/// ZINCRBY command - Increment the score of a member
///
/// Syntax: ZINCRBY key increment member
pub struct ZIncrByCommand;

impl Command for ZIncrByCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[RespValue]) -> RespValue {
        if args.len() < 3 {
            return wrong_args("ZINCRBY");
        }

        let key = try_reply!(extract_bulk_string(&args[0]));
        let delta = try_reply!(extract_float(&args[1]));
        let member = try_reply!(extract_bulk_string(&args[2])).clone();

        let zset = try_reply!(write_value(
            ctx,
            key,
            Value::empty_sorted_set,
            Value::as_sorted_set_mut
        ));
        let current = zset.score(&member).unwrap_or(0.0);
        if (current + delta).is_nan() {
            ctx.store.remove_if_empty(key);
            return RespValue::error("ERR resulting score is not a number (NaN)");
        }
        let score = zset.incr(member, delta);

        RespValue::bulk_string(format_score(score))
    }

    fn name(&self) -> &'static str {
        "ZINCRBY"
    }

    fn min_args(&self) -> usize {
        3
    }

    fn max_args(&self) -> Option<usize> {
        Some(3)
    }
}

/// ZREM command - Remove one or more members
///
/// Syntax: ZREM key member [member ...]
pub struct ZRemCommand;

impl Command for ZRemCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[RespValue]) -> RespValue {
        if args.len() < 2 {
            return wrong_args("ZREM");
        }

        let key = try_reply!(extract_bulk_string(&args[0]));
        let members = try_reply!(extract_bulk_strings(&args[1..]));

        let removed = match try_reply!(modify_value(ctx, key, Value::as_sorted_set_mut)) {
            Some(zset) => members.iter().filter(|m| zset.remove(m)).count(),
            None => 0,
        };
        ctx.store.remove_if_empty(key);

        RespValue::integer(removed as i64)
    }

    fn name(&self) -> &'static str {
        "ZREM"
    }

    fn min_args(&self) -> usize {
        2
    }
}

/// ZSCORE command - Get the score of a member
///
/// Syntax: ZSCORE key member
pub struct ZScoreCommand;

impl Command for ZScoreCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[RespValue]) -> RespValue {
        if args.len() < 2 {
            return wrong_args("ZSCORE");
        }

        let key = try_reply!(extract_bulk_string(&args[0]));
        let member = try_reply!(extract_bulk_string(&args[1]));

        let score = try_reply!(read_value(ctx, key, Value::as_sorted_set))
            .and_then(|zset| zset.score(member));

        match score {
            Some(score) => RespValue::bulk_string(format_score(score)),
            None => RespValue::null(),
        }
    }

    fn name(&self) -> &'static str {
        "ZSCORE"
    }

    fn min_args(&self) -> usize {
        2
    }

    fn max_args(&self) -> Option<usize> {
        Some(2)
    }
}

/// Shared body of ZRANK / ZREVRANK
fn rank(ctx: &mut CommandContext, args: &[RespValue], reverse: bool, name: &str) -> RespValue {
    if args.len() < 2 {
        return wrong_args(name);
    }

    let key = try_reply!(extract_bulk_string(&args[0]));
    let member = try_reply!(extract_bulk_string(&args[1]));

    let rank = try_reply!(read_value(ctx, key, Value::as_sorted_set)).and_then(|zset| {
        if reverse {
            zset.rev_rank(member)
        } else {
            zset.rank(member)
        }
    });

    match rank {
        Some(rank) => RespValue::integer(rank as i64),
        None => RespValue::null(),
    }
}

/// ZRANK command - Zero-based rank of a member, ascending by score
///
/// Syntax: ZRANK key member
pub struct ZRankCommand;

impl Command for ZRankCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[RespValue]) -> RespValue {
        rank(ctx, args, false, self.name())
    }

    fn name(&self) -> &'static str {
        "ZRANK"
    }

    fn min_args(&self) -> usize {
        2
    }

    fn max_args(&self) -> Option<usize> {
        Some(2)
    }
}

/// ZREVRANK command - Zero-based rank of a member, descending by score
///
/// Syntax: ZREVRANK key member
pub struct ZRevRankCommand;

impl Command for ZRevRankCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[RespValue]) -> RespValue {
        rank(ctx, args, true, self.name())
    }

    fn name(&self) -> &'static str {
        "ZREVRANK"
    }

    fn min_args(&self) -> usize {
        2
    }

    fn max_args(&self) -> Option<usize> {
        Some(2)
    }
}

/// ZCARD command - Number of members in a sorted set
///
/// Syntax: ZCARD key
pub struct ZCardCommand;

impl Command for ZCardCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[RespValue]) -> RespValue {
        if args.is_empty() {
            return wrong_args("ZCARD");
        }

        let key = try_reply!(extract_bulk_string(&args[0]));
        let len = try_reply!(read_value(ctx, key, Value::as_sorted_set))
            .map(SortedSet::len)
            .unwrap_or(0);

        RespValue::integer(len as i64)
    }

    fn name(&self) -> &'static str {
        "ZCARD"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}

/// ZRANGEBYSCORE command - Members with a score inside the bounds, ascending
///
/// Syntax: ZRANGEBYSCORE key min max [WITHSCORES]
pub struct ZRangeByScoreCommand;

impl Command for ZRangeByScoreCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[RespValue]) -> RespValue {
        if args.len() < 3 {
            return wrong_args("ZRANGEBYSCORE");
        }

        let key = try_reply!(extract_bulk_string(&args[0]));
        let min = try_reply!(extract_bound(&args[1]));
        let max = try_reply!(extract_bound(&args[2]));
        let scores = try_reply!(with_scores(&args[3..], self.name()));

        let items = try_reply!(read_value(ctx, key, Value::as_sorted_set))
            .map(|zset| zset.range_by_score(min, max))
            .unwrap_or_default();

        members_reply(items, scores)
    }

    fn name(&self) -> &'static str {
        "ZRANGEBYSCORE"
    }

    fn min_args(&self) -> usize {
        3
    }

    fn max_args(&self) -> Option<usize> {
        Some(4)
    }
}

/// Shared body of ZRANGE / ZREVRANGE (rank-based, inclusive, negative indices allowed)
fn range_by_rank(
    ctx: &mut CommandContext,
    args: &[RespValue],
    reverse: bool,
    name: &str,
) -> RespValue {
    if args.len() < 3 {
        return wrong_args(name);
    }

    let key = try_reply!(extract_bulk_string(&args[0]));
    let start = try_reply!(extract_integer(&args[1]));
    let stop = try_reply!(extract_integer(&args[2]));
    let scores = try_reply!(with_scores(&args[3..], name));

    let zset = match try_reply!(read_value(ctx, key, Value::as_sorted_set)) {
        Some(zset) => zset,
        None => return RespValue::array(vec![]),
    };

    let len = zset.len() as i64;
    let start = if start < 0 { (len + start).max(0) } else { start };
    let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };
    if start > stop || start >= len {
        return RespValue::array(vec![]);
    }

    let ordered: Box<dyn Iterator<Item = (&Bytes, f64)> + '_> = if reverse {
        Box::new(zset.iter().rev())
    } else {
        Box::new(zset.iter())
    };
    let items: Vec<(Bytes, f64)> = ordered
        .skip(start as usize)
        .take((stop - start + 1) as usize)
        .map(|(member, score)| (member.clone(), score))
        .collect();

    members_reply(items, scores)
}

/// ZRANGE command - Members by rank, ascending
///
/// Syntax: ZRANGE key start stop [WITHSCORES]
pub struct ZRangeCommand;

impl Command for ZRangeCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[RespValue]) -> RespValue {
        range_by_rank(ctx, args, false, self.name())
    }

    fn name(&self) -> &'static str {
        "ZRANGE"
    }

    fn min_args(&self) -> usize {
        3
    }

    fn max_args(&self) -> Option<usize> {
        Some(4)
    }
}

/// ZREVRANGE command - Members by rank, descending
///
/// Syntax: ZREVRANGE key start stop [WITHSCORES]
pub struct ZRevRangeCommand;

impl Command for ZRevRangeCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[RespValue]) -> RespValue {
        range_by_rank(ctx, args, true, self.name())
    }

    fn name(&self) -> &'static str {
        "ZREVRANGE"
    }

    fn min_args(&self) -> usize {
        3
    }

    fn max_args(&self) -> Option<usize> {
        Some(4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(parts: &[&str]) -> Vec<RespValue> {
        parts
            .iter()
            .map(|p| RespValue::bulk_string(Bytes::copy_from_slice(p.as_bytes())))
            .collect()
    }

    fn bulk(items: &[&'static str]) -> RespValue {
        RespValue::array(items.iter().map(|s| RespValue::bulk_string(*s)).collect())
    }

    fn ages() -> CommandContext {
        let mut ctx = CommandContext::new();
        let result = ZAddCommand.execute(
            &mut ctx,
            &args(&["ages", "29", "1", "39", "2", "15", "3", "35", "4", "98", "5", "5", "6"]),
        );
        assert_eq!(result, RespValue::integer(6));
        ctx
    }

    #[test]
    fn test_zadd_updates_score() {
        let mut ctx = ages();
        let result = ZAddCommand.execute(&mut ctx, &args(&["ages", "1", "5"]));
        assert_eq!(result, RespValue::integer(0));
        assert_eq!(
            ZScoreCommand.execute(&mut ctx, &args(&["ages", "5"])),
            RespValue::bulk_string("1")
        );
        assert_eq!(ZCardCommand.execute(&mut ctx, &args(&["ages"])), RespValue::integer(6));
    }

    #[test]
    fn test_zadd_rejects_bad_score() {
        let mut ctx = CommandContext::new();
        assert!(ZAddCommand.execute(&mut ctx, &args(&["z", "abc", "m"])).is_error());
        assert!(ZAddCommand.execute(&mut ctx, &args(&["z", "1", "m", "2"])).is_error());
        assert!(!ctx.store.exists(&Bytes::from("z")));
    }

    #[test]
    fn test_rank_and_revrank() {
        let mut ctx = ages();
        assert_eq!(ZRankCommand.execute(&mut ctx, &args(&["ages", "6"])), RespValue::integer(0));
        assert_eq!(ZRankCommand.execute(&mut ctx, &args(&["ages", "4"])), RespValue::integer(3));
        assert_eq!(ZRevRankCommand.execute(&mut ctx, &args(&["ages", "6"])), RespValue::integer(5));
        assert_eq!(ZRankCommand.execute(&mut ctx, &args(&["ages", "x"])), RespValue::null());
        assert_eq!(ZScoreCommand.execute(&mut ctx, &args(&["ages", "x"])), RespValue::null());
    }

    #[test]
    fn test_zrangebyscore() {
        let mut ctx = ages();

        let result = ZRangeByScoreCommand.execute(&mut ctx, &args(&["ages", "-inf", "35"]));
        assert_eq!(result, bulk(&["6", "3", "1", "4"]));

        let result = ZRangeByScoreCommand.execute(&mut ctx, &args(&["ages", "-inf", "(30"]));
        assert_eq!(result, bulk(&["6", "3", "1"]));

        let result = ZRangeByScoreCommand.execute(&mut ctx, &args(&["ages", "(30", "+inf"]));
        assert_eq!(result, bulk(&["4", "2", "5"]));

        let result =
            ZRangeByScoreCommand.execute(&mut ctx, &args(&["ages", "35", "35", "WITHSCORES"]));
        assert_eq!(result, bulk(&["4", "35"]));

        assert!(ZRangeByScoreCommand.execute(&mut ctx, &args(&["ages", "x", "1"])).is_error());
    }

    #[test]
    fn test_zrange_zrevrange() {
        let mut ctx = ages();

        let result = ZRangeCommand.execute(&mut ctx, &args(&["ages", "0", "1"]));
        assert_eq!(result, bulk(&["6", "3"]));

        let result = ZRevRangeCommand.execute(&mut ctx, &args(&["ages", "0", "-1"]));
        assert_eq!(result, bulk(&["5", "2", "4", "1", "3", "6"]));

        let result = ZRangeCommand.execute(&mut ctx, &args(&["missing", "0", "-1"]));
        assert_eq!(result, bulk(&[]));
    }

    #[test]
    fn test_zrem_zincrby() {
        let mut ctx = ages();

        assert_eq!(
            ZRemCommand.execute(&mut ctx, &args(&["ages", "6", "nope"])),
            RespValue::integer(1)
        );
        assert_eq!(
            ZIncrByCommand.execute(&mut ctx, &args(&["ages", "0.5", "3"])),
            RespValue::bulk_string("15.5")
        );
        assert_eq!(ZRankCommand.execute(&mut ctx, &args(&["ages", "3"])), RespValue::integer(0));
    }
}
