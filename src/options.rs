//! Run configuration and the number parsers behind the command line flags.

/// Largest accepted block size; one buffer of this size is allocated per target.
pub(crate) const MAX_BLOCK_SIZE: u64 = 1 << 30;

/// How read offsets advance from one iteration to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Pattern {
    /// Every offset is drawn independently.
    Random,
    /// Start at a random offset, then scan forward, wrapping near the end.
    Sequential,
}

/// The immutable parameters of every measurement in this run.
#[derive(Debug, Clone)]
pub(crate) struct SampleOptions {
    pub block_size: u64,
    pub block_count: u64,
    pub pattern: Pattern,
    pub noatime: bool,
    pub drop_cache: bool,
}

/// Parses an unsigned integer the way `strtoull` does with base 0:
/// `0x` prefix for hex, a leading `0` for octal, decimal otherwise.
///
/// Unlike `strtoull`, trailing garbage is rejected and overflow is an
/// error rather than a clamp to the maximum.
pub(crate) fn parse_number(s: &str) -> Result<u64, String> {
    let s = s.trim();
    let (digits, radix) = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        (hex, 16)
    } else if s.len() > 1 && s.starts_with('0') {
        (&s[1..], 8)
    } else {
        (s, 10)
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(format!("{s:?} is not an unsigned number"));
    }
    u64::from_str_radix(digits, radix).map_err(|_| format!("{s:?} does not fit in 64 bits"))
}

pub(crate) fn parse_block_size(s: &str) -> Result<u64, String> {
    match parse_number(s)? {
        0 => Err("block size must be at least one byte".to_string()),
        n if n > MAX_BLOCK_SIZE => Err(format!(
            "block size {n} exceeds the maximum of {MAX_BLOCK_SIZE} bytes"
        )),
        n => Ok(n),
    }
}
