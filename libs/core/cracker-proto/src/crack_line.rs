// [libs/core/cracker-proto/src/crack_line.rs]
//! Decodes lines tailed from the cracker's outfile:
//! `<unix_ts>:<hash_with_embedded_colons>:<hex_plaintext>`.

use agent_domain_models::CrackResult;

/// A dropped crack line, with the reason it could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrackLineWarning {
    TooFewFields,
    InvalidTimestamp,
    InvalidHexPlaintext,
}

/// Splits a tailed outfile line on `:`. The first field is the unix
/// timestamp, the last is hex-encoded plaintext, and everything between
/// is rejoined with `:` to recover the original hash (which may itself
/// contain colons, e.g. NTLM or shadow-style hashes).
///
/// Lines with fewer than three fields, a non-numeric timestamp, or
/// malformed hex are dropped with a warning rather than propagated —
/// a single corrupt line must never take down the tailer.
pub fn decode_crack_line(line: &str) -> Result<CrackResult, CrackLineWarning> {
    let fields: Vec<&str> = line.split(':').collect();
    if fields.len() < 3 {
        return Err(CrackLineWarning::TooFewFields);
    }

    let timestamp: i64 = fields[0]
        .parse()
        .map_err(|_| CrackLineWarning::InvalidTimestamp)?;

    let hex_plaintext = fields[fields.len() - 1];
    let hash = fields[1..fields.len() - 1].join(":");

    let raw = hex::decode(hex_plaintext).map_err(|_| CrackLineWarning::InvalidHexPlaintext)?;
    let plaintext = String::from_utf8_lossy(&raw).into_owned();

    Ok(CrackResult {
        timestamp,
        hash,
        plaintext,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn decodes_simple_line() {
        // "abc" in hex is 616263
        let line = "1700000000:5f4dcc3b5aa765d61d8327deb882cf99:616263";
        let result = decode_crack_line(line).unwrap();
        assert_eq!(result.timestamp, 1700000000);
        assert_eq!(result.hash, "5f4dcc3b5aa765d61d8327deb882cf99");
        assert_eq!(result.plaintext, "abc");
    }

    #[test]
    fn preserves_embedded_colons_in_hash() {
        let line = "1700000000:$6$salt$abc:def:616263";
        let result = decode_crack_line(line).unwrap();
        assert_eq!(result.hash, "$6$salt$abc:def");
    }

    #[test]
    fn rejects_too_few_fields() {
        assert_eq!(
            decode_crack_line("1700000000:616263"),
            Err(CrackLineWarning::TooFewFields)
        );
    }

    #[test]
    fn rejects_non_numeric_timestamp() {
        assert_eq!(
            decode_crack_line("not-a-ts:hash:616263"),
            Err(CrackLineWarning::InvalidTimestamp)
        );
    }

    #[test]
    fn rejects_malformed_hex() {
        assert_eq!(
            decode_crack_line("1700000000:hash:zz"),
            Err(CrackLineWarning::InvalidHexPlaintext)
        );
    }

    proptest! {
        #[test]
        fn total_function_no_panics(line in "\\PC{0,80}") {
            let _ = decode_crack_line(&line);
        }
    }
}
