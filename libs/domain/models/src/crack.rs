// [libs/domain/models/src/crack.rs]
//! A single recovered plaintext, decoded from the cracker's tailed
//! output file.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CrackResult {
    pub timestamp: i64,
    /// The original hash, with any embedded colons preserved.
    pub hash: String,
    pub plaintext: String,
}
