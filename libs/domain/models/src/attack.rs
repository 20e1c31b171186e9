// [libs/domain/models/src/attack.rs]
//! Attack parameter contracts: the configuration for one cracking run,
//! as handed down from the coordinator and consumed by the arg builder.

use serde::{Deserialize, Serialize};

/// Cracker attack mode, mirroring hashcat's `-a` values.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AttackMode {
    Dictionary = 0,
    Mask = 3,
    HybridDictMask = 6,
    HybridMaskDict = 7,
    Benchmark = 9,
}

impl AttackMode {
    /// Numeric code passed to the cracker's `-a` flag.
    pub fn code(self) -> u32 {
        self as u32
    }
}

/// Increment bounds for mask-family attacks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MaskIncrement {
    pub min: u32,
    pub max: u32,
}

/// Raw custom-charset entries (0–4 of them), positional: entry `i`
/// maps to `--custom-charsetN` where `N = i + 1`. Blank entries are
/// dropped, not re-indexed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomCharsets(pub Vec<String>);

impl CustomCharsets {
    pub fn from_entries(entries: impl IntoIterator<Item = String>) -> Self {
        Self(entries.into_iter().collect())
    }

    /// Total entries, including blanks, as received — hashcat only
    /// has four custom-charset flags, so more than 4 is malformed.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Non-blank `(1-based flag index, charset)` pairs, in original
    /// position order.
    pub fn populated(&self) -> impl Iterator<Item = (usize, &str)> {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(i, entry)| {
                let trimmed = entry.trim();
                (!trimmed.is_empty()).then_some((i + 1, trimmed))
            })
    }
}

/// The attack-specific parameters for one cracking task, as derived
/// from the coordinator's attack descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttackParams {
    pub attack_mode: AttackMode,
    pub hash_type: u32,
    pub hash_file: String,

    pub wordlist: Option<String>,
    pub rule_list: Option<String>,
    pub mask: Option<String>,
    pub mask_list: Option<String>,
    pub mask_custom_charsets: CustomCharsets,
    pub mask_increment: Option<MaskIncrement>,

    pub optimized_kernels: bool,
    pub slow_candidates: bool,
    pub skip: Option<u64>,
    pub limit: Option<u64>,
    pub backend_devices: Option<String>,
    pub opencl_device_types: Option<String>,
    pub additional_args: Vec<String>,
    pub enable_additional_hash_types: bool,

    pub restore_file_path: Option<String>,
}

impl AttackParams {
    pub fn is_resuming(&self) -> bool {
        self.restore_file_path.is_some()
    }
}

/// The coordinator's wire representation of an attack, as returned by
/// `get_attack_parameters`. Distinct from `AttackParams`: this is
/// unvalidated input, named by server-side identifiers (wordlist GUID,
/// not a resolved path) until `derive_params` binds it to a task's
/// hash file and local file paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttackDescriptor {
    pub id: String,
    pub attack_mode: u32,
    pub hash_type: u32,
    pub hash_list_id: String,

    pub word_list: Option<String>,
    pub rule_list: Option<String>,
    pub mask: Option<String>,
    pub mask_list: Option<String>,
    pub mask_custom_charsets: CustomCharsets,
    pub mask_increment: Option<MaskIncrement>,

    pub optimized: bool,
    pub slow_candidates: bool,
    pub skip: Option<u64>,
    pub limit: Option<u64>,

    pub additional_args: Vec<String>,
    pub enable_additional_hash_types: bool,
}
