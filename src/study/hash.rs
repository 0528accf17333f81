use sha2::{Digest, Sha256};

use crate::value::Value;

/// Content hash of one parameter set.
///
/// SHA-256 over the sorted `name:repr` lines of every non-missing value, as
/// lowercase hex. Padding values are skipped, so a set keeps its hash when
/// another schema adds columns around it, while a set that carries an extra
/// real value never hashes like one without it.
pub(crate) fn set_hash<'a, I>(values: I) -> String
where
    I: IntoIterator<Item = (&'a String, &'a Value)>,
{
    let mut lines: Vec<String> = values
        .into_iter()
        .filter(|(_, value)| !value.is_missing())
        .map(|(name, value)| format!("{name}:{}", value.canonical_repr()))
        .collect();
    lines.sort_unstable();

    let mut hasher = Sha256::new();
    for line in &lines {
        hasher.update(line.as_bytes());
        hasher.update(b"\n");
    }
    format!("{:x}", hasher.finalize())
}
