//! Session identifiers for one store lifetime.

use gymtrack_domain::constants::{SESSION_ID_PREFIX, SESSION_ID_SUFFIX_LEN};
use rand::Rng;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Build `session_<epoch-ms>_<9 base36 chars>`.
pub fn generate_session_id(epoch_ms: u64) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..SESSION_ID_SUFFIX_LEN)
        .map(|_| char::from(BASE36[rng.gen_range(0..BASE36.len())]))
        .collect();
    format!("{SESSION_ID_PREFIX}_{epoch_ms}_{suffix}")
}
