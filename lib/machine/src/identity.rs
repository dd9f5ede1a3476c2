//! Machine identity and key derivation.
//!
//! Both are total: when the machine has no hook, or the hook declines, a deterministic
//! fallback answers instead.
use crate::{
    config::{DEFAULT_UNIQUE_ID, MACHINE_KEY_SIZE},
    machine::{Machine, MachineKey},
};
use alloc::borrow::Cow;
use sha2::{Digest, Sha256};
use utils::chain::ProviderChain;

/// Unique identifier of `mach`, or [DEFAULT_UNIQUE_ID].
pub fn machine_unique_id(mach: Option<&Machine>) -> Cow<'static, str> {
    ProviderChain::new()
        .then(|| {
            let hook = mach?.unique_id?;
            hook().filter(|id| !id.is_empty()).map(Cow::Owned)
        })
        .or_else(|| Cow::Borrowed(DEFAULT_UNIQUE_ID))
}

/// Derive a key for `msg` into `key`, returning the number of key bytes.
///
/// The machine hook wins when it reports between 1 and [MACHINE_KEY_SIZE] bytes. Otherwise
/// `key` is overwritten with SHA-256 of `msg` and [MACHINE_KEY_SIZE] is returned. The buffer
/// is fixed at [MACHINE_KEY_SIZE] bytes, the size of a SHA-256 digest.
pub fn machine_key_gen(mach: Option<&Machine>, msg: &[u8], key: &mut MachineKey) -> usize {
    ProviderChain::new()
        .then(|| {
            let mach = mach?;
            let hook = mach.key_gen?;
            match hook(msg, key) {
                0 => None,
                len if len <= MACHINE_KEY_SIZE => Some(len),
                len => {
                    log::warn!(
                        "Machine [{}] reported a {} byte key, using the default derivation.",
                        mach.name,
                        len
                    );
                    None
                }
            }
        })
        .or_else(|| {
            *key = Sha256::digest(msg).into();
            MACHINE_KEY_SIZE
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::{String, ToString};

    fn no_id() -> Option<String> {
        None
    }

    fn empty_id() -> Option<String> {
        Some(String::new())
    }

    fn board_id() -> Option<String> {
        Some("ABC123".to_string())
    }

    fn short_key(_msg: &[u8], key: &mut MachineKey) -> usize {
        key[..16].fill(0xa5);
        16
    }

    fn refusing_key(_msg: &[u8], _key: &mut MachineKey) -> usize {
        0
    }

    fn oversized_key(_msg: &[u8], _key: &mut MachineKey) -> usize {
        64
    }

    #[test]
    fn unique_id_prefers_hook() {
        let mach = Machine::new("a", "").with_unique_id(board_id);
        assert_eq!(machine_unique_id(Some(&mach)), "ABC123");
    }

    #[test]
    fn unique_id_falls_back() {
        assert_eq!(machine_unique_id(None), DEFAULT_UNIQUE_ID);
        let bare = Machine::new("a", "");
        assert_eq!(machine_unique_id(Some(&bare)), DEFAULT_UNIQUE_ID);
        let silent = Machine::new("a", "").with_unique_id(no_id);
        assert_eq!(machine_unique_id(Some(&silent)), DEFAULT_UNIQUE_ID);
        let empty = Machine::new("a", "").with_unique_id(empty_id);
        assert_eq!(machine_unique_id(Some(&empty)), DEFAULT_UNIQUE_ID);
    }

    #[test]
    fn key_gen_uses_hook_output_verbatim() {
        let mach = Machine::new("a", "").with_key_gen(short_key);
        let mut key = [0u8; MACHINE_KEY_SIZE];
        assert_eq!(machine_key_gen(Some(&mach), b"hello", &mut key), 16);
        assert_eq!(key[..16], [0xa5; 16]);
        assert_eq!(key[16..], [0u8; 16]);
    }

    #[test]
    fn key_gen_hashes_when_hook_declines() {
        let expected: MachineKey = Sha256::digest(b"hello").into();
        for mach in [
            Machine::new("a", "").with_key_gen(refusing_key),
            Machine::new("b", "").with_key_gen(oversized_key),
            Machine::new("c", ""),
        ] {
            let mut key = [0u8; MACHINE_KEY_SIZE];
            assert_eq!(machine_key_gen(Some(&mach), b"hello", &mut key), 32);
            assert_eq!(key, expected);
        }
    }
}
