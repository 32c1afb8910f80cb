//! Message digests and random bytes.

use pcl_error::{Error, ErrorCode, Result};
use rand::RngCore;
use sha2::Digest as _;

#[derive(Clone)]
enum State {
    Sha224(sha2::Sha224),
    Sha256(sha2::Sha256),
    Sha384(sha2::Sha384),
    Sha512(sha2::Sha512),
}

/// An incremental message digest.
///
/// ```
/// let mut d = pcl_crypto::Digest::new("sha256").unwrap();
/// d.update(b"abc");
/// assert_eq!(d.finalize().len(), 32);
/// ```
#[derive(Clone)]
pub struct Digest {
    name: &'static str,
    state: State,
}

impl Digest {
    /// Names supported by [`Digest::new`].
    pub const ALGORITHMS: &'static [&'static str] = &["sha224", "sha256", "sha384", "sha512"];

    /// A digest by algorithm name, case-insensitive (`sha256`, `SHA-512`, ...).
    #[track_caller]
    pub fn new(algo: &str) -> Result<Self> {
        let key = algo.to_ascii_lowercase().replace('-', "");
        let (name, state) = match key.as_str() {
            "sha224" => ("sha224", State::Sha224(sha2::Sha224::new())),
            "sha256" => ("sha256", State::Sha256(sha2::Sha256::new())),
            "sha384" => ("sha384", State::Sha384(sha2::Sha384::new())),
            "sha512" => ("sha512", State::Sha512(sha2::Sha512::new())),
            _ => {
                return Err(Error::with_msg(
                    ErrorCode::NotSupported,
                    format!("no such algorithm '{algo}'"),
                ));
            }
        };
        Ok(Self { name, state })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Output size in bytes.
    pub fn len(&self) -> usize {
        match self.state {
            State::Sha224(_) => 28,
            State::Sha256(_) => 32,
            State::Sha384(_) => 48,
            State::Sha512(_) => 64,
        }
    }

    pub fn update(&mut self, data: &[u8]) {
        match &mut self.state {
            State::Sha224(h) => h.update(data),
            State::Sha256(h) => h.update(data),
            State::Sha384(h) => h.update(data),
            State::Sha512(h) => h.update(data),
        }
    }

    /// Returns the digest and resets, so the same value can hash another message.
    pub fn finalize(&mut self) -> Vec<u8> {
        match &mut self.state {
            State::Sha224(h) => h.finalize_reset().to_vec(),
            State::Sha256(h) => h.finalize_reset().to_vec(),
            State::Sha384(h) => h.finalize_reset().to_vec(),
            State::Sha512(h) => h.finalize_reset().to_vec(),
        }
    }
}

impl std::fmt::Debug for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Digest").field("name", &self.name).finish()
    }
}

/// One-shot digest of `data`.
pub fn digest_value(algo: &str, data: &[u8]) -> Result<Vec<u8>> {
    let mut d = Digest::new(algo)?;
    d.update(data);
    Ok(d.finalize())
}

/// One-shot digest as lowercase hex.
pub fn digest_hex(algo: &str, data: &[u8]) -> Result<String> {
    Ok(pcl_string::hex_encode(&digest_value(algo, data)?))
}

/// `n` bytes from the thread-local CSPRNG.
pub fn rand_bytes(n: usize) -> Vec<u8> {
    let mut buf = vec![0u8; n];
    rand::rng().fill_bytes(&mut buf);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_vectors() {
        assert_eq!(
            digest_hex("sha256", b"abc").unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(
            digest_hex("SHA-256", b"").unwrap(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert!(digest_hex("sha512", b"abc").unwrap().starts_with("ddaf35a193617aba"));
    }

    #[test]
    fn test_unknown_algorithm() {
        let err = Digest::new("md4").unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotSupported);
        assert_eq!(err.message(), Some("no such algorithm 'md4'"));
    }

    #[test]
    fn test_finalize_resets() {
        let mut d = Digest::new("sha384").unwrap();
        assert_eq!(d.name(), "sha384");
        assert_eq!(d.len(), 48);
        d.update(b"a");
        d.update(b"bc");
        let first = d.finalize();
        d.update(b"abc");
        assert_eq!(d.finalize(), first);
        assert_eq!(first.len(), d.len());
    }

    #[test]
    fn test_rand_bytes() {
        assert!(rand_bytes(0).is_empty());
        let a = rand_bytes(32);
        let b = rand_bytes(32);
        assert_eq!(a.len(), 32);
        assert_ne!(a, b);
    }
}
