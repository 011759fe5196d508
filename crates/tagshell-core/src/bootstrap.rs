// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bootstrap resolution of the entry URL.
//
// The entry URL ships XOR-obfuscated with a repeating key. Key and ciphertext
// are both bundled with the binary, so anyone holding the artifact can recover
// the URL: this keeps the string out of casual `strings` output and nothing
// more. It provides no confidentiality.

use std::sync::OnceLock;

use sha2::{Digest, Sha256};
use tracing::{debug, info};
use url::Url;

use crate::error::DecodeError;

/// Key fragments, concatenated in this order to form the XOR key.
const KEY_FRAGMENTS: [&str; 3] = ["BJJ", "SecretKey", "2025"];

/// The entry URL, XORed with the assembled key.
const SHIPPED_CIPHERTEXT: [u8; 30] = [
    0x2a, 0x3e, 0x3e, 0x23, 0x16, 0x59, 0x5d, 0x4a, 0x16, 0x21, 0x0f, 0x57, 0x42, 0x5f, 0x45,
    0x50, 0x30, 0x27, 0x2f, 0x3d, 0x11, 0x02, 0x1e, 0x4b, 0x1b, 0x25, 0x09, 0x10, 0x5c, 0x55,
];

/// Scheme the entry URL must use.
const SECURE_SCHEME: &str = "https";

/// Substring the entry URL host must contain.
const EXPECTED_HOST_MARKER: &str = "powermental";

/// Process-wide cache of the resolved entry URL.
static RESOLVED: OnceLock<ResolvedUrl> = OnceLock::new();

/// The decoded entry URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedUrl(String);

impl ResolvedUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short SHA-256 fingerprint, safe to put in logs instead of the URL.
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.0.as_bytes());
        hex::encode(&digest[..8])
    }
}

impl AsRef<str> for ResolvedUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ResolvedUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Obfuscated endpoint bytes plus the key that reveals them.
#[derive(Debug, Clone)]
pub struct EncodedEndpoint<'a> {
    ciphertext: &'a [u8],
    key: Vec<u8>,
}

impl EncodedEndpoint<'static> {
    /// The endpoint bundled with this build.
    pub fn shipped() -> Self {
        Self::new(&SHIPPED_CIPHERTEXT, assemble_key())
    }
}

impl<'a> EncodedEndpoint<'a> {
    pub fn new(ciphertext: &'a [u8], key: impl Into<Vec<u8>>) -> Self {
        Self {
            ciphertext,
            key: key.into(),
        }
    }

    /// Decode the ciphertext into a URL.
    pub fn resolve(&self) -> Result<ResolvedUrl, DecodeError> {
        if self.ciphertext.is_empty() {
            return Err(DecodeError::EmptyCiphertext);
        }
        if self.key.is_empty() {
            return Err(DecodeError::EmptyKey);
        }
        let plain = xor_with_key(self.ciphertext, &self.key);
        String::from_utf8(plain)
            .map(ResolvedUrl)
            .map_err(|_| DecodeError::InvalidUtf8)
    }
}

/// Concatenate the key fragments into the XOR key.
pub fn assemble_key() -> Vec<u8> {
    KEY_FRAGMENTS.concat().into_bytes()
}

/// Obfuscate `plain` with the shipped key.
pub fn encode(plain: &[u8]) -> Vec<u8> {
    xor_with_key(plain, &assemble_key())
}

/// Reverse [`encode`]. XOR is its own inverse, so this is the same operation.
pub fn decode(cipher: &[u8]) -> Vec<u8> {
    xor_with_key(cipher, &assemble_key())
}

/// Resolve the shipped entry URL, caching it for the process lifetime.
///
/// Fails only when the bundled bytes cannot produce a URL; callers must treat
/// that as a fatal startup error rather than loading an empty page.
pub fn resolve() -> Result<ResolvedUrl, DecodeError> {
    if let Some(url) = RESOLVED.get() {
        return Ok(url.clone());
    }
    let url = EncodedEndpoint::shipped().resolve()?;
    info!(url_fingerprint = %url.fingerprint(), "entry URL resolved");
    Ok(RESOLVED.get_or_init(|| url).clone())
}

/// Sanity check on a resolved URL: parses, `https`, expected host.
///
/// A regression check on the bundled bytes, not a security boundary.
pub fn verify(url: &str) -> bool {
    let ok = match Url::parse(url) {
        Ok(parsed) => {
            parsed.scheme() == SECURE_SCHEME
                && parsed
                    .host_str()
                    .is_some_and(|host| host.contains(EXPECTED_HOST_MARKER))
        }
        Err(e) => {
            debug!(error = %e, "entry URL does not parse");
            false
        }
    };
    debug!(ok, "entry URL verification");
    ok
}

fn xor_with_key(data: &[u8], key: &[u8]) -> Vec<u8> {
    data.iter()
        .zip(key.iter().cycle())
        .map(|(byte, k)| byte ^ k)
        .collect()
}
