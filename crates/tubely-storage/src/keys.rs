//! Object key allocation.
//!
//! Key format: `"<orientation>/<43-char base64url-no-pad>"`. The random
//! token is drawn fresh per upload from a CSPRNG and never derived from
//! user input, so keys cannot be guessed or forced to collide. No
//! uniqueness check is made against the store; the collision probability
//! of 256 random bits is treated as negligible.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::RngCore;
use tubely_core::models::Orientation;

fn random_token() -> String {
    let mut raw = [0u8; 32];
    rand::rng().fill_bytes(&mut raw);
    URL_SAFE_NO_PAD.encode(raw)
}

/// Allocate a fresh storage key namespaced by orientation.
pub fn allocate_key(orientation: Orientation) -> String {
    format!("{}/{}", orientation, random_token())
}

/// Allocate a key for a thumbnail object. Thumbnails are not
/// orientation-classified; they live under a fixed prefix with a
/// type-derived extension.
pub fn allocate_thumbnail_key(extension: &str) -> String {
    format!("thumbnails/{}.{}", random_token(), extension)
}
