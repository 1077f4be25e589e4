//! Avatar References
//!
//! Players get an avatar URL derived from their id, so the same player
//! always renders with the same image. Only https URLs on a short host
//! allowlist are considered safe to hand to the presentation layer.

use sha2::{Sha256, Digest};

/// Hosts the presentation layer is allowed to load avatars from.
pub const TRUSTED_IMAGE_HOSTS: [&str; 2] = ["images.unsplash.com", "via.placeholder.com"];

/// First photo number in the generated range.
const PHOTO_BASE: u64 = 1_500_000_000_000;

/// Width of the generated photo range.
const PHOTO_SPAN: u64 = 1_000_000_000;

/// Derive a stable avatar URL for a player id.
pub fn avatar_for(player_id: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"live-rank-avatar:");
    hasher.update(player_id.as_bytes());
    let hash = hasher.finalize();

    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash[..8]);
    let photo = PHOTO_BASE + u64::from_le_bytes(bytes) % PHOTO_SPAN;

    format!("https://images.unsplash.com/photo-{photo}?w=150&h=150&fit=crop&crop=face")
}

/// Check that a URL is https and points at a trusted image host.
pub fn validate_image_url(url: &str) -> bool {
    let Some(rest) = url.strip_prefix("https://") else {
        return false;
    };

    let authority = rest
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();

    // Userinfo ("user@host") and explicit ports are never produced by us.
    if authority.contains('@') || authority.contains(':') {
        return false;
    }

    TRUSTED_IMAGE_HOSTS
        .iter()
        .any(|host| authority.eq_ignore_ascii_case(host))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_avatar_is_stable() {
        assert_eq!(avatar_for("abc"), avatar_for("abc"));
        assert_ne!(avatar_for("abc"), avatar_for("abd"));
    }

    #[test]
    fn test_generated_avatar_is_trusted() {
        for id in ["1", "2", "3f2c1e9a-0000-4000-8000-000000000000"] {
            assert!(validate_image_url(&avatar_for(id)));
        }
        assert!(validate_image_url("https://via.placeholder.com/32x32?text=?"));
    }

    #[test]
    fn test_untrusted_urls_rejected() {
        assert!(!validate_image_url("http://images.unsplash.com/photo-1"));
        assert!(!validate_image_url("https://evil.example.com/photo-1"));
        assert!(!validate_image_url("https://images.unsplash.com.evil.com/x"));
        assert!(!validate_image_url("https://user@images.unsplash.com/x"));
        assert!(!validate_image_url("not a url"));
        assert!(!validate_image_url(""));
    }
}
