//! Orientation classification for uploaded video.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Coarse aspect-ratio bucket derived from pixel dimensions.
///
/// Used as the namespace prefix of object-store keys, so the serialized
/// names (`landscape`/`portrait`/`other`) are part of the storage format
/// and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Landscape,
    Portrait,
    Other,
}

impl Orientation {
    /// Classify integer pixel dimensions into an orientation bucket.
    ///
    /// This is an approximate integer-ratio test, not an exact comparison:
    /// `width/16 == height/9` puts the whole 16:9 family (1920x1080,
    /// 1280x720, ...) into `Landscape` even when the ratio is slightly
    /// off. First match wins; anything outside both families is `Other`.
    pub fn from_dimensions(width: u32, height: u32) -> Orientation {
        if width / 16 == height / 9 {
            Orientation::Landscape
        } else if width / 9 == height / 16 {
            Orientation::Portrait
        } else {
            Orientation::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Landscape => "landscape",
            Orientation::Portrait => "portrait",
            Orientation::Other => "other",
        }
    }

    /// All orientation names, in key-prefix form.
    pub const PREFIXES: [&'static str; 3] = ["landscape/", "portrait/", "other/"];
}

impl Display for Orientation {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_reference_dimensions() {
        assert_eq!(
            Orientation::from_dimensions(1920, 1080),
            Orientation::Landscape
        );
        assert_eq!(
            Orientation::from_dimensions(1080, 1920),
            Orientation::Portrait
        );
        assert_eq!(Orientation::from_dimensions(1000, 1000), Orientation::Other);
    }

    #[test]
    fn tolerates_ratio_family_variance() {
        // 1280x720 and 854x480 are both in the 16:9 family under integer division.
        assert_eq!(
            Orientation::from_dimensions(1280, 720),
            Orientation::Landscape
        );
        assert_eq!(
            Orientation::from_dimensions(854, 480),
            Orientation::Landscape
        );
        assert_eq!(
            Orientation::from_dimensions(720, 1280),
            Orientation::Portrait
        );
    }
}
