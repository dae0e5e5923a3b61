//! Map filename parsing
//!
//! Map images carry their grid size in the filename: `name_WWxHH.png`,
//! e.g. `deep_canyon_10x18.png` is 10 one-inch squares wide and 18 high.
//! Fractional counts are allowed (`bridge_4.5x12.png`).

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::{RasterError, Result};

/// Parsed map filename.
#[derive(Debug, Clone, PartialEq)]
pub struct MapName {
    /// Plain name with the size suffix stripped
    pub name: String,
    /// One-inch squares across the image width
    pub squares_wide: f32,
    /// One-inch squares across the image height
    pub squares_high: f32,
}

fn pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(\w+?)_*(\d+(?:\.\d*)?|\.\d+)x(\d+(?:\.\d*)?|\.\d+)\.png$").unwrap()
    })
}

/// Parse a `name_WWxHH.png` filename into its name and square counts.
pub fn parse_map_filename(path: impl AsRef<Path>) -> Result<MapName> {
    let path = path.as_ref();
    let leaf = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| RasterError::BadMapFilename(path.display().to_string()))?;

    let captures = pattern()
        .captures(leaf)
        .ok_or_else(|| RasterError::BadMapFilename(leaf.to_string()))?;

    // The capture groups only admit valid float syntax
    let squares_wide: f32 = captures[2].parse().unwrap();
    let squares_high: f32 = captures[3].parse().unwrap();
    if squares_wide <= 0.0 || squares_high <= 0.0 {
        return Err(RasterError::BadMapFilename(leaf.to_string()));
    }

    Ok(MapName {
        name: captures[1].to_string(),
        squares_wide,
        squares_high,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_simple_name() {
        let parsed = parse_map_filename("deep_canyon_10x18.png").unwrap();
        assert_eq!(parsed.name, "deep_canyon");
        assert_eq!((parsed.squares_wide, parsed.squares_high), (10.0, 18.0));
    }

    #[test]
    fn test_parses_fractional_squares() {
        let parsed = parse_map_filename("/maps/bridge_4.5x12.png").unwrap();
        assert_eq!(parsed.name, "bridge");
        assert_eq!((parsed.squares_wide, parsed.squares_high), (4.5, 12.0));

        let parsed = parse_map_filename("cave_.5x2.png").unwrap();
        assert_eq!((parsed.squares_wide, parsed.squares_high), (0.5, 2.0));
    }

    #[test]
    fn test_rejects_malformed_names() {
        for bad in [
            "deep_canyon.png",
            "deep_canyon_10x18.jpg",
            "10x18.png",
            "map_x18.png",
            "map_10x.png",
            "map_10x18.png.bak",
        ] {
            assert!(
                matches!(parse_map_filename(bad), Err(RasterError::BadMapFilename(_))),
                "{bad} should not parse"
            );
        }
    }

    #[test]
    fn test_rejects_zero_squares() {
        assert!(parse_map_filename("map_0x18.png").is_err());
    }
}
