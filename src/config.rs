use std::{fs, path::Path};

use anyhow::bail;
use serde::{de::Visitor, Deserialize};

use crate::{
    metrics::{Analyzer, DEFAULT_TRACK_MARGIN},
    raster::{Rasterizer, DEFAULT_BRUSH_WIDTH, MAX_SURFACE_PIXELS},
    score::{Locale, Scorer, Variant},
};

pub const DEFAULT_CHARACTERS: [&str; 16] = [
    "一", "二", "三", "人", "大", "天", "口", "日", "月", "水", "火", "山", "中", "国", "上", "下",
];

#[derive(Debug, Deserialize)]
pub struct Config {
    /// The practice list, in order.
    #[serde(default = "default_characters")]
    pub characters: Vec<Character>,
    #[serde(default)]
    pub canvas: Canvas,
    #[serde(default)]
    pub brush: Brush,
    #[serde(default)]
    pub scoring: Scoring,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            characters: default_characters(),
            canvas: Canvas::default(),
            brush: Brush::default(),
            scoring: Scoring::default(),
        }
    }
}

fn default_characters() -> Vec<Character> {
    DEFAULT_CHARACTERS
        .iter()
        .map(|c| Character(c.to_string()))
        .collect()
}

impl Config {
    pub fn load<A: AsRef<Path>>(path: A) -> anyhow::Result<Self> {
        Self::load_impl(path.as_ref())
    }

    fn load_impl(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(contents)?;

        // Validate configuration.
        // - The practice list must not be empty.
        // - The canvas needs a non-zero area no larger than `MAX_SURFACE_PIXELS`, the brush a
        //   positive width.
        // - The track margin has to leave a non-empty track.

        if config.characters.is_empty() {
            bail!("`characters` must list at least one character");
        }
        if config.canvas.width == 0 || config.canvas.height == 0 {
            bail!(
                "canvas must not be empty (got {}x{})",
                config.canvas.width,
                config.canvas.height
            );
        }
        if u64::from(config.canvas.width) * u64::from(config.canvas.height) > MAX_SURFACE_PIXELS {
            bail!(
                "canvas {}x{} exceeds the limit of {MAX_SURFACE_PIXELS} pixels",
                config.canvas.width,
                config.canvas.height
            );
        }
        if !(config.brush.width.is_finite() && config.brush.width > 0.0) {
            bail!("brush width must be positive (got {})", config.brush.width);
        }
        if let Some(margin) = config.scoring.track_margin {
            if !(0.0..0.5).contains(&margin) {
                bail!("`track_margin` must be in 0 <= margin < 0.5 (got {margin})");
            }
            if config.scoring.variant == Variant::Basic {
                log::warn!("`track_margin` has no effect with the basic scoring variant");
            }
        }

        Ok(config)
    }

    pub fn rasterizer(&self) -> Rasterizer {
        Rasterizer::new(self.brush.width)
    }

    pub fn analyzer(&self) -> Analyzer {
        let track_margin = match self.scoring.variant {
            Variant::Track => Some(self.scoring.track_margin.unwrap_or(DEFAULT_TRACK_MARGIN)),
            Variant::Basic => None,
        };
        Analyzer { track_margin }
    }

    pub fn scorer(&self) -> Scorer {
        Scorer::new(self.scoring.variant, self.scoring.locale)
    }
}

/// A single practice character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Character(pub String);

impl Character {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'a> Deserialize<'a> for Character {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'a>,
    {
        struct CharVisitor;

        impl<'de> Visitor<'de> for CharVisitor {
            type Value = Character;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a single character")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                let mut chars = v.chars();
                match (chars.next(), chars.next()) {
                    (Some(_), None) => Ok(Character(v.to_string())),
                    _ => Err(E::custom(format_args!(
                        "expected exactly one character, found '{v}'"
                    ))),
                }
            }
        }

        deserializer.deserialize_str(CharVisitor)
    }
}

#[derive(Debug, Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 320,
            height: 320,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Brush {
    pub width: f32,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            width: DEFAULT_BRUSH_WIDTH,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct Scoring {
    #[serde(default)]
    pub variant: Variant,
    #[serde(default)]
    pub locale: Locale,
    pub track_margin: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_example_config() {
        let config = Config::load("config.example.toml").unwrap();
        assert_eq!(config.scoring.variant, Variant::Track);
        assert!(!config.characters.is_empty());
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.characters.len(), 16);
        assert_eq!(config.characters[4].as_str(), "大");
        assert_eq!((config.canvas.width, config.canvas.height), (320, 320));
        assert_eq!(config.analyzer().track_margin, Some(DEFAULT_TRACK_MARGIN));
    }

    #[test]
    fn basic_variant_has_no_track() {
        let config = Config::parse("[scoring]\nvariant = \"basic\"\nlocale = \"en\"").unwrap();
        assert_eq!(config.analyzer().track_margin, None);
        assert_eq!(config.scorer().locale, Locale::En);
    }

    #[test]
    fn rejects_invalid() {
        assert!(Config::parse("characters = []").is_err());
        assert!(Config::parse("characters = [\"大小\"]").is_err());
        assert!(Config::parse("[canvas]\nwidth = 0\nheight = 10").is_err());
        assert!(Config::parse("[canvas]\nwidth = 100000\nheight = 100000").is_err());
        assert!(Config::parse("[canvas]\nwidth = 4096\nheight = 4096").is_ok());
        assert!(Config::parse("[brush]\nwidth = -1.0").is_err());
        assert!(Config::parse("[scoring]\ntrack_margin = 0.5").is_err());
        assert!(Config::parse("[scoring]\nvariant = \"fancy\"").is_err());
    }
}
