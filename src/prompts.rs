use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of sticker styles. Each style carries a UI label and a
/// fixed prompt clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StickerStyle {
    #[serde(rename = "Funny Caricature")]
    Caricature,
    #[serde(rename = "Cute Chibi")]
    Chibi,
    #[serde(rename = "Dank Meme")]
    Meme,
    #[serde(rename = "90s Cartoon")]
    Retro,
    #[serde(rename = "Pixel Art")]
    Pixel,
    #[serde(rename = "Claymation")]
    Clay,
    #[serde(rename = "Street Graffiti")]
    Graffiti,
    #[serde(rename = "Vintage Badge")]
    Vintage,
}

pub const ALL_STYLES: [StickerStyle; 8] = [
    StickerStyle::Caricature,
    StickerStyle::Chibi,
    StickerStyle::Meme,
    StickerStyle::Retro,
    StickerStyle::Pixel,
    StickerStyle::Clay,
    StickerStyle::Graffiti,
    StickerStyle::Vintage,
];

const BASE_INSTRUCTION: &str = "Generate a high-quality, die-cut sticker based on this image. \
The sticker should have a thick white border and be isolated on a plain background. \
Make it funny and expressive.";

impl StickerStyle {
    pub fn label(&self) -> &'static str {
        match self {
            StickerStyle::Caricature => "Funny Caricature",
            StickerStyle::Chibi => "Cute Chibi",
            StickerStyle::Meme => "Dank Meme",
            StickerStyle::Retro => "90s Cartoon",
            StickerStyle::Pixel => "Pixel Art",
            StickerStyle::Clay => "Claymation",
            StickerStyle::Graffiti => "Street Graffiti",
            StickerStyle::Vintage => "Vintage Badge",
        }
    }

    fn clause(&self) -> &'static str {
        match self {
            StickerStyle::Caricature => {
                "Exaggerated caricature, funny facial features, big head small body, vibrant colors."
            }
            StickerStyle::Chibi => {
                "Cute chibi anime style, big sparkling eyes, tiny body, very round and soft shapes."
            }
            StickerStyle::Meme => {
                "Dramatic internet meme style, high contrast, maybe adding funny text bubbles or laser eyes if appropriate."
            }
            StickerStyle::Retro => {
                "1990s Saturday morning cartoon style, bold outlines, flat colors, wacky expression."
            }
            StickerStyle::Pixel => "8-bit pixel art, retro video game asset style.",
            StickerStyle::Clay => {
                "Claymation, plasticine texture, 3D look, funny Aardman animation vibe."
            }
            StickerStyle::Graffiti => {
                "Street art graffiti character, spray paint texture, urban vibe."
            }
            StickerStyle::Vintage => {
                "Vintage badge or patch, distressed texture, muted retro colors."
            }
        }
    }
}

impl fmt::Display for StickerStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Draw `count` distinct styles uniformly at random. Asking for more than
/// the enumeration holds caps silently at eight.
pub fn pick_styles(count: usize) -> Vec<StickerStyle> {
    let mut styles = ALL_STYLES.to_vec();
    styles.shuffle(&mut rand::rng());
    styles.truncate(count.min(styles.len()));
    styles
}

/// Full instruction text for one style: the shared base instruction plus
/// the style's own clause.
pub fn prompt_for(style: StickerStyle) -> String {
    format!("{BASE_INSTRUCTION} Style: {}", style.clause())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn picks_exactly_count_distinct_styles() {
        for count in 0..=8 {
            let picked = pick_styles(count);
            assert_eq!(picked.len(), count);
            let unique: HashSet<_> = picked.iter().collect();
            assert_eq!(unique.len(), count);
        }
    }

    #[test]
    fn over_asking_caps_at_enumeration_size() {
        let picked = pick_styles(20);
        assert_eq!(picked.len(), 8);
        let unique: HashSet<_> = picked.iter().collect();
        assert_eq!(unique.len(), 8);
    }

    #[test]
    fn picked_styles_come_from_the_enumeration() {
        for style in pick_styles(8) {
            assert!(ALL_STYLES.contains(&style));
        }
    }

    #[test]
    fn repeated_picks_keep_their_shape() {
        // Randomized content: only the shape is guaranteed, never equality
        // between runs.
        let a = pick_styles(3);
        let b = pick_styles(3);
        assert_eq!(a.len(), 3);
        assert_eq!(b.len(), 3);
    }

    #[test]
    fn every_prompt_carries_base_instruction_and_its_clause() {
        for style in ALL_STYLES {
            let prompt = prompt_for(style);
            assert!(prompt.starts_with(BASE_INSTRUCTION));
            assert!(prompt.contains(style.clause()));
        }
    }

    #[test]
    fn clauses_and_labels_are_distinct_per_style() {
        let clauses: HashSet<_> = ALL_STYLES.iter().map(|s| s.clause()).collect();
        let labels: HashSet<_> = ALL_STYLES.iter().map(|s| s.label()).collect();
        assert_eq!(clauses.len(), ALL_STYLES.len());
        assert_eq!(labels.len(), ALL_STYLES.len());
    }
}
