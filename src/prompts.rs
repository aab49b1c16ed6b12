//! Prompt synthesis tables.
//!
//! A [`PromptLibrary`] maps styles to phrase templates (with `{color}` and
//! `{mood}` slots), colors and moods to descriptor synonyms, and carries a
//! pool of quality suffixes. [`PromptLibrary::default`] ships the stock
//! art-service tables; styles outside the table fall back to a generic
//! concatenation so recommendation never fails on vocabulary gaps.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::Rng;

/// Style templates, descriptor synonyms, and quality suffixes.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PromptLibrary {
    templates: BTreeMap<String, Vec<String>>,
    color_synonyms: BTreeMap<String, Vec<String>>,
    mood_synonyms: BTreeMap<String, Vec<String>>,
    quality_suffixes: Vec<String>,
}

impl PromptLibrary {
    /// An empty library (no templates, no synonyms, no suffixes).
    pub fn empty() -> Self {
        Self {
            templates: BTreeMap::new(),
            color_synonyms: BTreeMap::new(),
            mood_synonyms: BTreeMap::new(),
            quality_suffixes: Vec::new(),
        }
    }

    /// Register an extra template for `style`. Slots `{color}` and `{mood}`
    /// are substituted at composition time.
    pub fn add_template(&mut self, style: impl Into<String>, template: impl Into<String>) {
        self.templates
            .entry(style.into())
            .or_default()
            .push(template.into());
    }

    /// Register a descriptor synonym for `color`.
    pub fn add_color_synonym(&mut self, color: impl Into<String>, synonym: impl Into<String>) {
        self.color_synonyms
            .entry(color.into())
            .or_default()
            .push(synonym.into());
    }

    /// Register a descriptor synonym for `mood`.
    pub fn add_mood_synonym(&mut self, mood: impl Into<String>, synonym: impl Into<String>) {
        self.mood_synonyms
            .entry(mood.into())
            .or_default()
            .push(synonym.into());
    }

    /// Register an extra quality suffix.
    pub fn add_quality_suffix(&mut self, suffix: impl Into<String>) {
        self.quality_suffixes.push(suffix.into());
    }

    /// Templates registered for `style`, if any.
    pub fn templates_for(&self, style: &str) -> Option<&[String]> {
        self.templates.get(style).map(|t| t.as_slice())
    }

    /// Compose a prompt for the given style/color/mood triple.
    ///
    /// Picks a random template for the style, substitutes random descriptor
    /// synonyms (the raw label when no synonyms are registered), and appends
    /// a random quality suffix. A style without templates gets the bare
    /// generic `"<style> art with <color> colors and <mood> mood"` string
    /// instead, with no synonym substitution and no suffix.
    pub fn compose(&self, rng: &mut StdRng, style: &str, color: &str, mood: &str) -> String {
        let Some(templates) = self.templates.get(style).filter(|t| !t.is_empty()) else {
            return format!("{style} art with {color} colors and {mood} mood");
        };
        let template = &templates[rng.random_range(0..templates.len())];
        let color_word = pick_synonym(rng, &self.color_synonyms, color);
        let mood_word = pick_synonym(rng, &self.mood_synonyms, mood);
        let body = template
            .replace("{color}", &color_word)
            .replace("{mood}", &mood_word);
        if self.quality_suffixes.is_empty() {
            return body;
        }
        let suffix = &self.quality_suffixes[rng.random_range(0..self.quality_suffixes.len())];
        format!("{body}, {suffix}")
    }
}

fn pick_synonym(rng: &mut StdRng, table: &BTreeMap<String, Vec<String>>, label: &str) -> String {
    match table.get(label) {
        Some(words) if !words.is_empty() => words[rng.random_range(0..words.len())].clone(),
        _ => label.to_string(),
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for PromptLibrary {
    fn default() -> Self {
        let mut templates = BTreeMap::new();
        templates.insert(
            "abstract".to_string(),
            owned(&[
                "Abstract {color} composition with {mood} atmosphere",
                "Geometric {color} patterns, {mood} and dynamic",
                "Fluid {color} shapes in {mood} motion",
                "Chaotic {color} forms creating {mood} energy",
            ]),
        );
        templates.insert(
            "realistic".to_string(),
            owned(&[
                "Photorealistic {color} landscape with {mood} lighting",
                "Detailed {color} portrait in {mood} setting",
                "Hyperrealistic {color} scene with {mood} ambiance",
                "Lifelike {color} environment, {mood} and atmospheric",
            ]),
        );
        templates.insert(
            "surreal".to_string(),
            owned(&[
                "Dreamlike {color} world with {mood} elements",
                "Surreal {color} landscape, {mood} and otherworldly",
                "Impossible {color} architecture in {mood} space",
                "Fantastical {color} creatures in {mood} realm",
            ]),
        );
        templates.insert(
            "impressionist".to_string(),
            owned(&[
                "Impressionist {color} garden with {mood} brushstrokes",
                "Soft {color} landscape in {mood} light",
                "Delicate {color} scene with {mood} atmosphere",
                "Gentle {color} composition, {mood} and serene",
            ]),
        );
        templates.insert(
            "expressionist".to_string(),
            owned(&[
                "Bold {color} strokes expressing {mood} emotion",
                "Intense {color} forms with {mood} energy",
                "Dramatic {color} composition, {mood} and powerful",
                "Expressive {color} shapes conveying {mood} feeling",
            ]),
        );

        let mut color_synonyms = BTreeMap::new();
        color_synonyms.insert(
            "vibrant".to_string(),
            owned(&["bright", "vivid", "saturated", "bold"]),
        );
        color_synonyms.insert(
            "muted".to_string(),
            owned(&["soft", "subtle", "gentle", "understated"]),
        );
        color_synonyms.insert(
            "monochrome".to_string(),
            owned(&["black and white", "grayscale", "single color"]),
        );
        color_synonyms.insert(
            "warm".to_string(),
            owned(&["orange", "red", "yellow", "golden"]),
        );
        color_synonyms.insert(
            "cool".to_string(),
            owned(&["blue", "green", "purple", "cyan"]),
        );
        color_synonyms.insert(
            "pastel".to_string(),
            owned(&["light", "pale", "soft colored"]),
        );
        color_synonyms.insert(
            "neon".to_string(),
            owned(&["glowing", "fluorescent", "electric"]),
        );

        let mut mood_synonyms = BTreeMap::new();
        mood_synonyms.insert(
            "peaceful".to_string(),
            owned(&["calm", "tranquil", "serene", "relaxing"]),
        );
        mood_synonyms.insert(
            "dramatic".to_string(),
            owned(&["intense", "powerful", "striking", "bold"]),
        );
        mood_synonyms.insert(
            "mysterious".to_string(),
            owned(&["enigmatic", "cryptic", "shadowy", "dark"]),
        );
        mood_synonyms.insert(
            "playful".to_string(),
            owned(&["fun", "whimsical", "lighthearted", "joyful"]),
        );
        mood_synonyms.insert(
            "ethereal".to_string(),
            owned(&["dreamy", "otherworldly", "celestial", "mystical"]),
        );
        mood_synonyms.insert(
            "energetic".to_string(),
            owned(&["dynamic", "vibrant", "lively", "active"]),
        );
        mood_synonyms.insert(
            "melancholic".to_string(),
            owned(&["sad", "somber", "wistful", "nostalgic"]),
        );

        Self {
            templates,
            color_synonyms,
            mood_synonyms,
            quality_suffixes: owned(&[
                "highly detailed",
                "masterpiece",
                "professional",
                "8k resolution",
                "trending on artstation",
            ]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    const COLOR_WORDS: [&str; 4] = ["bright", "vivid", "saturated", "bold"];
    const SUFFIXES: [&str; 5] = [
        "highly detailed",
        "masterpiece",
        "professional",
        "8k resolution",
        "trending on artstation",
    ];

    #[test]
    fn stock_tables_cover_templated_styles() {
        let lib = PromptLibrary::default();
        for style in [
            "abstract",
            "realistic",
            "surreal",
            "impressionist",
            "expressionist",
        ] {
            assert_eq!(lib.templates_for(style).unwrap().len(), 4, "style={style}");
        }
        assert!(lib.templates_for("minimalist").is_none());
    }

    #[test]
    fn compose_substitutes_slots_and_appends_suffix() {
        let lib = PromptLibrary::default();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            let prompt = lib.compose(&mut rng, "abstract", "vibrant", "peaceful");
            assert!(!prompt.contains("{color}"), "prompt={prompt}");
            assert!(!prompt.contains("{mood}"), "prompt={prompt}");
            assert!(
                COLOR_WORDS.iter().any(|w| prompt.contains(w)),
                "prompt={prompt}"
            );
            assert!(
                SUFFIXES.iter().any(|s| prompt.ends_with(s)),
                "prompt={prompt}"
            );
        }
    }

    #[test]
    fn unknown_style_composes_the_bare_generic_string() {
        let lib = PromptLibrary::default();
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            lib.compose(&mut rng, "baroque", "neon", "dramatic"),
            "baroque art with neon colors and dramatic mood"
        );
    }

    #[test]
    fn unknown_labels_fall_back_to_themselves() {
        let lib = PromptLibrary::default();
        let mut rng = StdRng::seed_from_u64(1);
        let prompt = lib.compose(&mut rng, "abstract", "ultraviolet", "peaceful");
        assert!(prompt.contains("ultraviolet"), "prompt={prompt}");
    }

    #[test]
    fn registered_templates_are_used() {
        let mut lib = PromptLibrary::default();
        lib.add_template("minimalist", "Minimal {color} space, {mood} emptiness");
        let mut rng = StdRng::seed_from_u64(9);
        let prompt = lib.compose(&mut rng, "minimalist", "muted", "peaceful");
        assert!(prompt.starts_with("Minimal "), "prompt={prompt}");
        assert!(prompt.contains("emptiness"), "prompt={prompt}");
    }

    // Single-entry tables leave the RNG no choice, so the output is exact.
    #[test]
    fn registered_synonyms_and_suffixes_reach_composition() {
        let mut lib = PromptLibrary::empty();
        lib.add_template("vaporwave", "Vaporwave {color} grid under {mood} skies");
        lib.add_color_synonym("neon", "electric pink");
        lib.add_mood_synonym("dreamy", "hazy");
        lib.add_quality_suffix("vhs grain");
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            lib.compose(&mut rng, "vaporwave", "neon", "dreamy"),
            "Vaporwave electric pink grid under hazy skies, vhs grain"
        );
    }

    #[test]
    fn compose_is_deterministic_per_seed() {
        let lib = PromptLibrary::default();
        let mut r1 = StdRng::seed_from_u64(77);
        let mut r2 = StdRng::seed_from_u64(77);
        for _ in 0..10 {
            assert_eq!(
                lib.compose(&mut r1, "surreal", "cool", "mysterious"),
                lib.compose(&mut r2, "surreal", "cool", "mysterious")
            );
        }
    }

    #[test]
    fn empty_library_still_composes() {
        let lib = PromptLibrary::empty();
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            lib.compose(&mut rng, "abstract", "warm", "playful"),
            "abstract art with warm colors and playful mood"
        );
    }
}
