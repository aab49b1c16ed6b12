//! Feature categories and the label taxonomy.
//!
//! Every learned weight and every generated recommendation is expressed over
//! the four fixed categories below. The label lists themselves are data, not
//! code: [`Taxonomy::default`] carries the stock art-service vocabulary and
//! callers can substitute their own lists.

/// The four feature categories tracked by profiles and recommendations.
///
/// The mapping from a category to the field it reads on an
/// [`Interaction`](crate::Interaction) or [`Features`](crate::Features)
/// record is an explicit table (`feature`/`get` on those types); nothing in
/// the crate derives it from label spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Category {
    Styles,
    Colors,
    Moods,
    Models,
}

impl Category {
    /// All categories, in the order profiles aggregate them.
    pub const ALL: [Category; 4] = [
        Category::Styles,
        Category::Colors,
        Category::Moods,
        Category::Models,
    ];

    /// Stable lowercase key, used for log fields and flattened vector keys.
    pub fn key(self) -> &'static str {
        match self {
            Category::Styles => "styles",
            Category::Colors => "colors",
            Category::Moods => "moods",
            Category::Models => "models",
        }
    }
}

/// Known labels per category.
///
/// Order matters: exploration rates divide by list length, and cold-start
/// recommendation falls back to the first few entries of each list.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Taxonomy {
    pub styles: Vec<String>,
    pub colors: Vec<String>,
    pub moods: Vec<String>,
    pub models: Vec<String>,
}

impl Taxonomy {
    /// Labels for `category`.
    pub fn labels(&self, category: Category) -> &[String] {
        match category {
            Category::Styles => &self.styles,
            Category::Colors => &self.colors,
            Category::Moods => &self.moods,
            Category::Models => &self.models,
        }
    }
}

fn owned(labels: &[&str]) -> Vec<String> {
    labels.iter().map(|s| s.to_string()).collect()
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self {
            styles: owned(&[
                "abstract",
                "realistic",
                "surreal",
                "impressionist",
                "expressionist",
                "minimalist",
                "baroque",
                "renaissance",
            ]),
            colors: owned(&[
                "vibrant",
                "muted",
                "monochrome",
                "warm",
                "cool",
                "pastel",
                "neon",
            ]),
            moods: owned(&[
                "peaceful",
                "dramatic",
                "mysterious",
                "playful",
                "ethereal",
                "energetic",
                "melancholic",
            ]),
            models: owned(&["style-transfer", "diffusion"]),
        }
    }
}
