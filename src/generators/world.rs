//! World configuration.
//!
//! The world is an upstream collaborator of the pipeline: anything that
//! implements [`WorldGenerator`] can feed it. [`TemplateWorldGenerator`] is
//! the built-in, genre-table driven implementation.

use crate::generators::table::LookupTable;
use crate::project::model::{ParsedPrompt, WorldConfig};

/// Produces the world configuration for a prompt.
pub trait WorldGenerator: Send + Sync {
    fn generate(&self, prompt: &ParsedPrompt) -> WorldConfig;
}

struct WorldTemplate {
    color_palette: &'static [&'static str],
    lighting_style: &'static str,
    atmosphere: &'static str,
    visual_style: &'static [&'static str],
}

static WORLD_TEMPLATES: LookupTable<WorldTemplate> = LookupTable::new(&[
    (
        "cyberpunk",
        WorldTemplate {
            color_palette: &["neon pink", "electric blue", "deep purple", "chrome"],
            lighting_style: "neon-lit low key",
            atmosphere: "rain-soaked and oppressive",
            visual_style: &["neon noir", "high contrast", "futuristic"],
        },
    ),
    (
        "fantasy",
        WorldTemplate {
            color_palette: &["emerald", "gold", "twilight blue", "earth brown"],
            lighting_style: "soft golden hour",
            atmosphere: "mystical and wondrous",
            visual_style: &["painterly", "epic vistas", "rich detail"],
        },
    ),
    (
        "sci_fi",
        WorldTemplate {
            color_palette: &["steel grey", "cyan", "white", "amber"],
            lighting_style: "cool practical",
            atmosphere: "vast and sterile",
            visual_style: &["clean lines", "futuristic", "wide scale"],
        },
    ),
    (
        "horror",
        WorldTemplate {
            color_palette: &["desaturated green", "blood red", "black"],
            lighting_style: "harsh low key",
            atmosphere: "dread-filled and claustrophobic",
            visual_style: &["gritty", "shadow heavy", "unsettling"],
        },
    ),
    (
        "noir",
        WorldTemplate {
            color_palette: &["black", "white", "smoke grey"],
            lighting_style: "hard chiaroscuro",
            atmosphere: "smoky and fatalistic",
            visual_style: &["black and white", "high contrast", "venetian shadows"],
        },
    ),
    (
        "romance",
        WorldTemplate {
            color_palette: &["blush pink", "warm gold", "cream"],
            lighting_style: "soft diffused",
            atmosphere: "warm and intimate",
            visual_style: &["dreamy", "soft focus", "warm tones"],
        },
    ),
    (
        "comedy",
        WorldTemplate {
            color_palette: &["sunny yellow", "sky blue", "bright orange"],
            lighting_style: "bright high key",
            atmosphere: "light and playful",
            visual_style: &["vibrant", "clean", "saturated"],
        },
    ),
    (
        "drama",
        WorldTemplate {
            color_palette: &["muted teal", "warm amber", "charcoal"],
            lighting_style: "naturalistic",
            atmosphere: "grounded and intimate",
            visual_style: &["naturalistic", "handheld intimacy", "muted tones"],
        },
    ),
    (
        "default",
        WorldTemplate {
            color_palette: &["neutral grey", "warm amber", "deep blue"],
            lighting_style: "cinematic three-point",
            atmosphere: "atmospheric",
            visual_style: &["cinematic", "balanced", "detailed"],
        },
    ),
]);

const MAX_KEY_LOCATIONS: usize = 4;

/// Genre-table driven world generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateWorldGenerator;

impl TemplateWorldGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl WorldGenerator for TemplateWorldGenerator {
    #[tracing::instrument(skip(self, prompt), fields(genre = %prompt.genre))]
    fn generate(&self, prompt: &ParsedPrompt) -> WorldConfig {
        let template = WORLD_TEMPLATES.get(&prompt.genre);

        let visual_style = if prompt.visual_style.is_empty() {
            template.visual_style.iter().map(|s| s.to_string()).collect()
        } else {
            prompt.visual_style.clone()
        };

        let mut key_locations = vec![prompt.setting.clone()];
        key_locations.extend(
            prompt
                .key_elements
                .iter()
                .map(|element| format!("{} - {}", prompt.setting, element)),
        );
        key_locations.truncate(MAX_KEY_LOCATIONS);

        tracing::debug!(
            lighting = template.lighting_style,
            locations = key_locations.len(),
            "World configured"
        );

        WorldConfig {
            genre: prompt.genre.clone(),
            setting: prompt.setting.clone(),
            time_period: prompt.time_period.clone(),
            visual_style,
            color_palette: template.color_palette.iter().map(|s| s.to_string()).collect(),
            lighting_style: template.lighting_style.to_string(),
            atmosphere: template.atmosphere.to_string(),
            key_locations,
        }
    }
}
