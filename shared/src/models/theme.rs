//! Theme presets
//!
//! Four fixed visual bundles for the public menu. Restaurants pick one by
//! id; anything unknown or unset falls back to `elegant`.

use super::choice::Choice;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThemeColors {
    pub primary: &'static str,
    pub secondary: &'static str,
    pub background: &'static str,
    pub surface: &'static str,
    pub text: &'static str,
    pub text_muted: &'static str,
    pub accent: &'static str,
    pub price: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThemeTypography {
    pub heading_font: &'static str,
    pub body_font: &'static str,
    /// Base font size in px
    pub base_size: u16,
    pub heading_weight: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageStyle {
    Rounded,
    Square,
    Circle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThemeSpacing {
    /// All values in px
    pub card_radius: u16,
    pub card_gap: u16,
    pub section_padding: u16,
    pub image_style: ImageStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThemePreset {
    pub id: &'static str,
    pub name: &'static str,
    pub colors: ThemeColors,
    pub typography: ThemeTypography,
    pub spacing: ThemeSpacing,
}

pub const DEFAULT_THEME_ID: &str = "elegant";

pub static PRESETS: [ThemePreset; 4] = [
    ThemePreset {
        id: "elegant",
        name: "Elegante",
        colors: ThemeColors {
            primary: "#1F2937",
            secondary: "#B08D57",
            background: "#FAF7F2",
            surface: "#FFFFFF",
            text: "#1F2937",
            text_muted: "#6B7280",
            accent: "#B08D57",
            price: "#7C5E2A",
        },
        typography: ThemeTypography {
            heading_font: "Playfair Display",
            body_font: "Lato",
            base_size: 16,
            heading_weight: 700,
        },
        spacing: ThemeSpacing {
            card_radius: 4,
            card_gap: 24,
            section_padding: 48,
            image_style: ImageStyle::Square,
        },
    },
    ThemePreset {
        id: "modern",
        name: "Moderno",
        colors: ThemeColors {
            primary: "#2563EB",
            secondary: "#0F172A",
            background: "#F8FAFC",
            surface: "#FFFFFF",
            text: "#0F172A",
            text_muted: "#64748B",
            accent: "#38BDF8",
            price: "#2563EB",
        },
        typography: ThemeTypography {
            heading_font: "Inter",
            body_font: "Inter",
            base_size: 16,
            heading_weight: 600,
        },
        spacing: ThemeSpacing {
            card_radius: 12,
            card_gap: 16,
            section_padding: 32,
            image_style: ImageStyle::Rounded,
        },
    },
    ThemePreset {
        id: "vibrant",
        name: "Vibrante",
        colors: ThemeColors {
            primary: "#E11D48",
            secondary: "#F59E0B",
            background: "#FFF7ED",
            surface: "#FFFFFF",
            text: "#1C1917",
            text_muted: "#78716C",
            accent: "#10B981",
            price: "#E11D48",
        },
        typography: ThemeTypography {
            heading_font: "Poppins",
            body_font: "Nunito",
            base_size: 17,
            heading_weight: 800,
        },
        spacing: ThemeSpacing {
            card_radius: 20,
            card_gap: 20,
            section_padding: 40,
            image_style: ImageStyle::Circle,
        },
    },
    ThemePreset {
        id: "dark",
        name: "Oscuro",
        colors: ThemeColors {
            primary: "#F5F5F5",
            secondary: "#A3A3A3",
            background: "#0A0A0A",
            surface: "#171717",
            text: "#F5F5F5",
            text_muted: "#A3A3A3",
            accent: "#FACC15",
            price: "#FACC15",
        },
        typography: ThemeTypography {
            heading_font: "Montserrat",
            body_font: "Open Sans",
            base_size: 16,
            heading_weight: 700,
        },
        spacing: ThemeSpacing {
            card_radius: 8,
            card_gap: 16,
            section_padding: 32,
            image_style: ImageStyle::Rounded,
        },
    },
];

pub type ThemeChoice = Choice<&'static ThemePreset>;

impl ThemePreset {
    /// Preset with the given id, if any
    pub fn find(id: &str) -> Option<&'static ThemePreset> {
        PRESETS.iter().find(|p| p.id == id)
    }

    pub fn default_preset() -> &'static ThemePreset {
        &PRESETS[0]
    }

    /// Resolve a stored `theme_id`. Unknown ids count as unset.
    pub fn choose(theme_id: Option<&str>) -> ThemeChoice {
        Choice::from_option(theme_id.and_then(Self::find))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_presets_with_unique_ids() {
        let ids: Vec<_> = PRESETS.iter().map(|p| p.id).collect();
        assert_eq!(ids, ["elegant", "modern", "vibrant", "dark"]);
    }

    #[test]
    fn default_is_elegant() {
        assert_eq!(ThemePreset::default_preset().id, DEFAULT_THEME_ID);
    }

    #[test]
    fn choose_known_unknown_and_absent() {
        let c = ThemePreset::choose(Some("dark"));
        assert_eq!(c.configured().map(|p| p.id), Some("dark"));

        assert!(ThemePreset::choose(Some("neon")).is_default());
        assert!(ThemePreset::choose(None).is_default());
        assert_eq!(
            ThemePreset::choose(None)
                .resolve(ThemePreset::default_preset())
                .id,
            "elegant"
        );
    }

    #[test]
    fn preset_values_are_pinned() {
        let dark = ThemePreset::find("dark").unwrap();
        assert_eq!(dark.colors.background, "#0A0A0A");
        assert_eq!(dark.colors.price, "#FACC15");
        assert_eq!(dark.typography.heading_font, "Montserrat");

        let elegant = ThemePreset::find("elegant").unwrap();
        assert_eq!(elegant.typography.heading_font, "Playfair Display");
        assert_eq!(elegant.spacing.image_style, ImageStyle::Square);

        let vibrant = ThemePreset::find("vibrant").unwrap();
        assert_eq!(vibrant.spacing.card_radius, 20);
        assert_eq!(vibrant.colors.primary, "#E11D48");

        let modern = ThemePreset::find("modern").unwrap();
        assert_eq!(modern.typography.heading_weight, 600);
    }

    #[test]
    fn serializes_image_style_lowercase() {
        let json = serde_json::to_value(ThemePreset::find("vibrant").unwrap()).unwrap();
        assert_eq!(json["spacing"]["image_style"], "circle");
        assert_eq!(json["colors"]["text_muted"], "#78716C");
    }
}
