use catppuccin::PALETTE;
use ratatui::style::Color;
use ratatui::widgets::BorderType;

/// Convert a catppuccin color to a ratatui color.
const fn catppuccin_to_color(c: &catppuccin::Color) -> Color {
    Color::Rgb(c.rgb.r, c.rgb.g, c.rgb.b)
}

/// Colors used across the application, named by role.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub base: Color,
    pub surface: Color,
    pub border: Color,
    pub muted: Color,
    pub text: Color,
    pub subtext: Color,
    /// Selected categories, markers and success toasts.
    pub accent: Color,
    pub highlight: Color,
    pub position: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub border_type: BorderType,
}

impl Theme {
    const fn from_catppuccin(flavor: &catppuccin::Flavor) -> Self {
        let c = &flavor.colors;
        Self {
            base: catppuccin_to_color(&c.base),
            surface: catppuccin_to_color(&c.surface0),
            border: catppuccin_to_color(&c.surface1),
            muted: catppuccin_to_color(&c.overlay1),
            text: catppuccin_to_color(&c.text),
            subtext: catppuccin_to_color(&c.subtext1),
            accent: catppuccin_to_color(&c.green),
            highlight: catppuccin_to_color(&c.lavender),
            position: catppuccin_to_color(&c.sky),
            warning: catppuccin_to_color(&c.yellow),
            error: catppuccin_to_color(&c.red),
            info: catppuccin_to_color(&c.blue),
            border_type: BorderType::Rounded,
        }
    }

    #[must_use]
    pub fn catppuccin_mocha() -> Self {
        Self::from_catppuccin(&PALETTE.mocha)
    }

    #[must_use]
    pub fn catppuccin_latte() -> Self {
        Self::from_catppuccin(&PALETTE.latte)
    }

    #[must_use]
    pub fn catppuccin_frappe() -> Self {
        Self::from_catppuccin(&PALETTE.frappe)
    }

    #[must_use]
    pub fn catppuccin_macchiato() -> Self {
        Self::from_catppuccin(&PALETTE.macchiato)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::catppuccin_mocha()
    }
}

/// Resolve a configured theme name, falling back to Mocha.
pub fn theme_from_name(name: &str) -> Theme {
    match name.to_lowercase().as_str() {
        "catppuccin latte" | "latte" => Theme::catppuccin_latte(),
        "catppuccin frappe" | "catppuccin frappé" | "frappe" => Theme::catppuccin_frappe(),
        "catppuccin macchiato" | "macchiato" => Theme::catppuccin_macchiato(),
        "catppuccin mocha" | "mocha" => Theme::catppuccin_mocha(),
        other => {
            tracing::warn!("Unknown theme {other:?}, using Catppuccin Mocha");
            Theme::catppuccin_mocha()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_lookup_is_case_insensitive() {
        assert_eq!(
            theme_from_name("Catppuccin Latte").base,
            Theme::catppuccin_latte().base
        );
        assert_eq!(theme_from_name("unknown").base, Theme::catppuccin_mocha().base);
    }
}
