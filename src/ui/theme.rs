//! Colours used by the TUI.

use ratatui::style::Color;

pub const ACCENT: Color = Color::Rgb(42, 122, 84);
pub const MUTED: Color = Color::Rgb(136, 136, 136);
pub const TLDR_FG: Color = Color::Rgb(126, 207, 173);
pub const ERROR: Color = Color::Rgb(224, 92, 92);

/// Colour for a specialty label; unlisted specialties are grey.
pub fn specialty_color(specialty: &str) -> Color {
    match specialty {
        "Cardiology" => Color::Rgb(224, 92, 92),
        "Electrophysiology" => Color::Rgb(124, 111, 224),
        "Internal Medicine" => Color::Rgb(58, 154, 126),
        "Cardiac Surgery" => Color::Rgb(212, 131, 42),
        "Pharmacology" => Color::Rgb(74, 144, 196),
        _ => MUTED,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_specialty_is_muted() {
        assert_eq!(specialty_color("Unknown"), MUTED);
        assert_eq!(specialty_color("cardiology"), MUTED);
        assert_ne!(specialty_color("Cardiology"), MUTED);
    }
}
