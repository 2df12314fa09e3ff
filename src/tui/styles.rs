use ratatui::style::{Color, Modifier, Style};

/// Application theme configuration
#[derive(Debug, Clone)]
pub struct Theme {
    /// Arrow color
    pub primary: Color,

    /// Text colors
    pub text: Color,
    pub text_dim: Color,

    /// Background colors
    pub background: Color,
    pub background_alt: Color,

    /// Border colors
    pub border: Color,
    pub border_focused: Color,

    /// Shown while the local page differs from the owner's
    pub warning: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Create a dark theme
    pub fn dark() -> Self {
        Self {
            primary: Color::Rgb(147, 51, 234),      // Purple

            text: Color::Rgb(248, 250, 252),        // Slate-50
            text_dim: Color::Rgb(71, 85, 105),      // Slate-600

            background: Color::Rgb(15, 23, 42),     // Slate-900
            background_alt: Color::Rgb(30, 41, 59), // Slate-800

            border: Color::Rgb(71, 85, 105),        // Slate-600
            border_focused: Color::Rgb(147, 51, 234),

            warning: Color::Rgb(245, 158, 11),      // Amber-500
        }
    }

    /// Base style for normal elements
    pub fn base_style(&self) -> Style {
        Style::default().fg(self.text).bg(self.background)
    }

    /// Style for text content
    pub fn text_style(&self) -> Style {
        Style::default().fg(self.text)
    }

    /// Style for an arrow, greyed out when it cannot be used
    pub fn arrow_style(&self, enabled: bool) -> Style {
        if enabled {
            Style::default().fg(self.primary).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.text_dim)
        }
    }

    /// Style for the page field
    pub fn field_style(&self, focused: bool, stale: bool) -> Style {
        let style = Style::default().bg(self.background_alt);
        let style = if stale {
            style.fg(self.warning)
        } else {
            style.fg(self.text)
        };

        if focused {
            style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            style
        }
    }

    /// Style for borders
    pub fn border_style(&self, focused: bool) -> Style {
        if focused {
            Style::default()
                .fg(self.border_focused)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.border)
        }
    }

    /// Style for the status bar
    pub fn status_bar_style(&self) -> Style {
        Style::default().fg(self.text).bg(self.background_alt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_arrow_is_dimmed() {
        let theme = Theme::dark();
        assert_eq!(theme.arrow_style(false).fg, Some(theme.text_dim));
        assert_eq!(theme.arrow_style(true).fg, Some(theme.primary));
    }

    #[test]
    fn test_stale_field_uses_warning_color() {
        let theme = Theme::dark();
        assert_eq!(theme.field_style(false, true).fg, Some(theme.warning));
        assert_eq!(theme.field_style(false, false).fg, Some(theme.text));
    }
}
