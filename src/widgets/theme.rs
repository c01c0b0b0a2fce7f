//! Theme toggle class sets

use crate::types::Theme;

/// CSS classes applied by the theme toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeClasses {
    pub container: &'static str,
    pub button: &'static str,
    pub active: &'static str,
}

const DARK: ThemeClasses = ThemeClasses {
    container: "bg-white/10 border-white/20 text-white",
    button: "bg-white/10 text-white hover:bg-white/20",
    active: "bg-primary-500 text-white",
};

const LIGHT: ThemeClasses = ThemeClasses {
    container: "bg-white border-gray-300 text-gray-800 shadow-lg",
    button: "bg-gray-50 text-gray-700 hover:bg-gray-100 border border-gray-300",
    active: "bg-blue-600 text-white border-blue-600",
};

pub fn theme_classes(theme: Theme) -> ThemeClasses {
    match theme {
        Theme::Dark => DARK,
        Theme::Light => LIGHT,
    }
}

impl ThemeClasses {
    /// Classes for an option button, highlighted when it is the active one
    pub fn option(&self, active: bool) -> &'static str {
        if active {
            self.active
        } else {
            self.button
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggling_twice_restores_classes() {
        let theme = Theme::Dark;
        let original = theme_classes(theme);
        let light = theme_classes(theme.toggled());
        assert_ne!(original, light);
        assert_eq!(theme_classes(theme.toggled().toggled()), original);
    }

    #[test]
    fn active_option_is_highlighted() {
        let classes = theme_classes(Theme::Light);
        assert_eq!(classes.option(true), "bg-blue-600 text-white border-blue-600");
        assert!(classes.option(false).starts_with("bg-gray-50"));
    }
}
