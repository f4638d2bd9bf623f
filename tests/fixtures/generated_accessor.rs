// @generated by tweakgen from tweaks.json. Do not edit.

use tweakgen::runtime::TweakProvider;

/// Feature and variable keys declared in the tweaks document.
pub mod keys {
    pub mod onboarding {
        pub const FEATURE: &str = "onboarding";
        pub const SHOW_WELCOME: &str = "showWelcome";
    }

    pub mod ui {
        pub const FEATURE: &str = "ui";
        pub const COLUMNS: &str = "columns";
        pub const GREETING: &str = "greeting";
        pub const SCALE: &str = "scale";
    }
}

/// Typed accessors for the tweaks declared in the tweaks document.
#[derive(Debug, Clone)]
pub struct GeneratedTweakAccessor<P> {
    provider: P,
}

impl<P: TweakProvider> GeneratedTweakAccessor<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn into_provider(self) -> P {
        self.provider
    }

    /// Show welcome alert
    ///
    /// Present the welcome alert when the app becomes active.
    ///
    /// Feature `onboarding`, variable `showWelcome`.
    /// Defaults to `true`.
    pub fn onboarding_show_welcome(&self) -> bool {
        self.provider
            .value(keys::onboarding::FEATURE, keys::onboarding::SHOW_WELCOME)
            .and_then(|value| value.as_bool())
            .unwrap_or(true)
    }

    /// Feature `ui`, variable `columns`.
    /// Range: `1..=6`.
    /// Defaults to `3`.
    pub fn ui_columns(&self) -> i64 {
        self.provider
            .value(keys::ui::FEATURE, keys::ui::COLUMNS)
            .and_then(|value| value.as_i64())
            .unwrap_or(3)
    }

    /// Greeting text
    ///
    /// Feature `ui`, variable `greeting`.
    /// Defaults to `"Hello"`.
    pub fn ui_greeting(&self) -> String {
        self.provider
            .value(keys::ui::FEATURE, keys::ui::GREETING)
            .and_then(|value| value.into_string())
            .unwrap_or_else(|| "Hello".to_string())
    }

    /// Feature `ui`, variable `scale`.
    /// Group: Layout.
    /// Defaults to `1.5`.
    pub fn ui_scale(&self) -> f64 {
        self.provider
            .value(keys::ui::FEATURE, keys::ui::SCALE)
            .and_then(|value| value.as_f64())
            .unwrap_or(1.5)
    }
}
