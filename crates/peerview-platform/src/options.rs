use std::str::FromStr;

pub const ENV_ACCESSIBILITY: &str = "PEERVIEW_ACCESSIBILITY";
pub const ENV_CONTINUOUS_FRAMES: &str = "PEERVIEW_CONTINUOUS_FRAMES";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OptionsError {
    #[error("unknown accessibility mode {0:?} (expected `tracked` or `pass-through`)")]
    UnknownAccessibilityMode(String),

    #[error("{var}: expected a boolean, got {value:?}")]
    InvalidBool { var: &'static str, value: String },
}

/// Who owns hover and accessibility-focus state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum AccessibilityMode {
    /// The view tracks both and answers node queries by asking the peer to
    /// populate one node at a time.
    #[default]
    Tracked,
    /// The peer owns the whole tree; the view forwards hover events and node
    /// queries untouched.
    PassThrough,
}

impl FromStr for AccessibilityMode {
    type Err = OptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tracked" => Ok(Self::Tracked),
            "pass-through" | "passthrough" => Ok(Self::PassThrough),
            _ => Err(OptionsError::UnknownAccessibilityMode(s.to_owned())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ViewOptions {
    pub accessibility: AccessibilityMode,

    /// If true, a frame callback is re-posted after every frame (good for
    /// animations, costs battery).
    pub continuous_frames: bool,

    /// If true, pending frame and delayed callbacks are removed when the view
    /// leaves its window.
    pub cancel_callbacks_on_detach: bool,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            accessibility: AccessibilityMode::Tracked,
            continuous_frames: false,
            cancel_callbacks_on_detach: true,
        }
    }
}

impl ViewOptions {
    pub fn with_accessibility(mut self, mode: AccessibilityMode) -> Self {
        self.accessibility = mode;
        self
    }

    pub fn with_continuous_frames(mut self, on: bool) -> Self {
        self.continuous_frames = on;
        self
    }

    pub fn with_cancel_callbacks_on_detach(mut self, on: bool) -> Self {
        self.cancel_callbacks_on_detach = on;
        self
    }

    /// Defaults overridden by `PEERVIEW_ACCESSIBILITY` and
    /// `PEERVIEW_CONTINUOUS_FRAMES`.
    pub fn from_env() -> Result<Self, OptionsError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, OptionsError> {
        let mut options = Self::default();
        if let Some(mode) = lookup(ENV_ACCESSIBILITY) {
            options.accessibility = mode.parse()?;
        }
        if let Some(value) = lookup(ENV_CONTINUOUS_FRAMES) {
            options.continuous_frames = parse_bool(ENV_CONTINUOUS_FRAMES, &value)?;
        }
        log::debug!("view options: {options:?}");
        Ok(options)
    }
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, OptionsError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(OptionsError::InvalidBool {
            var,
            value: value.to_owned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn defaults_without_env() {
        let options = ViewOptions::from_lookup(env(&[])).unwrap();
        assert_eq!(options, ViewOptions::default());
        assert!(options.cancel_callbacks_on_detach);
    }

    #[test]
    fn env_overrides() {
        let options = ViewOptions::from_lookup(env(&[
            (ENV_ACCESSIBILITY, "Pass-Through"),
            (ENV_CONTINUOUS_FRAMES, "1"),
        ]))
        .unwrap();
        assert_eq!(options.accessibility, AccessibilityMode::PassThrough);
        assert!(options.continuous_frames);
    }

    #[test]
    fn bad_values_are_errors() {
        let err = ViewOptions::from_lookup(env(&[(ENV_ACCESSIBILITY, "both")])).unwrap_err();
        assert_eq!(err, OptionsError::UnknownAccessibilityMode("both".into()));

        let err = ViewOptions::from_lookup(env(&[(ENV_CONTINUOUS_FRAMES, "often")])).unwrap_err();
        assert!(err.to_string().contains(ENV_CONTINUOUS_FRAMES));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_uses_kebab_case_and_defaults() {
        let options: ViewOptions =
            serde_json::from_str(r#"{ "accessibility": "pass-through" }"#).unwrap();
        assert_eq!(options.accessibility, AccessibilityMode::PassThrough);
        assert!(options.cancel_callbacks_on_detach);

        let json = serde_json::to_string(&ViewOptions::default()).unwrap();
        assert!(json.contains(r#""accessibility":"tracked""#));
    }
}
