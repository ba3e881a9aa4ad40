/// Parser settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParserConfig {
    /// Reject input whose first line is not `#EXTM3U`.
    pub require_extension_marker: bool,
    /// Alternate to pick in audio groups, clamped to the last one.
    pub audio_index: Option<usize>,
}

impl ParserConfig {
    /// Create config from environment variables.
    ///
    /// `HLS_REQUIRE_EXTM3U` accepts `1`/`true`/`yes`; `HLS_AUDIO_INDEX` is a
    /// zero-based index.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(value) = lookup("HLS_REQUIRE_EXTM3U") {
            match parse_flag(&value) {
                Some(flag) => config.require_extension_marker = flag,
                None => tracing::warn!("Ignoring HLS_REQUIRE_EXTM3U='{}'", value),
            }
        }

        if let Some(value) = lookup("HLS_AUDIO_INDEX") {
            match value.trim().parse() {
                Ok(index) => {
                    tracing::info!("Audio groups will pick alternate {}", index);
                    config.audio_index = Some(index);
                }
                Err(_) => tracing::warn!("Ignoring HLS_AUDIO_INDEX='{}'", value),
            }
        }

        config
    }

    pub fn with_require_extension_marker(mut self, require: bool) -> Self {
        self.require_extension_marker = require;
        self
    }

    pub fn with_audio_index(mut self, index: Option<usize>) -> Self {
        self.audio_index = index;
        self
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
