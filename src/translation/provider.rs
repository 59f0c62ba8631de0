use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of translation backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Local MTran server speaking the `/translate` REST API.
    #[default]
    MTran,
    /// OpenAI-compatible chat completion endpoint.
    OpenAi,
}

impl ProviderKind {
    pub const ALL: [Self; 2] = [Self::MTran, Self::OpenAi];

    /// Maps a configured provider name to a backend.
    ///
    /// Only `openai` (case-insensitive, trimmed) selects the chat backend;
    /// anything else, including an empty value, selects MTran.
    pub fn normalize(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("openai") {
            Self::OpenAi
        } else {
            Self::MTran
        }
    }

    /// Name used in the config file and on the command line.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MTran => "mtran",
            Self::OpenAi => "openai",
        }
    }

    /// Name used in error messages.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::MTran => "MTran",
            Self::OpenAi => "Chat endpoint",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::MTran => "Local MTran server (/translate)",
            Self::OpenAi => "OpenAI-compatible chat completion endpoint",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
