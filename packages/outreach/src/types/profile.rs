//! Client profiles for personalizing outreach.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::ClientKey;

/// White-label identity used when composing outreach on a client's behalf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientProfile {
    pub company_name: String,
    pub industry: String,
    pub pain_point_focus: String,
    pub trust_link: String,
}

impl Default for ClientProfile {
    fn default() -> Self {
        Self {
            company_name: "Swarm Outreach".to_string(),
            industry: "AI automation".to_string(),
            pain_point_focus: "missed lead capture".to_string(),
            trust_link: "https://swarmoutreach.example/results".to_string(),
        }
    }
}

/// Profile lookup keyed by client, with a default fallback for unknown keys.
#[derive(Debug, Clone, Default)]
pub struct ProfileBook {
    profiles: HashMap<String, ClientProfile>,
    fallback: ClientProfile,
}

impl ProfileBook {
    /// A book holding only the built-in default profile.
    pub fn builtin() -> Self {
        Self::default()
    }

    /// Load profiles from a JSON object of `client_key -> profile`.
    ///
    /// A `"default"` entry, when present, replaces the built-in fallback.
    pub fn from_json_file(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let mut profiles: HashMap<String, ClientProfile> =
            serde_json::from_str(&raw).map_err(std::io::Error::other)?;
        let fallback = profiles.remove("default").unwrap_or_default();
        Ok(Self { profiles, fallback })
    }

    pub fn insert(&mut self, key: impl Into<String>, profile: ClientProfile) {
        self.profiles.insert(key.into(), profile);
    }

    /// Profile for a client, or the fallback when the key is unrecognized.
    pub fn get(&self, key: &ClientKey) -> &ClientProfile {
        self.profiles.get(key.as_str()).unwrap_or(&self.fallback)
    }
}
