use serde::{Deserialize, Serialize};

/// What to do when an input string contains no dice notation at all.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub enum MatchPolicy {
    /// Fall back to the default spec (`1x1d20+0`) with no raw text.
    #[default]
    Lenient,
    /// Reject the input with [`crate::error::ParseError::NoMatch`].
    Strict,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub policy: MatchPolicy,
    /// Seed for the engine's roller. Seeded from the OS when absent.
    pub seed: Option<u64>,
}

impl EngineConfig {
    pub fn strict() -> Self {
        Self {
            policy: MatchPolicy::Strict,
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let config = serde_json::from_reader(reader)?;
        log::debug!("Loaded engine config from {}: {:?}", path.display(), config);
        Ok(config)
    }
}
