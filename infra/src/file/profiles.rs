use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use rng_core::models::Profile;

use crate::error::InfraError;

/// トレーナープロファイル一覧 (profiles.json)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileStore {
    pub profiles: Vec<Profile>,
}

impl ProfileStore {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, InfraError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn find(&self, name: &str) -> Result<&Profile, InfraError> {
        self.profiles
            .iter()
            .find(|profile| profile.name == name)
            .ok_or_else(|| InfraError::UnknownProfile(name.to_string()))
    }
}
