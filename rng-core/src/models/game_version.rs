use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameVersion {
    Sword,
    Shield,
}

impl GameVersion {
    pub fn name(&self) -> &'static str {
        match self {
            GameVersion::Sword => "Sword",
            GameVersion::Shield => "Shield",
        }
    }
}
