use serde::{Deserialize, Serialize};

use super::game_version::GameVersion;

/// トレーナー情報 (TID/SID/バージョン)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub tid: u16,
    pub sid: u16,
    pub version: GameVersion,
}
