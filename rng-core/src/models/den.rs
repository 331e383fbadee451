use serde::{Deserialize, Serialize};

use super::game_version::GameVersion;
use super::raid::Raid;
use crate::error::RaidError;

/// イベントレイド用の巣穴番号
pub const EVENT_DEN: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rarity {
    Normal,
    Rare,
}

/// 巣穴データの読み出し口
///
/// テーブルの持ち方は実装側の自由。生成側は走査前に一度引くだけで、
/// 走査中は不変スナップショットとして扱う。
pub trait DenProvider {
    fn raids(&self, den: u8, rarity: Rarity, version: GameVersion) -> Result<Vec<Raid>, RaidError>;

    fn raid(
        &self,
        den: u8,
        rarity: Rarity,
        version: GameVersion,
        slot: u8,
    ) -> Result<Raid, RaidError> {
        self.raids(den, rarity, version)?
            .get(slot as usize)
            .copied()
            .ok_or(RaidError::UnknownRaidSlot { den, slot })
    }
}

/// 表示専用の種族データ（生成ロジックには使わない）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub species: u16,
    #[serde(default)]
    pub alt_form: u8,
    pub name: String,
    pub ability1: String,
    pub ability2: String,
    pub ability_hidden: String,
    pub gender_ratio: u8,
}

pub trait PersonalProvider {
    fn info(&self, species: u16, alt_form: u8) -> Result<PersonalInfo, RaidError>;
}
