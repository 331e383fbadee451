use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use rng_core::error::RaidError;
use rng_core::models::{
    DenProvider, GameVersion, PersonalInfo, PersonalProvider, Raid, Rarity, EVENT_DEN,
};

use crate::error::InfraError;

const BUILTIN_DENS: &str = include_str!("../../data/dens.json");

/// 巣穴1件分。レイドリストはバージョン別
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenEntry {
    pub den: u8,
    pub rarity: Rarity,
    pub sword: Vec<Raid>,
    pub shield: Vec<Raid>,
}

impl DenEntry {
    fn raids(&self, version: GameVersion) -> &[Raid] {
        match version {
            GameVersion::Sword => &self.sword,
            GameVersion::Shield => &self.shield,
        }
    }
}

/// JSON由来の巣穴・種族テーブル
///
/// 読み込み後は不変。コアにはトレイト越しに渡す。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenTable {
    pub dens: Vec<DenEntry>,
    pub personal: Vec<PersonalInfo>,
}

impl DenTable {
    /// 同梱テーブル
    pub fn builtin() -> Result<Self, InfraError> {
        Ok(serde_json::from_str(BUILTIN_DENS)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, InfraError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

impl DenProvider for DenTable {
    fn raids(&self, den: u8, rarity: Rarity, version: GameVersion) -> Result<Vec<Raid>, RaidError> {
        self.dens
            .iter()
            .find(|entry| entry.den == den && entry.rarity == rarity)
            .map(|entry| entry.raids(version).to_vec())
            .ok_or(RaidError::UnknownDen(den))
    }
}

impl PersonalProvider for DenTable {
    fn info(&self, species: u16, alt_form: u8) -> Result<PersonalInfo, RaidError> {
        self.personal
            .iter()
            .find(|info| info.species == species && info.alt_form == alt_form)
            .cloned()
            .ok_or(RaidError::UnknownSpecies {
                species,
                form: alt_form,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rng_core::models::{AbilityLock, ShinyLock};

    #[test]
    fn test_builtin_parses() {
        let table = DenTable::builtin().unwrap();
        assert!(!table.dens.is_empty());
        assert!(!table.personal.is_empty());
        for entry in &table.dens {
            for raid in entry.sword.iter().chain(entry.shield.iter()) {
                raid.validate().unwrap();
            }
        }
    }

    #[test]
    fn test_den_lookup() {
        let table = DenTable::builtin().unwrap();
        let raids = table.raids(0, Rarity::Normal, GameVersion::Sword).unwrap();
        assert!(!raids.is_empty());
        assert_eq!(raids[0].species, 837);
        assert_eq!(raids[0].ability, AbilityLock::NoHidden);
        assert_eq!(raids[0].shiny, ShinyLock::Random);

        assert_eq!(
            table.raids(99, Rarity::Normal, GameVersion::Sword),
            Err(RaidError::UnknownDen(99))
        );
    }

    #[test]
    fn test_event_den() {
        let table = DenTable::builtin().unwrap();
        let raids = table
            .raids(EVENT_DEN, Rarity::Normal, GameVersion::Shield)
            .unwrap();
        // イベントレイドは色違い無効
        assert!(raids.iter().all(|raid| raid.shiny == ShinyLock::Never));
    }

    #[test]
    fn test_raid_slot_lookup() {
        let table = DenTable::builtin().unwrap();
        let raid = table.raid(0, Rarity::Rare, GameVersion::Shield, 0).unwrap();
        assert!(raid.iv_count >= 1);
        assert_eq!(
            table.raid(0, Rarity::Rare, GameVersion::Shield, 90),
            Err(RaidError::UnknownRaidSlot { den: 0, slot: 90 })
        );
    }

    #[test]
    fn test_personal_lookup() {
        let table = DenTable::builtin().unwrap();
        let info = table.info(837, 0).unwrap();
        assert_eq!(info.name, "Rolycoly");
        assert_eq!(info.ability1, "Steam Engine");
        assert_eq!(
            table.info(9999, 0),
            Err(RaidError::UnknownSpecies {
                species: 9999,
                form: 0
            })
        );
    }
}
