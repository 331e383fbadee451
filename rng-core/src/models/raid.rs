use serde::{Deserialize, Serialize};

use crate::error::RaidError;

/// 特性の抽選方式
///
/// 巣穴データの値 0/1/2 は特性固定、3 は夢特性なしの2択、4 は3択。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbilityLock {
    First,
    Second,
    Hidden,
    NoHidden,
    Any,
}

impl AbilityLock {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(AbilityLock::First),
            1 => Some(AbilityLock::Second),
            2 => Some(AbilityLock::Hidden),
            3 => Some(AbilityLock::NoHidden),
            4 => Some(AbilityLock::Any),
            _ => None,
        }
    }
}

/// 性別の抽選方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenderLock {
    Random,
    Male,
    Female,
    Genderless,
}

impl GenderLock {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(GenderLock::Random),
            1 => Some(GenderLock::Male),
            2 => Some(GenderLock::Female),
            3 => Some(GenderLock::Genderless),
            _ => None,
        }
    }
}

/// 色違いの固定方式
///
/// Random以外はPID上位を書き換えて結果を固定する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShinyLock {
    Random,
    /// 必ず色違い（星型・菱形は自然に決まる）
    Always,
    Never,
    Star,
    Square,
}

impl ShinyLock {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(ShinyLock::Random),
            1 => Some(ShinyLock::Always),
            2 => Some(ShinyLock::Never),
            3 => Some(ShinyLock::Star),
            4 => Some(ShinyLock::Square),
            _ => None,
        }
    }
}

/// 巣穴1枠分のレイド設定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Raid {
    pub species: u16,
    #[serde(default)]
    pub alt_form: u8,
    /// 確定V数 (0-6)
    pub iv_count: u8,
    pub ability: AbilityLock,
    pub gender: GenderLock,
    /// 255=無性別 254=メスのみ 0=オスのみ それ以外は閾値
    pub gender_ratio: u8,
    pub shiny: ShinyLock,
    #[serde(default)]
    pub gigantamax: bool,
}

impl Raid {
    pub fn validate(&self) -> Result<(), RaidError> {
        if self.iv_count > 6 {
            return Err(RaidError::InvalidIvCount(self.iv_count));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raid(iv_count: u8) -> Raid {
        Raid {
            species: 837,
            alt_form: 0,
            iv_count,
            ability: AbilityLock::Any,
            gender: GenderLock::Random,
            gender_ratio: 127,
            shiny: ShinyLock::Random,
            gigantamax: false,
        }
    }

    #[test]
    fn test_validate_iv_count() {
        assert!(raid(6).validate().is_ok());
        assert_eq!(raid(7).validate(), Err(RaidError::InvalidIvCount(7)));
    }

    #[test]
    fn test_from_code() {
        assert_eq!(AbilityLock::from_code(4), Some(AbilityLock::Any));
        assert_eq!(AbilityLock::from_code(5), None);
        assert_eq!(GenderLock::from_code(3), Some(GenderLock::Genderless));
        assert_eq!(ShinyLock::from_code(2), Some(ShinyLock::Never));
    }
}
