use serde::{Deserialize, Serialize};

use rng_core::frame::{Frame, Gender, ShinyClass};
use rng_core::models::Nature;

/// 実際に観測できた項目だけを持つ部分フレーム
///
/// dayは候補シードからの日数オフセット。未観測の項目は常に一致扱い。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialFrame {
    pub day: u32,
    #[serde(default)]
    pub ec: Option<u32>,
    #[serde(default)]
    pub pid: Option<u32>,
    #[serde(default)]
    pub ivs: [Option<u8>; 6],
    #[serde(default)]
    pub ability: Option<u8>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub nature: Option<Nature>,
    #[serde(default)]
    pub shiny: Option<ShinyClass>,
}

impl PartialFrame {
    /// 生成結果をそのまま観測値にする（テスト・往復確認用）
    pub fn from_frame(day: u32, frame: &Frame) -> Self {
        Self {
            day,
            ec: Some(frame.ec),
            pid: Some(frame.pid),
            ivs: frame.ivs.map(Some),
            ability: Some(frame.ability),
            gender: Some(frame.gender),
            nature: Some(frame.nature),
            shiny: Some(frame.shiny),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ec.is_none()
            && self.pid.is_none()
            && self.ivs.iter().all(Option::is_none)
            && self.ability.is_none()
            && self.gender.is_none()
            && self.nature.is_none()
            && self.shiny.is_none()
    }

    /// 観測済みの項目がすべて一致するか
    pub fn matches(&self, frame: &Frame) -> bool {
        if self.ec.is_some_and(|ec| ec != frame.ec) {
            return false;
        }
        if self.pid.is_some_and(|pid| pid != frame.pid) {
            return false;
        }
        for (observed, actual) in self.ivs.iter().zip(frame.ivs.iter()) {
            if observed.is_some_and(|iv| iv != *actual) {
                return false;
            }
        }
        if self.ability.is_some_and(|a| a != frame.ability) {
            return false;
        }
        if self.gender.is_some_and(|g| g != frame.gender) {
            return false;
        }
        if self.nature.is_some_and(|n| n != frame.nature) {
            return false;
        }
        !self.shiny.is_some_and(|s| s != frame.shiny)
    }
}
