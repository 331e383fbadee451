use serde::{Deserialize, Serialize};

use crate::models::Nature;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Genderless,
}

impl Gender {
    pub fn name(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Genderless => "Genderless",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShinyClass {
    None,
    Star,
    Square,
}

impl ShinyClass {
    pub fn name(&self) -> &'static str {
        match self {
            ShinyClass::None => "No",
            ShinyClass::Star => "Star",
            ShinyClass::Square => "Square",
        }
    }
}

/// PIDとトレーナーIDだけで決まる色違い判定
///
/// xor値 0 が菱形、1〜15 が星型。
pub fn shiny_class(pid: u32, tid: u16, sid: u16) -> ShinyClass {
    let x = ((pid >> 16) as u16) ^ (pid as u16) ^ tid ^ sid;
    match x {
        0 => ShinyClass::Square,
        1..=15 => ShinyClass::Star,
        _ => ShinyClass::None,
    }
}

/// 1フレーム分の生成結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// 基準シードからの日数オフセット
    pub frame: u32,
    /// このフレームが消費したシード
    pub seed: u64,
    pub ec: u32,
    pub pid: u32,
    pub ivs: [u8; 6],
    /// 特性スロット (0/1/2=夢)
    pub ability: u8,
    pub gender: Gender,
    pub nature: Nature,
    pub shiny: ShinyClass,
}
