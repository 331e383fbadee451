use serde::{Deserialize, Serialize};

use crate::xoroshiro::Xoroshiro;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nature(u8);

const NATURE_NAMES: [&str; 25] = [
    "Hardy", "Lonely", "Brave", "Adamant", "Naughty",
    "Bold", "Docile", "Relaxed", "Impish", "Lax",
    "Timid", "Hasty", "Serious", "Jolly", "Naive",
    "Modest", "Mild", "Quiet", "Bashful", "Rash",
    "Calm", "Gentle", "Sassy", "Careful", "Quirky",
];

impl Nature {
    pub const COUNT: u8 = 25;

    pub fn new(v: u8) -> Self {
        debug_assert!(v < Self::COUNT);
        Nature(v)
    }

    pub fn id(&self) -> u8 {
        self.0
    }

    pub fn name(&self) -> &'static str {
        NATURE_NAMES[self.0 as usize]
    }

    /// 英語名から引く（大文字小文字は区別しない）
    pub fn from_name(name: &str) -> Option<Self> {
        NATURE_NAMES
            .iter()
            .position(|n| n.eq_ignore_ascii_case(name))
            .map(|i| Nature(i as u8))
    }

    pub fn iter() -> impl Iterator<Item = Nature> {
        (0..Self::COUNT).map(Nature)
    }
}

impl Xoroshiro {
    pub fn rand_nature(&mut self) -> Nature {
        Nature::new(self.rand(25) as u8)
    }
}
