use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RaidError {
    /// 確定V数は0〜6のみ
    #[error("guaranteed IV count {0} exceeds 6")]
    InvalidIvCount(u8),

    #[error("unknown den index {0}")]
    UnknownDen(u8),

    #[error("den {den} has no raid slot {slot}")]
    UnknownRaidSlot { den: u8, slot: u8 },

    #[error("unknown species {species} (form {form})")]
    UnknownSpecies { species: u16, form: u8 },
}
