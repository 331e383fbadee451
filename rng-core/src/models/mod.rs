pub mod den;
pub mod game_version;
pub mod nature;
pub mod profile;
pub mod raid;

pub use den::{DenProvider, PersonalInfo, PersonalProvider, Rarity, EVENT_DEN};
pub use game_version::GameVersion;
pub use nature::Nature;
pub use profile::Profile;
pub use raid::{AbilityLock, GenderLock, Raid, ShinyLock};
