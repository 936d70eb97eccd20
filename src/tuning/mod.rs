//! Data-driven game balance
//!
//! Static definition tables consumed read-only at level start. Every type is
//! serde-friendly so hosts can ship JSON overrides of the built-in tables.

pub mod characters;
pub mod items;
pub mod levels;
pub mod weapons;

pub use characters::{CharacterDef, CharacterId, Passive, SpecialAbility, UnlockCondition};
pub use items::{ItemDef, ItemKind, Stat, UpgradeBonuses, UpgradeLevel};
pub use levels::{BossDef, LevelDef, SpawnEntry};
pub use weapons::{WeaponDef, WeaponId, WeaponSpecial};
