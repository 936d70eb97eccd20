//! Between-run progression: coins, unlocks and shop purchases
//!
//! `Progression` is the persisted record; `Shop` owns it together with a
//! storage adapter and saves after every change.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::persistence::{StorageAdapter, StorageError, load_json, save_json};
use crate::sim::RunOutcome;
use crate::tuning::{CharacterDef, CharacterId, LevelDef, UnlockCondition, UpgradeBonuses, characters, items};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Progression {
    /// Spendable coins
    pub coins: u64,
    pub play_count: u32,
    pub total_coins_collected: u64,
    /// Highest campaign level completed (1-based count)
    pub levels_completed: u32,
    pub high_score: u64,
    /// Best score per level id
    pub level_scores: BTreeMap<String, u64>,
    pub unlocked_characters: Vec<CharacterId>,
    pub purchased_characters: Vec<CharacterId>,
    pub selected_character: CharacterId,
    /// Purchased levels per item id
    pub upgrade_levels: BTreeMap<String, u32>,
}

impl Default for Progression {
    fn default() -> Self {
        Self {
            coins: 0,
            play_count: 0,
            total_coins_collected: 0,
            levels_completed: 0,
            high_score: 0,
            level_scores: BTreeMap::new(),
            unlocked_characters: vec![CharacterId::Rookie],
            purchased_characters: vec![CharacterId::Rookie],
            selected_character: CharacterId::Rookie,
            upgrade_levels: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Error)]
pub enum PurchaseError {
    #[error("unknown item {0:?}")]
    UnknownItem(String),
    #[error("already at max level")]
    Maxed,
    #[error("need {cost} coins, have {have}")]
    InsufficientCoins { cost: u64, have: u64 },
    #[error("character already owned")]
    Owned,
    #[error("unlock condition not met")]
    Locked,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Whether a level's unlock condition is satisfied
pub fn is_level_unlocked(level: &LevelDef, progression: &Progression) -> bool {
    match level.unlock {
        UnlockCondition::Default => true,
        UnlockCondition::LevelsCompleted { count } => progression.levels_completed >= count,
        _ => false,
    }
}

pub struct Shop<S: StorageAdapter> {
    storage: S,
    progression: Progression,
}

impl<S: StorageAdapter> Shop<S> {
    const STORAGE_KEY: &'static str = "progression";

    /// Load progression, falling back to a fresh profile when missing or corrupt
    pub fn load(storage: S) -> Self {
        let mut progression: Progression = load_json(&storage, Self::STORAGE_KEY).unwrap_or_default();
        if !progression.unlocked_characters.contains(&CharacterId::Rookie) {
            progression.unlocked_characters.insert(0, CharacterId::Rookie);
        }
        if !progression.unlocked_characters.contains(&progression.selected_character) {
            progression.selected_character = CharacterId::Rookie;
        }
        Self { storage, progression }
    }

    pub fn progression(&self) -> &Progression {
        &self.progression
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn save(&mut self) -> Result<(), StorageError> {
        save_json(&mut self.storage, Self::STORAGE_KEY, &self.progression)
    }

    pub fn add_coins(&mut self, amount: u64) -> Result<(), StorageError> {
        self.progression.coins += amount;
        self.progression.total_coins_collected += amount;
        self.save()
    }

    pub fn record_play(&mut self, score: u64, level_index: usize, completed: bool) -> Result<(), StorageError> {
        let p = &mut self.progression;
        p.play_count += 1;
        p.high_score = p.high_score.max(score);

        let best = p.level_scores.entry(format!("level{}", level_index + 1)).or_insert(0);
        *best = (*best).max(score);

        if completed {
            p.levels_completed = p.levels_completed.max(level_index as u32 + 1);
        }

        self.check_unlocks();
        self.save()
    }

    /// Bank a finished run: coins first, then the play record
    pub fn settle(&mut self, outcome: &RunOutcome) -> Result<(), StorageError> {
        self.add_coins(u64::from(outcome.coins))?;
        self.record_play(outcome.score, outcome.level_index, outcome.completed)
    }

    pub fn upgrade_level(&self, item_id: &str) -> u32 {
        self.progression.upgrade_levels.get(item_id).copied().unwrap_or(0)
    }

    /// Cost of the next level, None when maxed or unknown
    pub fn next_upgrade_cost(&self, item_id: &str) -> Option<u64> {
        let item = items::find(item_id)?;
        item.levels.get(self.upgrade_level(item_id) as usize).map(|l| l.cost)
    }

    pub fn buy_upgrade(&mut self, item_id: &str) -> Result<(), PurchaseError> {
        if items::find(item_id).is_none() {
            return Err(PurchaseError::UnknownItem(item_id.to_string()));
        }
        let cost = self.next_upgrade_cost(item_id).ok_or(PurchaseError::Maxed)?;
        let have = self.progression.coins;
        if have < cost {
            return Err(PurchaseError::InsufficientCoins { cost, have });
        }

        self.progression.coins -= cost;
        *self.progression.upgrade_levels.entry(item_id.to_string()).or_insert(0) += 1;
        log::debug!("Bought {} level {}", item_id, self.upgrade_level(item_id));
        self.save()?;
        Ok(())
    }

    pub fn buy_character(&mut self, id: CharacterId) -> Result<(), PurchaseError> {
        if self.progression.purchased_characters.contains(&id) {
            return Err(PurchaseError::Owned);
        }
        match characters::get(id).unlock {
            UnlockCondition::Coins { cost } => {
                let have = self.progression.coins;
                if have < cost {
                    return Err(PurchaseError::InsufficientCoins { cost, have });
                }
                self.progression.coins -= cost;
            }
            _ if !self.condition_met(id) => return Err(PurchaseError::Locked),
            _ => {}
        }

        self.progression.purchased_characters.push(id);
        if !self.progression.unlocked_characters.contains(&id) {
            self.progression.unlocked_characters.push(id);
        }
        log::debug!("Character {:?} purchased", id);
        self.save()?;
        Ok(())
    }

    /// Returns false when the character is still locked
    pub fn select_character(&mut self, id: CharacterId) -> Result<bool, StorageError> {
        if !self.is_character_unlocked(id) {
            return Ok(false);
        }
        self.progression.selected_character = id;
        self.save()?;
        Ok(true)
    }

    pub fn is_character_unlocked(&self, id: CharacterId) -> bool {
        self.progression.unlocked_characters.contains(&id)
    }

    /// Locked, and the unlock condition is met right now
    pub fn can_buy_character(&self, id: CharacterId) -> bool {
        !self.is_character_unlocked(id) && self.condition_met(id)
    }

    fn condition_met(&self, id: CharacterId) -> bool {
        let p = &self.progression;
        match characters::get(id).unlock {
            UnlockCondition::Default => false,
            UnlockCondition::Coins { cost } => p.coins >= cost,
            UnlockCondition::Plays { count } => p.play_count >= count,
            UnlockCondition::Score { threshold } => p.high_score >= threshold,
            UnlockCondition::LevelsCompleted { count } => p.levels_completed >= count,
        }
    }

    /// Summed deltas of every purchased upgrade
    pub fn get_upgrade_bonuses(&self) -> UpgradeBonuses {
        let mut bonuses = UpgradeBonuses::default();
        for item in items::all() {
            let level = self.upgrade_level(&item.id) as usize;
            if level > 0 {
                bonuses.add(item.stat, item.total_delta(level));
            }
        }
        bonuses
    }

    pub fn get_selected_character(&self) -> CharacterDef {
        characters::get(self.progression.selected_character)
    }

    pub fn is_level_unlocked(&self, level: &LevelDef) -> bool {
        is_level_unlocked(level, &self.progression)
    }

    /// Unlock characters whose play/score/level condition is now met
    fn check_unlocks(&mut self) {
        for def in characters::all() {
            if self.is_character_unlocked(def.id) {
                continue;
            }
            let earned = match def.unlock {
                UnlockCondition::Plays { .. }
                | UnlockCondition::Score { .. }
                | UnlockCondition::LevelsCompleted { .. } => self.condition_met(def.id),
                _ => false,
            };
            if earned {
                log::info!("Unlocked {}", def.name);
                self.progression.unlocked_characters.push(def.id);
            }
        }
    }
}
