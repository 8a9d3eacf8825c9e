//! Skill and stat canonicalization.
//!
//! Every entry point takes short or long form names (`str`, `athletics`,
//! `Sleight of Hand`) and resolves them down to the base ability score that
//! backs them.

use std::collections::HashMap;

use lazy_static::lazy_static;
use thiserror::Error;

use crate::store::CharacterStore;

#[derive(Debug, Error, PartialEq)]
pub enum SkillError {
    #[error("skill name required")]
    Missing,
    #[error("Unknown stat: {0}")]
    UnknownStat(String),
}

lazy_static! {
    /// Sub-skill (or saving throw) -> backing ability score.
    static ref SKILL_TO_STAT: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("strength_save", "strength");
        m.insert("athletics", "strength");
        m.insert("dexterity_save", "dexterity");
        m.insert("acrobatics", "dexterity");
        m.insert("sleight_of_hand", "dexterity");
        m.insert("stealth", "dexterity");
        m.insert("constitution_save", "constitution");
        m.insert("intelligence_save", "intelligence");
        m.insert("arcana", "intelligence");
        m.insert("computers", "intelligence");
        m.insert("history", "intelligence");
        m.insert("investigation", "intelligence");
        m.insert("nature", "intelligence");
        m.insert("religion", "intelligence");
        m.insert("wisdom_save", "wisdom");
        m.insert("animal_handling", "wisdom");
        m.insert("insight", "wisdom");
        m.insert("medicine", "wisdom");
        m.insert("perception", "wisdom");
        m.insert("survival", "wisdom");
        m.insert("charisma_save", "charisma");
        m.insert("deception", "charisma");
        m.insert("intimidation", "charisma");
        m.insert("performance", "charisma");
        m.insert("persuasion", "charisma");
        m
    };

    /// Short form -> long form.
    static ref SHORT_TO_LONG: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("str", "strength");
        m.insert("dex", "dexterity");
        m.insert("con", "constitution");
        m.insert("int", "intelligence");
        m.insert("wis", "wisdom");
        m.insert("cha", "charisma");

        m.insert("str_save", "strength_save");
        m.insert("dex_save", "dexterity_save");
        m.insert("con_save", "constitution_save");
        m.insert("int_save", "intelligence_save");
        m.insert("wis_save", "wisdom_save");
        m.insert("cha_save", "charisma_save");

        m.insert("acr", "acrobatics");
        m.insert("ani", "animal_handling");
        m.insert("arc", "arcana");
        m.insert("ath", "athletics");
        m.insert("com", "computers");
        m.insert("dec", "deception");
        m.insert("his", "history");
        m.insert("ins", "insight");
        m.insert("inti", "intimidation");
        m.insert("inv", "investigation");
        m.insert("med", "medicine");
        m.insert("nat", "nature");
        m.insert("perc", "perception");
        m.insert("perf", "performance");
        m.insert("pers", "persuasion");
        m.insert("rel", "religion");
        m.insert("soh", "sleight_of_hand");
        m.insert("ste", "stealth");
        m.insert("sur", "survival");
        m
    };
}

/// Everything about a skill, resolved against a character.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillInfo {
    /// The name as given by the user.
    pub given: String,
    /// The backing ability score name.
    pub name: String,
    pub score: i64,
    pub modifier: i64,
    pub proficient: bool,
    pub proficiency_bonus: i64,
}

/// Lowercased, underscore-joined lookup key.
fn to_lookup(name: &str) -> String {
    name.to_lowercase().replace(' ', "_")
}

/// Expand a short form to its long skill name, normalized for lookup.
fn canonical_skill(name: &str) -> String {
    let key = to_lookup(name);
    SHORT_TO_LONG
        .get(key.as_str())
        .map(|s| s.to_string())
        .unwrap_or(key)
}

/// Resolve any skill or stat name to its backing ability score name.
pub fn to_base_stat(store: &CharacterStore, name: &str) -> Result<String, SkillError> {
    if name.is_empty() {
        return Err(SkillError::Missing);
    }

    let key = canonical_skill(name);
    let stat = SKILL_TO_STAT.get(key.as_str()).copied().unwrap_or(key.as_str());

    if !store.has(stat) {
        return Err(SkillError::UnknownStat(stat.to_string()));
    }
    Ok(stat.to_string())
}

/// Full information about a skill for a given character.
pub fn lookup(store: &CharacterStore, name: &str) -> Result<SkillInfo, SkillError> {
    let stat = to_base_stat(store, name)?;
    let score = store.get_i64(&stat).unwrap_or(0);
    let proficient = is_proficient(store, name);
    Ok(SkillInfo {
        given: name.to_string(),
        name: stat,
        score,
        modifier: ability_modifier(score),
        proficient,
        proficiency_bonus: if proficient { store.proficiency_bonus() } else { 0 },
    })
}

/// The ability modifier for a raw score.
pub fn ability_modifier(score: i64) -> i64 {
    (score - 10).div_euclid(2)
}

/// Case- and separator-insensitive membership in the proficiency list.
/// Short forms are expanded first, so `ath` matches `Athletics`.
pub fn is_proficient(store: &CharacterStore, name: &str) -> bool {
    let key = canonical_skill(name);
    store
        .proficiencies()
        .iter()
        .any(|p| to_lookup(p) == key)
}

/// The proficiency bonus a skill contributes: the level-derived bonus when
/// proficient, zero otherwise.
pub fn proficiency_bonus_for(store: &CharacterStore, name: &str) -> i64 {
    if is_proficient(store, name) {
        store.proficiency_bonus()
    } else {
        0
    }
}
