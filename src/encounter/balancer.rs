//! # Encounter Balancer
//!
//! Sizes monster groups to a party's XP budget using the 5th edition
//! encounter-building rules: per-level XP thresholds, a CR to XP table and a
//! group-size multiplier applied to the raw monster XP.

use crate::config::MAX_CHARACTER_LEVEL;
use crate::{RoomError, RoomResult};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Target difficulty of an encounter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncounterDifficulty {
    Easy,
    Medium,
    Hard,
    Deadly,
}

impl EncounterDifficulty {
    fn column(self) -> usize {
        match self {
            EncounterDifficulty::Easy => 0,
            EncounterDifficulty::Medium => 1,
            EncounterDifficulty::Hard => 2,
            EncounterDifficulty::Deadly => 3,
        }
    }
}

impl FromStr for EncounterDifficulty {
    type Err = RoomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(EncounterDifficulty::Easy),
            "medium" => Ok(EncounterDifficulty::Medium),
            "hard" => Ok(EncounterDifficulty::Hard),
            "deadly" => Ok(EncounterDifficulty::Deadly),
            _ => Err(RoomError::InvalidDifficulty(s.to_string())),
        }
    }
}

impl fmt::Display for EncounterDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EncounterDifficulty::Easy => "easy",
            EncounterDifficulty::Medium => "medium",
            EncounterDifficulty::Hard => "hard",
            EncounterDifficulty::Deadly => "deadly",
        };
        f.write_str(name)
    }
}

/// Per-character XP thresholds, indexed by level - 1, columns easy..deadly.
const XP_THRESHOLDS: [[u32; 4]; 20] = [
    [25, 50, 75, 100],
    [50, 100, 150, 200],
    [75, 150, 225, 400],
    [125, 250, 375, 500],
    [250, 500, 750, 1100],
    [300, 600, 900, 1400],
    [350, 750, 1100, 1700],
    [450, 900, 1400, 2100],
    [550, 1100, 1600, 2400],
    [600, 1200, 1900, 2800],
    [800, 1600, 2400, 3600],
    [1000, 2000, 3000, 4500],
    [1100, 2200, 3400, 5100],
    [1250, 2500, 3800, 5700],
    [1400, 2800, 4300, 6400],
    [1600, 3200, 4800, 7200],
    [2000, 3900, 5900, 8800],
    [2100, 4200, 6300, 9500],
    [2400, 4900, 7300, 10900],
    [2800, 5700, 8500, 12700],
];

/// XP awarded per challenge rating.
const CR_XP: [(f32, u32); 34] = [
    (0.0, 10),
    (0.125, 25),
    (0.25, 50),
    (0.5, 100),
    (1.0, 200),
    (2.0, 450),
    (3.0, 700),
    (4.0, 1100),
    (5.0, 1800),
    (6.0, 2300),
    (7.0, 2900),
    (8.0, 3900),
    (9.0, 5000),
    (10.0, 5900),
    (11.0, 7200),
    (12.0, 8400),
    (13.0, 10000),
    (14.0, 11500),
    (15.0, 13000),
    (16.0, 15000),
    (17.0, 18000),
    (18.0, 20000),
    (19.0, 22000),
    (20.0, 25000),
    (21.0, 33000),
    (22.0, 41000),
    (23.0, 50000),
    (24.0, 62000),
    (25.0, 75000),
    (26.0, 90000),
    (27.0, 105000),
    (28.0, 120000),
    (29.0, 135000),
    (30.0, 155000),
];

/// Gets the per-character XP threshold for a level and difficulty.
///
/// # Examples
///
/// ```
/// use encounter_room::{xp_threshold, EncounterDifficulty};
///
/// assert_eq!(xp_threshold(1, EncounterDifficulty::Easy).unwrap(), 25);
/// assert_eq!(xp_threshold(20, EncounterDifficulty::Deadly).unwrap(), 12700);
/// assert!(xp_threshold(0, EncounterDifficulty::Easy).is_err());
/// ```
pub fn xp_threshold(level: u32, difficulty: EncounterDifficulty) -> RoomResult<u32> {
    if level == 0 || level > MAX_CHARACTER_LEVEL {
        return Err(RoomError::InvalidLevel(level));
    }
    Ok(XP_THRESHOLDS[(level - 1) as usize][difficulty.column()])
}

/// Converts a challenge rating to its XP value.
pub fn cr_to_xp(challenge_rating: f32) -> RoomResult<u32> {
    CR_XP
        .iter()
        .find(|(cr, _)| (cr - challenge_rating).abs() < 1e-3)
        .map(|&(_, xp)| xp)
        .ok_or(RoomError::InvalidChallengeRating(challenge_rating))
}

/// Multiplier applied to raw XP for the number of monsters in an encounter.
pub fn encounter_multiplier(monster_count: u32) -> f64 {
    match monster_count {
        0 | 1 => 1.0,
        2 => 1.5,
        3..=6 => 2.0,
        7..=10 => 2.5,
        11..=14 => 3.0,
        _ => 4.0,
    }
}

/// One adventurer in a party.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyMember {
    pub name: String,
    pub level: u32,
}

impl PartyMember {
    pub fn new(name: impl Into<String>, level: u32) -> Self {
        Self {
            name: name.into(),
            level,
        }
    }
}

/// Ordered list of adventurers facing an encounter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Party {
    pub members: Vec<PartyMember>,
}

impl Party {
    pub fn new(members: Vec<PartyMember>) -> Self {
        Self { members }
    }

    /// Adds a member and returns the party.
    pub fn with_member(mut self, name: impl Into<String>, level: u32) -> Self {
        self.members.push(PartyMember::new(name, level));
        self
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Checks the party is non-empty and every level is covered by the tables.
    pub fn validate(&self) -> RoomResult<()> {
        if self.is_empty() {
            return Err(RoomError::EmptyParty);
        }
        for member in &self.members {
            if member.level == 0 || member.level > MAX_CHARACTER_LEVEL {
                return Err(RoomError::InvalidLevel(member.level));
            }
        }
        Ok(())
    }

    /// Sum of the members' thresholds for a difficulty.
    pub fn xp_budget(&self, difficulty: EncounterDifficulty) -> RoomResult<u32> {
        self.validate()?;
        self.members
            .iter()
            .map(|member| xp_threshold(member.level, difficulty))
            .sum()
    }
}

/// A number of identical monsters in an encounter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterGroup {
    pub key: String,
    /// XP of a single monster
    pub xp: u32,
    pub count: u32,
}

impl MonsterGroup {
    pub fn new(key: impl Into<String>, xp: u32, count: u32) -> Self {
        Self {
            key: key.into(),
            xp,
            count,
        }
    }
}

fn total_count(groups: &[MonsterGroup]) -> u32 {
    groups.iter().fold(0u32, |total, g| total.saturating_add(g.count))
}

/// Raw monster XP scaled by the group-size multiplier.
pub fn adjusted_xp(groups: &[MonsterGroup]) -> u32 {
    let raw: u64 = groups.iter().map(|g| u64::from(g.xp) * u64::from(g.count)).sum();
    let adjusted = raw as f64 * encounter_multiplier(total_count(groups));
    adjusted.min(f64::from(u32::MAX)) as u32
}

/// Adjusts monster counts so the encounter fits the party's budget.
///
/// Counts shrink, one monster at a time from the largest group, while the
/// adjusted XP exceeds the budget or the total exceeds `max_monsters`. They
/// then grow round-robin over the requested groups while the next monster
/// still fits. At least one monster remains if any was requested.
///
/// # Examples
///
/// ```
/// use encounter_room::{balance, EncounterDifficulty, MonsterGroup, Party};
///
/// let party = Party::default().with_member("Aria", 1).with_member("Brom", 1);
/// let groups = vec![MonsterGroup::new("goblin", 50, 10)];
///
/// // Budget is 100 XP: one goblin at x1 fits, two goblins at x1.5 would be 150.
/// let balanced = balance(&party, EncounterDifficulty::Medium, &groups, 20).unwrap();
/// assert_eq!(balanced[0].count, 1);
/// ```
pub fn balance(
    party: &Party,
    difficulty: EncounterDifficulty,
    groups: &[MonsterGroup],
    max_monsters: u32,
) -> RoomResult<Vec<MonsterGroup>> {
    let budget = party.xp_budget(difficulty)?;
    let mut groups = groups.to_vec();
    if total_count(&groups) == 0 {
        return Ok(groups);
    }
    let requested: Vec<bool> = groups.iter().map(|g| g.count > 0).collect();
    let max_monsters = max_monsters.max(1);

    // No group can end above the cap, so start there
    for group in &mut groups {
        group.count = group.count.min(max_monsters);
    }

    while (adjusted_xp(&groups) > budget || total_count(&groups) > max_monsters)
        && total_count(&groups) > 1
    {
        let largest = groups
            .iter()
            .enumerate()
            .filter(|(_, g)| g.count > 0)
            .max_by(|(ia, a), (ib, b)| {
                a.count
                    .cmp(&b.count)
                    .then(a.xp.cmp(&b.xp))
                    .then(ib.cmp(ia))
            })
            .map(|(index, _)| index);
        match largest {
            Some(index) => groups[index].count -= 1,
            None => break,
        }
    }

    loop {
        let mut grew = false;
        for index in 0..groups.len() {
            if !requested[index] || total_count(&groups) >= max_monsters {
                continue;
            }
            groups[index].count += 1;
            if adjusted_xp(&groups) <= budget {
                grew = true;
            } else {
                groups[index].count -= 1;
            }
        }
        if !grew {
            break;
        }
    }

    let adjusted = adjusted_xp(&groups);
    if adjusted > budget {
        warn!(
            "Encounter exceeds {} budget ({} > {}) with a single monster",
            difficulty, adjusted, budget
        );
    }
    debug!(
        "Balanced {} monsters to {} adjusted XP against a {} budget of {}",
        total_count(&groups),
        adjusted,
        difficulty,
        budget
    );
    Ok(groups)
}
