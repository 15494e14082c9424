//! # Content Sources
//!
//! Lookup of monster and item content by key. The encounter service depends
//! only on the traits here; `Catalog` is the in-memory implementation backed
//! by a JSON document.
//!
//! Every value handed out is a fresh entity with its own id, so the same
//! catalog entry can be placed any number of times.

use super::balancer::cr_to_xp;
use crate::{new_entity_id, Item, Monster, RoomError, RoomResult};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Source of monster content.
pub trait MonsterSource {
    /// Gets a fresh monster built from the entry for `key`.
    fn monster_by_key(&self, key: &str) -> RoomResult<Monster>;

    /// Gets the XP value of the monster entry for `key`.
    fn monster_xp(&self, key: &str) -> RoomResult<u32> {
        self.monster_by_key(key).map(|monster| monster.xp)
    }
}

/// Source of item content.
pub trait ItemSource {
    /// Gets a fresh item built from the entry for `key`.
    fn item_by_key(&self, key: &str) -> RoomResult<Item>;

    /// Draws `count` items, with replacement.
    fn random_items(&self, count: usize, rng: &mut StdRng) -> RoomResult<Vec<Item>>;

    /// Draws `count` items of one category, with replacement.
    fn random_items_by_category(
        &self,
        category: &str,
        count: usize,
        rng: &mut StdRng,
    ) -> RoomResult<Vec<Item>>;
}

/// In-memory monster and item content.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub monsters: Vec<Monster>,
    #[serde(default)]
    pub items: Vec<Item>,
}

impl Catalog {
    pub fn new(monsters: Vec<Monster>, items: Vec<Item>) -> Self {
        Self { monsters, items }
    }

    /// Parses a catalog from JSON.
    ///
    /// Monster entries that omit `xp` take it from their challenge rating;
    /// an unknown rating fails with `InvalidChallengeRating`.
    ///
    /// # Examples
    ///
    /// ```
    /// use encounter_room::{Catalog, MonsterSource};
    ///
    /// let catalog = Catalog::from_json_str(
    ///     r#"{"monsters": [{"key": "goblin", "name": "Goblin", "challenge_rating": 0.25, "xp": 50}]}"#,
    /// ).unwrap();
    /// assert_eq!(catalog.monster_xp("goblin").unwrap(), 50);
    /// ```
    pub fn from_json_str(json: &str) -> RoomResult<Self> {
        let mut catalog: Self = serde_json::from_str(json)?;
        for monster in catalog.monsters.iter_mut().filter(|m| m.xp == 0) {
            monster.xp = cr_to_xp(monster.challenge_rating)?;
        }
        Ok(catalog)
    }

    /// Loads a catalog from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> RoomResult<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let catalog = Self::from_json_str(&contents)?;
        log::info!(
            "Loaded catalog from {} ({} monsters, {} items)",
            path.as_ref().display(),
            catalog.monsters.len(),
            catalog.items.len()
        );
        Ok(catalog)
    }

    /// A small built-in catalog for demos and tests.
    pub fn starter() -> Self {
        let mut goblin = Monster::new("goblin", "Goblin", 0.25, 50);
        goblin.hit_points = 7;
        goblin.armor_class = 15;
        let mut orc = Monster::new("orc", "Orc", 0.5, 100);
        orc.hit_points = 15;
        orc.armor_class = 13;
        let mut ogre = Monster::new("ogre", "Ogre", 2.0, 450);
        ogre.hit_points = 59;
        ogre.armor_class = 11;

        let mut potion = Item::new("potion-of-healing", "Potion of Healing", "potion");
        potion.value = 50;
        potion.weight = 0.5;
        let mut longsword = Item::new("longsword", "Longsword", "weapon");
        longsword.value = 15;
        longsword.weight = 3.0;
        let mut rope = Item::new("hempen-rope", "Hempen Rope (50 feet)", "gear");
        rope.value = 1;
        rope.weight = 10.0;

        Self::new(vec![goblin, orc, ogre], vec![potion, longsword, rope])
    }
}

fn fresh_item(item: &Item) -> Item {
    Item {
        id: new_entity_id(),
        ..item.clone()
    }
}

fn draw(pool: &[&Item], count: usize, rng: &mut StdRng) -> Vec<Item> {
    (0..count)
        .filter_map(|_| pool.choose(rng).map(|item| fresh_item(item)))
        .collect()
}

impl MonsterSource for Catalog {
    fn monster_by_key(&self, key: &str) -> RoomResult<Monster> {
        self.monsters
            .iter()
            .find(|monster| monster.key == key)
            .map(|monster| Monster {
                id: new_entity_id(),
                ..monster.clone()
            })
            .ok_or_else(|| RoomError::ContentNotFound(format!("monster '{}'", key)))
    }
}

impl ItemSource for Catalog {
    fn item_by_key(&self, key: &str) -> RoomResult<Item> {
        self.items
            .iter()
            .find(|item| item.key == key)
            .map(fresh_item)
            .ok_or_else(|| RoomError::ContentNotFound(format!("item '{}'", key)))
    }

    fn random_items(&self, count: usize, rng: &mut StdRng) -> RoomResult<Vec<Item>> {
        if count == 0 {
            return Ok(Vec::new());
        }
        let pool: Vec<&Item> = self.items.iter().collect();
        if pool.is_empty() {
            return Err(RoomError::ContentNotFound("any item".to_string()));
        }
        Ok(draw(&pool, count, rng))
    }

    fn random_items_by_category(
        &self,
        category: &str,
        count: usize,
        rng: &mut StdRng,
    ) -> RoomResult<Vec<Item>> {
        if count == 0 {
            return Ok(Vec::new());
        }
        let pool: Vec<&Item> = self
            .items
            .iter()
            .filter(|item| item.category.eq_ignore_ascii_case(category))
            .collect();
        if pool.is_empty() {
            return Err(RoomError::ContentNotFound(format!("items in category '{}'", category)));
        }
        Ok(draw(&pool, count, rng))
    }
}
