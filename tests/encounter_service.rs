//! Integration tests for loading configuration and content from disk and
//! generating populated rooms through the encounter service.

use encounter_room::{
    Catalog, CellType, EncounterConfig, EncounterDifficulty, EncounterRequest, EncounterService,
    LightLevel, Placeable, RoomError, RoomResult,
};
use std::io::Write;
use tempfile::NamedTempFile;

const CATALOG_JSON: &str = r#"{
    "monsters": [
        {"key": "kobold", "name": "Kobold", "challenge_rating": 0.125, "xp": 25, "hit_points": 5, "armor_class": 12},
        {"key": "bugbear", "name": "Bugbear", "challenge_rating": 1, "xp": 200, "hit_points": 27, "armor_class": 16}
    ],
    "items": [
        {"key": "dagger", "name": "Dagger", "category": "weapon", "value": 2, "weight": 1.0},
        {"key": "torch", "name": "Torch", "category": "gear", "value": 1, "weight": 1.0}
    ]
}"#;

const REQUEST_JSON: &str = r#"{
    "room": {"width": 8, "height": 8, "light_level": "Dim", "description": "Kobold warren"},
    "party": [
        {"name": "Aria", "level": 3},
        {"name": "Brom", "level": 3},
        {"name": "Cael", "level": 3}
    ],
    "difficulty": "medium",
    "monsters": [
        {"key": "kobold", "count": 4},
        {"key": "bugbear", "count": 1}
    ],
    "item_count": 3,
    "item_category": "weapon",
    "placements": [
        {"entity": {"kind": "obstacle", "name": "Collapsed pillar"}, "random_place": false, "position": {"x": 4, "y": 4}},
        {"entity": {"kind": "npc", "name": "Captive miner"}, "random_place": true, "position": null}
    ]
}"#;

fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write temp file");
    file
}

#[test]
fn test_generate_from_files() -> RoomResult<()> {
    let config_file = write_temp(r#"{"seed": 2024, "max_monsters": 10}"#);
    let catalog_file = write_temp(CATALOG_JSON);
    let request_file = write_temp(REQUEST_JSON);

    let config = EncounterConfig::load(config_file.path())?;
    assert_eq!(config.seed, 2024);
    assert_eq!(config.max_monsters, 10);

    let catalog = Catalog::load(catalog_file.path())?;
    let request = EncounterRequest::load(request_file.path())?;
    assert_eq!(request.difficulty, EncounterDifficulty::Medium);

    let mut service = EncounterService::new(config, catalog);
    let (room_id, report) = service.generate(&request)?;

    // Three level-3 characters: 3 x 150 = 450 XP budget
    assert_eq!(report.xp_budget, 450);
    assert!(report.adjusted_xp <= report.xp_budget);
    assert!(report.batch.is_complete());

    let room = service.room(room_id)?;
    assert_eq!(room.width(), 8);
    assert_eq!(room.light_level(), LightLevel::Dim);
    assert_eq!(room.description(), "Kobold warren");
    assert_eq!(room.players().len(), 3);
    assert_eq!(room.obstacles().len(), 1);
    assert_eq!(room.npcs().len(), 1);
    assert_eq!(room.items().len(), 3);
    assert!(room.items().iter().all(|item| item.key == "dagger"));

    let monsters: u32 = report.monster_groups.iter().map(|g| g.count).sum();
    assert_eq!(room.monsters().len() as u32, monsters);
    assert!(room.placeables().all(|e| !e.id().is_nil()));
    room.verify_grid_consistency()?;
    Ok(())
}

#[test]
fn test_defeating_generated_monsters() -> RoomResult<()> {
    let catalog = Catalog::from_json_str(CATALOG_JSON)?;
    let request = EncounterRequest::from_json_str(REQUEST_JSON)?;
    let mut service = EncounterService::new(EncounterConfig::new(11), catalog);
    let (room_id, report) = service.generate(&request)?;

    let raw_xp: u32 = report.monster_groups.iter().map(|g| g.xp * g.count).sum();
    let first_monster = service.room(room_id)?.monsters()[0].id;

    let partial = service.defeat_monsters(room_id, &[first_monster])?;
    assert_eq!(partial.cleanup.removed, vec![first_monster]);

    let rest = service.defeat_monsters(room_id, &[])?;
    assert_eq!(partial.cleanup.total_xp + rest.cleanup.total_xp, raw_xp);
    assert_eq!(rest.xp_per_player, rest.cleanup.total_xp / 3);

    let room = service.room(room_id)?;
    assert!(room.monsters().is_empty());
    assert_eq!(room.count_of(CellType::Player), 3);
    room.verify_grid_consistency()?;
    Ok(())
}

#[test]
fn test_bad_inputs_surface_errors() {
    let missing = std::path::Path::new("/definitely/not/here.json");
    assert!(matches!(EncounterConfig::load(missing), Err(RoomError::Io(_))));

    let broken = write_temp("{ not json");
    assert!(matches!(Catalog::load(broken.path()), Err(RoomError::Serde(_))));

    let bad_difficulty = REQUEST_JSON.replace("\"medium\"", "\"legendary\"");
    assert!(matches!(
        EncounterRequest::from_json_str(&bad_difficulty),
        Err(RoomError::Serde(_))
    ));
}
