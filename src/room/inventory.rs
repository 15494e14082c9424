//! # NPC Inventory
//!
//! Items carried by NPCs. Inventory items live only inside their NPC and are
//! never written to the room grid.

use super::{new_entity_id, EntityId, Item, Npc, Room};
use crate::{RoomError, RoomResult};
use log::debug;

impl Room {
    fn npc_mut(&mut self, npc_id: EntityId) -> RoomResult<&mut Npc> {
        self.npcs
            .iter_mut()
            .find(|npc| npc.id == npc_id)
            .ok_or(RoomError::EntityNotFound(npc_id))
    }

    /// Gets the items carried by an NPC.
    pub fn npc_inventory(&self, npc_id: EntityId) -> RoomResult<&[Item]> {
        self.npcs
            .iter()
            .find(|npc| npc.id == npc_id)
            .map(|npc| npc.inventory.as_slice())
            .ok_or(RoomError::EntityNotFound(npc_id))
    }

    /// Gives an item to an NPC, minting an id if the item has none.
    ///
    /// Fails with `DuplicateEntity` when the id is already used anywhere in
    /// the room, including the NPC itself and every inventory.
    pub fn add_item_to_npc_inventory(
        &mut self,
        npc_id: EntityId,
        mut item: Item,
    ) -> RoomResult<EntityId> {
        self.npc_inventory(npc_id)?;
        if item.id.is_nil() {
            item.id = new_entity_id();
        }
        let item_id = item.id;
        if self.contains_id(item_id) {
            return Err(RoomError::DuplicateEntity(item_id));
        }

        let npc = self.npc_mut(npc_id)?;
        debug!("NPC {} receives item {} '{}'", npc_id, item_id, item.name);
        npc.inventory.push(item);
        Ok(item_id)
    }

    /// Takes an item away from an NPC.
    pub fn remove_item_from_npc_inventory(
        &mut self,
        npc_id: EntityId,
        item_id: EntityId,
    ) -> RoomResult<Item> {
        let npc = self.npc_mut(npc_id)?;
        let index = npc
            .inventory
            .iter()
            .position(|item| item.id == item_id)
            .ok_or(RoomError::ItemNotInInventory {
                npc: npc_id,
                item: item_id,
            })?;
        debug!("NPC {} drops item {}", npc_id, item_id);
        Ok(npc.inventory.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LightLevel, Position};
    use uuid::Uuid;

    fn room_with_npc() -> (Room, EntityId) {
        let mut room = Room::new(5, 5, LightLevel::Bright, true).unwrap();
        let id = room
            .place_entity(Npc::new("merchant", "Merchant").at(Position::new(2, 2)))
            .unwrap();
        (room, id)
    }

    #[test]
    fn test_add_and_list_inventory() {
        let (mut room, npc) = room_with_npc();
        let potion = Item::new("potion", "Potion of Healing", "potion");
        let potion_id = potion.id;

        assert_eq!(room.add_item_to_npc_inventory(npc, potion).unwrap(), potion_id);
        let inventory = room.npc_inventory(npc).unwrap();
        assert_eq!(inventory.len(), 1);
        assert_eq!(inventory[0].name, "Potion of Healing");
    }

    #[test]
    fn test_add_assigns_missing_id() {
        let (mut room, npc) = room_with_npc();
        let mut scroll = Item::new("scroll", "Scroll", "scroll");
        scroll.id = Uuid::nil();

        let id = room.add_item_to_npc_inventory(npc, scroll).unwrap();
        assert!(!id.is_nil());
        assert_eq!(room.npc_inventory(npc).unwrap()[0].id, id);
    }

    #[test]
    fn test_inventory_does_not_touch_grid() {
        let (mut room, npc) = room_with_npc();
        let rope = Item::new("rope", "Rope", "gear").at(Position::new(0, 0));
        room.add_item_to_npc_inventory(npc, rope).unwrap();

        assert!(room.items().is_empty());
        assert!(room.cell(Position::new(0, 0)).unwrap().is_empty());
        assert_eq!(room.grid().unwrap().occupied_count(), 1);
        room.verify_grid_consistency().unwrap();
    }

    #[test]
    fn test_remove_item() {
        let (mut room, npc) = room_with_npc();
        let first = room
            .add_item_to_npc_inventory(npc, Item::new("a", "A", "gear"))
            .unwrap();
        let second = room
            .add_item_to_npc_inventory(npc, Item::new("b", "B", "gear"))
            .unwrap();

        let removed = room.remove_item_from_npc_inventory(npc, first).unwrap();
        assert_eq!(removed.id, first);
        let remaining: Vec<_> = room.npc_inventory(npc).unwrap().iter().map(|i| i.id).collect();
        assert_eq!(remaining, vec![second]);
    }

    #[test]
    fn test_inventory_errors() {
        let (mut room, npc) = room_with_npc();
        let stranger = new_entity_id();

        assert!(matches!(
            room.npc_inventory(stranger),
            Err(RoomError::EntityNotFound(id)) if id == stranger
        ));
        assert!(matches!(
            room.add_item_to_npc_inventory(stranger, Item::new("a", "A", "gear")),
            Err(RoomError::EntityNotFound(_))
        ));
        assert!(matches!(
            room.remove_item_from_npc_inventory(npc, new_entity_id()),
            Err(RoomError::ItemNotInInventory { .. })
        ));
        assert!(matches!(
            room.remove_item_from_npc_inventory(stranger, new_entity_id()),
            Err(RoomError::EntityNotFound(_))
        ));
    }

    #[test]
    fn test_add_rejects_ids_already_in_room() {
        let (mut room, npc) = room_with_npc();
        let coin = Item::new("coin", "Gold Coin", "treasure").at(Position::new(3, 3));
        let coin_id = room.place_entity(coin.clone()).unwrap();

        // Same id as an item lying on the grid
        assert!(matches!(
            room.add_item_to_npc_inventory(npc, coin),
            Err(RoomError::DuplicateEntity(id)) if id == coin_id
        ));

        // Same id as the NPC itself
        let mut impostor = Item::new("mask", "Mask", "gear");
        impostor.id = npc;
        assert!(matches!(
            room.add_item_to_npc_inventory(npc, impostor),
            Err(RoomError::DuplicateEntity(id)) if id == npc
        ));

        // Same item handed over twice
        let gem = Item::new("gem", "Gem", "treasure");
        room.add_item_to_npc_inventory(npc, gem.clone()).unwrap();
        assert!(matches!(
            room.add_item_to_npc_inventory(npc, gem),
            Err(RoomError::DuplicateEntity(_))
        ));

        assert_eq!(room.npc_inventory(npc).unwrap().len(), 1);
        assert_eq!(room.items().len(), 1);
    }

    #[test]
    fn test_place_rejects_ids_carried_by_npcs() {
        let (mut room, npc) = room_with_npc();
        let gem = Item::new("gem", "Gem", "treasure").at(Position::new(0, 0));
        room.add_item_to_npc_inventory(npc, gem.clone()).unwrap();

        assert!(matches!(room.place_entity(gem), Err(RoomError::DuplicateEntity(_))));
        assert!(room.cell(Position::new(0, 0)).unwrap().is_empty());

        // A second NPC may not arrive carrying an id the room already uses
        let mut courier = Npc::new("courier", "Courier").at(Position::new(4, 4));
        courier.inventory.push(Item::new("letter", "Letter", "gear"));
        let mut stolen = Item::new("ring", "Ring", "treasure");
        stolen.id = npc;
        courier.inventory.push(stolen);
        assert!(matches!(
            room.place_entity(courier),
            Err(RoomError::DuplicateEntity(id)) if id == npc
        ));
        assert_eq!(room.npcs().len(), 1);
        room.verify_grid_consistency().unwrap();
    }
}
