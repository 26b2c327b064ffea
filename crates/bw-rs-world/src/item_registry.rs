//! Item property table: stack limits and tile placement mapping.
//!
//! Item codes 1-9 are block items that place as the matching tile; codes
//! 10+ are tools and ammunition.

use crate::tile_registry::TileId;

/// Numeric item code held in inventory slots.
pub type ItemId = u8;

/// Well-known item codes.
pub mod item_id {
    use super::ItemId;

    pub const BOW: ItemId = 10;
    pub const ARROW: ItemId = 11;
}

/// Properties for a single item type.
#[derive(Debug, Clone)]
pub struct ItemInfo {
    /// Display name, e.g. `"Arrow"`.
    pub name: &'static str,
    /// Maximum stack size in one inventory slot.
    pub max_stack: u8,
    /// The tile this item places as, if it is a block item.
    pub placeable_as: Option<TileId>,
}

/// Look up item info by code. Unknown codes are unstackable and
/// unplaceable.
pub fn item_info(id: ItemId) -> ItemInfo {
    match id {
        1..=9 => {
            let tile = crate::tile_registry::tile_info(id);
            ItemInfo {
                name: tile.name,
                max_stack: 64,
                placeable_as: Some(id),
            }
        }
        item_id::BOW => ItemInfo {
            name: "Bow",
            max_stack: 1,
            placeable_as: None,
        },
        item_id::ARROW => ItemInfo {
            name: "Arrow",
            max_stack: 64,
            placeable_as: None,
        },
        _ => ItemInfo {
            name: "Unknown",
            max_stack: 1,
            placeable_as: None,
        },
    }
}

/// The tile an item places as, if any.
pub fn placeable_as(id: ItemId) -> Option<TileId> {
    item_info(id).placeable_as
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile_registry::tile_id;

    #[test]
    fn stone_item_places_stone() {
        assert_eq!(placeable_as(tile_id::STONE), Some(tile_id::STONE));
    }

    #[test]
    fn block_items_named_after_tile() {
        assert_eq!(item_info(tile_id::DIRT).name, "Dirt");
        assert_eq!(item_info(tile_id::SAND).name, "Sand");
    }

    #[test]
    fn bow_not_placeable() {
        assert!(placeable_as(item_id::BOW).is_none());
        assert_eq!(item_info(item_id::BOW).max_stack, 1);
    }

    #[test]
    fn arrows_stack() {
        let info = item_info(item_id::ARROW);
        assert_eq!(info.name, "Arrow");
        assert_eq!(info.max_stack, 64);
        assert!(info.placeable_as.is_none());
    }

    #[test]
    fn unknown_item() {
        let info = item_info(250);
        assert_eq!(info.name, "Unknown");
        assert!(info.placeable_as.is_none());
    }
}
