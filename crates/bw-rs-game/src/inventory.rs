//! Slot inventory and the item-store capability.
//!
//! Mining, placement, and ranged attacks go through the [`ItemStore`]
//! trait so an embedder can substitute its own storage; [`SlotInventory`]
//! is the provided hotbar-plus-backpack implementation.

use tracing::debug;

use bw_rs_world::item_registry::{self, item_id, ItemId};

/// Number of hotbar slots.
pub const HOTBAR_SLOTS: usize = 9;

/// Number of backpack slots.
pub const BACKPACK_SLOTS: usize = 27;

/// Arrows the player starts with.
pub const STARTING_ARROWS: u32 = 12;

/// One inventory slot. `count == 0` means empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ItemStack {
    pub id: ItemId,
    pub count: u8,
}

impl ItemStack {
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Capability contract for item storage.
pub trait ItemStore {
    /// Total units of `id` across all storage.
    fn count(&self, id: ItemId) -> u32;

    /// Remove one unit of `id`. Returns `false` when none is held.
    fn consume_one(&mut self, id: ItemId) -> bool;

    /// Add one unit of `id`, if space allows.
    fn grant_one(&mut self, id: ItemId);
}

/// Hotbar plus backpack storage.
#[derive(Debug, Clone)]
pub struct SlotInventory {
    /// Hotbar: slots 0-8.
    pub hotbar: Vec<ItemStack>,
    /// Backpack: slots 0-26.
    pub backpack: Vec<ItemStack>,
}

impl Default for SlotInventory {
    fn default() -> Self {
        Self::new()
    }
}

impl SlotInventory {
    /// Create an empty inventory.
    pub fn new() -> Self {
        Self {
            hotbar: vec![ItemStack::default(); HOTBAR_SLOTS],
            backpack: vec![ItemStack::default(); BACKPACK_SLOTS],
        }
    }

    /// A fresh player's inventory: one bow and a dozen arrows in the last
    /// two hotbar slots.
    pub fn starting_loadout() -> Self {
        let mut inv = Self::new();
        inv.hotbar[7] = ItemStack {
            id: item_id::BOW,
            count: 1,
        };
        inv.hotbar[8] = ItemStack {
            id: item_id::ARROW,
            count: STARTING_ARROWS as u8,
        };
        inv
    }

    fn slots_mut(&mut self) -> impl Iterator<Item = &mut ItemStack> {
        self.hotbar.iter_mut().chain(self.backpack.iter_mut())
    }

    fn slots(&self) -> impl Iterator<Item = &ItemStack> {
        self.hotbar.iter().chain(self.backpack.iter())
    }
}

impl ItemStore for SlotInventory {
    fn count(&self, id: ItemId) -> u32 {
        self.slots()
            .filter(|s| !s.is_empty() && s.id == id)
            .map(|s| s.count as u32)
            .sum()
    }

    fn consume_one(&mut self, id: ItemId) -> bool {
        // Hotbar first, then backpack.
        for slot in self.slots_mut() {
            if !slot.is_empty() && slot.id == id {
                slot.count -= 1;
                if slot.count == 0 {
                    slot.id = 0;
                }
                return true;
            }
        }
        false
    }

    fn grant_one(&mut self, id: ItemId) {
        if id == 0 {
            return;
        }
        let max_stack = item_registry::item_info(id).max_stack;

        // Top up an existing stack before opening a new slot.
        for slot in self.slots_mut() {
            if !slot.is_empty() && slot.id == id && slot.count < max_stack {
                slot.count += 1;
                return;
            }
        }
        for slot in self.slots_mut() {
            if slot.is_empty() {
                slot.id = id;
                slot.count = 1;
                return;
            }
        }
        debug!(item = id, "inventory full, drop discarded");
    }
}
