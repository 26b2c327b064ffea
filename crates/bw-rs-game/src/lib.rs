//! Simulation core: ECS entities, mob AI, combat, projectiles, mining,
//! inventory, quests, and the per-frame `GameWorld` orchestrator.

pub mod ai;
pub mod combat;
pub mod components;
pub mod game_world;
pub mod input;
pub mod inventory;
pub mod mining;
pub mod mob_registry;
pub mod parkour;
pub mod player;
pub mod projectile;
pub mod quest;
