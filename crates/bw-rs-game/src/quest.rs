//! Quest definitions and completion tracking.
//!
//! The quest table ships as embedded JSON. Evaluation is idempotent:
//! a quest completes exactly once, on the first frame its counter meets
//! the target.

use serde::Deserialize;
use tracing::debug;

use bw_rs_world::item_registry::item_id;

use crate::game_world::{GameEvent, PlayerProgress};
use crate::inventory::ItemStore;

/// Canonical quest list.
const QUEST_LIST_JSON: &str = include_str!("../data/quests.json");

/// Which progress counter a quest tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestKind {
    /// Total mobs slain.
    Kill,
    /// Stone blocks mined.
    Mine,
    /// Highest parkour tier reached.
    Parkour,
    /// Mobs slain by arrow.
    Bow,
}

/// A single entry from the quest list JSON.
#[derive(Debug, Clone, Deserialize)]
pub struct QuestDefinition {
    pub id: String,
    pub label: String,
    pub kind: QuestKind,
    pub target: u32,
    pub xp_reward: u32,
    pub arrow_reward: u32,
}

/// A quest plus its completion flag.
#[derive(Debug, Clone)]
pub struct QuestState {
    pub def: QuestDefinition,
    pub done: bool,
}

/// All quests for one play session.
#[derive(Debug, Clone)]
pub struct QuestLog {
    quests: Vec<QuestState>,
}

impl Default for QuestLog {
    fn default() -> Self {
        Self::from_embedded()
    }
}

impl QuestLog {
    /// Build the log from the embedded quest list.
    pub fn from_embedded() -> Self {
        let defs: Vec<QuestDefinition> =
            serde_json::from_str(QUEST_LIST_JSON).expect("invalid quests.json");
        Self::from_definitions(defs)
    }

    /// Build the log from caller-supplied definitions.
    pub fn from_definitions(defs: Vec<QuestDefinition>) -> Self {
        Self {
            quests: defs
                .into_iter()
                .map(|def| QuestState { def, done: false })
                .collect(),
        }
    }

    /// All quests with their completion state.
    pub fn quests(&self) -> &[QuestState] {
        &self.quests
    }

    /// Mark every not-yet-done quest whose counter meets its target as
    /// done, granting its rewards. Already-done quests are skipped, so
    /// repeated evaluation grants nothing twice.
    pub fn evaluate(
        &mut self,
        progress: &mut PlayerProgress,
        store: &mut dyn ItemStore,
        events: &mut Vec<GameEvent>,
    ) {
        for quest in self.quests.iter_mut().filter(|q| !q.done) {
            let value = match quest.def.kind {
                QuestKind::Kill => progress.kills,
                QuestKind::Mine => progress.mines,
                QuestKind::Parkour => progress.max_parkour_tier,
                QuestKind::Bow => progress.bow_kills,
            };
            if value < quest.def.target {
                continue;
            }
            quest.done = true;
            progress.xp += quest.def.xp_reward;
            for _ in 0..quest.def.arrow_reward {
                store.grant_one(item_id::ARROW);
            }
            debug!(id = %quest.def.id, "quest completed");
            events.push(GameEvent::QuestCompleted {
                id: quest.def.id.clone(),
                xp_reward: quest.def.xp_reward,
            });
            events.push(GameEvent::Message(format!(
                "Quest done: {} (+{} XP)",
                quest.def.label, quest.def.xp_reward
            )));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::SlotInventory;

    #[test]
    fn embedded_list_has_six_quests() {
        let log = QuestLog::from_embedded();
        assert_eq!(log.quests().len(), 6);
    }

    #[test]
    fn embedded_list_covers_every_kind() {
        let log = QuestLog::from_embedded();
        for kind in [
            QuestKind::Kill,
            QuestKind::Mine,
            QuestKind::Parkour,
            QuestKind::Bow,
        ] {
            assert!(log.quests().iter().any(|q| q.def.kind == kind));
        }
    }

    #[test]
    fn completion_grants_rewards_once() {
        let mut log = QuestLog::from_embedded();
        let mut progress = PlayerProgress {
            kills: 1,
            ..Default::default()
        };
        let mut inv = SlotInventory::new();
        let mut events = Vec::new();

        log.evaluate(&mut progress, &mut inv, &mut events);
        assert_eq!(progress.xp, 20);
        assert_eq!(inv.count(item_id::ARROW), 5);
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::QuestCompleted { id, .. } if id == "first_blood")));

        // Re-evaluating with unchanged counters grants nothing more.
        events.clear();
        log.evaluate(&mut progress, &mut inv, &mut events);
        assert_eq!(progress.xp, 20);
        assert_eq!(inv.count(item_id::ARROW), 5);
        assert!(events.is_empty());
    }

    #[test]
    fn below_target_stays_open() {
        let mut log = QuestLog::from_embedded();
        let mut progress = PlayerProgress {
            mines: 9,
            ..Default::default()
        };
        let mut inv = SlotInventory::new();
        let mut events = Vec::new();

        log.evaluate(&mut progress, &mut inv, &mut events);
        let miner = log.quests().iter().find(|q| q.def.id == "miner").unwrap();
        assert!(!miner.done);
        assert_eq!(progress.xp, 0);
    }

    #[test]
    fn several_quests_can_complete_in_one_pass() {
        let mut log = QuestLog::from_embedded();
        let mut progress = PlayerProgress {
            kills: 10,
            ..Default::default()
        };
        let mut inv = SlotInventory::new();
        let mut events = Vec::new();

        log.evaluate(&mut progress, &mut inv, &mut events);
        // "first_blood" (1 kill) and "hunter" (10 kills) both finish.
        assert_eq!(progress.xp, 70);
        assert_eq!(inv.count(item_id::ARROW), 15);
    }
}
