//! Quest progression.
//!
//! A started quest sits at a stage index. Reporting a fact (item, location,
//! defeat) advances every active quest whose *current* stage requires exactly
//! that fact. Stages without a requirement never auto-advance.

use bevy::prelude::*;

use super::{GameEvent, GameStore};
use crate::shared::*;

impl GameStore {
    pub fn quest_progress(&self, id: &str) -> Option<&QuestProgress> {
        self.quests.iter().find(|p| p.id == id)
    }

    pub fn quests(&self) -> &[QuestProgress] {
        &self.quests
    }

    /// No-op if the quest already has progress.
    pub fn start_quest(&mut self, id: &str) {
        if self.quest_progress(id).is_some() {
            return;
        }
        let progress = QuestProgress {
            id: id.to_string(),
            stage_index: 0,
            completed: false,
        };
        info!("Quests: started '{}'", id);
        self.quests.push(progress.clone());
        self.emit(GameEvent::QuestUpdated(progress));
    }

    /// No-op for unknown, unstarted or completed quests.
    pub fn advance_quest(&mut self, id: &str) {
        let Some(stage_count) = self.content.quest(id).map(|q| q.stages.len()) else {
            debug!("Quests: cannot advance unknown quest '{}'", id);
            return;
        };
        let Some(progress) = self.quests.iter_mut().find(|p| p.id == id) else {
            return;
        };
        if progress.completed {
            return;
        }
        progress.stage_index += 1;
        if progress.stage_index >= stage_count {
            progress.completed = true;
        }
        let snapshot = progress.clone();
        if snapshot.completed {
            info!("Quests: completed '{}'", id);
        } else {
            info!("Quests: '{}' advanced to stage {}", id, snapshot.stage_index);
        }
        self.emit(GameEvent::QuestUpdated(snapshot));
    }

    /// Advance every active quest whose current stage requires `requirement`.
    pub fn check_quest_requirements(&mut self, requirement: &Requirement) {
        let matching: Vec<String> = self
            .quests
            .iter()
            .filter(|progress| !progress.completed)
            .filter(|progress| {
                self.content
                    .quest(&progress.id)
                    .and_then(|quest| quest.stages.get(progress.stage_index))
                    .and_then(|stage| stage.requirement.as_ref())
                    .is_some_and(|required| required == requirement)
            })
            .map(|progress| progress.id.clone())
            .collect();

        for id in matching {
            self.advance_quest(&id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{record, test_store};
    use super::*;
    use crate::store::GameEventKind;

    fn quest_events(log: &[GameEvent]) -> Vec<QuestProgress> {
        log.iter()
            .filter_map(|e| match e {
                GameEvent::QuestUpdated(p) => Some(p.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_entering_village_advances_meet_elder() {
        let mut store = test_store();
        let log = record(&mut store);
        store.start_quest("meet-elder");
        store.set_zone("village", None);

        let events = quest_events(&log.lock().unwrap());
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].stage_index, 1);
        assert!(!events[1].completed);
    }

    #[test]
    fn test_start_quest_twice_keeps_stage() {
        let mut store = test_store();
        store.start_quest("meet-elder");
        store.set_zone("village", None);
        store.start_quest("meet-elder");
        assert_eq!(store.quest_progress("meet-elder").map(|p| p.stage_index), Some(1));
        assert_eq!(store.quests().len(), 1);
    }

    #[test]
    fn test_restart_at_stage_zero_is_silent() {
        let mut store = test_store();
        store.start_quest("hunt");
        let log = record(&mut store);
        store.start_quest("hunt");
        assert!(log.lock().unwrap().is_empty());
        assert_eq!(store.quest_progress("hunt").map(|p| p.stage_index), Some(0));
    }

    #[test]
    fn test_requirement_must_match_current_stage() {
        let mut store = test_store();
        store.start_quest("meet-elder");
        // Stage 1 wants the rune, but stage 0 is still current.
        store.check_quest_requirements(&Requirement::item("ancient-rune"));
        assert_eq!(store.quest_progress("meet-elder").map(|p| p.stage_index), Some(0));
        // Wrong kind, right value.
        store.check_quest_requirements(&Requirement::item("village"));
        assert_eq!(store.quest_progress("meet-elder").map(|p| p.stage_index), Some(0));
    }

    #[test]
    fn test_one_fact_can_advance_several_quests() {
        let mut store = test_store();
        store.start_quest("meet-elder");
        store.set_zone("village", None);
        store.start_quest("gather");
        let log = record(&mut store);

        store.check_quest_requirements(&Requirement::item("ancient-rune"));

        let events = quest_events(&log.lock().unwrap());
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|p| p.completed));
    }

    #[test]
    fn test_advance_only_one_stage_per_fact() {
        let mut store = test_store();
        store.start_quest("hunt");
        store.defeat_enemy("wraith");
        // Stage 1 has no requirement: the quest parks there.
        store.defeat_enemy("wraith");
        let progress = store.quest_progress("hunt").cloned();
        assert_eq!(progress.map(|p| (p.stage_index, p.completed)), Some((1, false)));
    }

    #[test]
    fn test_stage_index_never_exceeds_stage_count() {
        let mut store = test_store();
        store.start_quest("gather");
        for _ in 0..5 {
            store.advance_quest("gather");
        }
        let progress = store.quest_progress("gather").cloned().expect("started");
        assert_eq!(progress.stage_index, 1);
        assert!(progress.completed);
    }

    #[test]
    fn test_advance_unknown_or_unstarted_is_noop() {
        let mut store = test_store();
        let log = record(&mut store);
        store.advance_quest("no-such-quest");
        store.advance_quest("hunt");
        assert!(log.lock().unwrap().iter().all(|e| e.kind() != GameEventKind::QuestUpdated));
        assert!(store.quest_progress("hunt").is_none());
    }

    #[test]
    fn test_completed_quest_ignores_further_facts() {
        let mut store = test_store();
        store.start_quest("gather");
        store.add_item(InventoryItem {
            id: "ancient-rune".into(),
            name: "Ancient Rune".into(),
            description: String::new(),
        });
        let log = record(&mut store);
        store.check_quest_requirements(&Requirement::item("ancient-rune"));
        assert!(log.lock().unwrap().is_empty());
    }
}
