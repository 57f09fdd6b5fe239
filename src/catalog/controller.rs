use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use crate::catalog::{active_filter_count, CatalogItem, FacetCatalog, FilterEngine, FilterState};

/// Receives every published `(state, filtered items)` pair.
pub type Subscriber = Box<dyn FnMut(&FilterState, &[&CatalogItem]) + Send>;

/// A queued user command, as produced by a renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterCommand {
    Toggle { facet_id: String, value: String },
    ClearAll,
    SetQuery(String),
    /// Clears the selections and the query in one step.
    Reset,
}

struct Shared {
    state: FilterState,
    subscribers: Vec<(u64, Subscriber)>,
    next_id: u64,
}

/// Owns the authoritative filter state and publishes results after each command.
///
/// Commands are serialized by a mutex and subscribers are notified before the
/// lock is released, so every notification reflects exactly one completed
/// command. Subscribers must not call any method of this controller from
/// inside their callback; the published arguments are the current state.
pub struct FilterController {
    engine: FilterEngine,
    items: Vec<CatalogItem>,
    shared: Arc<Mutex<Shared>>,
}

impl FilterController {
    pub fn new(engine: FilterEngine, items: Vec<CatalogItem>) -> Self {
        let shared = Shared {
            state: FilterState::new(),
            subscribers: Vec::new(),
            next_id: 0,
        };

        Self {
            engine,
            items,
            shared: Arc::new(Mutex::new(shared)),
        }
    }

    pub fn catalog(&self) -> &FacetCatalog {
        self.engine.catalog()
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    /// Snapshot of the current state.
    pub fn current_state(&self) -> FilterState {
        self.lock().state.clone()
    }

    /// Items matching the current state, computed on demand.
    pub fn filtered_items(&self) -> Vec<&CatalogItem> {
        let state = self.current_state();
        self.engine.apply(&state, &self.items)
    }

    /// Selects or deselects an option. Unknown facets or options are ignored
    /// and nothing is published.
    pub fn toggle_facet_value(&self, facet_id: &str, value: &str) {
        let mut shared = self.lock();

        match shared.state.toggle(self.engine.catalog(), facet_id, value) {
            Ok(selected) => {
                log::debug!("{facet_id}={value} is now {}", if selected { "selected" } else { "deselected" });
                self.publish(&mut shared);
            }

            Err(err) => log::warn!("ignoring toggle: {err}"),
        }
    }

    pub fn clear_all(&self) {
        let mut shared = self.lock();
        shared.state.clear();
        self.publish(&mut shared);
    }

    /// Drops every selection and the query, then publishes once.
    pub fn reset(&self) {
        let mut shared = self.lock();
        shared.state = FilterState::new();
        self.publish(&mut shared);
    }

    pub fn set_query(&self, query: impl Into<String>) {
        let mut shared = self.lock();
        shared.state.set_query(query);
        self.publish(&mut shared);
    }

    pub fn dispatch(&self, command: FilterCommand) {
        match command {
            FilterCommand::Toggle { facet_id, value } => self.toggle_facet_value(&facet_id, &value),
            FilterCommand::ClearAll => self.clear_all(),
            FilterCommand::SetQuery(query) => self.set_query(query),
            FilterCommand::Reset => self.reset(),
        }
    }

    /// Registers a callback invoked after every completed command.
    pub fn subscribe(&self, subscriber: impl FnMut(&FilterState, &[&CatalogItem]) + Send + 'static) -> Subscription {
        let mut shared = self.lock();

        let id = shared.next_id;
        shared.next_id += 1;
        shared.subscribers.push((id, Box::new(subscriber)));

        Subscription {
            id,
            shared: Arc::downgrade(&self.shared),
        }
    }

    fn publish(&self, shared: &mut Shared) {
        let Shared { state, subscribers, .. } = shared;
        let state = &*state;
        let filtered = self.engine.apply(state, &self.items);

        log::debug!(
            "{} of {} items match {} active filters",
            filtered.len(),
            self.items.len(),
            active_filter_count(state),
        );

        for (_, subscriber) in subscribers.iter_mut() {
            subscriber(state, &filtered);
        }
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Handle returned by [`FilterController::subscribe`].
#[must_use = "dropping the handle keeps the callback registered with no way to remove it"]
pub struct Subscription {
    id: u64,
    shared: Weak<Mutex<Shared>>,
}

impl Subscription {
    /// Removes the callback. Does nothing if the controller is gone.
    pub fn unsubscribe(self) {
        if let Some(shared) = self.shared.upgrade() {
            let mut shared = shared.lock().unwrap_or_else(PoisonError::into_inner);
            shared.subscribers.retain(|(id, _)| *id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;
    use std::thread;

    use itertools::Itertools;
    use proptest::prelude::*;

    use super::*;
    use crate::catalog::fixtures::scenario_items;
    use crate::catalog::{BuiltinExercises, ItemSource, DIFFICULTY, EQUIPMENT, MUSCLE};

    type Published = (FilterState, Vec<String>);

    fn controller(items: Vec<CatalogItem>) -> (FilterController, mpsc::Receiver<Published>) {
        let controller = FilterController::new(FilterEngine::default(), items);
        let (tx, rx) = mpsc::channel();

        let _subscription = controller.subscribe(move |state, items| {
            let ids = items.iter().map(|item| item.id.clone()).collect();
            tx.send((state.clone(), ids)).unwrap();
        });

        (controller, rx)
    }

    #[test]
    fn scenario_back_and_bodyweight() {
        let (controller, rx) = controller(scenario_items());

        controller.toggle_facet_value("muscle", "back");
        controller.toggle_facet_value("equipment", "bodyweight");

        let published = rx.try_iter().collect_vec();
        assert_eq!(published.len(), 2);
        assert_eq!(published[1].1, ["2"]);
        assert_eq!(controller.filtered_items().iter().map(|item| &item.id).collect_vec(), ["2"]);
    }

    #[test]
    fn scenario_repeated_toggles_restore_everything() {
        let (controller, rx) = controller(scenario_items());

        for _ in 0..2 {
            controller.toggle_facet_value("muscle", "back");
            controller.toggle_facet_value("equipment", "bodyweight");
        }

        let (state, ids) = rx.try_iter().last().unwrap();
        assert_eq!(state, FilterState::new());
        assert_eq!(ids, ["1", "2", "3"]);
    }

    #[test]
    fn scenario_difficulty_twice_removes_key() {
        let (controller, _rx) = controller(scenario_items());

        controller.toggle_facet_value("difficulty", "beginner");
        controller.toggle_facet_value("difficulty", "beginner");

        assert!(controller.current_state().selected(DIFFICULTY).is_none());
    }

    #[test]
    fn invalid_toggle_is_silent_noop() {
        let (controller, rx) = controller(scenario_items());
        controller.toggle_facet_value(MUSCLE, "chest");
        let before = controller.current_state();

        controller.toggle_facet_value("color", "red");
        controller.toggle_facet_value(EQUIPMENT, "none");

        assert_eq!(rx.try_iter().count(), 1);
        assert_eq!(controller.current_state(), before);
    }

    #[test]
    fn clear_all_restores_full_list() {
        let items = BuiltinExercises.load().unwrap();
        let all_ids = items.iter().map(|item| item.id.clone()).collect_vec();
        let (controller, rx) = controller(items);

        controller.toggle_facet_value(MUSCLE, "arms");
        controller.toggle_facet_value(DIFFICULTY, "advanced");
        controller.clear_all();

        let (state, ids) = rx.try_iter().last().unwrap();
        assert_eq!(state, FilterState::new());
        assert_eq!(ids, all_ids);
    }

    #[test]
    fn query_narrows_and_survives_clear() {
        let (controller, rx) = controller(BuiltinExercises.load().unwrap());

        controller.dispatch(FilterCommand::SetQuery("press".into()));
        assert_eq!(rx.try_recv().unwrap().1, ["1", "4"]);

        controller.dispatch(FilterCommand::Toggle {
            facet_id: MUSCLE.into(),
            value: "chest".into(),
        });
        assert_eq!(rx.try_recv().unwrap().1, ["1"]);

        controller.dispatch(FilterCommand::ClearAll);
        let (state, ids) = rx.try_recv().unwrap();
        assert_eq!(state.query(), "press");
        assert_eq!(ids, ["1", "4"]);
    }

    #[test]
    fn reset_drops_query_and_selections() {
        let (controller, rx) = controller(scenario_items());

        controller.set_query("zzz");
        controller.toggle_facet_value(MUSCLE, "back");
        assert!(rx.try_iter().last().unwrap().1.is_empty());

        controller.dispatch(FilterCommand::Reset);

        let published = rx.try_iter().collect_vec();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].0, FilterState::new());
        assert_eq!(published[0].1, ["1", "2", "3"]);
        assert_eq!(controller.current_state(), FilterState::new());
    }

    #[test]
    fn callback_arguments_match_current_state() {
        let (controller, rx) = controller(scenario_items());

        controller.toggle_facet_value(EQUIPMENT, "bodyweight");
        controller.set_query("pull");

        let (state, ids) = rx.try_iter().last().unwrap();
        assert_eq!(state, controller.current_state());
        assert_eq!(ids, controller.filtered_items().iter().map(|item| item.id.clone()).collect_vec());
        assert_eq!(ids, ["2"]);
    }

    #[test]
    fn unsubscribed_callbacks_are_not_called() {
        let controller = FilterController::new(FilterEngine::default(), scenario_items());
        let (tx, rx) = mpsc::channel();

        let subscription = controller.subscribe(move |_, items| tx.send(items.len()).unwrap());
        controller.toggle_facet_value(MUSCLE, "legs");
        subscription.unsubscribe();
        controller.toggle_facet_value(MUSCLE, "legs");

        assert_eq!(rx.try_iter().collect_vec(), [1]);
    }

    #[test]
    fn concurrent_commands_publish_consistent_pairs() {
        let items = BuiltinExercises.load().unwrap();
        let controller = Arc::new(FilterController::new(FilterEngine::default(), items));
        let (tx, rx) = mpsc::channel();

        let _subscription = controller.subscribe(move |state, items| {
            let ids = items.iter().map(|item| item.id.clone()).collect_vec();
            tx.send((state.clone(), ids)).unwrap();
        });

        let handles = [(MUSCLE, "legs"), (EQUIPMENT, "bodyweight"), (DIFFICULTY, "beginner")]
            .into_iter()
            .map(|(facet, value)| {
                let controller = Arc::clone(&controller);
                thread::spawn(move || {
                    for _ in 0..50 {
                        controller.toggle_facet_value(facet, value);
                    }
                })
            })
            .collect_vec();

        for handle in handles {
            handle.join().unwrap();
        }

        let engine = FilterEngine::default();
        for (state, ids) in rx.try_iter() {
            let expected = engine.apply(&state, controller.items()).iter().map(|item| item.id.clone()).collect_vec();
            assert_eq!(ids, expected);
        }

        assert_eq!(controller.current_state(), FilterState::new());
    }

    proptest! {
        /// Property: clear_all always publishes the empty state and every item in order.
        #[test]
        fn clear_all_is_identity(toggles in prop::collection::vec((0usize..3, 0usize..6), 0..10)) {
            let (controller, rx) = controller(BuiltinExercises.load().unwrap());
            let catalog = controller.catalog().clone();

            for (facet_idx, option_idx) in toggles {
                let facet = &catalog.facets()[facet_idx];
                let option = &facet.options[option_idx % facet.options.len()];
                controller.toggle_facet_value(&facet.id, &option.value);
            }

            controller.clear_all();

            let (state, ids) = rx.try_iter().last().unwrap();
            prop_assert_eq!(state, FilterState::new());
            prop_assert_eq!(ids, ["1", "2", "3", "4", "5", "6"]);
        }

        /// Property: reset publishes the empty state and every item, whatever the query.
        #[test]
        fn reset_is_identity(
            toggles in prop::collection::vec((0usize..3, 0usize..6), 0..10),
            query in "[a-z ]{0,8}"
        ) {
            let (controller, rx) = controller(BuiltinExercises.load().unwrap());
            let catalog = controller.catalog().clone();

            controller.set_query(query);
            for (facet_idx, option_idx) in toggles {
                let facet = &catalog.facets()[facet_idx];
                let option = &facet.options[option_idx % facet.options.len()];
                controller.toggle_facet_value(&facet.id, &option.value);
            }

            controller.reset();

            let (state, ids) = rx.try_iter().last().unwrap();
            prop_assert_eq!(state, FilterState::new());
            prop_assert_eq!(ids, ["1", "2", "3", "4", "5", "6"]);
        }
    }
}
