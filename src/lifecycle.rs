//! Widget lifecycle controller
//!
//! Owns the ordered widget collection and the panel registry. Every editor,
//! tray and shell action goes through here so the collection, the live panels
//! and the stored file change in a consistent order.
//!
//! A widget's index is its identity while the process runs. Removing an entry
//! shifts every later index down by one; the registry is not touched by
//! removal, so a panel launched for the removed entry keeps running until the
//! next bulk stop.

use tracing::{error, info, warn};

use crate::config::{ConfigStore, WidgetConfig, WidgetDraft};
use crate::constants::messages;
use crate::error::{WidgetError, WidgetResult};
use crate::panel::{PanelFactory, PanelRegistry};
use crate::pin::PinCoordinator;

/// User-visible, fire-and-forget messages
pub trait Notifier {
    /// Confirmation of a completed action
    fn notify(&mut self, title: &str, message: &str);

    /// A failed action the user has to know about
    fn alert(&mut self, title: &str, message: &str);
}

/// The process hosting the settings surface
pub trait HostShell {
    /// Move the settings surface to the background (tray)
    fn withdraw(&mut self);

    /// End the process once the current action returns
    fn terminate(&mut self);
}

pub struct LifecycleController<S, F, N, H> {
    widgets: Vec<WidgetConfig>,
    registry: PanelRegistry,
    pins: PinCoordinator,
    store: S,
    factory: F,
    notifier: N,
    host: H,
}

impl<S, F, N, H> LifecycleController<S, F, N, H>
where
    S: ConfigStore,
    F: PanelFactory,
    N: Notifier,
    H: HostShell,
{
    /// Load the stored collection, seeding one default widget when it is empty
    pub fn open(store: S, factory: F, notifier: N, host: H) -> Self {
        let widgets = store.load();
        let mut controller = Self {
            widgets,
            registry: PanelRegistry::new(),
            pins: PinCoordinator::default(),
            store,
            factory,
            notifier,
            host,
        };
        if controller.widgets.is_empty() {
            // Not saved yet: an unreadable file stays on disk until the next structural change
            let name = WidgetConfig::sequential_name(0);
            info!(name = %name, "Starting with a default widget");
            controller.widgets.push(WidgetConfig::default_with_name(name));
        }
        controller
    }

    pub fn widgets(&self) -> &[WidgetConfig] {
        &self.widgets
    }

    pub fn widget(&self, index: usize) -> Option<&WidgetConfig> {
        self.widgets.get(index)
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn global_pin(&self) -> bool {
        self.pins.global_pin()
    }

    pub fn live_panel_count(&self) -> usize {
        self.registry.live_count()
    }

    pub fn is_live(&self, index: usize) -> bool {
        self.registry.is_live(index)
    }

    fn check_index(&self, index: usize) -> WidgetResult<()> {
        if index < self.widgets.len() {
            Ok(())
        } else {
            Err(WidgetError::OutOfRange {
                index,
                len: self.widgets.len(),
            })
        }
    }

    /// Write the full collection; failures are reported and returned
    fn persist(&mut self) -> WidgetResult<()> {
        self.store.save(&self.widgets).map_err(|e| {
            error!(error = ?e, "Failed to save widget config");
            let err = WidgetError::PersistenceFailure(format!("{e:#}"));
            self.notifier.alert(messages::SAVE_FAILED, &err.to_string());
            err
        })
    }

    /// Append a default widget named after the current count; returns its index
    pub fn add_widget(&mut self) -> usize {
        let name = WidgetConfig::sequential_name(self.widgets.len());
        info!(name = %name, "Adding widget");
        self.widgets.push(WidgetConfig::default_with_name(name));
        // A failed save is already reported; the widget still exists in memory
        let _ = self.persist();
        self.widgets.len() - 1
    }

    /// Remove the entry at `index`. A live panel for it is left running.
    pub fn remove_widget(&mut self, index: usize) -> WidgetResult<WidgetConfig> {
        self.check_index(index)
            .inspect_err(|e| warn!(error = %e, "Refusing to remove widget"))?;
        let removed = self.widgets.remove(index);
        info!(index, name = %removed.name, live = self.registry.is_live(index), "Removed widget");
        let _ = self.persist();
        Ok(removed)
    }

    pub fn rename_widget(&mut self, index: usize, new_name: &str) -> WidgetResult<()> {
        self.check_index(index)
            .inspect_err(|e| warn!(error = %e, "Refusing to rename widget"))?;
        let widget = &mut self.widgets[index];
        info!(index, old = %widget.name, new = %new_name, "Renaming widget");
        widget.name = new_name.to_string();
        self.persist()
    }

    /// Commit `draft` at `index`, keeping the stored name.
    ///
    /// Only the pin flag reaches a live panel; the other fields take effect on
    /// the next launch.
    pub fn apply_settings(&mut self, index: usize, draft: WidgetDraft) -> WidgetResult<()> {
        if let Err(e) = self.check_index(index).and_then(|()| draft.validate()) {
            warn!(index, error = %e, "Rejected widget settings");
            self.notifier.alert(messages::INPUT_ERROR, &e.to_string());
            return Err(e);
        }

        let name = self.widgets[index].name.clone();
        let committed = draft.into_config(name);
        let pinned = committed.pinned;
        self.widgets[index] = committed;

        if let Some(panel) = self.registry.get_mut(index) {
            panel.set_pinned(pinned);
            panel.restack();
        }

        info!(index, pinned, "Applied widget settings");
        self.notifier.notify(
            messages::SETTINGS_SAVED,
            &format!("Widget {} settings updated", index + 1),
        );
        Ok(())
    }

    /// Persist, stop every panel, then build one panel per widget in order.
    ///
    /// The first construction failure aborts the batch; panels created before
    /// it stay registered.
    pub fn launch_all(&mut self) -> WidgetResult<usize> {
        // A failed save is reported but does not block the launch
        let _ = self.persist();
        self.close_all();

        for (slot, config) in self.widgets.iter().enumerate() {
            match self.factory.create(slot, config) {
                Ok(panel) => self.registry.register(slot, panel),
                Err(e) => {
                    error!(slot, error = ?e, "Failed to create panel");
                    let err = WidgetError::LaunchFailure {
                        slot,
                        reason: format!("{e:#}"),
                    };
                    self.notifier.alert(messages::LAUNCH_ERROR, &err.to_string());
                    return Err(err);
                }
            }
        }

        let launched = self.widgets.len();
        info!(count = launched, "Launched widgets");
        self.host.withdraw();
        self.notifier
            .notify(messages::LAUNCHED, &format!("Launched {launched} web widget(s)"));
        Ok(launched)
    }

    /// Close every live panel; a no-op when none are live
    pub fn close_all(&mut self) -> usize {
        self.registry.close_all()
    }

    /// Persist, stop all panels, then end the process
    pub fn shutdown(&mut self) {
        info!("Shutting down");
        let _ = self.persist();
        self.close_all();
        self.host.terminate();
    }

    pub fn set_global_pin(&mut self, enabled: bool) {
        self.pins.set_global_pin(enabled, &mut self.registry);
    }

    pub fn toggle_global_pin(&mut self) -> bool {
        self.pins.toggle_global_pin(&mut self.registry)
    }

    /// Drop registry entries whose panel was closed from its own surface
    pub fn reap_closed_panels(&mut self) -> Vec<usize> {
        self.registry.reap_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{BackgroundColor, Opacity};
    use crate::config::JsonConfigStore;
    use crate::panel::testing::FakeFactory;
    use crate::types::{Dimensions, Position};
    use anyhow::{Result, bail};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct MemoryState {
        stored: Vec<WidgetConfig>,
        saves: usize,
        fail_saves: bool,
    }

    #[derive(Clone, Default)]
    struct MemoryStore(Rc<RefCell<MemoryState>>);

    impl ConfigStore for MemoryStore {
        fn load(&self) -> Vec<WidgetConfig> {
            self.0.borrow().stored.clone()
        }

        fn save(&self, widgets: &[WidgetConfig]) -> Result<()> {
            let mut state = self.0.borrow_mut();
            if state.fail_saves {
                bail!("disk full");
            }
            state.stored = widgets.to_vec();
            state.saves += 1;
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    struct RecordingNotifier {
        notices: Rc<RefCell<Vec<(String, String)>>>,
        alerts: Rc<RefCell<Vec<(String, String)>>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&mut self, title: &str, message: &str) {
            self.notices.borrow_mut().push((title.to_string(), message.to_string()));
        }

        fn alert(&mut self, title: &str, message: &str) {
            self.alerts.borrow_mut().push((title.to_string(), message.to_string()));
        }
    }

    #[derive(Clone, Default)]
    struct RecordingHost {
        withdrawn: Rc<RefCell<usize>>,
        terminated: Rc<RefCell<bool>>,
    }

    impl HostShell for RecordingHost {
        fn withdraw(&mut self) {
            *self.withdrawn.borrow_mut() += 1;
        }

        fn terminate(&mut self) {
            *self.terminated.borrow_mut() = true;
        }
    }

    type TestController = LifecycleController<MemoryStore, FakeFactory, RecordingNotifier, RecordingHost>;

    struct Harness {
        controller: TestController,
        store: MemoryStore,
        notifier: RecordingNotifier,
        host: RecordingHost,
    }

    fn harness_with(stored: Vec<WidgetConfig>) -> Harness {
        let store = MemoryStore::default();
        store.0.borrow_mut().stored = stored;
        let notifier = RecordingNotifier::default();
        let host = RecordingHost::default();
        let controller = LifecycleController::open(
            store.clone(),
            FakeFactory::default(),
            notifier.clone(),
            host.clone(),
        );
        Harness {
            controller,
            store,
            notifier,
            host,
        }
    }

    fn named(names: &[&str]) -> Vec<WidgetConfig> {
        names
            .iter()
            .map(|n| WidgetConfig::default_with_name(n.to_string()))
            .collect()
    }

    fn valid_draft() -> WidgetDraft {
        WidgetDraft {
            url: "https://news.example".to_string(),
            opacity: Opacity::from_percent(55),
            background_color: BackgroundColor::new(20, 40, 60, 90),
            position: Position::new(30, 40),
            size: Dimensions::new(250, 180),
            pinned: false,
        }
    }

    #[test]
    fn test_open_empty_storage_seeds_default_widget() {
        let h = harness_with(Vec::new());
        let widgets = h.controller.widgets();

        assert_eq!(widgets.len(), 1);
        let widget = &widgets[0];
        assert_eq!(widget.name, "Widget 1");
        assert_eq!(widget.url, "https://www.example.com");
        assert_eq!(widget.opacity.fraction(), 0.8);
        assert_eq!(widget.position, Position::new(100, 100));
        assert_eq!(widget.size, Dimensions::new(400, 300));
        assert!(widget.pinned);
        assert!(h.controller.global_pin());
        assert_eq!(h.store.0.borrow().saves, 0);
    }

    #[test]
    fn test_open_over_unreadable_file_leaves_it_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("widgets.json");
        let contents = b"[{\"name\": \"Mail\", \"url\": ";
        std::fs::write(&path, contents).unwrap();

        let controller = LifecycleController::open(
            JsonConfigStore::new(path.clone()),
            FakeFactory::default(),
            RecordingNotifier::default(),
            RecordingHost::default(),
        );

        let names: Vec<&str> = controller.widgets().iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, vec!["Widget 1"]);
        assert_eq!(std::fs::read(&path).unwrap(), contents.to_vec());
    }

    #[test]
    fn test_open_corrects_negative_position_without_saving() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("widgets.json");
        let contents = r#"[
            {"name": "Mail", "url": "https://mail.example", "x": -20, "y": 40, "width": 300, "height": 200},
            {"name": "Clock", "url": "https://clock.example", "x": 10, "y": 10, "width": 300, "height": 200}
        ]"#;
        std::fs::write(&path, contents).unwrap();

        let controller = LifecycleController::open(
            JsonConfigStore::new(path.clone()),
            FakeFactory::default(),
            RecordingNotifier::default(),
            RecordingHost::default(),
        );

        let names: Vec<&str> = controller.widgets().iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, vec!["Mail", "Clock"]);
        assert_eq!(controller.widget(0).unwrap().position, Position::new(0, 40));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), contents);
    }

    #[test]
    fn test_open_keeps_stored_widgets() {
        let h = harness_with(named(&["Clock", "Mail"]));
        assert_eq!(h.controller.len(), 2);
        assert_eq!(h.controller.widget(1).unwrap().name, "Mail");
        assert_eq!(h.store.0.borrow().saves, 0);
    }

    #[test]
    fn test_add_widget_names_from_count() {
        let mut h = harness_with(named(&["Existing"]));
        h.controller.remove_widget(0).unwrap();

        assert_eq!(h.controller.add_widget(), 0);
        assert_eq!(h.controller.add_widget(), 1);
        assert_eq!(h.controller.add_widget(), 2);

        let names: Vec<&str> = h.controller.widgets().iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, vec!["Widget 1", "Widget 2", "Widget 3"]);
        assert_eq!(h.store.0.borrow().stored.len(), 3);
    }

    #[test]
    fn test_add_after_removal_does_not_renumber() {
        let mut h = harness_with(Vec::new());
        h.controller.add_widget();
        h.controller.add_widget();
        h.controller.remove_widget(0).unwrap();
        h.controller.add_widget();

        let names: Vec<&str> = h.controller.widgets().iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, vec!["Widget 2", "Widget 3", "Widget 3"]);
    }

    #[test]
    fn test_remove_shifts_later_indices() {
        let mut h = harness_with(named(&["a", "b", "c", "d"]));

        assert_eq!(h.controller.remove_widget(1).unwrap().name, "b");
        // "d" was at 3 before the first removal, now at 2
        assert_eq!(h.controller.remove_widget(2).unwrap().name, "d");

        let names: Vec<&str> = h.controller.widgets().iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c"]);
        assert_eq!(h.store.0.borrow().stored.len(), 2);
    }

    #[test]
    fn test_remove_out_of_range_leaves_collection() {
        let mut h = harness_with(named(&["a"]));
        assert_eq!(
            h.controller.remove_widget(1),
            Err(WidgetError::OutOfRange { index: 1, len: 1 })
        );
        assert_eq!(h.controller.len(), 1);
    }

    #[test]
    fn test_remove_leaves_live_panel_running() {
        let mut h = harness_with(named(&["a", "b"]));
        h.controller.launch_all().unwrap();

        h.controller.remove_widget(0).unwrap();

        assert_eq!(h.controller.live_panel_count(), 2);
        let probes = h.controller.factory.probes();
        assert!(probes.iter().all(|p| p.borrow().open));
    }

    #[test]
    fn test_apply_after_remove_reaches_removed_widgets_panel() {
        let mut h = harness_with(named(&["a", "b"]));
        h.controller.launch_all().unwrap();
        let probes = h.controller.factory.probes();

        // Slot 0 still holds the panel launched for "a"; "b" now sits at index 0
        h.controller.remove_widget(0).unwrap();
        assert!(h.controller.is_live(0));
        h.controller.apply_settings(0, valid_draft()).unwrap();

        assert_eq!(h.controller.widget(0).unwrap().name, "b");
        assert!(!h.controller.widget(0).unwrap().pinned);
        assert!(!probes[0].borrow().pinned);
        assert_eq!(probes[0].borrow().restack_calls, 1);
        assert!(probes[1].borrow().pinned);
        assert_eq!(probes[1].borrow().restack_calls, 0);

        // The next launch re-pairs slots with entries
        h.controller.launch_all().unwrap();
        assert_eq!(h.controller.live_panel_count(), 1);
        assert!(probes.iter().all(|p| !p.borrow().open));
    }

    #[test]
    fn test_rename_updates_and_persists() {
        let mut h = harness_with(named(&["a", "b"]));
        h.controller.rename_widget(1, "Weather").unwrap();

        assert_eq!(h.controller.widget(1).unwrap().name, "Weather");
        assert_eq!(h.store.0.borrow().stored[1].name, "Weather");
    }

    #[test]
    fn test_rename_out_of_range() {
        let mut h = harness_with(named(&["a"]));
        assert!(matches!(
            h.controller.rename_widget(5, "x"),
            Err(WidgetError::OutOfRange { index: 5, .. })
        ));
        assert_eq!(h.store.0.borrow().saves, 0);
    }

    #[test]
    fn test_apply_settings_commits_and_keeps_name() {
        let mut h = harness_with(named(&["Keep", "Other"]));
        let draft = valid_draft();

        h.controller.apply_settings(0, draft.clone()).unwrap();

        let stored = h.controller.widget(0).unwrap();
        assert_eq!(stored, &draft.into_config("Keep".to_string()));
        assert_eq!(h.notifier.notices.borrow().len(), 1);
        assert_eq!(h.notifier.notices.borrow()[0].1, "Widget 1 settings updated");
    }

    #[test]
    fn test_apply_settings_rejects_small_size_without_mutation() {
        let mut h = harness_with(named(&["a"]));
        let before = serde_json::to_vec(h.controller.widget(0).unwrap()).unwrap();

        for size in [Dimensions::new(99, 300), Dimensions::new(300, 99), Dimensions::new(0, 0)] {
            let mut draft = valid_draft();
            draft.size = size;
            assert!(matches!(
                h.controller.apply_settings(0, draft),
                Err(WidgetError::InvalidSize { .. })
            ));
        }

        let after = serde_json::to_vec(h.controller.widget(0).unwrap()).unwrap();
        assert_eq!(before, after);
        assert_eq!(h.notifier.alerts.borrow().len(), 3);
        assert!(h.notifier.notices.borrow().is_empty());
    }

    #[test]
    fn test_apply_settings_out_of_range() {
        let mut h = harness_with(named(&["a"]));
        assert!(matches!(
            h.controller.apply_settings(3, valid_draft()),
            Err(WidgetError::OutOfRange { index: 3, len: 1 })
        ));
    }

    #[test]
    fn test_apply_settings_forwards_only_pin_to_live_panel() {
        let mut h = harness_with(named(&["a"]));
        h.controller.launch_all().unwrap();
        let probe = h.controller.factory.probes()[0].clone();
        assert!(probe.borrow().pinned);

        h.controller.apply_settings(0, valid_draft()).unwrap();

        assert!(!probe.borrow().pinned);
        assert_eq!(probe.borrow().restack_calls, 1);
        // URL is not hot-applied
        assert_eq!(probe.borrow().url, "https://www.example.com");
    }

    #[test]
    fn test_launch_all_creates_one_panel_per_widget() {
        let mut h = harness_with(named(&["a", "b"]));

        assert_eq!(h.controller.launch_all(), Ok(2));

        assert_eq!(h.controller.live_panel_count(), 2);
        assert!(h.controller.is_live(0) && h.controller.is_live(1));
        assert_eq!(*h.host.withdrawn.borrow(), 1);
        assert_eq!(h.store.0.borrow().saves, 1);
        assert_eq!(h.notifier.notices.borrow()[0].1, "Launched 2 web widget(s)");
    }

    #[test]
    fn test_relaunch_closes_previous_panels() {
        let mut h = harness_with(named(&["a", "b"]));
        h.controller.launch_all().unwrap();
        h.controller.launch_all().unwrap();

        let probes = h.controller.factory.probes();
        assert_eq!(probes.len(), 4);
        assert!(probes[..2].iter().all(|p| !p.borrow().open));
        assert!(probes[2..].iter().all(|p| p.borrow().open));
        assert_eq!(h.controller.live_panel_count(), 2);
    }

    #[test]
    fn test_launch_failure_aborts_without_rollback() {
        let mut h = harness_with(named(&["a", "b", "c"]));
        h.controller.factory.fail_on_slot = Some(1);

        let result = h.controller.launch_all();

        assert!(matches!(result, Err(WidgetError::LaunchFailure { slot: 1, .. })));
        assert_eq!(h.controller.live_panel_count(), 1);
        assert!(h.controller.is_live(0));
        assert_eq!(*h.host.withdrawn.borrow(), 0);
        assert_eq!(h.notifier.alerts.borrow().len(), 1);
    }

    #[test]
    fn test_launch_continues_when_save_fails() {
        let mut h = harness_with(named(&["a"]));
        h.store.0.borrow_mut().fail_saves = true;

        assert_eq!(h.controller.launch_all(), Ok(1));
        let alerts = h.notifier.alerts.borrow();
        assert_eq!(alerts.len(), 1);
        assert!(alerts[0].1.contains("disk full"));
    }

    #[test]
    fn test_close_all_twice_is_noop() {
        let mut h = harness_with(named(&["a", "b"]));
        h.controller.launch_all().unwrap();

        assert_eq!(h.controller.close_all(), 2);
        assert_eq!(h.controller.live_panel_count(), 0);
        assert_eq!(h.controller.close_all(), 0);
        assert!(h.controller.factory.probes().iter().all(|p| p.borrow().close_calls == 1));
    }

    #[test]
    fn test_global_pin_overrides_panels_but_not_configs() {
        let mut h = harness_with(named(&["a", "b"]));
        let mut unpinned = valid_draft();
        unpinned.pinned = false;
        h.controller.apply_settings(1, unpinned).unwrap();
        h.controller.launch_all().unwrap();

        h.controller.set_global_pin(true);

        assert!(h.controller.factory.probes().iter().all(|p| p.borrow().pinned));
        assert!(!h.controller.widget(1).unwrap().pinned);
    }

    #[test]
    fn test_toggle_global_pin() {
        let mut h = harness_with(named(&["a"]));
        h.controller.launch_all().unwrap();

        assert!(!h.controller.toggle_global_pin());
        assert!(!h.controller.global_pin());
        assert!(!h.controller.factory.probes()[0].borrow().pinned);
    }

    #[test]
    fn test_reap_closed_panels() {
        let mut h = harness_with(named(&["a", "b"]));
        h.controller.launch_all().unwrap();
        h.controller.factory.probes()[1].borrow_mut().open = false;

        assert_eq!(h.controller.reap_closed_panels(), vec![1]);
        assert!(!h.controller.is_live(1));
        assert_eq!(h.controller.live_panel_count(), 1);
    }

    #[test]
    fn test_shutdown_persists_closes_and_terminates() {
        let mut h = harness_with(named(&["a"]));
        h.controller.launch_all().unwrap();
        h.controller.apply_settings(0, valid_draft()).unwrap();

        h.controller.shutdown();

        assert_eq!(h.store.0.borrow().stored[0].url, "https://news.example");
        assert_eq!(h.controller.live_panel_count(), 0);
        assert!(*h.host.terminated.borrow());
    }

    #[test]
    fn test_persistence_failure_keeps_memory_state() {
        let mut h = harness_with(named(&["a"]));
        h.store.0.borrow_mut().fail_saves = true;

        let result = h.controller.rename_widget(0, "renamed");

        assert!(matches!(result, Err(WidgetError::PersistenceFailure(_))));
        assert_eq!(h.controller.widget(0).unwrap().name, "renamed");
        assert_eq!(h.notifier.alerts.borrow().len(), 1);
    }
}
