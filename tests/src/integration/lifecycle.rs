//! # Session Lifecycle Integration
//!
//! Bindings owned by a registry, reset by host session events over several
//! consecutive runs.

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use dependency_binding::{
        BindingError, BindingRegistry, RecordingDiagnosticSink, SessionEvent, SessionLifecycle,
    };
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;

    fn run_events() -> [SessionEvent; 2] {
        [SessionEvent::ExitingEditing, SessionEvent::EnteredRunning]
    }

    fn stop_events() -> [SessionEvent; 2] {
        [SessionEvent::ExitingRunning, SessionEvent::EnteredEditing]
    }

    #[test]
    fn test_values_do_not_leak_between_runs() {
        let registry = BindingRegistry::from_config(&registry_config()).expect("registry");
        let lifecycle = SessionLifecycle::new();
        registry.attach(&lifecycle);
        let input = registry.get("player-input").expect("binding");
        let log = ListenerLog::default();

        for run in 1..=3u32 {
            for event in run_events() {
                lifecycle.emit(event);
            }
            assert!(!input.is_bound(), "run {run} must start empty");

            input.when_available(log.listener("run"));
            input.provide(Gamepad { id: run });

            for event in stop_events() {
                lifecycle.emit(event);
            }
        }

        assert_eq!(log.entries(), vec![("run", 1), ("run", 2), ("run", 3)]);
        assert_eq!(input.epoch(), 3);
    }

    #[test]
    fn test_pending_listener_dropped_at_session_exit() {
        let registry = BindingRegistry::from_config(&registry_config()).expect("registry");
        let lifecycle = SessionLifecycle::new();
        registry.attach(&lifecycle);
        let input = registry.get("player-input").expect("binding");
        let log = ListenerLog::default();

        input.when_available(log.listener("stale"));
        lifecycle.emit(SessionEvent::ExitingRunning);
        assert_eq!(input.pending_count(), 0);

        input.provide(Gamepad { id: 1 });
        assert_eq!(log.count("stale"), 0);
    }

    #[test]
    fn test_non_exit_events_keep_values() {
        let registry = BindingRegistry::from_config(&registry_config()).expect("registry");
        let lifecycle = SessionLifecycle::new();
        registry.attach(&lifecycle);
        let music = registry.get("music").expect("binding");

        music.provide(AudioMixer);
        lifecycle.emit(SessionEvent::EnteredEditing);
        lifecycle.emit(SessionEvent::ExitingEditing);
        lifecycle.emit(SessionEvent::EnteredRunning);
        assert!(music.is_bound());
    }

    #[test]
    fn test_detached_registry_survives_session_exit() {
        let registry = BindingRegistry::from_config(&registry_config()).expect("registry");
        let lifecycle = SessionLifecycle::new();
        registry.attach(&lifecycle);
        registry.detach();

        let music = registry.get("music").expect("binding");
        music.provide(AudioMixer);
        lifecycle.emit(SessionEvent::ExitingRunning);
        assert!(music.is_bound());
    }

    #[test]
    fn test_shared_sink_names_binding() {
        let sink = Arc::new(RecordingDiagnosticSink::new());
        let registry = BindingRegistry::from_config_with(
            &registry_config(),
            sink.clone(),
            Arc::new(dependency_binding::NoOpMetrics),
        )
        .expect("registry");

        registry.get("music").expect("binding").provide(Gamepad { id: 1 });
        let diagnostics = sink.diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(&*diagnostics[0].binding, "music");
    }

    #[tokio::test]
    async fn test_async_waiter_across_tasks() {
        let registry = Arc::new(BindingRegistry::from_config(&registry_config()).expect("registry"));
        let input = registry.get("player-input").expect("binding");

        let waiter = tokio::spawn(input.wait());
        tokio::task::yield_now().await;

        let provider = Arc::clone(&registry);
        tokio::spawn(async move {
            provider
                .get("player-input")
                .expect("binding")
                .provide(Gamepad { id: 77 });
        })
        .await
        .expect("provider task");

        let value = timeout(Duration::from_millis(500), waiter)
            .await
            .expect("timeout")
            .expect("join")
            .expect("value");
        assert_eq!(value.downcast_ref::<Gamepad>(), Some(&Gamepad { id: 77 }));
    }

    #[tokio::test]
    async fn test_async_waiter_cancelled_by_session_exit() {
        let registry = BindingRegistry::from_config(&registry_config()).expect("registry");
        let lifecycle = SessionLifecycle::new();
        registry.attach(&lifecycle);

        let waiter = registry.get("player-input").expect("binding").wait();
        lifecycle.emit(SessionEvent::ExitingRunning);

        let result = timeout(Duration::from_millis(500), waiter)
            .await
            .expect("timeout");
        assert!(matches!(result, Err(BindingError::SessionReset { .. })));
    }

    #[tokio::test]
    async fn test_observers_see_session_events() {
        let lifecycle = SessionLifecycle::new();
        let mut observer = lifecycle.subscribe();

        for event in run_events().into_iter().chain(stop_events()) {
            lifecycle.emit(event);
        }

        let mut seen = Vec::new();
        for _ in 0..4 {
            let event = timeout(Duration::from_millis(100), observer.recv())
                .await
                .expect("timeout")
                .expect("event");
            seen.push(event);
        }
        assert_eq!(
            seen,
            vec![
                SessionEvent::ExitingEditing,
                SessionEvent::EnteredRunning,
                SessionEvent::ExitingRunning,
                SessionEvent::EnteredEditing,
            ]
        );
        assert_eq!(lifecycle.events_emitted(), 4);
    }
}
