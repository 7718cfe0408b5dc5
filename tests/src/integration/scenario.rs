//! # Provide / Listen / Reset Scenarios
//!
//! Walks a single binding through the full `Empty -> Bound -> Empty` cycle,
//! checking which listeners fire, with what, and what gets reported.

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use dependency_binding::{
        BindingError, BindingMetrics, BindingType, DependencyBinding, Operation,
        RecordingDiagnosticSink, SlotState,
    };
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;

    fn input_binding() -> (
        Arc<DependencyBinding>,
        Arc<RecordingDiagnosticSink>,
        Arc<BindingMetrics>,
    ) {
        let sink = Arc::new(RecordingDiagnosticSink::new());
        let metrics = Arc::new(BindingMetrics::new());
        let binding = DependencyBinding::builder(
            "player-input",
            BindingType::new(INPUT_SOURCE),
            catalog(),
        )
        .sink(sink.clone())
        .metrics(metrics.clone())
        .build();
        (Arc::new(binding), sink, metrics)
    }

    // =========================================================================
    // FULL WALKTHROUGH
    // =========================================================================

    #[test]
    fn test_full_cycle_walkthrough() {
        let (binding, sink, metrics) = input_binding();
        let log = ListenerLog::default();

        // L1 waits on an empty binding.
        binding.when_available(log.listener("L1"));
        assert_eq!(binding.pending_count(), 1);

        // Y does not conform to X: rejected, L1 untouched.
        binding.provide(AudioMixer);
        assert_eq!(binding.state(), SlotState::Empty);
        assert!(log.entries().is_empty());

        // Z conforms to X: accepted, L1 fires once with Z.
        binding.provide(Gamepad { id: 1 });
        assert_eq!(log.entries(), vec![("L1", 1)]);

        // Second valid value: rejected, first value kept.
        binding.provide(Gamepad { id: 2 });
        let held = binding.get().expect("bound");
        assert_eq!(held.downcast_ref::<Gamepad>(), Some(&Gamepad { id: 1 }));

        // Reset: empty again.
        binding.reset();
        assert_eq!(binding.state(), SlotState::Empty);

        // L2 registered on the empty binding does not fire yet.
        binding.when_available(log.listener("L2"));
        assert_eq!(log.count("L2"), 0);

        // Fresh value: only L2 fires.
        binding.provide(Gamepad { id: 3 });
        assert_eq!(log.entries(), vec![("L1", 1), ("L2", 3)]);

        let errors: Vec<BindingError> = sink.drain().into_iter().map(|d| d.error).collect();
        assert_eq!(
            errors,
            vec![
                BindingError::TypeMismatch {
                    expected: BindingType::new(INPUT_SOURCE),
                    actual: BindingType::new(AUDIO_MIXER),
                },
                BindingError::AlreadyBound {
                    expected: BindingType::new(INPUT_SOURCE),
                },
            ]
        );

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.provides_accepted, 2);
        assert_eq!(snapshot.provides_duplicate, 1);
        assert_eq!(snapshot.provides_mismatched, 1);
        assert_eq!(snapshot.callbacks_invoked, 2);
        assert_eq!(snapshot.resets, 1);
    }

    #[test]
    fn test_exact_expected_type_accepted() {
        #[derive(Debug)]
        struct RawInput;

        impl dependency_binding::Bindable for RawInput {
            fn binding_type(&self) -> BindingType {
                BindingType::new(INPUT_SOURCE)
            }
        }

        let (binding, sink, _) = input_binding();
        binding.provide(RawInput);
        assert!(binding.is_bound());
        assert!(sink.is_empty());
    }

    #[test]
    fn test_sibling_subtypes_both_conform() {
        let (binding, _, _) = input_binding();
        binding.provide(Keyboard { layout: "qwerty" });
        assert!(binding.is_bound());

        binding.reset();
        binding.provide(Gamepad { id: 8 });
        assert!(binding.get().unwrap().is::<Gamepad>());
    }

    #[test]
    fn test_listeners_mixed_before_and_after_provide() {
        let (binding, _, _) = input_binding();
        let log = ListenerLog::default();

        binding.when_available(log.listener("early-1"));
        binding.when_available(log.listener("early-2"));
        binding.provide(Gamepad { id: 5 });
        binding.when_available(log.listener("late"));

        assert_eq!(
            log.entries(),
            vec![("early-1", 5), ("early-2", 5), ("late", 5)]
        );
    }

    #[test]
    fn test_null_callback_is_reported_not_stored() {
        let (binding, sink, _) = input_binding();
        binding.bind_async(None);

        assert_eq!(binding.pending_count(), 0);
        let diagnostics = sink.diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].operation, Operation::WhenAvailable);
        assert_eq!(
            diagnostics[0].to_string(),
            "[player-input.when_available]: null callback for binding of type InputSource"
        );
    }

    // =========================================================================
    // CONCURRENT PROVIDERS
    // =========================================================================

    #[test]
    fn test_concurrent_providers_single_winner() {
        let (binding, sink, metrics) = input_binding();
        let log = ListenerLog::default();
        for _ in 0..10 {
            binding.when_available(log.listener("waiter"));
        }

        let handles: Vec<_> = (0..8)
            .map(|id| {
                let binding = Arc::clone(&binding);
                thread::spawn(move || binding.provide(Gamepad { id }))
            })
            .collect();
        for handle in handles {
            handle.join().expect("provider thread");
        }

        let winner = binding
            .get()
            .and_then(|v| v.downcast_ref::<Gamepad>().map(|pad| pad.id))
            .expect("bound");

        let entries = log.entries();
        assert_eq!(entries.len(), 10);
        assert!(entries.iter().all(|(_, id)| *id == winner));
        assert_eq!(sink.len(), 7);
        assert_eq!(metrics.snapshot().provides_accepted, 1);
    }

    #[test]
    fn test_concurrent_listeners_each_fire_once() {
        let (binding, _, _) = input_binding();
        let log = ListenerLog::default();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let binding = Arc::clone(&binding);
                let log = log.clone();
                thread::spawn(move || {
                    for _ in 0..25 {
                        binding.when_available(log.listener("w"));
                    }
                })
            })
            .collect();

        binding.provide(Gamepad { id: 11 });
        for handle in handles {
            handle.join().expect("listener thread");
        }

        assert_eq!(log.count("w"), 200);
        assert_eq!(binding.pending_count(), 0);
    }

    // =========================================================================
    // CONCURRENT RESET
    // =========================================================================

    #[test]
    fn test_reset_from_other_thread_waits_for_fanout() {
        for _ in 0..500 {
            let (binding, _, _) = input_binding();
            let started = Arc::new(AtomicBool::new(false));
            let reset_done = Arc::new(AtomicBool::new(false));
            let stale = Arc::new(AtomicUsize::new(0));

            let flag = Arc::clone(&started);
            binding.when_available(move |_| {
                flag.store(true, Ordering::SeqCst);
                thread::yield_now();
            });
            for _ in 0..4 {
                let reset_done = Arc::clone(&reset_done);
                let stale = Arc::clone(&stale);
                binding.when_available(move |_| {
                    if reset_done.load(Ordering::SeqCst) {
                        stale.fetch_add(1, Ordering::SeqCst);
                    }
                });
            }

            let resetter = {
                let binding = Arc::clone(&binding);
                let started = Arc::clone(&started);
                let reset_done = Arc::clone(&reset_done);
                thread::spawn(move || {
                    while !started.load(Ordering::SeqCst) {
                        std::hint::spin_loop();
                    }
                    let dropped = binding.reset();
                    reset_done.store(true, Ordering::SeqCst);
                    dropped
                })
            };

            binding.provide(Gamepad { id: 1 });

            // Fan-out had drained the queue before the reset got in.
            assert_eq!(resetter.join().expect("resetter thread"), 0);
            assert_eq!(stale.load(Ordering::SeqCst), 0);
            assert_eq!(binding.state(), SlotState::Empty);
        }
    }
}
