//! # Dependency Binding
//!
//! A named, thread-safe slot for one dependency.
//!
//! ## Concurrency
//!
//! The value, the pending callbacks and the epoch live behind one mutex, so
//! every inspect-and-mutate step is atomic. Callbacks always run after the
//! mutex is released, which makes re-entrant use from inside a callback legal:
//!
//! - `when_available` on the same binding runs the new callback immediately
//! - `provide` on the same binding is rejected as a duplicate
//! - `reset` on the same binding stops the remaining fan-out; callbacks that
//!   were released by the interrupted `provide` but have not run yet are
//!   dropped
//!
//! A second, re-entrant lock (`dispatch`) is held for the whole of a fan-out
//! and by `reset`. A `reset` from another thread therefore waits for the
//! fan-out in progress to finish, and once `reset` returns no callback of the
//! previous epoch can still run. Callbacks must not block on another thread
//! that resets the same binding.
//!
//! ## Failure policy
//!
//! `provide`, `provide_shared`, `when_available` and `bind_async` never fail
//! visibly: rejections go to the binding's `DiagnosticSink`. The `try_*`
//! variants return the same rejections as `BindingError` and report nothing.

use crate::adapters::TracingDiagnosticSink;
use crate::domain::{
    Bindable, BindingCallback, BindingType, Fanout, Registration, SlotState, TypeCatalog,
    TypedSlot,
};
use crate::error::BindingError;
use crate::lifecycle::{SessionAttachment, SessionEvent, SessionLifecycle};
use crate::metrics::{MetricsRecorder, NoOpMetrics};
use crate::ports::{Diagnostic, DiagnosticSink, Operation, SessionListener};
use parking_lot::{Mutex, ReentrantMutex};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::debug;

/// A named single-assignment dependency slot.
pub struct DependencyBinding {
    name: Arc<str>,
    expected: BindingType,
    catalog: Arc<TypeCatalog>,
    slot: Mutex<TypedSlot<Arc<dyn Bindable>>>,
    /// Held across callback invocation and by `reset`; taken before `slot`.
    dispatch: ReentrantMutex<()>,
    sink: Arc<dyn DiagnosticSink>,
    metrics: Arc<dyn MetricsRecorder>,
}

impl DependencyBinding {
    /// Create a binding that reports through `tracing` and records no metrics.
    pub fn new(
        name: impl Into<Arc<str>>,
        expected: BindingType,
        catalog: Arc<TypeCatalog>,
    ) -> Self {
        Self::builder(name, expected, catalog).build()
    }

    pub fn builder(
        name: impl Into<Arc<str>>,
        expected: BindingType,
        catalog: Arc<TypeCatalog>,
    ) -> DependencyBindingBuilder {
        DependencyBindingBuilder {
            name: name.into(),
            expected,
            catalog,
            sink: Arc::new(TracingDiagnosticSink),
            metrics: Arc::new(NoOpMetrics),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn expected_type(&self) -> &BindingType {
        &self.expected
    }

    #[must_use]
    pub fn catalog(&self) -> &Arc<TypeCatalog> {
        &self.catalog
    }

    #[must_use]
    pub fn state(&self) -> SlotState {
        self.slot.lock().state()
    }

    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.state() == SlotState::Bound
    }

    /// The bound value, if any.
    #[must_use]
    pub fn get(&self) -> Option<Arc<dyn Bindable>> {
        self.slot.lock().value().cloned()
    }

    /// Callbacks waiting for a value.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.slot.lock().pending_count()
    }

    /// Number of resets applied so far.
    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.slot.lock().epoch()
    }

    /// Bind `value`, reporting a diagnostic on rejection.
    pub fn provide<T: Bindable>(&self, value: T) {
        self.provide_shared(Arc::new(value));
    }

    /// Bind an already shared value, reporting a diagnostic on rejection.
    pub fn provide_shared(&self, value: Arc<dyn Bindable>) {
        if let Err(error) = self.try_provide_shared(value) {
            self.report(Operation::Provide, error);
        }
    }

    /// Bind `value`.
    ///
    /// # Errors
    ///
    /// - `BindingError::AlreadyBound` - a value is already bound this epoch
    /// - `BindingError::TypeMismatch` - `value` does not conform to the expected type
    pub fn try_provide<T: Bindable>(&self, value: T) -> Result<(), BindingError> {
        self.try_provide_shared(Arc::new(value))
    }

    /// Bind an already shared value.
    ///
    /// On success every pending callback runs once, in registration order,
    /// before this returns.
    ///
    /// # Errors
    ///
    /// Same as [`try_provide`](Self::try_provide).
    pub fn try_provide_shared(&self, value: Arc<dyn Bindable>) -> Result<(), BindingError> {
        let actual = value.binding_type();
        let _dispatch = self.dispatch.lock();

        let fanout = {
            let mut slot = self.slot.lock();

            if slot.state() == SlotState::Bound {
                self.metrics.record_provide_duplicate();
                return Err(BindingError::AlreadyBound {
                    expected: self.expected.clone(),
                });
            }

            if !self.catalog.conforms(&actual, &self.expected) {
                self.metrics.record_provide_mismatched();
                return Err(BindingError::TypeMismatch {
                    expected: self.expected.clone(),
                    actual,
                });
            }

            slot.bind(value).map_err(|_| BindingError::AlreadyBound {
                expected: self.expected.clone(),
            })?
        };

        self.metrics.record_provide_accepted();
        debug!(
            binding = %self.name,
            expected = %self.expected,
            actual = %actual,
            pending = fanout.callbacks.len(),
            epoch = fanout.epoch,
            "Binding satisfied"
        );

        self.dispatch(fanout);
        Ok(())
    }

    /// Run `callback` once a value is bound, or immediately if one already is.
    pub fn when_available<F>(&self, callback: F)
    where
        F: FnOnce(Arc<dyn Bindable>) + Send + 'static,
    {
        self.bind_async(Some(Box::new(callback)));
    }

    /// Like [`when_available`](Self::when_available), accepting a possibly
    /// absent callback. `None` is reported and otherwise ignored.
    pub fn bind_async(&self, callback: Option<BindingCallback>) {
        if let Err(error) = self.try_bind_async(callback) {
            self.report(Operation::WhenAvailable, error);
        }
    }

    /// Strict variant of [`when_available`](Self::when_available).
    ///
    /// # Errors
    ///
    /// Never fails for a concrete closure; present for symmetry with
    /// [`try_bind_async`](Self::try_bind_async).
    pub fn try_when_available<F>(&self, callback: F) -> Result<(), BindingError>
    where
        F: FnOnce(Arc<dyn Bindable>) + Send + 'static,
    {
        self.try_bind_async(Some(Box::new(callback)))
    }

    /// Strict variant of [`bind_async`](Self::bind_async).
    ///
    /// # Errors
    ///
    /// - `BindingError::NullCallback` - `callback` is `None`
    pub fn try_bind_async(&self, callback: Option<BindingCallback>) -> Result<(), BindingError> {
        let Some(callback) = callback else {
            self.metrics.record_null_callback();
            return Err(BindingError::NullCallback {
                expected: self.expected.clone(),
            });
        };

        self.metrics.record_callback_registered();
        let _dispatch = self.dispatch.lock();
        let registration = self.slot.lock().subscribe(callback);

        match registration {
            Registration::Immediate { callback, value } => {
                callback(value);
                self.metrics.record_callbacks_invoked(1);
            }
            Registration::Deferred => {
                debug!(binding = %self.name, "Callback deferred until binding is satisfied");
            }
        }
        Ok(())
    }

    /// Resolve with the bound value.
    ///
    /// The callback behind the future is registered when `wait` is called,
    /// not when the future is first polled. The future resolves with
    /// `BindingError::SessionReset` if the binding is reset first.
    pub fn wait(
        &self,
    ) -> impl Future<Output = Result<Arc<dyn Bindable>, BindingError>> + Send + 'static {
        let (tx, rx) = oneshot::channel();
        self.when_available(move |value| {
            let _ = tx.send(value);
        });

        let expected = self.expected.clone();
        async move { rx.await.map_err(|_| BindingError::SessionReset { expected }) }
    }

    /// Return to `Empty`, dropping pending callbacks without running them.
    ///
    /// Blocks while another thread is running this binding's callbacks.
    /// Returns the number of callbacks dropped.
    pub fn reset(&self) -> usize {
        let _dispatch = self.dispatch.lock();
        let (dropped, epoch) = {
            let mut slot = self.slot.lock();
            let dropped = slot.reset();
            (dropped, slot.epoch())
        };

        self.metrics.record_reset();
        self.metrics.record_callbacks_dropped(dropped as u64);
        debug!(binding = %self.name, dropped, epoch, "Binding reset");
        dropped
    }

    /// Reset this binding whenever `lifecycle` leaves a running session.
    #[must_use = "dropping the attachment detaches the binding"]
    pub fn attach_to(self: &Arc<Self>, lifecycle: &SessionLifecycle) -> SessionAttachment {
        lifecycle.attach(Arc::clone(self) as Arc<dyn SessionListener>)
    }

    fn dispatch(&self, fanout: Fanout<Arc<dyn Bindable>>) {
        let Fanout {
            epoch,
            value,
            callbacks,
        } = fanout;
        let total = callbacks.len();

        for (invoked, callback) in callbacks.into_iter().enumerate() {
            if self.slot.lock().epoch() != epoch {
                let dropped = total - invoked;
                self.metrics.record_callbacks_dropped(dropped as u64);
                debug!(
                    binding = %self.name,
                    dropped,
                    "Binding reset during fan-out, remaining callbacks dropped"
                );
                return;
            }
            callback(Arc::clone(&value));
            self.metrics.record_callbacks_invoked(1);
        }
    }

    fn report(&self, operation: Operation, error: BindingError) {
        self.sink.report(&Diagnostic {
            binding: Arc::clone(&self.name),
            operation,
            error,
        });
    }
}

impl SessionListener for DependencyBinding {
    fn on_session_event(&self, event: SessionEvent) {
        if event.ends_run() {
            self.reset();
        }
    }
}

impl fmt::Debug for DependencyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slot = self.slot.lock();
        f.debug_struct("DependencyBinding")
            .field("name", &self.name)
            .field("expected", &self.expected)
            .field("value", &slot.value())
            .field("pending", &slot.pending_count())
            .field("epoch", &slot.epoch())
            .finish()
    }
}

/// Builder for [`DependencyBinding`].
pub struct DependencyBindingBuilder {
    name: Arc<str>,
    expected: BindingType,
    catalog: Arc<TypeCatalog>,
    sink: Arc<dyn DiagnosticSink>,
    metrics: Arc<dyn MetricsRecorder>,
}

impl DependencyBindingBuilder {
    /// Report rejections to `sink` instead of `tracing`.
    #[must_use]
    pub fn sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    #[must_use]
    pub fn metrics(mut self, metrics: Arc<dyn MetricsRecorder>) -> Self {
        self.metrics = metrics;
        self
    }

    #[must_use]
    pub fn build(self) -> DependencyBinding {
        DependencyBinding {
            name: self.name,
            expected: self.expected,
            catalog: self.catalog,
            slot: Mutex::new(TypedSlot::new()),
            dispatch: ReentrantMutex::new(()),
            sink: self.sink,
            metrics: self.metrics,
        }
    }
}
