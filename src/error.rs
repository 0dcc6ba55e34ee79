//! Central error types and the error sink (base spec §7).
//!
//! Grounded on the ambient error-handling stack described in `SPEC_FULL.md`
//! §C: a `thiserror`-backed enum (the pack's idiom for structured errors,
//! e.g. `dioxus-core`'s error types) reported through a sink modeled after
//! the teacher's thread-local-swap pattern for the reactive root
//! (`Root::set_global` in `sycamore_reactive::root`).

use std::cell::RefCell;

use crate::reactive::CircularDependency;

/// Severity at which an error is routed to the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Recoverable, likely a no-op for the user (e.g. unknown directive).
    Warn,
    /// Recoverable, the affected binding became a no-op for this update.
    Error,
    /// Unrecoverable for the element/mount currently being processed; halts
    /// further processing of it and is rethrown to the caller.
    Fatal,
}

/// All error kinds the core can raise, per base spec §7.
#[derive(Debug, thiserror::Error)]
pub enum VoltError {
    /// An expression failed to parse or evaluate.
    #[error("failed to evaluate `{expr}`: {cause}")]
    Evaluation {
        /// The original expression text.
        expr: String,
        /// Human-readable description of the underlying failure.
        cause: String,
    },
    /// A derivation attempted to read itself while recomputing.
    #[error("circular dependency while recomputing a derivation")]
    CircularDependency(#[from] CircularDependency),
    /// An attribute value did not match its handler's grammar.
    #[error("invalid binding on `{attribute}`: {reason}")]
    InvalidBinding {
        /// The attribute name that failed to parse.
        attribute: String,
        /// Why the value was rejected.
        reason: String,
    },
    /// No built-in handler and no plugin registered for a directive name.
    #[error("unknown directive `{directive}`")]
    UnknownDirective {
        /// The unrecognized directive base name.
        directive: String,
    },
    /// A plugin handler or lifecycle callback threw.
    #[error("plugin `{plugin}` failed: {cause}")]
    PluginFailure {
        /// The plugin's registered name.
        plugin: String,
        /// Human-readable description of the underlying failure.
        cause: String,
    },
    /// Any other error raised inside a handler's apply closure or a
    /// subscriber callback.
    #[error("handler runtime error in `{handler}`: {cause}")]
    HandlerRuntimeError {
        /// The handler (directive) in which the error occurred.
        handler: String,
        /// Human-readable description of the underlying failure.
        cause: String,
    },
}

impl VoltError {
    /// The severity at which this kind of error is routed by default.
    /// `UnknownDirective` is warn-only; `CircularDependency` is fatal;
    /// everything else is `error` (recoverable, binding becomes a no-op).
    pub fn default_severity(&self) -> Severity {
        match self {
            VoltError::UnknownDirective { .. } => Severity::Warn,
            VoltError::CircularDependency(_) => Severity::Fatal,
            _ => Severity::Error,
        }
    }
}

/// Receives every error the core produces. Applications may install a custom
/// sink (e.g. to forward into their own telemetry) via [`set_error_sink`].
pub trait ErrorSink {
    /// Handle one reported error at the given severity.
    fn report(&self, severity: Severity, error: &VoltError);
}

/// Logs to `tracing` at `warn`/`error`, and panics (after logging) at `fatal`.
/// This is the sink installed by default, matching base spec §7: "The default
/// sink logs to the host's diagnostic channel; applications may replace it."
pub struct DefaultSink;

impl ErrorSink for DefaultSink {
    fn report(&self, severity: Severity, error: &VoltError) {
        match severity {
            Severity::Warn => log_warn(error),
            Severity::Error => log_error(error),
            Severity::Fatal => {
                log_error(error);
                panic!("fatal volt error: {error}");
            }
        }
    }
}

#[cfg(feature = "trace")]
fn log_warn(error: &VoltError) {
    tracing::warn!(%error, "volt: recoverable error");
}
#[cfg(not(feature = "trace"))]
fn log_warn(error: &VoltError) {
    let _ = error;
}

#[cfg(feature = "trace")]
fn log_error(error: &VoltError) {
    tracing::error!(%error, "volt: error");
}
#[cfg(not(feature = "trace"))]
fn log_error(error: &VoltError) {
    let _ = error;
}

thread_local! {
    static SINK: RefCell<Box<dyn ErrorSink>> = RefCell::new(Box::new(DefaultSink));
}

/// Install a replacement error sink for the current thread.
pub fn set_error_sink(sink: Box<dyn ErrorSink>) {
    SINK.with(|s| *s.borrow_mut() = sink);
}

/// Report `error` at its default severity. Returns `Err` unchanged so call
/// sites can both report and short-circuit in one expression:
/// `return Err(report(err))`. Panics if `error`'s severity is `Fatal`.
pub fn report(error: VoltError) -> VoltError {
    report_at(error.default_severity(), error)
}

/// Report `error` at an explicit severity, overriding its default.
pub fn report_at(severity: Severity, error: VoltError) -> VoltError {
    SINK.with(|s| s.borrow().report(severity, &error));
    error
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell as StdRefCell;
    use std::rc::Rc;

    struct RecordingSink(Rc<StdRefCell<Vec<Severity>>>);
    impl ErrorSink for RecordingSink {
        fn report(&self, severity: Severity, _error: &VoltError) {
            self.0.borrow_mut().push(severity);
        }
    }

    #[test]
    fn default_severities_match_spec() {
        let unknown = VoltError::UnknownDirective {
            directive: "frobnicate".into(),
        };
        assert_eq!(unknown.default_severity(), Severity::Warn);

        let circular = VoltError::CircularDependency(CircularDependency);
        assert_eq!(circular.default_severity(), Severity::Fatal);

        let invalid = VoltError::InvalidBinding {
            attribute: "for".into(),
            reason: "malformed loop expression".into(),
        };
        assert_eq!(invalid.default_severity(), Severity::Error);
    }

    #[test]
    fn custom_sink_receives_reports() {
        let seen = Rc::new(StdRefCell::new(Vec::new()));
        set_error_sink(Box::new(RecordingSink(seen.clone())));
        report(VoltError::UnknownDirective {
            directive: "x".into(),
        });
        assert_eq!(*seen.borrow(), vec![Severity::Warn]);
        // Restore default sink so later tests in the same thread aren't
        // affected by this one (thread-local state is process-shared across
        // `#[test]` functions run on the same test-harness thread).
        set_error_sink(Box::new(DefaultSink));
    }
}
