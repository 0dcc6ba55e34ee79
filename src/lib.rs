//! Fine-grained reactive signals and `data-volt-*` DOM bindings for Volt.
#![warn(missing_docs)]

mod config;
mod error;
mod expr;
mod reactive;

#[cfg(feature = "web")]
mod binder;
#[cfg(feature = "web")]
mod dom;
#[cfg(feature = "web")]
mod scope;

pub use config::{VoltConfig, VoltConfigBuilder};
pub use error::{set_error_sink, ErrorSink, Severity, VoltError};
pub use expr::{Environment, EvalError, ExprError, ParseError, Reactive, SandboxViolation, Value, SAFE_GLOBALS};
pub use reactive::{Cell, CircularDependency, Derivation, Effect, Unsubscribe};

#[cfg(feature = "web")]
pub use binder::{mount, mount_with_config, MountHandle};
#[cfg(feature = "web")]
pub use dom::attr::DirectiveName;
#[cfg(feature = "web")]
pub use dom::ElementHandle;
#[cfg(feature = "web")]
pub use handlers::plugin::{register_plugin, unregister_plugin, PluginHandler};
#[cfg(feature = "web")]
pub use scope::Scope;

#[cfg(feature = "web")]
mod handlers;
