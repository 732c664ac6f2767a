//! Process-wide default tag registry.
//!
//! Prefer passing a [`TagRegistry`] explicitly; this module exists for callers
//! that want one shared vocabulary for the whole process. Declarations hold
//! the write lock for the entire batch, so readers never observe a partially
//! installed tag group.

use std::sync::RwLock;

use anyhow::Result;
use once_cell::sync::Lazy;

use crate::registry::{TagDeclaration, TagRegistry};
use crate::value::{Payload, ResultValue};

static REGISTRY: Lazy<RwLock<TagRegistry>> = Lazy::new(|| RwLock::new(TagRegistry::new()));

/// Declare tags on the shared registry.
pub fn declare_tags<I>(declarations: I) -> Result<()>
where
    I: IntoIterator,
    I::Item: Into<TagDeclaration>,
{
    let mut guard = REGISTRY.write().expect("tag registry poisoned");
    guard.declare_tags(declarations)
}

/// Restore the shared registry to the built-in vocabulary.
pub fn reset() {
    let mut guard = REGISTRY.write().expect("tag registry poisoned");
    *guard = TagRegistry::new();
}

/// Freeze the shared registry against further declarations.
pub fn freeze() {
    let mut guard = REGISTRY.write().expect("tag registry poisoned");
    guard.freeze();
}

/// Independent copy of the shared registry.
pub fn snapshot() -> TagRegistry {
    let guard = REGISTRY.read().expect("tag registry poisoned");
    guard.clone()
}

pub fn construct(name: &str, payload: impl Into<Payload>) -> Result<ResultValue> {
    let guard = REGISTRY.read().expect("tag registry poisoned");
    guard.construct(name, payload)
}

pub fn check(accessor: &str, result: &ResultValue) -> Result<bool> {
    let guard = REGISTRY.read().expect("tag registry poisoned");
    guard.check(accessor, result)
}

pub fn then(accessor: &str, result: &ResultValue) -> Result<Option<Payload>> {
    let guard = REGISTRY.read().expect("tag registry poisoned");
    guard.then(accessor, result)
}

/// Run `continuation` on the payload when the continuation's status matches.
pub fn then_with(
    accessor: &str,
    result: &ResultValue,
    continuation: impl Fn(&Payload) -> Payload,
) -> Result<Option<Payload>> {
    let guard = REGISTRY.read().expect("tag registry poisoned");
    guard.then_with(accessor, result, continuation)
}

pub fn responds_to(name: &str) -> bool {
    let guard = REGISTRY.read().expect("tag registry poisoned");
    guard.responds_to(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::{Mutex, MutexGuard};

    use crate::error::TagError;

    // The shared registry outlives each test; serialize access to it.
    static SERIAL: Mutex<()> = Mutex::new(());

    fn serial() -> MutexGuard<'static, ()> {
        SERIAL.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    #[test]
    fn declarations_are_visible_process_wide() -> Result<()> {
        let _serial = serial();
        declare_tags(["global_wammy"])?;
        assert!(responds_to("global_wammy?"));

        let result = construct("global_wammy", "Hello")?;
        assert!(check("global_wammy?", &result)?);
        assert!(!check("ok?", &result)?);
        assert_eq!(then("global_wammy_then", &result)?, Some(json!("Hello")));
        Ok(())
    }

    #[test]
    fn then_with_runs_only_on_match() -> Result<()> {
        let _serial = serial();
        let result = construct("success", json!({"rows": 3}))?;
        let rows = then_with("succeeded_then", &result, |payload| payload["rows"].clone())?;
        assert_eq!(rows, Some(json!(3)));

        let skipped = then_with("failed_then", &result, |_| panic!("continuation must not run"))?;
        assert_eq!(skipped, None);

        let err = then_with("missing_then", &result, |payload| payload.clone()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TagError>(),
            Some(TagError::UnknownOperation { .. })
        ));
        Ok(())
    }

    #[test]
    fn snapshot_is_detached() -> Result<()> {
        let _serial = serial();
        let mut copy = snapshot();
        copy.declare_tag("global_detached")?;
        assert!(copy.responds_to("global_detached"));
        assert!(!responds_to("global_detached"));
        Ok(())
    }

    #[test]
    fn builtins_are_available() -> Result<()> {
        let _serial = serial();
        let result = construct("error", "disk full")?;
        assert!(check("failed?", &result)?);
        assert_eq!(
            result.to_json(),
            json!({"status": "failed", "value": "disk full"})
        );
        Ok(())
    }

    #[test]
    fn freeze_and_reset() -> Result<()> {
        let _serial = serial();
        declare_tags(["global_transient"])?;
        freeze();
        let err = declare_tags(["global_late"]).unwrap_err();
        assert_eq!(err.downcast_ref::<TagError>(), Some(&TagError::Frozen));

        reset();
        assert!(!responds_to("global_transient"));
        assert!(responds_to("ok"));
        declare_tags(["global_late"])?;
        assert!(responds_to("global_late"));
        reset();
        Ok(())
    }
}
