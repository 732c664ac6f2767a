use std::path::Path;

use anyhow::Result;
use tracing::info;

use tagres::{global, load_catalog};

mod eval;
mod tags;
mod util;

pub(crate) use eval::cmd_eval;
pub(crate) use tags::{cmd_accessors, cmd_tags};

/// Declare catalog tags on the shared registry, then freeze it.
pub(crate) fn prepare_registry(catalog: Option<&Path>) -> Result<()> {
    if let Some(path) = catalog {
        let declarations = load_catalog(path)?;
        let count = declarations.len();
        global::declare_tags(declarations)?;
        info!(count, catalog = %path.display(), "declared catalog tags");
    }
    global::freeze();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use tagres::TagError;

    // Freezes the shared registry for this test binary, so it stays the only
    // test here that touches `global`.
    #[test]
    fn prepared_registry_serves_catalog_tags_and_is_frozen() -> Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        write!(file, r#"{{"tags": [["cli_partial", "cli_incomplete"]]}}"#)?;

        prepare_registry(Some(file.path()))?;
        assert!(global::responds_to("cli_incomplete?"));
        let result = global::construct("cli_incomplete", 1)?;
        assert!(result.status_is("cli_partial"));
        assert!(global::check("CLI_Partial?", &result)?);

        cmd_eval(
            "cli_incomplete",
            Some("1"),
            &["cli_partial?".to_string()],
            &["cli_partial_then".to_string(), "ok_then".to_string()],
            false,
        )?;
        cmd_eval("ok", None, &[], &[], true)?;
        assert!(cmd_eval("cli_missing", None, &[], &[], false).is_err());
        assert!(cmd_eval("ok", None, &["cli_missing?".to_string()], &[], false).is_err());

        let err = global::declare_tags(["cli_late"]).unwrap_err();
        assert_eq!(err.downcast_ref::<TagError>(), Some(&TagError::Frozen));
        Ok(())
    }
}
