use anyhow::Result;

use tagres::global;

pub(crate) fn cmd_tags() -> Result<()> {
    let registry = global::snapshot();
    for entry in registry.tags() {
        if entry.aliases.is_empty() {
            println!("{}", entry.primary);
        } else {
            let aliases = entry
                .aliases
                .iter()
                .map(|alias| alias.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            println!("{} (aliases: {aliases})", entry.primary);
        }
    }
    Ok(())
}

pub(crate) fn cmd_accessors() -> Result<()> {
    let registry = global::snapshot();
    for name in registry.accessor_names() {
        println!("{name}");
    }
    Ok(())
}
