use anyhow::Result;

use super::util::{parse_cli_payload, render_then};
use tagres::global;

pub(crate) fn cmd_eval(
    constructor: &str,
    value: Option<&str>,
    checks: &[String],
    thens: &[String],
    pair: bool,
) -> Result<()> {
    let payload = value.map(parse_cli_payload).unwrap_or_default();
    let result = global::construct(constructor, payload)?;

    if pair {
        println!("{}", serde_json::to_string(&result.to_pair())?);
    } else {
        println!("{}", serde_json::to_string(&result.to_mapping())?);
    }
    for accessor in checks {
        println!("{accessor} = {}", global::check(accessor, &result)?);
    }
    for accessor in thens {
        println!("{accessor} = {}", render_then(global::then(accessor, &result)?));
    }
    Ok(())
}
