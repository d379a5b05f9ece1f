use serde::Serialize;

/// Print one JSON document to stdout — the hook response protocol.
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string(value)?;
    println!("{}", json);
    Ok(())
}
