use anyhow::Context;
use calo_types::RawSignalSet;
use std::io::Read;

/// Read a raw signal snapshot from a file, or from stdin when `source` is `-`.
pub fn read_signals(source: &str) -> anyhow::Result<RawSignalSet> {
    let text = if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read signals from stdin")?;
        buf
    } else {
        std::fs::read_to_string(source)
            .with_context(|| format!("failed to read signals from {source}"))?
    };
    parse_signals(&text).with_context(|| format!("invalid signal snapshot in {source}"))
}

/// Parse a JSON object of raw signals. Blank input is an empty snapshot.
pub fn parse_signals(text: &str) -> anyhow::Result<RawSignalSet> {
    if text.trim().is_empty() {
        return Ok(RawSignalSet::new());
    }
    Ok(serde_json::from_str(text)?)
}
