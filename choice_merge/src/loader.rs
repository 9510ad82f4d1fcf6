//! Reading and writing event command lists.
//!
//! JSON is the host engine's native event format. Files may hold either a bare array of
//! commands or an event object with a `list` field (common events and event pages).
//! Files with a `.ron` extension are read and written as a bare RON list instead.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use choice_data::Command;
use log::info;
use serde_json::Value;

/// Decode each command on its own so a bad entry is reported by position.
fn decode_list(values: Vec<Value>) -> Result<Vec<Command>> {
    values
        .into_iter()
        .enumerate()
        .map(|(position, value)| {
            serde_json::from_value::<Command>(value).with_context(|| format!("decoding command {position}"))
        })
        .collect()
}

fn commands_from_json(value: Value) -> Result<Vec<Command>> {
    match value {
        Value::Array(values) => decode_list(values),
        Value::Object(mut event) => match event.remove("list") {
            Some(Value::Array(values)) => decode_list(values),
            Some(_) => bail!("event 'list' field is not an array"),
            None => bail!("event object has no 'list' field"),
        },
        _ => bail!("expected a command array or an event object with a 'list' field"),
    }
}

fn is_ron(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("ron"))
}

/// Load a command list from a JSON or RON file.
///
/// # Errors
/// Errors bubble up from file IO or deserialization, with the path attached.
pub fn load_commands(path: &Path) -> Result<Vec<Command>> {
    let text = fs::read_to_string(path).with_context(|| format!("reading commands from '{}'", path.display()))?;
    let commands = if is_ron(path) {
        ron::from_str::<Vec<Command>>(&text).with_context(|| format!("parsing command RON from '{}'", path.display()))?
    } else {
        serde_json::from_str::<Value>(&text)
            .map_err(anyhow::Error::from)
            .and_then(commands_from_json)
            .with_context(|| format!("parsing command JSON from '{}'", path.display()))?
    };
    info!("{} commands loaded from '{}'", commands.len(), path.display());
    Ok(commands)
}

/// Write a command list as pretty JSON, or RON for `.ron` paths.
///
/// # Errors
/// Errors bubble up from serialization or file IO, with the path attached.
pub fn write_commands(path: &Path, commands: &[Command]) -> Result<()> {
    let text = if is_ron(path) {
        ron::ser::to_string_pretty(commands, ron::ser::PrettyConfig::default())
            .with_context(|| format!("serializing commands for '{}'", path.display()))?
    } else {
        serde_json::to_string_pretty(commands).with_context(|| format!("serializing commands for '{}'", path.display()))?
    };
    fs::write(path, text).with_context(|| format!("writing commands to '{}'", path.display()))?;
    info!("{} commands written to '{}'", commands.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use choice_data::{CancelSelector, ChoiceParams};

    const EVENT_JSON: &str = r#"[
        {"code": 102, "indent": 0, "parameters": [["Yes", "No"], 1, 0, 2, 0]},
        {"code": 402, "indent": 0, "parameters": [0, "Yes"]},
        {"code": 0, "indent": 1, "parameters": []},
        {"code": 402, "indent": 0, "parameters": [1, "No"]},
        {"code": 0, "indent": 1, "parameters": []},
        {"code": 404, "indent": 0, "parameters": []},
        {"code": 0, "indent": 0, "parameters": []}
    ]"#;

    #[test]
    fn loads_bare_json_list() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("event.json");
        fs::write(&path, EVENT_JSON).expect("write");

        let commands = load_commands(&path).expect("load");
        assert_eq!(commands.len(), 7);
        let params = commands[0].choice_params().expect("menu");
        assert_eq!(params.cancel, CancelSelector::Choice(1));
    }

    #[test]
    fn loads_event_object_with_list() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("common_event.json");
        let wrapped = format!(r#"{{"id": 3, "name": "Shop", "list": {EVENT_JSON}}}"#);
        fs::write(&path, wrapped).expect("write");

        let commands = load_commands(&path).expect("load");
        assert_eq!(commands.len(), 7);
        assert!(commands[5].is_end_choices());
    }

    #[test]
    fn ron_round_trip() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("event.ron");
        let commands = vec![
            Command::open_choices(
                0,
                ChoiceParams {
                    options: vec!["A".into()],
                    ..ChoiceParams::default()
                },
            ),
            Command::option_branch(0, 0, "A"),
            Command::cancel_branch(0, 6),
            Command::end_choices(0),
        ];
        write_commands(&path, &commands).expect("write");
        assert_eq!(load_commands(&path).expect("load"), commands);
    }

    #[test]
    fn json_round_trip() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("event.json");
        fs::write(&path, EVENT_JSON).expect("write");
        let commands = load_commands(&path).expect("load");

        let out = dir.path().join("out.json");
        write_commands(&out, &commands).expect("write");
        assert_eq!(load_commands(&out).expect("reload"), commands);
    }

    #[test]
    fn bad_parameter_is_reported_with_position() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("event.json");
        let bad = r#"[
            {"code": 0, "indent": 0, "parameters": []},
            {"code": 102, "indent": 0, "parameters": [["A"], "never"]}
        ]"#;
        fs::write(&path, bad).expect("write");

        let msg = format!("{:#}", load_commands(&path).unwrap_err());
        assert!(msg.contains("parameter 1"), "{msg}");
        assert!(msg.contains("decoding command 1:"), "{msg}");
        assert!(msg.contains("event.json"), "{msg}");
    }

    #[test]
    fn bad_parameter_inside_event_object_is_reported() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("common_event.json");
        let bad = r#"{"id": 1, "list": [{"code": 402, "indent": 0, "parameters": ["zero", "A"]}]}"#;
        fs::write(&path, bad).expect("write");

        let msg = format!("{:#}", load_commands(&path).unwrap_err());
        assert!(msg.contains("parameter 0"), "{msg}");
    }

    #[test]
    fn rejects_object_without_list() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("map.json");
        fs::write(&path, r#"{"id": 1, "name": "Town"}"#).expect("write");

        let msg = format!("{:#}", load_commands(&path).unwrap_err());
        assert!(msg.contains("'list'"), "{msg}");
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_commands(Path::new("no/such/event.json")).unwrap_err();
        assert!(format!("{err:#}").contains("no/such/event.json"));
    }
}
