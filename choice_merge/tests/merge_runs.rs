use choice_data::{CancelSelector, Command, CommandKind, DefaultSelector};
use choice_merge as cm;
use serde_json::json;

/// Three menus back to back, the first two with cancel branches, then a comment and a
/// fourth menu that must stay separate.
fn shop_event() -> Vec<Command> {
    serde_json::from_value(json!([
        {"code": 101, "indent": 0, "parameters": ["", 0, 0, 2, "Clerk"]},
        {"code": 401, "indent": 0, "parameters": ["What will it be?"]},
        {"code": 102, "indent": 0, "parameters": [["Sword", "Shield"], -1, -1, 2, 0]},
        {"code": 402, "indent": 0, "parameters": [0, "Sword"]},
        {"code": 401, "indent": 1, "parameters": ["A fine blade."]},
        {"code": 0, "indent": 1, "parameters": []},
        {"code": 402, "indent": 0, "parameters": [1, "Shield"]},
        {"code": 401, "indent": 1, "parameters": ["Sturdy oak."]},
        {"code": 0, "indent": 1, "parameters": []},
        {"code": 403, "indent": 0, "parameters": [6, null]},
        {"code": 401, "indent": 1, "parameters": ["Leaving already?"]},
        {"code": 0, "indent": 1, "parameters": []},
        {"code": 404, "indent": 0, "parameters": []},
        {"code": 102, "indent": 0, "parameters": [["Potion"], 0, 0, 1, 1]},
        {"code": 402, "indent": 0, "parameters": [0, "Potion"]},
        {"code": 401, "indent": 1, "parameters": ["Heals a little."]},
        {"code": 0, "indent": 1, "parameters": []},
        {"code": 403, "indent": 0, "parameters": [6, null]},
        {"code": 401, "indent": 1, "parameters": ["Second cancel."]},
        {"code": 0, "indent": 1, "parameters": []},
        {"code": 404, "indent": 0, "parameters": []},
        {"code": 102, "indent": 0, "parameters": [["Ether", "Elixir"], -2, -1, 0, 2]},
        {"code": 402, "indent": 0, "parameters": [0, "Ether"]},
        {"code": 0, "indent": 1, "parameters": []},
        {"code": 402, "indent": 0, "parameters": [1, "Elixir"]},
        {"code": 0, "indent": 1, "parameters": []},
        {"code": 404, "indent": 0, "parameters": []},
        {"code": 108, "indent": 0, "parameters": ["separate menu"]},
        {"code": 102, "indent": 0, "parameters": [["Yes", "No"], 1, 0, 2, 0]},
        {"code": 402, "indent": 0, "parameters": [0, "Yes"]},
        {"code": 0, "indent": 1, "parameters": []},
        {"code": 402, "indent": 0, "parameters": [1, "No"]},
        {"code": 0, "indent": 1, "parameters": []},
        {"code": 404, "indent": 0, "parameters": []},
        {"code": 0, "indent": 0, "parameters": []}
    ]))
    .expect("event decodes")
}

const SHOP_MENU: usize = 2;

fn merge_shop() -> (Vec<Command>, cm::MergedChoices) {
    let event = shop_event();
    let params = event[SHOP_MENU].choice_params().cloned().expect("menu");
    let merged = cm::merge_choices(&event, SHOP_MENU, &params);
    (event, merged)
}

#[test]
fn options_concatenate_in_block_order() {
    let (_, merged) = merge_shop();
    assert_eq!(merged.blocks, 3);
    assert_eq!(
        merged.params.options,
        vec!["Sword", "Shield", "Potion", "Ether", "Elixir"]
    );
}

#[test]
fn option_branches_are_numbered_without_gaps() {
    let (_, merged) = merge_shop();
    let indices: Vec<_> = merged
        .commands
        .iter()
        .filter_map(|c| match &c.kind {
            CommandKind::OptionBranch(b) => Some(b.index),
            _ => None,
        })
        .collect();
    // the separate menu after the comment keeps its own numbering
    assert_eq!(indices, vec![0, 1, 2, 3, 4, 0, 1]);
}

#[test]
fn branch_cancel_and_first_default_win() {
    let (_, merged) = merge_shop();
    assert_eq!(merged.params.cancel, CancelSelector::Branch);
    // first menu has no default, second picks its option 0 at offset 2
    assert_eq!(merged.params.default, DefaultSelector::Choice(2));
    let first = shop_event()[SHOP_MENU].choice_params().cloned().expect("menu");
    assert_eq!(merged.params.position, first.position);
    assert_eq!(merged.params.background, first.background);
}

#[test]
fn second_cancel_branch_is_removed_with_its_body() {
    let (event, merged) = merge_shop();
    let cancels = merged.commands.iter().filter(|c| c.is_cancel_branch()).count();
    assert_eq!(cancels, 1);
    let lines: Vec<_> = merged
        .commands
        .iter()
        .filter(|c| c.code() == 401)
        .filter_map(|c| match &c.kind {
            CommandKind::Other { parameters, .. } => parameters[0].as_str().map(str::to_string),
            _ => None,
        })
        .collect();
    assert!(lines.contains(&"Leaving already?".to_string()));
    assert!(!lines.contains(&"Second cancel.".to_string()));
    // two end/open pairs plus the second cancel branch and its two body commands
    assert_eq!(merged.removed, 7);
    assert_eq!(merged.commands.len(), event.len() - 7);
}

#[test]
fn authored_event_is_unchanged() {
    let event = shop_event();
    let before = serde_json::to_string(&event).expect("encode");
    let params = event[SHOP_MENU].choice_params().cloned().expect("menu");
    let _ = cm::merge_choices(&event, SHOP_MENU, &params);
    let _ = cm::merge_all_choices(&event);
    assert_eq!(serde_json::to_string(&event).expect("encode"), before);
}

#[test]
fn single_menu_run_is_identity() {
    let event = shop_event();
    let separate = 28;
    let params = event[separate].choice_params().cloned().expect("menu");
    let merged = cm::merge_choices(&event, separate, &params);
    assert_eq!(merged.blocks, 1);
    assert_eq!(merged.removed, 0);
    assert_eq!(merged.params, params);
    assert_eq!(merged.commands, event);
}

#[test]
fn event_run_shows_one_menu() {
    let event = shop_event();
    let pipeline = cm::ChoicePipeline::with_merger(cm::MergeConfig::default());
    let mut run = cm::EventRun::at(&event, SHOP_MENU);
    let shown = run.setup_choices(&pipeline).expect("setup").expect("menu");
    assert_eq!(shown.options.len(), 5);
    assert_eq!(run.commands().iter().filter(|c| c.is_open_choices()).count(), 2);
}

#[test]
fn rewrite_encodes_merged_menu_for_the_host() {
    let rewritten = cm::merge_all_choices(&shop_event());
    let encoded = serde_json::to_value(&rewritten[SHOP_MENU]).expect("encode");
    assert_eq!(
        encoded,
        json!({
            "code": 102,
            "indent": 0,
            "parameters": [["Sword", "Shield", "Potion", "Ether", "Elixir"], -2, 2, 2, 0]
        })
    );
}

#[test]
fn scan_terminates_on_truncated_lists() {
    let event = shop_event();
    for cut in 0..event.len() {
        let truncated = &event[..cut];
        let _ = cm::merge_all_choices(truncated);
        if cut > SHOP_MENU {
            let params = truncated[SHOP_MENU].choice_params().cloned().expect("menu");
            let merged = cm::merge_choices(truncated, SHOP_MENU, &params);
            assert!(merged.commands.len() <= truncated.len());
        }
    }
}
