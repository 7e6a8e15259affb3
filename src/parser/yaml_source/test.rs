use super::*;
use crate::{Context, Symbol};
use std::collections::HashMap;

type Flags = HashMap<Symbol, bool>;

const COMBO: &str = r#"
config:
  tick_rate: 30
behaviors:
  - name: Default
    frame_length: 1
    loop: true
  - name: Attack
    frame_length: 4
    input: A
    condition: grounded && !stunned
    actions:
      - type: SetFlag
        params: { flag: hitbox, from: 2, to: 3 }
      - type: CancelWindow
        params: { from: 3 }
nodes:
  - { id: 1, name: Attack1, priority: 1, children: [0] }
  - { id: 0, name: Default, children: [1] }
"#;

#[test]
fn test_parse_combo() {
    let mut source = YamlSource::<Flags>::parse(COMBO, &Registry::default()).unwrap();
    assert_eq!(source.config(), TreeConfig::new(30));

    let nodes = source.load_nodes();
    assert_eq!(
        nodes,
        vec![
            NodeDef::new(1, "Attack1").priority(1).children([0]),
            NodeDef::new(0, "Default").children([1]),
        ]
    );

    let behaviors = source.load_behaviors();
    assert_eq!(behaviors.len(), 2);
    assert_eq!(behaviors[0].name(), "Default");
    assert!(behaviors[0].is_loop());
    assert_eq!(behaviors[0].input_symbol(), None);

    let attack = &behaviors[1];
    assert_eq!(attack.frame_length(), 4);
    assert!(!attack.is_loop());
    assert_eq!(attack.input_symbol(), Some(Symbol::from("A")));
    assert_eq!(attack.num_actions(), 2);

    // Behaviors are handed over once
    assert!(source.load_behaviors().is_empty());
}

#[test]
fn test_condition_reads_flags() {
    let mut source = YamlSource::<Flags>::parse(COMBO, &Registry::default()).unwrap();
    let behaviors = source.load_behaviors();
    let attack = &behaviors[1];

    let mut flags = Flags::new();
    assert!(!attack.check_condition(&flags));
    flags.insert("grounded".into(), true);
    assert!(attack.check_condition(&flags));
    flags.insert("stunned".into(), true);
    assert!(!attack.check_condition(&flags));

    // No condition means always allowed
    assert!(behaviors[0].check_condition(&flags));
}

#[test]
fn test_actions_are_wired() {
    let mut source = YamlSource::<Flags>::parse(COMBO, &Registry::default()).unwrap();
    let mut behaviors = source.load_behaviors();
    let attack = &mut behaviors[1];
    let hitbox = Symbol::from("hitbox");

    let mut flags = Flags::new();
    let mut can_cancel = false;
    let mut ctx = Context::new(&mut flags, &mut can_cancel);
    attack.enter(&mut ctx);
    attack.tick(&mut ctx, 1);
    assert!(!ctx.actor.flag(hitbox));
    assert!(!ctx.can_cancel());
    attack.tick(&mut ctx, 2);
    assert!(ctx.actor.flag(hitbox));
    attack.tick(&mut ctx, 3);
    assert!(ctx.can_cancel());
    attack.exit(&mut ctx);
    assert!(!ctx.actor.flag(hitbox));
}

#[test]
fn test_missing_action() {
    let yaml = r#"
behaviors:
  - name: Default
    frame_length: 1
    actions:
      - type: Teleport
"#;
    let err = YamlSource::<Flags>::parse(yaml, &Registry::default())
        .err()
        .unwrap();
    assert!(matches!(
        err,
        LoadYamlError::MissingAction { ref behavior, ref action }
            if behavior == "Default" && action == "Teleport"
    ));
}

#[test]
fn test_invalid_params() {
    let yaml = r#"
behaviors:
  - name: Attack
    frame_length: 3
    actions:
      - type: CancelWindow
        params: { from: soon }
"#;
    let err = YamlSource::<Flags>::parse(yaml, &Registry::default())
        .err()
        .unwrap();
    assert!(matches!(err, LoadYamlError::InvalidParams { .. }));
}

#[test]
fn test_bad_condition() {
    let yaml = r#"
behaviors:
  - name: Attack
    frame_length: 3
    condition: grounded &&
"#;
    let err = YamlSource::<Flags>::parse(yaml, &Registry::default())
        .err()
        .unwrap();
    assert!(matches!(err, LoadYamlError::Condition { ref behavior, .. } if behavior == "Attack"));
}

#[test]
fn test_yaml_syntax_error() {
    let err = YamlSource::<Flags>::parse("behaviors: [", &Registry::default())
        .err()
        .unwrap();
    assert!(matches!(err, LoadYamlError::Yaml(_)));
}
