use ability_behavior_tree::{
    Action, ActorState, Behavior, BehaviorTree, Context, NodeDef, Registry, Symbol, TreeConfig,
    YamlSource,
};
use std::collections::{HashMap, HashSet};

#[derive(Default)]
struct Fighter {
    flags: HashMap<Symbol, bool>,
    velocity: f32,
    move_input: f32,
}

impl ActorState for Fighter {
    fn flag(&self, name: Symbol) -> bool {
        self.flags.get(&name).copied().unwrap_or(false)
    }

    fn set_flag(&mut self, name: Symbol, value: bool) {
        self.flags.insert(name, value);
    }
}

struct Movement {
    speed: f32,
}

impl Action<Fighter> for Movement {
    fn on_tick(&mut self, ctx: &mut Context<Fighter>, _frame: u32) {
        ctx.actor.velocity = ctx.actor.move_input * self.speed;
    }

    fn on_exit(&mut self, ctx: &mut Context<Fighter>) {
        ctx.actor.velocity = 0.;
    }
}

const FIGHTER: &str = r#"
config:
  tick_rate: 30
behaviors:
  - name: Default
    frame_length: 1
    loop: true
    actions:
      - type: Movement
        params: { speed: 4.5 }
  - name: Slash
    frame_length: 6
    input: Attack
    condition: grounded
    actions:
      - type: SetFlag
        params: { flag: hitbox, from: 2, to: 4 }
      - type: CancelWindow
        params: { from: 5 }
  - name: Dash
    frame_length: 3
    input: Dash
nodes:
  - { id: 0, name: Default, children: [1, 3] }
  - { id: 1, name: Slash1, priority: 1, children: [2, 3] }
  - { id: 2, name: Slash2, priority: 1, children: [3] }
  - { id: 3, name: Dash, priority: 5, children: [1] }
"#;

fn fighter_tree(fighter: &mut Fighter) -> anyhow::Result<BehaviorTree<Fighter>> {
    let mut registry = Registry::<Fighter>::default();
    registry.register("Movement", |params| {
        Some(Movement {
            speed: params.get_parse("speed")?,
        })
    });
    let mut source = YamlSource::parse(FIGHTER, &registry)?;
    let mut tree = BehaviorTree::new(source.config());
    tree.initialize_from(&mut source, fighter)?;
    Ok(tree)
}

#[test]
fn test_fighter_combo() -> anyhow::Result<()> {
    let mut fighter = Fighter::default();
    fighter.set_flag("grounded".into(), true);
    fighter.move_input = 1.;
    let mut tree = fighter_tree(&mut fighter)?;
    assert_eq!(tree.config().tick_rate, 30);

    let none: HashSet<Symbol> = HashSet::new();
    let attack: HashSet<Symbol> = ["Attack"].iter().map(Symbol::from).collect();
    let interval = tree.tick_interval();

    // The first interval only fills the accumulator
    tree.advance_time(interval, &mut fighter, &none);
    tree.advance_time(interval, &mut fighter, &none);
    assert_eq!(fighter.velocity, 4.5);

    tree.advance_time(interval, &mut fighter, &attack);
    assert_eq!(tree.current_behavior().unwrap().name(), "Slash");
    assert_eq!(tree.current_node(), 1);
    assert_eq!(fighter.velocity, 0.);
    assert!(!fighter.flag("hitbox".into()));

    tree.advance_time(interval, &mut fighter, &none);
    assert!(fighter.flag("hitbox".into()));

    // Pressing again moves along the chain to Slash2, which restarts Slash
    tree.advance_time(interval, &mut fighter, &attack);
    assert_eq!(tree.current_node(), 2);
    assert_eq!(tree.current_frame(), 2);
    assert!(!fighter.flag("hitbox".into()));

    tree.advance_time(interval * 4, &mut fighter, &none);
    assert_eq!(tree.current_frame(), 6);
    assert!(tree.can_cancel());

    tree.advance_time(interval, &mut fighter, &none);
    assert_eq!(tree.current_behavior().unwrap().name(), "Default");
    assert_eq!(tree.current_node(), 0);
    assert!(!tree.can_cancel());
    Ok(())
}

#[test]
fn test_dash_needs_no_ground_and_beats_slash() -> anyhow::Result<()> {
    let mut fighter = Fighter::default();
    let mut tree = fighter_tree(&mut fighter)?;
    let interval = tree.tick_interval();

    let both: Vec<Symbol> = vec!["Attack".into(), "Dash".into()];
    tree.advance_time(interval * 2, &mut fighter, &both);
    assert_eq!(tree.current_behavior().unwrap().name(), "Dash");
    assert_eq!(tree.current_node(), 3);

    // Slash is guarded by the grounded flag
    let attack: Vec<Symbol> = vec!["Attack".into()];
    tree.advance_time(interval, &mut fighter, &attack);
    assert_eq!(tree.current_behavior().unwrap().name(), "Dash");

    fighter.set_flag("grounded".into(), true);
    tree.advance_time(interval, &mut fighter, &attack);
    assert_eq!(tree.current_behavior().unwrap().name(), "Slash");
    assert_eq!(tree.current_node(), 1);
    Ok(())
}

#[test]
fn test_closure_defined_tree() -> anyhow::Result<()> {
    let mut behaviors = vec![
        Behavior::new("Default", 1).looping(true),
        Behavior::new("Attack", 3)
            .input("A")
            .condition(|fighter: &Fighter| fighter.move_input == 0.),
    ];
    let mut nodes = vec![
        NodeDef::new(1, "Attack").priority(1).children([0]),
        NodeDef::new(0, "Default").children([1]),
    ];
    let mut fighter = Fighter::default();
    let mut tree = BehaviorTree::new(TreeConfig::new(60));
    tree.initialize(&mut nodes, &mut behaviors, &mut fighter)?;

    let buffered = [Symbol::from("A")];
    let interval = tree.tick_interval();
    let mut names = vec![];
    for _ in 0..5 {
        tree.advance_time(interval, &mut fighter, &buffered[..]);
        names.push(tree.current_behavior().unwrap().name().as_str());
    }
    assert_eq!(
        names,
        vec!["Default", "Attack", "Attack", "Default", "Attack"]
    );
    Ok(())
}
