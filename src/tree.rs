use std::collections::HashMap;
use std::time::Duration;

use tracing::{debug, error, trace, warn};

use crate::{
    error::LoadError, Behavior, BehaviorId, BehaviorSource, Context, InputBuffer, Node, NodeDef,
    NodeId, NodeSource, Symbol, TreeConfig, DEFAULT_BEHAVIOR,
};

/// The per-actor orchestrator.
///
/// Owns the node and behavior arenas and the execution pointer into them,
/// and turns wall-clock time into fixed logical steps. Everything happens
/// synchronously inside [`Self::advance_time`]; the actor and the input buffer
/// are lent to the tree for the duration of each call.
pub struct BehaviorTree<A> {
    config: TreeConfig,
    tick_interval: Duration,
    nodes: Vec<Node>,
    behaviors: Vec<Behavior<A>>,
    default_behavior: Option<BehaviorId>,
    current_behavior: Option<BehaviorId>,
    current_node: NodeId,
    current_frame: u32,
    accumulator: Duration,
    can_cancel: bool,
}

impl<A> BehaviorTree<A> {
    pub fn new(config: TreeConfig) -> Self {
        Self {
            config,
            tick_interval: config.tick_interval(),
            nodes: vec![],
            behaviors: vec![],
            default_behavior: None,
            current_behavior: None,
            current_node: 0,
            current_frame: 1,
            accumulator: Duration::ZERO,
            can_cancel: false,
        }
    }

    /// Loads nodes and behaviors, resolves every node to its behavior and
    /// starts `"Default"`.
    ///
    /// A node resolves to the behavior with the same name, or failing that,
    /// to the behavior named like the node without its trailing digits
    /// (`Dash1`, `Dash2` -> `Dash`). On error the tree is left uninitialized.
    pub fn initialize(
        &mut self,
        node_source: &mut (impl NodeSource + ?Sized),
        behavior_source: &mut (impl BehaviorSource<A> + ?Sized),
        actor: &mut A,
    ) -> Result<(), LoadError> {
        let behaviors = behavior_source.load_behaviors();
        let nodes = node_source.load_nodes();
        self.load(nodes, behaviors, actor)
    }

    /// Same as [`Self::initialize`] for a source that provides both
    /// collections, such as [`crate::YamlSource`].
    pub fn initialize_from<S>(&mut self, source: &mut S, actor: &mut A) -> Result<(), LoadError>
    where
        S: NodeSource + BehaviorSource<A> + ?Sized,
    {
        let behaviors = source.load_behaviors();
        let nodes = source.load_nodes();
        self.load(nodes, behaviors, actor)
    }

    fn load(
        &mut self,
        nodes: Vec<NodeDef>,
        behaviors: Vec<Behavior<A>>,
        actor: &mut A,
    ) -> Result<(), LoadError> {
        let (nodes, default_behavior) = link(nodes, &behaviors).map_err(|err| {
            error!(error = %err, "behavior_tree_load_failed");
            err
        })?;

        if let Some(current) = self.current_behavior.take() {
            self.behaviors[current].exit(&mut Context::new(actor, &mut self.can_cancel));
        }

        debug!(
            nodes = nodes.len(),
            behaviors = behaviors.len(),
            "behavior_tree_loaded"
        );
        self.nodes = nodes;
        self.behaviors = behaviors;
        self.default_behavior = Some(default_behavior);
        self.current_node = 0;
        self.current_frame = 1;
        self.accumulator = Duration::ZERO;
        self.start_behavior(Some(default_behavior), actor);
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.current_behavior.is_some()
    }

    /// Feeds wall-clock time into the tree and runs one logical step for
    /// every whole tick interval the accumulated time exceeds.
    ///
    /// Leftover time is carried over to the next call, never dropped.
    /// Returns the number of logical steps that were run.
    pub fn advance_time<I>(&mut self, delta: Duration, actor: &mut A, input: &I) -> u32
    where
        I: InputBuffer + ?Sized,
    {
        debug_assert!(
            self.is_initialized(),
            "advance_time called before the behavior tree was initialized"
        );
        if !self.is_initialized() {
            error!("advance_time_before_initialize");
            return 0;
        }

        let Some(accumulated) = self.accumulator.checked_add(delta) else {
            error!(
                accumulated = ?self.accumulator,
                delta = ?delta,
                "accumulated_time_overflow"
            );
            return 0;
        };
        self.accumulator = accumulated;

        let mut steps = 0;
        while self.accumulator > self.tick_interval {
            self.step(actor, input);
            self.accumulator -= self.tick_interval;
            steps += 1;
        }
        steps
    }

    /// [`Self::advance_time`] for callers that keep frame time in seconds.
    /// Negative, non-finite or unrepresentably large deltas count as no time
    /// at all.
    pub fn advance_time_secs<I>(&mut self, delta_secs: f32, actor: &mut A, input: &I) -> u32
    where
        I: InputBuffer + ?Sized,
    {
        let delta = match Duration::try_from_secs_f32(delta_secs) {
            Ok(delta) => delta,
            Err(_) => {
                warn!(delta_secs, "invalid_frame_delta_ignored");
                Duration::ZERO
            }
        };
        self.advance_time(delta, actor, input)
    }

    /// Runs one logical step: transition check, tick dispatch, then
    /// advance or terminate.
    ///
    /// The whole step is skipped when the execution pointer does not name a
    /// node.
    pub fn step<I>(&mut self, actor: &mut A, input: &I)
    where
        I: InputBuffer + ?Sized,
    {
        debug_assert!(
            self.is_initialized(),
            "step called before the behavior tree was initialized"
        );

        if self.current_node >= self.nodes.len() {
            error!(
                node_index = self.current_node,
                nodes = self.nodes.len(),
                "current_node_index_out_of_range"
            );
            return;
        }

        if let Some(next) = self.try_get_next_behavior(actor, input) {
            self.start_behavior(Some(next), actor);
        }

        let Some(current) = self.current_behavior else {
            error!("step_without_active_behavior");
            return;
        };

        let frame = self.current_frame;
        let behavior = &mut self.behaviors[current];
        trace!(behavior = %behavior.name(), frame, "behavior_tick");
        behavior.tick(&mut Context::new(actor, &mut self.can_cancel), frame);

        self.current_frame += 1;
        if self.current_frame > behavior.frame_length() {
            if behavior.is_loop() {
                self.current_frame = 1;
            } else {
                self.end_behavior(actor);
            }
        }
    }

    fn end_behavior(&mut self, actor: &mut A) {
        if self.default_behavior.is_none() {
            let default = *DEFAULT_BEHAVIOR;
            error!(default = %default, "default_behavior_missing");
            self.current_frame = 1;
            return;
        }
        self.start_behavior(self.default_behavior, actor);
    }

    /// Picks the behavior to transition to from the current node, if any.
    ///
    /// A child node is a candidate when its behavior's input symbol is
    /// buffered and its guard condition holds. The highest priority wins and
    /// the first candidate seen keeps ties. On a selection the execution
    /// pointer moves to the selected node, so the result must be handed to
    /// [`Self::start_behavior`].
    pub(crate) fn try_get_next_behavior<I>(&mut self, actor: &A, input: &I) -> Option<BehaviorId>
    where
        I: InputBuffer + ?Sized,
    {
        if self.nodes.is_empty() {
            error!("no_behavior_nodes_to_select_from");
            return None;
        }

        let Some(node) = self.nodes.get(self.current_node) else {
            error!(
                node_index = self.current_node,
                nodes = self.nodes.len(),
                "current_node_index_out_of_range"
            );
            return None;
        };

        let mut selected: Option<&Node> = None;
        for &child in &node.children {
            let Some(candidate) = self.nodes.get(child) else {
                error!(node = %node.name, child, "child_node_out_of_range");
                continue;
            };
            let Some(behavior) = self.behaviors.get(candidate.behavior) else {
                error!(node = %candidate.name, "node_behavior_out_of_range");
                continue;
            };
            let Some(symbol) = behavior.input_symbol() else {
                continue;
            };
            if !input.is_buffered(symbol) || !behavior.check_condition(actor) {
                continue;
            }
            if selected.map_or(true, |best| candidate.priority > best.priority) {
                selected = Some(candidate);
            }
        }

        let (node_id, behavior_id, node_name) = selected.map(|n| (n.id, n.behavior, n.name))?;
        debug!(from = %node.name, to = %node_name, "behavior_transition");
        self.current_node = node_id;
        Some(behavior_id)
    }

    /// Replaces the active behavior. `None` leaves the current one running.
    ///
    /// The outgoing behavior gets its exit call, the frame counter restarts at
    /// 1, the new behavior is entered and the cancel flag is cleared. Starting
    /// `"Default"` also moves the execution pointer back to node 0.
    pub fn start_behavior(&mut self, behavior: Option<BehaviorId>, actor: &mut A) {
        let Some(next) = behavior else {
            return;
        };
        if next >= self.behaviors.len() {
            error!(
                behavior_id = next,
                behaviors = self.behaviors.len(),
                "start_behavior_out_of_range"
            );
            return;
        }

        if let Some(previous) = self.current_behavior.take() {
            self.behaviors[previous].exit(&mut Context::new(actor, &mut self.can_cancel));
        }

        self.current_frame = 1;
        self.current_behavior = Some(next);
        self.behaviors[next].enter(&mut Context::new(actor, &mut self.can_cancel));
        self.can_cancel = false;

        if self.default_behavior == Some(next) {
            self.current_node = 0;
        }
        debug!(behavior = %self.behaviors[next].name(), "behavior_started");
    }

    pub fn behavior_id(&self, name: &str) -> Option<BehaviorId> {
        self.behaviors.iter().position(|b| b.name() == name)
    }

    pub fn config(&self) -> TreeConfig {
        self.config
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Time carried over towards the next logical step.
    pub fn accumulated_time(&self) -> Duration {
        self.accumulator
    }

    pub fn current_behavior(&self) -> Option<&Behavior<A>> {
        self.current_behavior.map(|id| &self.behaviors[id])
    }

    pub fn current_behavior_id(&self) -> Option<BehaviorId> {
        self.current_behavior
    }

    pub fn current_node(&self) -> NodeId {
        self.current_node
    }

    /// The frame the active behavior will be ticked with next.
    pub fn current_frame(&self) -> u32 {
        self.current_frame
    }

    /// Whether external systems may interrupt the active behavior.
    pub fn can_cancel(&self) -> bool {
        self.can_cancel
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn behaviors(&self) -> &[Behavior<A>] {
        &self.behaviors
    }
}

/// Validates the definitions and builds the node arena, returning it with
/// the id of the `"Default"` behavior.
fn link<A>(
    mut defs: Vec<NodeDef>,
    behaviors: &[Behavior<A>],
) -> Result<(Vec<Node>, BehaviorId), LoadError> {
    if behaviors.is_empty() {
        return Err(LoadError::EmptyBehaviors);
    }
    if defs.is_empty() {
        return Err(LoadError::EmptyNodes);
    }

    let mut by_name: HashMap<&'static str, BehaviorId> = HashMap::new();
    for (id, behavior) in behaviors.iter().enumerate() {
        if behavior.frame_length() == 0 {
            return Err(LoadError::ZeroFrameLength(behavior.name().to_string()));
        }
        if by_name.insert(behavior.name().as_str(), id).is_some() {
            return Err(LoadError::DuplicateBehavior(behavior.name().to_string()));
        }
    }

    let default_behavior = *by_name
        .get(DEFAULT_BEHAVIOR.as_str())
        .ok_or(LoadError::MissingDefault)?;

    defs.sort_by_key(|def| def.id);
    let count = defs.len();

    defs.into_iter()
        .enumerate()
        .map(|(position, def)| {
            if def.id != position {
                return Err(LoadError::NodeIdMismatch {
                    node: def.name,
                    id: def.id,
                    position,
                });
            }
            if let Some(&child) = def.children.iter().find(|&&child| child >= count) {
                return Err(LoadError::UnknownChild {
                    node: def.name,
                    child,
                });
            }
            let behavior = resolve_behavior(&def.name, &by_name).ok_or_else(|| {
                LoadError::UnresolvedBehavior {
                    node: def.name.clone(),
                }
            })?;
            Ok(Node {
                id: def.id,
                name: Symbol::from(&def.name),
                behavior,
                priority: def.priority,
                children: def.children,
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(|nodes| (nodes, default_behavior))
}

fn resolve_behavior(name: &str, by_name: &HashMap<&'static str, BehaviorId>) -> Option<BehaviorId> {
    by_name
        .get(name)
        .or_else(|| by_name.get(name.trim_end_matches(|c: char| c.is_ascii_digit())))
        .copied()
}
