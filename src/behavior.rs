use crate::{Action, Context, Symbol};
use serde::Deserialize;

/// Index of a behavior in the tree's behavior arena.
pub type BehaviorId = usize;

/// Index of a node in the tree's node arena. Equal to the node's `id`.
pub type NodeId = usize;

type Guard<A> = Box<dyn Fn(&A) -> bool>;

/// A named, fixed-length sequence of logical ticks.
///
/// Structure is fixed once the tree is initialized. The only live part is the
/// guard condition, which reads actor state whenever the behavior is
/// considered as a transition target, active or not.
pub struct Behavior<A> {
    name: Symbol,
    frame_length: u32,
    is_loop: bool,
    input: Option<Symbol>,
    actions: Vec<Box<dyn Action<A>>>,
    condition: Option<Guard<A>>,
}

impl<A> Behavior<A> {
    pub fn new(name: impl Into<Symbol>, frame_length: u32) -> Self {
        Self {
            name: name.into(),
            frame_length,
            is_loop: false,
            input: None,
            actions: vec![],
            condition: None,
        }
    }

    pub fn looping(mut self, is_loop: bool) -> Self {
        self.is_loop = is_loop;
        self
    }

    /// The input symbol that has to be buffered for this behavior to be picked.
    /// Behaviors without one are never picked by input, only started directly.
    pub fn input(mut self, input: impl Into<Symbol>) -> Self {
        self.input = Some(input.into());
        self
    }

    pub fn condition(mut self, condition: impl Fn(&A) -> bool + 'static) -> Self {
        self.condition = Some(Box::new(condition));
        self
    }

    pub fn action(mut self, action: impl Action<A> + 'static) -> Self {
        self.actions.push(Box::new(action));
        self
    }

    pub fn boxed_action(mut self, action: Box<dyn Action<A>>) -> Self {
        self.actions.push(action);
        self
    }

    pub fn name(&self) -> Symbol {
        self.name
    }

    pub fn frame_length(&self) -> u32 {
        self.frame_length
    }

    pub fn is_loop(&self) -> bool {
        self.is_loop
    }

    pub fn input_symbol(&self) -> Option<Symbol> {
        self.input
    }

    pub fn num_actions(&self) -> usize {
        self.actions.len()
    }

    pub fn enter(&mut self, ctx: &mut Context<A>) {
        for action in &mut self.actions {
            action.on_enter(ctx);
        }
    }

    /// Ticks every action in declaration order. Later actions see whatever
    /// earlier ones wrote to the actor during the same tick.
    pub fn tick(&mut self, ctx: &mut Context<A>, frame: u32) {
        for action in &mut self.actions {
            action.on_tick(ctx, frame);
        }
    }

    pub fn exit(&mut self, ctx: &mut Context<A>) {
        for action in &mut self.actions {
            action.on_exit(ctx);
        }
    }

    pub fn check_condition(&self, actor: &A) -> bool {
        self.condition
            .as_ref()
            .map_or(true, |condition| condition(actor))
    }
}

impl<A> std::fmt::Debug for Behavior<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Behavior")
            .field("name", &self.name)
            .field("frame_length", &self.frame_length)
            .field("is_loop", &self.is_loop)
            .field("input", &self.input)
            .field("actions", &self.actions.len())
            .finish()
    }
}

/// A node record as supplied by a [`crate::NodeSource`].
///
/// `name` is matched against behavior names when the tree is initialized.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NodeDef {
    pub id: usize,
    pub name: String,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub children: Vec<usize>,
}

impl NodeDef {
    pub fn new(id: usize, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            priority: 0,
            children: vec![],
        }
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = usize>) -> Self {
        self.children = children.into_iter().collect();
        self
    }
}

/// A vertex of the transition graph after its behavior has been resolved.
///
/// Edges are plain indices into the same node arena, so combo chains that
/// loop back through `"Default"` need no shared ownership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub(crate) id: NodeId,
    pub(crate) name: Symbol,
    pub(crate) behavior: BehaviorId,
    pub(crate) priority: i32,
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> Symbol {
        self.name
    }

    pub fn behavior(&self) -> BehaviorId {
        self.behavior
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}
