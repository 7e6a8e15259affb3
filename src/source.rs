use crate::{Behavior, NodeDef};

/// Supplies every node record of a tree.
pub trait NodeSource {
    fn load_nodes(&mut self) -> Vec<NodeDef>;
}

/// Supplies every behavior of a tree. Behaviors own their actions, so loading
/// hands them over to the tree.
pub trait BehaviorSource<A> {
    fn load_behaviors(&mut self) -> Vec<Behavior<A>>;
}

impl NodeSource for Vec<NodeDef> {
    fn load_nodes(&mut self) -> Vec<NodeDef> {
        self.clone()
    }
}

impl NodeSource for [NodeDef] {
    fn load_nodes(&mut self) -> Vec<NodeDef> {
        self.to_vec()
    }
}

impl<A> BehaviorSource<A> for Vec<Behavior<A>> {
    fn load_behaviors(&mut self) -> Vec<Behavior<A>> {
        std::mem::take(self)
    }
}
