use super::condition::parse_condition;
use crate::{
    error::LoadYamlError, ActorState, Behavior, BehaviorSource, NodeDef, NodeSource, Params,
    Registry, TreeConfig,
};
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct Document {
    #[serde(default)]
    config: TreeConfig,
    #[serde(default)]
    behaviors: Vec<BehaviorRecord>,
    #[serde(default)]
    nodes: Vec<NodeDef>,
}

#[derive(Debug, Deserialize)]
struct BehaviorRecord {
    name: String,
    frame_length: u32,
    #[serde(default, rename = "loop")]
    is_loop: bool,
    #[serde(default)]
    input: Option<String>,
    #[serde(default)]
    condition: Option<String>,
    #[serde(default)]
    actions: Vec<ActionRecord>,
}

#[derive(Debug, Deserialize)]
struct ActionRecord {
    #[serde(rename = "type")]
    ty: String,
    #[serde(default)]
    params: Params,
}

/// Node and behavior definitions read from one YAML document.
///
/// Actions are instantiated through a [`Registry`] while parsing, so every
/// unknown action type or bad parameter is reported before the tree ever
/// sees the definitions.
pub struct YamlSource<A> {
    config: TreeConfig,
    nodes: Vec<NodeDef>,
    behaviors: Vec<Behavior<A>>,
}

impl<A: ActorState> YamlSource<A> {
    pub fn parse(yaml: &str, registry: &Registry<A>) -> Result<Self, LoadYamlError> {
        let document: Document = serde_yaml::from_str(yaml)?;

        let behaviors = document
            .behaviors
            .into_iter()
            .map(|record| build_behavior(record, registry))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(
            behaviors = behaviors.len(),
            nodes = document.nodes.len(),
            "yaml_source_parsed"
        );

        Ok(Self {
            config: document.config,
            nodes: document.nodes,
            behaviors,
        })
    }
}

impl<A> YamlSource<A> {
    /// The `config` section of the document, or the default configuration.
    pub fn config(&self) -> TreeConfig {
        self.config
    }
}

fn build_behavior<A: ActorState>(
    record: BehaviorRecord,
    registry: &Registry<A>,
) -> Result<Behavior<A>, LoadYamlError> {
    let mut behavior = Behavior::new(record.name.as_str(), record.frame_length).looping(record.is_loop);

    if let Some(input) = record.input {
        behavior = behavior.input(input);
    }

    if let Some(expr) = record.condition {
        let condition =
            parse_condition(&expr).map_err(|source| LoadYamlError::Condition {
                behavior: record.name.clone(),
                source,
            })?;
        behavior = behavior.condition(move |actor: &A| condition.eval(actor));
    }

    for action in record.actions {
        let built = registry
            .build(&action.ty, &action.params)
            .ok_or_else(|| LoadYamlError::MissingAction {
                behavior: record.name.clone(),
                action: action.ty.clone(),
            })?
            .ok_or_else(|| LoadYamlError::InvalidParams {
                behavior: record.name.clone(),
                action: action.ty.clone(),
            })?;
        behavior = behavior.boxed_action(built);
    }

    Ok(behavior)
}

impl<A> NodeSource for YamlSource<A> {
    fn load_nodes(&mut self) -> Vec<NodeDef> {
        self.nodes.clone()
    }
}

impl<A> BehaviorSource<A> for YamlSource<A> {
    fn load_behaviors(&mut self) -> Vec<Behavior<A>> {
        std::mem::take(&mut self.behaviors)
    }
}

#[cfg(test)]
mod test;
