use crate::{Action, ActorState, CancelWindow, SetFlag};
use serde::Deserialize;
use serde_yaml::Value;
use std::{collections::HashMap, str::FromStr};

/// Scalar parameters of a data-driven action, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Params(HashMap<String, Value>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Reads a scalar parameter and parses it, whether it was written as a
    /// string or as a bare number or boolean.
    pub fn get_parse<T: FromStr>(&self, key: &str) -> Option<T> {
        match self.0.get(key)? {
            Value::String(s) => s.trim().parse().ok(),
            Value::Number(n) => n.to_string().parse().ok(),
            Value::Bool(b) => b.to_string().parse().ok(),
            _ => None,
        }
    }
}

type Constructor<A> = Box<dyn Fn(&Params) -> Option<Box<dyn Action<A>>>>;

fn boxify<A, T>(cons: impl (Fn(&Params) -> Option<T>) + 'static) -> Constructor<A>
where
    T: Action<A> + 'static,
{
    Box::new(move |params| cons(params).map(|action| Box::new(action) as Box<dyn Action<A>>))
}

/// Maps action type names used in definition files to constructors.
pub struct Registry<A> {
    action_types: HashMap<String, Constructor<A>>,
}

impl<A> Registry<A> {
    /// A registry without any action types, not even the built-in ones.
    pub fn empty() -> Self {
        Self {
            action_types: HashMap::new(),
        }
    }

    pub fn register<T>(
        &mut self,
        type_name: impl ToString,
        constructor: impl (Fn(&Params) -> Option<T>) + 'static,
    ) where
        T: Action<A> + 'static,
    {
        self.action_types
            .insert(type_name.to_string(), boxify(constructor));
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.action_types.contains_key(type_name)
    }

    /// Returns `None` when the type is unknown, `Some(None)` when it is known
    /// but rejected the params.
    pub fn build(&self, type_name: &str, params: &Params) -> Option<Option<Box<dyn Action<A>>>> {
        self.action_types
            .get(type_name)
            .map(|constructor| constructor(params))
    }
}

impl<A: ActorState> Default for Registry<A> {
    fn default() -> Self {
        let mut ret = Self::empty();
        ret.register("SetFlag", |params| {
            Some(SetFlag::new(
                params.get_str("flag")?,
                params.get_parse("from").unwrap_or(1),
                params.get_parse("to")?,
            ))
        });
        ret.register("CancelWindow", |params| {
            Some(CancelWindow {
                from: params.get_parse("from")?,
            })
        });
        ret
    }
}
