mod condition;
mod yaml_source;

pub use self::{
    condition::{parse_condition, Condition},
    yaml_source::YamlSource,
};
