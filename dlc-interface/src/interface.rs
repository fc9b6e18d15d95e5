use std::{fmt, str::FromStr};

pub use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{Container, Error, Result};

/// What a configured step does with the container. `Remove` is accepted by
/// config validation but is reserved; inputs currently treat it the same
/// as `Add`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Add,
    Remove,
    Output,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Add => "add",
            Action::Remove => "remove",
            Action::Output => "output",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Action> {
        match s.to_lowercase().as_str() {
            "add" => Ok(Action::Add),
            "remove" => Ok(Action::Remove),
            "output" => Ok(Action::Output),
            _ => Err(Error::other(format!("unknown action: {}", s))),
        }
    }
}

/// A converter that reads some source and contributes entries to the
/// container. Returns the container to use for subsequent steps.
#[async_trait]
pub trait InputConverter: Send + Sync {
    fn type_name(&self) -> &'static str;
    fn action(&self) -> Action;
    fn description(&self) -> &'static str;
    async fn input(&self, container: Container) -> Result<Container>;
}
pub type BoxInput = Box<dyn InputConverter>;

/// A converter that serializes a subset of the container somewhere.
#[async_trait]
pub trait OutputConverter: Send + Sync {
    fn type_name(&self) -> &'static str;
    fn action(&self) -> Action;
    fn description(&self) -> &'static str;
    async fn output(&self, container: &Container) -> Result<()>;
}
pub type BoxOutput = Box<dyn OutputConverter>;
