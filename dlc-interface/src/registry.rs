//! An explicit registry mapping config type strings to converter builders.
//!
//! The registry is constructed once by the process entry point, populated
//! with registration calls and passed by reference into the pipeline, so
//! there is no global mutable state and no load-order dependency.

use std::{collections::BTreeMap, fmt};

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{Action, BoxInput, BoxOutput, Error, InputConverter, OutputConverter, Result};

pub trait InputBuilder {
    const NAME: &'static str;
    const DESCRIPTION: &'static str;
    type Config: DeserializeOwned;
    type Converter: InputConverter + Sized + 'static;

    fn build(action: Action, config: Self::Config) -> Result<Self::Converter>;
}

pub trait OutputBuilder {
    const NAME: &'static str;
    const DESCRIPTION: &'static str;
    type Config: DeserializeOwned;
    type Converter: OutputConverter + Sized + 'static;

    fn build(action: Action, config: Self::Config) -> Result<Self::Converter>;
}

/// An omitted `args` blob deserializes like an empty object.
fn or_empty_object(cfg: Value) -> Value {
    if cfg.is_null() {
        Value::Object(serde_json::Map::new())
    } else {
        cfg
    }
}

pub struct InputResolver {
    build: fn(Action, Value) -> Result<BoxInput>,
    description: &'static str,
}

impl InputResolver {
    fn new<B: InputBuilder>() -> Self {
        InputResolver {
            build: |action, cfg| {
                serde_json::from_value(or_empty_object(cfg))
                    .map_err(Error::from)
                    .and_then(|cfg: B::Config| B::build(action, cfg))
                    .map(|converter| Box::new(converter) as BoxInput)
            },
            description: B::DESCRIPTION,
        }
    }
    pub fn build(&self, action: Action, config: Value) -> Result<BoxInput> {
        (self.build)(action, config)
    }
    pub fn description(&self) -> &'static str {
        self.description
    }
}

pub struct OutputResolver {
    build: fn(Action, Value) -> Result<BoxOutput>,
    description: &'static str,
}

impl OutputResolver {
    fn new<B: OutputBuilder>() -> Self {
        OutputResolver {
            build: |action, cfg| {
                serde_json::from_value(or_empty_object(cfg))
                    .map_err(Error::from)
                    .and_then(|cfg: B::Config| B::build(action, cfg))
                    .map(|converter| Box::new(converter) as BoxOutput)
            },
            description: B::DESCRIPTION,
        }
    }
    pub fn build(&self, action: Action, config: Value) -> Result<BoxOutput> {
        (self.build)(action, config)
    }
    pub fn description(&self) -> &'static str {
        self.description
    }
}

pub struct Registry {
    input: BTreeMap<String, InputResolver>,
    output: BTreeMap<String, OutputResolver>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("input", &self.input.keys())
            .field("output", &self.output.keys())
            .finish()
    }
}

impl fmt::Display for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Input")?;
        for (name, resolver) in self.input.iter() {
            writeln!(f, "\t{}: {}", name, resolver.description())?;
        }
        writeln!(f, "Output")?;
        for (name, resolver) in self.output.iter() {
            writeln!(f, "\t{}: {}", name, resolver.description())?;
        }
        Ok(())
    }
}

impl Registry {
    pub fn new() -> Registry {
        Registry {
            input: BTreeMap::new(),
            output: BTreeMap::new(),
        }
    }

    /// Register an input converter builder under its lower-cased name.
    pub fn add_input<B: InputBuilder>(&mut self) {
        self.input
            .insert(B::NAME.to_lowercase(), InputResolver::new::<B>());
    }

    /// Register an output converter builder under its lower-cased name.
    pub fn add_output<B: OutputBuilder>(&mut self) {
        self.output
            .insert(B::NAME.to_lowercase(), OutputResolver::new::<B>());
    }

    pub fn get_input(&self, type_name: &str) -> Result<&InputResolver> {
        self.input
            .get(&type_name.to_lowercase())
            .ok_or_else(|| Error::NotFound(format!("input type is not registered: {}", type_name)))
    }

    pub fn get_output(&self, type_name: &str) -> Result<&OutputResolver> {
        self.output
            .get(&type_name.to_lowercase())
            .ok_or_else(|| Error::NotFound(format!("output type is not registered: {}", type_name)))
    }
}
