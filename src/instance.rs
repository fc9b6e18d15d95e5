//! The conversion pipeline: every configured input step runs to
//! completion before any output step begins.

use anyhow::{Context, Result};
use dlc_interface::{Container, Registry};
use tracing::{debug, info};

use crate::config::{Config, ConfigItem};

pub struct Instance {
    config: Config,
    container: Container,
}

impl Instance {
    pub fn new(config: Config) -> Instance {
        Instance {
            config,
            container: Container::new(),
        }
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    /// Run every configured input step in order. Each step receives the
    /// current container and returns the container used from then on.
    pub async fn run_inputs(&mut self, registry: &Registry) -> Result<()> {
        info!("start input processing");
        let total = self.config.input.len();
        for (idx, item) in self.config.input.iter().enumerate() {
            debug!(
                "processing input [{}/{}]: type={}, action={}",
                idx + 1,
                total,
                item.format,
                item.action
            );

            let converter = registry
                .get_input(&item.format)?
                .build(item.action, item.args.clone())
                .with_context(|| step_context("input", item))?;
            self.container = converter
                .input(self.container.clone())
                .await
                .with_context(|| step_context("input", item))?;
        }
        info!("input processing completed");
        Ok(())
    }

    pub async fn run_outputs(&self, registry: &Registry) -> Result<()> {
        info!("start output processing");
        let total = self.config.output.len();
        for (idx, item) in self.config.output.iter().enumerate() {
            debug!(
                "processing output [{}/{}]: type={}, action={}",
                idx + 1,
                total,
                item.format,
                item.action
            );

            let converter = registry
                .get_output(&item.format)?
                .build(item.action, item.args.clone())
                .with_context(|| step_context("output", item))?;
            converter
                .output(&self.container)
                .await
                .with_context(|| step_context("output", item))?;
        }
        info!("output processing completed");
        Ok(())
    }

    pub async fn run(&mut self, registry: &Registry) -> Result<()> {
        self.run_inputs(registry).await?;
        self.run_outputs(registry).await?;
        Ok(())
    }
}

fn step_context(step: &str, item: &ConfigItem) -> String {
    format!(
        "failed to process {} [type: {}, action: {}]",
        step, item.format, item.action
    )
}
