use anyhow::{anyhow, Result};
use clap::Args;
use std::io::{self, Read, Write};
use tracing::{debug, info};

use crate::config::Config;
use crate::script::{parse_steps, ScriptRunner};

/// Replay a script of interactions and print the state after each step
#[derive(Args, Debug)]
pub struct RunCommand {
    /// Steps: up, down, type:<text>, enter, blur, wait:<ms>, owner:<page>,
    /// pages:<total>. If none are given, whitespace-separated steps are read
    /// from stdin
    pub steps: Vec<String>,

    /// Let the owner accept every notification immediately
    #[arg(short = 'a', long = "ack")]
    pub ack: bool,

    /// Pretty-print each report
    #[arg(long = "pretty")]
    pub pretty: bool,
}

impl RunCommand {
    pub fn execute(&self, config: &Config) -> Result<()> {
        debug!("Executing run command");

        let raw_steps = self.get_steps()?;
        if raw_steps.is_empty() {
            return Err(anyhow!("No steps provided. Use arguments or pipe input via stdin."));
        }

        let steps = parse_steps(&raw_steps)?;
        info!("Replaying {} steps", steps.len());

        let mut runner = ScriptRunner::new(config.props(), config.reconcile_delay(), self.ack);
        let stdout = io::stdout();
        let mut out = stdout.lock();

        for step in &steps {
            let report = runner.apply(step);
            let line = if self.pretty {
                serde_json::to_string_pretty(&report)?
            } else {
                serde_json::to_string(&report)?
            };
            writeln!(out, "{}", line)?;
        }

        Ok(())
    }

    fn get_steps(&self) -> Result<Vec<String>> {
        if !self.steps.is_empty() {
            return Ok(self.steps.clone());
        }

        debug!("Reading steps from stdin");
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| anyhow!("Failed to read from stdin: {}", e))?;
        Ok(buffer.split_whitespace().map(str::to_string).collect())
    }
}
