use std::io::{BufRead, Write};
use std::time::{Duration, Instant};

use anyhow::Context;
use rain_core::{update, AppState, BundleInfo, Msg};
use rain_logging::{rain_debug, rain_warn};

use crate::commands::{parse_line, Command};
use crate::effects::EffectRunner;
use crate::render::render;

const PROMPT: &str = "rain> ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Line-oriented console: each command runs to completion before the next prompt.
pub struct Console<W: Write> {
    state: AppState,
    effects: EffectRunner,
    out: W,
    settle_timeout: Duration,
}

impl<W: Write> Console<W> {
    pub fn new(effects: EffectRunner, out: W, settle_timeout: Duration) -> Self {
        Self {
            state: AppState::new(),
            effects,
            out,
            settle_timeout,
        }
    }

    pub fn restore_recent(&mut self, bundles: Vec<BundleInfo>) {
        if !bundles.is_empty() {
            self.dispatch(Msg::RestoreRecentBundles(bundles));
            self.state.consume_dirty();
        }
    }

    /// Reads commands until `quit` or end of input.
    pub fn run(&mut self, mut input: impl BufRead) -> anyhow::Result<()> {
        let mut line = String::new();
        loop {
            write!(self.out, "{PROMPT}")?;
            self.out.flush()?;

            line.clear();
            if input.read_line(&mut line).context("failed to read command")? == 0 {
                writeln!(self.out)?;
                return Ok(());
            }
            if self.execute_line(&line)? == Flow::Quit {
                return Ok(());
            }
        }
    }

    pub fn execute_line(&mut self, line: &str) -> anyhow::Result<Flow> {
        let Some(command) = parse_line(line) else {
            return Ok(Flow::Continue);
        };

        match command {
            Command::Quit => return Ok(Flow::Quit),
            Command::Print(text) => write!(self.out, "{text}")?,
            Command::Dispatch { msgs, sections } => {
                let view_only = msgs.is_empty();
                for msg in msgs {
                    self.dispatch(msg);
                }
                self.settle();

                if self.state.consume_dirty() || view_only {
                    let text = render(&self.state.view(), &sections);
                    write!(self.out, "{text}")?;
                } else {
                    writeln!(self.out, "Nothing changed.")?;
                }
            }
        }
        self.out.flush()?;
        Ok(Flow::Continue)
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.effects.run(effects);
    }

    /// Applies engine replies until no request is outstanding or the timeout passes.
    fn settle(&mut self) {
        let deadline = Instant::now() + self.settle_timeout;
        while self.state.in_flight() > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                rain_warn!(
                    "Gave up waiting for {} outstanding request(s)",
                    self.state.in_flight()
                );
                let _ = writeln!(
                    self.out,
                    "Still waiting for {} request(s); results will appear with the next command.",
                    self.state.in_flight()
                );
                return;
            }
            if let Some(msg) = self.effects.next_msg(remaining) {
                rain_debug!("Applying reply {:?}", msg);
                self.dispatch(msg);
            }
        }
    }

    #[cfg(test)]
    fn output(&self) -> &W {
        &self.out
    }
}
