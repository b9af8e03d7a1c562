//! Best-effort spoken summaries.

use std::{
    io,
    process::{Command, ExitStatus, Stdio},
    thread::{self, JoinHandle},
};

use tracing::debug;

use crate::Config;

/// Accepts a sentence and speaks it. Never reports failure.
pub trait SpeechSink: Send + Sync + std::fmt::Debug {
    fn speak(&self, text: &str);
}

/// Runs an external text-to-speech program with the sentence as last argument.
/// The child is reaped on a background thread; the caller never waits for it.
#[derive(Debug, Clone)]
pub struct CommandSpeech {
    program: String,
    args: Vec<String>,
}

impl CommandSpeech {
    /// `command` is split on whitespace, e.g. `"espeak -s 150"`.
    /// Returns `None` for a blank command.
    pub fn parse(command: &str) -> Option<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl CommandSpeech {
    fn launch(&self, text: &str) -> io::Result<JoinHandle<io::Result<ExitStatus>>> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        let program = self.program.clone();
        Ok(thread::spawn(move || {
            child.wait().inspect_err(|e| {
                debug!(program = %program, error = %e, "speech command could not be awaited");
            })
        }))
    }
}

impl SpeechSink for CommandSpeech {
    fn speak(&self, text: &str) {
        if let Err(e) = self.launch(text) {
            debug!(program = %self.program, error = %e, "speech command failed to start");
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SilentSpeech;

impl SpeechSink for SilentSpeech {
    fn speak(&self, _text: &str) {}
}

pub fn speech_from_config(config: &Config) -> Box<dyn SpeechSink> {
    match config.speech_command.as_deref().and_then(CommandSpeech::parse) {
        Some(cmd) => Box::new(cmd),
        None => Box::new(SilentSpeech),
    }
}
