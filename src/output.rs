//! Stages rendered files and reconciles them with whatever already exists at
//! the destination.

use crate::config::WritePolicy;
use crate::diff::line_diff;
use crate::error::Error;
use crate::prompt::ConflictPrompt;
use log::info;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

const HELP: &str = "\
y - yes, overwrite
n - no, do not overwrite
a - all, overwrite this and all others
q - quit, abort
d - diff, show the differences between the old and the new
h - help, show this help";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Identical,
    Exists,
    Declined,
    Quit,
    Pretend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    Skipped(SkipReason),
}

impl WriteOutcome {
    /// The user asked to stop the whole run.
    pub fn is_quit(&self) -> bool {
        *self == WriteOutcome::Skipped(SkipReason::Quit)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Choice {
    Yes,
    No,
    All,
    Quit,
    Diff,
    Help,
}

impl Choice {
    fn parse(answer: &str) -> Option<Choice> {
        match answer.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" => Some(Choice::Yes),
            "n" | "no" => Some(Choice::No),
            "a" | "all" => Some(Choice::All),
            "q" | "quit" => Some(Choice::Quit),
            "d" | "diff" => Some(Choice::Diff),
            "h" | "help" => Some(Choice::Help),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConflictState {
    Prompting,
    Diffing,
    Replacing,
    Skipping,
    QuitRequested,
    Done(WriteOutcome),
}

pub struct OutputWriter<P> {
    prompt: P,
}

impl<P: ConflictPrompt> OutputWriter<P> {
    pub fn new(prompt: P) -> Self {
        OutputWriter { prompt }
    }

    pub fn prompt(&self) -> &P {
        &self.prompt
    }

    pub fn write(
        &mut self,
        policy: &mut WritePolicy,
        destination: &Path,
        content: &str,
    ) -> Result<WriteOutcome, Error> {
        if policy.pretend {
            info!("Would write {}.", destination.display());
            return Ok(WriteOutcome::Skipped(SkipReason::Pretend));
        }

        let staged = stage(destination, content)?;

        if !destination.exists() {
            info!("Writing {}.", destination.display());
            commit(staged, destination)?;
            return Ok(WriteOutcome::Written);
        }

        if is_identical(destination, content)? {
            info!("{} is identical, ignoring.", destination.display());
            return Ok(WriteOutcome::Skipped(SkipReason::Identical));
        }

        if policy.skip {
            info!("{} exists, skipping.", destination.display());
            return Ok(WriteOutcome::Skipped(SkipReason::Exists));
        }

        if policy.force {
            info!("Overwriting {}.", destination.display());
            commit(staged, destination)?;
            return Ok(WriteOutcome::Written);
        }

        self.resolve_conflict(policy, staged, destination, content)
    }

    fn resolve_conflict(
        &mut self,
        policy: &mut WritePolicy,
        staged: NamedTempFile,
        destination: &Path,
        content: &str,
    ) -> Result<WriteOutcome, Error> {
        let mut staged = Some(staged);
        let mut state = ConflictState::Prompting;

        loop {
            state = match state {
                ConflictState::Prompting => {
                    let answer = self.prompt.ask(destination)?;
                    match Choice::parse(&answer) {
                        Some(Choice::Yes) => ConflictState::Replacing,
                        Some(Choice::All) => {
                            policy.force = true;
                            ConflictState::Replacing
                        }
                        Some(Choice::No) => ConflictState::Skipping,
                        Some(Choice::Quit) => ConflictState::QuitRequested,
                        Some(Choice::Diff) => ConflictState::Diffing,
                        Some(Choice::Help) | None => {
                            self.prompt.show(HELP);
                            ConflictState::Prompting
                        }
                    }
                }
                ConflictState::Diffing => {
                    match fs::read_to_string(destination) {
                        Ok(current) => {
                            let label = destination.display().to_string();
                            self.prompt.show(&line_diff(&label, &current, content));
                        }
                        Err(err) => self.prompt.show(&format!(
                            "Cannot read {}: {}",
                            destination.display(),
                            err
                        )),
                    }
                    ConflictState::Prompting
                }
                ConflictState::Replacing => {
                    info!("Overwriting {}.", destination.display());
                    if let Some(staged) = staged.take() {
                        commit(staged, destination)?;
                    }
                    ConflictState::Done(WriteOutcome::Written)
                }
                ConflictState::Skipping => {
                    info!("Skipping {}.", destination.display());
                    ConflictState::Done(WriteOutcome::Skipped(SkipReason::Declined))
                }
                ConflictState::QuitRequested => {
                    info!("Skipping {} and exiting.", destination.display());
                    ConflictState::Done(WriteOutcome::Skipped(SkipReason::Quit))
                }
                ConflictState::Done(outcome) => return Ok(outcome),
            };
        }
    }
}

fn stage(destination: &Path, content: &str) -> Result<NamedTempFile, Error> {
    let dir = destination
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    fs::create_dir_all(dir).map_err(|err| Error::write(dir, err))?;
    let mut staged = NamedTempFile::new_in(dir).map_err(|err| Error::write(dir, err))?;
    staged
        .write_all(content.as_bytes())
        .and_then(|_| staged.flush())
        .map_err(|err| Error::write(staged.path(), err))?;
    Ok(staged)
}

fn commit(staged: NamedTempFile, destination: &Path) -> Result<(), Error> {
    staged
        .persist(destination)
        .map(|_| ())
        .map_err(|err| Error::write(destination, err.error))
}

fn is_identical(destination: &Path, content: &str) -> Result<bool, Error> {
    if destination.is_dir() {
        return Ok(false);
    }
    fs::read(destination)
        .map(|current| current == content.as_bytes())
        .map_err(|err| Error::write(destination, err))
}
