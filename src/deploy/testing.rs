//! Test doubles for the git seam.

use crate::utils::{exec::ExecError, fs::is_empty_dir, git::GitRunner};
use std::{cell::RefCell, collections::HashMap, io, path::Path};

/// Records every git invocation and fails the scripted ones.
#[derive(Debug, Default)]
pub struct RecordingGit {
    commands: RefCell<Vec<String>>,
    failures: HashMap<String, String>,
    spawn_errors: Vec<String>,
    /// For each `git init`: whether its directory was empty.
    init_saw_empty: RefCell<Vec<bool>>,
}

impl RecordingGit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `command` (args joined by spaces) exit non-zero with `message`.
    pub fn fail_on(mut self, command: &str, message: &str) -> Self {
        self.failures.insert(command.to_owned(), message.to_owned());
        self
    }

    /// Make `command` fail as if git could not be started.
    pub fn spawn_error_on(mut self, command: &str) -> Self {
        self.spawn_errors.push(command.to_owned());
        self
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.borrow().clone()
    }

    pub fn init_saw_empty(&self) -> Vec<bool> {
        self.init_saw_empty.borrow().clone()
    }
}

impl GitRunner for RecordingGit {
    fn git(&self, dir: &Path, args: &[&str]) -> Result<String, ExecError> {
        let command = args.join(" ");
        self.commands.borrow_mut().push(command.clone());

        if args.first() == Some(&"init") {
            self.init_saw_empty
                .borrow_mut()
                .push(is_empty_dir(dir).unwrap_or(false));
        }
        if self.spawn_errors.contains(&command) {
            return Err(ExecError::Spawn {
                name: "git".into(),
                source: io::Error::new(io::ErrorKind::NotFound, "git not found"),
            });
        }
        match self.failures.get(&command) {
            Some(message) => Err(ExecError::Failed {
                name: "git".into(),
                status: "exit status: 1".into(),
                message: message.clone(),
            }),
            None => Ok(String::new()),
        }
    }
}
