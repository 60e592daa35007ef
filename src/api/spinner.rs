//! Progress spinner decorator
//!
//! [`SpinnerApi`] wraps any [`Api`] and shows a short status line on stderr
//! while each call is in flight. It never changes results or errors.

use std::io::IsTerminal;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use super::{Api, ApiError, NewLabel, NewTask, TaskFilter, TaskUpdate};
use crate::domain::{Comment, Label, Page, Project, Section, Task, User};

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Decides whether a spinner may be drawn
#[derive(Debug, Clone, Copy, Default)]
pub struct SpinnerPolicy {
    /// `--no-spinner` was passed
    pub disabled_by_flag: bool,

    /// `spinner = false` in the config file
    pub disabled_by_config: bool,

    /// Output is JSON or NDJSON and must stay clean
    pub machine_output: bool,
}

impl SpinnerPolicy {
    /// Spinners need an interactive terminal and are off in CI or when
    /// `TD_SPINNER=false`.
    pub fn allows(&self, is_tty: bool, env: impl Fn(&str) -> Option<String>) -> bool {
        if !is_tty || self.disabled_by_flag || self.disabled_by_config || self.machine_output {
            return false;
        }
        if env("TD_SPINNER").is_some_and(|v| v == "false") {
            return false;
        }
        env("CI").is_none()
    }

    /// Applies the policy to the terminal the spinner is drawn on (stderr),
    /// so redirecting stdout keeps the spinner.
    pub fn allows_on_stderr(&self, env: impl Fn(&str) -> Option<String>) -> bool {
        self.allows(std::io::stderr().is_terminal(), env)
    }
}

/// Spinner colour, matching the kind of call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tone {
    Read,
    Create,
    Change,
}

impl Tone {
    fn template(&self) -> &'static str {
        match self {
            Tone::Read => "{spinner:.blue} {msg:.blue}",
            Tone::Create => "{spinner:.green} {msg:.green}",
            Tone::Change => "{spinner:.yellow} {msg:.yellow}",
        }
    }
}

pub struct SpinnerApi<A> {
    inner: A,
    enabled: bool,
}

impl<A: Api> SpinnerApi<A> {
    pub fn new(inner: A, enabled: bool) -> Self {
        Self { inner, enabled }
    }

    #[cfg(test)]
    pub(crate) fn inner(&self) -> &A {
        &self.inner
    }

    fn with_spinner<T>(&self, tone: Tone, message: &'static str, call: impl FnOnce(&A) -> T) -> T {
        if !self.enabled {
            return call(&self.inner);
        }

        let bar = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
        if let Ok(style) = ProgressStyle::with_template(tone.template()) {
            bar.set_style(style.tick_strings(TICKS));
        }
        bar.set_message(message);
        bar.enable_steady_tick(Duration::from_millis(80));

        let result = call(&self.inner);
        bar.finish_and_clear();
        result
    }
}

impl<A: Api> Api for SpinnerApi<A> {
    fn get_user(&self) -> Result<User, ApiError> {
        self.with_spinner(Tone::Read, "Checking authentication...", |api| api.get_user())
    }

    fn get_task(&self, id: &str) -> Result<Task, ApiError> {
        self.with_spinner(Tone::Read, "Loading task...", |api| api.get_task(id))
    }

    fn get_tasks(
        &self,
        filter: &TaskFilter,
        cursor: Option<&str>,
        limit: usize,
    ) -> Result<Page<Task>, ApiError> {
        self.with_spinner(Tone::Read, "Loading tasks...", |api| {
            api.get_tasks(filter, cursor, limit)
        })
    }

    fn add_task(&self, task: &NewTask) -> Result<Task, ApiError> {
        self.with_spinner(Tone::Create, "Creating task...", |api| api.add_task(task))
    }

    fn update_task(&self, id: &str, update: &TaskUpdate) -> Result<Task, ApiError> {
        self.with_spinner(Tone::Change, "Updating task...", |api| api.update_task(id, update))
    }

    fn close_task(&self, id: &str) -> Result<(), ApiError> {
        self.with_spinner(Tone::Create, "Completing task...", |api| api.close_task(id))
    }

    fn reopen_task(&self, id: &str) -> Result<(), ApiError> {
        self.with_spinner(Tone::Change, "Reopening task...", |api| api.reopen_task(id))
    }

    fn delete_task(&self, id: &str) -> Result<(), ApiError> {
        self.with_spinner(Tone::Change, "Deleting task...", |api| api.delete_task(id))
    }

    fn get_project(&self, id: &str) -> Result<Project, ApiError> {
        self.with_spinner(Tone::Read, "Loading project...", |api| api.get_project(id))
    }

    fn get_projects(&self, cursor: Option<&str>, limit: usize) -> Result<Page<Project>, ApiError> {
        self.with_spinner(Tone::Read, "Loading projects...", |api| api.get_projects(cursor, limit))
    }

    fn get_section(&self, id: &str) -> Result<Section, ApiError> {
        self.with_spinner(Tone::Read, "Loading section...", |api| api.get_section(id))
    }

    fn get_sections(
        &self,
        project_id: &str,
        cursor: Option<&str>,
        limit: usize,
    ) -> Result<Page<Section>, ApiError> {
        self.with_spinner(Tone::Read, "Loading sections...", |api| {
            api.get_sections(project_id, cursor, limit)
        })
    }

    fn add_section(&self, name: &str, project_id: &str) -> Result<Section, ApiError> {
        self.with_spinner(Tone::Create, "Creating section...", |api| {
            api.add_section(name, project_id)
        })
    }

    fn update_section(&self, id: &str, name: &str) -> Result<Section, ApiError> {
        self.with_spinner(Tone::Change, "Updating section...", |api| api.update_section(id, name))
    }

    fn delete_section(&self, id: &str) -> Result<(), ApiError> {
        self.with_spinner(Tone::Change, "Deleting section...", |api| api.delete_section(id))
    }

    fn get_labels(&self, cursor: Option<&str>, limit: usize) -> Result<Page<Label>, ApiError> {
        self.with_spinner(Tone::Read, "Loading labels...", |api| api.get_labels(cursor, limit))
    }

    fn add_label(&self, label: &NewLabel) -> Result<Label, ApiError> {
        self.with_spinner(Tone::Create, "Creating label...", |api| api.add_label(label))
    }

    fn delete_label(&self, id: &str) -> Result<(), ApiError> {
        self.with_spinner(Tone::Change, "Deleting label...", |api| api.delete_label(id))
    }

    fn get_comments(
        &self,
        task_id: &str,
        cursor: Option<&str>,
        limit: usize,
    ) -> Result<Page<Comment>, ApiError> {
        self.with_spinner(Tone::Read, "Loading comments...", |api| {
            api.get_comments(task_id, cursor, limit)
        })
    }

    fn add_comment(&self, task_id: &str, content: &str) -> Result<Comment, ApiError> {
        self.with_spinner(Tone::Create, "Adding comment...", |api| {
            api.add_comment(task_id, content)
        })
    }

    fn delete_comment(&self, id: &str) -> Result<(), ApiError> {
        self.with_spinner(Tone::Change, "Deleting comment...", |api| api.delete_comment(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockApi;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn spinner_needs_a_terminal() {
        let policy = SpinnerPolicy::default();
        assert!(policy.allows(true, no_env));
        assert!(!policy.allows(false, no_env));
    }

    #[test]
    fn spinner_off_for_flags_and_machine_output() {
        let flag = SpinnerPolicy {
            disabled_by_flag: true,
            ..SpinnerPolicy::default()
        };
        let json = SpinnerPolicy {
            machine_output: true,
            ..SpinnerPolicy::default()
        };
        let config = SpinnerPolicy {
            disabled_by_config: true,
            ..SpinnerPolicy::default()
        };

        assert!(!flag.allows(true, no_env));
        assert!(!json.allows(true, no_env));
        assert!(!config.allows(true, no_env));
    }

    #[test]
    fn terminal_check_follows_stderr() {
        let policy = SpinnerPolicy::default();
        assert_eq!(policy.allows_on_stderr(no_env), std::io::stderr().is_terminal());

        let json = SpinnerPolicy {
            machine_output: true,
            ..SpinnerPolicy::default()
        };
        assert!(!json.allows_on_stderr(no_env));
    }

    #[test]
    fn spinner_off_in_ci_or_when_env_disables_it() {
        let policy = SpinnerPolicy::default();

        assert!(!policy.allows(true, |k| (k == "CI").then(|| "1".to_string())));
        assert!(!policy.allows(true, |k| (k == "TD_SPINNER").then(|| "false".to_string())));
        assert!(policy.allows(true, |k| (k == "TD_SPINNER").then(|| "true".to_string())));
    }

    #[test]
    fn decorator_passes_results_and_errors_through() {
        let mock = MockApi::new().with_projects(vec![Project::new("p1", "Work")]);
        let api = SpinnerApi::new(mock, false);

        let page = api.get_projects(None, 10).unwrap();
        assert_eq!(page.results.len(), 1);

        let err = api.get_task("missing").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(api.inner().calls(), vec!["get_projects", "get_task missing"]);
    }
}
