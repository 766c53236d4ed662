//! Interactive repair of configured paths that are not existing directories.
//!
//! One [`Wizard::run`] call processes one batch: the ordered list of paths that
//! were bad when the façade last validated the file. Every path is resolved in
//! turn unless the user quits, in which case the batch stops at once.

use std::path::{Path, PathBuf};

use super::error::Cause;
use super::paths::ConfiguredPath;
use super::provision::ensure_directory;
use crate::logging::CONSOLE_TARGET;
use crate::logging::highlight::{Highlight, Highlighter};
use crate::menu::{MenuOption, TextMenu, UserInput};

const HEADING: &str = r"
 ┌──────────────────────────┐
 │   Configuration Wizard   │
 └──────────────────────────┘
";

/// Answer to one wizard prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardChoice {
    /// Create this path and every remaining one in the batch without asking.
    AutoAll,
    /// Create the directory at the currently recorded location.
    CreateAutomatically,
    /// Ask for a replacement path until one can be provided.
    ManualInput,
    /// Stop and let the user edit the file by hand.
    QuitToEdit,
}

impl WizardChoice {
    /// Key that selects the choice in the menu.
    #[must_use]
    pub const fn key(self) -> char {
        match self {
            Self::AutoAll => 'A',
            Self::CreateAutomatically => 'C',
            Self::ManualInput => 'M',
            Self::QuitToEdit => 'Q',
        }
    }

    /// Choice selected by `key`, case-insensitive.
    #[must_use]
    pub const fn from_key(key: char) -> Option<Self> {
        match key.to_ascii_uppercase() {
            'A' => Some(Self::AutoAll),
            'C' => Some(Self::CreateAutomatically),
            'M' => Some(Self::ManualInput),
            'Q' => Some(Self::QuitToEdit),
            _ => None,
        }
    }
}

/// How a batch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardOutcome {
    /// Every path in the batch was repaired.
    Resolved,
    /// The user chose to quit; paths repaired before that keep their new values.
    QuitRequested,
}

/// Walks the user through a batch of bad paths.
pub struct Wizard<'a> {
    menu: TextMenu<'a>,
    highlighter: &'a Highlighter,
    file_name: String,
    autoconfig: bool,
    auto: bool,
    heading_shown: bool,
}

impl<'a> Wizard<'a> {
    /// What: Prepare a wizard for one configuration file.
    ///
    /// Inputs:
    /// - `highlighter`: Console formatting.
    /// - `file_name`: Config file name, quoted in the quit option.
    /// - `autoconfig`: Answer every prompt with `C` without showing anything.
    #[must_use]
    pub fn new(highlighter: &'a Highlighter, file_name: &str, autoconfig: bool) -> Self {
        Self {
            menu: TextMenu::new("Configuration Wizard", HEADING, highlighter),
            highlighter,
            file_name: file_name.to_string(),
            autoconfig,
            auto: autoconfig,
            heading_shown: false,
        }
    }

    /// Whether prompts are currently answered automatically.
    #[must_use]
    pub const fn is_automatic(&self) -> bool {
        self.auto
    }

    /// Menu entries for a path with `remaining` bad paths after it.
    fn options(&self, path: &ConfiguredPath, remaining: usize) -> Vec<MenuOption> {
        let mut options = Vec::with_capacity(4);
        if remaining > 0 {
            options.push(MenuOption::new(
                WizardChoice::AutoAll.key(),
                format!("Automatically configure this and {remaining} remaining path settings"),
            ));
        }
        options.push(MenuOption::new(
            WizardChoice::CreateAutomatically.key(),
            "Create this path automatically",
        ));
        options.push(MenuOption::new(
            WizardChoice::ManualInput.key(),
            "Manually input correct path to use or to create",
        ));
        options.push(MenuOption::new(
            WizardChoice::QuitToEdit.key(),
            format!(
                "Quit to edit {} in {} manually",
                self.highlighter.paint(Highlight::Key, &format!("`{}`", path.internal_name)),
                self.file_name
            ),
        ));
        options
    }

    /// What: Show the reason, comment and options for one path and read the answer.
    ///
    /// Output:
    /// - The chosen action, or the input error.
    fn prompt(
        &mut self,
        path: &ConfiguredPath,
        remaining: usize,
        input: &mut dyn UserInput,
    ) -> Result<WizardChoice, Cause> {
        if !self.heading_shown {
            self.menu.show_heading();
            self.heading_shown = true;
        }
        let reason = format!(
            "{} ({}) does not exist!",
            path.internal_name,
            path.current_path.display()
        );
        self.menu.show_reason(&reason);
        self.menu.show_comment(&path.display_comment());
        let key = self
            .menu
            .choose_from(&self.options(path, remaining), input)
            .map_err(Cause::Input)?;
        WizardChoice::from_key(key).ok_or_else(|| {
            Cause::Input(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("unexpected menu key {key}"),
            ))
        })
    }

    /// What: Process one batch of bad paths in order.
    ///
    /// Inputs:
    /// - `paths`: All configured paths; repaired entries get their new `current_path`.
    /// - `bad`: Indices into `paths` of the entries to repair, in prompt order.
    /// - `input`: Keyboard source.
    ///
    /// Output:
    /// - `Ok(Resolved)` when every path in the batch was provided.
    /// - `Ok(QuitRequested)` as soon as the user picks `Q`; later paths are not visited.
    /// - `Err(Cause)` when input fails, or in autoconfig mode when a directory cannot be
    ///   created at a recorded location.
    ///
    /// Details:
    /// - Picking `A` makes every remaining prompt of this wizard answer `C` by itself.
    /// - Interactively, a location that cannot be created is reported and the same path
    ///   is offered again, with `A` switched off, so the user can pick `M` or `Q`.
    /// - Repairs made before an error stay in `paths`.
    pub fn run(
        &mut self,
        paths: &mut [ConfiguredPath],
        bad: &[usize],
        input: &mut dyn UserInput,
    ) -> Result<WizardOutcome, Cause> {
        tracing::debug!(batch = bad.len(), auto = self.auto, "wizard started");
        for (position, &index) in bad.iter().enumerate() {
            let Some(path) = paths.get_mut(index) else {
                tracing::warn!(index, "wizard batch index out of range; skipped");
                continue;
            };
            let remaining = bad.len() - 1 - position;
            if self.resolve(path, remaining, input)? == WizardOutcome::QuitRequested {
                return Ok(WizardOutcome::QuitRequested);
            }
            tracing::trace!(
                key = %path.internal_name,
                value = %path.current_path.display(),
                "path repaired"
            );
        }
        Ok(WizardOutcome::Resolved)
    }

    /// Prompt for one path until it is provided or the user quits.
    fn resolve(
        &mut self,
        path: &mut ConfiguredPath,
        remaining: usize,
        input: &mut dyn UserInput,
    ) -> Result<WizardOutcome, Cause> {
        loop {
            let mut choice = if self.auto {
                WizardChoice::CreateAutomatically
            } else {
                self.prompt(path, remaining, input)?
            };
            if choice == WizardChoice::AutoAll {
                self.auto = true;
                choice = WizardChoice::CreateAutomatically;
            }
            tracing::info!(
                target: CONSOLE_TARGET,
                "Your choice: {}",
                self.highlighter.paint(Highlight::Success, &choice.key().to_string())
            );
            match choice {
                WizardChoice::CreateAutomatically | WizardChoice::AutoAll => {
                    tracing::debug!(key = %path.internal_name, "configuring path automatically");
                    match ensure_directory(&path.current_path) {
                        Ok(created) => {
                            path.current_path = created;
                            return Ok(WizardOutcome::Resolved);
                        }
                        Err(e) if self.autoconfig => return Err(e.into()),
                        Err(e) => {
                            tracing::error!(
                                target: CONSOLE_TARGET,
                                "{}",
                                self.highlighter.paint(Highlight::Error, &e.to_string())
                            );
                            self.auto = false;
                        }
                    }
                }
                WizardChoice::ManualInput => {
                    tracing::debug!(key = %path.internal_name, "configuring path manually");
                    path.current_path = self.ask_for_path(path, input)?;
                    return Ok(WizardOutcome::Resolved);
                }
                WizardChoice::QuitToEdit => {
                    tracing::debug!(key = %path.internal_name, "wizard quit requested");
                    return Ok(WizardOutcome::QuitRequested);
                }
            }
        }
    }

    /// Ask until a directory could be provided at the entered location.
    fn ask_for_path(
        &self,
        path: &ConfiguredPath,
        input: &mut dyn UserInput,
    ) -> Result<PathBuf, Cause> {
        let prompt = format!("Input path to the {}: ", path.display_comment());
        loop {
            let line = input.read_line(&prompt).map_err(Cause::Input)?;
            let entered = line.trim();
            if entered.is_empty() {
                tracing::error!(target: CONSOLE_TARGET, "{}", self.highlighter.paint(Highlight::Error, "Please enter a path."));
                continue;
            }
            match ensure_directory(Path::new(entered)) {
                Ok(created) => return Ok(created),
                Err(e) => {
                    tracing::error!(
                        target: CONSOLE_TARGET,
                        "{}",
                        self.highlighter.paint(Highlight::Error, &e.to_string())
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::default_configured_paths;
    use crate::logging::capture::capture_logs;
    use crate::menu::input::testing::ScriptedInput;

    fn all_bad(paths: &[ConfiguredPath]) -> Vec<usize> {
        (0..paths.len()).collect()
    }

    #[test]
    fn wizard_choice_keys_round_trip() {
        for choice in [
            WizardChoice::AutoAll,
            WizardChoice::CreateAutomatically,
            WizardChoice::ManualInput,
            WizardChoice::QuitToEdit,
        ] {
            assert_eq!(WizardChoice::from_key(choice.key()), Some(choice));
        }
        assert_eq!(WizardChoice::from_key('m'), Some(WizardChoice::ManualInput));
        assert_eq!(WizardChoice::from_key('x'), None);
    }

    #[test]
    /// What: Autoconfig creates every path without reading a key.
    ///
    /// Inputs:
    /// - Two missing default paths, empty script.
    ///
    /// Output:
    /// - `Resolved`, both directories exist, no key consumed.
    fn wizard_autoconfig_creates_all_without_prompting() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut paths = default_configured_paths(dir.path());
        let bad = all_bad(&paths);
        let hl = Highlighter::plain();
        let mut input = ScriptedInput::new("", &[]);
        let (outcome, logs) = capture_logs(|| {
            Wizard::new(&hl, "cfg.ini", true).run(&mut paths, &bad, &mut input)
        });
        assert_eq!(outcome.expect("run"), WizardOutcome::Resolved);
        assert!(paths.iter().all(|p| p.current_path.is_dir()));
        assert_eq!(input.keys_read, 0);
        assert!(!logs.contains("Configuration Wizard"));
    }

    #[test]
    /// What: `A` on the first of three paths creates all three with one key press.
    ///
    /// Inputs:
    /// - Three missing paths, script `a`.
    ///
    /// Output:
    /// - Exactly one key read, all directories exist, option text counts two remaining.
    fn wizard_auto_all_is_sticky() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut paths = default_configured_paths(dir.path());
        paths.push(ConfiguredPath::new("third", "third directory", dir.path().join("third")));
        let bad = all_bad(&paths);
        let hl = Highlighter::plain();
        let mut input = ScriptedInput::new("a", &[]);
        let mut wizard = Wizard::new(&hl, "cfg.ini", false);
        let (outcome, logs) = capture_logs(|| wizard.run(&mut paths, &bad, &mut input));
        assert_eq!(outcome.expect("run"), WizardOutcome::Resolved);
        assert!(wizard.is_automatic());
        assert_eq!(input.keys_read, 1);
        assert!(paths.iter().all(|p| p.current_path.is_dir()));
        assert!(logs.contains("(A) Automatically configure this and 2 remaining path settings"));
        assert_eq!(logs.matches("Your choice: C").count(), 3);
    }

    #[test]
    /// What: The last path of a batch is offered without `A`.
    ///
    /// Inputs:
    /// - One missing path, script `c`.
    ///
    /// Output:
    /// - No `(A)` line; reason and capitalised comment shown; directory created.
    fn wizard_last_path_omits_auto_all() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut paths = default_configured_paths(dir.path());
        let hl = Highlighter::plain();
        let mut input = ScriptedInput::new("c", &[]);
        let (outcome, logs) = capture_logs(|| {
            Wizard::new(&hl, "cfg.ini", false).run(&mut paths, &[1], &mut input)
        });
        assert_eq!(outcome.expect("run"), WizardOutcome::Resolved);
        assert!(!logs.contains("(A)"));
        assert!(logs.contains("output_dir ("));
        assert!(logs.contains("does not exist!"));
        assert!(logs.contains("Directory where results are written"));
        assert!(logs.contains("(Q) Quit to edit `output_dir` in cfg.ini manually"));
        assert!(paths[1].current_path.is_dir());
        assert!(!paths[0].current_path.exists());
    }

    #[test]
    /// What: `Q` stops the batch immediately and keeps earlier repairs.
    ///
    /// Inputs:
    /// - Two missing paths, script `c`, `q`, `c`.
    ///
    /// Output:
    /// - `QuitRequested`, first path created, second untouched, third key never read.
    fn wizard_quit_stops_batch() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut paths = default_configured_paths(dir.path());
        let bad = all_bad(&paths);
        let hl = Highlighter::plain();
        let mut input = ScriptedInput::new("cqc", &[]);
        let (outcome, _) = capture_logs(|| {
            Wizard::new(&hl, "cfg.ini", false).run(&mut paths, &bad, &mut input)
        });
        assert_eq!(outcome.expect("run"), WizardOutcome::QuitRequested);
        assert!(paths[0].current_path.is_dir());
        assert!(!paths[1].current_path.exists());
        assert_eq!(input.keys_read, 2);
    }

    #[test]
    /// What: Manual input retries past an empty line and a file in the way.
    ///
    /// Inputs:
    /// - Script `m` then lines: empty, path of a file, valid new directory.
    ///
    /// Output:
    /// - Path set to the new directory; three prompts shown with the capitalised comment.
    fn wizard_manual_input_retries_until_created() {
        let dir = tempfile::tempdir().expect("tempdir");
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"x").expect("write file");
        let target = dir.path().join("chosen");
        let mut paths = default_configured_paths(dir.path());
        let hl = Highlighter::plain();
        let blocker_text = blocker.display().to_string();
        let target_text = target.display().to_string();
        let mut input = ScriptedInput::new("m", &["  ", blocker_text.as_str(), target_text.as_str()]);
        let (outcome, logs) = capture_logs(|| {
            Wizard::new(&hl, "cfg.ini", false).run(&mut paths, &[0], &mut input)
        });
        assert_eq!(outcome.expect("run"), WizardOutcome::Resolved);
        assert_eq!(paths[0].current_path, target);
        assert!(target.is_dir());
        assert_eq!(input.prompts.len(), 3);
        assert_eq!(
            input.prompts[0],
            "Input path to the Local subdirectory for working files: "
        );
        assert!(logs.contains("not a directory"));
    }

    #[test]
    /// What: `C` onto a location occupied by a file is a hard failure in autoconfig mode.
    ///
    /// Inputs:
    /// - Path whose recorded value is an existing file; autoconfig.
    ///
    /// Output:
    /// - `Err` with kind `PathExistsAsWrongType`.
    fn wizard_autoconfig_create_on_file_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("occupied");
        std::fs::write(&file, b"x").expect("write file");
        let mut paths = vec![ConfiguredPath::new("local_sub_dir", "x", file)];
        let hl = Highlighter::plain();
        let mut input = ScriptedInput::new("", &[]);
        let (outcome, _) = capture_logs(|| {
            Wizard::new(&hl, "cfg.ini", true).run(&mut paths, &[0], &mut input)
        });
        assert_eq!(
            outcome.expect_err("file in the way").kind(),
            "PathExistsAsWrongType"
        );
    }

    #[test]
    /// What: Interactively, `C` onto a file is reported and the same path is offered again.
    ///
    /// Inputs:
    /// - `M` on path one (manual line), `C` on path two which is a file, then `M` with a
    ///   new directory.
    ///
    /// Output:
    /// - `Resolved`; the error is logged; path two is prompted twice; path one keeps the
    ///   manual value.
    fn wizard_create_on_file_reprompts() {
        let dir = tempfile::tempdir().expect("tempdir");
        let occupied = dir.path().join("occupied");
        std::fs::write(&occupied, b"x").expect("write file");
        let chosen = dir.path().join("chosen");
        let fixed = dir.path().join("fixed");
        let mut paths = vec![
            ConfiguredPath::new("local_sub_dir", "working files", dir.path().join("sub")),
            ConfiguredPath::new("output_dir", "results", occupied.clone()),
        ];
        let bad = all_bad(&paths);
        let hl = Highlighter::plain();
        let chosen_text = chosen.display().to_string();
        let fixed_text = fixed.display().to_string();
        let mut input = ScriptedInput::new("mcm", &[chosen_text.as_str(), fixed_text.as_str()]);
        let (outcome, logs) = capture_logs(|| {
            Wizard::new(&hl, "cfg.ini", false).run(&mut paths, &bad, &mut input)
        });
        assert_eq!(outcome.expect("run"), WizardOutcome::Resolved);
        assert_eq!(input.keys_read, 3);
        assert_eq!(paths[0].current_path, chosen);
        assert_eq!(paths[1].current_path, fixed);
        assert!(occupied.is_file());
        assert!(logs.contains("not a directory"));
        assert_eq!(logs.matches("output_dir (").count(), 2);
    }

    #[test]
    /// What: A failed `C` reached through `A` drops back to asking.
    ///
    /// Inputs:
    /// - Two paths, the second a file; script `a`, then `q`.
    ///
    /// Output:
    /// - `QuitRequested` after two keys; the first directory was created; auto mode is off.
    fn wizard_auto_all_stops_at_blocked_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let occupied = dir.path().join("occupied");
        std::fs::write(&occupied, b"x").expect("write file");
        let mut paths = vec![
            ConfiguredPath::new("local_sub_dir", "working files", dir.path().join("sub")),
            ConfiguredPath::new("output_dir", "results", occupied),
        ];
        let bad = all_bad(&paths);
        let hl = Highlighter::plain();
        let mut input = ScriptedInput::new("aq", &[]);
        let mut wizard = Wizard::new(&hl, "cfg.ini", false);
        let (outcome, _) = capture_logs(|| wizard.run(&mut paths, &bad, &mut input));
        assert_eq!(outcome.expect("run"), WizardOutcome::QuitRequested);
        assert_eq!(input.keys_read, 2);
        assert!(paths[0].current_path.is_dir());
        assert!(!wizard.is_automatic());
    }
}
