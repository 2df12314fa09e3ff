use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Key binding configuration
#[derive(Debug, Clone)]
pub struct KeyBinding {
    pub key: KeyCode,
    pub modifiers: KeyModifiers,
    pub description: String,
}

impl KeyBinding {
    pub fn new(key: KeyCode, modifiers: KeyModifiers, description: &str) -> Self {
        Self {
            key,
            modifiers,
            description: description.to_string(),
        }
    }

    pub fn plain(key: KeyCode, description: &str) -> Self {
        Self::new(key, KeyModifiers::NONE, description)
    }

    pub fn matches(&self, event: &KeyEvent) -> bool {
        self.key == event.code && self.modifiers == event.modifiers
    }

    /// Short key name, e.g. `Ctrl+c` or `↑`
    pub fn label(&self) -> String {
        let key = match self.key {
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Up => "↑".to_string(),
            KeyCode::Down => "↓".to_string(),
            other => format!("{:?}", other),
        };

        if self.modifiers.contains(KeyModifiers::CONTROL) {
            format!("Ctrl+{}", key)
        } else {
            key
        }
    }
}

/// What a bound key does to the page selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    StepUp,
    StepDown,
    Commit,
    Blur,
}

/// Application key mappings
#[derive(Debug, Clone)]
pub struct KeyMap {
    pub quit: Vec<KeyBinding>,
    pub step_up: Vec<KeyBinding>,
    pub step_down: Vec<KeyBinding>,
    pub commit: Vec<KeyBinding>,
    pub blur: Vec<KeyBinding>,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            quit: vec![
                KeyBinding::new(KeyCode::Char('c'), KeyModifiers::CONTROL, "Quit application"),
                KeyBinding::plain(KeyCode::Char('q'), "Quit application"),
            ],
            step_up: vec![
                KeyBinding::plain(KeyCode::Up, "Previous page"),
                KeyBinding::plain(KeyCode::Char('k'), "Previous page"),
            ],
            step_down: vec![
                KeyBinding::plain(KeyCode::Down, "Next page"),
                KeyBinding::plain(KeyCode::Char('j'), "Next page"),
            ],
            commit: vec![KeyBinding::plain(KeyCode::Enter, "Go to typed page")],
            blur: vec![
                KeyBinding::plain(KeyCode::Tab, "Leave page field"),
                KeyBinding::plain(KeyCode::Esc, "Leave page field"),
            ],
        }
    }
}

impl KeyMap {
    /// Resolve a key event to an action, if it is bound
    pub fn action(&self, event: &KeyEvent) -> Option<KeyAction> {
        let groups = [
            (&self.quit, KeyAction::Quit),
            (&self.step_up, KeyAction::StepUp),
            (&self.step_down, KeyAction::StepDown),
            (&self.commit, KeyAction::Commit),
            (&self.blur, KeyAction::Blur),
        ];

        groups
            .into_iter()
            .find(|(bindings, _)| bindings.iter().any(|binding| binding.matches(event)))
            .map(|(_, action)| action)
    }

    /// Check if the event should quit the application
    pub fn should_quit(&self, event: &KeyEvent) -> bool {
        self.action(event) == Some(KeyAction::Quit)
    }

    /// One-line summary for the status bar
    pub fn help_text(&self) -> String {
        [&self.step_up, &self.step_down, &self.commit, &self.blur, &self.quit]
            .into_iter()
            .filter_map(|bindings| {
                let description = &bindings.first()?.description;
                let keys: Vec<String> = bindings.iter().map(KeyBinding::label).collect();
                Some(format!("{}: {}", keys.join("/"), description))
            })
            .collect::<Vec<_>>()
            .join(" · ")
    }
}
