use crossterm::event::KeyCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiCommand {
    Quit,
    Pause,
    Resume,
    ThresholdUp,
    ThresholdDown,
    /// Zero-based index into the symbol catalog.
    ToggleSymbol(usize),
}

pub fn parse_main_command(key_code: &KeyCode) -> Option<UiCommand> {
    match key_code {
        KeyCode::Esc => Some(UiCommand::Quit),
        KeyCode::Char(c) if ('1'..='9').contains(c) => {
            Some(UiCommand::ToggleSymbol(*c as usize - '1' as usize))
        }
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'q' => Some(UiCommand::Quit),
            'p' => Some(UiCommand::Pause),
            'r' => Some(UiCommand::Resume),
            '+' | '=' => Some(UiCommand::ThresholdUp),
            '-' | '_' => Some(UiCommand::ThresholdDown),
            _ => None,
        },
        _ => None,
    }
}
