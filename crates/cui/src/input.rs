use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    None,
    /// Leave the program regardless of engine state.
    ForceQuit,
    Quit,
    ToggleHelp,
    SelectSlot(usize),
    TogglePause,
    Resume,
    Continue,
    DebugToggle,
    DebugNext,
    DebugPrev,
    ToggleAlbum,
    MoveUp,
    MoveDown,
    Activate,
    OpenVideo,
    Confirm,
    Cancel,
    Back,
}

pub fn map_key(key: KeyEvent) -> InputAction {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            InputAction::ForceQuit
        }
        KeyCode::Char(digit @ '1'..='9') => {
            InputAction::SelectSlot(digit as usize - '1' as usize)
        }
        KeyCode::Esc => InputAction::Back,
        KeyCode::Up | KeyCode::Char('k') => InputAction::MoveUp,
        KeyCode::Down | KeyCode::Char('j') => InputAction::MoveDown,
        KeyCode::Left => InputAction::DebugPrev,
        KeyCode::Right => InputAction::DebugNext,
        KeyCode::F(12) | KeyCode::Char('`') => InputAction::DebugToggle,
        KeyCode::Enter => InputAction::Activate,
        KeyCode::Char('q') => InputAction::Quit,
        KeyCode::Char('?') => InputAction::ToggleHelp,
        KeyCode::Char('p') | KeyCode::Char(' ') => InputAction::TogglePause,
        KeyCode::Char('r') => InputAction::Resume,
        KeyCode::Char('c') => InputAction::Continue,
        KeyCode::Char('a') => InputAction::ToggleAlbum,
        KeyCode::Char('v') => InputAction::OpenVideo,
        KeyCode::Char('y') => InputAction::Confirm,
        KeyCode::Char('n') => InputAction::Cancel,
        _ => InputAction::None,
    }
}
