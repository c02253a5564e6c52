use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Move(Direction),
    PageUp,
    PageDown,
    First,
    Last,
    Expand,
    Collapse,
    Toggle,
    ExpandAll,
    CollapseAll,
    StartSearch,
    ClearSearch,
    NextColumns,
    PrevColumns,
    ToggleHelp,
    Quit,
    SubmitText,
    Cancel,
    Backspace,
    ClearText,
    InputChar(char),
    Noop,
}

pub fn action_for_key(key: KeyEvent, text_mode: bool) -> Action {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Action::Quit,
            KeyCode::Char('u') if text_mode => Action::ClearText,
            _ => Action::Noop,
        };
    }

    if text_mode {
        return match key.code {
            KeyCode::Enter => Action::SubmitText,
            KeyCode::Esc => Action::Cancel,
            KeyCode::Backspace => Action::Backspace,
            KeyCode::Up => Action::Move(Direction::Up),
            KeyCode::Down => Action::Move(Direction::Down),
            KeyCode::Char(c) => Action::InputChar(c),
            _ => Action::Noop,
        };
    }

    match key.code {
        KeyCode::Up | KeyCode::Char('k') => Action::Move(Direction::Up),
        KeyCode::Down | KeyCode::Char('j') => Action::Move(Direction::Down),
        KeyCode::PageUp => Action::PageUp,
        KeyCode::PageDown => Action::PageDown,
        KeyCode::Home | KeyCode::Char('g') => Action::First,
        KeyCode::End | KeyCode::Char('G') => Action::Last,
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Enter => Action::Expand,
        KeyCode::Left | KeyCode::Char('h') => Action::Collapse,
        KeyCode::Char(' ') => Action::Toggle,
        KeyCode::Char('E') => Action::ExpandAll,
        KeyCode::Char('C') => Action::CollapseAll,
        KeyCode::Char('/') => Action::StartSearch,
        KeyCode::Esc => Action::ClearSearch,
        KeyCode::Char(']') | KeyCode::Tab => Action::NextColumns,
        KeyCode::Char('[') | KeyCode::BackTab => Action::PrevColumns,
        KeyCode::Char('?') => Action::ToggleHelp,
        KeyCode::Char('q') => Action::Quit,
        _ => Action::Noop,
    }
}

/// Key bindings shown in the help overlay.
pub const HELP: &[(&str, &str)] = &[
    ("↑/↓ j/k", "move"),
    ("PgUp/PgDn", "page"),
    ("g/G", "first / last row"),
    ("→ l Enter", "expand row"),
    ("← h", "collapse row / go to parent"),
    ("Space", "toggle row"),
    ("E / C", "expand all / collapse all"),
    ("/", "search"),
    ("Esc", "clear search"),
    ("[ / ]", "previous / next atlas columns"),
    ("?", "toggle help"),
    ("q", "quit"),
];
