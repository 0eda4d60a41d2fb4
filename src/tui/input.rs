use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::{Axis, Direction};

use super::panes::PaneKind;

/// Workspace-level commands. Keys that map to none of these go to the focused pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Navigate(Direction),
    MovePane(Direction),
    Open(PaneKind),
    CloseFocused,
    CycleMode,
    /// Grow (+1) or shrink (-1) the focused pane along an axis by one resize step
    Resize(Axis, i32),
    ResetSizes,
    FocusNext,
    Quit,
}

fn arrow(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Up => Some(Direction::Up),
        KeyCode::Down => Some(Direction::Down),
        KeyCode::Left => Some(Direction::Left),
        KeyCode::Right => Some(Direction::Right),
        _ => None,
    }
}

fn vim(c: char) -> Option<Direction> {
    match c.to_ascii_lowercase() {
        'k' => Some(Direction::Up),
        'j' => Some(Direction::Down),
        'h' => Some(Direction::Left),
        'l' => Some(Direction::Right),
        _ => None,
    }
}

/// Map a key press to a workspace command
pub fn map_key(key: KeyEvent) -> Option<Action> {
    let m = key.modifiers;
    let ctrl = m.contains(KeyModifiers::CONTROL);
    let alt = m.contains(KeyModifiers::ALT);
    let shift = m.contains(KeyModifiers::SHIFT);

    if let Some(dir) = arrow(key.code) {
        return match (ctrl, alt, shift) {
            (true, false, true) => Some(Action::Navigate(dir)),
            (false, true, true) => Some(Action::MovePane(dir)),
            _ => None,
        };
    }

    let KeyCode::Char(c) = key.code else {
        return None;
    };

    if alt && !ctrl {
        // Terminals report Alt+H either as 'H' or as 'h' with SHIFT
        let upper = c.is_ascii_uppercase() || (shift && c.is_ascii_lowercase());
        if let Some(dir) = vim(c) {
            return Some(if upper {
                Action::MovePane(dir)
            } else {
                Action::Navigate(dir)
            });
        }
        return match c {
            '>' | '.' => Some(Action::Resize(Axis::Columns, 1)),
            '<' | ',' => Some(Action::Resize(Axis::Columns, -1)),
            '+' | '=' => Some(Action::Resize(Axis::Rows, 1)),
            '-' | '_' => Some(Action::Resize(Axis::Rows, -1)),
            '0' => Some(Action::ResetSizes),
            _ => None,
        };
    }

    if ctrl && !alt {
        return match c {
            'n' => Some(Action::Open(PaneKind::Notes)),
            't' => Some(Action::Open(PaneKind::Clock)),
            'f' => Some(Action::Open(PaneKind::Files)),
            'x' => Some(Action::CloseFocused),
            'l' => Some(Action::CycleMode),
            'o' => Some(Action::FocusNext),
            'q' => Some(Action::Quit),
            _ => None,
        };
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> Option<Action> {
        map_key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn ctrl_shift_arrows_navigate() {
        let cs = KeyModifiers::CONTROL | KeyModifiers::SHIFT;
        assert_eq!(press(KeyCode::Left, cs), Some(Action::Navigate(Direction::Left)));
        assert_eq!(press(KeyCode::Down, cs), Some(Action::Navigate(Direction::Down)));
        // plain arrows belong to the pane
        assert_eq!(press(KeyCode::Down, KeyModifiers::NONE), None);
    }

    #[test]
    fn alt_shift_arrows_move() {
        let as_ = KeyModifiers::ALT | KeyModifiers::SHIFT;
        assert_eq!(press(KeyCode::Up, as_), Some(Action::MovePane(Direction::Up)));
    }

    #[test]
    fn alt_vim_keys() {
        assert_eq!(
            press(KeyCode::Char('h'), KeyModifiers::ALT),
            Some(Action::Navigate(Direction::Left))
        );
        assert_eq!(
            press(KeyCode::Char('L'), KeyModifiers::ALT),
            Some(Action::MovePane(Direction::Right))
        );
        assert_eq!(
            press(KeyCode::Char('j'), KeyModifiers::ALT | KeyModifiers::SHIFT),
            Some(Action::MovePane(Direction::Down))
        );
    }

    #[test]
    fn ctrl_commands() {
        assert_eq!(
            press(KeyCode::Char('n'), KeyModifiers::CONTROL),
            Some(Action::Open(PaneKind::Notes))
        );
        assert_eq!(
            press(KeyCode::Char('f'), KeyModifiers::CONTROL),
            Some(Action::Open(PaneKind::Files))
        );
        assert_eq!(press(KeyCode::Char('q'), KeyModifiers::CONTROL), Some(Action::Quit));
        assert_eq!(press(KeyCode::Char('z'), KeyModifiers::CONTROL), None);
    }

    #[test]
    fn resize_keys() {
        assert_eq!(
            press(KeyCode::Char('>'), KeyModifiers::ALT | KeyModifiers::SHIFT),
            Some(Action::Resize(Axis::Columns, 1))
        );
        assert_eq!(
            press(KeyCode::Char('-'), KeyModifiers::ALT),
            Some(Action::Resize(Axis::Rows, -1))
        );
        assert_eq!(press(KeyCode::Char('0'), KeyModifiers::ALT), Some(Action::ResetSizes));
    }

    #[test]
    fn plain_typing_is_not_a_command() {
        assert_eq!(press(KeyCode::Char('h'), KeyModifiers::NONE), None);
        assert_eq!(press(KeyCode::Tab, KeyModifiers::NONE), None);
    }
}
