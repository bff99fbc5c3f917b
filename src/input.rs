use ggez::input::keyboard::KeyCode;

use crate::state::Direction;

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Command {
    Move(Direction),
    TogglePause,
    Save,
    Load,
    Restart,
    Quit,
}

/// `S` saves, so moving down is on the arrow key only.
pub fn command_for(keycode: KeyCode) -> Option<Command> {
    let command = match keycode {
        KeyCode::Up | KeyCode::W => Command::Move(Direction::Up),
        KeyCode::Down => Command::Move(Direction::Down),
        KeyCode::Left | KeyCode::A => Command::Move(Direction::Left),
        KeyCode::Right | KeyCode::D => Command::Move(Direction::Right),
        KeyCode::P => Command::TogglePause,
        KeyCode::S => Command::Save,
        KeyCode::L => Command::Load,
        KeyCode::R => Command::Restart,
        KeyCode::Q | KeyCode::Escape => Command::Quit,
        _ => return None,
    };
    Some(command)
}
