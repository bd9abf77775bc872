// ============================================================================
// input.rs — Demo Showcase
// Input adapter: keyboard keys and pointer events become demo actions.
// ============================================================================

use std::collections::VecDeque;

use winit::keyboard::{Key, NamedKey};

/// Grid heading for steerable demos.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Demo-level intent produced by the adapter. Pointer coordinates are
/// already in canvas space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Action {
    PointerDown { x: f32, y: f32 },
    PointerMove { x: f32, y: f32 },
    PointerUp,
    Steer(Direction),
    Jump,
    Start,
    Clear,
    ToggleTrails,
}

/// Map a pressed key to an action. Letters are case-insensitive.
pub fn action_for_key(key: &Key) -> Option<Action> {
    match key {
        Key::Named(NamedKey::ArrowUp) => Some(Action::Steer(Direction::Up)),
        Key::Named(NamedKey::ArrowDown) => Some(Action::Steer(Direction::Down)),
        Key::Named(NamedKey::ArrowLeft) => Some(Action::Steer(Direction::Left)),
        Key::Named(NamedKey::ArrowRight) => Some(Action::Steer(Direction::Right)),
        Key::Named(NamedKey::Space) => Some(Action::Jump),
        Key::Named(NamedKey::Enter) => Some(Action::Start),
        Key::Character(c) => match c.as_str() {
            "w" | "W" => Some(Action::Steer(Direction::Up)),
            "s" | "S" => Some(Action::Steer(Direction::Down)),
            "a" | "A" => Some(Action::Steer(Direction::Left)),
            "d" | "D" => Some(Action::Steer(Direction::Right)),
            " " => Some(Action::Jump),
            "c" | "C" => Some(Action::Clear),
            "t" | "T" => Some(Action::ToggleTrails),
            _ => None,
        },
        _ => None,
    }
}

/// Actions collected between frames, applied in arrival order at the start
/// of the next frame.
#[derive(Default)]
pub struct InputQueue {
    pending: VecDeque<Action>,
}

impl InputQueue {
    pub fn push(&mut self, action: Action) {
        self.pending.push_back(action);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Action> + '_ {
        self.pending.drain(..)
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrows_and_wasd_steer() {
        assert_eq!(
            action_for_key(&Key::Named(NamedKey::ArrowLeft)),
            Some(Action::Steer(Direction::Left))
        );
        assert_eq!(
            action_for_key(&Key::Character("W".into())),
            Some(Action::Steer(Direction::Up))
        );
        assert_eq!(
            action_for_key(&Key::Character("d".into())),
            Some(Action::Steer(Direction::Right))
        );
    }

    #[test]
    fn space_jumps_and_enter_starts() {
        assert_eq!(action_for_key(&Key::Named(NamedKey::Space)), Some(Action::Jump));
        assert_eq!(action_for_key(&Key::Named(NamedKey::Enter)), Some(Action::Start));
        assert_eq!(action_for_key(&Key::Character("x".into())), None);
    }

    #[test]
    fn opposite_directions_cancel() {
        for dir in [Direction::Up, Direction::Down, Direction::Left, Direction::Right] {
            let (dx, dy) = dir.delta();
            let (ox, oy) = dir.opposite().delta();
            assert_eq!((dx + ox, dy + oy), (0, 0));
        }
    }

    #[test]
    fn queue_preserves_order() {
        let mut queue = InputQueue::default();
        queue.push(Action::Jump);
        queue.push(Action::Start);
        let drained: Vec<_> = queue.drain().collect();
        assert_eq!(drained, vec![Action::Jump, Action::Start]);
        assert!(queue.is_empty());
    }
}
