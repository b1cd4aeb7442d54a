//! Input staging
//!
//! Host event callbacks write into [`InputState`] between frames; the frame
//! reads it and `clear_edges` drops the one-frame flags afterwards. Raw
//! platform codes are translated by a swappable [`KeyMap`].

use std::collections::HashMap;

use glam::Vec2;

use crate::error::GameError;

/// Logical keyboard keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    /// Launch / spawn a ball
    Confirm,
    /// Quit the run
    Cancel,
    Pause,
    /// Debug: toggle cheat mode
    Cheat,
    /// Debug: toggle block outline drawing
    DebugDraw,
}

impl Key {
    pub const COUNT: usize = 7;

    fn index(self) -> usize {
        self as usize
    }
}

/// Logical mouse buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
}

impl MouseButton {
    pub const COUNT: usize = 2;

    fn index(self) -> usize {
        self as usize
    }
}

/// State of one key or button
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonState {
    pub down: bool,
    /// Went down since the last frame
    pub pressed: bool,
    /// Went up since the last frame
    pub released: bool,
}

impl ButtonState {
    fn press(&mut self) {
        if !self.down {
            self.pressed = true;
        }
        self.down = true;
    }

    fn release(&mut self) {
        self.down = false;
        self.released = true;
    }
}

/// Input snapshot read by a frame
#[derive(Debug, Clone, Default)]
pub struct InputState {
    keys: [ButtonState; Key::COUNT],
    buttons: [ButtonState; MouseButton::COUNT],
    mouse: Vec2,
    mouse_changed: bool,
    quit: bool,
}

impl InputState {
    pub fn key_down(&mut self, key: Key) {
        self.keys[key.index()].press();
    }

    pub fn key_up(&mut self, key: Key) {
        self.keys[key.index()].release();
    }

    pub fn button_down(&mut self, button: MouseButton) {
        self.buttons[button.index()].press();
    }

    pub fn button_up(&mut self, button: MouseButton) {
        self.buttons[button.index()].release();
    }

    pub fn mouse_move(&mut self, x: f32, y: f32) {
        self.mouse = Vec2::new(x, y);
        self.mouse_changed = true;
    }

    pub fn request_quit(&mut self) {
        self.quit = true;
    }

    pub fn key(&self, key: Key) -> ButtonState {
        self.keys[key.index()]
    }

    pub fn button(&self, button: MouseButton) -> ButtonState {
        self.buttons[button.index()]
    }

    pub fn mouse_position(&self) -> Vec2 {
        self.mouse
    }

    pub fn mouse_changed(&self) -> bool {
        self.mouse_changed
    }

    /// Launch/spawn edge from keyboard or mouse
    pub fn confirm_released(&self) -> bool {
        self.key(Key::Confirm).released || self.button(MouseButton::Left).released
    }

    pub fn quit_requested(&self) -> bool {
        self.quit || self.key(Key::Cancel).released
    }

    /// Drop one-frame edges; `down` and the pointer position persist
    pub fn clear_edges(&mut self) {
        for state in self.keys.iter_mut().chain(self.buttons.iter_mut()) {
            state.pressed = false;
            state.released = false;
        }
        self.mouse_changed = false;
        self.quit = false;
    }
}

/// Raw platform codes to logical inputs
#[derive(Debug, Clone)]
pub struct KeyMap {
    keys: HashMap<String, Key>,
    buttons: HashMap<i16, MouseButton>,
}

impl Default for KeyMap {
    /// Browser `KeyboardEvent.code` / `MouseEvent.button` values
    fn default() -> Self {
        let keys = [
            ("ArrowLeft", Key::Left),
            ("KeyA", Key::Left),
            ("ArrowRight", Key::Right),
            ("KeyD", Key::Right),
            ("Space", Key::Confirm),
            ("Enter", Key::Confirm),
            ("Escape", Key::Cancel),
            ("KeyP", Key::Pause),
            ("KeyC", Key::Cheat),
            ("Backquote", Key::DebugDraw),
        ];
        Self {
            keys: keys.into_iter().map(|(c, k)| (c.to_string(), k)).collect(),
            buttons: HashMap::from([(0, MouseButton::Left), (2, MouseButton::Right)]),
        }
    }
}

impl KeyMap {
    /// An empty map, for hosts that bind everything themselves
    pub fn empty() -> Self {
        Self {
            keys: HashMap::new(),
            buttons: HashMap::new(),
        }
    }

    pub fn bind_key(&mut self, code: impl Into<String>, key: Key) {
        self.keys.insert(code.into(), key);
    }

    pub fn bind_button(&mut self, code: i16, button: MouseButton) {
        self.buttons.insert(code, button);
    }

    pub fn key(&self, code: &str) -> Result<Key, GameError> {
        self.keys
            .get(code)
            .copied()
            .ok_or_else(|| GameError::UnknownKey(code.to_string()))
    }

    pub fn button(&self, code: i16) -> Result<MouseButton, GameError> {
        self.buttons
            .get(&code)
            .copied()
            .ok_or(GameError::UnknownButton(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_edge_lasts_one_frame() {
        let mut input = InputState::default();
        input.key_down(Key::Confirm);
        assert!(input.key(Key::Confirm).down);
        assert!(input.key(Key::Confirm).pressed);
        input.clear_edges();
        assert!(!input.key(Key::Confirm).pressed);

        input.key_up(Key::Confirm);
        assert!(input.confirm_released());
        assert!(!input.key(Key::Confirm).down);
        input.clear_edges();
        assert!(!input.confirm_released());
    }

    #[test]
    fn test_repeat_keydown_is_not_a_new_press() {
        let mut input = InputState::default();
        input.key_down(Key::Left);
        input.clear_edges();
        input.key_down(Key::Left);
        assert!(!input.key(Key::Left).pressed);
        assert!(input.key(Key::Left).down);
    }

    #[test]
    fn test_mouse_confirm_and_move() {
        let mut input = InputState::default();
        input.mouse_move(40.0, 50.0);
        input.button_down(MouseButton::Left);
        input.button_up(MouseButton::Left);
        assert!(input.mouse_changed());
        assert!(input.confirm_released());
        input.clear_edges();
        assert!(!input.mouse_changed());
        assert_eq!(input.mouse_position(), Vec2::new(40.0, 50.0));
    }

    #[test]
    fn test_quit_sources() {
        let mut input = InputState::default();
        input.key_up(Key::Cancel);
        assert!(input.quit_requested());
        input.clear_edges();
        assert!(!input.quit_requested());
        input.request_quit();
        assert!(input.quit_requested());
    }

    #[test]
    fn test_keymap_lookup() {
        let mut map = KeyMap::default();
        assert_eq!(map.key("ArrowLeft").unwrap(), Key::Left);
        assert_eq!(map.button(2).unwrap(), MouseButton::Right);
        assert!(matches!(map.key("F13"), Err(GameError::UnknownKey(ref c)) if c == "F13"));
        assert!(matches!(map.button(1), Err(GameError::UnknownButton(1))));

        map.bind_key("F13", Key::Pause);
        assert_eq!(map.key("F13").unwrap(), Key::Pause);
        assert!(KeyMap::empty().key("Space").is_err());
    }
}
