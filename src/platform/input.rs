//! Held-key tracking between ticks
//!
//! Key handlers only add and remove codes; the next tick reads whatever is
//! held at that moment.

/// Physical key codes currently held down, in press order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeldKeys {
    codes: Vec<String>,
}

impl HeldKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press. Auto-repeat of a held key is ignored
    pub fn key_down(&mut self, code: &str) {
        if !self.is_held(code) {
            self.codes.push(code.to_string());
        }
    }

    /// Record a key release, removing the first matching entry
    pub fn key_up(&mut self, code: &str) {
        if let Some(index) = self.codes.iter().position(|c| c == code) {
            self.codes.remove(index);
        }
    }

    pub fn is_held(&self, code: &str) -> bool {
        self.codes.iter().any(|c| c == code)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.codes.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Drop everything (e.g. when the window loses focus)
    pub fn clear(&mut self) {
        self.codes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeat_key_down_ignored() {
        let mut keys = HeldKeys::new();
        keys.key_down("ArrowRight");
        keys.key_down("ArrowRight");
        keys.key_down("Space");
        assert_eq!(keys.len(), 2);
        assert_eq!(keys.iter().collect::<Vec<_>>(), vec!["ArrowRight", "Space"]);
    }

    #[test]
    fn test_key_up_removes_only_match() {
        let mut keys = HeldKeys::new();
        keys.key_down("KeyA");
        keys.key_down("KeyD");
        keys.key_up("KeyA");
        assert!(!keys.is_held("KeyA"));
        assert!(keys.is_held("KeyD"));

        // Releasing something never pressed is harmless
        keys.key_up("KeyZ");
        assert_eq!(keys.len(), 1);
        keys.clear();
        assert!(keys.is_empty());
    }
}
