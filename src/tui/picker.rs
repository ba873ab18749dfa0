use crossterm::event::{KeyCode, KeyEvent};

use crate::models::Location;

/// What a key press did to the location picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerAction {
    None,
    Cancel,
    Choose(Location),
}

/// Filterable list of locations shown as an overlay.
#[derive(Debug, Default)]
pub struct LocationPicker {
    pub query: String,
    pub selected: usize,
}

impl LocationPicker {
    /// Opens with the cursor on `current` if it is in the list.
    pub fn open(locations: &[Location], current: Option<&str>) -> Self {
        let selected = current
            .and_then(|id| locations.iter().position(|l| l.id == id))
            .unwrap_or(0);
        Self {
            query: String::new(),
            selected,
        }
    }

    pub fn filtered<'a>(&self, locations: &'a [Location]) -> Vec<&'a Location> {
        locations.iter().filter(|l| l.matches(&self.query)).collect()
    }

    pub fn handle_key(&mut self, key: KeyEvent, locations: &[Location]) -> PickerAction {
        let count = self.filtered(locations).len();
        match key.code {
            KeyCode::Esc => return PickerAction::Cancel,
            KeyCode::Enter => {
                return match self.filtered(locations).get(self.selected) {
                    Some(loc) => PickerAction::Choose((*loc).clone()),
                    None => PickerAction::None,
                };
            }
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => {
                if self.selected + 1 < count {
                    self.selected += 1;
                }
            }
            KeyCode::PageUp => self.selected = self.selected.saturating_sub(10),
            KeyCode::PageDown => self.selected = (self.selected + 10).min(count.saturating_sub(1)),
            KeyCode::Backspace => {
                self.query.pop();
                self.selected = 0;
            }
            KeyCode::Char(c) => {
                self.query.push(c);
                self.selected = 0;
            }
            _ => {}
        }
        PickerAction::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn locations() -> Vec<Location> {
        [
            ("0101", "KAB. ACEH BARAT"),
            ("1301", "KOTA JAKARTA"),
            ("1219", "KOTA BANDUNG"),
            ("1638", "KOTA SURABAYA"),
        ]
        .into_iter()
        .map(|(id, name)| Location {
            id: id.to_string(),
            name: name.to_string(),
        })
        .collect()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_open_starts_on_current_location() {
        let picker = LocationPicker::open(&locations(), Some("1219"));
        assert_eq!(picker.selected, 2);
        let picker = LocationPicker::open(&locations(), Some("nope"));
        assert_eq!(picker.selected, 0);
    }

    #[test]
    fn test_typing_filters_and_enter_chooses() {
        let all = locations();
        let mut picker = LocationPicker::open(&all, None);
        for c in "band".chars() {
            assert_eq!(picker.handle_key(key(KeyCode::Char(c)), &all), PickerAction::None);
        }
        assert_eq!(picker.filtered(&all).len(), 1);
        match picker.handle_key(key(KeyCode::Enter), &all) {
            PickerAction::Choose(loc) => assert_eq!(loc.id, "1219"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_navigation_is_clamped() {
        let all = locations();
        let mut picker = LocationPicker::open(&all, None);
        picker.handle_key(key(KeyCode::Up), &all);
        assert_eq!(picker.selected, 0);
        for _ in 0..10 {
            picker.handle_key(key(KeyCode::Down), &all);
        }
        assert_eq!(picker.selected, 3);
        picker.handle_key(key(KeyCode::PageUp), &all);
        assert_eq!(picker.selected, 0);
    }

    #[test]
    fn test_enter_with_no_match_does_nothing() {
        let all = locations();
        let mut picker = LocationPicker::open(&all, None);
        for c in "zzz".chars() {
            picker.handle_key(key(KeyCode::Char(c)), &all);
        }
        assert_eq!(picker.handle_key(key(KeyCode::Enter), &all), PickerAction::None);
        assert_eq!(picker.handle_key(key(KeyCode::Esc), &all), PickerAction::Cancel);
    }
}
