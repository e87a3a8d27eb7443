//! Computer keyboard as a cue source

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use keycue::engine::AudioEngine;
use keycue::{Cue, SoundDispatcher};
use std::time::Duration;

pub const HELP: &str = "\
Keys:  a s d f g h j k  white keys from the base note
       w e   t y u      black keys
       space ticker, b buzzer, Esc quits";

/// Map a key to a cue, piano keys counted from `base_note`
pub fn key_cue(key: char, base_note: i32) -> Option<Cue> {
    let offset = match key {
        'a' => 0,
        'w' => 1,
        's' => 2,
        'e' => 3,
        'd' => 4,
        'f' => 5,
        't' => 6,
        'g' => 7,
        'y' => 8,
        'h' => 9,
        'u' => 10,
        'j' => 11,
        'k' => 12,
        ' ' => return Some(Cue::Ticker),
        'b' => return Some(Cue::Buzzer),
        _ => return None,
    };
    Some(Cue::Piano(base_note + offset))
}

/// Read keys until Esc or Ctrl+C, dispatching each mapped key
pub fn run<E: AudioEngine>(dispatcher: &SoundDispatcher<E>, base_note: i32) -> Result<()> {
    terminal::enable_raw_mode()?;
    let result = read_keys(dispatcher, base_note);
    terminal::disable_raw_mode()?;
    result
}

fn read_keys<E: AudioEngine>(dispatcher: &SoundDispatcher<E>, base_note: i32) -> Result<()> {
    loop {
        if !event::poll(Duration::from_millis(100))? {
            continue;
        }

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match key.code {
            KeyCode::Esc => return Ok(()),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return Ok(()),
            KeyCode::Char(c) => {
                if let Some(cue) = key_cue(c.to_ascii_lowercase(), base_note) {
                    log::debug!("key {:?} -> {}", c, cue);
                    dispatcher.dispatch(cue);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_white_keys_follow_c_major() {
        let notes: Vec<_> = "asdfghjk".chars().map(|c| key_cue(c, 60)).collect();
        let expected: Vec<_> = [60, 62, 64, 65, 67, 69, 71, 72]
            .into_iter()
            .map(|n| Some(Cue::Piano(n)))
            .collect();
        assert_eq!(notes, expected);
    }

    #[test]
    fn test_black_keys() {
        assert_eq!(key_cue('w', 48), Some(Cue::Piano(49)));
        assert_eq!(key_cue('u', 48), Some(Cue::Piano(58)));
    }

    #[test]
    fn test_effect_keys() {
        assert_eq!(key_cue(' ', 60), Some(Cue::Ticker));
        assert_eq!(key_cue('b', 60), Some(Cue::Buzzer));
        assert_eq!(key_cue('z', 60), None);
    }
}
