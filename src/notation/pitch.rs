//! Note numbers and pitch names

use super::{NotationError, HIGHEST_NOTE, LOWEST_NOTE};

/// Pitch class names, indexed by `note % 12`
pub const PITCH_CLASSES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Convert a note number to its name, e.g. 60 -> "C4"
///
/// Returns `None` outside the 88-key range (21..=108).
pub fn note_name(note_number: i32) -> Option<String> {
    if !(LOWEST_NOTE..=HIGHEST_NOTE).contains(&note_number) {
        return None;
    }

    let pitch_class = PITCH_CLASSES[(note_number % 12) as usize];
    let octave = note_number / 12 - 1;

    Some(format!("{}{}", pitch_class, octave))
}

/// Parse a pitch name ("C4", "Db3", "f#2", "C-1") into a note number
pub fn parse_pitch(name: &str) -> Result<i32, NotationError> {
    let name = name.trim();
    let mut chars = name.chars();

    let letter = chars.next().ok_or(NotationError::EmptyPitch)?;
    let mut semitone: i32 = match letter.to_ascii_uppercase() {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return Err(NotationError::InvalidPitchClass(name.to_string())),
    };

    let rest = chars.as_str();
    let octave_start = rest
        .find(|c: char| c != '#' && c != 'b')
        .unwrap_or(rest.len());
    let (accidentals, octave) = rest.split_at(octave_start);

    for accidental in accidentals.chars() {
        semitone += if accidental == '#' { 1 } else { -1 };
    }

    let invalid_octave = || NotationError::InvalidOctave(name.to_string());
    let octave: i32 = octave.parse().map_err(|_| invalid_octave())?;

    octave
        .checked_add(1)
        .and_then(|o| o.checked_mul(12))
        .and_then(|n| n.checked_add(semitone))
        .ok_or_else(invalid_octave)
}

/// Equal-tempered frequency of a note number (A4 = 69 = 440 Hz)
pub fn midi_to_frequency(note_number: i32) -> f64 {
    440.0 * 2.0_f64.powf((note_number - 69) as f64 / 12.0)
}

/// Frequency of a pitch name
pub fn pitch_frequency(name: &str) -> Result<f64, NotationError> {
    parse_pitch(name).map(midi_to_frequency)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_name_middle_c() {
        assert_eq!(note_name(60).as_deref(), Some("C4"));
    }

    #[test]
    fn test_note_name_range_edges() {
        assert_eq!(note_name(21).as_deref(), Some("A0"));
        assert_eq!(note_name(108).as_deref(), Some("C8"));
        assert_eq!(note_name(20), None);
        assert_eq!(note_name(109), None);
        assert_eq!(note_name(-5), None);
        assert_eq!(note_name(i32::MAX), None);
    }

    #[test]
    fn test_note_name_sharps() {
        assert_eq!(note_name(61).as_deref(), Some("C#4"));
        assert_eq!(note_name(70).as_deref(), Some("A#4"));
        assert_eq!(note_name(23).as_deref(), Some("B0"));
        assert_eq!(note_name(24).as_deref(), Some("C1"));
    }

    #[test]
    fn test_note_name_covers_keyboard() {
        for n in LOWEST_NOTE..=HIGHEST_NOTE {
            let name = note_name(n).unwrap();
            let class = PITCH_CLASSES[(n % 12) as usize];
            assert!(name.starts_with(class), "{} -> {}", n, name);

            let octave: i32 = name[class.len()..].parse().unwrap();
            assert_eq!(octave, n / 12 - 1);
        }
    }

    #[test]
    fn test_note_name_is_idempotent() {
        for n in [0, 21, 60, 87, 108, 200] {
            assert_eq!(note_name(n), note_name(n));
        }
    }

    #[test]
    fn test_parse_pitch_names_back() {
        for n in LOWEST_NOTE..=HIGHEST_NOTE {
            let name = note_name(n).unwrap();
            assert_eq!(parse_pitch(&name), Ok(n));
        }
    }

    #[test]
    fn test_parse_pitch_flats_and_case() {
        assert_eq!(parse_pitch("Db4"), Ok(61));
        assert_eq!(parse_pitch("c2"), Ok(36));
        assert_eq!(parse_pitch("Cb4"), Ok(59));
        assert_eq!(parse_pitch("C-1"), Ok(0));
        assert_eq!(parse_pitch(" A4 "), Ok(69));
    }

    #[test]
    fn test_parse_pitch_errors() {
        assert_eq!(parse_pitch(""), Err(NotationError::EmptyPitch));
        assert!(matches!(parse_pitch("H2"), Err(NotationError::InvalidPitchClass(_))));
        assert!(matches!(parse_pitch("C"), Err(NotationError::InvalidOctave(_))));
        assert!(matches!(parse_pitch("C#x"), Err(NotationError::InvalidOctave(_))));
    }

    #[test]
    fn test_parse_pitch_huge_octave_is_an_error() {
        assert!(matches!(parse_pitch("C2147483647"), Err(NotationError::InvalidOctave(_))));
        assert!(matches!(parse_pitch("B2147483646"), Err(NotationError::InvalidOctave(_))));
        assert!(matches!(parse_pitch("Cb-2147483648"), Err(NotationError::InvalidOctave(_))));
        assert!(matches!(pitch_frequency("A2147483647"), Err(NotationError::InvalidOctave(_))));
    }

    #[test]
    fn test_frequencies() {
        assert!((midi_to_frequency(69) - 440.0).abs() < 1e-9);
        assert!((pitch_frequency("C4").unwrap() - 261.6256).abs() < 0.001);
        assert!((pitch_frequency("C2").unwrap() - 65.4064).abs() < 0.001);
    }
}
