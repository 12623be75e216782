/// Converts a score on the 0–100 scale into a letter band.
///
/// | Range   | Letter |
/// |---------|--------|
/// | >= 90   | A      |
/// | >= 80   | B      |
/// | >= 70   | C      |
/// | >= 60   | D      |
/// | < 60    | F      |
pub fn letter(score: f64) -> &'static str {
    match score {
        s if s >= 90.0 => "A",
        s if s >= 80.0 => "B",
        s if s >= 70.0 => "C",
        s if s >= 60.0 => "D",
        _ => "F",
    }
}
