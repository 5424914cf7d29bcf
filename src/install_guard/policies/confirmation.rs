/// Whether a line typed at the confirmation prompt means "install anyway".
///
/// Only `y` and `yes` count, compared case-insensitively after trimming.
pub fn is_affirmative(input: &str) -> bool {
    let answer = input.trim().to_lowercase();
    answer == "y" || answer == "yes"
}
