//! crates/learnwell_core/src/wellness.rs
//!
//! Daily wellness messages shown on the dashboard.

use crate::domain::Profile;

pub const CALMING_REMINDER: &str = "Remember to take deep breaths. You're doing great! 🌟";
pub const BREAK_REMINDER: &str = "Consider taking a 5-minute break every 25 minutes. 🧘";
pub const SLEEP_REMINDER: &str = "Try to get more rest tonight. Sleep helps learning! 😴";
pub const POSITIVE_MESSAGE: &str = "You're in a great headspace for learning today! 💪";

const HIGH_SCALE: u8 = 7;
const MIN_SLEEP_HOURS: f32 = 6.0;

/// Every rule is evaluated independently, in table order. The positive message
/// appears only when nothing else fired.
pub fn wellness_messages(profile: &Profile) -> Vec<&'static str> {
    let mut messages = Vec::new();

    if profile.anxiety() >= HIGH_SCALE {
        messages.push(CALMING_REMINDER);
    }
    if profile.stress() >= HIGH_SCALE {
        messages.push(BREAK_REMINDER);
    }
    if profile.sleep_hours() < MIN_SLEEP_HOURS {
        messages.push(SLEEP_REMINDER);
    }

    if messages.is_empty() {
        messages.push(POSITIVE_MESSAGE);
    }
    messages
}
