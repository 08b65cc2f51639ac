//! Future-self letter templates

use crate::calendar::Month;

/// Returned for a month with no transactions; never stored
pub const ONBOARDING_LETTER: &str = "Welcome to your financial journey. Your future self is waiting to see your progress. Start by logging your first transaction!";

const GREETING: &str = "Dear Future Self,\n\n";

/// Letter written on the last day of the month
pub fn end_of_month_letter(
    month: Month,
    regret_count: u32,
    current_streak: u32,
    celebration_streak_days: u32,
) -> String {
    let mut content = String::from(GREETING);

    content.push_str(&format!(
        "Reflecting on {}, I've completed another chapter. ",
        month.long_label()
    ));
    if regret_count > 0 {
        content.push_str(&format!("I learned from {} regrets. ", regret_count));
    }
    if current_streak > celebration_streak_days {
        content.push_str(&format!("My consistency reached {} days! ", current_streak));
    }
    content.push_str(
        "\n\nEvery choice made this month was a step toward who you are now.\n\nWith discipline,\nYour Past Self",
    );

    content
}

/// Letter written before the month is over
pub fn mid_month_letter(month: Month, worth_it_count: u32, regret_count: u32) -> String {
    let mut content = String::from(GREETING);

    content.push_str(&format!("I'm currently navigating {}. ", month.long_label()));
    if worth_it_count > regret_count {
        content.push_str("I'm making mostly \"Worth it\" choices so far. Keep this momentum! ");
    } else if regret_count > 0 {
        content.push_str("I've had a few regrets, but I'm learning to be more mindful. ");
    } else {
        content.push_str("I'm staying disciplined and focused. ");
    }
    content.push_str(
        "\n\nYour future is being built today. One transaction at a time.\n\nStay focused,\nYour Present Self",
    );

    content
}
