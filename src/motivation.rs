//! Motivational message selection.
//!
//! All selectors are pure functions over an injected RNG so tests can pin
//! the random source. The message texts are user-facing contract: tests
//! assert pool membership and bucket boundaries, not the exact pick.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::models::ActivityKind;

/// Comeback pool used whenever the caller reports missed days.
pub const COMEBACK_MESSAGES: [&str; 10] = [
  "Don't let yesterday's miss define today's success! 💪",
  "Every champion has setbacks. What matters is the comeback! 🔥",
  "Your journey continues today. Let's get back on track! 🚀",
  "One missed day doesn't erase your progress. Keep going! ⚡",
  "The best time to restart is now. You've got this! 🌟",
  "Consistency isn't perfection. It's persistence! 💯",
  "Your future self is counting on today's effort! 🎯",
  "Small steps today, big results tomorrow! 📈",
  "Turn today's motivation into tomorrow's habit! ✨",
  "Progress over perfection, always! 🙌",
];

/// Pick a message for the streak/miss state.
///
/// `missed_days > 0` always routes to the comeback pool, whatever the
/// streak value. Otherwise the streak maps to one deterministic template
/// per bucket: 0, 1, [2,7), [7,14), [14,21), [21,30), [30,∞).
pub fn select_message<R: Rng + ?Sized>(rng: &mut R, streak: i64, missed_days: i64) -> String {
  if missed_days > 0 {
    return COMEBACK_MESSAGES[rng.gen_range(0..COMEBACK_MESSAGES.len())].to_string();
  }

  match streak {
    0 => "Ready to start your fitness journey? Every expert was once a beginner! 🚀".to_string(),
    1 => "Great start! Day 1 is complete. Momentum is building! 🔥".to_string(),
    s if s < 7 => format!("Amazing! {} days strong! You're building an incredible habit! 💪", s),
    s if s < 14 => format!("Fantastic {}-day streak! You're in the zone! 🌟", s),
    s if s < 21 => format!("Outstanding {} days! You're forming a powerful habit! ⚡", s),
    s if s < 30 => format!("Incredible {}-day streak! You're a consistency champion! 🏆", s),
    s => format!("Legendary {}-day streak! You're an inspiration! 👑", s),
  }
}

/// Evening nudge shown when entries are still missing after the cutoff.
pub fn missed_entry_message<R: Rng + ?Sized>(
  rng: &mut R,
  streak: i64,
  missed: &[ActivityKind],
) -> String {
  let items = join_names(missed, " and ");

  match rng.gen_range(0..5) {
    0 => format!("Don't break your {}-day streak! Log your {} now! 💪", streak, items),
    1 => format!(
      "Your fitness journey needs you! Missing: {}. There's still time! 🔥",
      join_names(missed, ", ")
    ),
    2 => format!("Champions log their progress daily! Don't forget your {}! 🏆", items),
    3 => format!("Consistency is key! You haven't logged your {} today. 📈", items),
    _ => format!("Your future self will thank you! Log your {} before bed! ✨", items),
  }
}

/// Personalized reminder used by the daily 20:00 sweep.
pub fn daily_reminder_message<R: Rng + ?Sized>(
  rng: &mut R,
  username: &str,
  streak: i64,
  missed: &[ActivityKind],
) -> String {
  match rng.gen_range(0..8) {
    0 => format!("Hey {}! Don't break your {}-day streak! 💪", username, streak),
    1 => format!("{}, your fitness journey needs you today! 🔥", username),
    2 => format!("Time to log your {}, {}! 📱", join_names(missed, " and "), username),
    3 => format!("Champions like you don't skip days, {}! 🏆", username),
    4 => format!("Your future self will thank you, {}! ⚡", username),
    5 => format!("Consistency is your superpower, {}! 🌟", username),
    6 => format!("Just a quick reminder, {} - log your progress! 📈", username),
    _ => format!("You're doing amazing, {}! Don't stop now! 💯", username),
  }
}

/// Weekly performance tiers: >= 85%, [60, 85), below 60.
pub fn weekly_tier_message<R: Rng + ?Sized>(
  rng: &mut R,
  username: &str,
  completion_rate: f64,
  complete_days: i64,
) -> String {
  if completion_rate >= 85.0 {
    match rng.gen_range(0..3) {
      0 => format!("Outstanding week, {}! {}% completion rate! 🏆", username, completion_rate),
      1 => format!("You're on fire, {}! {}/7 days completed! 🔥", username, complete_days),
      _ => format!("Incredible consistency, {}! Keep it up! 🌟", username),
    }
  } else if completion_rate >= 60.0 {
    match rng.gen_range(0..3) {
      0 => format!("Great progress, {}! {}% this week! 💪", username, completion_rate),
      1 => format!("You're building strong habits, {}! 📈", username),
      _ => format!("Solid week, {}! Let's aim even higher! ⚡", username),
    }
  } else {
    match rng.gen_range(0..3) {
      0 => format!("New week, fresh start, {}! You've got this! 🚀", username),
      1 => format!("Every expert was once a beginner, {}! 💯", username),
      _ => format!("This week is your comeback week, {}! 🌟", username),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Achievements
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Achievement {
  FirstLog,
  Streak7,
  Streak14,
  Streak21,
  Streak30,
  CycleComplete,
  PerfectWeek,
  Comeback,
}

/// Milestone achievement for an exact streak value, if any.
pub fn streak_milestone(streak: i64) -> Option<Achievement> {
  match streak {
    7 => Some(Achievement::Streak7),
    14 => Some(Achievement::Streak14),
    21 => Some(Achievement::Streak21),
    30 => Some(Achievement::Streak30),
    _ => None,
  }
}

pub fn achievement_message(username: &str, achievement: Achievement) -> String {
  match achievement {
    Achievement::FirstLog => {
      format!("Welcome aboard, {}! Your journey begins now! 🚀", username)
    }
    Achievement::Streak7 => {
      format!("7-day streak achieved, {}! You're building momentum! 🔥", username)
    }
    Achievement::Streak14 => {
      format!("2 weeks strong, {}! Habits are forming! 💪", username)
    }
    Achievement::Streak21 => {
      format!("21 days! You're officially building a habit, {}! 🌟", username)
    }
    Achievement::Streak30 => {
      format!("30-day milestone reached, {}! You're unstoppable! 🏆", username)
    }
    Achievement::CycleComplete => {
      format!("30-day cycle completed, {}! Ready for the next challenge? 👑", username)
    }
    Achievement::PerfectWeek => {
      format!("Perfect week completed, {}! All workouts and meals logged! ⭐", username)
    }
    Achievement::Comeback => {
      format!("Welcome back, {}! Every comeback starts with a single step! 💯", username)
    }
  }
}

fn join_names(missed: &[ActivityKind], separator: &str) -> String {
  missed
    .iter()
    .map(|kind| kind.as_str())
    .collect::<Vec<_>>()
    .join(separator)
}
