//! crates/learnwell_core/src/context.rs
//!
//! Projects a learner profile into the structured summary every generation flow
//! embeds in its instructions.

use crate::domain::{defaults, Profile};
use std::fmt::Write;

fn join_or(items: &[String], fallback: &str) -> String {
    if items.is_empty() {
        fallback.to_string()
    } else {
        items.join(", ")
    }
}

fn text_or<'a>(value: Option<&'a str>, fallback: &'a str) -> &'a str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => fallback,
    }
}

/// Renders the profile summary.
///
/// Sections always appear in the same order: basic info, wellbeing, learning
/// challenges (only when the learner reported one), goals and barriers. Missing
/// fields render as their documented defaults.
pub fn build_student_context(profile: &Profile) -> String {
    let mut out = String::new();

    // `write!` into a String cannot fail.
    let _ = write!(
        out,
        "\n## STUDENT PROFILE\n\n\
         **Basic Info:**\n\
         - Name: {name}\n\
         - Age: {age}\n\
         - Subject: {subject} (Year {year})\n\
         - Learning Style: {style}\n\
         - Best Study Time: {time}\n\
         - Weekly Study Hours: {hours}\n",
        name = profile.name,
        age = profile
            .age
            .map(|a| a.to_string())
            .unwrap_or_else(|| defaults::NOT_SPECIFIED.to_string()),
        subject = profile.subject(),
        year = profile.year_of_study(),
        style = profile.learning_style_label(),
        time = profile.preferred_study_time(),
        hours = profile.weekly_study_hours(),
    );

    let _ = write!(
        out,
        "\n**Current Wellbeing:**\n\
         - Anxiety: {anxiety}/10\n\
         - Stress: {stress}/10\n\
         - Motivation: {motivation}/10\n\
         - Mood (feeling down): {mood}/10\n\
         - Sleep: {sleep} hours ({quality})\n",
        anxiety = profile.anxiety(),
        stress = profile.stress(),
        motivation = profile.motivation(),
        mood = profile.mood(),
        sleep = profile.sleep_hours(),
        quality = profile.sleep_quality_label(),
    );

    if let Some(difference) = &profile.difference {
        let _ = write!(
            out,
            "\n**Learning Challenges:**\n\
             - Types: {types}\n\
             - Impact: {severity}\n\
             - Details: {details}\n\
             - What Helps: {helps}\n",
            types = join_or(&difference.types, defaults::DIFFERENCE_TYPES),
            severity = difference
                .severity
                .map(|s| s.label())
                .unwrap_or(defaults::SEVERITY),
            details = text_or(difference.details.as_deref(), defaults::NOT_SPECIFIED),
            helps = text_or(
                difference.supports_that_help.as_deref(),
                defaults::NOT_SPECIFIED
            ),
        );
    }

    let _ = write!(
        out,
        "\n**Goals & Barriers:**\n\
         - Main Goal: {goal}\n\
         - Barriers: {barriers}\n\
         - Accessibility Needs: {access}\n\
         - Notes: {notes}\n",
        goal = profile.primary_goal(),
        barriers = join_or(&profile.goals.barriers, defaults::BARRIERS),
        access = join_or(&profile.goals.accessibility_needs, defaults::ACCESSIBILITY),
        notes = text_or(profile.goals.notes.as_deref(), defaults::NOTES),
    );

    out
}
