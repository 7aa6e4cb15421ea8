//! crates/learnwell_core/src/headings.rs
//!
//! Section headings shared by the live instructions and the template generators.
//! Rendering code only displays the text, so these strings and their order are
//! the interchange contract between both generation paths.

pub mod lesson {
    pub const TITLE: &str = "# 📚 ";
    pub const WHAT_YOULL_LEARN: &str = "## 🎯 What You'll Learn";
    pub const WHY_IT_MATTERS: &str = "## 💡 Why This Matters";
    pub const KEY_CONCEPTS: &str = "## 📖 Key Concepts";
    pub const CONCEPT: &str = "### Concept ";
    pub const SIMPLE_VERSION: &str = "**The Simple Version:**";
    pub const PICTURE_THIS: &str = "**Picture This:**";
    pub const TRY_IT: &str = "**Try It:**";
    pub const QUICK_REVIEW: &str = "## ✅ Quick Review";
    pub const ACTION_PLAN: &str = "## 🚀 Your Action Plan";
    pub const CLOSING: &str = "💙 ";

    pub const ALL: &[&str] = &[
        TITLE,
        WHAT_YOULL_LEARN,
        WHY_IT_MATTERS,
        KEY_CONCEPTS,
        CONCEPT,
        SIMPLE_VERSION,
        PICTURE_THIS,
        TRY_IT,
        QUICK_REVIEW,
        ACTION_PLAN,
        CLOSING,
    ];
}

pub mod study_plan {
    pub const TITLE: &str = "# 📅 Your Weekly Study Plan";
    pub const OVERVIEW: &str = "## Overview";
    pub const BEST_TIMES: &str = "### Best Times for You";
    pub const EARLY_WEEK: &str = "## Monday - Wednesday";
    pub const LATE_WEEK: &str = "## Thursday - Friday";
    pub const WEEKEND: &str = "## Weekend";
    pub const DAILY_REMINDERS: &str = "## Daily Reminders";
    pub const CLOSING: &str = "💙 ";

    pub const ALL: &[&str] = &[
        TITLE,
        OVERVIEW,
        BEST_TIMES,
        EARLY_WEEK,
        LATE_WEEK,
        WEEKEND,
        DAILY_REMINDERS,
        CLOSING,
    ];
}

pub mod projects {
    pub const TITLE: &str = "# 🚀 Project Ideas Based on ";
    pub const PROJECT: &str = "## Project ";
    pub const WHAT_YOULL_BUILD: &str = "**What You'll Build:**";
    pub const SKILLS: &str = "**Skills You'll Gain:**";
    pub const TIME_ESTIMATE: &str = "**Time Estimate:**";
    pub const DIFFICULTY: &str = "**Difficulty:**";
    pub const WHY_IT_MATTERS: &str = "**Why This Matters:**";
    pub const GETTING_STARTED: &str = "**Getting Started:**";
    pub const CLOSING: &str = "💪 Current goal: ";

    pub const ALL: &[&str] = &[
        TITLE,
        PROJECT,
        WHAT_YOULL_BUILD,
        SKILLS,
        TIME_ESTIMATE,
        DIFFICULTY,
        WHY_IT_MATTERS,
        GETTING_STARTED,
        CLOSING,
    ];
}

pub mod support {
    pub const TITLE: &str = "## Support for ";
    pub const I_SEE_YOU: &str = "### 💙 I See You";
    pub const ADDRESS: &str = "### 🎯 Let's Address ";
    pub const RESOURCES: &str = "### 📞 Resources to Use This Week";
    pub const TODAY: &str = "### ✨ Your Action for TODAY";
    pub const CLOSING: &str = "### 💪 You've Got This";

    pub const ALL: &[&str] = &[TITLE, I_SEE_YOU, ADDRESS, RESOURCES, TODAY, CLOSING];
}

/// Returns the headings of `contract` that are missing from `text` or appear out
/// of order. An empty result means the text honours the contract.
pub fn missing_headings<'a>(text: &str, contract: &[&'a str]) -> Vec<&'a str> {
    let mut missing = Vec::new();
    let mut cursor = 0;
    for heading in contract {
        match text[cursor..].find(heading) {
            Some(pos) => cursor += pos + heading.len(),
            None => missing.push(*heading),
        }
    }
    missing
}
