//! crates/learnwell_core/src/prompts.rs
//!
//! Instruction blocks sent to the live backend. Headings come from
//! [`crate::headings`] so model output and template output share one layout.

use crate::context::build_student_context;
use crate::domain::Profile;
use crate::headings::{lesson, projects, study_plan, support};

/// Anxiety at or above this level switches lessons to a reassuring register.
pub const CALM_REGISTER_ANXIETY: u8 = 7;

pub const LESSON_MAX_TOKENS: u32 = 4000;
pub const STUDY_PLAN_MAX_TOKENS: u32 = 1500;
pub const PROJECT_IDEAS_MAX_TOKENS: u32 = 2500;
pub const SUPPORT_MAX_TOKENS: u32 = 1500;

/// Focus areas offered by the support page. Free text is accepted as well.
pub const FOCUS_AREAS: &[&str] = &[
    "Managing my anxiety/stress",
    "Improving my grades",
    "Dealing with missed assignments",
    "Time management and organization",
    "Motivation and energy",
    "Using my accommodations",
    "Building better study habits",
    "Balancing mental health and academics",
    "Getting back on track after falling behind",
];

pub fn lesson_register(profile: &Profile) -> &'static str {
    if profile.anxiety() >= CALM_REGISTER_ANXIETY {
        "simple and reassuring"
    } else {
        "clear and engaging"
    }
}

pub fn lesson_instructions(profile: &Profile) -> String {
    let hours = profile.weekly_study_hours();
    let goal = profile.primary_goal();
    format!(
        r#"You are a skilled, empathetic tutor. Read the attached document and create a personalized lesson for this student.

{context}
## TEACHING APPROACH

Based on this student's profile:
- Use {register} language (Grade 8 reading level)
- Keep paragraphs short (2-3 sentences max)
- Include frequent encouragement
- Match their learning style: {style}
- Consider their {hours} hours/week availability

## LESSON STRUCTURE

Use exactly these headings, in this order:

{title}[Topic Title]

{learn}
A brief, encouraging overview (2-3 sentences)

{why}
Connect to their goal: "{goal}"
Make it relevant to {subject}

{concepts}

{concept}1: [Name]
{simple}
Plain explanation in everyday language

{picture}
A vivid analogy or mental image

{try_it}
A quick practice question with answer

{concept}2: [Name]
[Same structure...]

Continue for EVERY major concept in the document. Do not stop at a fixed number of concepts.

{review}
- Key point 1
- Key point 2
- Key point 3

{plan}
Based on {hours} hours/week:
- **Today (15 min):** [Specific task]
- **This Week:** [Study plan]
- **Remember:** [Encouraging note about their goal]

---
{closing}[Closing encouragement for {name}. Remind them to take breaks when needed.]
"#,
        context = build_student_context(profile),
        register = lesson_register(profile),
        style = profile.learning_style_label(),
        subject = profile.subject(),
        name = profile.name,
        title = lesson::TITLE,
        learn = lesson::WHAT_YOULL_LEARN,
        why = lesson::WHY_IT_MATTERS,
        concepts = lesson::KEY_CONCEPTS,
        concept = lesson::CONCEPT,
        simple = lesson::SIMPLE_VERSION,
        picture = lesson::PICTURE_THIS,
        try_it = lesson::TRY_IT,
        review = lesson::QUICK_REVIEW,
        plan = lesson::ACTION_PLAN,
        closing = lesson::CLOSING,
    )
}

pub fn study_plan_instructions(profile: &Profile, pending: &[String]) -> String {
    let material_list = if pending.is_empty() {
        "No pending materials. Build a general revision and study-skills plan instead.".to_string()
    } else {
        pending
            .iter()
            .map(|name| format!("- {name}"))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        r#"Create a personalized weekly study plan for this student.

{context}
**Materials to Study:**
{material_list}

Create a realistic, supportive plan considering:
- Their {hours} available hours/week. The plan must not exceed this budget.
- Best study time: {time}. Schedule sessions in this window.
- Anxiety level: {anxiety}/10
- Include breaks and self-care reminders

Use exactly these headings, in this order:

{title}
{overview}
{best_times}
{early}
{late}
{weekend}
{reminders}

End with a line starting "{closing}" that encourages {name}."#,
        context = build_student_context(profile),
        hours = profile.weekly_study_hours(),
        time = profile.preferred_study_time(),
        anxiety = profile.anxiety(),
        name = profile.name,
        title = study_plan::TITLE,
        overview = study_plan::OVERVIEW,
        best_times = study_plan::BEST_TIMES,
        early = study_plan::EARLY_WEEK,
        late = study_plan::LATE_WEEK,
        weekend = study_plan::WEEKEND,
        reminders = study_plan::DAILY_REMINDERS,
        closing = study_plan::CLOSING,
    )
}

/// Titles of previously generated project ideas, read back from their headings.
pub fn previous_project_titles(text: &str) -> Vec<String> {
    text.lines()
        .filter_map(|line| line.trim().strip_prefix(projects::PROJECT))
        .filter_map(|rest| rest.split_once(':').map(|(_, title)| title.trim()))
        .filter(|title| !title.is_empty())
        .map(str::to_string)
        .collect()
}

/// Instructions for the project-ideas flow.
///
/// Previously suggested titles are listed so the model can avoid them. This is
/// advisory: nothing checks the reply for repeats.
pub fn project_ideas_instructions(
    profile: &Profile,
    material_name: &str,
    previous_titles: &[String],
    has_document: bool,
) -> String {
    let hours = profile.weekly_study_hours();
    let source_note = if has_document {
        "Apply concepts from the attached document to real-world problems"
    } else {
        "Apply concepts a student would meet in this material to real-world problems"
    };
    let avoid = if previous_titles.is_empty() {
        String::new()
    } else {
        format!(
            "\n**Already suggested (do NOT repeat these or close variants):**\n{}\n",
            previous_titles
                .iter()
                .map(|t| format!("- {t}"))
                .collect::<Vec<_>>()
                .join("\n")
        )
    };

    format!(
        r#"Generate 3-5 creative, real-world project ideas based on this learning material that the student can build outside of university.

{context}
**Learning Material:** {material_name}
{avoid}
Generate project ideas that:
1. {source_note}
2. Match the student's skill level and available time ({hours} hours/week)
3. Build transferable skills relevant to {subject}
4. Can be completed in 2-6 weeks
5. Could be portfolio pieces or used for job applications
6. Consider their goal: "{goal}"
7. Are DIFFERENT each time - provide fresh, creative ideas you have not suggested before

Use exactly this layout:

{title}"{material_name}"

---

{project}1: [Project Title]

{build}
2-3 sentence description

{skills}
List of transferable skills

{time_estimate} [Realistic timeframe]

{difficulty} [Beginner/Intermediate/Advanced]

{why}
How it relates to career/portfolio

{start}
First 3 concrete steps

---

Repeat for every project, then finish with a line starting "{closing}" followed by their goal."#,
        context = build_student_context(profile),
        subject = profile.subject(),
        goal = profile.primary_goal(),
        title = projects::TITLE,
        project = projects::PROJECT,
        build = projects::WHAT_YOULL_BUILD,
        skills = projects::SKILLS,
        time_estimate = projects::TIME_ESTIMATE,
        difficulty = projects::DIFFICULTY,
        why = projects::WHY_IT_MATTERS,
        start = projects::GETTING_STARTED,
        closing = projects::CLOSING,
    )
}

pub fn support_instructions(profile: &Profile, area: &str) -> String {
    format!(
        r#"You are a compassionate assistant supporting a university student. Provide empathetic, practical guidance.

{context}
Focus Area: {area}

Use exactly these headings, in this order:

{title}{name} - {area}
{see}
Empathetic acknowledgment of their challenges
{address}{area}
3-5 specific, actionable strategies
{resources}
Campus resources to use
{today}
Small first steps they can take TODAY
{closing}
Encouragement and hope

Be warm, understanding, and practical. Avoid being preachy."#,
        context = build_student_context(profile),
        name = profile.name,
        title = support::TITLE,
        see = support::I_SEE_YOU,
        address = support::ADDRESS,
        resources = support::RESOURCES,
        today = support::TODAY,
        closing = support::CLOSING,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headings::missing_headings;

    fn profile(anxiety: u8) -> Profile {
        let mut p = Profile::new("STU20250001", "Noor", "noor@example.com");
        p.wellbeing.anxiety = Some(anxiety);
        p
    }

    #[test]
    fn anxious_learners_get_reassuring_register() {
        assert_eq!(lesson_register(&profile(7)), "simple and reassuring");
        assert_eq!(lesson_register(&profile(6)), "clear and engaging");
        assert!(lesson_instructions(&profile(9)).contains("Use simple and reassuring language"));
    }

    #[test]
    fn instructions_carry_the_shared_headings() {
        let p = profile(3);
        assert!(missing_headings(&lesson_instructions(&p), lesson::ALL).is_empty());
        assert!(missing_headings(&study_plan_instructions(&p, &[]), study_plan::ALL).is_empty());
        assert!(missing_headings(
            &project_ideas_instructions(&p, "graphs.pdf", &[], true),
            projects::ALL
        )
        .is_empty());
        assert!(missing_headings(&support_instructions(&p, "Motivation and energy"), support::ALL)
            .is_empty());
    }

    #[test]
    fn every_instruction_embeds_the_profile_context() {
        let p = profile(3);
        for text in [
            lesson_instructions(&p),
            study_plan_instructions(&p, &[]),
            project_ideas_instructions(&p, "graphs.pdf", &[], false),
            support_instructions(&p, "Improving my grades"),
        ] {
            assert!(text.contains("## STUDENT PROFILE"));
        }
    }

    #[test]
    fn empty_pending_list_still_asks_for_a_plan() {
        let text = study_plan_instructions(&profile(3), &[]);
        assert!(text.contains("No pending materials"));
        let text = study_plan_instructions(&profile(3), &["a.pdf".into()]);
        assert!(text.contains("- a.pdf"));
    }

    #[test]
    fn previous_titles_are_listed_for_avoidance() {
        let earlier = "# 🚀 Project Ideas Based on \"x\"\n\n## Project 1: Graph Explorer\n\n## Project 2: Route Planner\n";
        let titles = previous_project_titles(earlier);
        assert_eq!(titles, vec!["Graph Explorer".to_string(), "Route Planner".to_string()]);

        let text = project_ideas_instructions(&profile(3), "graphs.pdf", &titles, true);
        assert!(text.contains("do NOT repeat"));
        assert!(text.contains("- Route Planner"));
    }
}
