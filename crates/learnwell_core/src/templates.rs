//! crates/learnwell_core/src/templates.rs
//!
//! Template generators used when no model is available or a model call fails.
//! Each one produces the same headings, in the same order, as the instructions
//! sent to the live backend, using only local data.

use crate::domain::{defaults, Profile};
use crate::headings::{lesson, projects, study_plan, support};
use rand::seq::SliceRandom;
use rand::Rng;

//=========================================================================================
// Lesson
//=========================================================================================

struct ConceptTemplate {
    name: &'static str,
    simple: &'static str,
    picture: &'static str,
    question: &'static str,
    answer: &'static str,
}

const LESSON_CONCEPTS: &[ConceptTemplate] = &[
    ConceptTemplate {
        name: "The Foundation",
        simple: "Every topic has a starting point. This is yours.\nThink of it as learning the alphabet before reading books.",
        picture: "Imagine building a house. You need the foundation first.\nWithout it, nothing else can stand properly.",
        question: "What's the first step in learning any new topic?",
        answer: "Understanding the basic building blocks!",
    },
    ConceptTemplate {
        name: "Putting It Together",
        simple: "Now we combine what we learned.\nThis is where things start to click.",
        picture: "Like cooking a recipe - you gather ingredients, then combine them.\nEach step builds on the last.",
        question: "How do basics help with advanced topics?",
        answer: "They give you the tools to understand bigger ideas!",
    },
    ConceptTemplate {
        name: "Real-World Application",
        simple: "Knowledge is most powerful when we use it.\nLet's see how this applies to real situations.",
        picture: "You learned to ride a bike, now you can go anywhere.\nSkills become freedom.",
        question: "Why practice applying what you learn?",
        answer: "It makes the knowledge stick and become useful!",
    },
];

pub fn mock_lesson(profile: &Profile, file_name: &str) -> String {
    let goal = profile.primary_goal();
    let mut out = format!(
        "{title}Learning: {file_name}\n\n\
         {learn}\n\n\
         This lesson covers key concepts from your {subject} material.\n\
         We'll go step by step, making everything clear and manageable.\n\n\
         {why}\n\n\
         This connects directly to your goal: \"{goal}\"\n\
         Understanding this will help you build a strong foundation.\n\n\
         {concepts}\n",
        title = lesson::TITLE,
        learn = lesson::WHAT_YOULL_LEARN,
        why = lesson::WHY_IT_MATTERS,
        concepts = lesson::KEY_CONCEPTS,
        subject = profile.subject(),
    );

    for (i, concept) in LESSON_CONCEPTS.iter().enumerate() {
        out.push_str(&format!(
            "\n{heading}{n}: {name}\n\n\
             {simple_label}\n{simple}\n\n\
             {picture_label}\n{picture}\n\n\
             {try_label}\n\
             Question: {question}\n\
             Answer: {answer}\n",
            heading = lesson::CONCEPT,
            n = i + 1,
            name = concept.name,
            simple_label = lesson::SIMPLE_VERSION,
            simple = concept.simple,
            picture_label = lesson::PICTURE_THIS,
            picture = concept.picture,
            try_label = lesson::TRY_IT,
            question = concept.question,
            answer = concept.answer,
        ));
    }

    out.push_str(&format!(
        "\n{review}\n\n\
         - Start with the basics - they're your foundation\n\
         - Build up step by step - don't rush\n\
         - Apply what you learn - that's when it clicks\n\n\
         {plan}\n\n\
         Based on {hours} hours/week:\n\
         - **Today (15 min):** Review the key concepts above\n\
         - **This Week:** Try explaining one concept to someone else\n\
         - **Remember:** \"{goal}\"\n\n\
         ---\n\
         {closing}Great work, {name}! Every step forward counts.\n",
        review = lesson::QUICK_REVIEW,
        plan = lesson::ACTION_PLAN,
        hours = profile.weekly_study_hours(),
        closing = lesson::CLOSING,
        name = profile.name,
    ));
    out
}

//=========================================================================================
// Study Plan
//=========================================================================================

pub fn mock_study_plan(profile: &Profile, pending: &[String]) -> String {
    let materials = if pending.is_empty() {
        "No pending materials - use this week to revise and get ahead.".to_string()
    } else {
        format!("Materials to cover: {}", pending.join(", "))
    };

    format!(
        "{title}\n\n\
         {overview}\n\
         Based on your {hours} hours/week availability\n\
         {materials}\n\n\
         {best_times}\n\
         {time}\n\n\
         ---\n\n\
         {early}\n\
         **Focus:** Review and understand\n\
         - 30 min: Read through materials\n\
         - 15 min: Take notes on key points\n\
         - 5 min: Quick break (stretch, water)\n\
         - 10 min: Review notes\n\n\
         {late}\n\
         **Focus:** Practice and apply\n\
         - 20 min: Try practice questions\n\
         - 20 min: Work through examples\n\
         - 10 min: Note any confusion areas\n\n\
         {weekend}\n\
         **Focus:** Consolidate and rest\n\
         - Saturday: 30 min light review\n\
         - Sunday: Rest! Your brain needs it 🧠\n\n\
         ---\n\n\
         {reminders}\n\
         - 💧 Stay hydrated\n\
         - 🧘 Take breaks every 25 minutes\n\
         - 😴 Aim for {sleep}+ hours of sleep\n\
         - 🎯 Keep your goal in mind: {goal}\n\n\
         ---\n\
         {closing}You've got this, {name}!\n",
        title = study_plan::TITLE,
        overview = study_plan::OVERVIEW,
        hours = profile.weekly_study_hours(),
        best_times = study_plan::BEST_TIMES,
        time = profile.preferred_study_time(),
        early = study_plan::EARLY_WEEK,
        late = study_plan::LATE_WEEK,
        weekend = study_plan::WEEKEND,
        reminders = study_plan::DAILY_REMINDERS,
        sleep = profile.sleep_hours(),
        goal = profile.primary_goal(),
        closing = study_plan::CLOSING,
        name = profile.name,
    )
}

//=========================================================================================
// Project Ideas
//=========================================================================================

/// A reusable project archetype from the built-in catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectArchetype {
    pub title: &'static str,
    pub description: &'static str,
    pub skills: &'static str,
}

const fn archetype(
    title: &'static str,
    description: &'static str,
    skills: &'static str,
) -> ProjectArchetype {
    ProjectArchetype {
        title,
        description,
        skills,
    }
}

const COMPUTER_SCIENCE: &[ProjectArchetype] = &[
    archetype(
        "Algorithm Visualizer",
        "Build an interactive web tool that visualizes sorting algorithms",
        "JavaScript, Data Structures, UI Design",
    ),
    archetype(
        "API Integration Project",
        "Create an app that pulls data from public APIs and displays it creatively",
        "REST APIs, Data Processing, Frontend Development",
    ),
    archetype(
        "Chrome Extension",
        "Build a productivity extension for Chrome browser",
        "JavaScript, Browser APIs, Problem Solving",
    ),
];

const MATHEMATICS: &[ProjectArchetype] = &[
    archetype(
        "Math Problem Generator",
        "Create a tool that generates practice problems with solutions",
        "Python, Problem Design, Teaching",
    ),
    archetype(
        "Data Visualization Dashboard",
        "Build interactive charts showing mathematical concepts",
        "Statistics, Data Viz, Communication",
    ),
    archetype(
        "Calculator App",
        "Design a specialized calculator for specific math domains",
        "Programming, Math Logic, UX Design",
    ),
];

const ENGINEERING: &[ProjectArchetype] = &[
    archetype(
        "CAD Model Portfolio",
        "Create 3D models of mechanical designs",
        "CAD Software, Design Thinking, Documentation",
    ),
    archetype(
        "Arduino Project",
        "Build a working prototype using Arduino/Raspberry Pi",
        "Electronics, Programming, Problem Solving",
    ),
    archetype(
        "Engineering Blog",
        "Write technical articles explaining engineering concepts",
        "Technical Writing, Research, Communication",
    ),
];

const GENERIC: &[ProjectArchetype] = &[
    archetype(
        "Portfolio Website",
        "Showcase your academic work and projects",
        "Web Dev, Design, Personal Branding",
    ),
    archetype(
        "Study Tracker",
        "Track and analyze your learning patterns",
        "Data Analysis, Self-Monitoring, Automation",
    ),
    archetype(
        "Tutorial Series",
        "Create tutorials teaching concepts from your material",
        "Communication, Teaching, Content Creation",
    ),
];

const MAX_MOCK_PROJECTS: usize = 3;

/// The catalog for a subject, or the generic one for anything unrecognised.
pub fn project_catalog(subject: &str) -> &'static [ProjectArchetype] {
    match subject.trim().to_lowercase().as_str() {
        "computer science" => COMPUTER_SCIENCE,
        "mathematics" => MATHEMATICS,
        "engineering" => ENGINEERING,
        _ => GENERIC,
    }
}

/// Picks up to three archetypes at random. The count depends only on the
/// catalog size, never on the draw.
pub fn select_projects<R: Rng + ?Sized>(subject: &str, rng: &mut R) -> Vec<ProjectArchetype> {
    let catalog = project_catalog(subject);
    catalog
        .choose_multiple(rng, MAX_MOCK_PROJECTS.min(catalog.len()))
        .copied()
        .collect()
}

pub fn mock_project_ideas<R: Rng + ?Sized>(
    profile: &Profile,
    material_name: &str,
    rng: &mut R,
) -> String {
    let subject = profile.subject();
    let hours = profile.weekly_study_hours();
    let mut out = format!("{}\"{}\"\n\n---\n", projects::TITLE, material_name);

    for (i, project) in select_projects(subject, rng).iter().enumerate() {
        out.push_str(&format!(
            "\n{heading}{n}: {title}\n\n\
             {build_label}\n{description}\n\n\
             {skills_label}\n{skills}\n\n\
             {time_label} 2-4 weeks ({hours}-20 hours total)\n\n\
             {difficulty_label} Intermediate\n\n\
             {why_label}\n\
             Demonstrates hands-on application of {subject} concepts and builds your portfolio.\n\n\
             {start_label}\n\
             1. Research existing examples in this space\n\
             2. Sketch out your approach and required features\n\
             3. Start with a minimum viable version\n\n\
             ---\n",
            heading = projects::PROJECT,
            n = i + 1,
            title = project.title,
            build_label = projects::WHAT_YOULL_BUILD,
            description = project.description,
            skills_label = projects::SKILLS,
            skills = project.skills,
            time_label = projects::TIME_ESTIMATE,
            difficulty_label = projects::DIFFICULTY,
            why_label = projects::WHY_IT_MATTERS,
            start_label = projects::GETTING_STARTED,
        ));
    }

    out.push_str(&format!(
        "\n{}{}\n",
        projects::CLOSING,
        profile.primary_goal()
    ));
    out
}

//=========================================================================================
// Support Guidance
//=========================================================================================

pub fn mock_support(profile: &Profile, area: &str) -> String {
    let name = &profile.name;
    let challenge = match &profile.difference {
        Some(d) if !d.types.is_empty() => d.types.join(" and "),
        _ => "your challenges".to_string(),
    };
    let accommodations = if profile.goals.accessibility_needs.is_empty() {
        defaults::ACCESSIBILITY.to_string()
    } else {
        profile
            .goals
            .accessibility_needs
            .iter()
            .take(2)
            .cloned()
            .collect::<Vec<_>>()
            .join(", ")
    };

    format!(
        "{title}{name} - {area}\n\n\
         {see}\n\n\
         Managing {challenge} while keeping up with university is incredibly challenging, {name}. \
         Your stress level of {stress}/10 and {sleep} hours of sleep tell us a lot about how things feel right now. \
         That's okay - you're not alone.\n\n\
         {address}{area}\n\n\
         **Strategy 1: Break It Down**\n\
         Instead of looking at everything at once, focus on the next 24 hours. What's ONE thing you can accomplish today? Just one.\n\n\
         **Strategy 2: Use Your Accommodations**\n\
         You told us these help: {accommodations}. Make sure they're registered with your university.\n\n\
         **Strategy 3: Connect with Support**\n\
         - Visit Counseling Services (free sessions available)\n\
         - Register with Disability Services if you haven't\n\
         - Talk to your personal tutor about {subject}\n\n\
         **Strategy 4: Protect Your Sleep**\n\
         Aim for just 30 minutes more than your usual {sleep} hours tonight. Better sleep = better focus.\n\n\
         **Strategy 5: Be Kind to Yourself**\n\
         You're working toward \"{goal}\" while managing a lot. That's actually impressive.\n\n\
         {resources}\n\n\
         1. **Counseling Center**: Call for appointment\n\
         2. **Disability Services**: Register accommodations\n\
         3. **Academic Advisor**: Discuss your workload\n\
         4. **Peer Support**: Find others who understand\n\n\
         {today}\n\n\
         Pick ONE:\n\
         - [ ] Email your hardest professor about accommodations\n\
         - [ ] Schedule one counseling appointment\n\
         - [ ] Get 7 hours sleep tonight\n\
         - [ ] Complete one small assignment\n\n\
         {closing}\n\n\
         {name}, you're showing up despite {challenge}. That takes real strength. \
         Progress isn't linear. Keep taking it one step at a time. 🌟\n",
        title = support::TITLE,
        see = support::I_SEE_YOU,
        address = support::ADDRESS,
        resources = support::RESOURCES,
        today = support::TODAY,
        closing = support::CLOSING,
        stress = profile.stress(),
        sleep = profile.sleep_hours(),
        subject = profile.subject(),
        goal = profile.primary_goal(),
    )
}
