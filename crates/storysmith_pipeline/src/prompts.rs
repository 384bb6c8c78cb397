//! Instruction templates for the three stage agents.
//!
//! Templates use `{audience}` and `{theme}` placeholders, filled with plain
//! string replacement because the ideator template contains literal JSON
//! braces.

use storysmith_core::RetrievalResult;

const QUERY_GENERATOR_TEMPLATE: &str = r#"You are a search query generator for children's story research.

Target Audience: {audience}
Genre: {theme}

Generate 3 focused web search queries to find inspiration for a children's story. Make sure to include the target audience and genre in the queries.

The queries should help discover the following:
1. Trending themes and characters for this age group and genre
2. Popular story elements that resonate with children
3. Educational or moral elements to incorporate

**Output Format:**
Provide your queries as JSON inside a ```json code block, with the following key:
- queries: A list of 3 search query strings

Keep queries long and search-engine friendly."#;

const QUERY_DIVERSITY_TEMPLATE: &str = r#"

**Creative Angle:** {seed}
Steer every query toward this angle so the research differs from other stories written for the same audience and genre."#;

const IDEATOR_TEMPLATE: &str = r#"Create a story idea from the incoming search results. The story idea should be based on the target audience and genre.

Target Audience: {audience}
Genre: {theme}

Example output:
{"title": "Benny's Big Day", "characters": "Benny, a curious bunny", "setting": "A sunny meadow", "conflict": "Benny gets lost", "resolution": "Friends help him find home", "sources": ["example.com"]}"#;

const IDEATOR_DIVERSITY_TEMPLATE: &str = r#"

Build the idea around this creative angle: {seed}"#;

const COMPOSER_TEMPLATE: &str = r#"You are a skilled children's story writer. Your job is to transform research and story ideas into a polished, engaging story.

Target Audience: {audience}
Genre: {theme}

**Writing Guidelines:**
1. Use vocabulary and sentence structure appropriate for {audience}
2. Maintain a consistent {theme} tone throughout
3. Include vivid, age-appropriate sensory details
4. Keep paragraphs short and digestible for young readers
5. Ensure the lesson/moral is woven naturally into the narrative

**Output Format:**
Provide your story as JSON inside a ```json code block, with the following keys:
- title: A catchy, memorable title
- age_group: "{audience}"
- genre: "{theme}"
- story: The full story text
- keywords: List of 3-5 relevant keywords
- summary: A 1-2 sentence summary for parents/educators
- site_links: Sources that inspired the story (from the research phase)

Write with warmth, creativity, and a clear understanding of what captivates {audience} readers in the {theme} genre."#;

const IDEATION_PREAMBLE: &str =
    "The search results are as follows. You need to ideate a single story from the search results.";

/// Human-readable audience label: segment `3_6` reads as `3-6`.
pub fn audience_label(segment: &str) -> String {
    segment.replace('_', "-")
}

fn fill(template: &str, segment: &str, theme: &str) -> String {
    template
        .replace("{audience}", &audience_label(segment))
        .replace("{theme}", theme)
}

/// Instructions for the query generator, optionally steered by a variation seed.
pub fn query_generator_instructions(segment: &str, theme: &str, seed: Option<&str>) -> String {
    let mut instructions = fill(QUERY_GENERATOR_TEMPLATE, segment, theme);
    if let Some(seed) = seed {
        instructions.push_str(&QUERY_DIVERSITY_TEMPLATE.replace("{seed}", seed));
    }
    instructions
}

/// User message handed to the query generator.
pub fn query_generator_input(segment: &str, theme: &str) -> String {
    format!(
        "Generate 3 search queries to make stories for age_group {} and genre {}",
        audience_label(segment),
        theme
    )
}

/// Instructions for the idea synthesizer.
pub fn ideator_instructions(segment: &str, theme: &str, seed: Option<&str>) -> String {
    let mut instructions = fill(IDEATOR_TEMPLATE, segment, theme);
    if let Some(seed) = seed {
        instructions.push_str(&IDEATOR_DIVERSITY_TEMPLATE.replace("{seed}", seed));
    }
    instructions
}

/// Instructions for the story composer.
pub fn composer_instructions(segment: &str, theme: &str) -> String {
    fill(COMPOSER_TEMPLATE, segment, theme)
}

/// User message handed to the idea synthesizer: every snippet with its source.
pub fn ideation_input(results: &[RetrievalResult]) -> String {
    let mut input = String::from(IDEATION_PREAMBLE);
    input.push_str("\n\n");
    for result in results {
        input.push_str(&format!("Query: {}\n", result.query));
        if result.is_empty() {
            input.push_str("(no results)\n");
        }
        for snippet in &result.snippets {
            input.push_str(&format!("- {}\n  Source: {}\n", snippet.text, snippet.source));
        }
        input.push('\n');
    }
    input
}

#[cfg(test)]
mod tests {
    use super::*;
    use storysmith_core::Snippet;

    #[test]
    fn test_placeholders_are_filled() {
        for text in [
            query_generator_instructions("3_6", "friendship", None),
            ideator_instructions("3_6", "friendship", None),
            composer_instructions("3_6", "friendship"),
        ] {
            assert!(text.contains("Target Audience: 3-6"));
            assert!(text.contains("Genre: friendship"));
            assert!(!text.contains("{audience}"));
            assert!(!text.contains("{theme}"));
        }
    }

    #[test]
    fn test_ideator_keeps_json_example() {
        let text = ideator_instructions("0_2", "animals", None);
        assert!(text.contains(r#"{"title": "Benny's Big Day""#));
    }

    #[test]
    fn test_seed_changes_instructions() {
        let plain = query_generator_instructions("7_9", "science", None);
        let a = query_generator_instructions("7_9", "science", Some("set in space"));
        let b = query_generator_instructions("7_9", "science", Some("told by a robot"));
        assert!(a.starts_with(&plain));
        assert!(a.contains("set in space"));
        assert_ne!(a, b);
        assert!(!plain.contains("{seed}"));
    }

    #[test]
    fn test_ideation_input_lists_sources() {
        let results = vec![
            RetrievalResult::new(
                "fox stories",
                vec![Snippet {
                    text: "Foxes are clever.".to_string(),
                    source: "https://example.org/fox".to_string(),
                }],
            ),
            RetrievalResult::new("sharing lessons", vec![]),
        ];
        let input = ideation_input(&results);
        assert!(input.starts_with(IDEATION_PREAMBLE));
        assert!(input.contains("Query: fox stories"));
        assert!(input.contains("Source: https://example.org/fox"));
        assert!(input.contains("(no results)"));
    }
}
