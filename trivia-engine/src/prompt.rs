//! Prompt builders: strict-format system message plus plain/enhanced user prompts.

/// System instructions for trivia generation.
pub const TRIVIA_SYSTEM: &str = r#"
You are a sports trivia author. Cricket (especially the IPL) has priority; other sports are allowed only when the topic asks for them.
Return ONLY one JSON object, no prose and no code fences, with exactly this shape:
{"data":[{"question":"...","options":["...","...","...","..."],"answer":["..."]}]}
Rules:
- exactly 5 questions in "data";
- every question has exactly 4 distinct options;
- "answer" holds exactly one string, copied verbatim from "options";
- questions must be factual and about sports.
"#;

/// System instructions for query normalization.
pub const NORMALIZER_SYSTEM: &str = r#"
You rewrite sports search queries for a cricket knowledge base.
Keep team and player nicknames (e.g. "Thala", "RCB"), expand abbreviations (e.g. "MI" -> "Mumbai Indians", "CSK" -> "Chennai Super Kings"), fix spelling, and drop words that are not about sports.
Reply with the rewritten query only, on a single line.
"#;

/// User prompt for plain generation from the topic alone.
///
/// # Example
/// ```
/// # use trivia_engine::prompt::build_plain_prompt;
/// let p = build_plain_prompt("IPL finals");
/// assert!(p.contains("Topic: IPL finals"));
/// ```
pub fn build_plain_prompt(topic: &str) -> String {
    format!(
        "Topic: {}\n\nWrite 5 multiple-choice trivia questions about this topic.\n{}",
        topic.trim(),
        FORMAT_REMINDER
    )
}

/// User prompt for enhanced generation: topic plus a labeled fact block.
pub fn build_enhanced_prompt(topic: &str, context: &str) -> String {
    let mut out = String::new();
    out.push_str("Topic: ");
    out.push_str(topic.trim());
    out.push_str("\n\nFacts (retrieved, use them as ground truth):\n");
    out.push_str(context.trim());
    out.push_str(
        "\n\nWrite 5 multiple-choice trivia questions about the topic. \
         Prefer questions answerable from the facts above.\n",
    );
    out.push_str(FORMAT_REMINDER);
    out
}

/// Build the normalizer user prompt.
pub fn build_normalizer_prompt(query: &str) -> String {
    format!("Query: {}\nRewritten query:", query.trim())
}

const FORMAT_REMINDER: &str =
    "Respond with the JSON object only: 5 questions, 4 options each, 1 answer taken from the options.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enhanced_prompt_embeds_context_block() {
        let p = build_enhanced_prompt(" IPL finals ", "Match Info: CSK beat GT\n\n---\n\nMatch Info: KKR beat SRH");
        assert!(p.starts_with("Topic: IPL finals\n"));
        assert!(p.contains("Match Info: CSK beat GT\n\n---\n\nMatch Info: KKR beat SRH"));
        assert!(p.ends_with(FORMAT_REMINDER));
    }

    #[test]
    fn plain_prompt_has_no_facts_section() {
        assert!(!build_plain_prompt("cricket").contains("Facts"));
    }
}
