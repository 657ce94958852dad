//! Prompt templates for the meeting flow

/// Templates for generating prompts at each stage of a meeting
pub struct DiscussionPrompts;

impl DiscussionPrompts {
    /// System profile for agenda building
    pub fn agenda_system() -> &'static str {
        r#"You are a meeting moderator preparing a structured discussion.
Your task is to break a topic down into a short, ordered agenda.
Respond with one agenda point per line and nothing else.
No preamble, no numbering commentary, no closing remarks."#
    }

    /// Request an agenda for the topic
    pub fn agenda_request(topic: &str, points: usize) -> String {
        format!(
            r#"The discussion topic is:

{topic}

List the {points} most important agenda points to cover, one per line, ordered from foundational to forward-looking."#
        )
    }

    /// System profile for a persona turn, shaped by the persona's role text
    pub fn persona_system(name: &str, role: &str) -> String {
        format!(
            r#"You are {name}, a participant in a panel discussion.
Your role: {role}
Stay in character. Speak in first person, address the other participants directly, and keep your contribution to a few short paragraphs.
React to what has already been said rather than repeating it."#
        )
    }

    /// Prompt for one persona turn
    pub fn turn_prompt(
        topic: &str,
        agenda_item: &str,
        transcript: &str,
        interjection: Option<&str>,
    ) -> String {
        let mut prompt = format!(
            r#"Discussion topic: {topic}
Current agenda point: {agenda_item}

Discussion so far:
{transcript}"#
        );

        if let Some(interjection) = interjection {
            prompt.push_str(&format!(
                "\nA listener just interjected with the following, please address it:\n{interjection}\n"
            ));
        }

        prompt.push_str("\nGive your contribution on the current agenda point.");
        prompt
    }

    /// System profile for the closing summary
    pub fn summary_system() -> &'static str {
        r#"You are the meeting moderator writing the closing summary.
Be balanced and objective. Attribute notable positions to the participants who held them."#
    }

    /// Prompt for the closing summary
    pub fn summary_prompt(topic: &str, transcript: &str) -> String {
        format!(
            r#"Discussion topic: {topic}

Full discussion:
{transcript}

Please provide:

1. **Overview**: What was discussed, in two or three sentences

2. **Key Takeaways**: The most important points that emerged (bullet list)

3. **Action Items**: Concrete follow-ups, with an owner where one is obvious (bullet list)

Format your response with clear markdown headers."#
        )
    }
}

/// Extract agenda points from generated text
///
/// One point per line; leading list markers (`1.`, `1)`, `-`, `*`) are
/// stripped, and blank or single-character lines are discarded.
pub fn parse_agenda(text: &str) -> Vec<String> {
    text.lines()
        .map(strip_list_marker)
        .map(str::trim)
        .filter(|line| line.chars().count() > 1)
        .map(str::to_string)
        .collect()
}

fn strip_list_marker(line: &str) -> &str {
    let line = line.trim();
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 {
        // Only treat leading digits as a marker when followed by `.` or `)`
        if let Some(rest) = line[digits..].strip_prefix(['.', ')']) {
            return rest;
        }
        return line;
    }
    line.trim_start_matches(['-', '*'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_lines() {
        let agenda = parse_agenda("Pricing\nTimeline\nRisks");
        assert_eq!(agenda, vec!["Pricing", "Timeline", "Risks"]);
    }

    #[test]
    fn test_parse_strips_markers() {
        let agenda = parse_agenda("1. Pricing\n2) Timeline\n- Risks\n* Hiring");
        assert_eq!(agenda, vec!["Pricing", "Timeline", "Risks", "Hiring"]);
    }

    #[test]
    fn test_parse_drops_blank_and_single_char_lines() {
        let agenda = parse_agenda("Pricing\n\n \nX\nTimeline");
        assert_eq!(agenda, vec!["Pricing", "Timeline"]);
    }

    #[test]
    fn test_parse_keeps_leading_number_without_marker() {
        let agenda = parse_agenda("2026 hiring plan");
        assert_eq!(agenda, vec!["2026 hiring plan"]);
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(parse_agenda("").is_empty());
        assert!(parse_agenda("\n\n").is_empty());
    }

    #[test]
    fn test_turn_prompt_includes_interjection() {
        let with = DiscussionPrompts::turn_prompt("T", "A", "history\n", Some("what about cost?"));
        assert!(with.contains("what about cost?"));
        let without = DiscussionPrompts::turn_prompt("T", "A", "history\n", None);
        assert!(!without.contains("interjected"));
    }
}
