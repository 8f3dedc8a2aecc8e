//! LLM prompts for the extraction step.

use crate::types::SearchHit;

/// Placeholder the prompt template substitutes the entity into.
pub const COMPANY_PLACEHOLDER: &str = "{company}";

/// Fixed system instruction sent with every extraction call.
pub const SYSTEM_PROMPT: &str = "You are a precise data extraction assistant.";

const FORMAT_RULES: &str = r#"
Please extract the requested information in the following JSON format:
{
    "extracted_info": "The specific information requested",
    "confidence": "HIGH/MEDIUM/LOW based on the quality and reliability of the sources",
    "source": "URL of the most reliable source used"
}

Rules for extraction:
1. If multiple sources provide the information, use the most reliable one.
2. Set confidence as:
   - HIGH: Information from official company website or verified sources
   - MEDIUM: Information from reliable third-party sources
   - LOW: Information from unclear sources or when information is partial
3. If no reliable information is found, respond with:
   {
       "extracted_info": "Information not found",
       "confidence": "LOW",
       "source": "None"
   }
"#;

/// Substitute the entity into the template's company placeholder.
///
/// Lenient by design: a template without the placeholder passes through
/// unchanged, since at this point the instruction is only prompt text.
pub fn render_instruction(template: &str, entity: &str) -> String {
    template.replace(COMPANY_PLACEHOLDER, entity)
}

/// Build the grounding prompt for one entity.
///
/// Embeds the entity, the rendered instruction, and every hit's displayed
/// source, title, and snippet in the hits' given order - lossless, no
/// truncation, no deduplication.
pub fn build_extraction_prompt(entity: &str, hits: &[SearchHit], template: &str) -> String {
    let instruction = render_instruction(template, entity);
    let mut prompt = format!(
        "Please analyze the following search results about {entity} and extract the \
         information according to this prompt: \"{instruction}\".\n\nSearch Results:\n"
    );
    for hit in hits {
        prompt.push_str(&format!("\nSource: {}\n", or_na(&hit.displayed_link)));
        prompt.push_str(&format!("Title: {}\n", or_na(&hit.title)));
        prompt.push_str(&format!("Content: {}\n", or_na(&hit.snippet)));
    }
    prompt.push_str(FORMAT_RULES);
    prompt
}

fn or_na(value: &str) -> &str {
    if value.is_empty() {
        "N/A"
    } else {
        value
    }
}
