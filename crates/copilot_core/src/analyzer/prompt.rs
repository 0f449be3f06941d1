use crate::parser::{ResponseContract, ACTION_ITEMS_HEADING, SUMMARY_HEADING};

/// Wraps user notes in the instructions for the selected reply contract.
pub fn build_prompt(contract: ResponseContract, user_text: &str) -> String {
    match contract {
        ResponseContract::Json => format!(
            "Analyze the text below. Return a single, valid JSON object with two keys:\n\
             1. \"summary\": A concise summary of the key points.\n\
             2. \"action_items\": A list of strings, where each string is a clear task or to-do item.\n\
             \n\
             Do not include any text or formatting outside of the JSON object.\n\
             \n\
             Text to Analyze:\n\
             ---\n\
             {user_text}\n\
             ---\n"
        ),
        ResponseContract::Heading => format!(
            "Analyze the text below and answer in exactly this format:\n\
             \n\
             {SUMMARY_HEADING}\n\
             A concise summary of the key points.\n\
             \n\
             {ACTION_ITEMS_HEADING}\n\
             - One clear task or to-do item per line, each starting with a hyphen.\n\
             \n\
             Text to Analyze:\n\
             ---\n\
             {user_text}\n\
             ---\n"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::build_prompt;
    use crate::parser::ResponseContract;

    #[test]
    fn json_prompt_names_both_keys_and_embeds_text() {
        let prompt = build_prompt(ResponseContract::Json, "We ship Friday.");
        assert!(prompt.contains("\"summary\""));
        assert!(prompt.contains("\"action_items\""));
        assert!(prompt.contains("---\nWe ship Friday.\n---"));
    }

    #[test]
    fn heading_prompt_lists_both_headings() {
        let prompt = build_prompt(ResponseContract::Heading, "notes");
        assert!(prompt.contains("## Summary\n"));
        assert!(prompt.contains("## Action Items\n"));
        assert!(prompt.contains("---\nnotes\n---"));
    }
}
