/// Instruction sent ahead of the extracted contract text.
pub const ANALYSIS_PROMPT: &str = "Analyze this contract. For each potentially unfair clause:
        1. [EXACT QUOTE] - Copy the full clause text
        2. [RISK] - Explain the legal/business risk (1-2 sentences)
        3. [FIX] - Suggest specific alternative wording";

/// Appends the document text directly to the instruction template.
pub fn build_prompt(text: &str) -> String {
    let mut prompt = String::with_capacity(ANALYSIS_PROMPT.len() + text.len());
    prompt.push_str(ANALYSIS_PROMPT);
    prompt.push_str(text);
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_is_template_followed_by_text() {
        let prompt = build_prompt("The tenant shall pay all fees.");
        assert!(prompt.starts_with("Analyze this contract."));
        assert!(prompt.ends_with("[FIX] - Suggest specific alternative wordingThe tenant shall pay all fees."));
    }

    #[test]
    fn empty_text_yields_bare_template() {
        assert_eq!(build_prompt(""), ANALYSIS_PROMPT);
    }
}
