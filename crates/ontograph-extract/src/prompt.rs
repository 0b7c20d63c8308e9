//! Prompt templates for relation extraction

/// Request sent to the model for one part of a document.
pub fn extraction_prompt(text: &str) -> String {
    format!("Give me the relations of this text. Only relation, do not talk to me. \n```md\n{text}\n```")
}
