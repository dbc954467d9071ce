//! Deterministic prompt assembly from a user prompt and selected sections.

use folio_tei::Sections;

/// Format the user prompt and the selected document sections into the input
/// sent to the generative model. Sections appear in their map order, each
/// delimited so the model can tell them apart; repeated calls on the same
/// input are byte-identical.
pub fn build_prompt(user_prompt: &str, sections: &Sections) -> String {
    let mut input = format!("User Prompt: {user_prompt}\n\n");
    input.push_str("Selected Document Sections:\n---\n");
    for (section, text) in sections {
        input.push_str(&format!("Section: {section}\n{text}\n---\n"));
    }
    input
}
