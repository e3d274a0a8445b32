//! Cover letter composer: arranges extracted fields into a fixed skeleton.
//!
//! Pure formatting. Empty fields render as empty strings in place; nothing is
//! validated or synthesized here beyond the closing paragraph's fixed wording.

use crate::cover_letter::extraction::ExtractedFields;

pub const GREETING: &str = "Dear Hiring Manager,";
pub const SIGN_OFF: &str = "Sincerely,";

pub fn compose_cover_letter(fields: &ExtractedFields) -> String {
    let interest = format!(
        "I am writing to express my strong interest in the {} position at {}. \
         As an experienced professional with a background in {}, I am excited about \
         the opportunity to contribute to your team and help further your mission of {}.",
        fields.job_title,
        fields.company_name,
        fields.key_skills.join(", "),
        fields.company_mission,
    );

    [
        GREETING.to_string(),
        interest,
        fields.personalized_paragraph.clone(),
        fields.skills_experience_paragraph.clone(),
        closing_paragraph(&fields.company_name),
        format!("{SIGN_OFF}\n{}", fields.name),
    ]
    .join("\n\n")
}

pub fn closing_paragraph(company_name: &str) -> String {
    format!(
        "I am excited about the possibility of joining {company_name} and would welcome \
         the opportunity to discuss how my skills and experiences align with your needs. \
         Thank you for your consideration, and I look forward to speaking with you soon."
    )
}
