//! Rule-based suggestion simulator.
//!
//! DESIGN
//! ======
//! A pure function of `(field_type, input, max)`: no randomness, no I/O. The
//! caller adds the artificial latency. Each field type picks one fixed list of
//! four candidates from simple checks on the lowercased, trimmed input; then
//! style nits computed on the raw input are appended and the result is cut to
//! `max`.

use std::sync::LazyLock;

use regex::Regex;

use super::field::FieldType;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s").expect("static regex"));
static DIGIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]").expect("static regex"));
static STRAY_PUNCTUATION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[!?]").expect("static regex"));
static CAPS_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[A-Z]{5,}").expect("static regex"));

/// Inputs up to this many characters get no style nits.
const STYLE_CHECK_MIN_CHARS: usize = 10;
const LONG_WORD_CHARS: usize = 15;

/// Produce simulated suggestions for `input` in a `field_type` field.
#[must_use]
pub fn simulate(field_type: &FieldType, input: &str, max_suggestions: usize) -> Vec<String> {
    let clean = input.trim().to_lowercase();

    let mut suggestions: Vec<String> = match field_type {
        FieldType::TrademarkName => trademark_name(input, &clean),
        FieldType::OwnerInfo => owner_info(&clean),
        FieldType::BusinessDescription => business_description(&clean),
        FieldType::GoodsServices => owned(&[
            "Use standard terminology found in the USPTO ID Manual for your industry",
            "Group similar items within the same class, but be specific about each item",
            "Balance between breadth (for protection) and specificity (for approval)",
        ])
        .into_iter()
        .chain([format!("For \"{input}\", consider adding related accessories or complementary services")])
        .collect(),
        FieldType::UsageEvidence => owned(&[
            "Provide dated examples showing the exact mark as used in commerce",
            "Ensure specimens clearly show the mark in relation to the goods/services claimed",
            "Include multiple types of evidence (packaging, website, advertisements)",
            "Make sure digital specimens show the URL and date clearly visible",
        ]),
        FieldType::PatentTitle => owned(&[
            "Use technical terminology specific to your field while remaining concise",
            "Focus on the primary novel feature rather than all aspects of the invention",
            "Avoid person names, trademarks, and marketing terms in the title",
            "Consider broader category terms to maximize scope of protection",
        ]),
        FieldType::PatentDescription => patent_description(&clean),
        FieldType::PatentClaims => patent_claims(&clean),
        FieldType::Other(_) => owned(&[
            "Be clear and specific in your description",
            "Provide comprehensive details rather than general statements",
            "Use standard terminology in your field",
            "Focus on distinctive aspects that set your application apart",
        ]),
    };

    suggestions.extend(style_nits(input));
    suggestions.truncate(max_suggestions);
    suggestions
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn trademark_name(input: &str, clean: &str) -> Vec<String> {
    if clean.chars().count() < 5 {
        owned(&[
            "Consider a more distinctive name that isn't merely descriptive of your products/services",
            "Check USPTO's TESS database to ensure your proposed mark doesn't conflict with existing registrations",
            "If using common words, add unique elements to make your mark more distinctive and protectable",
            "Consider how your mark will appear visually in various marketing contexts",
        ])
    } else if WHITESPACE.is_match(clean) {
        let first_word = clean.split(' ').next().unwrap_or(clean);
        vec![
            "Your multi-word mark may qualify for stronger protection than single descriptive words".to_string(),
            format!("Consider registering \"{first_word}\" separately for broader protection"),
            "Verify that no part of your mark translates to something problematic in major foreign markets"
                .to_string(),
            "Check for unintended meanings or connotations in slang or other languages".to_string(),
        ]
    } else if DIGIT.is_match(clean) {
        owned(&[
            "Marks containing numbers can be distinctive, but ensure it's not merely a model number",
            "Consider how your mark will be pronounced when it contains both letters and numbers",
            "Verify the numbers don't have negative cultural associations in target markets",
            "Register both the numeric (123) and spelled-out (one-two-three) versions if relevant",
        ])
    } else {
        vec![
            format!("\"{input}\" appears to be a single word mark - ensure it's not merely descriptive of your goods/services"),
            "Consider whether a logo or design element would strengthen your brand identity".to_string(),
            "Search social media platforms to ensure the name isn't already in use in your industry".to_string(),
            "Verify domain name availability for your potential trademark".to_string(),
        ]
    }
}

fn owner_info(clean: &str) -> Vec<String> {
    if ["llc", "inc", "corporation"].iter().any(|kw| clean.contains(kw)) {
        owned(&[
            "Ensure your entity name exactly matches your state business registration",
            "Include your state of incorporation or organization",
            "Verify that the signing party has legal authority to represent the entity",
            "Consider whether any DBAs or alternative names should be included in the application",
        ])
    } else {
        owned(&[
            "For individual ownership, use your full legal name as it appears on official documents",
            "If filing as an individual, consider whether a business entity might offer better protection",
            "Ensure your address information is current and matches other legal documents",
            "Consider privacy implications - registered trademark information becomes public record",
        ])
    }
}

fn business_description(clean: &str) -> Vec<String> {
    if ["software", "app", "digital"].iter().any(|kw| clean.contains(kw)) {
        owned(&[
            "Specify the primary functions and purpose of your software or application",
            "Identify target industries and specific user problems your technology solves",
            "Mention deployment methods (cloud, on-premise, mobile) to help with classification",
            "Distinguish between software products vs. software services if applicable",
        ])
    } else if ["consult", "service", "advise"].iter().any(|kw| clean.contains(kw)) {
        owned(&[
            "Detail specific services offered rather than general 'consulting services'",
            "Identify the specific industries or markets you serve",
            "Mention delivery methods (in-person, virtual, subscription-based)",
            "Describe qualification or certification requirements for your services",
        ])
    } else {
        owned(&[
            "Be more specific about your exact products or services to ensure proper classification",
            "Include your primary industry sector and target customers",
            "Mention your geographic scope of operations (local, national, international)",
            "Describe what distinguishes your offerings from competitors",
        ])
    }
}

fn patent_description(clean: &str) -> Vec<String> {
    if clean.chars().count() < 100 {
        owned(&[
            "Expand your description to include all components and their relationships",
            "Add specific examples of how the invention operates in practice",
            "Include multiple embodiments or variations to broaden protection",
            "Describe the problem your invention solves before detailing the solution",
        ])
    } else {
        owned(&[
            "Ensure you've described the 'best mode' of implementing your invention",
            "Include sufficient detail for a person skilled in the art to reproduce it",
            "Define any specialized terms or non-standard components",
            "Connect your description clearly to the claims you plan to make",
        ])
    }
}

fn patent_claims(clean: &str) -> Vec<String> {
    if clean.contains("comprising") {
        owned(&[
            "Your use of 'comprising' keeps the claim open-ended, which is good for broad protection",
            "Consider adding dependent claims that narrow specific elements",
            "Ensure each element in the claim is supported by your description",
            "Check for potential prior art that might conflict with this particular claim",
        ])
    } else if clean.contains("consisting of") {
        owned(&[
            "'Consisting of' limits your claim to only the listed elements - consider if 'comprising' would be better",
            "Add dependent claims that specify optional features",
            "Consider alternative claiming strategies for different aspects of your invention",
            "This closed-ended claim may be more defensible but offers narrower protection",
        ])
    } else {
        owned(&[
            "Structure your claim with a preamble, transitional phrase, and body",
            "Use 'comprising' (open-ended) or 'consisting of' (closed) as appropriate",
            "Ensure independent claims capture the broadest reasonable scope",
            "Add multiple dependent claims to protect specific implementations",
        ])
    }
}

/// Writing-style remarks on the raw input, in fixed order.
fn style_nits(input: &str) -> Vec<String> {
    let mut nits = Vec::new();
    if input.chars().count() <= STYLE_CHECK_MIN_CHARS {
        return nits;
    }
    if STRAY_PUNCTUATION.is_match(input) {
        nits.push("Remove unnecessary punctuation like exclamation points from formal application fields".to_string());
    }
    if CAPS_RUN.is_match(input) {
        nits.push("Avoid using all capital letters in your submission unless referring to an acronym".to_string());
    }
    if input.split(' ').any(|word| word.chars().count() > LONG_WORD_CHARS) {
        nits.push("Consider breaking down very long technical terms for clarity".to_string());
    }
    nits
}

#[cfg(test)]
#[path = "simulate_test.rs"]
mod tests;
