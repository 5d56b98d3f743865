/*!
 * Prompt construction for UI-string translation.
 *
 * The user prompt is a single JSON document carrying the rules, a few
 * worked examples for the target language, and the batch of items. The
 * model is asked to reply with a bare JSON array of id/translation pairs.
 */

use serde::Serialize;

use crate::app_config::TargetLanguage;
use crate::work_items::WorkItem;

/// System message sent with every translation request.
pub const SYSTEM_PROMPT: &str =
    "You translate UI strings. Return only valid JSON without markdown formatting.";

/// One worked example shown to the model
#[derive(Debug, Clone, Serialize)]
pub struct ExampleItem {
    /// Example id (string, like real item ids on the wire)
    pub id: &'static str,
    /// Source text
    pub text: &'static str,
    /// Source language code
    pub lang: &'static str,
    /// Expected translation
    pub translation: &'static str,
}

/// One batch item on the wire. Ids are serialized as strings.
#[derive(Debug, Clone, Serialize)]
pub struct PromptItem {
    /// Work-item id, stringified
    pub id: String,
    /// Text to translate
    pub text: String,
    /// Source language hint
    pub lang: String,
}

/// The full user-prompt payload
#[derive(Debug, Serialize)]
struct PromptPayload {
    instructions: String,
    examples: Vec<ExampleItem>,
    items: Vec<PromptItem>,
    target_lang: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<String>,
}

/// Worked examples for a target language.
///
/// Each set covers an English item, an English item with a compound term,
/// and a German item, so the model sees both source languages in play.
fn examples_for(target: TargetLanguage) -> Vec<ExampleItem> {
    match target {
        TargetLanguage::Nb => vec![
            ExampleItem {
                id: "1",
                text: "Accept All",
                lang: "en",
                translation: "Godta alle",
            },
            ExampleItem {
                id: "2",
                text: "Cookie Settings",
                lang: "en",
                translation: "Innstillinger for informasjonskapsler",
            },
            ExampleItem {
                id: "3",
                text: "Kundenstimmen - Archiv",
                lang: "de",
                translation: "Arkiv for kundeanmeldelser",
            },
        ],
        TargetLanguage::Sv => vec![
            ExampleItem {
                id: "1",
                text: "Accept All",
                lang: "en",
                translation: "Acceptera alla",
            },
            ExampleItem {
                id: "2",
                text: "Cookie Settings",
                lang: "en",
                translation: "Cookie-inställningar",
            },
            ExampleItem {
                id: "3",
                text: "Kundenstimmen - Archiv",
                lang: "de",
                translation: "Arkiv för kundomdömen",
            },
        ],
        TargetLanguage::Da => vec![
            ExampleItem {
                id: "1",
                text: "Accept All",
                lang: "en",
                translation: "Accepter alle",
            },
            ExampleItem {
                id: "2",
                text: "Cookie Settings",
                lang: "en",
                translation: "Cookie-indstillinger",
            },
            ExampleItem {
                id: "3",
                text: "Kundenstimmen - Archiv",
                lang: "de",
                translation: "Arkiv for kundeanmeldelser",
            },
        ],
    }
}

/// Builder for constructing translation prompts.
#[derive(Debug, Clone)]
pub struct TranslationPromptBuilder {
    target: TargetLanguage,
    domain_context: Option<String>,
    items: Vec<PromptItem>,
}

impl TranslationPromptBuilder {
    /// Create a new prompt builder for the given target language.
    pub fn new(target: TargetLanguage) -> Self {
        Self {
            target,
            domain_context: None,
            items: Vec::new(),
        }
    }

    /// Attach optional domain context (product names, tone guidance).
    pub fn domain_context(mut self, context: Option<&str>) -> Self {
        self.domain_context = context.map(str::to_string);
        self
    }

    /// Set the batch of items to translate.
    pub fn items(mut self, items: &[WorkItem]) -> Self {
        self.items = items
            .iter()
            .map(|item| PromptItem {
                id: item.id.to_string(),
                text: item.text.clone(),
                lang: item.lang.code().to_string(),
            })
            .collect();
        self
    }

    /// The numbered rules block for the target language.
    fn build_instructions(&self) -> String {
        let name = self.target.display_name();
        let code = self.target.code();
        format!(
            "You are translating UI strings to {name} ({code}). The source language for each \
             item may be English or German; use the provided `lang` field for each item and \
             translate from that language into the target language.\n\
             Rules (strictly enforce):\n\
             1) Translate to **{name}** only.\n\
             2) **Preserve placeholders** exactly: printf-style (%s, %d, %% …), Python/ICU \
             ({{name}}, {{0}}), HTML tags, URLs.\n\
             3) **Do not change capitalization or punctuation** unless required by the target \
             language grammar for the same casing style (e.g., title case stays title case).\n\
             4) Keep technical terms consistent and natural for standard {name}.\n\
             5) Return **valid JSON** ONLY: a list of objects with keys `id` and `translation`.\n\
             6) Do not add extra keys. Do not wrap in markdown.\n"
        )
    }

    /// Build the user prompt as a JSON document.
    pub fn build_user_prompt(&self) -> String {
        let payload = PromptPayload {
            instructions: self.build_instructions(),
            examples: examples_for(self.target),
            items: self.items.clone(),
            target_lang: self.target.code().to_string(),
            context: self.domain_context.clone(),
        };

        serde_json::to_string(&payload).unwrap_or_else(|_| "{}".to_string())
    }
}
