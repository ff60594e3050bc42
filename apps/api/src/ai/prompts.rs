// Shared prompt fragments.
// Each feature that needs LLM calls keeps its own prompts.rs alongside it.
// This file only holds the cross-cutting pieces.

/// Appended to every prompt sent in JSON mode.
pub const JSON_ONLY_INSTRUCTION: &str = "\
Réponds UNIQUEMENT avec un objet JSON valide. \
Aucun texte en dehors de l'objet JSON. \
Pas de bloc de code Markdown. \
Pas d'explication ni d'excuse.";

/// Where the model finds the CV. Gemini sees it inlined above the prompt,
/// OpenAI as a separate system message; the wording fits both.
pub const CV_LOCATION_NOTE: &str =
    "CV : fourni dans le bloc \"CV (cacheable)\" / message système précédent.";

/// Hard rule shared by every drafting prompt that leans on the CV.
pub const NO_INVENTED_FIGURES: &str = "\
CRITIQUE : N'INVENTE AUCUN CHIFFRE. N'utilise que les faits vérifiables du CV. \
Si le CV ne mentionne pas un pourcentage, un nombre de clients, une durée ou un gain, \
ne l'écris pas. Décris ce qui a été fait, jamais un impact quantifié imaginaire.";
