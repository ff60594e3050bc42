// All LLM prompt templates for the job actions.
// Reuses cross-cutting fragments from ai::prompts.
//
// Output language is French: the letters and emails go to French recruiters.

use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Fills `{name}` placeholders in one pass. Substituted values are never rescanned,
/// so user text containing `{...}` is kept as written. Unknown names stay literal.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    let placeholder =
        PLACEHOLDER.get_or_init(|| Regex::new(r"\{(\w+)\}").expect("static placeholder pattern"));

    placeholder
        .replace_all(template, |caps: &Captures| {
            values
                .iter()
                .find(|(key, _)| *key == &caps[1])
                .map(|(_, value)| value.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Job posting analysis. Replace: {json_only}, {description}
pub const JOB_ANALYSIS_PROMPT_TEMPLATE: &str = r#"Analyse l'offre d'emploi suivante. Ne te contente pas de résumer : cherche l'entre-les-lignes.

{json_only}

Schéma EXACT de l'objet JSON attendu :
{
  "company_name": "...",
  "role": "...",
  "location": "...",
  "missions": ["...", "..."],
  "insights": "🚩 **Vigilance** : [risque ou contrainte cachée]\n\n💎 **Pépite** : [avantage unique ou techno intéressante]\n\n⚡ **Le Vrai Job** : [priorité réelle n°1 en 10 mots]",
  "tech_stack": ["..."],
  "daily_tasks_forecast": "• [Verbe d'action] tâche concrète (≈30% du temps)\n• [Verbe d'action] tâche concrète (≈50% du temps)\n• [Verbe d'action] tâche concrète (≈20% du temps)",
  "recruitment_process": "• Étape 1\n• Étape 2\n• Étape 3",
  "profile_requirements": ["**Must** ...", "**Must** ...", "**Nice** ..."],
  "company_summary": "Une phrase sur l'entreprise et son activité"
}

RÈGLES :
- insights : exactement trois points (Vigilance, Pépite, Le Vrai Job), séparés par DEUX retours à la ligne (\n\n) pour le rendu Markdown. 15 mots maximum par point. Sois critique : si l'offre est floue, dis-le. Aucun ton promotionnel.
- daily_tasks_forecast : 3 puces maximum, phrases très courtes commençant par un verbe d'action, chacune avec une estimation en %. Ne recopie PAS les missions officielles : c'est une prévision du quotidien réel.
- recruitment_process : 3 à 5 étapes, une puce courte par étape.
- profile_requirements : 3 à 6 éléments, chacun préfixé par **Must** ou **Nice** selon la priorité.
- company_summary : une seule phrase neutre sur le produit ou le secteur de l'entreprise. Ne mentionne ni le poste ni la localisation.

OFFRE :
{description}"#;

/// CV-vs-offer gap analysis. Replace: {cv_note}, {job_description}, {bio_block}, {bio_clause}
pub const GAP_ANALYSIS_PROMPT_TEMPLATE: &str = r#"Agis comme un recruteur technique. Compare le CV du candidat avec l'offre.
Sois direct et synthétique.

Offre :
{job_description}

{cv_note}
{bio_block}
Tâche : analyse le profil par rapport à l'offre{bio_clause}.

FORMATAGE (STRICT) :
- Markdown standard.
- Une ligne vide entre CHAQUE point de liste (*), pour éviter les blocs compacts.
- Une ligne vide avant chaque titre (###).
- Aucune phrase d'introduction ni de conclusion.

FORMAT ATTENDU, sections dans cet ordre exact :

### 🎯 Score de pertinence : [0-100]%

### ✅ Points Forts
* **[Compétence]** : [preuve courte tirée du CV]

* **[Expérience]** : [preuve courte tirée du CV]

### ⚠️ Gaps
* **[Manquant]** : [raison factuelle]

* **[Différence]** : [raison factuelle]

Règles : 3 à 4 points maximum par section. Pas de remplissage."#;

/// Cover letter in restricted HTML.
/// Replace: {full_name}, {email}, {phone}, {address}, {city}, {today}, {cv_note},
///          {job_description}, {availability_start}, {availability_duration},
///          {bio_line}, {candidate_note}, {school}, {no_invented_figures}
pub const COVER_LETTER_PROMPT_TEMPLATE: &str = r#"Rédige une lettre de motivation en français. Ton direct et factuel. Chaque phrase contient une information concrète du CV.

FORMAT HTML :
Utilise uniquement <p>, <strong>, <br>, <ul>, <li>. Aucun style inline.
Chaque paragraphe distinct est dans sa propre balise <p>...</p>. Ne colle jamais deux paragraphes.

En-tête :
{full_name}<br>{email}<br>{phone}<br>{address}
<br><br>
À l'attention de [nom de l'entreprise extrait de l'offre, sinon "l'entreprise"]
<br><br>
<strong>Objet : Candidature pour le poste de [titre exact du poste dans l'offre]</strong>
<br><br>
{city}, le {today}
<br><br>
------------------------------

CONTEXTE :
- {cv_note} N'utilise QUE les faits vérifiables.
- Offre : {job_description}
- Disponibilité : {availability_start}, {availability_duration}
{bio_line}- Note du candidat (à appliquer strictement, même si cela change la formulation) : {candidate_note}

STRUCTURE, dans cet ordre :

1. Intro (un <p>) : "Monsieur, Madame, étudiant à {school}, je candidate pour le poste de [titre du poste] en stage. Je suis disponible dès {availability_start} pour une durée de {availability_duration}."

2. Accroche (un <p>) : <strong>Pourquoi mon profil apporte une valeur immédiate à [Entreprise] :</strong>

3. Corps : 2 à 3 sections thématiques, chacune dans son propre <p>. Titre court en gras, puis 2 à 3 phrases FACTUELLES. Choisis les dimensions clés de l'offre (culture ou domaine, technique, produit ou business).
Chaque phrase contient :
- un projet ou une expérience précise du CV, avec durée ou contexte s'ils y figurent ;
- une technologie, un outil ou une méthode précise ;
- un résultat concret UNIQUEMENT s'il est écrit dans le CV.

{no_invented_figures}

Exemple avec métrique présente dans le CV : "Chez Everflow (4 ans), j'ai automatisé l'import Excel→ERP avec Zapier, réduisant le traitement de 3h à 20min."
Exemple sans métrique inventée : "Chez Everflow (4 ans), j'ai conçu l'API mobile en React Native pour la gestion produit."

TEMPS ET TOURNURES :
- Passé composé pour les compétences acquises : "j'ai acquis", "j'ai développé".
- Pas de participe présent isolé : "pour améliorer" plutôt que "améliorant", "afin de" plutôt que "permettant".

INTERDIT (ne jamais écrire) :
❌ "compréhension approfondie", "dynamiques agiles", "valeur ajoutée"
❌ "Ma capacité à...", "Je suis capable de..."
❌ "compétences variées", "solides compétences"
❌ "candidat idéal", "parfaitement adapté", "directement applicable"
❌ "environnement en évolution", "sous pression"
❌ "j'ai eu l'opportunité de", "j'ai pu"
❌ toute référence au recruteur ("comme le vôtre", "que vous proposez")
❌ toute phrase sans fait vérifiable du CV
❌ tout chiffre ou métrique (%, clients, durées, hausses) absent du CV

ATTENDU :
✓ noms de projets, d'entreprises, de produits
✓ technologies et outils précis
✓ durées (ans, mois)
✓ chiffres et résultats mesurables présents dans le CV

4. Conclusion (un <p>) : une phrase directe, par exemple "Je serais ravi d'échanger avec vous sur cette opportunité."

5. Signature : <p>Cordialement,<br>{full_name}</p>

IMPÉRATIF : si la note du candidat contient des informations pertinentes, intègre-les explicitement dans le corps. Reste concis : mieux vaut 2 paragraphes denses que 3 dilués.

PRIORITÉ DES DEMANDES DU CANDIDAT :
- Applique exactement les demandes de la note (ton, points à appuyer ou à retirer).
- Si une demande contredit les règles ci-dessus, la demande du candidat l'emporte."#;

/// Short application email in plain text.
/// Replace: {job_description}, {full_name}, {city}, {bio_line}, {candidate_note}, {no_invented_figures}
pub const EMAIL_PROMPT_TEMPLATE: &str = r#"Rédige un email de candidature court et direct pour accompagner un CV et une lettre de motivation.

Contexte :
- Offre : {job_description}
- Candidat : {full_name}, {city}
{bio_line}- Note du candidat : {candidate_note}
- CV : fourni en contexte (cacheable).

Structure :

OBJET : court et précis (ex. "Candidature stage [Poste] - {full_name}")

CORPS (50 à 80 mots maximum, 2 à 3 phrases) :
- Salutation (Bonjour / Madame, Monsieur)
- 1 phrase : je candidate pour [poste], suivie d'un teaser court : une expérience ou compétence clé du CV pertinente pour l'offre.
- 1 phrase : mon CV et ma lettre de motivation sont en pièces jointes.
- Formule de politesse courte (Cordialement, Bien cordialement)

Ton : direct et factuel. PAS de "Je suis..." ni de "Je me présente". Le teaser est concret (ex. "Mon expérience de 4 ans chez X en tant que Y" ou "J'ai développé Z avec [stack]").
{no_invented_figures}

Format : texte brut, pas de HTML."#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_does_not_rescan_substituted_values() {
        let filled = fill_template(
            "A={a} B={b}",
            &[("a", "{b}"), ("b", "text with {a}")],
        );
        assert_eq!(filled, "A={b} B=text with {a}");
    }

    #[test]
    fn test_unknown_placeholders_and_json_braces_stay_literal() {
        let filled = fill_template("{\n  \"role\": \"{x}\"\n} {missing}", &[("x", "dev")]);
        assert_eq!(filled, "{\n  \"role\": \"dev\"\n} {missing}");
    }

    #[test]
    fn test_every_template_placeholder_is_known() {
        let cases: [(&str, &[&str]); 4] = [
            (JOB_ANALYSIS_PROMPT_TEMPLATE, &["json_only", "description"]),
            (
                GAP_ANALYSIS_PROMPT_TEMPLATE,
                &["cv_note", "job_description", "bio_block", "bio_clause"],
            ),
            (
                COVER_LETTER_PROMPT_TEMPLATE,
                &[
                    "full_name",
                    "email",
                    "phone",
                    "address",
                    "city",
                    "today",
                    "cv_note",
                    "job_description",
                    "availability_start",
                    "availability_duration",
                    "bio_line",
                    "candidate_note",
                    "school",
                    "no_invented_figures",
                ],
            ),
            (
                EMAIL_PROMPT_TEMPLATE,
                &[
                    "job_description",
                    "full_name",
                    "city",
                    "bio_line",
                    "candidate_note",
                    "no_invented_figures",
                ],
            ),
        ];
        for (template, keys) in cases {
            let values: Vec<(&str, &str)> = keys.iter().map(|k| (*k, "")).collect();
            let filled = fill_template(template, &values);
            let leftover = Regex::new(r"\{\w+\}").unwrap();
            assert!(!leftover.is_match(&filled), "unfilled placeholder in: {filled}");
        }
    }
}
