/// Keyword sets scored against the user's answers when the generation
/// service is unavailable or its reply is unusable.
const LEFT_TERMS: [&str; 6] = [
    "social",
    "égalité",
    "solidarité",
    "public",
    "redistribution",
    "travailleur",
];
const RIGHT_TERMS: [&str; 6] = [
    "sécurité",
    "économie",
    "entreprise",
    "tradition",
    "ordre",
    "mérite",
];
const CENTRE_TERMS: [&str; 5] = ["équilibre", "modéré", "pragmatique", "réforme", "dialogue"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Leaning {
    Left,
    Right,
    Centre,
}

impl Leaning {
    /// Picks the strictly-highest scoring side. Any tie, including the
    /// all-zero case, falls back to centre; that tie-break is the rule,
    /// not an accident of check ordering.
    pub fn from_scores(left: usize, right: usize, centre: usize) -> Self {
        if left > right && left > centre {
            Leaning::Left
        } else if right > left && right > centre {
            Leaning::Right
        } else {
            Leaning::Centre
        }
    }
}

fn count_terms(text: &str, terms: &[&str]) -> usize {
    terms.iter().filter(|term| text.contains(*term)).count()
}

pub fn score_leaning(lines: &[String]) -> Leaning {
    let text = lines.join(" ").to_lowercase();

    let left = count_terms(&text, &LEFT_TERMS);
    let right = count_terms(&text, &RIGHT_TERMS);
    let centre = count_terms(&text, &CENTRE_TERMS);

    log::debug!(
        "Fallback keyword scores: left={} right={} centre={}",
        left,
        right,
        centre
    );

    Leaning::from_scores(left, right, centre)
}

/// Tier 5a: builds a complete four-section analysis from one of three fixed
/// party templates, chosen by keyword scoring over the valid answer lines.
pub fn heuristic_analysis(lines: &[String]) -> String {
    log::info!(
        "Generating heuristic fallback analysis from {} responses",
        lines.len()
    );

    let (party, orientation, values, position) = match score_leaning(lines) {
        Leaning::Left => (
            "Parti Socialiste (PS)",
            "Centre-gauche - Sociale-démocrate",
            "Justice sociale, Égalité, Solidarité, Services publics",
            "gauche du centre",
        ),
        Leaning::Right => (
            "Les Républicains (LR)",
            "Centre-droit - Libéral-conservateur",
            "Sécurité, Économie de marché, Tradition, Mérite",
            "droite du centre",
        ),
        Leaning::Centre => (
            "Renaissance (LREM)",
            "Centre - Libéral-progressiste",
            "Réforme, Équilibre, Innovation, Europe",
            "centre",
        ),
    };

    format!(
        r#"1. Parti politique le plus proche:
{party} - Basé sur l'analyse de vos réponses politiques

2. Orientation politique:
{orientation}

3. Valeurs principales:
{values}

4. Graphique ASCII:
```
    LIBERTAIRE
        |
GAUCHE--+--DROITE
        |
   AUTORITAIRE
     (X = position {position})
```

Note: Analyse générée à partir de {count} réponses."#,
        party = party,
        orientation = orientation,
        values = values,
        position = position,
        count = lines.len(),
    )
}

/// Tier 5b: the last-resort analysis when no usable answer data exists.
pub fn generic_analysis(reason: &str) -> String {
    log::warn!("Generating generic fallback analysis: {}", reason);

    format!(
        r#"1. Parti politique le plus proche:
Analyse en cours - Données insuffisantes actuellement

2. Orientation politique:
Non déterminé - Veuillez répondre à plus de questions

3. Valeurs principales:
En cours d'analyse

4. Graphique ASCII:
```
    LIBERTAIRE
        |
GAUCHE--+--DROITE
        |
   AUTORITAIRE
   (Position à déterminer)
```

Raison: {reason}
Conseil: Répondez à plus de questions du quiz pour une analyse précise."#,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::section_schema::{assess, StructureVerdict};

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn left_keywords_select_social_democratic_template() {
        let analysis = heuristic_analysis(&lines(&[
            "Impôts : plus de redistribution et de solidarité",
            "Services : défendre le secteur public",
        ]));

        assert!(analysis.contains("Parti Socialiste (PS)"));
        assert!(analysis.contains("gauche du centre"));
    }

    #[test]
    fn right_keywords_select_liberal_conservative_template() {
        let analysis = heuristic_analysis(&lines(&[
            "Police : plus de sécurité et d'ordre",
            "Travail : récompenser le mérite en entreprise",
        ]));

        assert!(analysis.contains("Les Républicains (LR)"));
        assert!(analysis.contains("droite du centre"));
    }

    #[test]
    fn balanced_keywords_fall_back_to_centrist_template() {
        // One left term ("public") against one right term ("sécurité"):
        // no strict winner, so the centrist template is selected.
        let analysis = heuristic_analysis(&lines(&[
            "Politique fiscale : baisser les impôts",
            "Santé : financement public",
            "Sécurité : plus de police",
        ]));

        assert!(analysis.contains("Renaissance (LREM)"));
        assert!(analysis.contains("(X = position centre)"));
    }

    #[test]
    fn tie_break_is_centre() {
        assert_eq!(Leaning::from_scores(2, 2, 0), Leaning::Centre);
        assert_eq!(Leaning::from_scores(0, 0, 0), Leaning::Centre);
        assert_eq!(Leaning::from_scores(1, 1, 1), Leaning::Centre);
        assert_eq!(Leaning::from_scores(3, 1, 0), Leaning::Left);
        assert_eq!(Leaning::from_scores(1, 3, 0), Leaning::Right);
    }

    #[test]
    fn heuristic_analysis_reports_response_count() {
        let analysis = heuristic_analysis(&lines(&["a : b", "c : d", "e : f"]));
        assert!(analysis.contains("à partir de 3 réponses"));
    }

    #[test]
    fn both_fallback_tiers_produce_intact_structure() {
        let heuristic = heuristic_analysis(&lines(&["question : réponse"]));
        let generic = generic_analysis("Aucune réponse fournie");

        assert_eq!(assess(&heuristic), StructureVerdict::Intact);
        assert_eq!(assess(&generic), StructureVerdict::Intact);
    }

    #[test]
    fn generic_analysis_carries_reason() {
        let analysis = generic_analysis("Réponses insuffisantes ou invalides");
        assert!(analysis.contains("Raison: Réponses insuffisantes ou invalides"));
    }
}
