/// Builds the single prompt sent to the generation service for profile
/// synthesis. The numbered section layout is load-bearing: the response
/// validator and the field extractor both key off these exact headers.
pub fn analysis_prompt(valid_lines: &[String], comparison: bool) -> String {
    let mut prompt = format!(
        r#"
Tu es un expert en science politique française. Analyse les réponses suivantes et génère une analyse politique précise.

RÉPONSES DU QUIZ ({} réponses valides):
{}

INSTRUCTIONS STRICTES:
Génère une analyse avec EXACTEMENT ce format en adaptant avec les informations fournies:

1. Parti politique le plus proche:
[Nom précis d'un parti français existant] - [Description courte]

2. Orientation politique:
[Position sur l'axe gauche-centre-droite] - [Position sur l'axe libertaire-autoritaire]

3. Valeurs principales:
[3-5 valeurs séparées par des virgules]

4. Graphique ASCII:
```
    LIBERTAIRE
        |
GAUCHE--+--DROITE
        |
   AUTORITAIRE
     (X = votre position)
```
"#,
        valid_lines.len(),
        valid_lines.join("\n"),
    );

    if comparison {
        prompt.push_str(
            r#"
5. Évolution d'opinion:
[Compare les réponses marquées ANCIEN aux réponses actuelles et décris en 2-3 phrases comment les opinions ont évolué]
"#,
        );
    }

    prompt.push_str(
        r#"
IMPORTANT:
- Utilise uniquement des partis français réels (LFI, PS, LREM, LR, RN, etc.)
- Sois précis et factuel
- Le graphique doit être simple et lisible
- Réponds en français uniquement
"#,
    );

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines() -> Vec<String> {
        vec![
            "Quelle est votre opinion sur l'impôt ? : Baisser les impôts".to_string(),
            "Que pensez-vous de l'hôpital public ? : Plus de financement".to_string(),
        ]
    }

    #[test]
    fn prompt_contains_all_four_section_headers() {
        let prompt = analysis_prompt(&lines(), false);

        assert!(prompt.contains("1. Parti politique le plus proche:"));
        assert!(prompt.contains("2. Orientation politique:"));
        assert!(prompt.contains("3. Valeurs principales:"));
        assert!(prompt.contains("4. Graphique ASCII:"));
        assert!(!prompt.contains("5. Évolution d'opinion:"));
    }

    #[test]
    fn prompt_embeds_answers_and_count() {
        let prompt = analysis_prompt(&lines(), false);

        assert!(prompt.contains("(2 réponses valides)"));
        assert!(prompt.contains("Baisser les impôts"));
    }

    #[test]
    fn comparison_prompt_requests_evolution_section() {
        let prompt = analysis_prompt(&lines(), true);

        assert!(prompt.contains("5. Évolution d'opinion:"));
        assert!(prompt.contains("ANCIEN"));
    }
}
