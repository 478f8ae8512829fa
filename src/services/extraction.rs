use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::domain::{IdeologyScores, ProfileFields};

static ORIENTATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(centre|gauche|droite)[\s-]*(libertaire|autoritaire|libéral|conservateur)?")
        .expect("orientation pattern is a valid regex")
});

/// Parses the scalar fields out of a finished analysis text. Extraction is
/// best-effort: anything that cannot be located is simply left unset, the
/// raw text remains the source of truth.
pub fn extract_fields(analysis: &str) -> ProfileFields {
    ProfileFields {
        party: extract_party(analysis),
        orientation: extract_orientation(analysis),
        scores: extract_scores(analysis),
    }
}

fn section_body(analysis: &str, start_marker: &str, end_markers: &[&str]) -> Option<String> {
    let mut collecting = false;
    let mut body = Vec::new();

    for line in analysis.lines() {
        if line.contains(start_marker) {
            collecting = true;
            continue;
        }
        if collecting && end_markers.iter().any(|m| line.contains(m)) {
            break;
        }
        if collecting {
            body.push(line);
        }
    }

    let joined = body.join("\n").trim().to_string();
    if joined.is_empty() {
        None
    } else {
        Some(joined)
    }
}

/// Party label: the section-1 body up to the first dash (or sentence end).
fn extract_party(analysis: &str) -> Option<String> {
    let body = section_body(analysis, "1. Parti politique", &["2. Orientation politique"])?;

    let label = if let Some((name, _)) = body.split_once('-') {
        name.trim()
    } else {
        body.split('.').next().unwrap_or("").trim()
    };

    if label.is_empty() {
        None
    } else {
        Some(label.to_string())
    }
}

/// Orientation label, e.g. "Gauche-Libertaire", matched on the left-centre-
/// right and libertarian-authoritarian axes of the section-2 body.
fn extract_orientation(analysis: &str) -> Option<String> {
    let body = section_body(analysis, "2. Orientation politique", &["3. Valeurs principales"])?;

    if let Some(caps) = ORIENTATION.captures(&body.to_lowercase()) {
        let mut position = capitalize(caps.get(1).expect("axis group always present").as_str());
        if let Some(second) = caps.get(2) {
            position.push('-');
            position.push_str(&capitalize(second.as_str()));
        }
        return Some(position);
    }

    let first_sentence = body.split('.').next().unwrap_or("").trim().to_string();
    if first_sentence.is_empty() {
        None
    } else {
        Some(first_sentence)
    }
}

/// Ideology percentages from chart rows shaped `| Socialisme ▓▓▓▓ | 60%`.
/// The label is every leading alphabetic word of the middle column, so
/// two-word ideologies survive the bar glyphs that follow them.
fn extract_scores(analysis: &str) -> IdeologyScores {
    let mut scores = IdeologyScores::default();
    let mut in_chart = false;

    for line in analysis.lines() {
        if line.contains("Graphique ASCII") {
            in_chart = true;
            continue;
        }
        if !in_chart {
            continue;
        }
        if line.contains("**") {
            break;
        }
        if !line.contains('|') || !line.contains('%') {
            continue;
        }

        let parts: Vec<&str> = line.split('|').collect();
        if parts.len() < 3 {
            continue;
        }

        let label = parts[1]
            .split_whitespace()
            .take_while(|word| word.chars().all(|c| c.is_alphabetic() || c == '-' || c == '\''))
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();

        let percentage_text: String = parts[2].replace('%', "").trim().to_string();
        if let Ok(percentage) = percentage_text.parse::<i32>() {
            scores.assign(&label, percentage);
        }
    }

    scores
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_analysis() -> String {
        "1. Parti politique le plus proche:\n\
         Parti Socialiste (PS) - Proche de vos positions sociales\n\n\
         2. Orientation politique:\n\
         Gauche - Libertaire sur les questions de société\n\n\
         3. Valeurs principales:\n\
         Justice sociale, Solidarité, Services publics\n\n\
         4. Graphique ASCII:\n\
         ```\n\
         | Socialisme       ▓▓▓▓▓▓   | 60%\n\
         | Libéralisme économique ▓▓ | 25%\n\
         | Libéralisme      ▓▓▓▓     | 45%\n\
         | Écologisme       ▓▓▓      | 30%\n\
         ```"
            .to_string()
    }

    #[test]
    fn extracts_party_label_before_dash() {
        let fields = extract_fields(&sample_analysis());
        assert_eq!(fields.party.as_deref(), Some("Parti Socialiste (PS)"));
    }

    #[test]
    fn extracts_orientation_on_both_axes() {
        let fields = extract_fields(&sample_analysis());
        assert_eq!(fields.orientation.as_deref(), Some("Gauche-Libertaire"));
    }

    #[test]
    fn extracts_percentages_with_two_word_labels() {
        let scores = extract_fields(&sample_analysis()).scores;

        assert_eq!(scores.socialism, Some(60));
        assert_eq!(scores.economic_liberalism, Some(25));
        assert_eq!(scores.liberalism, Some(45));
        assert_eq!(scores.ecologism, Some(30));
        assert_eq!(scores.conservatism, None);
    }

    #[test]
    fn orientation_keeps_first_axis_for_compound_labels() {
        let analysis = "2. Orientation politique:\n\
                        Centre-gauche modéré\n\n\
                        3. Valeurs principales:\nDialogue";

        let fields = extract_fields(analysis);
        assert_eq!(fields.orientation.as_deref(), Some("Centre"));
    }

    #[test]
    fn orientation_falls_back_to_first_sentence() {
        let analysis = "2. Orientation politique:\n\
                        Position difficile à établir. Données partielles.\n\n\
                        3. Valeurs principales:\nDialogue";

        let fields = extract_fields(analysis);
        assert_eq!(
            fields.orientation.as_deref(),
            Some("Position difficile à établir")
        );
    }

    #[test]
    fn missing_sections_leave_fields_unset() {
        let fields = extract_fields("texte sans aucune structure");

        assert!(fields.party.is_none());
        assert!(fields.orientation.is_none());
        assert_eq!(fields.scores, IdeologyScores::default());
    }

    #[test]
    fn malformed_percentages_are_ignored() {
        let analysis = "4. Graphique ASCII:\n\
                        | Socialisme ▓▓ | soixante%\n\
                        | Populisme ▓ | 15%";

        let scores = extract_fields(analysis).scores;
        assert_eq!(scores.socialism, None);
        assert_eq!(scores.populism, Some(15));
    }
}
