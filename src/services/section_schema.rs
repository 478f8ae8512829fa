use once_cell::sync::Lazy;
use regex::Regex;

/// The labeled sections an analysis must carry, in their fixed order. The
/// first four are mandatory; the evolution section only appears when a prior
/// profile exists to compare against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Section {
    Party,
    Orientation,
    Values,
    Chart,
    Evolution,
}

impl Section {
    pub const REQUIRED: [Section; 4] = [
        Section::Party,
        Section::Orientation,
        Section::Values,
        Section::Chart,
    ];

    /// The marker text that identifies the section in free-form output.
    pub fn header(self) -> &'static str {
        match self {
            Section::Party => "Parti politique",
            Section::Orientation => "Orientation politique",
            Section::Values => "Valeurs principales",
            Section::Chart => "Graphique ASCII",
            Section::Evolution => "Évolution d'opinion",
        }
    }

    pub fn number(self) -> usize {
        match self {
            Section::Party => 1,
            Section::Orientation => 2,
            Section::Values => 3,
            Section::Chart => 4,
            Section::Evolution => 5,
        }
    }

    /// Replacement text spliced in when the generated reply dropped this
    /// section.
    pub fn placeholder(self) -> &'static str {
        match self {
            Section::Party => "1. Parti politique le plus proche:\nNon disponible\n\n",
            Section::Orientation => "2. Orientation politique:\nNon disponible\n\n",
            Section::Values => "3. Valeurs principales:\nNon disponible\n\n",
            Section::Chart => {
                "4. Graphique ASCII:\n```\n  Analyse\n  insuffisante\n  pour générer\n  le graphique\n```\n"
            }
            Section::Evolution => "5. Évolution d'opinion:\nNon disponible\n\n",
        }
    }
}

/// Outcome of the structural check on a generated reply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StructureVerdict {
    /// All four required headers present.
    Intact,
    /// One or two sections missing; the reply is worth keeping and patching.
    Repairable(Vec<Section>),
    /// Empty, error-marked, or missing more than two sections: discard.
    Unusable,
}

pub fn assess(reply: &str) -> StructureVerdict {
    if reply.trim().is_empty() {
        return StructureVerdict::Unusable;
    }

    let lowered = reply.to_lowercase();
    if lowered.contains("erreur") || lowered.contains("error") {
        return StructureVerdict::Unusable;
    }

    let missing: Vec<Section> = Section::REQUIRED
        .iter()
        .copied()
        .filter(|section| !reply.contains(section.header()))
        .collect();

    match missing.len() {
        0 => StructureVerdict::Intact,
        1 | 2 => StructureVerdict::Repairable(missing),
        _ => StructureVerdict::Unusable,
    }
}

pub fn has_evolution(text: &str) -> bool {
    text.contains("Évolution d'opinion") || text.contains("Evolution d'opinion")
}

/// Pass-through for structurally intact replies: the text is returned
/// untouched unless the chart block lacks its code fence.
pub fn normalize(reply: &str) -> String {
    if reply.contains("```") {
        reply.to_string()
    } else {
        fence_chart(reply)
    }
}

/// Patches a reply missing 1-2 sections: placeholder sections (numbered, in
/// canonical order) are spliced in before the existing content, surviving
/// headers are renumbered to their `N. Header` form, and the chart block is
/// fenced.
pub fn repair(reply: &str, missing: &[Section]) -> String {
    let mut ordered = missing.to_vec();
    ordered.sort();

    let mut patched = String::new();
    for section in &ordered {
        patched.push_str(section.placeholder());
    }
    patched.push('\n');
    patched.push_str(reply);

    let renumbered = renumber_headers(&patched);
    if renumbered.contains("```") {
        renumbered
    } else {
        fence_chart(&renumbered)
    }
}

fn renumber_headers(text: &str) -> String {
    let mut out = text.to_string();

    let mut sections: Vec<Section> = Section::REQUIRED.to_vec();
    if has_evolution(&out) {
        sections.push(Section::Evolution);
    }

    for section in sections {
        let expected = format!("{}. {}", section.number(), section.header());
        if out.contains(&expected) || !out.contains(section.header()) {
            continue;
        }

        let pattern = Regex::new(&format!(
            r"(?i)(?:\d+\.?\s*)?{}",
            regex::escape(section.header())
        ))
        .expect("section header pattern is a valid regex");
        out = pattern.replace(&out, expected.as_str()).into_owned();
    }

    out
}

static CHART_SPAN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)(4\. Graphique ASCII:.*?)(\n5\.|$)")
        .expect("chart span pattern is a valid regex")
});

/// Wraps the chart section body in code fences. The span runs from the chart
/// header to the evolution header (or end of text); when no span can be
/// located, empty fences are appended so the block delimiter is always
/// present.
fn fence_chart(text: &str) -> String {
    let Some(caps) = CHART_SPAN.captures(text) else {
        return format!("{}\n```\n```", text);
    };

    let whole = caps.get(0).expect("group 0 always present");
    let graph = caps.get(1).expect("chart group always present").as_str();
    let tail = caps.get(2).map(|m| m.as_str()).unwrap_or("");
    let body = graph.split_once('\n').map(|(_, b)| b).unwrap_or("");

    let mut out = String::with_capacity(text.len() + 10);
    out.push_str(&text[..whole.start()]);
    out.push_str("4. Graphique ASCII:\n```\n");
    out.push_str(body);
    out.push_str("\n```");
    out.push_str(tail);
    out.push_str(&text[whole.end()..]);
    out
}
