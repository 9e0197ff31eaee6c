use super::tracker::TrackRequest;

const DEFAULT_CONTEXT: &str = "General news tracking";

/// Build the instruction sent to the generation backend.
///
/// Every prompt names the output language and says whether a source
/// allowlist applies. Wire requests ask for an untargeted headline digest;
/// topic requests ask for a directed brief on the subject.
pub fn build_prompt(request: &TrackRequest) -> String {
    let language = request.language;
    let sources = source_instruction(&request.selected_sources, request.include_epapers);

    if request.is_wire {
        return format!(
            "Role: Wire Service Operator.\n\
             Fetch the Top 10 critical news headlines for India and the world.\n\
             Language: {language}\n\
             {sources}\n\
             Start directly with bullet points. Tone: urgent. \
             Include as much detail as possible for each headline."
        );
    }

    let topic = request.topic.as_deref().unwrap_or_default().trim();
    let context = request
        .context
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(DEFAULT_CONTEXT);

    format!(
        "Role: Lead Investigative Journalist & Intelligence Officer.\n\
         Subject: \"{topic}\"\n\
         Context: \"{context}\"\n\
         Language: {language}\n\
         {sources}\n\
         \n\
         Task: Provide an exhaustive and complete intelligence briefing covering the latest \
         developments from the last 24-48 hours.\n\
         \n\
         Requirements:\n\
         1. STRUCTURE: A clear headline, then sections for Introduction, Key Findings, \
         Local Impact and Future Outlook (use ### for section headers).\n\
         2. DETAIL: Specific names, dates, amounts and locations.\n\
         3. CITATIONS: Name the newspaper or source in the text when reporting a fact.\n\
         4. COMPLETENESS: Reach a logical conclusion. Do not stop mid-sentence.\n\
         \n\
         Formatting: Use **bold** for names and figures. Use paragraphs and - bullets."
    )
}

fn source_instruction(sources: &[String], include_epapers: bool) -> String {
    let filter = if sources.is_empty() {
        "SOURCE FILTERING: none, use any reputable outlet.".to_string()
    } else {
        format!(
            "STRICT SOURCE FILTERING: Prioritize info from: {}.",
            sources.join(", ")
        )
    };

    let epapers = if include_epapers {
        "Include e-paper (print edition) content where available."
    } else {
        "Use web editions only."
    };

    format!("{filter}\n{epapers}")
}
