//! Prompt assembly for the orchestration flow
//!
//! All model-facing text lives here: the context sections appended to every
//! system prompt, the consultation framing for specialist calls, and the
//! synthesis instructions for the final orchestrator call.

use crate::conversation::ContextBundle;

/// Substituted for an empty document context, so specialists do not invent
/// documents that were never uploaded.
const NO_DOCUMENTS: &str = "No documents uploaded for this matter.";

/// Templates for building system prompts and synthetic turns
pub struct PromptTemplate;

impl PromptTemplate {
    /// Default persona for the orchestrating role.
    pub fn orchestrator_persona() -> &'static str {
        r#"You are the Lead Tax Partner with 30 years of experience across all areas of federal taxation. You serve as the orchestrating intelligence for a team of specialized tax advisors.

## YOUR ROLE
You do NOT answer tax questions directly. Instead, you:
1. Analyze the tax issue to determine which specialist(s) to consult
2. Call the appropriate specialist tool(s) with a precise, well-framed question
3. Synthesize the specialists' responses into a coherent, integrated analysis
4. Highlight cross-area interactions and planning tensions

## MULTI-AREA TRIGGERS
Always call MULTIPLE specialists when the question involves:
- An individual selling a partnership interest (Individual + Partnership)
- An S-corp converting to C-corp (Corporate + Partnership)
- Corporate M&A with partnership targets (Corporate + Partnership)
- Executive compensation at a pass-through (Individual + Partnership/Corporate)
- Estate planning with business interests (Individual + Partnership + Corporate)
- PTET elections and their individual tax impact (Individual + Partnership)

## TOOL USAGE PROTOCOL
- Call tools with specific, scoped questions - not the entire client question verbatim
- Include relevant client context (entity type, jurisdiction, transaction size)
- Always call at least one specialist - never answer directly on your own"#
    }

    /// System prompt for the planning and synthesis calls: the orchestrator
    /// persona plus the request's context sections.
    pub fn orchestrator_system(persona: &str, bundle: &ContextBundle) -> String {
        format!("{persona}\n\n{}", Self::context_sections(bundle))
    }

    /// System prompt for a specialist call: the specialist persona, the same
    /// context sections, and a note explaining the consultation setting.
    pub fn specialist_system(persona: &str, bundle: &ContextBundle) -> String {
        format!(
            "{persona}\n\n{}\n\nNote: You are being consulted by the Lead Tax Partner \
             (Orchestrator) as part of a larger multi-area analysis. Focus on your specialty \
             area and be comprehensive. The Orchestrator will synthesize your response with \
             other specialists.",
            Self::context_sections(bundle)
        )
    }

    /// Synthetic user turn carrying a consultation request to a specialist
    pub fn specialist_request(client_context: &str, question: &str) -> String {
        format!("[ORCHESTRATOR REQUEST]\n\nClient Context: {client_context}\n\nQuestion: {question}")
    }

    /// System prompt for the synthesis call: the orchestrator system prompt
    /// plus synthesis instructions.
    pub fn synthesis_system(persona: &str, bundle: &ContextBundle) -> String {
        format!(
            "{}\n\nYou have now received responses from your specialist(s). Synthesize them \
             into a comprehensive, integrated analysis following your synthesis protocol. \
             Lead with the key conclusion, highlight cross-area interactions, and provide a \
             unified action plan.",
            Self::orchestrator_system(persona, bundle)
        )
    }

    fn context_sections(bundle: &ContextBundle) -> String {
        let documents = if bundle.document_context.is_empty() {
            NO_DOCUMENTS
        } else {
            &bundle.document_context
        };
        format!(
            "## MATTER CONTEXT\n{}\n\n## DOCUMENTS AVAILABLE\n{documents}",
            bundle.matter_context
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_sections_substitute_missing_documents() {
        let bundle = ContextBundle::new("Client: Acme LLC", "");
        let system = PromptTemplate::orchestrator_system("PERSONA", &bundle);
        assert!(system.starts_with("PERSONA\n\n## MATTER CONTEXT\nClient: Acme LLC"));
        assert!(system.contains("No documents uploaded for this matter."));
    }

    #[test]
    fn document_context_passes_through() {
        let bundle = ContextBundle::new("matter", "k1.pdf: extracted text");
        let system = PromptTemplate::specialist_system("PERSONA", &bundle);
        assert!(system.contains("## DOCUMENTS AVAILABLE\nk1.pdf: extracted text"));
        assert!(system.contains("consulted by the Lead Tax Partner"));
    }

    #[test]
    fn specialist_request_framing() {
        let request = PromptTemplate::specialist_request("MFJ couple", "AMT exposure?");
        assert_eq!(
            request,
            "[ORCHESTRATOR REQUEST]\n\nClient Context: MFJ couple\n\nQuestion: AMT exposure?"
        );
    }

    #[test]
    fn synthesis_system_extends_orchestrator_system() {
        let bundle = ContextBundle::default();
        let synthesis = PromptTemplate::synthesis_system("PERSONA", &bundle);
        assert!(synthesis.starts_with(&PromptTemplate::orchestrator_system("PERSONA", &bundle)));
        assert!(synthesis.contains("Synthesize them"));
    }
}
