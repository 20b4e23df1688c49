use crate::docs::types::DocumentLink;

/// Upper bound, in characters, on corpus text placed in a prompt.
pub const MAX_CORPUS_CHARS: usize = 8000;

/// How many filenames a multi-file reply lists before summarizing the rest.
pub const MAX_LISTED_FILES: usize = 10;

pub const COMPANY_CONTEXT: &str = r#"You are a helpful AI assistant for Oncosimis Biotech. Answer questions using ONLY the information provided. Keep answers concise (2-3 sentences maximum) and professional.

=== COMPANY INFORMATION ===

Q: What is Oncosimis?
A: Oncosimis Biotech Pvt Ltd is a biotechnology company revolutionizing the development of biologics and biosimilars at affordable costs using cutting-edge proprietary platforms.

Q: What technologies does Oncosimis use?
A: Oncosimis uses two proprietary technology platforms - AcceTT® (CHO-based high-yield production for monoclonal antibodies) and BacSec® (endotoxin-free protein expression in E. coli).

Q: What is AcceTT?
A: AcceTT® (Accelerated Technology Transfer) is Oncosimis's CHO cell-based platform designed for high-yield production of therapeutic monoclonal antibodies and recombinant proteins with reduced manufacturing costs.

Q: What is BacSec?
A: BacSec® is Oncosimis's bacterial secretion platform that produces endotoxin-free recombinant proteins and peptides in E. coli, enabling cost-effective manufacturing of biosimilars.

Q: What does Oncosimis do?
A: Oncosimis develops and manufactures bio-therapeutic proteins, monoclonal antibodies, and biosimilars for treating diseases like cancer and diabetes, making expensive biologics affordable and accessible.

Q: What is Oncosimis's mission?
A: Oncosimis is committed to making a positive impact on society by addressing global healthcare challenges through innovative biotechnology, focusing on disease treatment, food security, and environmental sustainability.

Q: Who is on the Oncosimis team?
A: Oncosimis has a team of world-renowned research scientists, doctors, and entrepreneurs specializing in drug discovery, manufacturing, and commercializing bio-therapeutics.

Q: Who is the CEO?
A: Dr. Sudarshan Reddy

Q: Who is the CSO or Chief Scientific Officer?
A: Dr. Sridhar Reddy

Q: What about the team and how many members?
A: There are approximately 13 members in the team.

Q: Where is Oncosimis located?
A: Oncosimis Biotech Pvt Ltd is located at IDA Uppal, Hyderabad, Telangana, India, 500039.
"#;

pub const GREETINGS: [&str; 4] = [
    "Hello! I'm the Oncosimis AI Assistant. I'm here to help you learn about our biotechnology platforms and services. What would you like to know?",
    "Hi there! Welcome to Oncosimis Biotech. I can tell you about our AcceTT® and BacSec® platforms, our team, or help you find Standard Operating Procedures. How can I assist you today?",
    "Greetings! I'm your AI assistant for Oncosimis Biotech. Ask me about our technologies, team, or request any SOPs you need.",
    "Hello! Nice to meet you. I'm here to provide information about Oncosimis Biotech's innovative biotechnology solutions. What interests you most?",
];

pub const NO_MATCHING_DOCUMENTS: &str = "I couldn't find any documents matching your request. Try asking 'show me all SOPs' to see all available documents.";

const ANSWER_INSTRUCTIONS: &str = "Instructions: Answer the user's question based ONLY on the information provided above. If the information is not available, say so politely. Keep your answer concise and professional (2-3 sentences maximum).";

/// Build the model prompt: static knowledge, the (possibly cut) corpus,
/// the question, and answering instructions.
pub fn assemble(knowledge: &str, corpus_text: &str, user_message: &str) -> String {
    let mut prompt = knowledge.to_string();

    if !corpus_text.is_empty() {
        // Cut on a char boundary; mid-sentence is fine
        match corpus_text.char_indices().nth(MAX_CORPUS_CHARS) {
            Some((cut, _)) => {
                prompt.push_str("\n\n=== STANDARD OPERATING PROCEDURES (Excerpt) ===\n");
                prompt.push_str(&corpus_text[..cut]);
            }
            None => {
                prompt.push_str("\n\n=== STANDARD OPERATING PROCEDURES ===\n");
                prompt.push_str(corpus_text);
            }
        }
    }

    format!(
        "{}\n\nUser Question: {}\n\n{}\n\nAnswer:",
        prompt, user_message, ANSWER_INSTRUCTIONS
    )
}

/// Reply text for one or more matched documents.
pub fn files_found(files: &[DocumentLink]) -> String {
    if let [only] = files {
        return format!(
            "I found this document for you:\n• {}\n\nClick the download button below to get it.",
            only.filename
        );
    }

    let mut list = files
        .iter()
        .take(MAX_LISTED_FILES)
        .map(|f| format!("• {}", f.filename))
        .collect::<Vec<_>>()
        .join("\n");
    if files.len() > MAX_LISTED_FILES {
        list.push_str(&format!("\n... and {} more", files.len() - MAX_LISTED_FILES));
    }

    format!(
        "I found {} relevant documents:\n{}\n\nClick the download buttons below to get them.",
        files.len(),
        list
    )
}
