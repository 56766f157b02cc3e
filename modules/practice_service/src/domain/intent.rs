//! Intent classification for the legal assistant
//!
//! Messages are matched against an ordered rule table; the first rule whose
//! pattern matches decides the intent. Patterns are case-insensitive and accept
//! Portuguese words with or without accents.

use regex::Regex;

/// What the user is asking the assistant to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    GeneratePetition,
    GenerateContract,
    GeneratePowerOfAttorney,
    GenerateNotice,
    LegalResearch,
    TodayTasks,
    TodayAppointments,
    PendingTasks,
    SearchClient,
    SearchDocument,
    GeneralQuestion,
}

impl Intent {
    pub fn as_str(self) -> &'static str {
        match self {
            Intent::GeneratePetition => "generate_petition",
            Intent::GenerateContract => "generate_contract",
            Intent::GeneratePowerOfAttorney => "generate_power_of_attorney",
            Intent::GenerateNotice => "generate_notice",
            Intent::LegalResearch => "legal_research",
            Intent::TodayTasks => "today_tasks",
            Intent::TodayAppointments => "today_appointments",
            Intent::PendingTasks => "pending_tasks",
            Intent::SearchClient => "search_client",
            Intent::SearchDocument => "search_document",
            Intent::GeneralQuestion => "general_question",
        }
    }

    /// Document kind produced by a generation intent
    pub fn document_kind(self) -> Option<&'static str> {
        match self {
            Intent::GeneratePetition => Some("petição"),
            Intent::GenerateContract => Some("contrato"),
            Intent::GeneratePowerOfAttorney => Some("procuração"),
            Intent::GenerateNotice => Some("notificação extrajudicial"),
            _ => None,
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Expands to a pattern requiring a generation verb followed (within a few words) by `$noun`
macro_rules! generate {
    ($noun:literal) => {
        concat!(
            r"(?i)\b(?:gerar|gere|criar|crie|redigir|redija|elaborar|elabore|fazer|fa[çc]a|escrever|escreva|preparar|prepare)\b(?:\s+\S+){0,3}?\s+",
            $noun,
            r"\b"
        )
    };
}

/// Highest priority first. Order matters: several patterns can match one message.
const RULES: &[(Intent, &str)] = &[
    (Intent::GeneratePetition, generate!(r"peti[çc](?:[ãa]o|[õo]es)")),
    (Intent::GenerateContract, generate!(r"contratos?")),
    (Intent::GeneratePowerOfAttorney, generate!(r"procura[çc](?:[ãa]o|[õo]es)")),
    (Intent::GenerateNotice, generate!(r"notifica[çc](?:[ãa]o|[õo]es)")),
    (
        Intent::LegalResearch,
        r"(?i)\b(?:pesquis(?:a|ar|e)\s+(?:jur[íi]dica|sobre)|jurisprud[êe]ncia|legisla[çc][ãa]o|doutrina|s[úu]mulas?)\b",
    ),
    (
        Intent::TodayTasks,
        r"(?i)\b(?:tarefas?|afazeres)\b.*\bhoje\b|\bhoje\b.*\b(?:tarefas?|afazeres)\b",
    ),
    (
        Intent::TodayAppointments,
        r"(?i)\b(?:compromissos?|agenda|audi[êe]ncias?|reuni[õo]es|reuni[ãa]o)\b.*\bhoje\b|\bhoje\b.*\b(?:compromissos?|agenda|audi[êe]ncias?|reuni[õo]es|reuni[ãa]o)\b",
    ),
    (
        Intent::PendingTasks,
        r"(?i)\btarefas?\s+(?:pendentes?|em\s+aberto|abertas?)\b|\bpend[êe]ncias\b",
    ),
    (Intent::SearchClient, r"(?i)\bclientes?\b"),
    (Intent::SearchDocument, r"(?i)\bdocumentos?\b"),
];

const CLIENT_NAME: &str = r"(?i)\bclientes?\s+(?:chamad[oa]\s+|de\s+nome\s+)?([\p{L}][\p{L}'\-]*(?:\s+[\p{L}][\p{L}'\-]*)*)";

const DOCUMENT_TERM: &str =
    r"(?i)\bdocumentos?\s+(?:d[aeo]s?\s+|sobre\s+|com\s+|chamad[oa]s?\s+)?(.+)$";

/// Words that end a captured client name
const NAME_STOPWORDS: &[&str] = &[
    "sobre", "para", "com", "que", "referente", "no", "na", "em", "e", "por", "contra",
];

/// Ordered, first-match-wins classifier
pub struct IntentRouter {
    rules: Vec<(Intent, Regex)>,
    client_name: Regex,
    document_term: Regex,
}

impl IntentRouter {
    pub fn new() -> Result<Self, regex::Error> {
        let rules = RULES
            .iter()
            .map(|(intent, pattern)| Ok((*intent, Regex::new(pattern)?)))
            .collect::<Result<Vec<_>, regex::Error>>()?;
        Ok(Self {
            rules,
            client_name: Regex::new(CLIENT_NAME)?,
            document_term: Regex::new(DOCUMENT_TERM)?,
        })
    }

    /// The priority list, highest first; `GeneralQuestion` is the implicit fallback
    pub fn rules(&self) -> impl Iterator<Item = Intent> + '_ {
        self.rules.iter().map(|(intent, _)| *intent)
    }

    pub fn classify(&self, message: &str) -> Intent {
        let intent = self
            .rules
            .iter()
            .find(|(_, regex)| regex.is_match(message))
            .map(|(intent, _)| *intent)
            .unwrap_or(Intent::GeneralQuestion);
        tracing::debug!(intent = %intent, "Classified assistant message");
        intent
    }

    /// Client name following the word "cliente", if any
    pub fn client_name(&self, message: &str) -> Option<String> {
        let captured = self.client_name.captures(message)?.get(1)?.as_str();
        let name = captured
            .split_whitespace()
            .take_while(|word| !NAME_STOPWORDS.contains(&word.to_lowercase().as_str()))
            .collect::<Vec<_>>()
            .join(" ");
        (!name.is_empty()).then_some(name)
    }

    /// Search term following the word "documento", if any
    pub fn document_term(&self, message: &str) -> Option<String> {
        let captured = self.document_term.captures(message)?.get(1)?.as_str();
        let term = captured
            .trim()
            .trim_end_matches(|c: char| c == '?' || c == '.' || c == '!')
            .trim();
        (!term.is_empty()).then(|| term.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn router() -> IntentRouter {
        IntentRouter::new().unwrap()
    }

    #[test]
    fn test_petition_wins_over_client_search() {
        let router = router();
        assert_eq!(
            router.classify("gerar petição inicial para cliente Maria"),
            Intent::GeneratePetition
        );
        assert_eq!(
            router.classify("Gerar peticao inicial para cliente Maria"),
            Intent::GeneratePetition
        );
    }

    #[test]
    fn test_generation_sub_types() {
        let router = router();
        assert_eq!(
            router.classify("Crie um contrato de prestação de serviços"),
            Intent::GenerateContract
        );
        assert_eq!(
            router.classify("redigir uma procuração ad judicia"),
            Intent::GeneratePowerOfAttorney
        );
        assert_eq!(
            router.classify("elaborar notificação extrajudicial para o cliente João"),
            Intent::GenerateNotice
        );
    }

    #[test]
    fn test_research_and_agenda() {
        let router = router();
        assert_eq!(
            router.classify("Qual a jurisprudência do STJ sobre dano moral?"),
            Intent::LegalResearch
        );
        assert_eq!(
            router.classify("pesquisa sobre prescrição intercorrente"),
            Intent::LegalResearch
        );
        assert_eq!(router.classify("quais as tarefas de hoje?"), Intent::TodayTasks);
        assert_eq!(router.classify("Minha agenda de hoje"), Intent::TodayAppointments);
        assert_eq!(
            router.classify("tenho audiências para hoje?"),
            Intent::TodayAppointments
        );
        assert_eq!(router.classify("listar tarefas pendentes"), Intent::PendingTasks);
    }

    #[test]
    fn test_today_without_preposition() {
        let router = router();
        assert_eq!(router.classify("minhas tarefas hoje"), Intent::TodayTasks);
        assert_eq!(
            router.classify("quais compromissos tenho hoje?"),
            Intent::TodayAppointments
        );
        assert_eq!(
            router.classify("o que tenho na agenda hoje?"),
            Intent::TodayAppointments
        );
        assert_eq!(
            router.classify("hoje tenho reunião com quem?"),
            Intent::TodayAppointments
        );
        // without "hoje" the pending rule still applies
        assert_eq!(router.classify("tarefas em aberto"), Intent::PendingTasks);
    }

    #[test]
    fn test_searches_and_fallback() {
        let router = router();
        assert_eq!(router.classify("buscar cliente Ana"), Intent::SearchClient);
        assert_eq!(
            router.classify("procurar documentos sobre divórcio"),
            Intent::SearchDocument
        );
        assert_eq!(
            router.classify("O que é uma tutela de urgência?"),
            Intent::GeneralQuestion
        );
    }

    #[test]
    fn test_generation_verb_must_precede_noun() {
        assert_eq!(
            router().classify("o contrato do cliente Pedro venceu?"),
            Intent::SearchClient
        );
    }

    #[test]
    fn test_rule_order_is_explicit() {
        let order: Vec<Intent> = router().rules().collect();
        assert_eq!(order.first(), Some(&Intent::GeneratePetition));
        let petition = order.iter().position(|i| *i == Intent::GeneratePetition);
        let client = order.iter().position(|i| *i == Intent::SearchClient);
        assert!(petition < client);
        assert!(!order.contains(&Intent::GeneralQuestion));
    }

    #[test]
    fn test_client_name_extraction() {
        let router = router();
        assert_eq!(
            router.client_name("gerar petição inicial para cliente Maria").as_deref(),
            Some("Maria")
        );
        assert_eq!(
            router.client_name("contrato para o cliente João da Silva sobre aluguel").as_deref(),
            Some("João da Silva")
        );
        assert_eq!(router.client_name("gerar uma petição"), None);
    }

    #[test]
    fn test_document_term_extraction() {
        let router = router();
        assert_eq!(
            router.document_term("buscar documentos sobre divórcio?").as_deref(),
            Some("divórcio")
        );
        assert_eq!(router.document_term("documentos"), None);
    }
}
