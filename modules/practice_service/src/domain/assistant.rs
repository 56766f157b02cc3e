//! Legal assistant chat
//!
//! Each message is classified by [`IntentRouter`] and handed to the handler for
//! its intent. Agenda and search intents are answered from the practice data;
//! generation, research and free questions go to the language model. Replies are
//! in Portuguese. Conversations are kept per user in memory.

use super::intent::{Intent, IntentRouter};
use super::language_model::{ChatMessage, CompletionRequest, LanguageModel, LlmError};
use crate::contract::{
    Appointment, AuthContext, Client, ClientType, Document, DocumentStatus, PracticeApi,
    PracticeError, Priority, Task,
};
use chrono::NaiveDate;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::Arc;
use uuid::Uuid;

/// Reply used whenever a handler fails
pub const APOLOGY: &str =
    "Desculpe, ocorreu um erro ao processar sua solicitação. Por favor, tente novamente.";

/// Reply used when the language model has no API key configured
pub const MISSING_API_KEY: &str = "O assistente de IA não está configurado. Defina a chave de API do modelo de linguagem nas configurações do servidor.";

const SYSTEM_PROMPT: &str = "Você é um assistente jurídico especializado em direito brasileiro. \
Responda em português, de forma clara e objetiva, citando a legislação aplicável quando pertinente. \
Quando redigir peças, use a estrutura formal usual e deixe entre colchetes os dados que faltarem.";

const RESEARCH_PROMPT: &str = "Faça uma pesquisa jurídica sobre o tema a seguir. Apresente a \
legislação aplicável, o entendimento jurisprudencial predominante (STF, STJ e tribunais \
estaduais) e a doutrina relevante, indicando eventuais divergências.";

const MAX_LISTED: usize = 10;

/// One assistant answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantReply {
    pub intent: Intent,
    pub content: String,
}

#[derive(Debug, thiserror::Error)]
enum HandlerError {
    #[error(transparent)]
    Practice(#[from] PracticeError),

    #[error(transparent)]
    Model(#[from] LlmError),
}

pub struct Assistant {
    api: Arc<dyn PracticeApi>,
    llm: Arc<dyn LanguageModel>,
    router: IntentRouter,
    /// Earlier messages forwarded to the model with each prompt
    history_window: usize,
    conversations: RwLock<HashMap<Uuid, Vec<ChatMessage>>>,
}

fn priority_label(priority: Priority) -> &'static str {
    match priority {
        Priority::Low => "baixa",
        Priority::Medium => "média",
        Priority::High => "alta",
        Priority::Urgent => "urgente",
    }
}

fn document_status_label(status: DocumentStatus) -> &'static str {
    match status {
        DocumentStatus::Draft => "rascunho",
        DocumentStatus::Review => "em revisão",
        DocumentStatus::Approved => "aprovado",
        DocumentStatus::Signed => "assinado",
    }
}

fn bullet_list<T>(title: &str, items: &[T], line: impl Fn(&T) -> String) -> String {
    let mut out = format!("{title}\n");
    for item in items.iter().take(MAX_LISTED) {
        let _ = writeln!(out, "• {}", line(item));
    }
    if items.len() > MAX_LISTED {
        let _ = writeln!(out, "… e mais {} item(ns).", items.len() - MAX_LISTED);
    }
    out.trim_end().to_string()
}

fn task_line(task: &Task) -> String {
    let mut line = format!(
        "{} (prioridade {})",
        task.data.title,
        priority_label(task.data.priority)
    );
    if let Some(due) = task.data.due_date {
        let _ = write!(line, " - vence em {}", due.format("%d/%m/%Y"));
    }
    line
}

fn appointment_line(appointment: &Appointment) -> String {
    let data = &appointment.data;
    let mut line = format!("{} - {}", data.start_time.format("%H:%M"), data.title);
    if let Some(location) = data.location.as_deref().filter(|l| !l.is_empty()) {
        let _ = write!(line, " ({location})");
    }
    line
}

fn client_line(client: &Client) -> String {
    let contact: Vec<&str> = [client.data.email.as_deref(), client.data.phone.as_deref()]
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .collect();
    if contact.is_empty() {
        client.data.name.clone()
    } else {
        format!("{} ({})", client.data.name, contact.join(", "))
    }
}

fn document_line(document: &Document) -> String {
    let meta = &document.data.meta;
    match meta.document_type.as_deref() {
        Some(kind) if !kind.is_empty() => format!(
            "{} ({kind}, {})",
            meta.name,
            document_status_label(meta.status)
        ),
        _ => format!("{} ({})", meta.name, document_status_label(meta.status)),
    }
}

impl Assistant {
    pub fn new(
        api: Arc<dyn PracticeApi>,
        llm: Arc<dyn LanguageModel>,
        router: IntentRouter,
        history_window: usize,
    ) -> Self {
        Self {
            api,
            llm,
            router,
            history_window,
            conversations: RwLock::new(HashMap::new()),
        }
    }

    /// Answer one user message and record both turns
    pub async fn handle(
        &self,
        ctx: &AuthContext,
        text: &str,
        today: NaiveDate,
    ) -> Result<AssistantReply, PracticeError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(PracticeError::validation("message must not be empty"));
        }

        let intent = self.router.classify(text);
        let content = match self.dispatch(ctx, intent, text, today).await {
            Ok(content) => content,
            Err(HandlerError::Model(LlmError::MissingApiKey)) => {
                tracing::warn!(intent = %intent, "Language model API key is not configured");
                MISSING_API_KEY.to_string()
            }
            Err(err) => {
                tracing::warn!(intent = %intent, error = %err, "Assistant handler failed");
                APOLOGY.to_string()
            }
        };

        {
            let mut conversations = self.conversations.write();
            let conversation = conversations.entry(ctx.user_id).or_default();
            conversation.push(ChatMessage::user(text));
            conversation.push(ChatMessage::assistant(content.clone()));
        }
        Ok(AssistantReply { intent, content })
    }

    /// Messages exchanged so far, oldest first
    pub fn history(&self, ctx: &AuthContext) -> Vec<ChatMessage> {
        self.conversations
            .read()
            .get(&ctx.user_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn clear(&self, ctx: &AuthContext) {
        self.conversations.write().remove(&ctx.user_id);
    }

    async fn dispatch(
        &self,
        ctx: &AuthContext,
        intent: Intent,
        text: &str,
        today: NaiveDate,
    ) -> Result<String, HandlerError> {
        match intent {
            Intent::GeneratePetition
            | Intent::GenerateContract
            | Intent::GeneratePowerOfAttorney
            | Intent::GenerateNotice => self.generate_document(ctx, intent, text).await,
            Intent::LegalResearch => {
                self.ask_model(ctx, format!("{RESEARCH_PROMPT}\n\nTema: {text}"))
                    .await
            }
            Intent::TodayTasks => self.today_tasks(ctx, today).await,
            Intent::TodayAppointments => self.today_appointments(ctx, today).await,
            Intent::PendingTasks => self.pending_tasks(ctx).await,
            Intent::SearchClient => self.search_clients(ctx, text).await,
            Intent::SearchDocument => self.search_documents(ctx, text).await,
            Intent::GeneralQuestion => self.ask_model(ctx, text.to_string()).await,
        }
    }

    async fn generate_document(
        &self,
        ctx: &AuthContext,
        intent: Intent,
        text: &str,
    ) -> Result<String, HandlerError> {
        let kind = intent.document_kind().unwrap_or("documento");
        let mut prompt = format!("Redija uma minuta de {kind} conforme a solicitação abaixo.\n\nSolicitação: {text}\n");

        if let Some(name) = self.router.client_name(text) {
            let clients = self.api.search_clients(ctx, &name).await?;
            match clients.first() {
                Some(client) => {
                    let cases = self.api.cases_for_client(ctx, client.id).await?;
                    prompt.push_str(&client_context(client, &cases));
                }
                None => {
                    let _ = write!(
                        prompt,
                        "\nNenhum cliente chamado \"{name}\" foi encontrado no cadastro; deixe os dados do cliente entre colchetes.\n"
                    );
                }
            }
        }
        self.ask_model(ctx, prompt).await
    }

    async fn today_tasks(&self, ctx: &AuthContext, today: NaiveDate) -> Result<String, HandlerError> {
        let tasks = self.api.tasks_due_on(ctx, today).await?;
        if tasks.is_empty() {
            return Ok("Você não tem tarefas para hoje.".to_string());
        }
        Ok(bullet_list("Suas tarefas para hoje:", &tasks, task_line))
    }

    async fn today_appointments(
        &self,
        ctx: &AuthContext,
        today: NaiveDate,
    ) -> Result<String, HandlerError> {
        let appointments = self.api.appointments_on(ctx, today).await?;
        if appointments.is_empty() {
            return Ok("Você não tem compromissos para hoje.".to_string());
        }
        Ok(bullet_list(
            "Seus compromissos de hoje:",
            &appointments,
            appointment_line,
        ))
    }

    async fn pending_tasks(&self, ctx: &AuthContext) -> Result<String, HandlerError> {
        let tasks = self.api.pending_tasks(ctx).await?;
        if tasks.is_empty() {
            return Ok("Você não tem tarefas pendentes.".to_string());
        }
        Ok(bullet_list("Suas tarefas pendentes:", &tasks, task_line))
    }

    async fn search_clients(&self, ctx: &AuthContext, text: &str) -> Result<String, HandlerError> {
        let term = self.router.client_name(text).unwrap_or_default();
        let clients = self.api.search_clients(ctx, &term).await?;
        if clients.is_empty() {
            return Ok("Nenhum cliente encontrado.".to_string());
        }
        Ok(bullet_list("Clientes encontrados:", &clients, client_line))
    }

    async fn search_documents(
        &self,
        ctx: &AuthContext,
        text: &str,
    ) -> Result<String, HandlerError> {
        let term = self.router.document_term(text).unwrap_or_default();
        let documents = self.api.search_documents(ctx, &term).await?;
        if documents.is_empty() {
            return Ok("Nenhum documento encontrado.".to_string());
        }
        Ok(bullet_list(
            "Documentos encontrados:",
            &documents,
            document_line,
        ))
    }

    async fn ask_model(&self, ctx: &AuthContext, prompt: String) -> Result<String, HandlerError> {
        let mut messages = vec![ChatMessage::system(SYSTEM_PROMPT)];
        {
            let conversations = self.conversations.read();
            if let Some(history) = conversations.get(&ctx.user_id) {
                let skip = history.len().saturating_sub(self.history_window);
                messages.extend(history.iter().skip(skip).cloned());
            }
        }
        messages.push(ChatMessage::user(prompt));

        let reply = self.llm.complete(CompletionRequest::new(messages)).await?;
        Ok(reply.trim().to_string())
    }
}

fn client_context(client: &Client, cases: &[crate::contract::Case]) -> String {
    let data = &client.data;
    let mut out = String::from("\nDados do cliente:\n");
    let _ = writeln!(out, "- Nome: {}", data.name);
    let _ = writeln!(
        out,
        "- Tipo: {}",
        match data.client_type {
            ClientType::Individual => "pessoa física",
            ClientType::Company => "pessoa jurídica",
        }
    );
    let optional = [
        ("CPF/CNPJ", data.document_number.as_deref()),
        ("E-mail", data.email.as_deref()),
        ("Telefone", data.phone.as_deref()),
        ("Endereço", data.address.as_deref()),
        ("Observações", data.notes.as_deref()),
    ];
    for (label, value) in optional {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            let _ = writeln!(out, "- {label}: {value}");
        }
    }

    if !cases.is_empty() {
        out.push_str("\nProcessos do cliente:\n");
        for case in cases {
            let case = &case.data;
            let _ = write!(out, "- {}", case.title);
            if let Some(number) = case.case_number.as_deref().filter(|n| !n.is_empty()) {
                let _ = write!(out, " (nº {number})");
            }
            if let Some(court) = case.court.as_deref().filter(|c| !c.is_empty()) {
                let _ = write!(out, ", {court}");
            }
            let _ = writeln!(out, ", situação: {}", case.status);
        }
    }
    out
}
