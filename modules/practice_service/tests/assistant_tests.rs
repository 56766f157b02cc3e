//! Integration tests for the legal assistant

mod common;

use common::*;
use practice_service::api::native::NativeClient;
use practice_service::contract::*;
use practice_service::domain::assistant::{APOLOGY, MISSING_API_KEY};
use practice_service::domain::{Assistant, Intent, IntentRouter, LanguageModel, Role};
use std::sync::Arc;

fn assistant(fx: &Fixture, llm: Arc<dyn LanguageModel>) -> Assistant {
    let api: Arc<dyn PracticeApi> = Arc::new(NativeClient::new(fx.service.clone()));
    Assistant::new(api, llm, IntentRouter::new().unwrap(), 10)
}

#[tokio::test]
async fn test_petition_prompt_carries_client_and_cases() {
    print_test_header(
        "test_petition_prompt_carries_client_and_cases",
        "Generation requests naming a client send the client record and its cases to the model",
    );
    let fx = Fixture::new();
    let user = ctx();
    let mut maria = client_data("Maria Oliveira");
    maria.document_number = Some("123.456.789-00".to_string());
    maria.email = Some("maria@oliveira.com".to_string());
    let client = fx.service.create_client(&user, maria).await.unwrap();
    let mut case = case_data(client.id, "Ação de indenização");
    case.case_number = Some("0001234-56.2025.8.26.0100".to_string());
    fx.service.create_case(&user, case).await.unwrap();

    let model = Arc::new(RecordingModel::new("EXCELENTÍSSIMO SENHOR DOUTOR JUIZ..."));
    let assistant = assistant(&fx, model.clone());

    let reply = assistant
        .handle(
            &user,
            "gerar petição inicial para cliente Maria",
            date(2025, 3, 10),
        )
        .await
        .unwrap();

    assert_eq!(reply.intent, Intent::GeneratePetition);
    assert_eq!(reply.content, "EXCELENTÍSSIMO SENHOR DOUTOR JUIZ...");

    let prompt = model.last_prompt().unwrap();
    println!("   prompt: {prompt}");
    assert!(prompt.contains("petição"));
    assert!(prompt.contains("Dados do cliente:"));
    assert!(prompt.contains("- Nome: Maria Oliveira"));
    assert!(prompt.contains("- CPF/CNPJ: 123.456.789-00"));
    assert!(prompt.contains("Processos do cliente:"));
    assert!(prompt.contains("Ação de indenização (nº 0001234-56.2025.8.26.0100)"));

    let request = &model.requests()[0];
    assert_eq!(request.messages[0].role, Role::System);
}

#[tokio::test]
async fn test_unknown_client_is_flagged_in_prompt() {
    let fx = Fixture::new();
    let model = Arc::new(RecordingModel::new("minuta"));
    let assistant = assistant(&fx, model.clone());

    assistant
        .handle(&ctx(), "redigir contrato para cliente Joaquim", date(2025, 3, 10))
        .await
        .unwrap();
    let prompt = model.last_prompt().unwrap();
    assert!(prompt.contains("Nenhum cliente chamado \"Joaquim\""));
    assert!(!prompt.contains("Dados do cliente:"));
}

#[tokio::test]
async fn test_agenda_intents_answer_from_practice_data() {
    let fx = Fixture::new();
    let user = ctx();
    let today = date(2025, 3, 10);
    let model = Arc::new(RecordingModel::new("unused"));
    let assistant = assistant(&fx, model.clone());

    let reply = assistant
        .handle(&user, "quais as tarefas de hoje?", today)
        .await
        .unwrap();
    assert_eq!(reply.intent, Intent::TodayTasks);
    assert_eq!(reply.content, "Você não tem tarefas para hoje.");

    fx.service
        .create_task(&user, task_data("Protocolar contestação", Some(today)))
        .await
        .unwrap();
    let reply = assistant
        .handle(&user, "quais as tarefas de hoje?", today)
        .await
        .unwrap();
    assert!(reply.content.starts_with("Suas tarefas para hoje:"));
    assert!(reply.content.contains("• Protocolar contestação (prioridade média)"));

    fx.service
        .create_appointment(&user, appointment_data("Audiência de conciliação", today, time(14, 30)))
        .await
        .unwrap();
    let reply = assistant
        .handle(&user, "minha agenda de hoje", today)
        .await
        .unwrap();
    assert_eq!(reply.intent, Intent::TodayAppointments);
    assert!(reply.content.contains("• 14:30 - Audiência de conciliação"));

    let reply = assistant
        .handle(&user, "listar tarefas pendentes", today)
        .await
        .unwrap();
    assert_eq!(reply.intent, Intent::PendingTasks);
    assert!(reply.content.starts_with("Suas tarefas pendentes:"));

    assert!(model.requests().is_empty());
}

#[tokio::test]
async fn test_search_intents() {
    let fx = Fixture::new();
    let user = ctx();
    let model = Arc::new(RecordingModel::new("unused"));
    let assistant = assistant(&fx, model);

    let reply = assistant
        .handle(&user, "buscar cliente Ana", date(2025, 3, 10))
        .await
        .unwrap();
    assert_eq!(reply.intent, Intent::SearchClient);
    assert_eq!(reply.content, "Nenhum cliente encontrado.");

    fx.service
        .create_client(&user, client_data("Ana Costa"))
        .await
        .unwrap();
    let reply = assistant
        .handle(&user, "buscar cliente Ana", date(2025, 3, 10))
        .await
        .unwrap();
    assert!(reply.content.starts_with("Clientes encontrados:"));
    assert!(reply.content.contains("Ana Costa"));

    let reply = assistant
        .handle(&user, "procurar documentos sobre divórcio", date(2025, 3, 10))
        .await
        .unwrap();
    assert_eq!(reply.intent, Intent::SearchDocument);
    assert_eq!(reply.content, "Nenhum documento encontrado.");
}

#[tokio::test]
async fn test_model_failures_become_fixed_replies() {
    let fx = Fixture::new();
    let user = ctx();

    let failing = assistant(&fx, Arc::new(FailingModel(Failure::Upstream)));
    let reply = failing
        .handle(&user, "O que é uma tutela de urgência?", date(2025, 3, 10))
        .await
        .unwrap();
    assert_eq!(reply.intent, Intent::GeneralQuestion);
    assert_eq!(reply.content, APOLOGY);

    let unconfigured = assistant(&fx, Arc::new(FailingModel(Failure::MissingKey)));
    let reply = unconfigured
        .handle(&user, "O que é uma tutela de urgência?", date(2025, 3, 10))
        .await
        .unwrap();
    assert_eq!(reply.content, MISSING_API_KEY);
}

#[tokio::test]
async fn test_history_is_per_user_and_windowed() {
    let fx = Fixture::new();
    let alice = ctx();
    let bob = ctx();
    let model = Arc::new(RecordingModel::new("resposta"));
    let assistant = assistant(&fx, model.clone());

    for n in 0..8 {
        assistant
            .handle(&alice, &format!("pergunta {n}"), date(2025, 3, 10))
            .await
            .unwrap();
    }
    assert_eq!(assistant.history(&alice).len(), 16);
    assert!(assistant.history(&bob).is_empty());

    // system prompt + 10 earlier messages + the new prompt
    let last = model.requests().pop().unwrap();
    assert_eq!(last.messages.len(), 12);
    assert_eq!(last.messages.last().unwrap().content, "pergunta 7");

    assistant.clear(&alice);
    assert!(assistant.history(&alice).is_empty());
}

#[tokio::test]
async fn test_empty_message_is_rejected() {
    let fx = Fixture::new();
    let assistant = assistant(&fx, Arc::new(RecordingModel::new("x")));
    let err = assistant
        .handle(&ctx(), "   ", date(2025, 3, 10))
        .await
        .unwrap_err();
    assert!(matches!(err, PracticeError::Validation { .. }));
}
