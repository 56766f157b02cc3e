//! Integration tests for the practice domain service

mod common;

use common::*;
use practice_service::contract::*;
use practice_service::domain::ServiceOptions;
use rust_decimal::Decimal;
use std::time::Duration;

#[tokio::test]
async fn test_rows_are_invisible_to_other_owners() {
    print_test_header(
        "test_rows_are_invisible_to_other_owners",
        "A row owned by someone else behaves like a missing row",
    );
    let fx = Fixture::new();
    let alice = ctx();
    let bob = ctx();

    let client = fx
        .service
        .create_client(&alice, client_data("Maria Souza"))
        .await
        .unwrap();
    assert_eq!(client.user_id, alice.user_id);

    assert!(fx.service.list_clients(&bob).await.unwrap().is_empty());
    assert!(matches!(
        fx.service.get_client(&bob, client.id).await,
        Err(PracticeError::NotFound { .. })
    ));
    assert!(matches!(
        fx.service
            .update_client(&bob, client.id, client_data("Hijacked"))
            .await,
        Err(PracticeError::NotFound { .. })
    ));
    assert!(matches!(
        fx.service.delete_client(&bob, client.id).await,
        Err(PracticeError::NotFound { .. })
    ));

    let still_there = fx.service.get_client(&alice, client.id).await.unwrap();
    assert_eq!(still_there.data.name, "Maria Souza");
}

#[tokio::test]
async fn test_case_requires_a_visible_client() {
    let fx = Fixture::new();
    let alice = ctx();
    let bob = ctx();
    let client = fx
        .service
        .create_client(&alice, client_data("Maria Souza"))
        .await
        .unwrap();

    let err = fx
        .service
        .create_case(&bob, case_data(client.id, "Ação de cobrança"))
        .await
        .unwrap_err();
    assert!(matches!(err, PracticeError::NotFound { .. }));
    assert_eq!(fx.cases.count(), 0);

    let case = fx
        .service
        .create_case(&alice, case_data(client.id, "Ação de cobrança"))
        .await
        .unwrap();
    let for_client = fx
        .service
        .list_cases_for_client(&alice, client.id)
        .await
        .unwrap();
    assert_eq!(for_client.len(), 1);
    assert_eq!(for_client[0].id, case.id);
}

#[tokio::test]
async fn test_deleting_a_client_leaves_its_cases() {
    let fx = Fixture::new();
    let alice = ctx();
    let client = fx
        .service
        .create_client(&alice, client_data("João Pereira"))
        .await
        .unwrap();
    let case = fx
        .service
        .create_case(&alice, case_data(client.id, "Inventário"))
        .await
        .unwrap();

    fx.service.delete_client(&alice, client.id).await.unwrap();

    assert!(matches!(
        fx.service.get_client(&alice, client.id).await,
        Err(PracticeError::NotFound { .. })
    ));
    let orphan = fx.service.get_case(&alice, case.id).await.unwrap();
    assert_eq!(orphan.data.client_id, client.id);
}

#[tokio::test]
async fn test_validation_rejects_blank_titles_and_bad_email() {
    let fx = Fixture::new();
    let alice = ctx();

    let mut bad_email = client_data("Ana");
    bad_email.email = Some("not-an-email".to_string());
    assert!(matches!(
        fx.service.create_client(&alice, bad_email).await,
        Err(PracticeError::Validation { .. })
    ));
    assert!(matches!(
        fx.service.create_task(&alice, task_data("   ", None)).await,
        Err(PracticeError::Validation { .. })
    ));
    assert_eq!(fx.clients.count(), 0);
    assert_eq!(fx.tasks.count(), 0);
}

#[tokio::test]
async fn test_encrypted_upload_round_trip() {
    print_test_header(
        "test_encrypted_upload_round_trip",
        "A 2MB file uploaded with a password is stored encrypted and only opens with that password",
    );
    let fx = Fixture::new();
    let alice = ctx();
    let contents: Vec<u8> = (0..2 * 1024 * 1024).map(|i| (i % 251) as u8).collect();

    let document = fx
        .service
        .upload_document(
            &alice,
            new_document("Contrato social", "contrato.pdf"),
            contents.clone(),
            Some("s3nha-forte".to_string()),
        )
        .await
        .unwrap();

    assert!(document.data.encrypted);
    assert_eq!(
        document.data.encryption_ref.as_deref(),
        Some("pbkdf2-sha256-aes256gcm")
    );
    assert_eq!(document.data.file_size, contents.len() as i64);
    assert!(document
        .data
        .file_path
        .starts_with(&alice.user_id.to_string()));

    let stored = fx.objects.raw(&document.data.file_path).unwrap();
    assert_ne!(stored, contents);
    // salt + iv + tag
    assert_eq!(stored.len(), contents.len() + 16 + 12 + 16);

    let (_, opened) = fx
        .service
        .download_document(&alice, document.id, Some("s3nha-forte".to_string()))
        .await
        .unwrap();
    assert_eq!(opened, contents);

    assert!(matches!(
        fx.service
            .download_document(&alice, document.id, Some("errada".to_string()))
            .await,
        Err(PracticeError::InvalidPassword)
    ));
    assert!(matches!(
        fx.service.download_document(&alice, document.id, None).await,
        Err(PracticeError::InvalidPassword)
    ));
}

#[tokio::test]
async fn test_plain_upload_and_delete_removes_object() {
    let fx = Fixture::new();
    let alice = ctx();
    let document = fx
        .service
        .upload_document(
            &alice,
            new_document("Procuração", "procuracao.pdf"),
            b"%PDF-1.7".to_vec(),
            None,
        )
        .await
        .unwrap();
    assert!(!document.data.encrypted);
    assert_eq!(document.data.encryption_ref, None);

    let (_, bytes) = fx
        .service
        .download_document(&alice, document.id, None)
        .await
        .unwrap();
    assert_eq!(bytes, b"%PDF-1.7");

    fx.service.delete_document(&alice, document.id).await.unwrap();
    assert_eq!(fx.objects.len(), 0);
    assert_eq!(fx.documents.count(), 0);
}

#[tokio::test]
async fn test_upload_limits() {
    let fx = Fixture::with_options(ServiceOptions {
        max_file_size: 8,
        ..ServiceOptions::default()
    });
    let alice = ctx();

    let empty = fx
        .service
        .upload_document(&alice, new_document("Vazio", "a.txt"), Vec::new(), None)
        .await;
    assert!(matches!(empty, Err(PracticeError::Validation { .. })));

    let too_big = fx
        .service
        .upload_document(&alice, new_document("Grande", "b.txt"), vec![0; 9], None)
        .await;
    assert!(matches!(too_big, Err(PracticeError::Validation { .. })));
    assert_eq!(fx.objects.len(), 0);
}

#[tokio::test]
async fn test_signed_url_serves_the_stored_object() {
    let fx = Fixture::new();
    let alice = ctx();
    let document = fx
        .service
        .upload_document(
            &alice,
            new_document("Parecer", "parecer.txt"),
            b"conteudo".to_vec(),
            None,
        )
        .await
        .unwrap();

    let now = chrono::Utc::now();
    let signed = fx
        .service
        .document_signed_url(&alice, document.id, now)
        .await
        .unwrap();
    let (_, query) = signed.url.split_once('?').unwrap();
    let params: std::collections::HashMap<&str, &str> = query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .collect();
    let expires: i64 = params["expires"].parse().unwrap();

    let bytes = fx
        .service
        .open_signed_object(&document.data.file_path, expires, params["signature"], now)
        .await
        .unwrap();
    assert_eq!(bytes, b"conteudo");

    let later = now + chrono::Duration::hours(1);
    assert!(matches!(
        fx.service
            .open_signed_object(&document.data.file_path, expires, params["signature"], later)
            .await,
        Err(PracticeError::Unauthenticated)
    ));
}

#[tokio::test]
async fn test_cache_serves_reads_and_is_invalidated_on_update() {
    let fx = Fixture::with_options(ServiceOptions {
        cache_ttl: Duration::from_secs(60),
        ..ServiceOptions::default()
    });
    let alice = ctx();
    let client = fx
        .service
        .create_client(&alice, client_data("Carla Mendes"))
        .await
        .unwrap();

    fx.service.get_client(&alice, client.id).await.unwrap();
    fx.service.get_client(&alice, client.id).await.unwrap();
    assert_eq!(fx.clients.find_calls(), 1);

    fx.service
        .update_client(&alice, client.id, client_data("Carla Mendes Lima"))
        .await
        .unwrap();
    let refreshed = fx.service.get_client(&alice, client.id).await.unwrap();
    assert_eq!(refreshed.data.name, "Carla Mendes Lima");
    assert_eq!(fx.clients.find_calls(), 2);

    let listed = fx.service.list_clients(&alice).await.unwrap();
    assert_eq!(listed[0].data.name, "Carla Mendes Lima");
}

#[tokio::test]
async fn test_read_racing_an_update_does_not_cache_the_old_row() {
    print_test_header(
        "test_read_racing_an_update_does_not_cache_the_old_row",
        "A read that started before an update must not leave the old row in the cache",
    );
    let fx = Fixture::with_options(ServiceOptions {
        cache_ttl: Duration::from_secs(60),
        ..ServiceOptions::default()
    });
    let alice = ctx();
    let client = fx
        .service
        .create_client(&alice, client_data("Joana Prado"))
        .await
        .unwrap();

    let gate = fx.clients.hold_next_find();
    let reader = {
        let service = fx.service.clone();
        let alice = alice.clone();
        tokio::spawn(async move { service.get_client(&alice, client.id).await })
    };
    gate.reached.notified().await;

    fx.service
        .update_client(&alice, client.id, client_data("Joana Prado Reis"))
        .await
        .unwrap();
    gate.release.notify_one();

    let raced = reader.await.unwrap().unwrap();
    assert_eq!(raced.data.name, "Joana Prado");

    let current = fx.service.get_client(&alice, client.id).await.unwrap();
    assert_eq!(current.data.name, "Joana Prado Reis");
    assert_eq!(fx.clients.find_calls(), 2);
}

#[tokio::test]
async fn test_disabled_cache_always_reads_through() {
    let fx = Fixture::with_options(ServiceOptions {
        cache_ttl: Duration::ZERO,
        ..ServiceOptions::default()
    });
    let alice = ctx();
    let client = fx
        .service
        .create_client(&alice, client_data("Rita"))
        .await
        .unwrap();

    fx.service.get_client(&alice, client.id).await.unwrap();
    fx.service.get_client(&alice, client.id).await.unwrap();
    assert_eq!(fx.clients.find_calls(), 2);
}

#[tokio::test]
async fn test_search_matches_name_email_and_document_number() {
    let fx = Fixture::new();
    let alice = ctx();
    let mut maria = client_data("Maria Souza");
    maria.email = Some("maria@souza.com.br".to_string());
    let mut acme = client_data("Acme Ltda");
    acme.client_type = ClientType::Company;
    acme.document_number = Some("12.345.678/0001-90".to_string());
    fx.service.create_client(&alice, maria).await.unwrap();
    fx.service.create_client(&alice, acme).await.unwrap();

    let by_name = fx.service.search_clients(&alice, "MARIA").await.unwrap();
    assert_eq!(by_name.len(), 1);
    let by_doc = fx.service.search_clients(&alice, "0001").await.unwrap();
    assert_eq!(by_doc[0].data.name, "Acme Ltda");
    assert_eq!(fx.service.search_clients(&alice, "  ").await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_agenda_queries() {
    let fx = Fixture::new();
    let alice = ctx();
    let today = date(2025, 3, 10);

    let mut done = task_data("Arquivar", Some(today));
    done.status = TaskStatus::Completed;
    fx.service.create_task(&alice, done).await.unwrap();
    fx.service
        .create_task(&alice, task_data("Protocolar recurso", Some(today)))
        .await
        .unwrap();
    fx.service
        .create_task(&alice, task_data("Sem prazo", None))
        .await
        .unwrap();
    fx.service
        .create_task(&alice, task_data("Revisar contrato", Some(date(2025, 3, 5))))
        .await
        .unwrap();

    assert_eq!(fx.service.tasks_due_on(&alice, today).await.unwrap().len(), 2);
    let pending: Vec<String> = fx
        .service
        .pending_tasks(&alice)
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.data.title)
        .collect();
    assert_eq!(
        pending,
        vec!["Revisar contrato", "Protocolar recurso", "Sem prazo"]
    );

    fx.service
        .create_appointment(&alice, appointment_data("Audiência", today, time(14, 0)))
        .await
        .unwrap();
    fx.service
        .create_appointment(&alice, appointment_data("Reunião", today, time(9, 30)))
        .await
        .unwrap();
    let titles: Vec<String> = fx
        .service
        .appointments_on(&alice, today)
        .await
        .unwrap()
        .into_iter()
        .map(|a| a.data.title)
        .collect();
    assert_eq!(titles, vec!["Reunião", "Audiência"]);
}

#[tokio::test]
async fn test_dashboard_counts() {
    print_test_header(
        "test_dashboard_counts",
        "Dashboard aggregates reflect statuses, dates and open case values",
    );
    let fx = Fixture::new();
    let alice = ctx();
    let today = date(2025, 3, 10);

    let active = fx
        .service
        .create_client(&alice, client_data("Ativo"))
        .await
        .unwrap();
    let mut inactive = client_data("Inativo");
    inactive.status = ClientStatus::Inactive;
    fx.service.create_client(&alice, inactive).await.unwrap();

    let mut open = case_data(active.id, "Aberto");
    open.value = Some(Decimal::new(150_000, 2));
    fx.service.create_case(&alice, open).await.unwrap();
    let mut closed = case_data(active.id, "Encerrado");
    closed.status = CaseStatus::Closed;
    closed.value = Some(Decimal::new(99_999, 2));
    fx.service.create_case(&alice, closed).await.unwrap();

    fx.service
        .create_task(&alice, task_data("Atrasada", Some(date(2025, 3, 1))))
        .await
        .unwrap();
    fx.service
        .create_task(&alice, task_data("Hoje", Some(today)))
        .await
        .unwrap();

    fx.service
        .create_appointment(&alice, appointment_data("Hoje", today, time(10, 0)))
        .await
        .unwrap();
    fx.service
        .create_appointment(&alice, appointment_data("Semana", date(2025, 3, 15), time(10, 0)))
        .await
        .unwrap();
    let mut cancelled = appointment_data("Cancelado", date(2025, 3, 12), time(10, 0));
    cancelled.status = AppointmentStatus::Cancelled;
    fx.service.create_appointment(&alice, cancelled).await.unwrap();
    fx.service
        .create_appointment(&alice, appointment_data("Longe", date(2025, 4, 30), time(10, 0)))
        .await
        .unwrap();

    let summary = fx.service.dashboard(&alice, today).await.unwrap();
    assert_eq!(summary.total_clients, 2);
    assert_eq!(summary.active_clients, 1);
    assert_eq!(summary.open_cases, 1);
    assert_eq!(summary.pending_tasks, 2);
    assert_eq!(summary.overdue_tasks, 1);
    assert_eq!(summary.today_appointments, 1);
    assert_eq!(summary.upcoming_appointments, 1);
    assert_eq!(summary.open_case_value, Decimal::new(150_000, 2));
    assert_eq!(summary.next_tasks[0].data.title, "Atrasada");

    let empty = fx.service.dashboard(&ctx(), today).await.unwrap();
    assert_eq!(empty.total_clients, 0);
    assert!(empty.next_tasks.is_empty());
}

#[tokio::test]
async fn test_report_breakdowns() {
    let fx = Fixture::new();
    let alice = ctx();
    let client = fx
        .service
        .create_client(&alice, client_data("Beatriz"))
        .await
        .unwrap();
    let mut first = case_data(client.id, "Primeiro");
    first.value = Some(Decimal::new(1_000, 0));
    let mut second = case_data(client.id, "Segundo");
    second.value = Some(Decimal::new(500, 0));
    second.priority = Priority::Urgent;
    fx.service.create_case(&alice, first).await.unwrap();
    fx.service.create_case(&alice, second).await.unwrap();

    let report = fx.service.report(&alice).await.unwrap();
    assert_eq!(report.cases_by_status.len(), CaseStatus::ALL.len());
    assert!(report
        .cases_by_status
        .contains(&(CaseStatus::Open, 2)));
    assert!(report.cases_by_priority.contains(&(Priority::Urgent, 1)));
    assert!(report.tasks_by_status.iter().all(|(_, n)| *n == 0));
    assert_eq!(
        report.case_value_by_client,
        vec![(client.id, "Beatriz".to_string(), Decimal::new(1_500, 0))]
    );
}

#[tokio::test]
async fn test_profile_update_requires_existing_profile() {
    let fx = Fixture::new();
    let stranger = ctx();
    let update = ProfileUpdate {
        full_name: "Dra. Paula".to_string(),
        role: Some("sócia".to_string()),
        phone: None,
        bar_number: Some("OAB/SP 123456".to_string()),
    };
    assert!(matches!(
        fx.service.update_profile(&stranger, update).await,
        Err(PracticeError::NotFound { .. })
    ));
}
