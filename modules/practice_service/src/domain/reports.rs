//! Dashboard and report aggregates
//!
//! Both views are computed from full owner-scoped listings, fetched concurrently.

use super::service::Service;
use crate::contract::{
    AppointmentStatus, AuthContext, CaseStatus, ClientStatus, ClientType, DashboardSummary,
    DocumentStatus, PracticeError, PracticeReport, Priority, Task, TaskStatus,
};
use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use std::collections::HashMap;
use uuid::Uuid;

/// How far ahead "upcoming" appointments reach
pub const UPCOMING_DAYS: i64 = 7;

/// Number of tasks shown on the dashboard
pub const NEXT_TASKS: usize = 5;

fn is_open_task(task: &Task) -> bool {
    matches!(task.data.status, TaskStatus::Pending | TaskStatus::InProgress)
}

/// Count occurrences per enum value, listing every value (zeros included) in declaration order
fn tally<E, I>(all: &[E], values: I) -> Vec<(E, usize)>
where
    E: Copy + Eq + std::hash::Hash,
    I: IntoIterator<Item = E>,
{
    let mut counts: HashMap<E, usize> = HashMap::new();
    for value in values {
        *counts.entry(value).or_default() += 1;
    }
    all.iter()
        .map(|value| (*value, counts.get(value).copied().unwrap_or(0)))
        .collect()
}

impl Service {
    /// Headline numbers as of `today`
    pub async fn dashboard(
        &self,
        ctx: &AuthContext,
        today: NaiveDate,
    ) -> Result<DashboardSummary, PracticeError> {
        let (clients, cases, tasks, appointments) = tokio::try_join!(
            self.list_clients(ctx),
            self.list_cases(ctx),
            self.list_tasks(ctx),
            self.list_appointments(ctx),
        )?;

        let horizon = today + Duration::days(UPCOMING_DAYS);
        let live_appointments = appointments
            .iter()
            .filter(|a| a.data.status != AppointmentStatus::Cancelled);

        let mut next_tasks: Vec<Task> = tasks
            .iter()
            .filter(|t| is_open_task(t) && t.data.due_date.is_some())
            .cloned()
            .collect();
        next_tasks.sort_by_key(|t| t.data.due_date);
        next_tasks.truncate(NEXT_TASKS);

        Ok(DashboardSummary {
            total_clients: clients.len(),
            active_clients: clients
                .iter()
                .filter(|c| c.data.status == ClientStatus::Active)
                .count(),
            open_cases: cases
                .iter()
                .filter(|c| c.data.status != CaseStatus::Closed)
                .count(),
            pending_tasks: tasks
                .iter()
                .filter(|t| t.data.status == TaskStatus::Pending)
                .count(),
            overdue_tasks: tasks
                .iter()
                .filter(|t| is_open_task(t) && t.data.due_date.is_some_and(|d| d < today))
                .count(),
            today_appointments: live_appointments
                .clone()
                .filter(|a| a.data.date == today)
                .count(),
            upcoming_appointments: live_appointments
                .filter(|a| a.data.date > today && a.data.date <= horizon)
                .count(),
            open_case_value: cases
                .iter()
                .filter(|c| c.data.status != CaseStatus::Closed)
                .filter_map(|c| c.data.value)
                .sum(),
            next_tasks,
        })
    }

    /// Breakdown of the whole practice
    pub async fn report(&self, ctx: &AuthContext) -> Result<PracticeReport, PracticeError> {
        let (clients, cases, tasks, documents) = tokio::try_join!(
            self.list_clients(ctx),
            self.list_cases(ctx),
            self.list_tasks(ctx),
            self.list_documents(ctx),
        )?;

        let names: HashMap<Uuid, &str> = clients
            .iter()
            .map(|c| (c.id, c.data.name.as_str()))
            .collect();
        let mut value_by_client: HashMap<Uuid, Decimal> = HashMap::new();
        for case in &cases {
            if let Some(value) = case.data.value {
                *value_by_client.entry(case.data.client_id).or_default() += value;
            }
        }
        let mut case_value_by_client: Vec<(Uuid, String, Decimal)> = value_by_client
            .into_iter()
            .map(|(id, total)| {
                let name = names.get(&id).copied().unwrap_or("(cliente removido)");
                (id, name.to_string(), total)
            })
            .collect();
        case_value_by_client.sort_by(|a, b| b.2.cmp(&a.2).then_with(|| a.1.cmp(&b.1)));

        Ok(PracticeReport {
            cases_by_status: tally(CaseStatus::ALL, cases.iter().map(|c| c.data.status)),
            cases_by_priority: tally(Priority::ALL, cases.iter().map(|c| c.data.priority)),
            tasks_by_status: tally(TaskStatus::ALL, tasks.iter().map(|t| t.data.status)),
            documents_by_status: tally(
                DocumentStatus::ALL,
                documents.iter().map(|d| d.data.meta.status),
            ),
            clients_by_type: tally(ClientType::ALL, clients.iter().map(|c| c.data.client_type)),
            case_value_by_client,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tally_lists_every_value() {
        let counts = tally(
            CaseStatus::ALL,
            [CaseStatus::Open, CaseStatus::Open, CaseStatus::Closed],
        );
        assert_eq!(
            counts,
            vec![
                (CaseStatus::Open, 2),
                (CaseStatus::Pending, 0),
                (CaseStatus::Closed, 1),
                (CaseStatus::Appeal, 0),
            ]
        );
    }
}
