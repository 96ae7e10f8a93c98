use std::{cmp::Ordering, collections::HashMap};

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    db::{
        dao::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, SignupDao},
        entities::signup::SignupStatus,
    },
    error::{AppError, FieldError},
    services::signup_service::{SignupView, StudentView},
};

/// One dashboard row: a signup joined with its student.
#[derive(Debug, Clone, Serialize)]
pub struct SignupRow {
    #[serde(flatten)]
    pub signup: SignupView,
    pub student: StudentView,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderWindow {
    /// reminder_date has passed
    Due,
    Upcoming,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    CreatedAt,
    ReminderDate,
    TrainingType,
    Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Query string accepted by the dashboard listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignupListQuery {
    pub training_type: Option<String>,
    pub status: Option<String>,
    pub created_from: Option<NaiveDate>,
    pub created_to: Option<NaiveDate>,
    pub reminder: Option<ReminderWindow>,
    pub search: Option<String>,
    pub sort_by: Option<SortField>,
    pub sort_order: Option<SortOrder>,
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

/// A single independent filter over dashboard rows.
#[derive(Debug, Clone, PartialEq)]
pub enum SignupPredicate {
    TrainingType(String),
    Status(SignupStatus),
    CreatedFrom(NaiveDate),
    CreatedTo(NaiveDate),
    Reminder(ReminderWindow),
    Search(String),
}

impl SignupPredicate {
    pub fn matches(&self, row: &SignupRow, now: DateTime<FixedOffset>) -> bool {
        match self {
            SignupPredicate::TrainingType(wanted) => {
                row.signup.training_type.eq_ignore_ascii_case(wanted)
            }
            SignupPredicate::Status(status) => row.signup.status == status.as_str(),
            SignupPredicate::CreatedFrom(from) => row.signup.created_at.date_naive() >= *from,
            SignupPredicate::CreatedTo(to) => row.signup.created_at.date_naive() <= *to,
            SignupPredicate::Reminder(ReminderWindow::Due) => row.signup.reminder_date <= now,
            SignupPredicate::Reminder(ReminderWindow::Upcoming) => row.signup.reminder_date > now,
            SignupPredicate::Search(needle) => search_haystack(row)
                .iter()
                .any(|value| value.to_lowercase().contains(needle)),
        }
    }
}

fn search_haystack(row: &SignupRow) -> Vec<&str> {
    [
        row.student.full_name.as_deref(),
        row.student.first_name.as_deref(),
        row.student.last_name.as_deref(),
        row.student.email.as_deref(),
        row.student.phone.as_deref(),
        Some(row.signup.training_type.as_str()),
    ]
    .into_iter()
    .flatten()
    .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub order: SortOrder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub page_size: u64,
}

/// Validated form of [`SignupListQuery`].
#[derive(Debug, Clone)]
pub struct SignupListing {
    pub predicates: Vec<SignupPredicate>,
    pub sort: SortSpec,
    pub page: PageRequest,
}

impl TryFrom<SignupListQuery> for SignupListing {
    type Error = AppError;

    fn try_from(query: SignupListQuery) -> Result<Self, Self::Error> {
        let mut fields = Vec::new();
        let mut predicates = Vec::new();

        if let Some(training_type) = non_blank(query.training_type) {
            predicates.push(SignupPredicate::TrainingType(training_type));
        }
        if let Some(status) = non_blank(query.status) {
            match SignupStatus::try_from(status.to_ascii_lowercase().as_str()) {
                Ok(status) => predicates.push(SignupPredicate::Status(status)),
                Err(()) => fields.push(FieldError::new(
                    "status",
                    "Status must be one of pending, sent, failed",
                )),
            }
        }
        if let (Some(from), Some(to)) = (query.created_from, query.created_to)
            && from > to
        {
            fields.push(FieldError::new(
                "created_from",
                "created_from must not be after created_to",
            ));
        }
        if let Some(from) = query.created_from {
            predicates.push(SignupPredicate::CreatedFrom(from));
        }
        if let Some(to) = query.created_to {
            predicates.push(SignupPredicate::CreatedTo(to));
        }
        if let Some(window) = query.reminder {
            predicates.push(SignupPredicate::Reminder(window));
        }
        if let Some(search) = non_blank(query.search) {
            predicates.push(SignupPredicate::Search(search.to_lowercase()));
        }

        let page = query.page.unwrap_or(1);
        if page == 0 {
            fields.push(FieldError::new("page", "page must be at least 1"));
        }
        let page_size = query.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            fields.push(FieldError::new(
                "page_size",
                format!("page_size must be between 1 and {MAX_PAGE_SIZE}"),
            ));
        }

        if !fields.is_empty() {
            return Err(AppError::Validation {
                message: fields[0].message.clone(),
                fields,
            });
        }

        Ok(Self {
            predicates,
            sort: SortSpec {
                field: query.sort_by.unwrap_or_default(),
                order: query.sort_order.unwrap_or_default(),
            },
            page: PageRequest { page, page_size },
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SignupPage {
    pub items: Vec<SignupRow>,
    pub page: u64,
    pub page_size: u64,
    pub total: usize,
    pub total_pages: u64,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct SignupStats {
    pub total: usize,
    pub pending: usize,
    pub sent: usize,
    pub failed: usize,
    pub due_reminders: usize,
    pub students: usize,
    pub by_training_type: Vec<TrainingTypeCount>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TrainingTypeCount {
    pub training_type: String,
    pub count: usize,
}

pub fn apply_filters(
    rows: Vec<SignupRow>,
    predicates: &[SignupPredicate],
    now: DateTime<FixedOffset>,
) -> Vec<SignupRow> {
    predicates.iter().fold(rows, |mut rows, predicate| {
        rows.retain(|row| predicate.matches(row, now));
        rows
    })
}

/// Stable sort; ties fall back to signup id so pages never overlap.
pub fn sort_rows(rows: &mut [SignupRow], sort: SortSpec) {
    rows.sort_by(|a, b| {
        let ordering = match sort.field {
            SortField::CreatedAt => a.signup.created_at.cmp(&b.signup.created_at),
            SortField::ReminderDate => a.signup.reminder_date.cmp(&b.signup.reminder_date),
            SortField::TrainingType => a
                .signup
                .training_type
                .to_lowercase()
                .cmp(&b.signup.training_type.to_lowercase()),
            SortField::Status => a.signup.status.cmp(&b.signup.status),
        }
        .then_with(|| a.signup.id.cmp(&b.signup.id));

        match sort.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

pub fn paginate(rows: Vec<SignupRow>, page: PageRequest) -> SignupPage {
    let total = rows.len();
    let total_pages = (total as u64).div_ceil(page.page_size);
    let skip = page.page.saturating_sub(1).saturating_mul(page.page_size) as usize;
    let items = rows
        .into_iter()
        .skip(skip)
        .take(page.page_size as usize)
        .collect();

    SignupPage {
        items,
        page: page.page,
        page_size: page.page_size,
        total,
        total_pages,
    }
}

pub fn compute_stats(rows: &[SignupRow], now: DateTime<FixedOffset>) -> SignupStats {
    let mut stats = SignupStats {
        total: rows.len(),
        ..Default::default()
    };
    // keyed case-insensitively, shown with the first spelling seen
    let mut by_type: HashMap<String, (&str, usize)> = HashMap::new();
    let mut students = rows
        .iter()
        .map(|row| row.student.id)
        .collect::<Vec<_>>();
    students.sort();
    students.dedup();
    stats.students = students.len();

    for row in rows {
        match SignupStatus::try_from(row.signup.status.as_str()) {
            Ok(SignupStatus::Pending) => {
                stats.pending += 1;
                if row.signup.reminder_date <= now {
                    stats.due_reminders += 1;
                }
            }
            Ok(SignupStatus::Sent) => stats.sent += 1,
            Ok(SignupStatus::Failed) => stats.failed += 1,
            Err(()) => {}
        }
        let label = row.signup.training_type.as_str();
        by_type.entry(label.to_lowercase()).or_insert((label, 0)).1 += 1;
    }

    let mut by_training_type = by_type
        .into_values()
        .map(|(training_type, count)| TrainingTypeCount {
            training_type: training_type.to_string(),
            count,
        })
        .collect::<Vec<_>>();
    by_training_type.sort_by(|a, b| match b.count.cmp(&a.count) {
        Ordering::Equal => a
            .training_type
            .to_lowercase()
            .cmp(&b.training_type.to_lowercase()),
        other => other,
    });
    stats.by_training_type = by_training_type;
    stats
}

#[derive(Clone)]
pub struct DashboardService {
    signup_dao: SignupDao,
}

impl DashboardService {
    pub fn new(signup_dao: SignupDao) -> Self {
        Self { signup_dao }
    }

    /// Loads every signup joined with its student.
    pub async fn load_rows(&self) -> Result<Vec<SignupRow>, AppError> {
        let joined = self.signup_dao.list_with_students().await?;

        let mut rows = Vec::with_capacity(joined.len());
        for (signup, student) in joined {
            let Some(student) = student else {
                tracing::warn!(signup_id = %signup.id, "signup without student skipped");
                continue;
            };
            rows.push(SignupRow {
                signup: signup.into(),
                student: student.into(),
            });
        }
        Ok(rows)
    }

    pub async fn list(&self, query: SignupListQuery) -> Result<SignupPage, AppError> {
        let listing = SignupListing::try_from(query)?;
        let now = Utc::now().fixed_offset();

        let mut rows = apply_filters(self.load_rows().await?, &listing.predicates, now);
        sort_rows(&mut rows, listing.sort);
        Ok(paginate(rows, listing.page))
    }

    pub async fn stats(&self) -> Result<SignupStats, AppError> {
        let rows = self.load_rows().await?;
        Ok(compute_stats(&rows, Utc::now().fixed_offset()))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
