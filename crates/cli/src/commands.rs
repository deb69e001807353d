//! Command handlers. This layer owns all user-facing messaging: client
//! errors bubble up from the library untouched and are printed exactly
//! once, never retried.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use clap::Args;

use remiaq_client::auth::AuthApi;
use remiaq_client::filter::ListFilter;
use remiaq_client::recurrence::parse_shorthand;
use remiaq_client::reminders::RemindersApi;
use remiaq_client::types::{
    CalendarType, CreateReminder, RecurrencePattern, Reminder, ReminderKind, ReminderStatus,
    UpdateReminder,
};
use remiaq_client::{ApiClient, AuthExpiredHook, ClientError, SessionContext, SessionStore};

use crate::view;

const DELETE_CONFIRM_TIMEOUT: Duration = Duration::from_secs(10);

/// Points the user back at `login` whenever the pipeline sees a 401,
/// independent of which command triggered it.
struct LoginRedirect;

impl AuthExpiredHook for LoginRedirect {
    fn on_auth_expired(&self) {
        eprintln!("\x1b[33m🔐 Session expired.\x1b[0m");
        eprintln!("   Run '\x1b[1mremiaq login\x1b[0m' to authenticate again.");
    }
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Reminder text
    pub title: String,

    #[arg(long)]
    pub description: Option<String>,

    /// Trigger time: "YYYY-MM-DD HH:MM" (local) or RFC 3339
    #[arg(long, conflicts_with = "in_minutes")]
    pub at: Option<String>,

    /// Trigger this many minutes from now
    #[arg(long = "in", value_name = "MINUTES")]
    pub in_minutes: Option<i64>,

    /// Schedule on the lunar calendar
    #[arg(long)]
    pub lunar: bool,

    /// Recurrence: daily|weekly|monthly|yearly, or shorthand like 3n, 6h
    #[arg(long)]
    pub repeat: Option<String>,

    /// Re-notify every this many seconds until completed
    #[arg(long)]
    pub retry_interval_sec: Option<u32>,

    /// Maximum number of re-notifications
    #[arg(long)]
    pub max_retries: Option<u32>,
}

#[derive(Debug, Args)]
pub struct EditArgs {
    /// Reminder id
    pub id: String,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// New trigger time: "YYYY-MM-DD HH:MM" (local) or RFC 3339
    #[arg(long)]
    pub at: Option<String>,

    /// New recurrence: daily|weekly|monthly|yearly, or shorthand like 3n
    #[arg(long)]
    pub repeat: Option<String>,

    /// Pause or resume the reminder
    #[arg(long, value_parser = ["active", "paused"])]
    pub status: Option<String>,
}

pub struct App {
    session: SessionContext,
    reminders: RemindersApi,
    server: String,
}

impl App {
    pub fn new(server: &str) -> Result<Self> {
        Self::with_store(server, SessionStore::open_default()?)
    }

    /// Build against an explicit session store. Tests use this to point
    /// the app at an isolated store and server.
    pub fn with_store(server: &str, store: SessionStore) -> Result<Self> {
        let server = server.trim_end_matches('/').to_string();
        let api = ApiClient::new(server.clone(), store)
            .with_auth_expired_hook(Arc::new(LoginRedirect));
        let mut session = SessionContext::new(AuthApi::new(api.clone()));
        session.init();
        Ok(Self {
            session,
            reminders: RemindersApi::new(api),
            server,
        })
    }

    pub async fn login(&mut self, email: &str, password: Option<String>) -> Result<()> {
        let password = match password {
            Some(p) => p,
            None => prompt("Password")?,
        };
        if email.trim().is_empty() || password.is_empty() {
            return Err(ClientError::validation("email and password are required").into());
        }

        self.session.login(email, &password).await?;
        let email = self
            .session
            .user()
            .map(|u| u.email.clone())
            .unwrap_or_default();
        println!("\x1b[1;32m✅ Logged in as {email}\x1b[0m");
        Ok(())
    }

    pub async fn register(
        &self,
        email: &str,
        password: Option<String>,
        confirm: Option<String>,
    ) -> Result<()> {
        let prompted = password.is_none();
        let password = match password {
            Some(p) => p,
            None => prompt("Password")?,
        };
        if email.trim().is_empty() || password.is_empty() {
            return Err(ClientError::validation("email and password are required").into());
        }
        let confirm = match confirm {
            Some(c) => Some(c),
            None if prompted => Some(prompt("Confirm password")?),
            None => None,
        };
        if let Some(confirm) = confirm {
            if confirm != password {
                return Err(
                    ClientError::validation("password confirmation does not match").into(),
                );
            }
        }

        let profile = self.session.register(email, &password).await?;
        println!("\x1b[1;32m✅ Account created for {}\x1b[0m", profile.email);
        println!("Run '\x1b[1mremiaq login {}\x1b[0m' to sign in.", profile.email);
        Ok(())
    }

    pub fn logout(&mut self) -> Result<()> {
        self.session.logout()?;
        println!("\x1b[32m✅ Logged out successfully\x1b[0m");
        Ok(())
    }

    pub fn whoami(&self) {
        match self.session.user() {
            Some(user) => {
                println!("\x1b[32m✓ Logged in\x1b[0m");
                println!("Email:   {}", user.email);
                println!("User ID: {}", user.id);
                println!("Server:  {}", self.server);
            }
            None => {
                println!("\x1b[33m✗ Not logged in\x1b[0m");
                println!("Run '\x1b[1mremiaq login\x1b[0m' to authenticate");
            }
        }
    }

    pub async fn list(&self, filter: ListFilter) -> Result<()> {
        if !self.require_login() {
            return Ok(());
        }
        let items = self.reminders.list_mine().await?;
        view::render_list(&items, filter, Utc::now());
        Ok(())
    }

    pub async fn show(&self, id: &str) -> Result<()> {
        if !self.require_login() {
            return Ok(());
        }
        let reminder = self.reminders.get_by_id(id).await?;
        view::render_detail(&reminder, Utc::now());
        Ok(())
    }

    pub async fn create(&self, args: CreateArgs) -> Result<()> {
        if !self.require_login() {
            return Ok(());
        }
        let dto = build_create(&args, Utc::now())?;
        let created = self.reminders.create(&dto).await?;
        println!("\x1b[1;32m✅ Created \"{}\"\x1b[0m", created.title);
        self.refetch_and_render().await
    }

    pub async fn edit(&self, args: EditArgs) -> Result<()> {
        if !self.require_login() {
            return Ok(());
        }
        let patch = build_update(&args)?;
        let updated = self.reminders.update(&args.id, &patch).await?;
        println!("\x1b[1;32m✅ Updated \"{}\"\x1b[0m", updated.title);
        self.refetch_and_render().await
    }

    pub async fn complete(&self, id: &str) -> Result<()> {
        if !self.require_login() {
            return Ok(());
        }
        self.reminders.complete(id).await?;
        println!("\x1b[1;32m✅ Completed\x1b[0m");
        self.refetch_and_render().await
    }

    pub async fn snooze(&self, id: &str, seconds: u64) -> Result<()> {
        if !self.require_login() {
            return Ok(());
        }
        self.reminders.snooze(id, seconds).await?;
        println!("\x1b[32m😴 Snoozed for {seconds}s\x1b[0m");
        Ok(())
    }

    pub async fn delete(&self, id: &str, yes: bool) -> Result<()> {
        if !self.require_login() {
            return Ok(());
        }
        let mut items = self.reminders.list_mine().await?;
        let title = items
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.title.clone())
            .unwrap_or_else(|| id.to_string());

        if !yes && !confirm_delete(&title).await? {
            println!("Cancelled.");
            return Ok(());
        }

        self.reminders.delete(id).await?;
        remove_local(&mut items, id);
        println!("\x1b[32m🗑  Deleted \"{title}\"\x1b[0m");
        println!();
        view::render_list(&items, ListFilter::default(), Utc::now());
        Ok(())
    }

    /// The server owns derived scheduling fields, so every create, edit, or
    /// complete is followed by exactly one full list re-fetch instead of a
    /// local patch.
    async fn refetch_and_render(&self) -> Result<()> {
        let items = self.reminders.list_mine().await?;
        println!();
        view::render_list(&items, ListFilter::default(), Utc::now());
        Ok(())
    }

    fn require_login(&self) -> bool {
        if self.session.is_authenticated() {
            return true;
        }
        eprintln!("\x1b[33m🔐 Not logged in.\x1b[0m");
        eprintln!("   Run '\x1b[1mremiaq login\x1b[0m' to authenticate.");
        false
    }
}

/// Delete is the one mutation rendered from the local list: drop the id,
/// keep everyone else's order, no re-fetch.
fn remove_local(items: &mut Vec<Reminder>, id: &str) {
    items.retain(|r| r.id != id);
}

fn build_create(args: &CreateArgs, now: DateTime<Utc>) -> Result<CreateReminder, ClientError> {
    let title = args.title.trim();
    if title.is_empty() {
        return Err(ClientError::validation("reminder title must not be empty"));
    }

    let next_trigger_at = match (&args.at, args.in_minutes) {
        (Some(at), _) => parse_when(at)?,
        (None, Some(minutes)) => now + chrono::Duration::minutes(minutes),
        (None, None) => {
            return Err(ClientError::validation(
                "specify when to trigger: --at \"YYYY-MM-DD HH:MM\" or --in <minutes>",
            ))
        }
    };

    let recurrence_pattern = args.repeat.as_deref().map(parse_repeat).transpose()?;

    Ok(CreateReminder {
        title: title.to_string(),
        description: args.description.clone(),
        kind: if recurrence_pattern.is_some() {
            ReminderKind::Recurring
        } else {
            ReminderKind::OneTime
        },
        calendar_type: if args.lunar {
            CalendarType::Lunar
        } else {
            CalendarType::Solar
        },
        next_trigger_at,
        recurrence_pattern,
        status: ReminderStatus::Active,
        retry_interval_sec: args.retry_interval_sec,
        max_retries: args.max_retries,
    })
}

fn build_update(args: &EditArgs) -> Result<UpdateReminder, ClientError> {
    if let Some(title) = &args.title {
        if title.trim().is_empty() {
            return Err(ClientError::validation("reminder title must not be empty"));
        }
    }

    let recurrence_pattern = args.repeat.as_deref().map(parse_repeat).transpose()?;
    let patch = UpdateReminder {
        title: args.title.clone(),
        description: args.description.clone(),
        kind: recurrence_pattern.as_ref().map(|_| ReminderKind::Recurring),
        calendar_type: None,
        next_trigger_at: args.at.as_deref().map(parse_when).transpose()?,
        recurrence_pattern,
        status: args.status.as_deref().map(|s| match s {
            "paused" => ReminderStatus::Paused,
            _ => ReminderStatus::Active,
        }),
        snooze_until: None,
    };

    if patch.is_empty() {
        return Err(ClientError::validation("nothing to update"));
    }
    Ok(patch)
}

/// Named presets from the create form, falling back to the shorthand codes.
fn parse_repeat(code: &str) -> Result<RecurrencePattern, ClientError> {
    match code {
        "daily" => Ok(RecurrencePattern::Day { interval: 1 }),
        "weekly" => Ok(RecurrencePattern::Week {
            interval: 1,
            day_of_week: None,
        }),
        "monthly" => Ok(RecurrencePattern::Month {
            interval: 1,
            day_of_month: None,
        }),
        "yearly" => Ok(RecurrencePattern::Year { interval: 1 }),
        shorthand => parse_shorthand(shorthand),
    }
}

fn parse_when(input: &str) -> Result<DateTime<Utc>, ClientError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M").map_err(|_| {
        ClientError::validation("invalid time, expected \"YYYY-MM-DD HH:MM\" or RFC 3339")
    })?;
    Local
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| ClientError::validation("ambiguous local time"))
}

fn prompt(label: &str) -> Result<String> {
    use std::io::Write;
    print!("{label}: ");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Ask before deleting; silence counts as "no".
async fn confirm_delete(title: &str) -> Result<bool> {
    println!(
        "Delete \"{title}\"? [y/N] (auto-cancels in {}s)",
        DELETE_CONFIRM_TIMEOUT.as_secs()
    );

    // The stdin reader thread may outlive the timeout; the process exits
    // shortly after either way.
    let answer = tokio::time::timeout(
        DELETE_CONFIRM_TIMEOUT,
        tokio::task::spawn_blocking(|| {
            let mut line = String::new();
            std::io::stdin().read_line(&mut line).map(|_| line)
        }),
    )
    .await;

    match answer {
        Ok(Ok(Ok(line))) => Ok(matches!(
            line.trim().to_ascii_lowercase().as_str(),
            "y" | "yes"
        )),
        Ok(Ok(Err(e))) => Err(e.into()),
        Ok(Err(join)) => Err(join.into()),
        Err(_) => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn create_args(title: &str) -> CreateArgs {
        CreateArgs {
            title: title.into(),
            description: None,
            at: None,
            in_minutes: Some(30),
            lunar: false,
            repeat: None,
            retry_interval_sec: None,
            max_retries: None,
        }
    }

    #[test]
    fn empty_title_is_rejected_before_any_request() {
        let err = build_create(&create_args("   "), Utc::now()).unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
    }

    #[test]
    fn missing_trigger_time_is_rejected() {
        let mut args = create_args("water plants");
        args.in_minutes = None;
        let err = build_create(&args, Utc::now()).unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
    }

    #[test]
    fn in_minutes_offsets_from_now() {
        let now = Utc::now();
        let dto = build_create(&create_args("water plants"), now).unwrap();
        assert_eq!(dto.next_trigger_at, now + chrono::Duration::minutes(30));
        assert_eq!(dto.kind, ReminderKind::OneTime);
        assert_eq!(dto.status, ReminderStatus::Active);
    }

    #[test]
    fn repeat_flag_makes_the_reminder_recurring() {
        let mut args = create_args("standup");
        args.repeat = Some("daily".into());
        let dto = build_create(&args, Utc::now()).unwrap();
        assert_eq!(dto.kind, ReminderKind::Recurring);
        assert_eq!(
            dto.recurrence_pattern,
            Some(RecurrencePattern::Day { interval: 1 })
        );
    }

    #[test]
    fn repeat_presets_and_shorthand_both_parse() {
        assert_eq!(
            parse_repeat("yearly").unwrap(),
            RecurrencePattern::Year { interval: 1 }
        );
        assert_eq!(
            parse_repeat("3n").unwrap(),
            RecurrencePattern::Day { interval: 3 }
        );
        assert!(matches!(
            parse_repeat("xyz").unwrap_err(),
            ClientError::Validation(_)
        ));
    }

    #[test]
    fn rfc3339_trigger_time_parses() {
        let dt = parse_when("2026-04-01T08:30:00Z").unwrap();
        assert_eq!(dt.to_rfc3339(), "2026-04-01T08:30:00+00:00");
        assert!(matches!(
            parse_when("next tuesday").unwrap_err(),
            ClientError::Validation(_)
        ));
    }

    #[test]
    fn edit_with_no_fields_is_rejected() {
        let args = EditArgs {
            id: "r1".into(),
            title: None,
            description: None,
            at: None,
            repeat: None,
            status: None,
        };
        let err = build_update(&args).unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
    }

    #[test]
    fn edit_status_maps_to_enum() {
        let args = EditArgs {
            id: "r1".into(),
            title: None,
            description: None,
            at: None,
            repeat: None,
            status: Some("paused".into()),
        };
        let patch = build_update(&args).unwrap();
        assert_eq!(patch.status, Some(ReminderStatus::Paused));
        assert_eq!(patch.kind, None);
    }

    fn reminder(id: &str) -> Reminder {
        Reminder {
            id: id.into(),
            user: "u1".into(),
            title: format!("reminder {id}"),
            description: None,
            kind: ReminderKind::OneTime,
            calendar_type: CalendarType::Solar,
            next_trigger_at: Utc::now(),
            trigger_time_of_day: None,
            recurrence_pattern: None,
            status: ReminderStatus::Active,
            retry_interval_sec: None,
            max_retries: None,
            snooze_until: None,
            created: String::new(),
            updated: String::new(),
        }
    }

    #[test]
    fn delete_removes_exactly_one_id_and_keeps_order() {
        let mut items = vec![
            reminder("r1"),
            reminder("r2"),
            reminder("r3"),
            reminder("r4"),
        ];
        remove_local(&mut items, "r2");
        let ids: Vec<&str> = items.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["r1", "r3", "r4"]);

        // Unknown ids leave the list untouched.
        remove_local(&mut items, "zzz");
        assert_eq!(items.len(), 3);
    }

    /// The re-fetch policy, asserted through the real command handlers
    /// against an in-process HTTP double: create, edit, and complete each
    /// fetch the list exactly once afterwards; delete renders from the
    /// list it already fetched; snooze never fetches it at all.
    mod refetch {
        use super::*;
        use pretty_assertions::assert_eq;
        use axum::extract::State;
        use axum::routing::{get, post, put};
        use axum::{Json, Router};
        use remiaq_client::types::UserProfile;
        use serde_json::{json, Value};
        use std::sync::atomic::{AtomicUsize, Ordering};

        #[derive(Default)]
        struct Counters {
            list_calls: AtomicUsize,
        }

        fn reminder_json(id: &str, title: &str) -> Value {
            json!({
                "id": id,
                "user": "u1",
                "title": title,
                "type": "one_time",
                "calendar_type": "solar",
                "next_trigger_at": "2026-09-01T09:00:00Z",
                "status": "active"
            })
        }

        async fn list(State(counters): State<Arc<Counters>>) -> Json<Value> {
            counters.list_calls.fetch_add(1, Ordering::SeqCst);
            Json(json!({
                "data": [reminder_json("r1", "one"), reminder_json("r2", "two")]
            }))
        }

        async fn created(Json(body): Json<Value>) -> Json<Value> {
            let mut record = reminder_json("r-new", "");
            record["title"] = body["title"].clone();
            Json(json!({ "data": record }))
        }

        async fn updated() -> Json<Value> {
            Json(reminder_json("r1", "renamed"))
        }

        async fn ok() -> Json<Value> {
            Json(json!({"success": true}))
        }

        async fn spawn_app() -> (App, Arc<Counters>, tempfile::TempDir) {
            let counters = Arc::new(Counters::default());
            let router = Router::new()
                .route("/api/reminders/mine", get(list))
                .route("/api/reminders", post(created))
                .route("/api/reminders/:id", put(updated).delete(ok))
                .route("/api/reminders/:id/snooze", post(ok))
                .route("/api/reminders/:id/complete", post(ok))
                .with_state(counters.clone());

            let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                .await
                .expect("bind");
            let addr = listener.local_addr().expect("local addr");
            tokio::spawn(async move {
                axum::serve(listener, router).await.expect("serve");
            });

            let tmp = tempfile::TempDir::new().expect("tmp dir");
            let store = SessionStore::with_path(tmp.path().join("session.json"));
            store.set_token("T").unwrap();
            store
                .set_user(&UserProfile {
                    id: "u1".into(),
                    email: "a@b.com".into(),
                    created: String::new(),
                    updated: String::new(),
                })
                .unwrap();

            let app = App::with_store(&format!("http://{addr}"), store).expect("app");
            (app, counters, tmp)
        }

        #[tokio::test]
        async fn create_refetches_the_list_exactly_once() {
            let (app, counters, _tmp) = spawn_app().await;
            app.create(create_args("water plants")).await.unwrap();
            assert_eq!(counters.list_calls.load(Ordering::SeqCst), 1);
        }

        #[tokio::test]
        async fn edit_and_complete_each_refetch_exactly_once() {
            let (app, counters, _tmp) = spawn_app().await;
            let args = EditArgs {
                id: "r1".into(),
                title: Some("renamed".into()),
                description: None,
                at: None,
                repeat: None,
                status: None,
            };
            app.edit(args).await.unwrap();
            assert_eq!(counters.list_calls.load(Ordering::SeqCst), 1);

            app.complete("r1").await.unwrap();
            assert_eq!(counters.list_calls.load(Ordering::SeqCst), 2);
        }

        #[tokio::test]
        async fn delete_renders_from_the_local_list_without_refetching() {
            let (app, counters, _tmp) = spawn_app().await;
            app.delete("r1", true).await.unwrap();
            // One fetch to build the local list, none after the delete.
            assert_eq!(counters.list_calls.load(Ordering::SeqCst), 1);
        }

        #[tokio::test]
        async fn snooze_never_touches_the_list() {
            let (app, counters, _tmp) = spawn_app().await;
            app.snooze("r1", 300).await.unwrap();
            assert_eq!(counters.list_calls.load(Ordering::SeqCst), 0);
        }
    }
}
