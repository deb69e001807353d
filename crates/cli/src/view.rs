//! Terminal rendering for reminder lists and details.

use chrono::{DateTime, Local, Utc};
use remiaq_client::filter::{completed, upcoming, ListFilter};
use remiaq_client::types::{CalendarType, Reminder, ReminderStatus};

/// Render the partitioned list: upcoming reminders within the filter
/// horizon, then completed ones in their own section.
pub fn render_list(reminders: &[Reminder], filter: ListFilter, now: DateTime<Utc>) {
    let up = upcoming(reminders, filter, now);
    let done = completed(reminders);

    println!("\x1b[1mUpcoming ({})\x1b[0m", up.len());
    if up.is_empty() {
        println!("  \x1b[90m(no reminders)\x1b[0m");
    }
    for r in &up {
        println!("{}", format_line(r, now));
    }

    if !done.is_empty() {
        println!();
        println!("\x1b[1mCompleted ({})\x1b[0m", done.len());
        for r in &done {
            println!("{}", format_line(r, now));
        }
    }
}

pub fn render_detail(r: &Reminder, now: DateTime<Utc>) {
    println!("\x1b[1m{}\x1b[0m  \x1b[90m[{}]\x1b[0m", r.title, r.id);
    if let Some(desc) = &r.description {
        if !desc.is_empty() {
            println!("  {desc}");
        }
    }
    println!("  Due:      {}", format_trigger(r.next_trigger_at, now));
    println!("  Status:   {}", status_label(r.status));
    if let Some(pattern) = &r.recurrence_pattern {
        println!("  Repeats:  {pattern}");
    }
    if r.calendar_type == CalendarType::Lunar {
        println!("  Calendar: lunar");
    }
    if let Some(until) = r.snooze_until {
        println!("  Snoozed:  until {}", format_trigger(until, now));
    }
    if let Some(interval) = r.retry_interval_sec {
        println!(
            "  Retry:    every {}s, max {}",
            interval,
            r.max_retries.unwrap_or(0)
        );
    }
}

fn format_line(r: &Reminder, now: DateTime<Utc>) -> String {
    let marker = if r.is_completed() {
        "\x1b[32m✓\x1b[0m"
    } else {
        " "
    };
    let mut badges = String::new();
    if let Some(pattern) = &r.recurrence_pattern {
        badges.push_str(&format!("  \x1b[36m[{pattern}]\x1b[0m"));
    }
    if r.calendar_type == CalendarType::Lunar {
        badges.push_str("  \x1b[35m[lunar]\x1b[0m");
    }
    if r.status == ReminderStatus::Paused {
        badges.push_str("  \x1b[33m[paused]\x1b[0m");
    }
    format!(
        "{marker} \x1b[90m{}\x1b[0m  {}  {}{badges}",
        r.id,
        format_trigger(r.next_trigger_at, now),
        r.title
    )
}

fn status_label(status: ReminderStatus) -> &'static str {
    match status {
        ReminderStatus::Active => "active",
        ReminderStatus::Paused => "paused",
        ReminderStatus::Completed => "completed",
    }
}

/// Relative rendering of a trigger instant, local time of day.
pub fn format_trigger(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (at - now).num_seconds();
    let days = secs.div_euclid(86_400);
    let local = at.with_timezone(&Local);
    let time = local.format("%H:%M");

    if days == 0 && secs > 0 {
        format!("today {time}")
    } else if days == 1 {
        format!("tomorrow {time}")
    } else if days > 1 && days < 7 {
        format!("in {days} days - {time}")
    } else {
        local.format("%d/%m/%Y %H:%M").to_string()
    }
}
