use anyhow::Context;
use chrono::{Local, NaiveDate};
use tracing_subscriber::EnvFilter;

use slotbook::config::AppConfig;
use slotbook::models::{hhmm, Booking, BookingStatus};
use slotbook::services::BookingFilter;
use slotbook::state::AppState;

const USAGE: &str = "usage: slotbook <command>

commands:
  slots <YYYY-MM-DD>          available slots for a date
  list [status] [YYYY-MM-DD]  bookings, most recent first
  show <id>                   one booking in full
  stats                       booking counts
  complete <id>               mark a booking completed
  cancel <id>                 cancel a booking
  clear --yes                 delete every booking";

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::from_env()?;
    tracing::debug!(database = %config.database_url, key = %config.storage_key, "opening booking store");
    let state = AppState::open(config)?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    match args.as_slice() {
        ["slots", date] => {
            let date = parse_date(date)?;
            let slots = state.bookings.available_slots(Some(date))?;
            println!("Opening hours: {}", state.config.schedule.to_human_readable());
            if slots.is_empty() {
                println!("No slots left on {date}");
            }
            for slot in slots {
                println!("{}", hhmm::format(&slot));
            }
        }
        ["list", rest @ ..] => {
            let filter = parse_filter(rest)?;
            let bookings = state.bookings.query(&filter)?;
            if bookings.is_empty() {
                println!("No bookings found");
            }
            for booking in &bookings {
                print_row(booking);
            }
        }
        ["show", id] => {
            let booking = state.bookings.get(id)?;
            println!("{}", serde_json::to_string_pretty(&booking)?);
        }
        ["stats"] => {
            let stats = state.bookings.stats(Local::now().date_naive())?;
            println!(
                "total: {}  confirmed: {}  today: {}  completed: {}",
                stats.total, stats.confirmed, stats.today, stats.completed
            );
        }
        ["complete", id] => {
            let booking = state.bookings.update_status(id, BookingStatus::Completed)?;
            print_row(&booking);
        }
        ["cancel", id] => {
            let booking = state.bookings.update_status(id, BookingStatus::Cancelled)?;
            print_row(&booking);
        }
        ["clear", "--yes"] => {
            state.bookings.clear()?;
            println!("All bookings have been cleared.");
        }
        ["clear"] => {
            anyhow::bail!("refusing to delete every booking without --yes");
        }
        _ => {
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    }

    Ok(())
}

fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| format!("invalid date: {s}"))
}

fn parse_filter(args: &[&str]) -> anyhow::Result<BookingFilter> {
    let mut filter = BookingFilter::default();
    for arg in args {
        if let Some(status) = BookingStatus::parse(arg) {
            filter.status = Some(status);
        } else if *arg != "all" {
            filter.date = Some(parse_date(arg)?);
        }
    }
    Ok(filter)
}

fn print_row(b: &Booking) {
    println!(
        "{:<12} {} {}  {:<10} {:<20} {:<16} {}",
        b.id,
        b.date,
        hhmm::format(&b.time),
        b.status.as_str(),
        b.name,
        b.service,
        b.phone
    );
}
