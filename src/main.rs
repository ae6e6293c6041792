use clap::Parser;
use period_tracker::config::{CliConfig, Command, OutputFormat};
use period_tracker::core::calendar::render_month;
use period_tracker::core::cycle_log::{format_estimate_label, parse_date_key};
use period_tracker::core::lifetime::ScreenLifetime;
use period_tracker::core::qa::COMMON_QA;
use period_tracker::domain::model::{ClinicRecord, MoodTag};
use period_tracker::domain::ports::ChatProvider;
use period_tracker::utils::logger;
use period_tracker::utils::validation::Validate;
use period_tracker::{
    adapters::{GeoapifyClient, OpenRouterClient},
    ClinicFeed, CycleLog, MonthCursor, TrackerConfig, TrackerError,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    let mut config = match TrackerConfig::load_or_default(cli.config.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    if let Err(e) = run(cli.command, &mut config).await {
        tracing::error!("❌ Command failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(2);
    }

    Ok(())
}

async fn run(command: Command, config: &mut TrackerConfig) -> period_tracker::Result<()> {
    match command {
        Command::Estimate { dates, offset_days } => {
            if let Some(days) = offset_days {
                config.cycle.offset_days = days;
            }
            config.validate()?;

            let log = log_from_dates(&dates)?;
            let estimate = log.estimate_next_date(config.cycle.offset_days);
            println!("{}", format_estimate_label(estimate));
        }
        Command::Calendar {
            year,
            month,
            entries,
        } => {
            let today = chrono::Local::now().date_naive();
            let current = MonthCursor::containing(today);
            let cursor = MonthCursor::new(year.unwrap_or(current.year()), month.unwrap_or(current.month()))
                .ok_or_else(|| TrackerError::Input {
                    field: "month".to_string(),
                    value: format!("{:?}", month),
                    reason: "month must be between 1 and 12".to_string(),
                })?;

            let log = log_from_entries(&entries)?;
            print!("{}", render_month(cursor, &log, today));
            println!("{}", format_estimate_label(log.estimate_next_date(config.cycle.offset_days)));
        }
        Command::Clinics {
            lat,
            lon,
            radius_meters,
            format,
        } => {
            if let Some(lat) = lat {
                config.places.latitude = lat;
            }
            if let Some(lon) = lon {
                config.places.longitude = lon;
            }
            if let Some(radius) = radius_meters {
                config.places.radius_meters = radius;
            }
            config.validate()?;

            let provider = Arc::new(GeoapifyClient::new(&config.places)?);
            let feed = ClinicFeed::spawn(provider, config.places.query(), config.feed.poll_interval());
            let screen = ScreenLifetime::new();
            let clinics = feed.load_clinics(&mut screen.signal()).await;

            print_clinics(&clinics, format)?;
        }
        Command::Ask { question } => {
            config.validate()?;
            let question = question.join(" ");
            if question.trim().is_empty() {
                println!("{}", period_tracker::core::qa::EMPTY_QUESTION_PROMPT);
                return Ok(());
            }

            let client = OpenRouterClient::new(&config.chat)?;
            println!("{}", period_tracker::core::qa::THINKING_PLACEHOLDER);
            match client.complete(question.trim()).await {
                Ok(reply) => println!("{}", reply),
                Err(e) => println!("{}", period_tracker::core::qa::format_error_answer(&e.to_string())),
            }
        }
        Command::Faq => {
            for (question, answer) in COMMON_QA {
                println!("❓ {}\n   {}\n", question, answer);
            }
        }
    }

    Ok(())
}

fn log_from_dates(dates: &[String]) -> period_tracker::Result<CycleLog> {
    let mut log = CycleLog::new();
    for raw in dates {
        let date = parse_date_key(raw)?;
        if log.get(date).is_none() {
            log.toggle_entry(date, || Some(MoodTag::Good));
        }
    }
    Ok(log)
}

/// DATE=MOOD，沒有給心情時使用 ":)"
fn log_from_entries(entries: &[String]) -> period_tracker::Result<CycleLog> {
    let mut log = CycleLog::new();
    for raw in entries {
        let (date, mood) = match raw.split_once('=') {
            Some((date, mood)) => (parse_date_key(date)?, mood.parse::<MoodTag>()?),
            None => (parse_date_key(raw)?, MoodTag::Good),
        };
        if log.get(date).is_none() {
            log.toggle_entry(date, || Some(mood));
        }
    }
    Ok(log)
}

fn print_clinics(clinics: &[ClinicRecord], format: OutputFormat) -> period_tracker::Result<()> {
    match format {
        OutputFormat::Table => {
            if clinics.is_empty() {
                println!("No clinics found.");
            }
            for clinic in clinics {
                println!(
                    "🩺 {:<40} {:>10.5} {:>10.5}",
                    clinic.display_name, clinic.lat, clinic.lon
                );
            }
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(std::io::stdout());
            writer.write_record(["name", "lat", "lon", "categories"])?;
            for clinic in clinics {
                writer.write_record([
                    clinic.display_name.clone(),
                    clinic.lat.to_string(),
                    clinic.lon.to_string(),
                    clinic.categories.join(";"),
                ])?;
            }
            writer.flush()?;
        }
    }
    Ok(())
}
