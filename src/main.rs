use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use checkouts::engine::SortColumn;
use checkouts::model::{find_server, parse_day, Checkout, SERVERS};
use checkouts::service::InMemoryReservationService;
use checkouts::session::{BrowsingSession, Notification};

const HELP: &str = "commands: list | servers | server <code> | filter <text> | \
                    sort <column> | show <id> | delete <id> | quit";

fn print_rows(session: &BrowsingSession) {
    for c in session.visible() {
        let status = if session.is_checked_out(c) { "checked out" } else { "available" };
        let dates = if c.permanent {
            "permanent".to_string()
        } else {
            format!(
                "{} - {}",
                c.start_date.as_deref().unwrap_or(""),
                c.end_date.as_deref().unwrap_or("")
            )
        };
        let owner = c
            .primary_owner()
            .map(|o| format!("{} {}", o.first_name, o.last_name))
            .unwrap_or_default();
        println!(
            "{:>4}  {:<5} {:<24} {:<12} {:<10} {:<8} {}",
            c.id, c.client_code, dates, status, c.jira, c.hd_event, owner
        );
    }
    println!("({} of {} shown)", session.visible().len(), session.checkouts().len());
}

fn print_detail(session: &BrowsingSession, c: &Checkout) {
    match serde_json::to_string_pretty(c) {
        Ok(json) => println!("{json}"),
        Err(e) => println!("checkout {}: {e}", c.id),
    }
    let others: Vec<String> = session
        .sub_owners(c)
        .iter()
        .map(|o| format!("{} {} <{}>", o.first_name, o.last_name, o.email))
        .collect();
    if !others.is_empty() {
        println!("other contacts: {}", others.join(", "));
    }
}

fn print_notifications(notes: Vec<Notification>) {
    for n in notes {
        println!("[{:?}] {}: {}", n.severity, n.summary, n.detail);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let metrics_port: Option<u16> = std::env::var("CHECKOUTS_METRICS_PORT")
        .ok()
        .and_then(|s| s.parse().ok());
    checkouts::observability::init(metrics_port);

    let today = std::env::var("CHECKOUTS_TODAY")
        .ok()
        .and_then(|s| parse_day(&s))
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let seed = std::env::var("CHECKOUTS_SEED").unwrap_or_else(|_| "demo".into());

    let service = match seed.as_str() {
        "empty" => InMemoryReservationService::new(),
        _ => InMemoryReservationService::seeded(),
    };
    info!("checkouts console");
    info!("  today: {today}");
    info!("  seed: {seed} ({} checkouts)", service.len());
    info!(
        "  metrics: {}",
        metrics_port.map_or("disabled".to_string(), |p| format!("http://0.0.0.0:{p}/metrics"))
    );

    let mut session = BrowsingSession::new(Arc::new(service), today);
    session.load_all().await?;
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let (cmd, arg) = line.split_once(' ').map_or((line, ""), |(c, a)| (c, a.trim()));
        match cmd {
            "" => continue,
            "quit" | "exit" => break,
            "list" => {
                if session.load_all().await.is_ok() {
                    print_rows(&session);
                }
            }
            "servers" => {
                for s in SERVERS {
                    println!("{:<5} {}", s.code, s.name);
                }
            }
            "server" => match find_server(arg) {
                Some(s) => {
                    if session.select_server(s.code).await.is_ok() {
                        println!("{}", s.name);
                        print_rows(&session);
                    }
                }
                None => println!("unknown server: {arg}"),
            },
            "filter" => {
                session.set_filter(arg);
                print_rows(&session);
            }
            "sort" => match arg.parse::<SortColumn>() {
                Ok(column) => {
                    let direction = session.sort(column);
                    println!("sorted by {} ({direction:?})", column.label());
                    print_rows(&session);
                }
                Err(e) => println!("{e}"),
            },
            "show" => {
                if session.open(arg).await.is_ok() {
                    if let Some(form) = session.editor() {
                        print_detail(&session, form.checkout());
                    }
                    session.cancel();
                }
            }
            "delete" => {
                if session.open(arg).await.is_ok() {
                    match session.request_delete() {
                        Ok(confirmation) => {
                            println!("{}", confirmation.message());
                            if let Err(e) = session.confirm(confirmation).await {
                                println!("{e}");
                            }
                        }
                        Err(e) => println!("{e}"),
                    }
                    session.cancel();
                }
            }
            _ => println!("{HELP}"),
        }
        print_notifications(session.take_notifications());
    }

    info!("checkouts console stopped");
    Ok(())
}
