// File: main.rs
// Location: /src/main.rs

use anyhow::Result;
use chrono::Local;
use clap::{Parser, Subcommand};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use wifi_qr::credential::Encryption;
use wifi_qr::export::{self, ExportFormat};
use wifi_qr::location::{PageUrl, DEFAULT_PAGE_URL};
use wifi_qr::render::{self, QrGraphic};
use wifi_qr::settings::AppSettings;
use wifi_qr::state::AppState;
use wifi_qr::store::{self, FileStore};

#[derive(Parser)]
#[command(name = "wifi-qr", about = "Generate WiFi QR codes", version)]
struct Cli {
    /// Page address; its query seeds the form and settings
    #[arg(long, global = true, default_value = DEFAULT_PAGE_URL)]
    url: String,

    /// Directory holding appSettings.json and qrHistory.json
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Option<Cmd>,
}

#[derive(Subcommand)]
enum Cmd {
    /// Encode the form into a QR code and add it to the history
    Generate {
        #[arg(long)]
        ssid: Option<String>,
        #[arg(long)]
        password: Option<String>,
        /// WPA, WEP or nopass
        #[arg(long)]
        encryption: Option<Encryption>,
        /// Hidden network flag; `--hidden` alone means true, `--hidden false` clears it
        #[arg(long, num_args = 0..=1, default_missing_value = "true")]
        hidden: Option<bool>,
        /// Formats to export after generating (svg, png, docx, pdf)
        #[arg(long, value_delimiter = ',')]
        export: Vec<ExportFormat>,
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Print the form, the current code and the history
    Show,
    #[command(subcommand)]
    History(HistoryCmd),
    #[command(subcommand)]
    Settings(SettingsCmd),
    /// Print the page address mirroring the current state
    Url,
}

#[derive(Subcommand)]
enum HistoryCmd {
    List,
    /// Restore an entry into the form and display its stored code
    Load {
        id: i64,
        #[arg(long, value_delimiter = ',')]
        export: Vec<ExportFormat>,
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
}

#[derive(Subcommand)]
enum SettingsCmd {
    Show,
    /// Assign settings using URL parameter names, e.g. downloadPDF=false
    Set {
        #[arg(required = true)]
        assignments: Vec<String>,
    },
    Reset,
}

fn setup_logging() {
    let log_dir = std::env::var("HOME")
        .map(|home| PathBuf::from(home).join(".local/share/wifi-qr"))
        .unwrap_or_else(|_| PathBuf::from("/tmp"));

    let _ = std::fs::create_dir_all(&log_dir);
    let log_file_path = log_dir.join("wifi-qr.log");

    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] [{}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.args()
            )
        })
        .try_init()
        .ok();

    if let Ok(mut file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file_path)
    {
        let now = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let args: Vec<String> = std::env::args().skip(1).collect();
        let _ = writeln!(file, "[{}] [INFO] ========== wifi-qr {} ==========", now, args.join(" "));
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging();
    let cli = Cli::parse();

    let store = FileStore::new(cli.store.clone().unwrap_or_else(store::default_store_dir));
    let mut url = PageUrl::parse(&cli.url)?;
    let mut state = AppState::startup(&store, &mut url);
    log::debug!("Using store at {}", store.dir().display());

    match cli.cmd {
        Some(Cmd::Generate {
            ssid,
            password,
            encryption,
            hidden,
            export,
            out,
        }) => {
            state
                .credential
                .apply_overrides(ssid, password, encryption, hidden);
            state.sync(&store, &mut url)?;

            let now_ms = chrono::Utc::now().timestamp_millis();
            let entry = state.generate(&store, now_ms)?;
            println!("{}", entry.qr_value);
            println!("History id: {}", entry.id);

            display_code(&state);
            run_exports(&state, &export, &out).await?;
        }
        Some(Cmd::Show) | None => {
            show(&state);
        }
        Some(Cmd::History(HistoryCmd::List)) => {
            print_history(&state);
        }
        Some(Cmd::History(HistoryCmd::Load { id, export, out })) => {
            let entry = state.load_history(id)?;
            println!("{}", entry.qr_value);
            state.sync(&store, &mut url)?;

            display_code(&state);
            run_exports(&state, &export, &out).await?;
        }
        Some(Cmd::Settings(SettingsCmd::Show)) => {
            println!("{}", serde_json::to_string_pretty(&state.settings)?);
        }
        Some(Cmd::Settings(SettingsCmd::Set { assignments })) => {
            let mut updated = state.settings.clone();
            for assignment in &assignments {
                let (name, value) = assignment
                    .split_once('=')
                    .ok_or_else(|| anyhow::anyhow!("Expected NAME=VALUE, got {:?}", assignment))?;
                updated.set_field(name.trim(), value.trim())?;
            }
            state.settings = updated;
            state.sync(&store, &mut url)?;
            println!("{}", serde_json::to_string_pretty(&state.settings)?);
        }
        Some(Cmd::Settings(SettingsCmd::Reset)) => {
            state.settings = AppSettings::default();
            state.sync(&store, &mut url)?;
            println!("Settings reset to defaults");
        }
        Some(Cmd::Url) => {
            state.sync(&store, &mut url)?;
        }
    }

    println!("{}", url.as_str());
    Ok(())
}

fn show(state: &AppState) {
    if state.settings.display_generator {
        let cred = &state.credential;
        println!("Network name : {}", cred.ssid);
        println!("Password     : {}", if cred.password.is_empty() { "" } else { "********" });
        println!("Encryption   : {}", cred.encryption.display_name());
        println!("Hidden       : {}", cred.is_hidden);
        if !cred.is_complete() {
            println!("(network name and password are required to generate)");
        }
    }
    display_code(state);
    print_history(state);
}

fn display_code(state: &AppState) {
    let Some(value) = &state.qr_value else {
        return;
    };
    match render::terminal_art(value) {
        Ok(art) => println!("{}", art),
        Err(e) => log::warn!("Cannot display QR code: {}", e),
    }
}

fn print_history(state: &AppState) {
    if !state.settings.display_history || state.history.is_empty() {
        return;
    }
    println!("Previously generated:");
    for entry in state.history.entries() {
        let when = chrono::DateTime::<chrono::Utc>::from_timestamp_millis(entry.id)
            .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        println!("  {:>14}  {}  {:<24} {}", entry.id, when, entry.ssid, entry.encryption);
    }
}

async fn run_exports(state: &AppState, formats: &[ExportFormat], out: &Path) -> Result<()> {
    if formats.is_empty() {
        return Ok(());
    }
    let Some(value) = &state.qr_value else {
        anyhow::bail!("No QR code to export");
    };
    state.credential.validate()?;

    let graphic = QrGraphic::render(value)?;
    let mut failed = 0;
    for format in formats {
        if !format.is_enabled(&state.settings.download_buttons) {
            log::warn!("{} download is disabled in settings", format);
            failed += 1;
            continue;
        }
        match export::write_export(*format, &graphic, &state.credential, state.settings.language, out).await {
            Ok(path) => println!("Saved {}", path.display()),
            Err(_) => failed += 1,
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} exports failed", failed, formats.len());
    }
    Ok(())
}
