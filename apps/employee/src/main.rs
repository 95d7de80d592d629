use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use client_core::{
    filters::{filter_items, Searchable},
    forms::{
        encode_upload, CheckLocation, Coordinates, DocumentDraft, PasswordChange, ReportRange,
        RequestDraft, ReviewDraft, WorkReportDraft, WorkdayMood,
    },
    status_board::{StatusBoard, StatusChange},
    Credentials, EmployeeClient, SessionManager, SessionState,
};
use serde::Serialize;
use shared::domain::{AttendanceId, UserId};
use storage::{keys, Storage};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

mod config;

#[derive(Parser, Debug)]
#[command(name = "employee", about = "Employee portal from the command line")]
struct Cli {
    #[arg(long, env = "EMPLOYEE_CONFIG", default_value = "employee.toml")]
    config: PathBuf,
    /// Overrides the configured API base url.
    #[arg(long)]
    api_url: Option<String>,
    #[arg(long)]
    database_url: Option<String>,
    #[arg(long)]
    log_level: Option<String>,
    /// Print records as JSON instead of one line each.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in with mobile number and password.
    Login {
        mobile: String,
        #[arg(long)]
        password: String,
    },
    #[command(subcommand)]
    Otp(OtpCommand),
    Logout,
    /// Check the cached session against the server.
    Whoami,
    Profile,
    ChangePassword {
        #[arg(long)]
        old: String,
        #[arg(long)]
        new: String,
    },
    ProfilePic {
        image: PathBuf,
    },
    Announcements {
        #[arg(long)]
        search: Option<String>,
    },
    Holidays {
        #[arg(long)]
        search: Option<String>,
    },
    #[command(subcommand)]
    Attendance(AttendanceCommand),
    CheckIn {
        #[command(flatten)]
        place: Place,
    },
    CheckOut {
        attendance_id: i64,
        #[command(flatten)]
        place: Place,
        /// 1 (exhausting) to 5 (great).
        #[arg(long, default_value_t = 5)]
        mood: u8,
    },
    #[command(subcommand)]
    Work(WorkCommand),
    #[command(subcommand)]
    Documents(DocumentCommand),
    #[command(subcommand)]
    Reviews(ReviewCommand),
    Team {
        #[arg(long)]
        search: Option<String>,
    },
    #[command(subcommand)]
    Requests(RequestCommand),
    #[command(subcommand)]
    Status(StatusCommand),
}

#[derive(Subcommand, Debug)]
enum OtpCommand {
    Request { mobile: String },
    Verify { otp: String },
}

#[derive(Subcommand, Debug)]
enum AttendanceCommand {
    Month,
    Report { start: NaiveDate, end: NaiveDate },
    Log { attendance_id: i64 },
}

#[derive(clap::Args, Debug)]
struct Place {
    #[arg(long, allow_negative_numbers = true)]
    lat: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    long: Option<f64>,
    #[arg(long)]
    address: Option<String>,
}

impl Place {
    fn into_location(self) -> Result<CheckLocation, client_core::ClientError> {
        let coordinates = match (self.lat, self.long) {
            (Some(latitude), Some(longitude)) => Some(Coordinates {
                latitude,
                longitude,
            }),
            _ => None,
        };
        CheckLocation::new(coordinates, self.address.as_deref())
    }
}

#[derive(Subcommand, Debug)]
enum WorkCommand {
    List {
        #[arg(long)]
        search: Option<String>,
    },
    Add {
        date: NaiveDate,
        description: String,
    },
}

#[derive(Subcommand, Debug)]
enum DocumentCommand {
    List {
        #[arg(long)]
        search: Option<String>,
    },
    Types,
    Add {
        #[arg(long = "type")]
        document_type: String,
        #[arg(long)]
        number: String,
        file: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
enum ReviewCommand {
    Received {
        #[arg(long)]
        search: Option<String>,
    },
    Posted {
        #[arg(long)]
        search: Option<String>,
    },
    Add {
        member: i64,
        rating: u8,
        remark: String,
    },
}

#[derive(Subcommand, Debug)]
enum RequestCommand {
    List {
        #[arg(long)]
        search: Option<String>,
    },
    Types,
    Add {
        date: NaiveDate,
        #[arg(long = "type")]
        request_type: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
    },
}

#[derive(Subcommand, Debug)]
enum StatusCommand {
    Today,
    History,
    /// Start a break, or end the current one.
    Break,
    /// Enter a meeting, or leave the current one.
    Meeting,
    Custom { text: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let (mut settings, config_warnings) = config::load_settings(&cli.config);
    if let Some(v) = cli.api_url.clone() {
        settings.api_base_url = v;
    }
    if let Some(v) = cli.database_url.clone() {
        settings.database_url = v;
    }
    if let Some(v) = cli.log_level.clone() {
        settings.log_level = v;
    }

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    for warning in &config_warnings {
        warn!("{warning}");
    }

    let database_url = config::prepare_database_url(&settings.database_url);
    let storage = Storage::new(&database_url)
        .await
        .with_context(|| format!("failed to open credential cache '{database_url}'"))?;
    let client = EmployeeClient::with_timeout(
        &settings.api_base_url,
        Duration::from_secs(settings.request_timeout_secs),
    )?;
    debug!(api = %client.base_url(), "client ready");
    let manager = SessionManager::new(client, Arc::new(storage.clone()));

    let app = App {
        manager,
        storage,
        json: cli.json,
    };
    app.run(cli.command).await
}

struct App {
    manager: SessionManager,
    storage: Storage,
    json: bool,
}

impl App {
    async fn run(&self, command: Command) -> Result<()> {
        match command {
            Command::Login { mobile, password } => {
                let credentials = self.manager.login_with_password(&mobile, &password).await?;
                print_signed_in(&credentials);
            }
            Command::Otp(OtpCommand::Request { mobile }) => {
                let mobile = self.manager.request_otp(&mobile).await?;
                println!("OTP sent to {mobile}. Run `employee otp verify <otp>` next.");
            }
            Command::Otp(OtpCommand::Verify { otp }) => {
                let credentials = self.manager.login_with_otp(&otp).await?;
                print_signed_in(&credentials);
            }
            Command::Logout => {
                let credentials = self.manager.cached().await?;
                self.manager.logout(&credentials).await?;
                println!("Logged out.");
            }
            Command::Whoami => match self.manager.bootstrap().await {
                SessionState::Authenticated(credentials) => print_signed_in(&credentials),
                SessionState::RedirectToLogin(reason) => {
                    println!("Not signed in ({reason}). Run `employee login` first.");
                }
            },
            command => {
                let credentials = self.signed_in().await?;
                self.run_signed_in(&credentials, command).await?;
            }
        }
        Ok(())
    }

    async fn signed_in(&self) -> Result<Credentials> {
        match self.manager.bootstrap().await {
            SessionState::Authenticated(credentials) => Ok(credentials),
            SessionState::RedirectToLogin(reason) => {
                info!("redirecting to login: {reason}");
                bail!("Not signed in ({reason}). Run `employee login` first.")
            }
        }
    }

    async fn run_signed_in(&self, credentials: &Credentials, command: Command) -> Result<()> {
        let client = self.manager.client();
        match command {
            Command::Profile => {
                let profile = client.user_profile(credentials).await?;
                if self.json {
                    println!("{}", serde_json::to_string_pretty(&profile)?);
                } else {
                    println!("{} <{}>", profile.u_name, profile.u_email);
                    println!("  mobile:      {}", profile.u_mobile);
                    println!("  designation: {}", profile.u_designation);
                    println!("  workstation: {}", profile.u_work_station);
                    println!("  joined:      {}", profile.u_doj);
                }
            }
            Command::ChangePassword { old, new } => {
                let change = PasswordChange::new(&old, &new)?;
                println!("{}", client.change_password(credentials, change).await?);
            }
            Command::ProfilePic { image } => {
                let bytes = std::fs::read(&image)
                    .with_context(|| format!("failed to read '{}'", image.display()))?;
                let message = client
                    .update_profile_pic(credentials, encode_upload(&bytes))
                    .await?;
                println!("{message}");
            }
            Command::Announcements { search } => {
                let rows = client.announcements(credentials).await?;
                self.print_rows(&rows, search.as_deref(), |a| {
                    format!("{}  {}  {}", a.a_date, a.a_title, a.a_desc)
                })?;
            }
            Command::Holidays { search } => {
                let rows = client.holidays(credentials).await?;
                self.print_rows(&rows, search.as_deref(), |h| {
                    format!("{}  {} ({})", h.h_date, h.h_name, h.h_type)
                })?;
            }
            Command::Attendance(command) => self.attendance(credentials, command).await?,
            Command::CheckIn { place } => {
                let location = place.into_location()?;
                println!("{}", client.check_in(credentials, location).await?);
            }
            Command::CheckOut {
                attendance_id,
                place,
                mood,
            } => {
                let location = place.into_location()?;
                let mood = WorkdayMood::from_index(mood)?;
                let message = client
                    .check_out(credentials, AttendanceId(attendance_id), location, mood)
                    .await?;
                println!("{message} (day rated {})", mood.label());
            }
            Command::Work(WorkCommand::List { search }) => {
                let rows = client.work_reports(credentials).await?;
                self.print_rows(&rows, search.as_deref(), |w| {
                    format!("{}  {}", w.w_date, w.w_desc)
                })?;
            }
            Command::Work(WorkCommand::Add { date, description }) => {
                let report = WorkReportDraft {
                    date: Some(date),
                    description,
                }
                .validate()?;
                client.add_work_report(credentials, report).await?;
                println!("Work report added.");
            }
            Command::Documents(command) => self.documents(credentials, command).await?,
            Command::Reviews(command) => self.reviews(credentials, command).await?,
            Command::Team { search } => {
                let rows = client.team(credentials).await?;
                self.print_rows(&rows, search.as_deref(), |m| {
                    format!(
                        "#{}  {}  {}  {}  avg rating {}",
                        m.u_id, m.u_name, m.u_designation, m.u_mobile, m.rating.total_avg_rating
                    )
                })?;
            }
            Command::Requests(command) => self.requests(credentials, command).await?,
            Command::Status(command) => self.status(credentials, command).await?,
            other => bail!("{other:?} does not run with a session"),
        }
        Ok(())
    }

    async fn attendance(&self, credentials: &Credentials, command: AttendanceCommand) -> Result<()> {
        let client = self.manager.client();
        let rows = match command {
            AttendanceCommand::Month => client.current_month_attendance(credentials).await?,
            AttendanceCommand::Report { start, end } => {
                let range = ReportRange::new(start, end)?;
                client.attendance_report(credentials, range).await?
            }
            AttendanceCommand::Log { attendance_id } => {
                let logs = client
                    .attendance_log(credentials, AttendanceId(attendance_id))
                    .await?;
                return self.print_all(&logs, |l| {
                    format!("{}  {}  {}", l.log_time, l.log_type, l.log_location)
                });
            }
        };
        self.print_all(&rows, |a| {
            let checkout = if a.is_checked_out() {
                a.checkout_time.as_str()
            } else {
                "--:--"
            };
            format!("#{}  {}  in {}  out {}", a.id, a.checkin_date, a.checkin_time, checkout)
        })
    }

    async fn documents(&self, credentials: &Credentials, command: DocumentCommand) -> Result<()> {
        let client = self.manager.client();
        match command {
            DocumentCommand::List { search } => {
                let rows = client.documents(credentials).await?;
                self.print_rows(&rows, search.as_deref(), |d| {
                    format!("{}  {}  {}", d.doc_type, d.doc_number, d.created_at)
                })?;
            }
            DocumentCommand::Types => {
                let rows = client.document_types(credentials).await?;
                self.print_all(&rows, |t| t.name.clone())?;
            }
            DocumentCommand::Add {
                document_type,
                number,
                file,
            } => {
                let bytes = std::fs::read(&file)
                    .with_context(|| format!("failed to read '{}'", file.display()))?;
                let document =
                    DocumentDraft::with_file_bytes(document_type, number, &bytes).validate()?;
                client.add_document(credentials, document).await?;
                println!("Document uploaded.");
            }
        }
        Ok(())
    }

    async fn reviews(&self, credentials: &Credentials, command: ReviewCommand) -> Result<()> {
        let client = self.manager.client();
        match command {
            ReviewCommand::Received { search } => {
                let rows = client.reviews(credentials).await?;
                self.print_rows(&rows, search.as_deref(), |r| {
                    format!("{}/5 from {}: {}", r.rating, r.posted_by, r.review)
                })?;
            }
            ReviewCommand::Posted { search } => {
                let rows = client.posted_reviews(credentials).await?;
                self.print_rows(&rows, search.as_deref(), |r| {
                    format!("{}/5 for {}: {}", r.rating, r.u_name, r.review)
                })?;
            }
            ReviewCommand::Add {
                member,
                rating,
                remark,
            } => {
                let review = ReviewDraft {
                    member: Some(UserId(member)),
                    rating,
                    remark,
                }
                .validate()?;
                client.add_review(credentials, review).await?;
                println!("Review submitted.");
            }
        }
        Ok(())
    }

    async fn requests(&self, credentials: &Credentials, command: RequestCommand) -> Result<()> {
        let client = self.manager.client();
        match command {
            RequestCommand::List { search } => {
                let rows = client.requests(credentials).await?;
                self.print_rows(&rows, search.as_deref(), |r| {
                    format!("{}  [{}]  {}  {}", r.r_date, r.r_type, r.r_title, r.r_action)
                })?;
            }
            RequestCommand::Types => {
                let rows = client.request_types(credentials).await?;
                self.print_all(&rows, |t| t.kind.clone())?;
            }
            RequestCommand::Add {
                date,
                request_type,
                title,
                description,
            } => {
                let request = RequestDraft {
                    date: Some(date),
                    request_type,
                    title,
                    description,
                }
                .validate()?;
                client.add_request(credentials, request).await?;
                println!("Request submitted.");
            }
        }
        Ok(())
    }

    async fn status(&self, credentials: &Credentials, command: StatusCommand) -> Result<()> {
        let client = self.manager.client();
        match command {
            StatusCommand::Today => {
                let today = client.today_status(credentials).await?;
                if self.json {
                    println!("{}", serde_json::to_string_pretty(&today)?);
                } else {
                    println!("checked in:  {}", or_dash(&today.checkin_time));
                    println!("checked out: {}", or_dash(&today.checkout_time));
                    println!("status:      {}", or_dash(&today.working_status));
                }
            }
            StatusCommand::History => {
                let rows = client.status_list(credentials).await?;
                self.print_all(&rows, |s| format!("{} {}  {}", s.s_date, s.s_time, s.s_msg))?;
            }
            StatusCommand::Break => {
                let board = self.board(credentials).await?;
                self.submit(credentials, board.clone(), board.take_break()).await?;
            }
            StatusCommand::Meeting => {
                let board = self.board(credentials).await?;
                self.submit(credentials, board.clone(), board.toggle_meeting()).await?;
            }
            StatusCommand::Custom { text } => {
                let board = self.board(credentials).await?;
                let change = board.custom(&text)?;
                self.submit(credentials, board, change).await?;
            }
        }
        Ok(())
    }

    async fn board(&self, credentials: &Credentials) -> Result<StatusBoard> {
        let today = self.manager.client().today_status(credentials).await?;
        let previous = self
            .storage
            .get_item(keys::PREVIOUS_WORKING_STATUS)
            .await?
            .unwrap_or_default();
        Ok(StatusBoard::from_server(&today.working_status, &today.break_status)
            .with_previous(&previous))
    }

    async fn submit(
        &self,
        credentials: &Credentials,
        mut board: StatusBoard,
        change: StatusChange,
    ) -> Result<()> {
        self.manager
            .client()
            .add_working_status(credentials, &change)
            .await?;
        board.apply(change);
        self.storage
            .set_item(keys::PREVIOUS_WORKING_STATUS, board.previous_working_status())
            .await?;
        println!("Status: {}", board.working_status());
        Ok(())
    }

    fn print_rows<T, F>(&self, rows: &[T], search: Option<&str>, line: F) -> Result<()>
    where
        T: Searchable + Serialize,
        F: Fn(&T) -> String,
    {
        let hits = filter_items(rows, search.unwrap_or_default());
        self.print(&hits, |row| line(row))
    }

    fn print_all<T, F>(&self, rows: &[T], line: F) -> Result<()>
    where
        T: Serialize,
        F: Fn(&T) -> String,
    {
        let all: Vec<&T> = rows.iter().collect();
        self.print(&all, |row| line(row))
    }

    fn print<T: Serialize>(&self, rows: &[&T], line: impl Fn(&T) -> String) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(rows)?);
            return Ok(());
        }
        if rows.is_empty() {
            println!("No records found.");
        }
        for row in rows {
            println!("{}", line(row));
        }
        Ok(())
    }
}

fn print_signed_in(credentials: &Credentials) {
    let user = credentials.user();
    let company = user.cname.as_deref().unwrap_or("no company");
    println!("Signed in as {} ({}, {company})", user.name, user.mobile);
}

fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() {
        "-"
    } else {
        value
    }
}
