//! Dino CLI
//!
//! Command-line front-end over the Dino client core:
//! - Sign in, register and inspect the session
//! - Browse classes, content, activities and notes
//! - Edit notes with debounced autosave
//! - Check route guard decisions

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::io::BufRead;
use std::path::PathBuf;

use dino::api::dto::NoteQuery;
use dino::api::ApiError;
use dino::config::{generate_default_config, Config};
use dino::filter::{ContentFilter, ContentStatus, NoteFilter};
use dino::format::{format_date, format_datetime, preview, relative_time, truncate, ProgressTier};
use dino::forms::{
    ActivityDraft, ClassForm, FeedbackForm, JoinClassForm, LoginForm, NoteForm,
    PasswordChangeForm, ProfileForm, QuestionField,
};
use dino::models::{ActivityKind, ContentKind, NoteKind, Question, UserType};
use dino::navigation::{Location, SettingsTab};
use dino::notify::{describe, Action};
use dino::registration::RegistrationWizard;
use dino::validation::FormErrors;
use dino::{logging, AppContext, GuardDecision};

#[derive(Parser)]
#[command(name = "dino")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Command-line client for the Dino learning platform")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API base URL (overrides the config file)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Config file (default: search the standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and store the session token
    Login {
        #[arg(short, long)]
        email: Option<String>,
        /// Read from stdin when omitted
        #[arg(short, long)]
        password: Option<String>,
        /// Login URL the user came from, e.g. "/login?returnUrl=%2Fnotes"
        #[arg(long, default_value = "/login")]
        from: String,
    },

    /// Create an account
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// aluno or professor
        #[arg(long, default_value = "aluno")]
        user_type: UserType,
        #[arg(long)]
        age: Option<u32>,
        #[arg(long, default_value = "")]
        institution: String,
        #[arg(long)]
        accept_privacy_policy: bool,
    },

    /// Forget the stored session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Dashboard counters
    Dashboard,

    /// Classes
    Classes {
        #[command(subcommand)]
        action: ClassCommand,
    },

    /// Study content
    Content {
        #[command(subcommand)]
        action: ContentCommand,
    },

    /// Class activities
    Activities {
        #[command(subcommand)]
        action: ActivityCommand,
    },

    /// Personal notes
    Notes {
        #[command(subcommand)]
        action: NoteCommand,
    },

    /// Notifications
    Notifications {
        #[command(subcommand)]
        action: NotificationCommand,
    },

    /// Progress overview
    Progress,

    /// Account settings
    Settings {
        #[command(subcommand)]
        action: SettingsCommand,
    },

    /// Send feedback to the platform team
    Feedback {
        #[arg(short, long)]
        subject: String,
        message: String,
    },

    /// User administration (admins only)
    Users {
        #[command(subcommand)]
        action: UserCommand,
    },

    /// Print the guard decision for an app path
    Route { path: String },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum ClassCommand {
    List,
    Show { id: i64 },
    Students { id: i64 },
    Create {
        name: String,
        #[arg(short, long)]
        description: String,
        #[arg(long, default_value = "50")]
        max_students: u32,
    },
    Delete { id: i64 },
    /// Join with an invite code
    Join { code: String },
    RegenerateCode { id: i64 },
    AddCollaborator { id: i64, email: String },
    RemoveCollaborator { id: i64, collaborator_id: i64 },
}

#[derive(Subcommand)]
pub enum ContentCommand {
    List {
        #[arg(long)]
        class: Option<i64>,
        #[arg(short, long, default_value = "")]
        search: String,
        #[arg(short, long)]
        kind: Option<ContentKind>,
        /// completed, in_progress or not_started
        #[arg(long)]
        status: Option<String>,
    },
    Show { id: i64 },
    Stats,
    Complete { id: i64 },
    /// Record reading position in a handout
    Page { id: i64, page: u32, total_pages: u32 },
    /// Record watched share of a video (0-100)
    Watched { id: i64, progress: f64 },
}

#[derive(Subcommand)]
pub enum ActivityCommand {
    List {
        #[arg(long)]
        class: Option<i64>,
    },
    Show { id: i64 },
    /// Create from a JSON file holding the question list
    Create {
        #[arg(long)]
        class: i64,
        title: String,
        #[arg(short, long)]
        description: String,
        #[arg(short, long, default_value = "quiz")]
        kind: ActivityKind,
        #[arg(long, default_value = "30")]
        minutes: u32,
        #[arg(long)]
        due: Option<String>,
        #[arg(long)]
        questions: PathBuf,
    },
    Delete { id: i64 },
}

#[derive(Subcommand)]
pub enum NoteCommand {
    List {
        #[arg(long)]
        class: Option<i64>,
        #[arg(long)]
        content: Option<i64>,
        #[arg(short, long, default_value = "")]
        search: String,
        #[arg(short, long)]
        kind: Option<NoteKind>,
    },
    Show { id: i64 },
    Create {
        title: String,
        /// Note body; read from stdin when omitted
        body: Option<String>,
        #[arg(short, long, default_value = "general")]
        kind: NoteKind,
        #[arg(long)]
        class: Option<i64>,
        #[arg(long)]
        content: Option<i64>,
    },
    Delete { id: i64 },
    /// Append stdin lines to a note, autosaving as you type
    Edit { id: i64 },
}

#[derive(Subcommand)]
pub enum NotificationCommand {
    List,
    Unread,
    Read { id: i64 },
    ReadAll,
    Delete { id: i64 },
}

#[derive(Subcommand)]
pub enum SettingsCommand {
    /// Update profile fields; omitted fields keep their current value
    Profile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        age: Option<u32>,
        #[arg(long)]
        institution: Option<String>,
    },
    /// Change the account password; prompts for missing values
    Password {
        #[arg(long)]
        current: Option<String>,
        #[arg(long)]
        new: Option<String>,
        #[arg(long)]
        confirm: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum UserCommand {
    List,
    Delete { id: i64 },
    SetType { id: i64, user_type: UserType },
}

impl Commands {
    fn action(&self) -> Action {
        match self {
            Commands::Login { .. } => Action::Login,
            Commands::Register { .. } => Action::Register,
            Commands::Classes {
                action: ClassCommand::Join { .. },
            } => Action::Other("join the class"),
            Commands::Notes { .. } => Action::Other("save the note"),
            Commands::Settings {
                action: SettingsCommand::Profile { .. },
            } => Action::Other("update the profile"),
            Commands::Settings {
                action: SettingsCommand::Password { .. },
            } => Action::Other("change the password"),
            _ => Action::Other("complete the request"),
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let action = cli.command.action();

    if let Err(err) = run(cli).await {
        if let Some(api) = err.downcast_ref::<ApiError>() {
            for message in describe(api, action) {
                eprintln!("Error: {}", message);
            }
        } else if let Some(form) = err.downcast_ref::<FormErrors>() {
            for (field, message) in form.iter() {
                eprintln!("{}: {}", field, message);
            }
        } else {
            eprintln!("Error: {:#}", err);
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }
    logging::init(&config.logging);

    if let Commands::Config { output } = &cli.command {
        let content = generate_default_config();
        match output {
            Some(path) => {
                std::fs::write(path, &content)
                    .with_context(|| format!("writing {}", path.display()))?;
                println!("Config written to {:?}", path);
            }
            None => print!("{}", content),
        }
        return Ok(());
    }

    let ctx = AppContext::bootstrap(config)?;
    let json = cli.format == "json";

    match cli.command {
        Commands::Login {
            email,
            password,
            from,
        } => {
            let email = match email {
                Some(e) => e,
                None => prompt("Email")?,
            };
            let password = match password {
                Some(p) => p,
                None => prompt("Password")?,
            };
            let request = LoginForm { email, password }.validate()?;
            let user = ctx.api.sign_in(&request.email, &request.password).await?;
            println!("Signed in as {} ({})", user.username, user.user_type.label());
            println!("Next: {}", ctx.guard.post_login_target(&from));
        }

        Commands::Register {
            username,
            email,
            password,
            user_type,
            age,
            institution,
            accept_privacy_policy,
        } => {
            let mut wizard = RegistrationWizard::new();
            wizard.username = username;
            wizard.email = email;
            wizard.confirm_password = password.clone();
            wizard.password = password;
            wizard.user_type = user_type;
            wizard.age = age;
            wizard.institution = institution;
            wizard.privacy_policy_accepted = accept_privacy_policy;

            let request = match wizard.submit() {
                Ok(request) => request,
                Err(errors) => {
                    let step = wizard.step();
                    eprintln!("Step {} ({}) is incomplete:", step.number(), step.title());
                    for (rule, ok) in wizard.checklist() {
                        if !ok && step.number() == 2 {
                            eprintln!("  [ ] {}", rule.label());
                        }
                    }
                    return Err(errors.into());
                }
            };

            let user = ctx.api.sign_up(&request).await?;
            println!("Welcome, {}!", user.username);
            println!("Next: {}", ctx.guard.post_register_target());
        }

        Commands::Logout => {
            ctx.session.logout().await?;
            println!("Signed out");
        }

        Commands::Whoami => {
            let state = ctx.initialize().await;
            match state.user {
                Some(user) if json => println!("{}", serde_json::to_string_pretty(&user)?),
                Some(user) => {
                    println!("{} <{}>", user.username, user.email);
                    println!("  Role: {}", user.user_type.label());
                    if let Some(institution) = &user.institution {
                        println!("  Institution: {}", institution);
                    }
                    println!("  Member since: {}", format_date(user.created_at.as_deref()));
                }
                None if state.is_authenticated => {
                    println!("Signed in (profile unavailable, token trusted)");
                }
                None => println!("Not signed in"),
            }
        }

        Commands::Dashboard => {
            let user = require_user(&ctx).await?;
            let stats = ctx.api.dashboard(&user).await?;
            println!("Classes:    {}", stats.total_classes);
            println!("Activities: {}", stats.total_activities);
            if !user.is_professor() {
                println!(
                    "Content:    {}/{} completed ({} pending)",
                    stats.completed_content, stats.total_content, stats.pending_content
                );
                println!(
                    "Progress:   {:.0}% [{}]",
                    stats.progress_percentage,
                    ProgressTier::of(stats.progress_percentage).color()
                );
            }
        }

        Commands::Classes { action } => {
            let user = require_user(&ctx).await?;
            match action {
                ClassCommand::List => {
                    let classes = ctx.api.classes().await?;
                    if json {
                        println!("{}", serde_json::to_string_pretty(&classes)?);
                    } else if classes.is_empty() {
                        println!("No classes yet.");
                    } else {
                        println!("{:<6} {:<30} {:<12} {}", "ID", "Name", "Code", "Professor");
                        println!("{}", "-".repeat(70));
                        for class in classes {
                            let role = if class.is_owned_by(&user) {
                                " (owner)"
                            } else if class.is_collaborator(&user) {
                                " (collaborator)"
                            } else {
                                ""
                            };
                            println!(
                                "{:<6} {:<30} {:<12} {}{}",
                                class.id,
                                truncate(&class.name, 27),
                                class.code,
                                class.professor_display(),
                                role
                            );
                        }
                    }
                }
                ClassCommand::Show { id } => {
                    let class = ctx.api.class(id).await?;
                    if json {
                        println!("{}", serde_json::to_string_pretty(&class)?);
                    } else {
                        println!("{} [{}]", class.name, class.code);
                        println!("  {}", class.description);
                        println!("  Professor: {}", class.professor_display());
                        if let Some(collaborator) = class.collaborator_display() {
                            println!("  Collaborator: {}", collaborator);
                        }
                        println!("  Created: {}", format_date(Some(class.created_at.as_str())));
                    }
                }
                ClassCommand::Students { id } => {
                    let students = ctx.api.class_students(id).await?;
                    for student in students {
                        println!("{:<6} {:<24} {}", student.id, student.username, student.email);
                    }
                }
                ClassCommand::Create {
                    name,
                    description,
                    max_students,
                } => {
                    let input = ClassForm {
                        name,
                        description,
                        max_students,
                    }
                    .validate()?;
                    let class = ctx.api.create_class(&input).await?;
                    println!("Created class {} with code {}", class.id, class.code);
                }
                ClassCommand::Delete { id } => {
                    let message = ctx.api.delete_class(id).await?;
                    println!("{}", message.unwrap_or_else(|| "Class deleted".into()));
                }
                ClassCommand::Join { code } => {
                    let code = JoinClassForm { code }.validate()?;
                    let message = ctx.api.join_class(&code).await?;
                    println!("{}", message.unwrap_or_else(|| "Joined class".into()));
                }
                ClassCommand::RegenerateCode { id } => {
                    let code = ctx.api.regenerate_class_code(id).await?;
                    println!("New code: {}", code);
                }
                ClassCommand::AddCollaborator { id, email } => {
                    let message = ctx.api.add_collaborator(id, &email).await?;
                    println!("{}", message.unwrap_or_else(|| "Collaborator added".into()));
                }
                ClassCommand::RemoveCollaborator { id, collaborator_id } => {
                    let message = ctx.api.remove_collaborator(id, collaborator_id).await?;
                    println!("{}", message.unwrap_or_else(|| "Collaborator removed".into()));
                }
            }
        }

        Commands::Content { action } => {
            require_user(&ctx).await?;
            match action {
                ContentCommand::List {
                    class,
                    search,
                    kind,
                    status,
                } => {
                    let status = match status.as_deref() {
                        None => None,
                        Some(raw) => match ContentStatus::parse(raw) {
                            Some(s) => Some(s),
                            None => bail!("Unknown status {:?}", raw),
                        },
                    };
                    let items = ctx.api.contents(class).await?;
                    let filter = ContentFilter {
                        search,
                        kind,
                        status,
                    };
                    let shown = filter.apply(&items);
                    if json {
                        println!("{}", serde_json::to_string_pretty(&shown)?);
                    } else {
                        println!("{:<6} {:<10} {:<13} {}", "ID", "Type", "Status", "Title");
                        println!("{}", "-".repeat(70));
                        for content in shown {
                            println!(
                                "{:<6} {:<10} {:<13} {}",
                                content.id,
                                content.kind.label(),
                                ContentStatus::of(content).label(),
                                truncate(&content.title, 40)
                            );
                        }
                    }
                }
                ContentCommand::Show { id } => {
                    let content = ctx.api.content(id).await?;
                    println!("{} ({})", content.title, content.kind.label());
                    println!("  {}", preview(&content.description));
                    if let Some(url) = &content.url {
                        println!("  {}", url);
                    }
                    println!("  Status: {}", ContentStatus::of(&content).label());
                }
                ContentCommand::Stats => {
                    let stats = ctx.api.content_stats().await?;
                    if json {
                        println!("{}", serde_json::to_string_pretty(&stats)?);
                    } else {
                        println!(
                            "{}/{} completed, {} pending ({:.0}%)",
                            stats.completed, stats.total, stats.pending, stats.progress_percentage
                        );
                    }
                }
                ContentCommand::Complete { id } => {
                    let message = ctx.api.complete_content(id).await?;
                    println!("{}", message.unwrap_or_else(|| "Marked as completed".into()));
                }
                ContentCommand::Page {
                    id,
                    page,
                    total_pages,
                } => {
                    ctx.api
                        .record_document_progress(id, page, total_pages)
                        .await?;
                    println!("Saved page {}/{}", page, total_pages);
                }
                ContentCommand::Watched { id, progress } => {
                    ctx.api.record_video_progress(id, progress).await?;
                    println!("Saved {:.0}% watched", progress);
                }
            }
        }

        Commands::Activities { action } => {
            let user = require_user(&ctx).await?;
            match action {
                ActivityCommand::List { class } => {
                    let activities = match class {
                        Some(id) => ctx.api.class_activities(id).await?,
                        None if user.is_professor() => ctx.api.activities(None).await?,
                        None => ctx.api.student_activities().await?,
                    };
                    if json {
                        println!("{}", serde_json::to_string_pretty(&activities)?);
                    } else {
                        println!("{:<6} {:<13} {:<12} {}", "ID", "Type", "Due", "Title");
                        println!("{}", "-".repeat(70));
                        for a in activities {
                            let done = if a.is_completed.unwrap_or(false) { " ✓" } else { "" };
                            println!(
                                "{:<6} {:<13} {:<12} {}{}",
                                a.id,
                                a.kind.label(),
                                format_date(a.due_date.as_deref()),
                                truncate(&a.title, 40),
                                done
                            );
                        }
                    }
                }
                ActivityCommand::Show { id } => {
                    let activity = ctx.api.activity(id).await?;
                    println!("{} ({})", activity.title, activity.kind.label());
                    println!("  {}", activity.description);
                    println!("  Due: {}", format_datetime(activity.due_date.as_deref()));
                    if let Some(limit) = activity.time_limit {
                        println!("  Time limit: {} min", limit / 60);
                    }
                }
                ActivityCommand::Create {
                    class,
                    title,
                    description,
                    kind,
                    minutes,
                    due,
                    questions,
                } => {
                    let raw = std::fs::read_to_string(&questions)
                        .with_context(|| format!("reading {}", questions.display()))?;
                    let parsed: Vec<Question> =
                        serde_json::from_str(&raw).context("parsing question list")?;

                    let mut draft = ActivityDraft::new();
                    draft.title = title;
                    draft.description = description;
                    draft.time_limit_minutes = minutes;
                    draft.due_date = due.unwrap_or_default();
                    draft.set_kind(kind);
                    fill_draft(&mut draft, &parsed);

                    let input = draft.validate(class)?;
                    let activity = ctx.api.create_activity(&input).await?;
                    println!("Created activity {} with {} questions", activity.id, parsed.len());
                }
                ActivityCommand::Delete { id } => {
                    let message = ctx.api.delete_activity(id).await?;
                    println!("{}", message.unwrap_or_else(|| "Activity deleted".into()));
                }
            }
        }

        Commands::Notes { action } => {
            require_user(&ctx).await?;
            match action {
                NoteCommand::List {
                    class,
                    content,
                    search,
                    kind,
                } => {
                    let notes = ctx
                        .api
                        .notes(NoteQuery {
                            class_id: class,
                            content_id: content,
                        })
                        .await?;
                    let shown = NoteFilter { search, kind }.apply(&notes);
                    if json {
                        println!("{}", serde_json::to_string_pretty(&shown)?);
                    } else {
                        for note in shown {
                            let updated = relative_time(&note.updated_at, chrono::Utc::now());
                            println!(
                                "#{} {} [{}] {}",
                                note.id,
                                note.title,
                                note.content_type.label(),
                                updated
                            );
                            println!("    {}", preview(&note.content));
                        }
                    }
                }
                NoteCommand::Show { id } => {
                    let note = ctx.api.note(id).await?;
                    let form = NoteForm::from_note(&note);
                    println!("{} [{}]", note.title, note.content_type.label());
                    println!("{}", note.content);
                    println!("-- {}", form.word_count_label());
                }
                NoteCommand::Create {
                    title,
                    body,
                    kind,
                    class,
                    content,
                } => {
                    let body = match body {
                        Some(b) => b,
                        None => read_stdin()?,
                    };
                    let form = NoteForm {
                        title,
                        content: body,
                        content_type: kind,
                        class_id: class,
                        content_id: content,
                    };
                    if form.over_word_limit() {
                        eprintln!("Warning: {}", form.word_count_label());
                    }
                    let note = ctx.api.create_note(&form.validate()?).await?;
                    println!("Created note {}", note.id);
                }
                NoteCommand::Delete { id } => {
                    let message = ctx.api.delete_note(id).await?;
                    println!("{}", message.unwrap_or_else(|| "Note deleted".into()));
                }
                NoteCommand::Edit { id } => {
                    let note = ctx.api.note(id).await?;
                    let mut text = note.content;
                    eprintln!(
                        "Editing \"{}\". Lines are appended and saved {} ms after you stop typing. Ctrl-D to finish.",
                        note.title,
                        ctx.autosave.delay().as_millis()
                    );

                    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
                    std::thread::spawn(move || {
                        for line in std::io::stdin().lock().lines() {
                            match line {
                                Ok(line) => {
                                    if tx.send(line).is_err() {
                                        break;
                                    }
                                }
                                Err(_) => break,
                            }
                        }
                    });

                    while let Some(line) = rx.recv().await {
                        if !text.is_empty() {
                            text.push('\n');
                        }
                        text.push_str(&line);
                        ctx.autosave.edit(id, text.clone());
                    }

                    if ctx.autosave.flush(id).await? {
                        println!("Saved");
                    } else {
                        println!("No changes");
                    }
                    if let Some(at) = ctx.autosave.last_saved(id) {
                        tracing::debug!(note_id = id, saved_at = %at, "Last autosave");
                    }
                }
            }
        }

        Commands::Notifications { action } => {
            require_user(&ctx).await?;
            match action {
                NotificationCommand::List => {
                    let items = ctx.api.notifications().await?;
                    if json {
                        println!("{}", serde_json::to_string_pretty(&items)?);
                    } else if items.is_empty() {
                        println!("No notifications.");
                    } else {
                        for n in items {
                            let marker = if n.read { " " } else { "*" };
                            println!(
                                "{} #{} {} ({})",
                                marker,
                                n.id,
                                n.title,
                                relative_time(&n.created_at, chrono::Utc::now())
                            );
                            println!("     {}", n.message);
                        }
                    }
                }
                NotificationCommand::Unread => {
                    ctx.unread.refresh().await;
                    println!("{}", ctx.unread.current());
                }
                NotificationCommand::Read { id } => {
                    ctx.api.mark_notification_read(id).await?;
                    println!("Marked as read");
                }
                NotificationCommand::ReadAll => {
                    ctx.api.mark_all_notifications_read().await?;
                    ctx.unread.set_count(0);
                    println!("All notifications marked as read");
                }
                NotificationCommand::Delete { id } => {
                    ctx.api.delete_notification(id).await?;
                    println!("Notification deleted");
                }
            }
        }

        Commands::Progress => {
            require_user(&ctx).await?;
            let overview = ctx.api.progress_overview().await?;
            println!(
                "Content:    {}/{} ({}%)",
                overview.completed_content,
                overview.total_content,
                overview.content_percentage()
            );
            println!(
                "Activities: {}/{} ({}%)",
                overview.completed_activities,
                overview.total_activities,
                overview.activities_percentage()
            );
            for row in &overview.by_kind {
                println!(
                    "  {:<10} {}/{} ({}%)",
                    row.label,
                    row.completed,
                    row.total,
                    row.percentage()
                );
            }
        }

        Commands::Settings { action } => {
            let user = require_user(&ctx).await?;
            match action {
                SettingsCommand::Profile {
                    name,
                    email,
                    age,
                    institution,
                } => {
                    let mut form = ProfileForm::from_user(&user);
                    if let Some(name) = name {
                        form.set_name(&name);
                    }
                    if let Some(email) = email {
                        form.email = email;
                    }
                    if let Some(age) = age {
                        form.age = age;
                    }
                    if let Some(institution) = institution {
                        form.institution = institution;
                    }
                    let updated = ctx.api.save_profile(&form.validate()?).await?;
                    if json {
                        println!("{}", serde_json::to_string_pretty(&updated)?);
                    } else {
                        println!("{}: saved", SettingsTab::Profile.label());
                        println!("  {} <{}>", updated.username, updated.email);
                    }
                }
                SettingsCommand::Password {
                    current,
                    new,
                    confirm,
                } => {
                    let form = PasswordChangeForm {
                        current_password: or_prompt(current, "Current password")?,
                        new_password: or_prompt(new, "New password")?,
                        confirm_password: or_prompt(confirm, "Confirm new password")?,
                    };
                    let message = ctx.api.change_password(&form.validate()?).await?;
                    println!(
                        "{}: {}",
                        SettingsTab::Security.label(),
                        message.unwrap_or_else(|| "Password changed".into())
                    );
                }
            }
        }

        Commands::Feedback { subject, message } => {
            let user = require_user(&ctx).await?;
            let mut form = FeedbackForm::for_user(Some(&user));
            form.subject = subject;
            form.message = message;
            let message = ctx.api.send_feedback(&form.validate()?).await?;
            println!("{}", message.unwrap_or_else(|| "Thanks for your feedback!".into()));
        }

        Commands::Users { action } => {
            let user = require_user(&ctx).await?;
            if !user.is_admin() {
                bail!("Only administrators can manage users");
            }
            match action {
                UserCommand::List => {
                    let users = ctx.api.users().await?;
                    if json {
                        println!("{}", serde_json::to_string_pretty(&users)?);
                    } else {
                        println!("{:<6} {:<24} {:<30} {}", "ID", "Username", "Email", "Role");
                        println!("{}", "-".repeat(75));
                        for u in users {
                            println!(
                                "{:<6} {:<24} {:<30} {}",
                                u.id,
                                u.username,
                                u.email,
                                u.user_type.label()
                            );
                        }
                    }
                }
                UserCommand::Delete { id } => {
                    ctx.api.delete_user(id).await?;
                    println!("User {} deleted", id);
                }
                UserCommand::SetType { id, user_type } => {
                    ctx.api.change_user_type(id, user_type).await?;
                    println!("User {} is now {}", id, user_type.label());
                }
            }
        }

        Commands::Route { path } => {
            let has_token = ctx.session.token().is_some();
            let state = ctx.initialize().await;
            let location = Location::parse(&path);
            match ctx.guard.evaluate(&location.to_string(), &state, has_token) {
                GuardDecision::Render => println!("render {}", location.path()),
                GuardDecision::Loading => println!("loading"),
                GuardDecision::Redirect(to) => println!("redirect {}", to),
            }
        }

        Commands::Config { .. } => {}
    }

    ctx.shutdown().await;
    Ok(())
}

/// Boot the session and return the signed-in user, loading the profile when
/// the token was trusted without one
async fn require_user(ctx: &AppContext) -> anyhow::Result<dino::User> {
    let state = ctx.initialize().await;
    if !state.is_authenticated {
        bail!("Not signed in. Run `dino login` first");
    }
    match state.user {
        Some(user) => Ok(user),
        None => {
            let user = ctx.api.profile().await?;
            ctx.session.set_user(Some(user.clone())).await;
            Ok(user)
        }
    }
}

/// Copy questions parsed from a file into the draft through its editing API
fn fill_draft(draft: &mut ActivityDraft, questions: &[Question]) {
    for (i, q) in questions.iter().enumerate() {
        if i >= draft.questions().len() {
            draft.add_question();
        }
        draft.update_question(i, QuestionField::Text, q.question_text.as_str());
        draft.update_question(i, QuestionField::OptionA, q.option_a.as_str());
        draft.update_question(i, QuestionField::OptionB, q.option_b.as_str());
        draft.update_question(i, QuestionField::OptionC, q.option_c.as_str());
        draft.update_question(i, QuestionField::OptionD, q.option_d.as_str());
        if let Some(answer) = q.correct_answer {
            draft.set_answer(i, answer);
        }
    }
}

fn prompt(label: &str) -> anyhow::Result<String> {
    eprint!("{}: ", label);
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim_end_matches(&['\r', '\n'][..]).to_string())
}

fn or_prompt(value: Option<String>, label: &str) -> anyhow::Result<String> {
    match value {
        Some(v) => Ok(v),
        None => prompt(label),
    }
}

fn read_stdin() -> anyhow::Result<String> {
    let mut body = String::new();
    for line in std::io::stdin().lock().lines() {
        body.push_str(&line?);
        body.push('\n');
    }
    Ok(body.trim_end().to_string())
}
