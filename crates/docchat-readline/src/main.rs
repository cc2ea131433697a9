mod command;
mod helper;
mod terminal;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use anyhow::Result;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Editor, ExternalPrinter};
use tokio::task::JoinHandle;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use docchat_core::auth::{AuthService, Credentials, RegisterRequest};
use docchat_core::config::AppConfig;
use docchat_core::error::DocchatError;
use docchat_core::idle::{IdleTimer, format_remaining};
use docchat_core::render;
use docchat_core::{ChatContext, ChatController, HistoryManager, RejectReason, RemoveOutcome, SubmitOutcome};
use docchat_infrastructure::{ConfigService, DocchatPaths, InMemorySessionArchive};
use docchat_interaction::{ApiClient, HttpAuthService, HttpSearchBackend};

use crate::command::{Command, help_text};
use crate::helper::{CliHelper, ListSizes};
use crate::terminal::{Osc52Clipboard, StdinConfirm, TerminalView, print_sidebar, print_toast};

type Repl = Editor<CliHelper, DefaultHistory>;

const IDLE_TICK: Duration = Duration::from_secs(1);

/// What the REPL does after a command.
enum Flow {
    Continue,
    Logout,
    /// The idle watcher already logged the user out.
    Expired,
    Quit,
}

fn lock_idle(idle: &Mutex<IdleTimer>) -> MutexGuard<'_, IdleTimer> {
    idle.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Logs go to a daily file so they never interleave with the chat.
fn init_tracing() -> Option<WorkerGuard> {
    let log_dir = DocchatPaths::log_dir().ok()?;
    std::fs::create_dir_all(&log_dir).ok()?;

    let appender = tracing_appender::rolling::daily(log_dir, "docchat.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Some(guard)
}

fn load_config() -> Result<AppConfig> {
    match ConfigService::new() {
        Ok(service) => Ok(service.load()?),
        Err(e) => {
            tracing::warn!("Config location unavailable ({}), using defaults", e);
            Ok(AppConfig::default())
        }
    }
}

/// Reads one line; `None` means the user wants out.
fn prompt(rl: &mut Repl, label: &str) -> Result<Option<String>> {
    match rl.readline(label) {
        Ok(line) => {
            let line = line.trim().to_string();
            Ok((line != "quit" && line != "exit").then_some(line))
        }
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// Runs until a login succeeds. Returns `None` if the user quits.
async fn login(rl: &mut Repl, auth: &dyn AuthService) -> Result<Option<String>> {
    println!("{}", "로그인이 필요합니다. 회원가입은 '/register'를 입력하세요.".bright_black());

    loop {
        let Some(user_id) = prompt(rl, "아이디: ")? else {
            return Ok(None);
        };
        if user_id == "/register" {
            register(rl, auth).await?;
            continue;
        }
        let Some(password) = prompt(rl, "비밀번호: ")? else {
            return Ok(None);
        };

        let credentials = match Credentials::new(&user_id, &password) {
            Ok(credentials) => credentials,
            Err(DocchatError::Validation(message)) => {
                println!("{}", message.red());
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        match auth.login(&credentials).await {
            Ok(reply) if reply.success => {
                if !reply.message.is_empty() {
                    println!("{}", reply.message.bright_green());
                }
                return Ok(Some(credentials.user_id));
            }
            Ok(reply) => println!("{}", format!("❌ {}", reply.message).red()),
            Err(e) => println!("{}", e.user_message().red()),
        }
    }
}

async fn register(rl: &mut Repl, auth: &dyn AuthService) -> Result<()> {
    let Some(user_id) = prompt(rl, "가입할 아이디: ")? else {
        return Ok(());
    };
    if user_id.is_empty() {
        println!("{}", "아이디를 입력하세요.".red());
        return Ok(());
    }

    match auth.request_code(&user_id).await {
        Ok(reply) if reply.success => println!("{}", reply.message.bright_green()),
        Ok(reply) => {
            println!("{}", format!("❌ {}", reply.message).red());
            return Ok(());
        }
        Err(e) => {
            println!("{}", e.user_message().red());
            return Ok(());
        }
    }

    let Some(code) = prompt(rl, "인증 코드: ")? else {
        return Ok(());
    };
    let Some(password) = prompt(rl, "비밀번호: ")? else {
        return Ok(());
    };

    let request = match RegisterRequest::new(&user_id, &code, &password) {
        Ok(request) => request,
        Err(e) => {
            println!("{}", e.user_message().red());
            return Ok(());
        }
    };
    match auth.register(&request).await {
        Ok(reply) if reply.success => println!("{}", reply.message.bright_green()),
        Ok(reply) => println!("{}", format!("❌ {}", reply.message).red()),
        Err(e) => println!("{}", e.user_message().red()),
    }
    Ok(())
}

async fn dispatch(
    command: Command,
    controller: &ChatController,
    view: &TerminalView,
) -> Result<Flow> {
    match command {
        Command::Ask(question) => match controller.submit(&question).await {
            SubmitOutcome::Rejected(RejectReason::Busy) => {
                println!("{}", "⏳ 이전 답변을 생성 중입니다.".yellow());
            }
            SubmitOutcome::Failed(e) => tracing::warn!("Submit failed: {}", e),
            SubmitOutcome::Superseded => tracing::info!("Answer dropped after the session ended"),
            SubmitOutcome::Rejected(RejectReason::EmptyQuery) | SubmitOutcome::Answered(_) => {}
        },
        Command::NewChat => {
            controller.new_chat().await?;
        }
        Command::History => print_sidebar(&controller.history().entries()),
        Command::Open(n) => match controller.history().entries().get(n - 1) {
            Some(entry) => {
                if !controller.history().activate(&entry.session_id).await? {
                    println!("{}", "❌ 대화를 찾을 수 없습니다.".red());
                }
            }
            None => println!("{}", format!("{}번 대화가 없습니다.", n).red()),
        },
        Command::Delete(n) => match controller.history().entries().get(n - 1) {
            Some(entry) => {
                let outcome = controller.history().remove(&entry.session_id, &StdinConfirm).await?;
                if let RemoveOutcome::Removed { .. } = outcome {
                    println!("{}", "🗑️ 삭제되었습니다.".bright_black());
                }
            }
            None => println!("{}", format!("{}번 대화가 없습니다.", n).red()),
        },
        Command::Documents { by_date } => view.reprint_documents(by_date),
        Command::Copy(n) => {
            let path = view.document(n).map(|d| d.path);
            print_toast(&render::copy_path(path.as_deref(), &mut Osc52Clipboard));
        }
        Command::Summarize(n) => match view.document(n) {
            Some(document) => match controller.summarize(&document) {
                Ok(summary) => println!("{}", summary.bright_blue()),
                Err(DocchatError::Disabled(message)) => println!("{}", message.yellow()),
                Err(e) => println!("{}", e.user_message().red()),
            },
            None => println!("{}", format!("{}번 문서가 없습니다.", n).red()),
        },
        Command::Logout => return Ok(Flow::Logout),
        Command::Help => println!("{}", help_text().bright_black()),
        Command::Quit => return Ok(Flow::Quit),
        Command::Invalid(message) => println!("{}", message.red()),
    }
    Ok(Flow::Continue)
}

/// Logs the user out once the idle timer runs out, even while the prompt
/// is still waiting for input. A running submit counts as activity.
fn spawn_idle_watcher<P>(
    idle: Arc<Mutex<IdleTimer>>,
    controller: Arc<ChatController>,
    expired: Arc<AtomicBool>,
    printer: Option<Arc<Mutex<P>>>,
) -> JoinHandle<()>
where
    P: ExternalPrinter + Send + 'static,
{
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(IDLE_TICK);
        loop {
            tick.tick().await;

            let minutes = {
                let mut timer = lock_idle(&idle);
                if !timer.tick_at(Instant::now(), controller.is_busy()) {
                    continue;
                }
                timer.timeout().as_secs() / 60
            };

            expired.store(true, Ordering::SeqCst);
            tracing::info!(minutes, "Idle timeout reached");
            if let Err(e) = controller.logout().await {
                tracing::error!("Idle logout failed: {}", e);
            }

            let notice = format!(
                "⏰ {}분 동안 활동이 없어 로그아웃되었습니다. Enter를 누르면 다시 로그인합니다.",
                minutes
            )
            .yellow()
            .to_string();
            let printed = printer.as_ref().map(|printer| {
                printer
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner())
                    .print(notice.clone())
            });
            if !matches!(printed, Some(Ok(()))) {
                println!("{}", notice);
            }
            break;
        }
    })
}

/// One logged-in stretch of the REPL.
async fn chat_loop(
    rl: &mut Repl,
    controller: &ChatController,
    view: &TerminalView,
    sizes: &ListSizes,
    idle: &Mutex<IdleTimer>,
    expired: &AtomicBool,
) -> Result<Flow> {
    loop {
        sizes.update(controller.history().entries().len(), view.document_count());
        let label = format!("[{}] >> ", format_remaining(lock_idle(idle).remaining()));
        let readline = rl.readline(&label);

        // The watcher has already logged out; whatever was typed is dropped.
        if expired.load(Ordering::SeqCst) {
            return Ok(Flow::Expired);
        }

        match readline {
            Ok(line) => {
                lock_idle(idle).touch();
                controller.restore_input();

                let Some(command) = Command::parse(&line) else {
                    continue;
                };
                let _ = rl.add_history_entry(line.trim());

                match dispatch(command, controller, view).await {
                    Ok(Flow::Continue) => {}
                    Ok(flow) => return Ok(flow),
                    Err(e) => {
                        tracing::error!("Command failed: {:?}", e);
                        println!("{}", format!("Error: {}", e).red());
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                return Ok(Flow::Quit);
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                return Ok(Flow::Quit);
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let _log_guard = init_tracing();
    let config = load_config()?;
    tracing::info!(server = %config.server.base_url, "Starting docchat");

    // ===== Backend Initialization =====
    let api = ApiClient::from_settings(&config.server)?;
    let server_url = api.base_url().to_string();
    let backend = Arc::new(HttpSearchBackend::new(api.clone()));
    let auth = HttpAuthService::new(api);

    let archive = Arc::new(InMemorySessionArchive::new());
    let context = Arc::new(ChatContext::new(archive));
    let view = Arc::new(TerminalView::new());
    let history = Arc::new(HistoryManager::new(context.clone(), view.clone()));
    let controller = Arc::new(ChatController::new(
        context,
        backend,
        view.clone(),
        history,
        config.pacing.clone(),
    ));

    // ===== REPL Setup =====
    let sizes = Arc::new(ListSizes::default());
    let mut rl: Repl = Editor::new()?;
    rl.set_helper(Some(CliHelper::new(sizes.clone())));
    let printer = match rl.create_external_printer() {
        Ok(printer) => Some(Arc::new(Mutex::new(printer))),
        Err(e) => {
            tracing::warn!("No external printer, idle notices print directly: {}", e);
            None
        }
    };

    println!("{}", "=== DocChat ===".bright_magenta().bold());
    println!("{}", format!("Server: {}", server_url).bright_black());
    println!("{}", "Type a question, '/help' for commands, or 'quit' to exit.".bright_black());

    loop {
        if config.session.require_login {
            match login(&mut rl, &auth).await? {
                Some(user_id) => tracing::info!(%user_id, "Logged in"),
                None => break,
            }
        }

        controller.start().await?;
        let idle = Arc::new(Mutex::new(IdleTimer::new(config.session.idle_timeout())));
        let expired = Arc::new(AtomicBool::new(false));
        let watcher = spawn_idle_watcher(
            idle.clone(),
            controller.clone(),
            expired.clone(),
            printer.clone(),
        );

        let flow = chat_loop(&mut rl, &controller, &view, &sizes, &idle, &expired).await;
        watcher.abort();

        match flow? {
            Flow::Logout => {
                controller.logout().await?;
                println!("{}", "로그아웃되었습니다.".bright_green());
            }
            Flow::Expired | Flow::Continue => {}
            Flow::Quit => break,
        }
    }

    println!("{}", "Goodbye!".bright_green());
    Ok(())
}
