use anyhow::Result;
use carechat::{
    config::{default_config_path, resolve_config, save_api_key, validate_config},
    constants::POINTS_PER_QUESTION,
    conversation::ChatSession,
    logging::init_logging,
    models::{Attachment, ConditionKey},
    ui, Chatbot, CareError,
};
use clap::Parser;
use colored::Colorize;
use dotenv::dotenv;
use log::{info, warn};
use rustyline::{error::ReadlineError, DefaultEditor};
use std::path::PathBuf;
use termimad::MadSkin;

/// Condition-aware health assistant chat
#[derive(Parser)]
#[command(name = "carechat")]
#[command(about = "Personalized health tips for your conditions, powered by Gemini or offline advice", long_about = None)]
#[command(version)]
struct Cli {
    /// Gemini API key (overrides $GEMINI_API_KEY and the config file)
    #[arg(long)]
    api_key: Option<String>,

    /// Never call the language model, use predefined responses only
    #[arg(long)]
    offline: bool,

    /// Log level (overrides the config file; RUST_LOG wins over both)
    #[arg(long)]
    log_level: Option<String>,

    /// Path to the config file
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Ask(String),
    Quick,
    Attach(PathBuf),
    Conditions,
    Surgery,
    Key(String),
    History,
    Clear,
    Help,
    Quit,
    Unknown(String),
}

fn parse_command(line: &str) -> Command {
    let line = line.trim();
    if !line.starts_with('/') {
        return Command::Ask(line.to_string());
    }

    let (name, arg) = match line.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (line, ""),
    };

    match (name, arg.is_empty()) {
        ("/quick", _) => Command::Quick,
        ("/attach", false) => Command::Attach(PathBuf::from(arg)),
        ("/conditions", _) => Command::Conditions,
        ("/surgery", _) => Command::Surgery,
        ("/key", false) => Command::Key(arg.to_string()),
        ("/history", _) => Command::History,
        ("/clear", _) => Command::Clear,
        ("/help", _) => Command::Help,
        ("/quit" | "/exit", _) => Command::Quit,
        _ => Command::Unknown(line.to_string()),
    }
}

fn build_chatbot(config: &carechat::config::Config, offline: bool) -> Result<Chatbot> {
    if offline {
        info!("Offline mode requested");
        return Ok(Chatbot::offline());
    }
    Ok(Chatbot::from_config(config)?)
}

fn points_line(total: u32) -> String {
    format!("+{} wellness points ({} total)", POINTS_PER_QUESTION, total)
}

/// What to tell the user after `/key`.
fn key_status(offline: bool, ai_enabled: bool) -> &'static str {
    if offline {
        "Offline mode is on, so predefined responses stay in use until you restart without --offline."
    } else if ai_enabled {
        "Gemini AI is configured and ready."
    } else {
        "That key can't be used; still using predefined responses."
    }
}

async fn answer(
    session: &mut ChatSession,
    chatbot: &Chatbot,
    skin: &MadSkin,
    question: &str,
    attachments: Vec<Attachment>,
) -> Result<()> {
    let spinner = ui::thinking_spinner();
    let result = session.ask(chatbot, question, attachments).await;
    spinner.finish_and_clear();

    match result {
        Ok(_) => {
            let messages = session.messages();
            for message in &messages[messages.len() - 2..] {
                ui::render_message(skin, message);
            }
            println!("{}", points_line(session.points()).dimmed());
            Ok(())
        }
        Err(CareError::EmptyQuestion) => {
            println!("{}", "Type a question or use /quick.".yellow());
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();

    let config_path = match cli.config {
        Some(path) => path,
        None => default_config_path()?,
    };
    let mut config = resolve_config(&config_path, cli.api_key.clone())?;
    if let Some(level) = cli.log_level {
        config.log_level = level;
        validate_config(&config)?;
    }
    init_logging(&config.log_level);

    let mut chatbot = build_chatbot(&config, cli.offline)?;
    let skin = MadSkin::default();

    let conditions = ui::select_conditions(None)?;
    let surgery_type = if conditions.contains(ConditionKey::RecentSurgery) {
        ui::select_surgery_type()?
    } else {
        None
    };
    let mut session = ChatSession::new(conditions, surgery_type);
    info!("Started chat session {}", session.id);

    ui::print_banner(session.conditions(), chatbot.is_ai_enabled());
    let spinner = ui::thinking_spinner();
    let intro = session.start(&chatbot).await.clone();
    spinner.finish_and_clear();
    ui::render_message(&skin, &intro);

    let mut editor = DefaultEditor::new()?;
    let mut pending: Vec<Attachment> = Vec::new();

    loop {
        let line = match editor.readline("› ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };
        if line.trim().is_empty() {
            continue;
        }
        editor.add_history_entry(line.as_str())?;

        match parse_command(&line) {
            Command::Ask(question) => {
                let attachments = std::mem::take(&mut pending);
                answer(&mut session, &chatbot, &skin, &question, attachments).await?;
            }
            Command::Quick => {
                if let Some(question) = ui::select_quick_ask()? {
                    let attachments = std::mem::take(&mut pending);
                    answer(&mut session, &chatbot, &skin, &question, attachments).await?;
                }
            }
            Command::Attach(path) => match Attachment::from_path(&path) {
                Ok(attachment) => {
                    println!(
                        "{} {} will be sent with your next question.",
                        "Attached".green(),
                        attachment.name
                    );
                    pending.push(attachment);
                }
                Err(e) => {
                    warn!("{}", e);
                    println!("{}", e.to_string().red());
                }
            },
            Command::Conditions => {
                let conditions = ui::select_conditions(Some(session.conditions()))?;
                if !conditions.contains(ConditionKey::RecentSurgery) {
                    session.set_surgery_type(None);
                } else if session.surgery_type().is_none() {
                    session.set_surgery_type(ui::select_surgery_type()?);
                }
                session.set_conditions(conditions);
                ui::print_banner(session.conditions(), chatbot.is_ai_enabled());
                let intro = session.start(&chatbot).await.clone();
                ui::render_message(&skin, &intro);
            }
            Command::Surgery => {
                if session.conditions().contains(ConditionKey::RecentSurgery) {
                    session.set_surgery_type(ui::select_surgery_type()?);
                } else {
                    println!("{}", "Select \"Recently had surgery\" first (/conditions).".yellow());
                }
            }
            Command::Key(key) => {
                match save_api_key(&config_path, &key) {
                    Ok(()) => println!("{} {}", "Key saved to".green(), config_path.display()),
                    Err(e) => {
                        warn!("{}", e);
                        println!("{}", e.to_string().red());
                    }
                }
                config.api_key = Some(key);
                chatbot = build_chatbot(&config, cli.offline)?;
                let status = key_status(cli.offline, chatbot.is_ai_enabled());
                if chatbot.is_ai_enabled() {
                    println!("{}", status.green());
                } else {
                    println!("{}", status.yellow());
                }
            }
            Command::History => {
                let questions = session.previous_questions();
                if questions.is_empty() {
                    println!("{}", "No questions yet.".dimmed());
                }
                for (i, question) in questions.iter().enumerate() {
                    println!("  {}. {}", i + 1, question);
                }
            }
            Command::Clear => {
                session.clear();
                pending.clear();
                let intro = session.start(&chatbot).await.clone();
                ui::render_message(&skin, &intro);
            }
            Command::Help => ui::print_help(),
            Command::Quit => break,
            Command::Unknown(input) => {
                println!("{} {}", "Unknown command:".red(), input);
                ui::print_help();
            }
        }
    }

    println!("{}", "Take care! 💚".green());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_a_question() {
        assert_eq!(
            parse_command("  Foods to avoid "),
            Command::Ask("Foods to avoid".to_string())
        );
    }

    #[test]
    fn test_commands_with_arguments() {
        assert_eq!(
            parse_command("/attach ~/labs 2024.txt"),
            Command::Attach(PathBuf::from("~/labs 2024.txt"))
        );
        assert_eq!(parse_command("/key abc123"), Command::Key("abc123".to_string()));
        assert_eq!(parse_command("/key"), Command::Unknown("/key".to_string()));
    }

    #[test]
    fn test_points_line_uses_award_constant() {
        assert_eq!(
            points_line(3 * POINTS_PER_QUESTION),
            format!(
                "+{} wellness points ({} total)",
                POINTS_PER_QUESTION,
                3 * POINTS_PER_QUESTION
            )
        );
    }

    #[test]
    fn test_key_status_blames_offline_mode() {
        assert!(key_status(true, false).starts_with("Offline mode is on"));
        assert_eq!(key_status(false, true), "Gemini AI is configured and ready.");
        assert!(key_status(false, false).starts_with("That key can't be used"));
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(parse_command("/quick"), Command::Quick);
        assert_eq!(parse_command("/exit"), Command::Quit);
        assert_eq!(parse_command("/dance"), Command::Unknown("/dance".to_string()));
    }
}
