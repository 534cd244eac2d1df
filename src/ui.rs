// src/ui.rs

use crate::constants::{QUICK_ASK, SURGERY_SUGGESTIONS};
use crate::errors::CareResult;
use crate::models::{ConditionKey, ConditionSet, Message, Role};
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Input, MultiSelect, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use termimad::MadSkin;

/// Asks the user to tick at least one condition.
pub fn select_conditions(current: Option<&ConditionSet>) -> CareResult<ConditionSet> {
    let titles: Vec<&str> = ConditionKey::ALL.iter().map(|c| c.title()).collect();
    let defaults: Vec<bool> = ConditionKey::ALL
        .iter()
        .map(|c| current.map_or(false, |set| set.contains(*c)))
        .collect();

    loop {
        let picked = MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt("Select your health conditions (space to toggle, enter to confirm)")
            .items(&titles)
            .defaults(&defaults)
            .interact()?;

        match ConditionSet::new(picked.into_iter().map(|i| ConditionKey::ALL[i])) {
            Ok(set) => return Ok(set),
            Err(_) => println!("{}", "Please select at least one condition.".yellow()),
        }
    }
}

/// Asks which operation the user had. "Other" lets them type it.
pub fn select_surgery_type() -> CareResult<Option<String>> {
    let choice = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("What kind of operation did you have recently?")
        .items(&SURGERY_SUGGESTIONS)
        .default(0)
        .interact_opt()?;

    let Some(index) = choice else {
        return Ok(None);
    };

    let suggestion = SURGERY_SUGGESTIONS[index];
    if suggestion != "Other" {
        return Ok(Some(suggestion.to_string()));
    }

    let typed: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Describe the operation")
        .allow_empty(true)
        .interact_text()?;
    let typed = typed.trim();

    Ok(Some(if typed.is_empty() { suggestion } else { typed }.to_string()))
}

pub fn select_quick_ask() -> CareResult<Option<String>> {
    let choice = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Quick questions")
        .items(&QUICK_ASK)
        .default(0)
        .interact_opt()?;

    Ok(choice.map(|i| QUICK_ASK[i].to_string()))
}

pub fn thinking_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("Thinking...");
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

pub fn render_message(skin: &MadSkin, message: &Message) {
    match message.role {
        Role::User => {
            println!("{} {}", "You:".bold().yellow(), message.text);
            for attachment in &message.attachments {
                println!(
                    "  {} {} ({})",
                    "📎".dimmed(),
                    attachment.name,
                    attachment.media_type.dimmed()
                );
            }
        }
        Role::Assistant => {
            println!("{}", "Assistant:".bold().green());
            skin.print_text(&message.text);
        }
    }
    println!();
}

pub fn print_banner(conditions: &ConditionSet, ai_enabled: bool) {
    println!("{}", "Your friendly health chat".bold().cyan());
    println!(
        "{} {}",
        "Your selected conditions:".bold(),
        conditions.joined_names()
    );
    if ai_enabled {
        println!("{}", "Gemini AI is configured for personalized responses.".green());
    } else {
        println!(
            "{}",
            "No Gemini API key found, using basic predefined responses. Use /key <value> to add one."
                .yellow()
        );
    }
    println!("{}", "Type /help for commands.\n".dimmed());
}

pub fn print_help() {
    let commands = [
        ("/quick", "pick one of the quick questions"),
        ("/attach <path>", "attach a document to your next question"),
        ("/conditions", "change your selected conditions"),
        ("/surgery", "change the recent surgery type"),
        ("/key <value>", "save a Gemini API key"),
        ("/history", "show your recent questions"),
        ("/clear", "start the conversation over"),
        ("/quit", "leave the chat"),
    ];
    for (command, description) in commands {
        println!("  {:<16} {}", command.cyan(), description);
    }
    println!();
}
