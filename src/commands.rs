//! Command handlers: parse CLI input, delegate to the library, print results.

use anyhow::{Context, Result};
use serde::Serialize;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::debug;

use snap_translate::orchestration::{Onboarding, OnboardingOutcome, Route, TARGET_LANGUAGES};
use snap_translate::presentation::{parse_response, parse_result, render_text, ResultView};
use snap_translate::{
    Config, FileCapturer, FileSettingsStore, Metrics, RunOutcome, ScanPipeline, Settings,
    SupportedLanguage, TranslationResponse,
};

use crate::cli::{Cli, Commands};

#[derive(Serialize)]
struct JsonOut<T> {
    ok: bool,
    data: T,
}

#[derive(Serialize)]
struct JsonErr {
    ok: bool,
    error: String,
}

#[derive(Serialize)]
struct StatusOut {
    onboarding_complete: bool,
    target_language: Option<String>,
    route: Route,
    settings_path: String,
}

#[derive(Serialize)]
struct OnboardOut {
    language: SupportedLanguage,
    outcome: OnboardingOutcome,
}

#[derive(Serialize)]
struct ScanOut {
    result: ResultView,
    response: Option<TranslationResponse>,
    raw_reply: String,
}

fn print_one<T: Serialize>(json: bool, data: T, row: impl Fn(&T) -> String) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonOut { ok: true, data })?
        );
    } else {
        println!("{}", row(&data));
    }
    Ok(())
}

fn print_err(json: bool, message: &str) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonErr {
                ok: false,
                error: message.to_string(),
            })?
        );
    } else {
        eprintln!("Error: {}", message);
    }
    Ok(())
}

pub async fn dispatch(cli: Cli, config: &Config) -> Result<ExitCode> {
    let settings = Settings::new(Arc::new(FileSettingsStore::new(config.settings_path())));

    match cli.command {
        Commands::Languages => {
            print_one(cli.json, TARGET_LANGUAGES, |langs| {
                langs
                    .iter()
                    .map(|l| format!("{}\t{}", l.code, l.name))
                    .collect::<Vec<_>>()
                    .join("\n")
            })?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Onboard { language } => {
            let Some(language) = SupportedLanguage::resolve(&language) else {
                print_err(
                    cli.json,
                    &format!(
                        "Unsupported language '{}'. Run `snap-translate languages` to see the options",
                        language
                    ),
                )?;
                return Ok(ExitCode::FAILURE);
            };

            let outcome = Onboarding::new(settings)
                .select_language(language, None)
                .await
                .context("Failed to save target language")?;

            print_one(
                cli.json,
                OnboardOut {
                    language: *language,
                    outcome,
                },
                |out| format!("Target language set to {}", out.language.name),
            )?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Status => {
            let onboarding = Onboarding::new(settings.clone());
            let status = StatusOut {
                onboarding_complete: settings.onboarding_complete().await?,
                target_language: settings.target_language().await?,
                route: onboarding.initial_route().await?,
                settings_path: config.settings_path().display().to_string(),
            };

            print_one(cli.json, status, |s| {
                format!(
                    "onboarding complete: {}\ntarget language: {}\nstart screen: {}\nsettings: {}",
                    s.onboarding_complete,
                    s.target_language.as_deref().unwrap_or("(not set)"),
                    match s.route {
                        Route::GetStarted => "get started",
                        Route::Camera => "camera",
                    },
                    s.settings_path
                )
            })?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Scan { image, raw } => {
            if Onboarding::new(settings.clone()).initial_route().await? == Route::GetStarted {
                print_err(
                    cli.json,
                    "Onboarding not complete. Run `snap-translate onboard --language <code>` first",
                )?;
                return Ok(ExitCode::FAILURE);
            }

            let metrics = Metrics::new();
            let pipeline = ScanPipeline::from_config(
                config,
                Arc::new(FileCapturer::new(image)),
                settings,
                metrics.clone(),
            )?;

            let outcome = pipeline.run().await;
            debug!("Metrics: {:?}", metrics.snapshot());

            match outcome {
                Ok(RunOutcome::Completed { raw_reply }) if raw => {
                    println!("{}", raw_reply);
                    Ok(ExitCode::SUCCESS)
                }
                Ok(RunOutcome::Completed { raw_reply }) => {
                    let out = ScanOut {
                        result: parse_result(Some(&raw_reply)),
                        response: parse_response(&raw_reply).ok(),
                        raw_reply,
                    };
                    print_one(cli.json, out, |out| render_text(&out.result))?;
                    Ok(ExitCode::SUCCESS)
                }
                Ok(RunOutcome::AlreadyRunning) => {
                    print_err(cli.json, "A scan is already in progress")?;
                    Ok(ExitCode::FAILURE)
                }
                Err(e) => {
                    print_err(cli.json, &e.user_message())?;
                    Ok(ExitCode::FAILURE)
                }
            }
        }
    }
}
