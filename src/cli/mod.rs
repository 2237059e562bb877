//! CLI command handling
//!
//! Builds the HTTP client from configuration, dispatches commands against
//! the tester endpoints, and formats output. Every mutation prints either a
//! confirmation or the error that stopped it.

use std::time::Duration;

use colored::Colorize;

use crate::api::{ConsoleApi, Device, HttpApi, PromptBundle};
use crate::commands::{Commands, FileCommands, PromptsCommands, TargetCommands, TestCommands};
use crate::common::config::Config;
use crate::common::{Error, Result};
use crate::console::{BundleForm, FieldGroup, RunOrchestrator, StdoutSink};

/// Dispatch a CLI command
pub async fn dispatch(command: Commands, base_url: Option<String>) -> Result<()> {
    let config = Config::load()?;
    let base_url = base_url.unwrap_or(config.server.base_url.clone());
    let api = HttpApi::new(
        &base_url,
        Duration::from_secs(config.server.request_timeout_secs),
    )?;

    match command {
        Commands::Run {
            device,
            prompts,
            tests,
            skips,
            moves,
        } => {
            let poll_interval = Duration::from_secs(config.polling.interval_secs);
            let mut console = RunOrchestrator::new(api, StdoutSink, poll_interval);

            if console.startup().await {
                println!("A run is already in progress; attaching to its output.");
                console.stream().await?;
                println!();
                println!("{}", "Run complete".green().bold());
                return Ok(());
            }

            console.select_device(&device)?;
            console.select_bundle(&prompts)?;
            for name in &tests {
                console.add_test(name)?;
            }
            for name in &skips {
                let index = console
                    .order()
                    .names()
                    .iter()
                    .position(|n| n == name)
                    .ok_or_else(|| Error::UnknownTest(name.clone()))?;
                console.remove_test(index)?;
            }
            for spec in &moves {
                let (from, to) = parse_move(spec)?;
                console.move_test(from, to)?;
            }

            println!(
                "Running {} test(s) against '{}' with bundle '{}'",
                console.order().len(),
                device,
                prompts
            );
            console.submit().await?;
            console.stream().await?;
            println!();
            println!("{}", "Run complete".green().bold());
            Ok(())
        }

        Commands::Watch => {
            let poll_interval = Duration::from_secs(config.polling.interval_secs);
            let mut console = RunOrchestrator::new(api, StdoutSink, poll_interval);

            if !console.startup().await {
                println!("No run in progress.");
                return Ok(());
            }
            console.stream().await?;
            println!();
            println!("{}", "Run complete".green().bold());
            Ok(())
        }

        Commands::Target(target_cmd) => match target_cmd {
            TargetCommands::List => {
                let devices = api.get_devices().await?;
                if devices.is_empty() {
                    println!("No devices registered");
                } else {
                    let mut names: Vec<_> = devices.keys().collect();
                    names.sort();
                    for name in names {
                        println!("  {} {}", name.as_str().bold(), devices[name].address);
                    }
                }
                Ok(())
            }

            TargetCommands::Show { name } => {
                let device = api.get_device(&name).await?;
                println!("{}", name.as_str().bold());
                println!("  address: {}", device.address);
                if !device.ca.is_empty() {
                    println!("  ca:      {}", device.ca);
                }
                if !device.cakey.is_empty() {
                    println!("  ca key:  {}", device.cakey);
                }
                Ok(())
            }

            TargetCommands::Set {
                name,
                address,
                ca,
                ca_key,
            } => {
                let device = Device {
                    address,
                    ca: ca.unwrap_or_default(),
                    cakey: ca_key.unwrap_or_default(),
                };
                api.set_device(&name, &device).await?;
                println!("{} device '{}'", "Saved".green(), name);
                Ok(())
            }

            TargetCommands::Delete { name } => {
                api.delete_device(&name).await?;
                println!("{} device '{}'", "Deleted".green(), name);
                Ok(())
            }
        },

        Commands::Prompts(prompts_cmd) => match prompts_cmd {
            PromptsCommands::List => {
                let bundles = api.get_bundles().await?;
                if bundles.is_empty() {
                    println!("No prompt bundles saved");
                } else {
                    let mut names: Vec<_> = bundles.keys().collect();
                    names.sort();
                    for name in names {
                        let bundle = &bundles[name];
                        println!(
                            "  {} ({} prompt(s), {} file(s))",
                            name.as_str().bold(),
                            bundle.prompts.len(),
                            bundle.files.len()
                        );
                    }
                }
                Ok(())
            }

            PromptsCommands::Schema => {
                let schema = api.get_schema().await?;
                println!("Prompt fields (required):");
                for key in &schema.prompts {
                    println!("  {key}");
                }
                println!("File fields (optional):");
                for key in &schema.files {
                    println!("  {key}");
                }
                Ok(())
            }

            PromptsCommands::Edit {
                name,
                fields,
                files,
                uploads,
            } => {
                edit_bundle(&api, &name, &fields, &files, &uploads).await?;
                println!("{} bundle '{}'", "Saved".green(), name);
                Ok(())
            }

            PromptsCommands::Delete { name } => {
                api.delete_bundle(&name).await?;
                println!("{} bundle '{}'", "Deleted".green(), name);
                Ok(())
            }
        },

        Commands::Tests(test_cmd) => match test_cmd {
            TestCommands::List => {
                let catalog = api.get_tests().await?;
                let mut suites: Vec<_> = catalog.keys().collect();
                suites.sort();
                for suite in suites {
                    println!("{}", suite.as_str().bold());
                    for test in &catalog[suite] {
                        let mut notes = Vec::new();
                        if test.mustfail {
                            notes.push("must fail".to_string());
                        }
                        if test.wait > 0 {
                            notes.push(format!("waits {}s", test.wait));
                        }
                        if notes.is_empty() {
                            println!("  {}", test.name);
                        } else {
                            println!("  {} ({})", test.name, notes.join(", "));
                        }
                    }
                }
                Ok(())
            }

            TestCommands::Order => {
                let order = api.get_test_order().await?;
                for (i, name) in order.iter().enumerate() {
                    println!("  {:>2}. {}", i, name);
                }
                Ok(())
            }
        },

        Commands::File(file_cmd) => match file_cmd {
            FileCommands::Upload { path } => {
                let response = api.upload_file(&path).await?;
                println!("{} as '{}'", "Uploaded".green(), response.filename);
                Ok(())
            }

            FileCommands::Delete { name } => {
                api.delete_file(&name).await?;
                println!("{} file '{}'", "Deleted".green(), name);
                Ok(())
            }
        },
    }
}

/// Build, hydrate, patch, validate, and save a bundle form
async fn edit_bundle(
    api: &HttpApi,
    name: &str,
    fields: &[String],
    files: &[String],
    uploads: &[String],
) -> Result<()> {
    let schema = api.get_schema().await?;
    let bundles = api.get_bundles().await?;

    let mut form = BundleForm::build(&schema);
    form.hydrate(bundles.get(name));
    form.set_value("name", name)?;

    for assignment in fields {
        let (key, value) = parse_assignment(assignment)?;
        form.set_field(FieldGroup::Prompts, key, value)?;
    }
    for assignment in files {
        let (key, value) = parse_assignment(assignment)?;
        form.set_field(FieldGroup::Files, key, value)?;
    }
    for assignment in uploads {
        let (key, path) = parse_assignment(assignment)?;
        let response = api.upload_file(std::path::Path::new(path)).await?;
        println!("Uploaded '{}' as '{}'", path, response.filename);
        form.set_field(FieldGroup::Files, key, &response.filename)?;
    }

    form.validate()?;
    let bundle: PromptBundle = form.serialize();
    api.set_bundle(&bundle).await
}

/// Parse a `<from>:<to>` order move
fn parse_move(spec: &str) -> Result<(usize, usize)> {
    let invalid = || Error::InvalidMove(spec.to_string());
    let (from, to) = spec.split_once(':').ok_or_else(invalid)?;
    Ok((
        from.trim().parse().map_err(|_| invalid())?,
        to.trim().parse().map_err(|_| invalid())?,
    ))
}

/// Parse a `<key>=<value>` field assignment
fn parse_assignment(spec: &str) -> Result<(&str, &str)> {
    spec.split_once('=')
        .ok_or_else(|| Error::FieldNotFound(spec.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_move() {
        assert_eq!(parse_move("2:0").unwrap(), (2, 0));
        assert_eq!(parse_move(" 1 : 3 ").unwrap(), (1, 3));
        assert!(parse_move("2").is_err());
        assert!(parse_move("a:b").is_err());
    }

    #[test]
    fn test_parse_assignment() {
        assert_eq!(parse_assignment("username=admin").unwrap(), ("username", "admin"));
        assert_eq!(parse_assignment("k=a=b").unwrap(), ("k", "a=b"));
        assert!(parse_assignment("no-equals").is_err());
    }
}
