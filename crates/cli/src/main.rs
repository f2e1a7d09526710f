// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! twr - command line client for an automation server's REST API

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod commands;
mod error;
mod output;

use anyhow::Result;
use clap::{ArgMatches, Args, Command, FromArgMatches};
use std::io::{IsTerminal, Write};
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{alert, config, resource};
use error::CliError;
use output::Style;
use twr_core::{
    ApiClient, Catalog, Context, HttpTransport, OutputFormat, Settings, SettingsLayer,
    SystemClock, Terminal,
};

/// Flags accepted by every command; they override every settings file
#[derive(Args, Debug, Clone, Default, PartialEq)]
struct GlobalArgs {
    /// Server host, e.g. tower.example.com
    #[arg(long = "tower-host", global = true, value_name = "HOST")]
    host: Option<String>,

    #[arg(long = "tower-username", global = true, value_name = "USERNAME")]
    username: Option<String>,

    #[arg(long = "tower-password", global = true, value_name = "PASSWORD")]
    password: Option<String>,

    /// Output format: human, json, yaml or id
    #[arg(short = 'f', long, global = true)]
    format: Option<OutputFormat>,

    /// Print every request and poll
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// Skip TLS certificate verification
    #[arg(long, global = true)]
    insecure: bool,
}

impl GlobalArgs {
    fn layer(&self) -> SettingsLayer {
        SettingsLayer {
            host: self.host.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            format: self.format,
            verbose: self.verbose.then_some(true),
            verify_ssl: self.insecure.then_some(false),
            ..SettingsLayer::default()
        }
    }
}

fn cli(catalog: &Catalog) -> Command {
    let mut cmd = Command::new("twr")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Command line client for an automation server's REST API")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(config::ConfigArgs::augment_args(
            Command::new("config").about("Read or write settings."),
        ))
        .subcommand(alert::AlertArgs::augment_args(
            Command::new("alert").about("Launch a job template from an alert payload on stdin."),
        ));
    cmd = GlobalArgs::augment_args(cmd);
    for def in catalog.definitions() {
        cmd = cmd.subcommand(resource::resource_command(def));
    }
    cmd
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("TWR_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}

fn run(catalog: Catalog, matches: &ArgMatches) -> Result<()> {
    let globals = GlobalArgs::from_arg_matches(matches)?;
    let cwd = std::env::current_dir()?;
    let settings = Settings::load(&cwd)?.with_overrides(&globals.layer());
    init_logging(settings.verbose);

    let stdout = std::io::stdout();
    let tty = stdout.is_terminal();
    let mut out = stdout.lock();

    let Some((name, sub)) = matches.subcommand() else {
        return Ok(());
    };
    match name {
        "config" => {
            let args = config::ConfigArgs::from_arg_matches(sub)?;
            config::handle(&args, &settings, &cwd, &mut out)
        }
        "alert" => {
            let args = alert::AlertArgs::from_arg_matches(sub)?;
            alert::handle(&args, &settings, &mut std::io::stdin().lock(), &mut out)
        }
        kind => {
            let Some((command, command_matches)) = sub.subcommand() else {
                return Ok(());
            };
            let transport = HttpTransport::from_settings(&settings).map_err(twr_core::Error::from)?;
            let api = ApiClient::new(transport);
            let ctx = Context::new(api, catalog, SystemClock).with_terminal(Terminal {
                tty,
                verbose: settings.verbose,
            });
            let res = ctx.resource(kind)?;
            let rendered = resource::run(&res, command, command_matches, &mut out)?;
            let style = Style {
                format: settings.format,
                color: settings.color && tty,
            };
            output::print(&rendered, res.definition(), style, &mut out)?;
            out.flush()?;
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    let catalog = match Catalog::builtin() {
        Ok(catalog) => catalog,
        Err(err) => {
            eprint!("{}", CliError::new(err.to_string()));
            return ExitCode::FAILURE;
        }
    };

    let matches = match cli(&catalog).try_get_matches() {
        Ok(matches) => matches,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(catalog, &matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let err = CliError::from_anyhow(&err);
            eprint!("{}", err);
            ExitCode::from(u8::try_from(err.exit_code).unwrap_or(1))
        }
    }
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
