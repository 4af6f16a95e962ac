//! Built-in shell commands.

use std::fs;

use chrono::Utc;
use serde_json::Value;

use crate::{
    api::{ApiRequest, ApiResponse, Operation},
    cli::{
        output,
        registry::{CommandEntry, CommandRegistry},
        shell_context::{CommandError, CommandResult, ShellContext},
    },
    errors::ApiError,
    utils::build_info,
};

pub fn registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    for entry in definitions() {
        registry.register(entry);
    }
    registry
}

fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "depreciation-forecast",
            "Five-year value forecast for a stored vehicle",
            "depreciation-forecast <json: vehicleId>",
            cmd_depreciation,
        ),
        CommandEntry::new(
            "trade-in-valuation",
            "Instant trade-in offer",
            "trade-in-valuation <json: vehicleDetails{year, mileage}, condition, notes?, userId?>",
            cmd_trade_in,
        ),
        CommandEntry::new(
            "warranty-quote",
            "Extended warranty quote from a provider",
            "warranty-quote <json: vehicleId, providerId, coverageType, termMonths>",
            cmd_warranty,
        ),
        CommandEntry::new(
            "market-analysis",
            "Price trend summary for comparable listings",
            "market-analysis <json: vehicleType?, make?, model?, yearRange{min, max}?, region?>",
            cmd_market,
        ),
        CommandEntry::new(
            "transport-booking",
            "Transport cost estimate between two locations",
            "transport-booking <json: vehicleId, buyerId, sellerId, pickup, delivery, ...>",
            cmd_transport,
        ),
        CommandEntry::new(
            "options",
            "Show the preflight response for an operation",
            "options <operation>",
            cmd_options,
        ),
        CommandEntry::new(
            "tables",
            "List record tables in the data directory",
            "tables",
            cmd_tables,
        ),
        CommandEntry::new(
            "config",
            "Show or back up the configuration",
            "config [show|backup [note]|backups|restore <name>]",
            cmd_config,
        ),
        CommandEntry::new("version", "Show build metadata", "version", cmd_version),
        CommandEntry::new("help", "Show available commands", "help [command]", cmd_help),
        CommandEntry::new("exit", "Exit the shell", "exit", cmd_exit),
        CommandEntry::new("quit", "Exit the shell", "quit", cmd_exit),
    ]
}

fn cmd_depreciation(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    run_operation(context, Operation::DepreciationForecast, args)
}

fn cmd_trade_in(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    run_operation(context, Operation::TradeInValuation, args)
}

fn cmd_warranty(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    run_operation(context, Operation::WarrantyQuote, args)
}

fn cmd_market(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    run_operation(context, Operation::MarketAnalysis, args)
}

fn cmd_transport(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    run_operation(context, Operation::TransportBooking, args)
}

/// Sends a POST for `operation` and prints the envelope.
/// Error statuses become [`CommandError::Rejected`].
fn run_operation(context: &mut ShellContext, operation: Operation, args: &[&str]) -> CommandResult {
    let body = read_body(args)?;
    let response = match ApiRequest::from_parts("POST", operation.name(), &body) {
        Ok(request) => context.api.handle(&request),
        Err(err) => ApiResponse::error(&err),
    };
    print_response(&response);
    if response.is_success() {
        Ok(())
    } else {
        Err(CommandError::Rejected(response.status))
    }
}

/// Body text from the arguments, or from a file when written as `@path`.
fn read_body(args: &[&str]) -> Result<String, CommandError> {
    match args {
        [] => Ok(String::new()),
        [single] if single.starts_with('@') => Ok(fs::read_to_string(&single[1..])?),
        _ => Ok(args.join(" ")),
    }
}

fn print_response(response: &ApiResponse) {
    match &response.body {
        Some(body) => output::json(body),
        None => output::json(&Value::Null),
    }
}

fn cmd_options(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(name) = args.first() else {
        return Err(CommandError::InvalidArguments(
            "usage: options <operation>".into(),
        ));
    };
    let request = ApiRequest::preflight(name.parse::<Operation>()?);
    let response = context.api.handle(&request);
    output::section(format!("OPTIONS {}", request.operation));
    output::info(format!("status {}", response.status));
    for (header, value) in &response.headers {
        output::info(format!("{header}: {value}"));
    }
    Ok(())
}

fn cmd_tables(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let tables = context.store.list_tables().map_err(ApiError::from)?;
    output::section(format!("Tables in {}", context.store.root().display()));
    if tables.is_empty() {
        output::info("No tables yet.");
    }
    for table in tables {
        output::info(table);
    }
    Ok(())
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first().copied().unwrap_or("show") {
        "show" => {
            let value = serde_json::to_value(&context.config)
                .map_err(|err| ApiError::Config(err.to_string()))?;
            output::section("Configuration");
            output::info(format!(
                "file: {}",
                context.config_manager.config_path().display()
            ));
            output::info(format!(
                "data: {}",
                context.config.resolve_data_dir(&context.data_root).display()
            ));
            output::json(&value);
            Ok(())
        }
        "backup" => {
            let note = args.get(1).copied();
            let name = context
                .config_manager
                .backup(&context.config, note, Utc::now())
                .map_err(ApiError::from)?;
            output::success(format!("Configuration backed up as `{name}`."));
            Ok(())
        }
        "backups" => {
            let backups = context
                .config_manager
                .list_backups()
                .map_err(ApiError::from)?;
            if backups.is_empty() {
                output::info("No configuration backups yet.");
            }
            for backup in backups {
                let stamp = backup.created_at.format("%Y-%m-%d %H:%M:%S UTC");
                match backup.note {
                    Some(note) => output::info(format!("{}  {stamp}  {note}", backup.name)),
                    None => output::info(format!("{}  {stamp}", backup.name)),
                }
            }
            Ok(())
        }
        "restore" => {
            let Some(name) = args.get(1) else {
                return Err(CommandError::InvalidArguments(
                    "usage: config restore <backup name>".into(),
                ));
            };
            context.config = context
                .config_manager
                .restore(name)
                .map_err(ApiError::from)?;
            output::success(format!(
                "Restored `{name}`. Pricing changes apply after restart."
            ));
            Ok(())
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown config action `{other}`; expected show, backup, backups or restore"
        ))),
    }
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output::section(format!("autovalue {}", meta.version));
    output::info(format!("Build hash : {} ({})", meta.git_hash, meta.git_status));
    output::info(format!("Built at   : {}", meta.timestamp));
    output::info(format!("Target     : {} [{}]", meta.target, meta.profile));
    output::info(format!("Rustc      : {}", meta.rustc));
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(raw) = args.first() {
        match context.registry.get(&raw.to_ascii_lowercase()) {
            Some(entry) => {
                output::section(format!("Help: {}", entry.name));
                output::info(format!("Description: {}", entry.description));
                output::info(format!("Usage: {}", entry.usage));
            }
            None => context.suggest_command(raw),
        }
        return Ok(());
    }

    output::section("Available commands");
    for entry in context.registry.list() {
        output::info(format!("{:<22} {}", entry.name, entry.description));
    }
    output::info("Use `help <command>` for details. Bodies may be given as `@file.json`.");
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_operation_has_a_command() {
        let registry = registry();
        for operation in Operation::ALL {
            assert!(registry.get(operation.name()).is_some(), "{operation}");
        }
    }

    #[test]
    fn body_arguments_are_rejoined() {
        let body = read_body(&["{\"vehicleId\":", "\"v1\"}"]).unwrap();
        assert_eq!(body, "{\"vehicleId\": \"v1\"}");
        assert_eq!(read_body(&[]).unwrap(), "");
    }
}
