mod common;

use assert_cmd::Command;
use predicates::str::contains;

use common::{seed_json_home, temp_home};

fn cli(home: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("autovalue_cli").unwrap();
    cmd.env("AUTOVALUE_HOME", home)
        .env("AUTOVALUE_CLI_SCRIPT", "1")
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn script_mode_prices_and_persists_a_trade_in() {
    let home = temp_home();
    let input = concat!(
        "trade-in-valuation '{\"vehicleDetails\": {\"year\": 2020, \"mileage\": 30000}, \"condition\": \"fair\"}'\n",
        "tables\n",
        "exit\n",
    );

    cli(&home)
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("\"success\": true"))
        .stdout(contains("\"instantOffer\""))
        .stdout(contains("trade_in_offers"));

    let stored = std::fs::read_to_string(home.join("data").join("trade_in_offers.json")).unwrap();
    assert!(stored.contains("\"created_at\""));
    assert!(stored.contains("\"conditionReport\""));
}

#[test]
fn warranty_quote_reads_seeded_tables() {
    let home = temp_home();
    seed_json_home(&home);
    let input = "warranty-quote '{\"vehicleId\": \"veh-civic\", \"providerId\": \"prov-shield\", \"coverageType\": \"premium\", \"termMonths\": 24}'\n";

    cli(&home)
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("\"providerId\": \"prov-shield\""))
        .stdout(contains("\"wear items\""));

    assert!(home.join("data").join("warranty_quotes.json").exists());
}

#[test]
fn unknown_commands_get_a_suggestion() {
    let home = temp_home();
    cli(&home)
        .write_stdin("warranty-qoute {}\nexit\n")
        .assert()
        .success()
        .stdout(contains("Unknown command `warranty-qoute`"))
        .stdout(contains("Suggestion: `warranty-quote`?"));
}

#[test]
fn options_prints_cors_headers() {
    let home = temp_home();
    cli(&home)
        .write_stdin("options market-analysis\n")
        .assert()
        .success()
        .stdout(contains("Access-Control-Allow-Origin: *"))
        .stdout(contains("Access-Control-Allow-Methods: POST, OPTIONS"));
}

#[test]
fn config_backups_are_listed() {
    let home = temp_home();
    cli(&home)
        .write_stdin("config backup Nightly run\nconfig backups\nconfig show\n")
        .assert()
        .success()
        .stdout(contains("-nightly-run.json"))
        .stdout(contains("Nightly run"))
        .stdout(contains("\"clamp_negative_offers\": true"));
}

#[test]
fn restoring_an_unknown_backup_is_reported() {
    let home = temp_home();
    cli(&home)
        .write_stdin("config restore config-19990101T000000000.json\n")
        .assert()
        .success()
        .stdout(contains("config-19990101T000000000.json"));
}

#[test]
fn oneshot_failure_sets_exit_status() {
    let home = temp_home();
    seed_json_home(&home);
    cli(&home)
        .args(["depreciation-forecast", r#"{"vehicleId": "veh-missing"}"#])
        .assert()
        .failure()
        .stdout(contains("\"success\": false"))
        .stderr(contains("status 404"));
}

#[test]
fn oneshot_success_prints_forecast() {
    let home = temp_home();
    seed_json_home(&home);
    cli(&home)
        .args(["depreciation-forecast", r#"{"vehicleId": "veh-outback"}"#])
        .assert()
        .success()
        .stdout(contains("\"yearlyValues\""))
        .stdout(contains("\"optimalSellYear\""));
}

#[test]
fn version_reports_package() {
    let home = temp_home();
    cli(&home)
        .write_stdin("version\n")
        .assert()
        .success()
        .stdout(contains("autovalue"));
}
