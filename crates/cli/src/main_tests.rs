// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn parse(argv: &[&str]) -> ArgMatches {
    let catalog = Catalog::builtin().unwrap();
    cli(&catalog)
        .try_get_matches_from(std::iter::once("twr").chain(argv.iter().copied()))
        .unwrap()
}

#[test]
fn command_tree_is_valid() {
    cli(&Catalog::builtin().unwrap()).debug_assert();
}

#[test]
fn every_resource_is_a_subcommand() {
    let catalog = Catalog::builtin().unwrap();
    let cmd = cli(&catalog);
    for def in catalog.definitions() {
        assert!(
            cmd.find_subcommand(def.kind()).is_some(),
            "missing {}",
            def.kind()
        );
    }
}

#[test]
fn global_flags_become_a_settings_layer() {
    let matches = parse(&[
        "user",
        "list",
        "--tower-host",
        "tower.example.com",
        "--tower-username",
        "admin",
        "-f",
        "json",
        "--insecure",
    ]);

    let layer = GlobalArgs::from_arg_matches(&matches).unwrap().layer();

    assert_eq!(layer.host.as_deref(), Some("tower.example.com"));
    assert_eq!(layer.username.as_deref(), Some("admin"));
    assert_eq!(layer.format, Some(OutputFormat::Json));
    assert_eq!(layer.verify_ssl, Some(false));
    assert_eq!(layer.verbose, None);
    assert_eq!(layer.password, None);
}

#[test]
fn absent_flags_override_nothing() {
    let matches = parse(&["config"]);
    let layer = GlobalArgs::from_arg_matches(&matches).unwrap().layer();
    assert_eq!(layer, SettingsLayer::default());
}

#[test]
fn unknown_format_is_rejected() {
    let catalog = Catalog::builtin().unwrap();
    let result = cli(&catalog).try_get_matches_from(["twr", "user", "list", "-f", "xml"]);
    assert!(result.is_err());
}
