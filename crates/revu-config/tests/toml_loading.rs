//! Integration tests for TOML configuration loading.
//!
//! Uses figment::Jail for safe, sandboxed env var manipulation.

use figment::{
    Figment, Jail,
    providers::{Format, Serialized, Toml},
};
use pretty_assertions::assert_eq;
use revu_config::RevuConfig;
use revu_core::enums::Scope;

#[test]
fn loads_all_sections_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[server]
host = "0.0.0.0"
port = 8080

[database]
path = "/var/lib/revu/revu.db"

[hashid]
salt = "pepper"
min_length = 10

[pagination]
default_per_page = 10
max_per_page = 50

[[auth.tokens]]
name = "portal"
token = "portal-secret"
scopes = ["read_write"]

[[auth.tokens]]
name = "reporting"
token = "reporting-secret"
scopes = ["read_only"]
expires_at = "2030-01-01T00:00:00Z"
"#,
        )?;

        let config: RevuConfig = Figment::from(Serialized::defaults(RevuConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.server.bind_addr(), "0.0.0.0:8080");
        assert_eq!(config.database.path, "/var/lib/revu/revu.db");
        assert_eq!(config.hashid.salt, "pepper");
        assert_eq!(config.hashid.min_length, 10);
        assert_eq!(config.pagination.default_per_page, 10);
        assert_eq!(config.pagination.max_per_page, 50);
        assert_eq!(config.auth.tokens.len(), 2);
        assert_eq!(config.auth.tokens[0].scopes, vec![Scope::ReadWrite]);
        assert!(config.auth.tokens[0].expires_at.is_none());
        assert!(config.auth.tokens[1].expires_at.is_some());
        Ok(())
    });
}

#[test]
fn partial_sections_keep_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[server]
port = 9000
"#,
        )?;

        let config: RevuConfig = Figment::from(Serialized::defaults(RevuConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.pagination.default_per_page, 25);
        assert_eq!(config.hashid.min_length, 8);
        Ok(())
    });
}

#[test]
fn project_file_is_picked_up_by_load() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "revu.toml",
            r#"
[hashid]
salt = "from-project-file"
"#,
        )?;

        let config = RevuConfig::load().expect("config loads");
        assert_eq!(config.hashid.salt, "from-project-file");
        Ok(())
    });
}

#[test]
fn load_rejects_inconsistent_pagination() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "revu.toml",
            r#"
[pagination]
default_per_page = 50
max_per_page = 20
"#,
        )?;

        assert!(RevuConfig::load().is_err());
        Ok(())
    });
}

#[test]
fn unknown_scope_fails_extraction() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[[auth.tokens]]
name = "bad"
token = "t"
scopes = ["admin"]
"#,
        )?;

        let result: Result<RevuConfig, _> =
            Figment::from(Serialized::defaults(RevuConfig::default()))
                .merge(Toml::file("config.toml"))
                .extract();
        assert!(result.is_err());
        Ok(())
    });
}
