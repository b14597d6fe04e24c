use std::env;
use std::sync::{Mutex, OnceLock};

use serde_json::Value;
use yardage_cli::commands::{migrate, order, seed};

const BASE_ENV: &[(&str, &str)] = &[
    ("YARDAGE_ADMIN_SECRET", "let-me-in#"),
    ("YARDAGE_MESSAGING_RECIPIENT", "2340000000000"),
    ("YARDAGE_DATABASE_URL", "sqlite::memory:"),
    ("YARDAGE_DATABASE_MAX_CONNECTIONS", "1"),
];

#[test]
fn migrate_succeeds_against_an_in_memory_database() {
    with_env(BASE_ENV, || {
        let result = migrate::run();
        assert_eq!(result.exit_code, 0, "expected successful migrate run");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "migrate");
        assert_eq!(payload["status"], "ok");
    });
}

#[test]
fn migrate_fails_without_required_config() {
    with_env(&[], || {
        let result = migrate::run();
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn seed_reports_zero_inserts_for_the_preseeded_memory_backend() {
    let mut env = BASE_ENV.to_vec();
    env.push(("YARDAGE_CATALOG_BACKEND", "memory"));

    with_env(&env, || {
        let result = seed::run();
        assert_eq!(result.exit_code, 0, "expected seed success");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "ok");
        // The memory backend is already seeded at construction.
        assert_eq!(payload["details"]["products_inserted"], 0);
    });
}

#[test]
fn order_preview_renders_the_messaging_handoff() {
    let mut env = BASE_ENV.to_vec();
    env.push(("YARDAGE_CATALOG_BACKEND", "memory"));

    with_env(&env, || {
        let result = order::run(
            &["aria-voile-001:5".to_string(), "aria-voile-002:2".to_string()],
            Some("12 Marina Road, Lagos"),
        );
        assert_eq!(result.exit_code, 0, "expected order preview success: {}", result.output);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "ok");
        assert_eq!(payload["details"]["total_yards"], 7);
        let url = payload["details"]["url"].as_str().expect("handoff url");
        assert!(url.starts_with("https://wa.me/2340000000000?text="));
    });
}

#[test]
fn order_rejects_products_missing_from_the_catalog() {
    let mut env = BASE_ENV.to_vec();
    env.push(("YARDAGE_CATALOG_BACKEND", "memory"));

    with_env(&env, || {
        let result = order::run(&["not-a-fabric:2".to_string()], None);
        assert_eq!(result.exit_code, 6);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "unknown_product");
    });
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output is JSON")
}

/// Commands read configuration from process env, so tests that touch it
/// are serialized and always leave the slate clean.
fn with_env(pairs: &[(&str, &str)], run: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard = match ENV_LOCK.get_or_init(|| Mutex::new(())).lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };

    const MANAGED: &[&str] = &[
        "YARDAGE_ADMIN_SECRET",
        "YARDAGE_MESSAGING_RECIPIENT",
        "YARDAGE_DATABASE_URL",
        "YARDAGE_DATABASE_MAX_CONNECTIONS",
        "YARDAGE_CATALOG_BACKEND",
    ];

    for key in MANAGED {
        env::remove_var(key);
    }
    for (key, value) in pairs {
        env::set_var(key, value);
    }

    run();

    for key in MANAGED {
        env::remove_var(key);
    }
}
