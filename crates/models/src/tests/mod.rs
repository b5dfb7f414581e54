

/// DB tests run only when a database is configured and not explicitly skipped.
pub(crate) fn db_tests_enabled() -> bool {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        println!("Skipping database tests (SKIP_DB_TESTS is set)");
        return false;
    }
    std::env::var("DATABASE_URL").is_ok()
}
