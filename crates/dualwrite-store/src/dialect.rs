//! Identifier quoting.
//!
//! The legacy schema names a table `user`, a reserved word in most SQL
//! dialects. Queries never hard-code the quoting; they ask the store's
//! dialect instead.

/// The quoting capability a store exposes to query builders.
pub trait Dialect: Send + Sync {
    /// Quote an identifier so it is never read as a keyword.
    fn quote(&self, identifier: &str) -> String;
}

/// SQLite: ANSI double quotes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteDialect;

/// PostgreSQL: ANSI double quotes.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDialect;

/// MySQL: backticks.
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlDialect;

fn quote_with(identifier: &str, quote: char) -> String {
    let escaped = identifier.replace(quote, &format!("{quote}{quote}"));
    format!("{quote}{escaped}{quote}")
}

impl Dialect for SqliteDialect {
    fn quote(&self, identifier: &str) -> String {
        quote_with(identifier, '"')
    }
}

impl Dialect for PostgresDialect {
    fn quote(&self, identifier: &str) -> String {
        quote_with(identifier, '"')
    }
}

impl Dialect for MySqlDialect {
    fn quote(&self, identifier: &str) -> String {
        quote_with(identifier, '`')
    }
}
